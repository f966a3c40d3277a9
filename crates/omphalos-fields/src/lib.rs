//! World fields: noise layers, energy distributions, decaying overlays,
//! biome classification and seamless spherical planet terrain.

mod grid;
mod seed;

pub mod biome;
pub mod energy;
pub mod fractal;
pub mod noise_field;
pub mod overlay;
pub mod planet;
pub mod world;

pub use biome::{Biome, BiomeThresholds};
pub use energy::{EnergyField, EnergyNetwork, EnergyNode, EnergyType, NodeId, UnknownEnergyType};
pub use fractal::{MIN_SCALE, NoiseParams, Octaves, TiledPerlin, fbm, fbm_tiled};
pub use grid::Grid;
pub use noise_field::{NOISE_SENTINEL, NoiseField};
pub use overlay::{NEUTRAL, Overlay, OverlayState, SETTLE_TOLERANCE};
pub use planet::{MIN_RADIUS, PlanetParams, PlanetTerrain, normalize_lat_lon};
pub use seed::layer_seed;
pub use world::{EnergyDecay, LayerParams, WorldComposer, WorldParams};
