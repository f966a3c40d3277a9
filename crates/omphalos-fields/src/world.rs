//! World composition: base noise fields, energy fields and overlays.
//!
//! [`WorldComposer`] owns every field of a world and advances them together
//! one tick at a time. Gameplay layers read composite terrain, biomes and
//! energy, and request energy changes or new overlays; presentation layers
//! read the field grids.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::biome::{Biome, BiomeThresholds};
use crate::energy::{EnergyField, EnergyType};
use crate::fractal::NoiseParams;
use crate::noise_field::{NOISE_SENTINEL, NoiseField};
use crate::overlay::Overlay;
use crate::seed::layer_seed;

/// Seed offsets of the base layers from the world seed.
const TERRAIN_SEED_OFFSET: u64 = 0;
const POPULATION_SEED_OFFSET: u64 = 1;
const TEMPERATURE_SEED_OFFSET: u64 = 2;

/// Noise settings for one world layer. The layer's seed is derived from the
/// world seed, so it is not configured here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerParams {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            scale: 0.1,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl LayerParams {
    fn with(scale: f64, octaves: u32) -> Self {
        Self {
            scale,
            octaves,
            ..Default::default()
        }
    }

    /// Full noise parameters for this layer with the given layer seed.
    pub fn noise_params(&self, seed: u64) -> NoiseParams {
        NoiseParams {
            seed,
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

/// Per-tick decay rate of each energy field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyDecay {
    pub heat: f64,
    pub cold: f64,
    pub magic: f64,
    pub electricity: f64,
}

impl Default for EnergyDecay {
    fn default() -> Self {
        Self {
            heat: 0.02,
            cold: 0.02,
            magic: 0.01,
            electricity: 0.05,
        }
    }
}

impl EnergyDecay {
    pub fn rate(&self, energy_type: EnergyType) -> f64 {
        match energy_type {
            EnergyType::Heat => self.heat,
            EnergyType::Cold => self.cold,
            EnergyType::Magic => self.magic,
            EnergyType::Electricity => self.electricity,
        }
    }
}

/// Everything needed to build a [`WorldComposer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub terrain: LayerParams,
    pub population: LayerParams,
    pub temperature: LayerParams,
    pub energy_decay: EnergyDecay,
    pub biomes: BiomeThresholds,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            seed: 42,
            terrain: LayerParams::with(0.05, 6),
            population: LayerParams::with(0.1, 4),
            temperature: LayerParams::with(0.08, 5),
            energy_decay: EnergyDecay::default(),
            biomes: BiomeThresholds::default(),
        }
    }
}

impl WorldParams {
    /// Default parameters with the given size and seed.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Default::default()
        }
    }
}

/// Owns and advances every field of a world.
#[derive(Clone, Debug)]
pub struct WorldComposer {
    width: usize,
    height: usize,
    seed: u64,
    biomes: BiomeThresholds,
    terrain: NoiseField,
    population: NoiseField,
    temperature: NoiseField,
    /// Indexed by [`EnergyType::index`].
    energy: [EnergyField; EnergyType::ALL.len()],
    /// Application order matters: see [`WorldComposer::get_terrain_value`].
    overlays: Vec<Overlay>,
}

impl WorldComposer {
    /// Generate a world from its parameters.
    pub fn new(params: WorldParams) -> Self {
        let WorldParams {
            width,
            height,
            seed,
            ..
        } = params;

        let generate = |layer: &LayerParams, offset| {
            NoiseField::generate(width, height, layer.noise_params(layer_seed(seed, offset)))
        };
        let terrain = generate(&params.terrain, TERRAIN_SEED_OFFSET);
        let population = generate(&params.population, POPULATION_SEED_OFFSET);
        let temperature = generate(&params.temperature, TEMPERATURE_SEED_OFFSET);
        let energy = EnergyType::ALL
            .map(|ty| EnergyField::new(width, height, ty, params.energy_decay.rate(ty)));

        info!(width, height, seed, "Generated world fields");

        Self {
            width,
            height,
            seed,
            biomes: params.biomes,
            terrain,
            population,
            temperature,
            energy,
            overlays: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn terrain(&self) -> &NoiseField {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut NoiseField {
        &mut self.terrain
    }

    pub fn population(&self) -> &NoiseField {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut NoiseField {
        &mut self.population
    }

    pub fn temperature(&self) -> &NoiseField {
        &self.temperature
    }

    pub fn temperature_mut(&mut self) -> &mut NoiseField {
        &mut self.temperature
    }

    /// Terrain at a cell with every active overlay folded in.
    ///
    /// Starting from the base terrain value, each active overlay in insertion
    /// order contributes `result = (result + combined) / 2`, where `combined`
    /// is the overlay's combination with the base terrain at this cell. The
    /// fold is order dependent. Outside the world the sentinel `0.5` is
    /// returned unchanged.
    pub fn get_terrain_value(&self, x: i64, y: i64) -> f64 {
        if self.terrain.grid().index(x, y).is_none() {
            return NOISE_SENTINEL;
        }
        self.overlays
            .iter()
            .filter(|overlay| overlay.is_active())
            .fold(self.terrain.get_value(x, y), |result, overlay| {
                (result + overlay.combine_cell(&self.terrain, x, y)) / 2.0
            })
    }

    /// Biome from composite terrain and base temperature.
    pub fn get_biome(&self, x: i64, y: i64) -> Biome {
        let terrain = self.get_terrain_value(x, y);
        let temperature = self.temperature.get_value(x, y);
        self.biomes.classify(terrain, temperature)
    }

    pub fn energy_field(&self, energy_type: EnergyType) -> &EnergyField {
        &self.energy[energy_type.index()]
    }

    pub fn energy_field_mut(&mut self, energy_type: EnergyType) -> &mut EnergyField {
        &mut self.energy[energy_type.index()]
    }

    /// Energy of one type at a cell (0 outside the world).
    pub fn get_energy_value(&self, x: i64, y: i64, energy_type: EnergyType) -> f64 {
        self.energy_field(energy_type).get_value(x, y)
    }

    /// Energy looked up by type name; unknown names read as 0.
    pub fn energy_value_by_name(&self, x: i64, y: i64, name: &str) -> f64 {
        name.parse::<EnergyType>()
            .map_or(0.0, |ty| self.get_energy_value(x, y, ty))
    }

    /// Inject energy into the field of `energy_type`.
    pub fn add_energy(&mut self, energy_type: EnergyType, x: i64, y: i64, amount: f64, radius: u32) {
        self.energy_field_mut(energy_type)
            .add_energy(x, y, amount, radius);
    }

    /// Draw energy out of the field of `energy_type`.
    pub fn remove_energy(
        &mut self,
        energy_type: EnergyType,
        x: i64,
        y: i64,
        amount: f64,
        radius: u32,
    ) {
        self.energy_field_mut(energy_type)
            .remove_energy(x, y, amount, radius);
    }

    /// Register an overlay. It is applied after every overlay added before it.
    pub fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
        debug!(count = self.overlays.len(), "Overlay registered");
    }

    /// Overlays in application order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Advance the world by one tick.
    ///
    /// Every energy field decays and diffuses by exactly one step whatever
    /// the value of `dt`. Active overlays decay toward neutral, and overlays
    /// that have settled are removed for good.
    pub fn update(&mut self, dt: f64) {
        trace!(dt, overlays = self.overlays.len(), "World tick");

        for field in &mut self.energy {
            field.update();
        }

        for overlay in self.overlays.iter_mut().filter(|o| o.is_active()) {
            overlay.update();
        }

        let before = self.overlays.len();
        self.overlays.retain(Overlay::is_active);
        let retired = before - self.overlays.len();
        if retired > 0 {
            debug!(retired, remaining = self.overlays.len(), "Overlays settled");
        }
    }
}
