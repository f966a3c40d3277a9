//! Spherical planet terrain sampling.
//!
//! Maps latitude/longitude onto a tileable noise lattice whose period matches
//! the wrap domain, so altitude is seamless across the longitude seam, and
//! converts samples into Cartesian surface points.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::fractal::{MIN_SCALE, Octaves, TiledPerlin, fbm_tiled};
use crate::seed::{det_cos, det_sin};

/// Smallest base radius accepted; non-positive radii are clamped up to it.
pub const MIN_RADIUS: f64 = 1e-6;

/// Configuration for a planet's terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetParams {
    /// Base radius of the planet, before altitude. Default: 1000.
    pub radius: f64,
    /// Noise seed.
    pub seed: u64,
    /// Noise scale; together with `wrap` it sets the lattice period.
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Multiplier applied to the `[-1, 1]` noise value to get altitude.
    pub altitude_scale: f64,
    /// Size of the wrap domain in noise units. Default: 256.
    pub wrap: u32,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            radius: 1000.0,
            seed: 0,
            scale: 1.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            altitude_scale: 1.0,
            wrap: 256,
        }
    }
}

/// Samples terrain altitude on a sphere with seamless longitude wraparound.
///
/// The lattice period (`repeat`) is derived once at construction as
/// `max(1, round(wrap * scale))` and reused for every sample.
#[derive(Clone, Debug)]
pub struct PlanetTerrain {
    params: PlanetParams,
    repeat: u32,
    noise: TiledPerlin,
}

impl PlanetTerrain {
    /// Build a sampler. Non-positive `radius` and `scale` are clamped to
    /// [`MIN_RADIUS`] and [`MIN_SCALE`]; `wrap` is clamped to at least 1.
    pub fn new(params: PlanetParams) -> Self {
        let params = PlanetParams {
            radius: params.radius.max(MIN_RADIUS),
            scale: params.scale.max(MIN_SCALE),
            wrap: params.wrap.max(1),
            ..params
        };
        let repeat = (f64::from(params.wrap) * params.scale).round().max(1.0) as u32;
        let noise = TiledPerlin::new(params.seed);
        Self {
            params,
            repeat,
            noise,
        }
    }

    /// Effective (clamped) parameters.
    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    /// Lattice period shared by both noise axes.
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Altitude offset at `(latitude, longitude)`, in radians.
    pub fn sample_altitude(&self, latitude: f64, longitude: f64) -> f64 {
        let (x, y) = self.noise_coords(latitude, longitude);
        let octaves = Octaves {
            count: self.params.octaves,
            persistence: self.params.persistence,
            lacunarity: self.params.lacunarity,
        };
        fbm_tiled(&self.noise, x, y, self.repeat, octaves) * self.params.altitude_scale
    }

    /// Cartesian surface position at `(latitude, longitude)`.
    ///
    /// The point lies at distance `radius + altitude` from the planet centre.
    pub fn surface_point(&self, latitude: f64, longitude: f64) -> DVec3 {
        let (latitude, longitude) = normalize_lat_lon(latitude, longitude);
        let radius = self.params.radius + self.sample_altitude(latitude, longitude);
        let cos_lat = det_cos(latitude);
        DVec3::new(
            radius * cos_lat * det_cos(longitude),
            radius * cos_lat * det_sin(longitude),
            radius * det_sin(latitude),
        )
    }

    fn noise_coords(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let (latitude, longitude) = normalize_lat_lon(latitude, longitude);
        let u = snap_unit((longitude + PI) / TAU);
        let v = snap_unit((latitude + FRAC_PI_2) / PI);
        let repeat = f64::from(self.repeat);
        (u * repeat, v * repeat)
    }
}

/// Clamp latitude to the poles and wrap longitude onto `[-π, π)`.
pub fn normalize_lat_lon(latitude: f64, longitude: f64) -> (f64, f64) {
    let latitude = latitude.clamp(-FRAC_PI_2, FRAC_PI_2);
    let longitude = (longitude + PI).rem_euclid(TAU) - PI;
    (latitude, longitude)
}

/// Round a unit coordinate onto a 2^-24 lattice.
///
/// Longitudes that differ by a whole turn normalize to values a few ulps
/// apart; snapping makes them sample the same noise coordinate. Two such
/// values still snap apart when they straddle a rounding boundary, which
/// happens for roughly one input in 10^7 and moves the altitude by at most
/// one lattice step.
#[inline]
fn snap_unit(t: f64) -> f64 {
    const STEPS: f64 = 16_777_216.0;
    (t * STEPS).round() / STEPS
}
