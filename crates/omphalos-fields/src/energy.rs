//! Spatial energy distributions and discrete energy stores.
//!
//! An [`EnergyField`] holds one energy type's magnitude per cell. Energy is
//! injected or drawn out with a radial falloff, and each update decays the
//! whole field then diffuses it with a four-neighbour stencil. Magnitudes are
//! unbounded in both directions.
//!
//! [`EnergyNode`] and [`EnergyNetwork`] model point stores (objects, wards,
//! batteries) that exchange energy along their gradient.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, clamp_decay_rate};

/// Share of a cell's own value kept by the diffusion stencil; the remainder
/// comes from the mean of its four orthogonal neighbours.
const DIFFUSION_SELF_WEIGHT: f64 = 0.8;

/// Kind of energy carried by a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Heat,
    Cold,
    Magic,
    Electricity,
}

impl EnergyType {
    /// Every energy type, in field-index order.
    pub const ALL: [EnergyType; 4] = [
        EnergyType::Heat,
        EnergyType::Cold,
        EnergyType::Magic,
        EnergyType::Electricity,
    ];

    /// Position of this type in [`EnergyType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EnergyType::Heat => "heat",
            EnergyType::Cold => "cold",
            EnergyType::Magic => "magic",
            EnergyType::Electricity => "electricity",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an energy type name that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown energy type: {0}")]
pub struct UnknownEnergyType(pub String);

impl FromStr for EnergyType {
    type Err = UnknownEnergyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnergyType::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEnergyType(s.to_string()))
    }
}

/// Per-cell magnitude of one energy type.
#[derive(Clone, Debug)]
pub struct EnergyField {
    energy_type: EnergyType,
    decay_rate: f64,
    grid: Grid,
}

impl EnergyField {
    /// Create an empty field. `decay_rate` is clamped into `[0, 1)`.
    pub fn new(width: usize, height: usize, energy_type: EnergyType, decay_rate: f64) -> Self {
        Self {
            energy_type,
            decay_rate: clamp_decay_rate(decay_rate),
            grid: Grid::zeros(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn energy_type(&self) -> EnergyType {
        self.energy_type
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Add `amount` at `(x, y)`, fading linearly to zero at `radius`.
    ///
    /// Each cell within `radius` receives `amount * (1 - distance / radius)`;
    /// cells at exactly `radius` receive nothing. Negative amounts draw
    /// energy out and may leave cells negative.
    pub fn add_energy(&mut self, x: i64, y: i64, amount: f64, radius: u32) {
        self.grid
            .for_each_in_radius(x, y, radius, |cell, falloff| *cell += amount * falloff);
    }

    /// Draw `amount` out at `(x, y)` with the same falloff as [`add_energy`].
    ///
    /// Not clamped at zero.
    ///
    /// [`add_energy`]: EnergyField::add_energy
    pub fn remove_energy(&mut self, x: i64, y: i64, amount: f64, radius: u32) {
        self.add_energy(x, y, -amount, radius);
    }

    /// Advance the field by one step: global decay, then diffusion.
    ///
    /// Diffusion reads the decayed grid and writes a fresh buffer. Interior
    /// cells become `0.8 * self + 0.2 * mean(N, S, W, E)`; the one-cell
    /// border is copied unchanged. The new buffer replaces the old one only
    /// once complete.
    pub fn update(&mut self) {
        let keep = 1.0 - self.decay_rate;
        self.grid.map_in_place(|v| v * keep);

        let src = &self.grid;
        let (w, h) = (src.width(), src.height());
        let cells = src.as_slice();
        let mut next = src.clone();

        if w > 2 && h > 2 {
            let out = next.as_mut_slice();
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    let i = y * w + x;
                    let neighbours =
                        (cells[i - w] + cells[i + w] + cells[i - 1] + cells[i + 1]) / 4.0;
                    out[i] = cells[i] * DIFFUSION_SELF_WEIGHT
                        + neighbours * (1.0 - DIFFUSION_SELF_WEIGHT);
                }
            }
        }

        self.grid = next;
    }

    /// Energy at a cell, or `0.0` outside the field.
    pub fn get_value(&self, x: i64, y: i64) -> f64 {
        self.grid.get(x, y).unwrap_or(0.0)
    }

    /// Energy at a float coordinate (truncated), or `0.0` outside.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.grid
            .locate(x, y)
            .map_or(0.0, |(x, y)| self.get_value(x, y))
    }

    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.grid.sum()
    }

    /// Read-only view of the underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

// ---------------------------------------------------------------------------
// Discrete stores
// ---------------------------------------------------------------------------

/// A point store of energy with a capacity and a transfer rate.
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyNode {
    pub capacity: f64,
    pub current: f64,
    /// Fraction of the half-gradient moved per transfer.
    pub flow_rate: f64,
}

impl Default for EnergyNode {
    fn default() -> Self {
        Self::new(100.0, 0.0, 1.0)
    }
}

impl EnergyNode {
    /// Create a node; `current` is capped at `capacity`.
    pub fn new(capacity: f64, current: f64, flow_rate: f64) -> Self {
        Self {
            capacity,
            current: current.min(capacity),
            flow_rate,
        }
    }

    /// Add up to `amount`, saturating at capacity. Returns the amount added.
    pub fn add_energy(&mut self, amount: f64) -> f64 {
        let old = self.current;
        self.current = (self.current + amount).min(self.capacity);
        self.current - old
    }

    /// Remove up to `amount`, stopping at zero. Returns the amount removed.
    pub fn remove_energy(&mut self, amount: f64) -> f64 {
        let old = self.current;
        self.current = (self.current - amount).max(0.0);
        old - self.current
    }

    /// Push energy down the gradient into `other`.
    ///
    /// Moves `min(half_gradient * flow_rate, current)` when this node holds
    /// more than `other`; whatever this node actually gives up is offered to
    /// `other` (which may saturate). Returns the amount removed from `self`.
    pub fn flow_to(&mut self, other: &mut EnergyNode) -> f64 {
        if self.current <= other.current {
            return 0.0;
        }
        let gradient = (self.current - other.current) / 2.0;
        let transfer = (gradient * self.flow_rate).min(self.current);
        let actual = self.remove_energy(transfer);
        other.add_energy(actual);
        actual
    }
}

/// Index of a node inside an [`EnergyNetwork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Owns a set of nodes and the directed links energy flows along.
#[derive(Clone, Debug, Default)]
pub struct EnergyNetwork {
    nodes: Vec<EnergyNode>,
    links: Vec<(NodeId, NodeId)>,
}

impl EnergyNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: EnergyNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&EnergyNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut EnergyNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn links(&self) -> &[(NodeId, NodeId)] {
        &self.links
    }

    /// Link `from` to `to`. Returns `false` for self-links, unknown ids and
    /// links that already exist.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        let valid = from != to && from.0 < self.nodes.len() && to.0 < self.nodes.len();
        if !valid || self.links.contains(&(from, to)) {
            return false;
        }
        self.links.push((from, to));
        true
    }

    /// Run [`EnergyNode::flow_to`] along every link in insertion order.
    /// Returns the total amount moved.
    pub fn flow_step(&mut self) -> f64 {
        let mut moved = 0.0;
        for &(from, to) in &self.links {
            let (source, sink) = pair_mut(&mut self.nodes, from.0, to.0);
            moved += source.flow_to(sink);
        }
        moved
    }

    /// Sum of stored energy over every node.
    pub fn total(&self) -> f64 {
        self.nodes.iter().map(|n| n.current).sum()
    }
}

/// Two distinct mutable elements of a slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
