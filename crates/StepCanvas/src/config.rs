//! # Configuration
//!
//! This module defines the configuration struct for the Builder: grid layout,
//! step geometry, zoom bounds and the placement policy for new steps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Configuration parameters for the Builder.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Layout of steps on the canvas.
    pub layout: LayoutConfig,
    /// Zoom bounds and step size.
    pub zoom: ZoomConfig,
    /// How the grid slot of a new step is chosen.
    pub placement: PlacementPolicy,
}

/// How `add_step` picks the grid slot for a new step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Slot = number of steps currently on the canvas. After deletions a new step
    /// can land on top of an existing one.
    #[default]
    LiveCount,
    /// Slot = number of steps ever placed in this session.
    Monotonic,
}

/// Canvas geometry in world units.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Steps per grid row. Default: 4.
    pub columns: usize,
    /// Size of one grid cell. Default: 280x200.
    pub cell_size: Vec2,
    /// Top-left of the first grid cell. Default: (50, 100).
    pub origin: Vec2,
    /// Position of the trigger seeded into a new automation. Default: (100, 100).
    pub seed_position: Vec2,
    /// Rendered size of a step card, used for hit testing and wire anchors.
    pub step_size: Vec2,
    /// Height of the draggable header band at the top of a step card.
    pub header_height: f32,
    /// Vertical distance between button output handles.
    pub button_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_size: Vec2::new(280.0, 200.0),
            origin: Vec2::new(50.0, 100.0),
            seed_position: Vec2::new(100.0, 100.0),
            step_size: Vec2::new(240.0, 140.0),
            header_height: 40.0,
            button_spacing: 28.0,
        }
    }
}

impl LayoutConfig {
    /// World position of grid slot `slot` (row-major).
    pub fn grid_position(&self, slot: usize) -> Vec2 {
        let columns = self.columns.max(1);
        let col = (slot % columns) as f32;
        let row = (slot / columns) as f32;
        self.origin + Vec2::new(col * self.cell_size.x, row * self.cell_size.y)
    }
}

/// Zoom behaviour.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Lower bound. Default: 0.5.
    pub min: f32,
    /// Upper bound. Default: 2.0.
    pub max: f32,
    /// Increment of the zoom in/out affordances. Default: 0.1.
    pub step: f32,
    /// Multiplier for scroll-wheel zoom. Default: 0.1 per scroll click.
    pub scroll_speed: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            step: 0.1,
            scroll_speed: 0.1,
        }
    }
}

impl ZoomConfig {
    /// The `(min, max)` pair actually applied. Bounds that are not finite and
    /// positive fall back to the defaults, and an inverted pair is swapped.
    pub fn bounds(&self) -> (f32, f32) {
        let defaults = Self::default();
        let valid = |v: f32| v.is_finite() && v > 0.0;
        let min = if valid(self.min) { self.min } else { defaults.min };
        let max = if valid(self.max) { self.max } else { defaults.max };
        (min.min(max), max.max(min))
    }
}
