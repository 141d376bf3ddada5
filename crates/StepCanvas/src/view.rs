//! # Viewport System
//!
//! This module handles the pannable/zoomable canvas mathematics.
//! It transforms between World Space (where steps are stored) and Screen Space
//! (pointer coordinates). Zoom is a pure view transform: it never touches
//! stored step positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;

/// Represents the current camera state: where we are looking (Pan) and how close (Zoom).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The translation offset of the canvas.
    /// A positive value moves the canvas right/down.
    pub pan: Vec2,
    /// The scale factor.
    /// - 1.0 = 100% scale.
    /// - Greater than 1.0 = Zoomed In.
    /// - Less than 1.0 = Zoomed Out.
    pub zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

/// The View struct combines the Transform with the actual Viewport size (window size).
/// It serves as the single source of truth for coordinate conversions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// The camera transform.
    pub transform: Transform,
    /// The size of the visible area in pixels.
    pub viewport_size: Vec2,
}

impl Default for View {
    fn default() -> Self {
        Self::new(Transform::default(), Vec2::new(800.0, 600.0))
    }
}

impl View {
    /// Creates a new View system.
    pub fn new(transform: Transform, viewport_size: Vec2) -> Self {
        Self {
            transform,
            viewport_size,
        }
    }

    /// Converts a point from **World Space** to **Screen Space**.
    ///
    /// Formula: `Screen = (World * Zoom) + Pan`
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        (world_pos * self.transform.zoom) + self.transform.pan
    }

    /// Converts a point from **Screen Space** to **World Space**.
    ///
    /// Formula: `World = (Screen - Pan) / Zoom`
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        (screen_pos - self.transform.pan) / self.transform.zoom
    }

    pub fn zoom_in(&mut self, config: &ZoomConfig) {
        self.transform.zoom = step_zoom(self.transform.zoom, config.step, config);
    }

    pub fn zoom_out(&mut self, config: &ZoomConfig) {
        self.transform.zoom = step_zoom(self.transform.zoom, -config.step, config);
    }

    /// Back to 100% and the origin.
    pub fn reset(&mut self) {
        self.transform = Transform::default();
    }

    /// Scroll-wheel zoom that keeps the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Vec2, scroll_delta: f32, config: &ZoomConfig) {
        if !scroll_delta.is_finite() {
            return;
        }
        let (min, max) = config.bounds();
        let old_zoom = self.transform.zoom;
        let new_zoom = (old_zoom * (1.0 + scroll_delta * config.scroll_speed)).clamp(min, max);
        if !new_zoom.is_finite() || (new_zoom - old_zoom).abs() <= f32::EPSILON {
            return;
        }
        let world_anchor = self.screen_to_world(anchor);
        self.transform.zoom = new_zoom;
        // Screen = World * Zoom + Pan  =>  Pan = Screen - (World * Zoom)
        self.transform.pan = anchor - (world_anchor * new_zoom);
    }
}

/// Adds `delta`, snaps to hundredths so repeated steps do not drift, then clamps.
/// A non-finite result leaves the zoom as it was.
fn step_zoom(zoom: f32, delta: f32, config: &ZoomConfig) -> f32 {
    let (min, max) = config.bounds();
    let next = (((zoom + delta) * 100.0).round() / 100.0).clamp(min, max);
    if next.is_finite() { next } else { zoom }
}
