//! # Input Protocol
//!
//! This module defines the events the host application forwards to the Builder.
//! Pointer positions are in Screen Space (pixels relative to the canvas element).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::model::StepId;

/// Which pointer button was pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// One user action on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    PointerDown { pos: Vec2, button: PointerButton },
    PointerMove { pos: Vec2 },
    PointerUp { pos: Vec2 },
    /// Vertical scroll over the canvas (positive = zoom in).
    Scroll { pos: Vec2, delta: f32 },
    /// The "connect" affordance of a step.
    ConnectClicked(StepId),
    /// The output handle of a message button.
    ButtonHandleClicked { step: StepId, index: usize },
    /// The explicit cancel affordance shown while a connection is armed.
    CancelConnect,
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl CanvasEvent {
    /// Primary-button press, the common case.
    pub fn press(pos: Vec2) -> Self {
        CanvasEvent::PointerDown {
            pos,
            button: PointerButton::Primary,
        }
    }
}
