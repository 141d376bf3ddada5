//! Wire geometry for connections, in World Space.

use glam::Vec2;

use crate::config::LayoutConfig;
use crate::math;
use crate::model::{GraphState, Handle, StepId};
use crate::view::View;

/// A cubic Bezier from a source handle to a target step.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionPath {
    pub from: Handle,
    pub to: StepId,
    pub start: Vec2,
    pub cp1: Vec2,
    pub cp2: Vec2,
    pub end: Vec2,
}

impl ConnectionPath {
    /// The same curve in Screen Space, for hosts that draw in pixels.
    pub fn to_screen(&self, view: &View) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            start: view.world_to_screen(self.start),
            cp1: view.world_to_screen(self.cp1),
            cp2: view.world_to_screen(self.cp2),
            end: view.world_to_screen(self.end),
        }
    }
}

/// Anchor of an output handle: right edge, vertically centred for a step, or on
/// the button's row below the header for a button.
pub fn output_anchor(graph: &GraphState, layout: &LayoutConfig, handle: &Handle) -> Option<Vec2> {
    let step = graph.get(handle.owner())?;
    let right = step.position.x + layout.step_size.x;
    let y = match handle {
        Handle::Step(_) => step.position.y + layout.step_size.y * 0.5,
        Handle::Button { index, .. } => {
            step.position.y + layout.header_height + layout.button_spacing * (*index as f32 + 1.0)
        }
    };
    Some(Vec2::new(right, y))
}

/// Anchor of a step's input: left edge, vertically centred.
pub fn input_anchor(graph: &GraphState, layout: &LayoutConfig, id: &StepId) -> Option<Vec2> {
    let step = graph.get(id)?;
    Some(step.position + Vec2::new(0.0, layout.step_size.y * 0.5))
}

pub fn connection_paths(graph: &GraphState, layout: &LayoutConfig) -> Vec<ConnectionPath> {
    graph
        .connections
        .iter()
        .filter_map(|c| {
            let start = output_anchor(graph, layout, &c.from)?;
            let end = input_anchor(graph, layout, &c.to)?;
            let (cp1, cp2) = math::calculate_bezier_points(start, end);
            Some(ConnectionPath {
                from: c.from.clone(),
                to: c.to.clone(),
                start,
                cp1,
                cp2,
                end,
            })
        })
        .collect()
}
