use serde::{Deserialize, Serialize};

use crate::geometry::tolerance::{PREVIEW_TOLERANCE, SAMPLE_TOLERANCE};

/// Tunables of the interactive editor. Deserializes from partial JSON; any
/// missing field keeps its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Inset of the plot area from every surface edge, in pixels.
    pub border: f64,
    /// Pointer pick radius in pixels.
    pub hit_radius: f64,
    /// Pointer travel in pixels before a press turns into a drag.
    pub drag_threshold: f64,
    pub nudge_step: f64,
    pub large_nudge_step: f64,
    /// Horizontal handle offset given to newly added dots, in user units.
    pub new_handle_span: f64,
    pub sample_tolerance: f64,
    pub preview_tolerance: f64,
    pub initial_zoom: f64,
    pub snap_to_grid: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            border: 10.0,
            hit_radius: 8.0,
            drag_threshold: 3.0,
            nudge_step: 1.0,
            large_nudge_step: 10.0,
            new_handle_span: 10.0,
            sample_tolerance: SAMPLE_TOLERANCE,
            preview_tolerance: PREVIEW_TOLERANCE,
            initial_zoom: 1.0,
            snap_to_grid: false,
        }
    }
}
