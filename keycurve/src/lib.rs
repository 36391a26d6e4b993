pub mod model;
pub mod config;
pub mod curve;
pub mod editor;
pub mod error;
pub mod frame;
pub mod input;
pub mod layers;
pub mod merge;
pub mod properties;
pub mod sampling;
pub mod scene;
pub mod geometry {
    pub mod cubic;
    pub mod limits;
    pub mod tolerance;
    pub mod viewport;
}
pub mod algorithms {
    pub mod picking;
}
mod json;
mod svg;

pub use config::EditorConfig;
pub use curve::Curve;
pub use editor::{DragTarget, Editor, EditorState};
pub use error::LoadError;
pub use frame::{FrameScheduler, ManualFrames, RecordingSurface, Surface};
pub use geometry::viewport::Viewport;
pub use input::{Key, KeyEvent, Modifiers, PointerEvent};
pub use json::LAYOUT_VERSION;
pub use layers::{Layer, LayerId, LayerSamples, LayerSet};
pub use merge::{gen_keyframe_entries, merge_samples, AxisValue, EntryValue, KeyframeEntry, MergeConfig};
pub use model::{Dot, DotKind, DotPatch, HandleSide, Point, Space, Units};
pub use properties::{PropertyRegistry, PropertySpec};
pub use scene::Scene;
pub use svg::{curve_path, polyline_path};

use serde_json::Value;

impl LayerSet {
    /// Persisted layout document.
    pub fn to_json(&self) -> Value {
        json::to_json_impl(self)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Lenient load: repairs or drops bad data, never fails.
    pub fn from_json(v: Value) -> LayerSet {
        json::from_json_impl(v)
    }

    pub fn from_json_strict(v: Value) -> Result<LayerSet, LoadError> {
        json::from_json_impl_strict(v)
    }

    pub fn from_json_str(s: &str) -> LayerSet {
        match serde_json::from_str(s) {
            Ok(v) => json::from_json_impl(v),
            Err(e) => {
                log::warn!("layout is not valid json ({}); using default", e);
                LayerSet::default()
            }
        }
    }

    pub fn from_json_str_strict(s: &str) -> Result<LayerSet, LoadError> {
        let v: Value = serde_json::from_str(s)?;
        json::from_json_impl_strict(v)
    }
}
