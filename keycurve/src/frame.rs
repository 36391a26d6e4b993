//! Host seams: where frames come from and where scenes go.

use crate::scene::Scene;

/// Asks the host for one future frame. The host answers by calling
/// `Editor::frame()`; on the web that is a `requestAnimationFrame` callback,
/// elsewhere a timer tick.
pub trait FrameScheduler {
    fn schedule_frame(&mut self);
}

/// Receives finished scenes.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (f64, f64);
    fn present(&mut self, scene: &Scene);
}

/// Scheduler that never fires; for hosts that drive `draw()` themselves.
#[derive(Debug, Default)]
pub struct ManualFrames {
    pub requested: usize,
}

impl FrameScheduler for ManualFrames {
    fn schedule_frame(&mut self) {
        self.requested += 1;
    }
}

/// Surface that keeps the last presented scene.
#[derive(Debug)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub presented: usize,
    pub last: Option<Scene>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingSurface { width, height, presented: 0, last: None }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn present(&mut self, scene: &Scene) {
        self.presented += 1;
        self.last = Some(scene.clone());
    }
}
