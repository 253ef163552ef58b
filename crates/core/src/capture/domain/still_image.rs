use crate::capture::domain::facing::Facing;
use crate::shared::frame::Frame;

/// A single frame lifted out of a live session by `capture_photo`.
#[derive(Clone, Debug, PartialEq)]
pub struct StillImage {
    frame: Frame,
    facing: Option<Facing>,
}

impl StillImage {
    pub fn from_camera(frame: Frame, facing: Facing) -> Self {
        Self {
            frame,
            facing: Some(facing),
        }
    }

    /// A still that did not come from a camera, e.g. an uploaded file.
    pub fn from_upload(frame: Frame) -> Self {
        Self {
            frame,
            facing: None,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    pub fn facing(&self) -> Option<Facing> {
        self.facing
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    pub fn map_frame(self, f: impl FnOnce(Frame) -> Frame) -> Self {
        Self {
            frame: f(self.frame),
            facing: self.facing,
        }
    }
}
