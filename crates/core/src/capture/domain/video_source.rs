use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::facing::Facing;
use crate::shared::frame::Frame;

/// Hands out live camera feeds.
///
/// Acquisition either yields a feed or one of the acquisition errors
/// (`ResourceUnavailable`, `DeviceNotFound`, `UnsupportedEnvironment`).
pub trait VideoSource: Send {
    fn acquire(&mut self, facing: Facing) -> Result<Box<dyn LiveFeed>, CaptureError>;
}

/// An acquired camera. Exactly one owner holds it until `release`.
pub trait LiveFeed: Send {
    fn facing(&self) -> Facing;

    /// Current raster size; `(0, 0)` until the first frame arrives.
    fn dimensions(&self) -> (u32, u32);

    /// The most recent frame, if any. Reading never mutates the device.
    fn latest_frame(&self) -> Option<Frame>;

    fn supports_torch(&self) -> bool {
        false
    }

    fn torch_enabled(&self) -> bool {
        false
    }

    fn set_torch(&mut self, _on: bool) -> Result<(), CaptureError> {
        Err(CaptureError::TorchUnsupported)
    }

    /// Returns the hardware. Called once per acquired feed.
    fn release(&mut self);
}
