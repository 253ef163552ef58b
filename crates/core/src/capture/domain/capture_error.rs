use thiserror::Error;

/// Failures surfaced by the capture session controller.
///
/// None of these are fatal: after any of them the controller sits in
/// `Idle` or `Stopped` and `start` can be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("camera permission denied")]
    ResourceUnavailable,
    #[error("no camera device found")]
    DeviceNotFound,
    #[error("camera capture is not supported in this environment")]
    UnsupportedEnvironment,
    #[error("camera has not produced a frame yet")]
    NotReady,
    #[error("no active capture session")]
    NotActive,
    #[error("flash is not supported by this camera")]
    TorchUnsupported,
    #[error("camera error: {0}")]
    Device(String),
}

impl CaptureError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::ResourceUnavailable => {
                "Unable to access camera. Please allow camera permissions and try again.".into()
            }
            CaptureError::DeviceNotFound => {
                "Unable to access camera. No camera found on this device.".into()
            }
            CaptureError::UnsupportedEnvironment => {
                "Unable to access camera. Camera not supported in this environment.".into()
            }
            CaptureError::NotReady => {
                "Camera not ready. Please wait a moment and try again.".into()
            }
            CaptureError::NotActive => "Camera not available. Please try again.".into(),
            CaptureError::TorchUnsupported => "Flash not supported on this device.".into(),
            CaptureError::Device(_) => {
                "Unable to access camera. Please try uploading an image instead.".into()
            }
        }
    }

    /// Whether this came from trying to acquire the device.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            CaptureError::ResourceUnavailable
                | CaptureError::DeviceNotFound
                | CaptureError::UnsupportedEnvironment
                | CaptureError::Device(_)
        )
    }
}
