use std::path::Path;

use crate::shared::frame::Frame;

/// Persists a scanned still. The format follows the path's extension.
pub trait StillImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
