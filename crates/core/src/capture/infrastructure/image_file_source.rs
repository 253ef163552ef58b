use std::path::{Path, PathBuf};

use crate::capture::domain::facing::Facing;
use crate::capture::infrastructure::memory_source::MemorySource;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Decodes an image file into an RGB frame using the `image` crate.
pub fn read_frame(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}

/// Expands directories into their image files, sorted by name.
pub fn collect_image_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_image(p))
                .collect();
            entries.sort();
            paths.extend(entries);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Builds a simulated camera whose feeds loop over image files.
///
/// A facing with no images behaves like missing hardware.
pub fn open_image_camera(
    front: &[PathBuf],
    back: &[PathBuf],
) -> Result<MemorySource, Box<dyn std::error::Error>> {
    let mut source = MemorySource::new();
    for (facing, inputs) in [(Facing::User, front), (Facing::Environment, back)] {
        let frames = collect_image_paths(inputs)?
            .iter()
            .enumerate()
            .map(|(i, path)| read_frame(path, i))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("{} clip: {} frame(s)", facing.label(), frames.len());
        source = source.with_clip(facing, frames);
    }
    Ok(source)
}
