use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::scan::domain::still_image_writer::StillImageWriter;
use crate::shared::constants::STILL_JPEG_QUALITY;
use crate::shared::frame::Frame;

/// Writes stills with the `image` crate. JPEG output uses `jpeg_quality`.
pub struct ImageFileWriter {
    jpeg_quality: u8,
}

impl ImageFileWriter {
    pub fn new() -> Self {
        Self::with_quality(STILL_JPEG_QUALITY)
    }

    pub fn with_quality(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StillImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let img = to_rgb_image(frame)?;

        let is_jpeg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
        if is_jpeg {
            let mut out = BufWriter::new(File::create(path)?);
            JpegEncoder::new_with_quality(&mut out, self.jpeg_quality).encode_image(&img)?;
        } else {
            img.save(path)?;
        }
        Ok(())
    }
}

/// Encodes a frame as in-memory JPEG bytes.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let img = to_rgb_image(frame)?;
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).encode_image(&img)?;
    Ok(bytes)
}

fn to_rgb_image(frame: &Frame) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let rgb = frame.to_rgb();
    RgbImage::from_raw(rgb.width(), rgb.height(), rgb.data().to_vec())
        .ok_or_else(|| "Failed to create image from frame data".into())
}
