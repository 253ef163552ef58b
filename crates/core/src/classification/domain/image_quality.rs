use ndarray::Array2;
use serde::Serialize;

use crate::shared::frame::Frame;

const BLURRY_BELOW: f64 = 100.0;
const DARK_BELOW: f64 = 50.0;
const BRIGHT_ABOVE: f64 = 200.0;
const LOW_CONTRAST_BELOW: f64 = 30.0;

/// How suitable a still is for classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Variance of the Laplacian; higher is sharper.
    pub blur_score: f64,
    /// Mean gray level, 0-255.
    pub brightness: f64,
    /// Standard deviation of gray levels.
    pub contrast: f64,
    /// Combined score, 0-100.
    pub quality_score: f64,
    pub recommendations: Vec<String>,
}

impl QualityReport {
    pub fn analyze(frame: &Frame) -> Self {
        if frame.is_empty() {
            return Self {
                blur_score: 0.0,
                brightness: 0.0,
                contrast: 0.0,
                quality_score: 0.0,
                recommendations: vec!["Unable to analyze image quality".into()],
            };
        }

        let gray = grayscale(frame);
        let brightness = gray.mean().unwrap_or(0.0);
        let contrast = gray.std(0.0);
        let blur_score = laplacian_variance(&gray);
        let quality_score =
            ((blur_score / 100.0 + brightness / 255.0 + contrast / 128.0) * 33.33).min(100.0);

        Self {
            blur_score,
            brightness,
            contrast,
            quality_score,
            recommendations: recommendations(blur_score, brightness, contrast),
        }
    }

    pub fn is_good(&self) -> bool {
        self.blur_score >= BLURRY_BELOW
            && (DARK_BELOW..=BRIGHT_ABOVE).contains(&self.brightness)
            && self.contrast >= LOW_CONTRAST_BELOW
    }
}

fn grayscale(frame: &Frame) -> Array2<f64> {
    let px = frame.as_ndarray();
    Array2::from_shape_fn((frame.height() as usize, frame.width() as usize), |(y, x)| {
        0.299 * px[[y, x, 0]] as f64 + 0.587 * px[[y, x, 1]] as f64 + 0.114 * px[[y, x, 2]] as f64
    })
}

/// 4-neighbour Laplacian over interior pixels.
fn laplacian_variance(gray: &Array2<f64>) -> f64 {
    let (h, w) = gray.dim();
    if h < 3 || w < 3 {
        return 0.0;
    }
    let responses = Array2::from_shape_fn((h - 2, w - 2), |(y, x)| {
        let (y, x) = (y + 1, x + 1);
        gray[[y - 1, x]] + gray[[y + 1, x]] + gray[[y, x - 1]] + gray[[y, x + 1]]
            - 4.0 * gray[[y, x]]
    });
    responses.var(0.0)
}

fn recommendations(blur: f64, brightness: f64, contrast: f64) -> Vec<String> {
    let mut out = Vec::new();
    if blur < BLURRY_BELOW {
        out.push("Image appears blurry. Hold camera steady and focus on the object.".into());
    }
    if brightness < DARK_BELOW {
        out.push(
            "Image is too dark. Try better lighting or move closer to a light source.".into(),
        );
    } else if brightness > BRIGHT_ABOVE {
        out.push("Image is too bright. Reduce lighting or move away from direct light.".into());
    }
    if contrast < LOW_CONTRAST_BELOW {
        out.push("Low contrast detected. Ensure good lighting and clear background.".into());
    }
    if out.is_empty() {
        out.push("Image quality is good for detection.".into());
    }
    out
}
