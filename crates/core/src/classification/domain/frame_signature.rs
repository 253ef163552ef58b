use crate::shared::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Coarse color statistics of a subsampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignature {
    pub mean_r: f64,
    pub mean_g: f64,
    pub mean_b: f64,
    pub brightness: f64,
    pub dominant: Channel,
    pub samples: usize,
}

impl FrameSignature {
    /// Averages every `stride`-th pixel.
    ///
    /// The stride is widened when needed so that no more than `max_samples`
    /// pixels are read, which bounds the cost of a cycle on large frames.
    /// Returns `None` for an empty frame.
    pub fn sample(frame: &Frame, stride: usize, max_samples: usize) -> Option<Self> {
        if frame.is_empty() {
            return None;
        }
        let stride = effective_stride(frame.pixel_count(), stride, max_samples);

        let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0usize);
        for [pr, pg, pb] in frame.sampled_rgb(stride) {
            r += pr as u64;
            g += pg as u64;
            b += pb as u64;
            n += 1;
        }
        Some(Self::from_means(
            r as f64 / n as f64,
            g as f64 / n as f64,
            b as f64 / n as f64,
            n,
        ))
    }

    pub fn from_means(mean_r: f64, mean_g: f64, mean_b: f64, samples: usize) -> Self {
        let dominant = if mean_r > mean_g && mean_r > mean_b {
            Channel::Red
        } else if mean_g > mean_b {
            Channel::Green
        } else {
            Channel::Blue
        };
        Self {
            mean_r,
            mean_g,
            mean_b,
            brightness: (mean_r + mean_g + mean_b) / 3.0,
            dominant,
            samples,
        }
    }
}

fn effective_stride(pixels: usize, stride: usize, max_samples: usize) -> usize {
    let stride = stride.max(1);
    let max_samples = max_samples.max(1);
    stride.max(pixels.div_ceil(max_samples))
}
