use crate::shared::frame::Frame;

/// Color adjustments applied to a still before it is classified.
///
/// Matches a canvas filter chain of `contrast() brightness() saturate()`:
/// each step works on normalized channels and clamps to `[0, 1]` before the
/// next one runs. Alpha is left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoEnhancement {
    pub contrast: f64,
    pub brightness: f64,
    pub saturation: f64,
}

impl Default for PhotoEnhancement {
    fn default() -> Self {
        Self {
            contrast: 1.1,
            brightness: 1.05,
            saturation: 1.1,
        }
    }
}

impl PhotoEnhancement {
    pub const IDENTITY: PhotoEnhancement = PhotoEnhancement {
        contrast: 1.0,
        brightness: 1.0,
        saturation: 1.0,
    };

    pub fn apply(&self, frame: &Frame) -> Frame {
        let channels = frame.channels() as usize;
        let mut data = frame.data().to_vec();
        for px in data.chunks_exact_mut(channels) {
            let rgb = [px[0], px[1], px[2]].map(|c| c as f64 / 255.0);
            let [r, g, b] = self.adjust(rgb);
            px[0] = to_byte(r);
            px[1] = to_byte(g);
            px[2] = to_byte(b);
        }
        Frame::new(data, frame.width(), frame.height(), frame.channels(), frame.index())
    }

    fn adjust(&self, rgb: [f64; 3]) -> [f64; 3] {
        let rgb = rgb.map(|c| clamp_unit((c - 0.5) * self.contrast + 0.5));
        let [r, g, b] = rgb.map(|c| clamp_unit(c * self.brightness));

        // Luminance-preserving saturation matrix (feColorMatrix "saturate").
        let s = self.saturation;
        [
            (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
            (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
        ]
        .map(clamp_unit)
    }
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn to_byte(v: f64) -> u8 {
    (v * 255.0).round() as u8
}
