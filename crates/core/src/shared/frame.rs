use ndarray::ArrayView3;

/// A raster snapshot taken from a live feed: row-major bytes, RGB or RGBA.
///
/// Frames are ephemeral. The detection loop reads one per cycle and drops it
/// once classification has finished.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert!(
            channels == 3 || channels == 4,
            "frames carry RGB or RGBA pixels"
        );
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Builds an RGB frame where every pixel has the same color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(data, width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// A feed that has not delivered video yet reports zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterates `[r, g, b]` for every `stride`-th pixel, alpha ignored.
    pub fn sampled_rgb(&self, stride: usize) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(self.channels as usize)
            .step_by(stride.max(1))
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Copies the frame with the index replaced.
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// Drops the alpha channel if present.
    pub fn to_rgb(&self) -> Frame {
        if self.channels == 3 {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(self.channels as usize)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Frame::new(data, self.width, self.height, 3, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                self.channels as usize,
            ),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }
}
