/// Per-channel luminance distribution of a decoded preview
use image::RgbaImage;

/// RGB histogram data: [R[256], G[256], B[256]]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub data: [[u32; 256]; 3],
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram {
            data: [[0; 256]; 3],
        }
    }
}

impl Histogram {
    /// Empty histogram (all bins zero)
    pub fn new() -> Self {
        Histogram::default()
    }

    /// Count every pixel of `image` into the three channel histograms
    pub fn compute(image: &RgbaImage) -> Self {
        let mut histogram = Histogram::new();
        for pixel in image.pixels() {
            histogram.data[0][pixel[0] as usize] += 1;
            histogram.data[1][pixel[1] as usize] += 1;
            histogram.data[2][pixel[2] as usize] += 1;
        }
        histogram
    }

    /// Largest bin across all channels, used for display normalization
    pub fn max_count(&self) -> u32 {
        self.data
            .iter()
            .flat_map(|channel| channel.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}
