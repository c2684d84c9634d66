use image::GrayImage;
use ndarray::Array2;

use crate::error::{Error, Result};

/// Grayscale samples indexed `[row, column]`, iterated in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMatrix {
    data: Array2<f32>,
}

impl PixelMatrix {
    /// Build a matrix from row-major samples
    pub fn from_vec(width: usize, height: usize, samples: Vec<f32>) -> Result<Self> {
        let data = Array2::from_shape_vec((height, width), samples).map_err(|e| {
            Error::Configuration(format!("Bad {}x{} sample buffer: {}", width, height, e))
        })?;
        Ok(Self { data })
    }

    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn from_gray(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            image.get_pixel(x as u32, y as u32).0[0] as f32
        });
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[[y, x]]
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f32> {
        self.data
    }

    /// Samples in row-major order
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    pub fn mean(&self) -> f32 {
        mean(self.data.iter().copied())
    }
}

/// Arithmetic mean accumulated in f64 in iteration order
pub fn mean<I: IntoIterator<Item = f32>>(values: I) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for v in values {
        sum += v as f64;
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) as f32
}

/// Median under the IEEE total order. An even count averages the two middle values.
pub fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        ((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0) as f32
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let m = PixelMatrix::from_vec(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.get(2, 0), 2.0);
        assert_eq!(m.get(0, 1), 3.0);
        assert_eq!(m.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(m.mean(), 2.5);
        assert!(PixelMatrix::from_vec(3, 3, vec![0.0; 4]).is_err());
    }

    #[test]
    fn test_from_gray() {
        let img = GrayImage::from_fn(4, 2, |x, y| image::Luma([(x + 10 * y) as u8]));
        let m = PixelMatrix::from_gray(&img);
        assert_eq!(m.get(3, 1), 13.0);
        assert_eq!(m.height(), 2);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[-0.0, 0.0]), 0.0);
        assert_eq!(median(&[]), 0.0);
    }
}
