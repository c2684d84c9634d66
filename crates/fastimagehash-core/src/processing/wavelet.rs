//! # Wavelet hash (whash)
//!
//! The image is resampled to `img_scale` pixels on a side (a power of two) and decomposed with
//! a 2D discrete wavelet transform until the approximation (LL) band is `hash_size` wide.
//! Each LL coefficient is compared with the median of the band.
//!
//! Both kernels are orthonormal. Haar uses the two-tap average/difference pair. Daubechies-4
//! uses the four-tap filter with periodic extension at the borders. The high-pass filter is
//! always the quadrature mirror `g[k] = (-1)^k h[L-1-k]` of the low-pass filter.
//!
//! With `remove_max_ll` set, the largest-magnitude LL coefficient (usually the one carrying
//! the overall brightness) is left out of the median and its bit is forced to zero.

use image::GrayImage;
use log::trace;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use super::hasher::{
    square_side, validate_hash_size, validate_sample_dim, ImageHasher, DEFAULT_HASH_SIZE,
    MAX_SAMPLE_DIM,
};
use super::matrix::{median, PixelMatrix};
use super::preprocess::resize;
use crate::bits::BitVector;
use crate::error::{Error, Result};
use crate::types::{Hash, HashAlgorithm, WaveKernel};

const SQRT_2: f64 = std::f64::consts::SQRT_2;

const HAAR_LOWPASS: [f64; 2] = [1.0 / SQRT_2, 1.0 / SQRT_2];

/// (1 + √3, 3 + √3, 3 − √3, 1 − √3) / 4√2
const DB4_LOWPASS: [f64; 4] = [
    0.482_962_913_144_534_1,
    0.836_516_303_737_807_9,
    0.224_143_868_042_013_4,
    -0.129_409_522_551_260_4,
];

impl WaveKernel {
    /// Low-pass decomposition filter
    pub fn lowpass(&self) -> &'static [f64] {
        match self {
            WaveKernel::Haar => &HAAR_LOWPASS,
            WaveKernel::Daubechies4 => &DB4_LOWPASS,
        }
    }

    /// High-pass decomposition filter
    pub fn highpass(&self) -> Vec<f64> {
        let h = self.lowpass();
        let len = h.len();
        (0..len)
            .map(|k| {
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                sign * h[len - 1 - k]
            })
            .collect()
    }
}

/// Options for the wavelet hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveletHash {
    pub hash_size: u32,
    /// Side of the resampled image; `None` picks the largest power of two that fits the image
    pub img_scale: Option<u32>,
    pub kernel: WaveKernel,
    pub remove_max_ll: bool,
}

impl Default for WaveletHash {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            img_scale: None,
            kernel: WaveKernel::Haar,
            remove_max_ll: true,
        }
    }
}

impl WaveletHash {
    pub fn new(hash_size: u32) -> Self {
        Self {
            hash_size,
            ..Self::default()
        }
    }

    pub fn with_img_scale(mut self, img_scale: u32) -> Self {
        self.img_scale = Some(img_scale);
        self
    }

    pub fn with_kernel(mut self, kernel: WaveKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_remove_max_ll(mut self, remove_max_ll: bool) -> Self {
        self.remove_max_ll = remove_max_ll;
        self
    }

    /// Sampling side for an image of the given dimensions
    pub fn resolve_scale(&self, width: u32, height: u32) -> u32 {
        match self.img_scale {
            Some(scale) => scale,
            None => {
                let shorter = width.min(height).clamp(1, MAX_SAMPLE_DIM);
                let pow2 = 1u32 << (31 - shorter.leading_zeros());
                pow2.max(self.hash_size)
            }
        }
    }
}

impl ImageHasher for WaveletHash {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Wavelet
    }

    fn validate(&self) -> Result<()> {
        validate_hash_size(HashAlgorithm::Wavelet, self.hash_size, 2)?;
        if !self.hash_size.is_power_of_two() {
            return Err(Error::Configuration(format!(
                "whash size must be a power of two, got {}",
                self.hash_size
            )));
        }
        if let Some(scale) = self.img_scale {
            if !scale.is_power_of_two() || scale < self.hash_size {
                return Err(Error::Configuration(format!(
                    "whash image scale must be a power of two >= {}, got {}",
                    self.hash_size, scale
                )));
            }
            validate_sample_dim(HashAlgorithm::Wavelet, scale as u64)?;
        }
        Ok(())
    }

    fn hash_decoded(&self, image: &GrayImage) -> Result<Hash> {
        self.validate()?;
        let scale = self.resolve_scale(image.width(), image.height());
        let sampled = resize(image, scale, scale)?;
        whash(&sampled, self.hash_size, self.kernel, self.remove_max_ll)
    }
}

/// One decomposition level. The first letter names the horizontal filter, the second the
/// vertical one.
#[derive(Debug, Clone)]
pub struct Subbands {
    pub ll: Array2<f32>,
    pub hl: Array2<f32>,
    pub lh: Array2<f32>,
    pub hh: Array2<f32>,
}

/// Single-level 2D DWT of an array with even dimensions
pub fn dwt_2d(data: &Array2<f32>, kernel: WaveKernel) -> Result<Subbands> {
    let (rows, cols) = data.dim();
    if rows < 2 || cols < 2 || rows % 2 != 0 || cols % 2 != 0 {
        return Err(Error::Configuration(format!(
            "DWT needs even dimensions, got {}x{}",
            cols, rows
        )));
    }

    // Analysis filter pair for this kernel
    let lo = kernel.lowpass();
    let hi = kernel.highpass();

    // Rows: low half on the left, high half on the right
    let mut horizontal = Array2::<f32>::zeros((rows, cols));
    for (src, mut dst) in data.rows().into_iter().zip(horizontal.rows_mut()) {
        let (a, d) = analyze(&src.to_vec(), lo, &hi);
        for (i, v) in a.into_iter().chain(d).enumerate() {
            dst[i] = v;
        }
    }

    // Columns: low half on top, high half below
    let mut full = Array2::<f32>::zeros((rows, cols));
    for (src, mut dst) in horizontal.columns().into_iter().zip(full.columns_mut()) {
        let (a, d) = analyze(&src.to_vec(), lo, &hi);
        for (i, v) in a.into_iter().chain(d).enumerate() {
            dst[i] = v;
        }
    }

    // Split the quadrants into the four sub-bands
    let (h, w) = (rows / 2, cols / 2);
    Ok(Subbands {
        ll: full.slice(s![..h, ..w]).to_owned(),
        hl: full.slice(s![..h, w..]).to_owned(),
        lh: full.slice(s![h.., ..w]).to_owned(),
        hh: full.slice(s![h.., w..]).to_owned(),
    })
}

/// Periodic-extension analysis step: approximation and detail halves
fn analyze(signal: &[f32], lo: &[f64], hi: &[f64]) -> (Vec<f32>, Vec<f32>) {
    let n = signal.len();
    let half = n / 2;
    let mut approx = Vec::with_capacity(half);
    let mut detail = Vec::with_capacity(half);
    for i in 0..half {
        let mut a = 0.0f64;
        let mut d = 0.0f64;
        for (k, (l, h)) in lo.iter().zip(hi.iter()).enumerate() {
            let x = signal[(2 * i + k) % n] as f64;
            a += l * x;
            d += h * x;
        }
        approx.push(a as f32);
        detail.push(d as f32);
    }
    (approx, detail)
}

/// Decompose an S×S matrix until its LL band is `hash_size` wide and return that band
pub fn decompose(matrix: &PixelMatrix, hash_size: u32, kernel: WaveKernel) -> Result<PixelMatrix> {
    let side = square_side(matrix, HashAlgorithm::Wavelet)?;
    let n = hash_size as usize;
    if n == 0 || side < n || side % n != 0 || !(side / n).is_power_of_two() {
        return Err(Error::Configuration(format!(
            "whash cannot reach a {}-wide LL band from a {}-pixel side",
            hash_size, side
        )));
    }

    // Each level halves the LL side; keep only LL between levels
    let mut ll = matrix.data().to_owned();
    let mut level = 0;
    while ll.nrows() > n {
        ll = dwt_2d(&ll, kernel)?.ll;
        level += 1;
        trace!("{} level {}: LL {}x{}", kernel, level, ll.ncols(), ll.nrows());
    }
    Ok(PixelMatrix::from_array(ll))
}

/// Index of the first coefficient with the largest magnitude
pub fn max_magnitude_index(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.iter().enumerate() {
        let magnitude = v.abs();
        match best {
            Some((_, m)) if magnitude <= m => {}
            _ => best = Some((i, magnitude)),
        }
    }
    best.map(|(i, _)| i)
}

/// Hash an S×S matrix (S a power-of-two multiple of `hash_size`)
pub fn whash(
    matrix: &PixelMatrix,
    hash_size: u32,
    kernel: WaveKernel,
    remove_max_ll: bool,
) -> Result<Hash> {
    let coefficients = decompose(matrix, hash_size, kernel)?.to_vec();

    // Pick the coefficient to drop, if any
    let suppressed = if remove_max_ll {
        max_magnitude_index(&coefficients)
    } else {
        None
    };

    // Median over everything except the suppressed coefficient
    let reference: Vec<f32> = coefficients
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != suppressed)
        .map(|(_, v)| *v)
        .collect();
    let threshold = median(&reference);

    // The suppressed position always reads 0
    let bits = coefficients
        .iter()
        .enumerate()
        .map(|(i, &c)| Some(i) != suppressed && c > threshold);

    Hash::new(HashAlgorithm::Wavelet, hash_size, BitVector::from_bools(bits))
}
