use std::path::Path;
use anyhow::Error;
use ndarray::{ArrayView2, Axis};
use opencv::core::{Mat, MatTraitConst, MatTraitConstManual};
use opencv::imgcodecs::{imread, IMREAD_COLOR};
use opencv::imgproc::{COLOR_BGR2RGB, cvt_color};
use crate::utils::coordinate::{Coordinate2D, LandmarkSet};

/// An RGB image decoded into a packed, row-major pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub const CHANNELS: usize = 3;

    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        DecodedImage { pixels, width, height }
    }
}

/// read_image decodes the image file at `path` into RGB pixels.
///
/// Returns `Ok(None)` when the file exists but is not a decodable image.
///
/// # Arguments
/// * `path` - Path of the image file
///
/// # Returns
/// * `Result<Option<DecodedImage>, Error>`
pub fn read_image(path: &Path) -> Result<Option<DecodedImage>, Error> {
    let path_str = match path.to_str() {
        Some(path_str) => path_str,
        None => return Err(Error::msg(format!("image path is not valid utf-8: {}", path.display()))),
    };

    let img_bgr = imread(path_str, IMREAD_COLOR)?;
    if img_bgr.empty() {
        return Ok(None)
    }

    let mut img_rgb = Mat::default();
    cvt_color(&img_bgr, &mut img_rgb, COLOR_BGR2RGB, 0)?;

    let size = img_rgb.size()?;
    let img_rgb = if img_rgb.is_continuous() { img_rgb } else { img_rgb.try_clone()? };
    let pixels = img_rgb.data_bytes()?.to_vec();

    Ok(Some(DecodedImage::new(pixels, size.width as u32, size.height as u32)))
}

/// convert_ndarray_to_landmarks turns a `[N, 2]` or `[N, 3]` landmark tensor
/// into a landmark set. Only the x and y columns are kept.
///
/// # Arguments
/// * `arr` - Two-dimensional landmark tensor
///
/// # Returns
/// * `Result<LandmarkSet, Error>`
pub fn convert_ndarray_to_landmarks(arr: ArrayView2<f32>) -> Result<LandmarkSet, Error> {
    if arr.ncols() < 2 {
        return Err(Error::msg(format!("landmark tensor needs at least 2 columns, got {}", arr.ncols())))
    }

    let points: Vec<Coordinate2D> = arr
        .axis_iter(Axis(0))
        .map(|row| Coordinate2D::new(row[0], row[1]))
        .collect();

    Ok(LandmarkSet::new(points))
}
