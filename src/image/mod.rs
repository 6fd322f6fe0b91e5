//! Image views, owned buffers and the geometry helpers built on them.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride; tiling
//! hands such views to the detectors.
//!
//! Detection runs on single-channel `f32` planes. [`gray_from_u8`] converts
//! 8-bit input into that representation.

use crate::util::{IpDetectError, IpResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod pyramid;
pub mod tiles;
pub mod transform;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> IpResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> IpResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(IpDetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> IpResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(IpDetectError::InvalidDimensions { width, height });
        }

        let out_of_bounds = IpDetectError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width);
        let end_y = y.checked_add(height);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) if end_x <= self.width && end_y <= self.height => {}
            _ => return Err(out_of_bounds),
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(IpDetectError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(IpDetectError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

impl<T: Copy> ImageView<'_, T> {
    /// Returns the element at `(x, y)` with edge extension: coordinates
    /// outside the image are clamped to the nearest border pixel.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.stride + cx]
    }

    /// Copies the view into a contiguous owned image.
    pub fn to_owned_image(&self) -> OwnedImage<T> {
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            data.extend_from_slice(&self.data[start..start + self.width]);
        }
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Owned contiguous single-channel image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy> OwnedImage<T> {
    /// Wraps a row-major buffer of exactly `width * height` elements.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> IpResult<Self> {
        if width == 0 || height == 0 {
            return Err(IpDetectError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(IpDetectError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(IpDetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(IpDetectError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> IpResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(IpDetectError::InvalidDimensions { width, height })?;
        Self::from_vec(vec![value; len], width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Writes the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Applies `f` to every pixel, producing a new image of the same size.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> OwnedImage<U> {
        OwnedImage {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Combines two images of identical size pixel by pixel.
    pub fn zip_map<U: Copy, V: Copy>(
        &self,
        other: &OwnedImage<U>,
        f: impl Fn(T, U) -> V,
    ) -> IpResult<OwnedImage<V>> {
        if other.width != self.width || other.height != self.height {
            return Err(IpDetectError::InvalidDimensions {
                width: other.width,
                height: other.height,
            });
        }
        Ok(OwnedImage {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
        })
    }
}

/// Converts an 8-bit grayscale view to `f32` intensities in `[0, 1]`.
pub fn gray_from_u8(view: ImageView<'_, u8>) -> OwnedImage<f32> {
    let mut data = Vec::with_capacity(view.width() * view.height());
    for y in 0..view.height() {
        let start = y * view.stride();
        for &value in &view.as_slice()[start..start + view.width()] {
            data.push(f32::from(value) / 255.0);
        }
    }
    OwnedImage {
        data,
        width: view.width(),
        height: view.height(),
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> IpResult<usize> {
    if width == 0 || height == 0 {
        return Err(IpDetectError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(IpDetectError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(IpDetectError::InvalidDimensions { width, height })?;
    Ok(needed)
}
