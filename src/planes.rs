// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, which pairs a rectangle on the complex plane
//! with the size of the integral pixel grid it is rendered onto, and
//! the PlaneMapper, which maps pixels from one to the other.
use num::Complex;

use errors::RenderError;

/// Describes the column, row of a pixel on the integral plane.  Row 0
/// is the top of the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// A rectangle on the complex plane and the pixel grid it lands on.
/// Validated on construction and never changed during a render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real-axis start.
    pub x_start: f64,
    /// Real-axis end; greater than `x_start`.
    pub x_end: f64,
    /// Imaginary-axis start (bottom of the image).
    pub y_start: f64,
    /// Imaginary-axis end (top of the image); greater than `y_start`.
    pub y_end: f64,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
}

impl Viewport {
    /// Constructor.  Rejects empty grids, inverted or degenerate ranges,
    /// and non-finite bounds.
    pub fn new(
        (x_start, x_end): (f64, f64),
        (y_start, y_end): (f64, f64),
        width: usize,
        height: usize,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::invalid(
                "image size",
                format!("{}x{} has no pixels", width, height),
            ));
        }
        if width.checked_mul(height).and_then(|n| n.checked_mul(3)).is_none() {
            return Err(RenderError::invalid(
                "image size",
                format!("{}x{} is too large", width, height),
            ));
        }
        let bounds = [x_start, x_end, y_start, y_end];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RenderError::invalid(
                "viewport",
                format!("{:?} is not finite", bounds),
            ));
        }
        if x_end <= x_start {
            return Err(RenderError::invalid(
                "x range",
                format!("x_end {} is not greater than x_start {}", x_end, x_start),
            ));
        }
        if y_end <= y_start {
            return Err(RenderError::invalid(
                "y range",
                format!("y_end {} is not greater than y_start {}", y_end, y_start),
            ));
        }
        Ok(Viewport {
            x_start,
            x_end,
            y_start,
            y_end,
            width,
            height,
        })
    }

    /// The total number of pixels in the grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// A validated viewport always has pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps the center of each pixel to a point on the complex plane.  The
/// image's y-axis points down while the imaginary axis points up, so
/// the y-range is negated and swapped once, here, rather than for
/// every pixel.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    // Left and top edges of the flipped plane.
    origin: Complex<f64>,
    // Width and height of the plane.
    span: (f64, f64),
    // Width and height of the grid.
    grid: (f64, f64),
}

impl PlaneMapper {
    /// Build the mapping for a viewport.
    pub fn new(viewport: &Viewport) -> PlaneMapper {
        let (y_start, y_end) = (-viewport.y_end, -viewport.y_start);
        PlaneMapper {
            origin: Complex::new(viewport.x_start, y_start),
            span: (viewport.x_end - viewport.x_start, y_end - y_start),
            grid: (viewport.width as f64, viewport.height as f64),
        }
    }

    /// Given a pixel on the integral plane, return the complex number at
    /// the center of that pixel.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            ((pixel.0 as f64 + 0.5) * self.span.0) / self.grid.0 + self.origin.re,
            ((pixel.1 as f64 + 0.5) * self.span.1) / self.grid.1 + self.origin.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: usize, h: usize, x: (f64, f64), y: (f64, f64)) -> Viewport {
        Viewport::new(x, y, w, h).unwrap()
    }

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new((1.0, -1.0), (-1.0, 1.0), 4, 4).is_err());
        assert!(Viewport::new((-1.0, 1.0), (1.0, -1.0), 4, 4).is_err());
        assert!(Viewport::new((-1.0, -1.0), (-1.0, 1.0), 4, 4).is_err());
        assert!(Viewport::new((-1.0, 1.0), (-1.0, 1.0), 0, 4).is_err());
        assert!(Viewport::new((-1.0, 1.0), (-1.0, 1.0), 4, 0).is_err());
        assert!(Viewport::new((-1.0, std::f64::NAN), (-1.0, 1.0), 4, 4).is_err());
    }

    #[test]
    fn viewport_fails_on_oversized_grid() {
        let huge = 1usize << (std::mem::size_of::<usize>() * 4 + 1);
        assert!(Viewport::new((-1.0, 1.0), (-1.0, 1.0), huge, huge).is_err());
        assert!(Viewport::new((-1.0, 1.0), (-1.0, 1.0), std::usize::MAX, 1).is_err());
        assert!(Viewport::new((-1.0, 1.0), (-1.0, 1.0), std::usize::MAX / 3, 1).is_ok());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        let v = viewport(4, 3, (-1.0, 1.0), (-1.0, 1.0));
        assert_eq!(v.len(), 12);
    }

    #[test]
    fn pixel_centers_on_positive_planes() {
        let pm = PlaneMapper::new(&viewport(5, 5, (0.0, 5.0), (0.0, 5.0)));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.5, -4.5));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.5, -2.5));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.5, -0.5));
    }

    #[test]
    fn y_range_is_negated_and_swapped() {
        let pm = PlaneMapper::new(&viewport(4, 4, (-2.0, 2.0), (-2.0, 2.0)));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-1.5, -1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 3)), Complex::new(1.5, 1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 1)), Complex::new(0.5, -0.5));
    }

    #[test]
    fn asymmetric_y_range_is_flipped_not_mirrored() {
        // y in [0, 2] becomes [-2, 0] after the flip.
        let pm = PlaneMapper::new(&viewport(1, 2, (0.0, 1.0), (0.0, 2.0)));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.5, -1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 1)), Complex::new(0.5, -0.5));
    }
}
