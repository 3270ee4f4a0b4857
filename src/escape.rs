// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  For each pixel, take the point at its
//! center and repeatedly square it and add the original point back,
//! counting how many steps it takes for the magnitude to reach 2.
//! Points that never get there within the color table's cap are in
//! the Mandelbrot set.

use num::Complex;

use colors::{ColorTable, Rgb};
use errors::RenderError;
use planes::{Pixel, PlaneMapper, Viewport};

/// The classic iterator.  Returns the number of iterations performed
/// before `|z|² ≥ 4`, or `max_iterations` if that never happens.  Any
/// point that is checked at all has been iterated at least once, so
/// the result is never zero for a non-zero cap.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iterations: usize) -> usize {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut iterations = 0;
    while z.norm_sqr() < 4.0 && iterations < max_iterations {
        z = z * z + c;
        iterations += 1;
    }
    iterations
}

/// A pixel and its iteration count.  Consumed as soon as it has been
/// given a color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelResult {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Iterations in [1, max_iterations].
    pub iterations: usize,
}

/// Everything a worker needs to turn a pixel into a color: the plane
/// mapping and a shared, read-only color table.
#[derive(Copy, Clone, Debug)]
pub struct EscapeTimeKernel<'a> {
    planes: PlaneMapper,
    colors: &'a ColorTable,
    max_iterations: usize,
}

impl<'a> EscapeTimeKernel<'a> {
    /// Constructor.
    pub fn new(viewport: &Viewport, colors: &'a ColorTable) -> Self {
        EscapeTimeKernel {
            planes: PlaneMapper::new(viewport),
            colors,
            max_iterations: colors.max_iterations(),
        }
    }

    /// The iteration cap in force.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run the escape-time iteration for one pixel.  Fails if the pixel
    /// maps to a point that is not a finite number, which only happens
    /// when the viewport arithmetic overflows.
    pub fn iterate(&self, pixel: Pixel) -> Result<PixelResult, RenderError> {
        let c = self.planes.pixel_to_point(&pixel);
        if !(c.re.is_finite() && c.im.is_finite()) {
            return Err(RenderError::Computation {
                x: pixel.0,
                y: pixel.1,
                message: format!("pixel maps to non-finite point {}", c),
            });
        }
        Ok(PixelResult {
            x: pixel.0,
            y: pixel.1,
            iterations: escape_time(c, self.max_iterations),
        })
    }

    /// Iterate one pixel and resolve its color.
    pub fn resolve(&self, pixel: Pixel) -> Result<Rgb, RenderError> {
        self.iterate(pixel)
            .map(|result| self.colors.lookup(result.iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 10_000), 10_000);
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 500), 500);
    }

    #[test]
    fn far_points_escape_on_the_first_check() {
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 10_000), 1);
        assert_eq!(escape_time(Complex::new(-2.0, 1.5), 10_000), 1);
    }

    #[test]
    fn boundary_points_take_a_few_steps() {
        // 1 -> 2 -> 5
        assert_eq!(escape_time(Complex::new(1.0, 0.0), 100), 2);
        // -2 stays on the circle of radius 2 and escapes on the first check.
        assert_eq!(escape_time(Complex::new(-2.0, 0.0), 100), 1);
    }

    #[test]
    fn kernel_resolves_with_the_table() {
        let colors = ColorTable::default();
        let viewport = Viewport::new((-2.0, 1.0), (-1.5, 1.5), 100, 100).unwrap();
        let kernel = EscapeTimeKernel::new(&viewport, &colors);
        assert_eq!(kernel.max_iterations(), 10_000);

        let corner = kernel.iterate(Pixel(0, 0)).unwrap();
        assert_eq!(corner.iterations, 1);
        assert_eq!(kernel.resolve(Pixel(0, 0)).unwrap(), colors.stops()[0].color);

        let center = kernel.iterate(Pixel(66, 50)).unwrap();
        assert_eq!(center.iterations, 10_000);
    }

    #[test]
    fn overflowing_viewport_is_a_computation_failure() {
        let colors = ColorTable::default();
        let viewport = Viewport::new((-1e308, 1e308), (-1.0, 1.0), 4, 4).unwrap();
        let kernel = EscapeTimeKernel::new(&viewport, &colors);
        match kernel.iterate(Pixel(1, 2)) {
            Err(RenderError::Computation { x, y, .. }) => assert_eq!((x, y), (1, 2)),
            other => panic!("expected a computation failure, got {:?}", other),
        }
    }
}
