#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c` back, starting
//! from zero, never runs off to infinity.  Points outside the set do
//! run off, some quickly and some only after thousands of steps, and
//! that "velocity" is what gives the familiar image its color.
//!
//! This crate renders a rectangle of the plane onto a pixel grid.
//! Each pixel's center is iterated until it escapes or hits the color
//! table's cap, the iteration count picks a color band from the
//! table, and the grid is split into disjoint bands of rows or columns
//! so that every thread writes only its own part of the buffer.

extern crate crossbeam;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate tempfile;

pub mod colors;
pub mod config;
pub mod errors;
pub mod escape;
pub mod pixels;
pub mod planes;
pub mod scheduler;
pub mod sink;

pub use colors::{ColorStop, ColorTable, Rgb};
pub use config::RenderConfig;
pub use errors::RenderError;
pub use escape::{escape_time, EscapeTimeKernel, PixelResult};
pub use pixels::{Axis, PixelBuffer};
pub use planes::{Pixel, PlaneMapper, Viewport};
pub use scheduler::{FixedChunks, PartitionExecutor, Strategy, WorkerPool};
pub use sink::{ImageFileSink, ImageSink, PnmSink};

/// Render `viewport` with `colors`, fanning the work out through
/// `executor`.  The buffer is laid out along `axis` and only returned
/// once every worker has finished; if any of them failed, nothing is
/// returned but the error.
pub fn render(
    viewport: &Viewport,
    colors: &ColorTable,
    executor: &dyn PartitionExecutor,
    axis: Axis,
) -> Result<PixelBuffer, RenderError> {
    debug!(
        "rendering {}x{} on {} threads by {:?}, {} colors, cap {}",
        viewport.width,
        viewport.height,
        executor.threads(),
        axis,
        colors.len(),
        colors.max_iterations()
    );
    let kernel = EscapeTimeKernel::new(viewport, colors);
    let mut buffer = PixelBuffer::new(viewport.width, viewport.height, axis);
    executor.execute(&mut buffer, &kernel)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Viewport {
        Viewport::new((-2.0, 1.0), (-1.5, 1.5), 100, 100).unwrap()
    }

    #[test]
    fn origin_is_interior_and_corner_is_the_first_band() {
        let colors = ColorTable::default();
        let buffer = render(&scene(), &colors, &WorkerPool::new(4), Axis::Rows).unwrap();
        let interior = colors.stops()[colors.len() - 1].color;

        // x = -2 + (66.5 * 3 / 100) is the column center nearest zero.
        assert_eq!(buffer.get(Pixel(66, 50)), Some(interior));
        assert_eq!(buffer.get(Pixel(0, 0)), Some(colors.stops()[0].color));

        let kernel = EscapeTimeKernel::new(&scene(), &colors);
        assert_eq!(kernel.iterate(Pixel(0, 0)).unwrap().iterations, 1);
    }

    #[test]
    fn same_image_for_any_thread_count_or_strategy() {
        let colors = ColorTable::default();
        let reference = render(&scene(), &colors, &FixedChunks::new(1), Axis::Rows)
            .unwrap()
            .to_rgb8();
        for &threads in &[1, 2, 8] {
            for &strategy in &[Strategy::Pool, Strategy::Chunks] {
                for &axis in &[Axis::Rows, Axis::Columns] {
                    let executor = strategy.executor(threads);
                    let buffer = render(&scene(), &colors, executor.as_ref(), axis).unwrap();
                    assert_eq!(buffer.to_rgb8(), reference);
                }
            }
        }
    }

    #[test]
    fn failed_render_returns_no_buffer() {
        let colors = ColorTable::default();
        let viewport = Viewport::new((-1e308, 1e308), (-1.5, 1.5), 8, 8).unwrap();
        assert!(render(&viewport, &colors, &FixedChunks::new(2), Axis::Rows).is_err());
    }
}
