// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output grid.  One contiguous allocation, laid out so that the
//! axis the render is partitioned along is the major axis: a run of
//! rows (or columns) is then a single contiguous slice, and the buffer
//! can be split into disjoint mutable bands that workers own outright
//! for the duration of the render.

use std::ops::Range;
use std::str::FromStr;

use colors::Rgb;
use errors::RenderError;
use planes::Pixel;

/// The axis along which the grid is cut into bands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Bands of whole rows; the buffer is row-major.
    Rows,
    /// Bands of whole columns; the buffer is column-major.
    Columns,
}

impl FromStr for Axis {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" => Ok(Axis::Rows),
            "columns" => Ok(Axis::Columns),
            _ => Err(RenderError::invalid("axis", s)),
        }
    }
}

/// A `width × height` grid of resolved colors.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    axis: Axis,
    cells: Vec<Rgb>,
}

impl PixelBuffer {
    /// Allocate a black grid.
    pub fn new(width: usize, height: usize, axis: Axis) -> Self {
        PixelBuffer {
            width,
            height,
            axis,
            cells: vec![Rgb::BLACK; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The partition axis this buffer is laid out for.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// How many rows or columns there are to hand out.
    pub fn axis_len(&self) -> usize {
        match self.axis {
            Axis::Rows => self.height,
            Axis::Columns => self.width,
        }
    }

    fn cross_len(&self) -> usize {
        match self.axis {
            Axis::Rows => self.width,
            Axis::Columns => self.height,
        }
    }

    fn offset(&self, pixel: Pixel) -> Option<usize> {
        if pixel.0 >= self.width || pixel.1 >= self.height {
            return None;
        }
        Some(match self.axis {
            Axis::Rows => pixel.1 * self.width + pixel.0,
            Axis::Columns => pixel.0 * self.height + pixel.1,
        })
    }

    /// The color at a pixel, if it is on the grid.
    pub fn get(&self, pixel: Pixel) -> Option<Rgb> {
        self.offset(pixel).map(|offset| self.cells[offset])
    }

    /// Split the buffer into one mutable band per range.  The ranges
    /// must be ascending, contiguous, and start at zero, which is what
    /// `scheduler::partition` and `scheduler::granulate` produce.
    /// Anything past the final range is left out.
    pub fn bands_mut(&mut self, ranges: &[Range<usize>]) -> Vec<Band> {
        let axis = self.axis;
        let cross_len = self.cross_len();
        let mut rest: &mut [Rgb] = &mut self.cells;
        let mut consumed = 0;
        let mut bands = Vec::with_capacity(ranges.len());
        for range in ranges {
            debug_assert_eq!(range.start, consumed);
            let (cells, tail) = { rest }.split_at_mut(range.len() * cross_len);
            rest = tail;
            consumed = range.end;
            bands.push(Band {
                axis,
                range: range.clone(),
                cross_len,
                cells,
            });
        }
        bands
    }

    /// Row-major RGB bytes, three per pixel, for the image encoders.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let offset = match self.axis {
                    Axis::Rows => y * self.width + x,
                    Axis::Columns => x * self.height + y,
                };
                bytes.extend_from_slice(&self.cells[offset].to_rgb8());
            }
        }
        bytes
    }
}

/// A run of whole rows or columns, exclusively borrowed from a
/// `PixelBuffer`.
#[derive(Debug)]
pub struct Band<'a> {
    axis: Axis,
    range: Range<usize>,
    cross_len: usize,
    cells: &'a mut [Rgb],
}

impl<'a> Band<'a> {
    /// The rows or columns this band covers.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Write every cell in the band exactly once, stopping at the first
    /// pixel `resolve` fails on.
    pub fn fill<F>(&mut self, resolve: F) -> Result<(), RenderError>
    where
        F: Fn(Pixel) -> Result<Rgb, RenderError>,
    {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let major = self.range.start + i / self.cross_len;
            let minor = i % self.cross_len;
            let pixel = match self.axis {
                Axis::Rows => Pixel(minor, major),
                Axis::Columns => Pixel(major, minor),
            };
            *cell = resolve(pixel)?;
        }
        Ok(())
    }
}
