// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The color table: an ordered list of iteration thresholds, each
//! with the color used for every iteration count from that threshold
//! up to the next.  Colors are banded, never interpolated.  The last
//! threshold is also the iteration cap for the whole render.

use itertools::Itertools;
use num::clamp;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use errors::RenderError;

/// A color with each channel in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    /// The interior color.
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    /// Quantize to eight bits per channel.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| clamp((c * 255.0).round(), 0.0, 255.0) as u8;
        [q(self.0), q(self.1), q(self.2)]
    }
}

/// "From this iteration count onward, use this color."
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorStop {
    /// The first iteration count this stop applies to.  Always > 0.
    pub threshold: usize,
    /// The color for that band.
    pub color: Rgb,
}

impl ColorStop {
    /// Shorthand constructor.
    pub fn new(threshold: usize, color: Rgb) -> Self {
        ColorStop { threshold, color }
    }
}

const DEFAULT_STOPS: [(usize, Rgb); 9] = [
    (1, Rgb(0.0, 0.0, 0.0)),
    (15, Rgb(0.0, 0.5, 0.5)),
    (20, Rgb(0.0, 1.0, 1.0)),
    (30, Rgb(1.0, 1.0, 0.0)),
    (100, Rgb(1.0, 0.75, 0.0)),
    (500, Rgb(1.0, 0.5, 0.0)),
    (1000, Rgb(1.0, 0.25, 0.0)),
    (5000, Rgb(0.25, 0.0, 0.0)),
    (10_000, Rgb(0.0, 0.0, 0.0)),
];

/// An immutable, non-empty sequence of color stops.  Built once before
/// rendering and shared read-only by every worker.
///
/// Thresholds are expected to ascend but this is not enforced; lookup
/// scans in table order and stops at the first threshold it has not
/// reached, so an out-of-order stop shadows everything after it.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {
    stops: Vec<ColorStop>,
}

impl Default for ColorTable {
    fn default() -> Self {
        ColorTable {
            stops: DEFAULT_STOPS
                .iter()
                .map(|&(threshold, color)| ColorStop::new(threshold, color))
                .collect(),
        }
    }
}

impl ColorTable {
    /// Build a table from explicit stops.  Fails if there are none or if
    /// any threshold is zero.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, RenderError> {
        if stops.is_empty() {
            return Err(RenderError::parse(0, "color table has no entries"));
        }
        if let Some(index) = stops.iter().position(|s| s.threshold == 0) {
            return Err(RenderError::parse(
                index + 1,
                "iteration threshold must be greater than zero",
            ));
        }
        Ok(ColorTable { stops })
    }

    /// Read a color file from disk.  See `parse` for the format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RenderError::io(path, e))?;
        ColorTable::parse(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a color table, one stop per line:
    ///
    /// ```text
    /// <iterations> <r> <g> <b>
    /// ```
    ///
    /// Fields are separated by spaces or tabs, blank lines are skipped,
    /// and there is no comment syntax.  `source` names the input in the
    /// error raised for an empty table.
    pub fn parse<R: BufRead>(reader: R, source: &str) -> Result<Self, RenderError> {
        let mut stops = vec![];
        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            let line = line.map_err(|e| RenderError::parse(number, e.to_string()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            stops.push(parse_stop(line, number)?);
        }
        if stops.is_empty() {
            return Err(RenderError::parse(0, format!("nothing in \"{}\"", source)));
        }
        ColorTable::new(stops)
    }

    /// The stops, in table order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Number of stops.  Never zero.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; a table cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The iteration cap: the threshold of the final stop.
    pub fn max_iterations(&self) -> usize {
        self.stops[self.stops.len() - 1].threshold
    }

    /// The color for an iteration count: the color of the last stop
    /// reached while scanning in table order, or the first stop's color
    /// if none is reached.
    pub fn lookup(&self, iterations: usize) -> Rgb {
        let mut selected = 0;
        for (index, stop) in self.stops.iter().enumerate().skip(1) {
            if iterations >= stop.threshold {
                selected = index;
            } else {
                break;
            }
        }
        self.stops[selected].color
    }
}

fn parse_stop(line: &str, number: usize) -> Result<ColorStop, RenderError> {
    let mut fields = line.split_whitespace();
    let (iterations, r, g, b) = match fields.next_tuple() {
        Some(fields) => fields,
        None => return Err(RenderError::parse(number, "not enough fields")),
    };
    if fields.next().is_some() {
        return Err(RenderError::parse(number, "too many fields"));
    }

    let threshold = iterations.parse::<usize>().map_err(|_| {
        RenderError::parse(number, format!("invalid iteration count \"{}\"", iterations))
    })?;
    if threshold == 0 {
        return Err(RenderError::parse(
            number,
            "iteration threshold must be greater than zero",
        ));
    }

    Ok(ColorStop::new(
        threshold,
        Rgb(
            parse_channel(r, number)?,
            parse_channel(g, number)?,
            parse_channel(b, number)?,
        ),
    ))
}

fn parse_channel(token: &str, number: usize) -> Result<f32, RenderError> {
    match token.parse::<f32>() {
        Ok(c) if c >= 0.0 && c <= 1.0 => Ok(c),
        Ok(_) => Err(RenderError::parse(
            number,
            format!("color component \"{}\" is outside [0, 1]", token),
        )),
        Err(_) => Err(RenderError::parse(
            number,
            format!("invalid color component \"{}\"", token),
        )),
    }
}
