// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line configuration.  Eight positional arguments are
//! required and a ninth, the color file, is optional:
//!
//! ```text
//! mandelbrot <num_threads> <x_start> <x_end> <y_start> <y_end> \
//!            <image_width> <image_height> <output_path> [<color_file>]
//! ```

use clap::{App, AppSettings, Arg, ArgMatches};
use std::cmp;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use errors::RenderError;
use pixels::Axis;
use planes::Viewport;
use scheduler::Strategy;
use sink;

const THREADS: &str = "num_threads";
const X_START: &str = "x_start";
const X_END: &str = "x_end";
const Y_START: &str = "y_start";
const Y_END: &str = "y_end";
const WIDTH: &str = "image_width";
const HEIGHT: &str = "image_height";
const OUTPUT: &str = "output_path";
const COLORS: &str = "color_file";
const STRATEGY: &str = "strategy";
const AXIS: &str = "axis";

fn positional<'a, 'b>(name: &'a str, index: u64, help: &'b str) -> Arg<'a, 'b> {
    Arg::with_name(name).required(true).index(index).help(help)
}

/// The clap definition of the command line.
pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("mandelbrot")
        .version(crate_version!())
        .about("Parallel escape-time Mandelbrot renderer")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(positional(THREADS, 1, "Number of threads; values below 1 mean 1"))
        .arg(positional(X_START, 2, "Left edge of the complex plane"))
        .arg(positional(X_END, 3, "Right edge of the complex plane"))
        .arg(positional(Y_START, 4, "Bottom edge of the complex plane"))
        .arg(positional(Y_END, 5, "Top edge of the complex plane"))
        .arg(positional(WIDTH, 6, "Image width in pixels"))
        .arg(positional(HEIGHT, 7, "Image height in pixels"))
        .arg(positional(OUTPUT, 8, "Output image; .ppm/.pnm or any format the image crate knows"))
        .arg(
            Arg::with_name(COLORS)
                .required(false)
                .index(9)
                .help("Color table: one '<iterations> <r> <g> <b>' per line"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .short("s")
                .takes_value(true)
                .possible_values(&["pool", "chunks"])
                .default_value("pool")
                .help("How rows or columns are handed to threads"),
        )
        .arg(
            Arg::with_name(AXIS)
                .long(AXIS)
                .short("a")
                .takes_value(true)
                .possible_values(&["rows", "columns"])
                .default_value("rows")
                .help("Partition the image by rows or by columns"),
        )
}

/// Everything one render needs, parsed and validated.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Worker count, already clamped to at least one.
    pub threads: usize,
    /// The region and grid to render.
    pub viewport: Viewport,
    /// Where the image goes.
    pub output: PathBuf,
    /// Optional replacement for the default color table.
    pub colors: Option<PathBuf>,
    /// Which executor to use.
    pub strategy: Strategy,
    /// Which axis to partition along.
    pub axis: Axis,
}

impl RenderConfig {
    /// Parse an argument list (program name first).  clap failures,
    /// including a request for help, come back as `RenderError::Usage`.
    pub fn from_args<I, T>(args: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app()
            .get_matches_from_safe(args)
            .map_err(|e| RenderError::Usage { message: e.message })?;
        RenderConfig::from_matches(&matches)
    }

    /// Build from already-parsed matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, RenderError> {
        let threads: i64 = value(matches, THREADS)?;
        let viewport = Viewport::new(
            (value(matches, X_START)?, value(matches, X_END)?),
            (value(matches, Y_START)?, value(matches, Y_END)?),
            value(matches, WIDTH)?,
            value(matches, HEIGHT)?,
        )?;
        let output = PathBuf::from(matches.value_of_os(OUTPUT).unwrap_or_default());
        sink::check_output(&output)?;
        Ok(RenderConfig {
            threads: cmp::max(threads, 1) as usize,
            viewport,
            output,
            colors: matches.value_of_os(COLORS).map(PathBuf::from),
            strategy: value(matches, STRATEGY)?,
            axis: value(matches, AXIS)?,
        })
    }
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    let raw = matches.value_of(name).unwrap_or_default();
    T::from_str(raw).map_err(|_| RenderError::invalid(name, format!("\"{}\"", raw)))
}
