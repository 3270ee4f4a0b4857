// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;

use mandelbrot::config::{self, RenderConfig};
use mandelbrot::sink;
use mandelbrot::{ColorTable, RenderError};
use std::time::Instant;

fn run(config: &RenderConfig) -> Result<(), RenderError> {
    let started = Instant::now();

    let colors = match config.colors {
        Some(ref path) => ColorTable::load(path)?,
        None => ColorTable::default(),
    };
    debug!(
        "{:?} strategy, {} threads requested, {} cpus available",
        config.strategy,
        config.threads,
        num_cpus::get()
    );

    let executor = config.strategy.executor(config.threads);
    let phase = Instant::now();
    let buffer = mandelbrot::render(&config.viewport, &colors, executor.as_ref(), config.axis)?;
    info!("mandelbrot: {}ms", phase.elapsed().as_millis());

    let phase = Instant::now();
    sink::sink_for(&config.output).write(&buffer, &config.output)?;
    info!("write: {}ms", phase.elapsed().as_millis());

    info!("Time taken: {}ms", started.elapsed().as_millis());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = config::app().get_matches();
    let outcome = RenderConfig::from_matches(&matches).and_then(|config| run(&config));
    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
