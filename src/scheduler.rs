// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fan the pixel grid out across threads.  Both executors cut the
//! buffer into disjoint bands along its partition axis and hand each
//! band to exactly one thread, so no locking is needed on the pixels
//! themselves.  They differ only in how bands are assigned, and the
//! output never depends on which one is used or how many threads it
//! runs.

extern crate crossbeam;

use crossbeam::thread::ScopedJoinHandle;
use num_cpus;
use std::cmp;
use std::ops::Range;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use errors::RenderError;
use escape::EscapeTimeKernel;
use pixels::{Band, PixelBuffer};

/// Divide `len` into `parts` contiguous ranges of equal size, the last
/// one absorbing the remainder.  `parts` below one is treated as one.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = cmp::max(parts, 1);
    let size = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * size;
            let end = if i == parts - 1 { len } else { start + size };
            start..end
        })
        .collect()
}

/// Divide `len` into ranges of `granularity` (the last may be shorter).
pub fn granulate(len: usize, granularity: usize) -> Vec<Range<usize>> {
    let granularity = cmp::max(granularity, 1);
    (0..len)
        .step_by(granularity)
        .map(|start| start..cmp::min(start + granularity, len))
        .collect()
}

/// Something that can run the kernel over every pixel of a buffer.
pub trait PartitionExecutor: Send + Sync {
    /// Fill `buffer`, blocking until every worker has finished.  If any
    /// worker fails, the first failure is returned once all of them
    /// have been joined.
    fn execute(&self, buffer: &mut PixelBuffer, kernel: &EscapeTimeKernel) -> Result<(), RenderError>;

    /// How many threads this executor runs on.
    fn threads(&self) -> usize;
}

/// A fixed set of workers pulling bands off a shared queue.  Small bands
/// balance better when some regions of the plane are far more expensive
/// than others.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerPool {
    threads: usize,
    granularity: usize,
}

impl WorkerPool {
    /// A pool of `threads` workers taking one row or column at a time.
    pub fn new(threads: usize) -> Self {
        WorkerPool {
            threads: cmp::max(threads, 1),
            granularity: 1,
        }
    }

    /// Hand out `granularity` rows or columns per queue entry.
    pub fn with_granularity(self, granularity: usize) -> Self {
        WorkerPool {
            granularity: cmp::max(granularity, 1),
            ..self
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        WorkerPool::new(num_cpus::get())
    }
}

impl PartitionExecutor for WorkerPool {
    fn execute(&self, buffer: &mut PixelBuffer, kernel: &EscapeTimeKernel) -> Result<(), RenderError> {
        let ranges = granulate(buffer.axis_len(), self.granularity);
        let workers = cmp::max(cmp::min(self.threads, ranges.len()), 1);
        debug!(
            "worker pool: {} workers, {} ranges of {}",
            workers,
            ranges.len(),
            self.granularity
        );
        let queue = Arc::new(Mutex::new(buffer.bands_mut(&ranges).into_iter()));

        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Result<(), RenderError>>> = (0..workers)
                .map(|_| {
                    let queue = queue.clone();
                    spawner.spawn(move |_| -> Result<(), RenderError> {
                        loop {
                            let band = {
                                queue
                                    .lock()
                                    .map_err(|_| RenderError::worker_panicked())?
                                    .next()
                            };
                            match band {
                                Some(mut band) => {
                                    trace!("range {:?}", band.range());
                                    band.fill(|pixel| kernel.resolve(pixel))?;
                                }
                                None => {
                                    return Ok(());
                                }
                            }
                        }
                    })
                })
                .collect();
            join_all(handles)
        })
        .map_err(|_| RenderError::worker_panicked())?
    }

    fn threads(&self) -> usize {
        self.threads
    }
}

/// One equal block per thread, and never more blocks than there are
/// rows or columns.  The calling thread renders the last block itself
/// while the others run in the background.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedChunks {
    threads: usize,
}

impl FixedChunks {
    /// Split the work `threads` ways.
    pub fn new(threads: usize) -> Self {
        FixedChunks {
            threads: cmp::max(threads, 1),
        }
    }
}

impl PartitionExecutor for FixedChunks {
    fn execute(&self, buffer: &mut PixelBuffer, kernel: &EscapeTimeKernel) -> Result<(), RenderError> {
        let parts = cmp::min(self.threads, cmp::max(buffer.axis_len(), 1));
        let ranges = partition(buffer.axis_len(), parts);
        debug!("fixed chunks: {:?}", ranges);
        let mut bands = buffer.bands_mut(&ranges);
        let last = bands.pop();

        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Result<(), RenderError>>> = bands
                .into_iter()
                .map(|mut band| {
                    spawner.spawn(move |_| {
                        trace!("range {:?}", band.range());
                        band.fill(|pixel| kernel.resolve(pixel))
                    })
                })
                .collect();
            let local = fill_band(last, kernel);
            join_all(handles).and(local)
        })
        .map_err(|_| RenderError::worker_panicked())?
    }

    fn threads(&self) -> usize {
        self.threads
    }
}

fn fill_band(band: Option<Band>, kernel: &EscapeTimeKernel) -> Result<(), RenderError> {
    match band {
        Some(mut band) => {
            trace!("range {:?} on the calling thread", band.range());
            band.fill(|pixel| kernel.resolve(pixel))
        }
        None => Ok(()),
    }
}

/// Join every handle, then report the first failure seen.
fn join_all(handles: Vec<ScopedJoinHandle<Result<(), RenderError>>>) -> Result<(), RenderError> {
    let mut outcome = Ok(());
    for handle in handles {
        let joined = match handle.join() {
            Ok(result) => result,
            Err(_) => Err(RenderError::worker_panicked()),
        };
        if outcome.is_ok() {
            outcome = joined;
        }
    }
    outcome
}

/// The executors selectable from the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// `WorkerPool`.
    Pool,
    /// `FixedChunks`.
    Chunks,
}

impl Strategy {
    /// Build the executor for this strategy.
    pub fn executor(self, threads: usize) -> Box<dyn PartitionExecutor> {
        match self {
            Strategy::Pool => Box::new(WorkerPool::new(threads)),
            Strategy::Chunks => Box::new(FixedChunks::new(threads)),
        }
    }
}

impl FromStr for Strategy {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pool" => Ok(Strategy::Pool),
            "chunks" => Ok(Strategy::Chunks),
            _ => Err(RenderError::invalid("strategy", s)),
        }
    }
}
