//! Bounded Concurrency Dispatch
//!
//! Runs independent async units of work with at most `limit` in flight.
//!
//! - [`Dispatcher::run_bounded`]: strict. The first failure stops scheduling;
//!   items already in flight run to completion, then the failure is returned.
//! - [`Dispatcher::run_bounded_collecting_errors`]: every item is attempted and
//!   failures are returned next to the successes.
//!
//! Outputs are always in input order, whatever order items complete in.

use std::future::Future;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::debug;

use crate::constants::dispatch::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use crate::types::{CrewError, Result};

/// A failed item and its error
#[derive(Debug, Clone)]
pub struct ItemFailure<I, E> {
    pub item: I,
    pub error: E,
}

/// Output of a collecting run
#[derive(Debug, Clone)]
pub struct Collected<I, T, E> {
    /// Successful outputs, in input order
    pub results: Vec<T>,
    /// Failures, in input order
    pub errors: Vec<ItemFailure<I, E>>,
}

impl<I, T, E> Default for Collected<I, T, E> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Concurrency-limited task runner
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    limit: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CONCURRENCY,
        }
    }
}

impl Dispatcher {
    /// Create a dispatcher; `limit` must be within `1..=MAX_CONCURRENCY`
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 || limit > MAX_CONCURRENCY {
            return Err(CrewError::Config(format!(
                "concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY, limit
            )));
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run `worker` over `items`, returning outputs in input order or the first error.
    ///
    /// `on_progress(completed, total, item)` fires after every completion.
    pub async fn run_bounded<I, T, E, F, Fut, P>(
        &self,
        items: Vec<I>,
        worker: F,
        mut on_progress: P,
    ) -> std::result::Result<Vec<T>, E>
    where
        I: Clone,
        F: Fn(I) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        P: FnMut(usize, usize, &I),
    {
        let total = items.len();
        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
        let mut first_error: Option<E> = None;
        let mut completed = 0;

        self.drive(items, worker, |index, item, result| {
            completed += 1;
            on_progress(completed, total, &item);
            match result {
                Ok(output) => {
                    slots[index] = Some(output);
                    Flow::Continue
                }
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                    Flow::Stop
                }
            }
        })
        .await;

        match first_error {
            Some(error) => Err(error),
            None => Ok(slots.into_iter().flatten().collect()),
        }
    }

    /// Run `worker` over every item, collecting failures instead of aborting.
    pub async fn run_bounded_collecting_errors<I, T, E, F, Fut, S, R>(
        &self,
        items: Vec<I>,
        worker: F,
        mut on_success: S,
        mut on_error: R,
    ) -> Collected<I, T, E>
    where
        I: Clone,
        F: Fn(I) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        S: FnMut(&I, &T),
        R: FnMut(&I, &E),
    {
        let total = items.len();
        let mut slots: Vec<Option<std::result::Result<T, ItemFailure<I, E>>>> =
            (0..total).map(|_| None).collect();

        self.drive(items, worker, |index, item, result| {
            slots[index] = Some(match result {
                Ok(output) => {
                    on_success(&item, &output);
                    Ok(output)
                }
                Err(error) => {
                    on_error(&item, &error);
                    Err(ItemFailure { item, error })
                }
            });
            Flow::Continue
        })
        .await;

        let mut collected = Collected::default();
        for slot in slots.into_iter().flatten() {
            match slot {
                Ok(output) => collected.results.push(output),
                Err(failure) => collected.errors.push(failure),
            }
        }
        collected
    }

    /// Core loop: keep up to `limit` futures in flight, hand each completion to
    /// `on_done`, stop scheduling (but keep draining) once it returns `Stop`.
    async fn drive<I, T, E, F, Fut, C>(&self, items: Vec<I>, worker: F, mut on_done: C)
    where
        I: Clone,
        F: Fn(I) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        C: FnMut(usize, I, std::result::Result<T, E>) -> Flow,
    {
        if items.is_empty() {
            return;
        }

        let mut pending = items.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut stopped = false;

        loop {
            while !stopped && in_flight.len() < self.limit {
                let Some((index, item)) = pending.next() else {
                    break;
                };
                let work = worker(item.clone());
                in_flight.push(async move { (index, item, work.await) });
            }

            let Some((index, item, result)) = in_flight.next().await else {
                break;
            };

            if let Flow::Stop = on_done(index, item, result)
                && !stopped
            {
                stopped = true;
                debug!(
                    "Dispatch stopped after failure ({} still in flight)",
                    in_flight.len()
                );
            }
        }
    }
}
