use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
  /// The merge-and-capture loop.
  Simulate,
  /// Writing snapshots to the output sink.
  Serialize,
}

impl Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Simulate => write!(f, "simulate"),
      Self::Serialize => write!(f, "serialize"),
    }
  }
}

/// Receives progress updates from long-running stages. Purely informational;
/// nothing in the engine depends on what an implementation does.
pub trait Progress {
  fn report(&mut self, stage: Stage, done: usize, total: usize);
}

impl<P: Progress + ?Sized> Progress for &mut P {
  fn report(&mut self, stage: Stage, done: usize, total: usize) {
    (**self).report(stage, done, total)
  }
}

pub struct NoProgress;

impl Progress for NoProgress {
  fn report(&mut self, _stage: Stage, _done: usize, _total: usize) {}
}

/// Logs each update at info level.
pub struct LogProgress;

impl Progress for LogProgress {
  fn report(&mut self, stage: Stage, done: usize, total: usize) {
    tracing::info!(
      "{stage}: {done}/{total} ({}%)",
      (done * 100).checked_div(total).unwrap_or(100)
    );
  }
}

/// Forwards to a `Progress` only when `done` crosses the next 10% boundary
/// of `total`, and once more on completion.
pub struct ProgressTracker<P> {
  sink: P,
  stage: Stage,
  total: usize,
  next_decile: usize,
}

impl<P: Progress> ProgressTracker<P> {
  pub fn new(sink: P, stage: Stage, total: usize) -> Self {
    Self {
      sink,
      stage,
      total,
      next_decile: 1,
    }
  }

  pub fn advance(&mut self, done: usize) {
    if self.next_decile > 10 {
      return;
    }

    // Reports the highest boundary crossed, skipping any jumped over.
    let decile = (done * 10).checked_div(self.total).unwrap_or(10).min(10);
    if decile >= self.next_decile {
      self.next_decile = decile + 1;
      self.sink.report(self.stage, done, self.total);
    }
  }

  pub fn into_inner(self) -> P {
    self.sink
  }
}

#[cfg(test)]
mod tests {
  use googletest::prelude::*;

  use crate::{Progress, ProgressTracker, Stage};

  #[derive(Default)]
  struct Recorder {
    reports: Vec<usize>,
  }

  impl Progress for Recorder {
    fn report(&mut self, _stage: Stage, done: usize, _total: usize) {
      self.reports.push(done);
    }
  }

  #[gtest]
  fn test_reports_each_decile_once() {
    let mut tracker = ProgressTracker::new(Recorder::default(), Stage::Serialize, 100);
    for done in 1..=100 {
      tracker.advance(done);
    }
    expect_that!(
      tracker.into_inner().reports,
      container_eq(vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100])
    );
  }

  #[gtest]
  fn test_small_totals() {
    let mut tracker = ProgressTracker::new(Recorder::default(), Stage::Simulate, 3);
    for done in 1..=3 {
      tracker.advance(done);
    }
    expect_that!(tracker.into_inner().reports, container_eq(vec![1, 2, 3]));
  }

  #[gtest]
  fn test_empty_total_reports_completion() {
    let mut tracker = ProgressTracker::new(Recorder::default(), Stage::Simulate, 0);
    tracker.advance(0);
    tracker.advance(0);
    expect_that!(tracker.into_inner().reports, container_eq(vec![0]));
  }
}
