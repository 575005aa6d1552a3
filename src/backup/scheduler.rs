//! Repeats backup runs forever with a fixed pause in between.
//!
//! Time is read and spent through [`Clock`] so the loop can be driven without
//! real waiting.

use crate::backup::backup_config::RunConfig;
use crate::backup::result_error::result::Result;

use chrono::{DateTime, TimeDelta, Utc};
use getset::{CopyGetters, Getters};
use std::time::Duration;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// Wall clock, blocks the calling thread while sleeping
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

/// There is no terminal state, the process only stops when killed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Running,
}

#[derive(Getters, CopyGetters)]
pub struct Scheduler<C: Clock> {
    #[getset(get = "pub")]
    config: RunConfig,
    clock: C,
    #[getset(get_copy = "pub")]
    state: SchedulerState,
    /// Completed runs, successful or not
    #[getset(get_copy = "pub")]
    runs: u64,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(config: RunConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            state: SchedulerState::default(),
            runs: 0,
        }
    }

    /// One pass of the running state: back up, report, then sleep for the interval.
    ///
    /// The run's result is logged here and handed back for inspection. It never
    /// changes the state.
    pub fn tick(&mut self) -> Result<usize> {
        match self.state {
            SchedulerState::Running => {
                tracing::info!("Starting backup at {} ...", self.clock.now().to_rfc2822());
                let res = self.config.run_backup();
                match &res {
                    Ok(_) => tracing::info!("File(s) backed up successfully!"),
                    Err(e) => tracing::error!("Error backing up files: {e}"),
                }

                let interval = *self.config.interval();
                match next_run_at(self.clock.now(), interval) {
                    Some(next) => {
                        tracing::info!("Next backup scheduled at {} ...", next.to_rfc2822())
                    }
                    None => tracing::warn!(
                        "Next backup scheduled after {:?}, beyond the representable time",
                        interval
                    ),
                }
                self.clock.sleep(interval);
                self.runs += 1;

                res
            }
        }
    }

    pub fn start_loop(mut self) -> ! {
        loop {
            // Failures are already logged by tick and never stop the loop.
            let _ = self.tick();
        }
    }
}

fn next_run_at(now: DateTime<Utc>, interval: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(interval)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
}
