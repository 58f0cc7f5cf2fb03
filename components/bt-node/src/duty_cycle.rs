//! Reporting rate of the light sensor node.
//!
//! In `Normal` the node reports once per `normal_period`. A wake signal
//! switches it to `Burst`, which reports `burst_count` times at
//! `burst_interval` and then falls back to `Normal`.

use embassy_time::{Duration, Timer};

use crate::config;
use crate::net::Transport;
use crate::report::Reporter;
use crate::sensor::SensorSource;
use crate::wake::{WakeReason, WakeSignal};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub normal_period: Duration,
    pub burst_count: usize,
    pub burst_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            normal_period: Duration::from_secs(config::NORMAL_PERIOD_SECS),
            burst_count: config::BURST_COUNT,
            burst_interval: Duration::from_millis(config::BURST_INTERVAL_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyCycleState {
    Normal,
    Burst,
}

pub struct Controller<'a, S: SensorSource, T: Transport> {
    reporter: Reporter<'a, S, T>,
    wake: &'a WakeSignal,
    config: Config,
    state: DutyCycleState,
}

pub fn new<'a, S: SensorSource, T: Transport>(
    reporter: Reporter<'a, S, T>,
    wake: &'a WakeSignal,
    config: Config,
) -> Controller<'a, S, T> {
    Controller {
        reporter,
        wake,
        config,
        state: DutyCycleState::Normal,
    }
}

impl<'a, S: SensorSource, T: Transport> Controller<'a, S, T> {
    pub fn state(&self) -> DutyCycleState {
        self.state
    }

    /// Runs one step of the state machine: a normal period wait (with at most
    /// one report) or a complete burst.
    pub async fn once(&mut self) {
        match self.state {
            DutyCycleState::Normal => match self.wake.wait_or_timeout(self.config.normal_period).await {
                WakeReason::Woken => {
                    info!("Wake signal => burst of {} reports", self.config.burst_count);
                    self.state = DutyCycleState::Burst;
                }
                WakeReason::TimedOut => {
                    let _ = self.reporter.report_once().await;
                }
            },
            DutyCycleState::Burst => {
                for cycle in 0..self.config.burst_count {
                    trace!("Burst report {}/{}", cycle + 1, self.config.burst_count);
                    let _ = self.reporter.report_once().await;
                    Timer::after(self.config.burst_interval).await;
                }
                if self.wake.is_pending() {
                    debug!("Dropping wake signal raised during burst");
                }
                self.wake.clear();
                self.state = DutyCycleState::Normal;
                info!("Burst done => normal period {} s", self.config.normal_period.as_secs());
            }
        }
    }

    pub async fn run(mut self) -> ! {
        info!("Duty cycle controller started with {:?}", self.config);
        loop {
            self.once().await;
        }
    }
}
