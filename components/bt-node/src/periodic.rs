use embassy_time::{Duration, Timer};

use crate::net::Transport;
use crate::report::Reporter;
use crate::sensor::SensorSource;

/// Reports at a fixed interval, no wake source.
pub struct Runner<'a, S: SensorSource, T: Transport> {
    reporter: Reporter<'a, S, T>,
    interval: Duration,
}

pub fn new<'a, S: SensorSource, T: Transport>(reporter: Reporter<'a, S, T>, interval: Duration) -> Runner<'a, S, T> {
    Runner { reporter, interval }
}

impl<'a, S: SensorSource, T: Transport> Runner<'a, S, T> {
    pub async fn once(&mut self) {
        let _ = self.reporter.report_once().await;
        Timer::after(self.interval).await;
    }

    pub async fn run(mut self) -> ! {
        info!("Periodic sender started, every {} ms", self.interval.as_millis());
        loop {
            self.once().await;
        }
    }
}
