//! Optional power instrumentation.
//!
//! Boards with power rails can report the energy a detector spends. The
//! harness never assumes such hardware: it holds an [`EnergyProbe`] that is
//! either absent (energy stays zero) or wraps a [`PowerMonitor`].
//!
//! ```rust,ignore
//! use detect_bench::run::{PowerRail, SampledPowerMonitor};
//!
//! let monitor = SampledPowerMonitor::new(vec![
//!     PowerRail::new("INT", || read_int_rail_watts()),
//!     PowerRail::new("PSDDR", || read_ddr_rail_watts()),
//! ]);
//! let harness = harness.with_power_monitor(monitor);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default interval between power samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Measures average power draw over an interval.
pub trait PowerMonitor: Send {
    /// Begin measuring.
    fn start(&mut self) -> Result<()>;

    /// Stop measuring and return the mean power in watts since [`start`](Self::start).
    fn stop(&mut self) -> Result<f64>;
}

/// Energy capability of a harness.
#[derive(Default)]
pub enum EnergyProbe {
    /// No instrumentation; energy is reported as zero.
    #[default]
    Absent,

    /// Instrumentation through a power monitor.
    Present(Box<dyn PowerMonitor>),
}

impl EnergyProbe {
    /// Whether energy is actually measured.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Start measuring the next timed interval.
    pub fn begin(&mut self) -> Result<()> {
        match self {
            Self::Absent => Ok(()),
            Self::Present(monitor) => monitor.start(),
        }
    }

    /// Finish the interval and return the energy in joules spent over `runtime` seconds.
    pub fn finish(&mut self, runtime: f64) -> Result<f64> {
        match self {
            Self::Absent => Ok(0.0),
            Self::Present(monitor) => Ok(monitor.stop()? * runtime),
        }
    }
}

/// A named power rail read in watts.
pub struct PowerRail {
    name: String,
    read: Box<dyn Fn() -> f64 + Send + Sync>,
}

impl PowerRail {
    /// Create a rail from a reader returning the instantaneous power in watts.
    pub fn new(name: impl Into<String>, read: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            read: Box::new(read),
        }
    }

    /// Rail name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct Sampling {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Vec<(f64, usize)>>,
}

/// Samples a set of rails on a background thread.
///
/// The reported power is the sum over rails of each rail's mean sample.
pub struct SampledPowerMonitor {
    rails: Arc<Vec<PowerRail>>,
    interval: Duration,
    active: Option<Sampling>,
}

impl SampledPowerMonitor {
    /// Monitor `rails` at the default interval.
    #[must_use]
    pub fn new(rails: Vec<PowerRail>) -> Self {
        Self::with_interval(rails, DEFAULT_SAMPLE_INTERVAL)
    }

    /// Monitor `rails`, sampling every `interval`.
    #[must_use]
    pub fn with_interval(rails: Vec<PowerRail>, interval: Duration) -> Self {
        Self {
            rails: Arc::new(rails),
            interval,
            active: None,
        }
    }

    /// Names of the monitored rails.
    pub fn rail_names(&self) -> impl Iterator<Item = &str> {
        self.rails.iter().map(PowerRail::name)
    }
}

fn sample_into(rails: &[PowerRail], sums: &mut [(f64, usize)]) {
    for (rail, (sum, count)) in rails.iter().zip(sums.iter_mut()) {
        *sum += (rail.read)();
        *count += 1;
    }
}

impl PowerMonitor for SampledPowerMonitor {
    fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(Error::Energy("power monitor already started".to_string()));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let rails = Arc::clone(&self.rails);
        let interval = self.interval;
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("power-sampler".to_string())
            .spawn(move || {
                let mut sums = vec![(0.0, 0usize); rails.len()];
                sample_into(&rails, &mut sums);
                while !flag.load(Ordering::Acquire) {
                    thread::park_timeout(interval);
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    sample_into(&rails, &mut sums);
                }
                sums
            })?;

        self.active = Some(Sampling { stop, handle });
        Ok(())
    }

    fn stop(&mut self) -> Result<f64> {
        let sampling = self
            .active
            .take()
            .ok_or_else(|| Error::Energy("power monitor was not started".to_string()))?;

        sampling.stop.store(true, Ordering::Release);
        sampling.handle.thread().unpark();
        let sums = sampling
            .handle
            .join()
            .map_err(|_| Error::Energy("power sampler thread panicked".to_string()))?;

        Ok(sums
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(sum, count)| sum / *count as f64)
            .sum())
    }
}
