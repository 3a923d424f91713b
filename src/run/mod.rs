//! Batch delivery and timing harness.
//!
//! This module drives a contestant's detector over the image catalog:
//!
//! - [`loader::BatchLoader`]: slices the catalog into fixed-size batches and decodes them
//! - [`harness::RunHarness`]: times the detector per batch and accumulates the report
//! - [`energy`]: optional power instrumentation
//! - [`config::HarnessConfig`]: harness configuration

pub mod config;
pub mod energy;
pub mod harness;
pub mod loader;

pub use config::HarnessConfig;
pub use energy::{EnergyProbe, PowerMonitor, PowerRail, SampledPowerMonitor};
pub use harness::{BatchStats, HarnessState, RunHarness, RunSummary};
pub use loader::{BatchLoader, LoadedImage};
