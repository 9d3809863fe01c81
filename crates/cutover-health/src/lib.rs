//! cutover-health — HTTP health probing with bounded retries.
//!
//! A probe is always a soft signal: [`HealthProbe::check`] returns a
//! [`HealthCheckResult`] value and never an error, because exhausting the
//! retry budget must not abort an operation whose mutation has already
//! been performed. The caller decides what a failed probe means.

pub mod probe;

pub use probe::{HealthCheckResult, HealthProbe};
