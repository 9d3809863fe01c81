//! cutover-rollout — drives releases between revisions and variants.
//!
//! The two mutating operations share one shape: guard, mutate, verify,
//! and degrade instead of failing once the mutation is in flight.
//!
//! ```text
//! CLI ──► SafetyGate ──► resolver ──► RollbackExecutor ── apply
//!                                          │                │
//!                                          │          ReadinessWait
//!                                          │                │
//!                                          └── HealthProbe ◄┘
//!
//! CLI ──► SafetyGate ──► TrafficSwitcher ── read ── patch ── settle ── re-read
//! ```
//!
//! Operations against the same release must be serialized by the caller
//! (an operator-session lease); nothing here arbitrates concurrent
//! invocations, and double-invocation is a correctness hazard.

pub mod error;
pub mod executor;
pub mod gate;
pub mod resolver;
pub mod switch;
pub mod wait;

pub use error::{RolloutError, RolloutResult};
pub use executor::{RollbackExecutor, RollbackReport};
pub use gate::{SafetyGate, CONFIRM_VAR};
pub use resolver::{resolve, RevisionTarget};
pub use switch::{SwitchReport, TrafficSwitcher};
pub use wait::{ReadinessWait, WaitSummary};
