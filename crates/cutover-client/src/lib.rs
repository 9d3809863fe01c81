//! cutover-client — control-plane access over HTTP.
//!
//! Implements the [`cutover_core::ReleaseHistory`] and
//! [`cutover_core::ControlPlane`] contracts against the control plane's
//! REST surface:
//!
//! ```text
//! GET   /v1/namespaces/{ns}/releases/{name}                release + history
//! POST  /v1/namespaces/{ns}/releases/{name}/apply          {"revision": N}
//! GET   /v1/namespaces/{ns}/releases/{name}/availability   readiness snapshot
//! GET   /v1/namespaces/{ns}/releases/{name}/route          {"selector": "blue"}
//! PATCH /v1/namespaces/{ns}/releases/{name}/route          {"selector": "green"}
//! ```
//!
//! One connection per request; HTTP 404 maps to `NotFound`, connect
//! failures to `Unreachable`, other non-2xx to `Rejected`.

pub mod client;

pub use client::HttpControlPlane;
