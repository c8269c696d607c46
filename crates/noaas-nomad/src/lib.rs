//! Adapter for the cluster scheduler (Nomad HTTP API).
//!
//! The pipeline depends on the [`SchedulerClient`] trait only; [`NomadClient`]
//! is the production implementation and does nothing beyond request/response
//! mapping and error wrapping.

mod client;
pub use client::{SchedulerClient, Submission};

mod config;
pub use config::NomadConfig;

mod errors;
pub use errors::SchedulerError;

mod nomad;
pub use nomad::NomadClient;
