//! Identity verification and lifestyle scoring for the T2 Lifestyle Checker.
//!
//! The crate owns the domain rules (patient matching, age banded scoring, the screen state
//! machine) and the upstream proxy contract. The HTTP front-end lives in the
//! `lifestyle-checker-web` package and only wires these pieces together.

pub mod config;
pub mod error;
pub mod patients;
pub mod proxy;
pub mod questionnaire;
pub mod session;
pub mod telemetry;
