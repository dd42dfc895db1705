//! Shared test utilities for the settings-manager workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`], a temporary project root with file helpers
//! - [`logs`]: [`capture_logs`] for asserting on `tracing` diagnostics

pub mod logs;
pub mod project;

pub use logs::capture_logs;
pub use project::TestProject;
