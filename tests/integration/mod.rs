//! Integration test suite for vtkpkg
//!
//! End-to-end runs of the `vtkpkg` binary against temporary package folders.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **relocate**: tree relocation, idempotence, dependency sources
//! - **package**: platform fixups and SDK stripping
//! - **check**: post-relocation verification
//! - **profile**: build profile output
//! - **error_scenarios**: invalid inputs and user-facing error output

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod check;
mod error_scenarios;
mod package;
mod profile;
mod relocate;
