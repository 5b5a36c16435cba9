//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! - [`clock`] - [`ManualClock`](clock::ManualClock), whose `sleep` advances
//!   `now` instantly
//! - [`venue`] - Scripted quote, order and market collaborators
//! - [`domain`] - Builders for windows, quotes and configurations

pub mod clock;
pub mod domain;
pub mod venue;
