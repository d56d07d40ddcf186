//! Shared client library for the Klasteri news aggregator.
//!
//! Holds everything that is not terminal UI: the wire model for the backend
//! API, the typed HTTP client, config, and the pure domain logic (night
//! window, tonight-rail selection, recency formatting, color adjustment).
//! All time-dependent functions take `now` as an explicit parameter so they
//! stay unit-testable.

pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod model;
pub mod night;
pub mod platform;
pub mod timefmt;
pub mod tonight;
