//! GeoEntry firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod actuation;
pub mod app;
pub mod config;
pub mod connectivity;
pub mod context;
pub mod error;
pub mod pattern;
pub mod payload;
pub mod pins;
pub mod proximity;
pub mod remote;
pub mod scheduler;
pub mod sensors;

pub mod adapters;
pub mod drivers;
