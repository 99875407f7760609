//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the GeoEntry controller:
//! link supervision, proximity and sensor polling, occupancy-driven
//! actuation and indicator output.  All interaction with the network and
//! GPIO happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
