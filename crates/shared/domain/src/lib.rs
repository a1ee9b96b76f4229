//! # Domain Models
//!
//! Pure types shared by the task schema workspace, with `serde` as the only
//! dependency. Keep it lean: no I/O, async or schema logic, just data and
//! fixed constants.

pub mod config;
pub mod constants;
pub mod registry;
