//! Result state for probed URLs
//!
//! This module contains the per-URL outcome record and its classifications.

mod resource;

pub use resource::{ProbeError, Resource, RobotsStatus, Status};
