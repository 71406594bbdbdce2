//! Output module for persisting probe results
//!
//! This module handles:
//! - Encoding a [`crate::state::Resource`] into a row of text fields
//! - Writing the header and rows to a CSV destination

mod csv_output;
mod record;

pub use csv_output::CsvSink;
pub use record::{OutputRecord, HEADER};
