//! Spreadsheet values client.
//!
//! This module provides the `SheetsClient` used to download the raw
//! registration grid from the Google Sheets values endpoint. The parser
//! consumes the returned `values` array and nothing else.

pub mod client;
pub mod error;

pub use client::{SheetsClient, ValueRange};
pub use error::ApiError;
