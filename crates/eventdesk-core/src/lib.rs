//! eventdesk core - registration sheet parsing for event logistics.
//!
//! Registrations arrive from a form-response spreadsheet as a raw grid of
//! strings. The `parser` module rebuilds `Participant` and `Family` records
//! from it; the `cache` module stores them for the dashboard and the `api`
//! module fetches the grid.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod parser;
pub mod sheet;
pub mod utils;

pub use config::Config;
pub use models::{AgeGroup, Family, Participant, Roster};
pub use parser::{
    parse_families, parse_families_with, parse_participants, parse_participants_with,
    parse_registrations, Operation, ParseError,
};
