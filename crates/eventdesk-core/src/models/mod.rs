//! Data models for registration entities.
//!
//! This module contains the structures derived from the registration sheet:
//!
//! - `Participant`, `AgeGroup`: one person from a party
//! - `Family`: one party (sheet row) with its primary contact
//! - `Household`, `RosterStats`: joined views consumed by the dashboard

pub mod family;
pub mod participant;
pub mod roster;

pub use family::Family;
pub use participant::{AgeGroup, Participant};
pub use roster::{build_households, Household, Roster, RosterStats};
