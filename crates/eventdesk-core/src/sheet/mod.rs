//! Registration sheet access.
//!
//! The sheet arrives as a row-major grid of strings: row 0 holds the
//! column labels, every later row is one form response. Column labels are
//! bilingual and, for the party-size dependent fields, carry a
//! `(Party of N)` suffix on its own line.

pub mod grid;
pub mod labels;
pub mod locator;

pub use grid::{cell, data_rows, headers, Grid};
pub use labels::{MemberColumns, SheetLabels, WidthColumns, MAX_PARTY_SIZE};
pub use locator::{locate, Pattern};
