//! Registration sheet parser.
//!
//! Turns the raw form-response grid into `Participant` and `Family`
//! records. Every data row declares a party size, and the sheet carries a
//! separate set of name/phone/age columns for each possible size, so the
//! columns to read are chosen per row.
//!
//! Family ids come from a counter local to each call. It advances once for
//! every row with a valid party size, whether or not that row yields a
//! record, so both entry points agree on the id of every row.

pub mod error;
pub mod normalize;

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::models::{AgeGroup, Family, Participant, Roster};
use crate::sheet::labels::TemplateError;
use crate::sheet::{cell, data_rows, headers, locate, Grid, SheetLabels, WidthColumns, MAX_PARTY_SIZE};

pub use error::{Operation, ParseError};
pub use normalize::{is_truthy, needs_transportation, parse_party_size, SETUP_CREW_ROLE};

use normalize::{join_name, non_empty};

/// Row-level columns, located once per call
struct RowColumns {
    party_size: usize,
    email: Option<usize>,
    transportation: Option<usize>,
    organizer: Option<usize>,
}

/// One data row that declared a valid party size
struct PartyRow<'a> {
    /// 1-based position in the grid
    row_index: usize,
    family_id: u32,
    party: u8,
    cells: &'a [String],
    columns: &'a WidthColumns,
    row_columns: &'a RowColumns,
}

impl PartyRow<'_> {
    fn primary_names(&self) -> (&str, &str) {
        (
            cell(self.cells, self.columns.first_name),
            cell(self.cells, self.columns.last_name),
        )
    }
}

/// Walk every data row with a valid party size, in sheet order.
fn for_each_party<F>(grid: &Grid, labels: &SheetLabels, mut visit: F) -> Result<(), TemplateError>
where
    F: FnMut(&PartyRow<'_>),
{
    let Some(header_row) = headers(grid).filter(|_| grid.len() >= 2) else {
        info!(rows = grid.len(), "Registration sheet has no data rows");
        return Ok(());
    };

    let Some(party_size) = locate(header_row, &labels.party_size_pattern()) else {
        info!(label = %labels.party_size, "Party size column not found, nothing to parse");
        return Ok(());
    };

    let row_columns = RowColumns {
        party_size,
        email: locate(header_row, &labels.email_pattern()),
        transportation: locate(header_row, &labels.transportation_pattern()),
        organizer: locate(header_row, &labels.organizer_pattern()),
    };

    let mut widths: [Option<WidthColumns>; MAX_PARTY_SIZE as usize] = Default::default();
    let mut family_id: u32 = 0;

    for (row_index, cells) in data_rows(grid) {
        let declared = cell(cells, Some(row_columns.party_size));
        let Some(party) = parse_party_size(declared) else {
            debug!(row = row_index, value = declared, "Skipping row with invalid party size");
            continue;
        };
        family_id += 1;

        let columns: &WidthColumns = match &mut widths[usize::from(party) - 1] {
            Some(columns) => columns,
            slot @ None => slot.insert(labels.resolve_width(header_row, party)?),
        };

        visit(&PartyRow {
            row_index,
            family_id,
            party,
            cells,
            columns,
            row_columns: &row_columns,
        });
    }

    Ok(())
}

fn participants_from_row(row: &PartyRow<'_>, out: &mut Vec<Participant>) {
    let (first, last) = row.primary_names();
    if first.is_empty() || last.is_empty() {
        debug!(row = row.row_index, "Skipping party without primary contact name");
        return;
    }

    let needs_transportation =
        needs_transportation(cell(row.cells, row.row_columns.transportation));

    let mut roles = BTreeSet::new();
    if is_truthy(cell(row.cells, row.row_columns.organizer)) {
        roles.insert(SETUP_CREW_ROLE.to_string());
    }

    out.push(Participant {
        id: Participant::make_id(row.row_index, 1),
        name: join_name(first, last),
        age_group: AgeGroup::from_category(Some(cell(row.cells, row.columns.age_category))),
        family_id: row.family_id,
        roles,
        checked_in: false,
        phone: non_empty(cell(row.cells, row.columns.phone)),
        email: non_empty(cell(row.cells, row.row_columns.email)),
        is_primary_contact: true,
        needs_transportation,
    });

    for member in &row.columns.members {
        let first = cell(row.cells, member.first_name);
        let last = cell(row.cells, member.last_name);
        if first.is_empty() || last.is_empty() {
            debug!(row = row.row_index, slot = member.slot, "Skipping blank party member");
            continue;
        }

        out.push(Participant {
            id: Participant::make_id(row.row_index, member.slot),
            name: join_name(first, last),
            age_group: AgeGroup::from_category(Some(cell(row.cells, member.age_category))),
            family_id: row.family_id,
            roles: BTreeSet::new(),
            checked_in: false,
            phone: None,
            email: None,
            is_primary_contact: false,
            needs_transportation,
        });
    }
}

fn family_from_row(row: &PartyRow<'_>) -> Option<Family> {
    let (first, last) = row.primary_names();
    if first.is_empty() && last.is_empty() {
        debug!(row = row.row_index, "Skipping family without primary contact name");
        return None;
    }

    Some(Family {
        id: row.family_id,
        name: Family::display_name(first, last, row.party),
        primary_contact_id: Participant::make_id(row.row_index, 1),
        phone: non_empty(cell(row.cells, row.columns.phone)),
        email: non_empty(cell(row.cells, row.row_columns.email)),
    })
}

/// Parse participants using the default form labels
pub fn parse_participants(grid: &Grid) -> Result<Vec<Participant>, ParseError> {
    parse_participants_with(grid, &SheetLabels::default())
}

pub fn parse_participants_with(
    grid: &Grid,
    labels: &SheetLabels,
) -> Result<Vec<Participant>, ParseError> {
    let mut participants = Vec::new();
    for_each_party(grid, labels, |row| participants_from_row(row, &mut participants)).map_err(
        |source| ParseError::InvalidPattern {
            operation: Operation::ParseParticipants,
            source,
        },
    )?;

    info!(count = participants.len(), "Parsed participants");
    Ok(participants)
}

/// Parse families using the default form labels
pub fn parse_families(grid: &Grid) -> Result<Vec<Family>, ParseError> {
    parse_families_with(grid, &SheetLabels::default())
}

pub fn parse_families_with(grid: &Grid, labels: &SheetLabels) -> Result<Vec<Family>, ParseError> {
    let mut families = Vec::new();
    for_each_party(grid, labels, |row| families.extend(family_from_row(row))).map_err(
        |source| ParseError::InvalidPattern {
            operation: Operation::ParseFamilies,
            source,
        },
    )?;

    info!(count = families.len(), "Parsed families");
    Ok(families)
}

/// Parse both entity lists in a single pass over the grid.
/// The result equals calling `parse_participants_with` and `parse_families_with` separately.
pub fn parse_registrations(grid: &Grid, labels: &SheetLabels) -> Result<Roster, ParseError> {
    let mut roster = Roster::default();
    for_each_party(grid, labels, |row| {
        participants_from_row(row, &mut roster.participants);
        roster.families.extend(family_from_row(row));
    })
    .map_err(|source| ParseError::InvalidPattern {
        operation: Operation::ParseRegistrations,
        source,
    })?;

    info!(
        participants = roster.participants.len(),
        families = roster.families.len(),
        "Parsed registrations"
    );
    Ok(roster)
}
