/// Row-major sheet values, row 0 being the header row
pub type Grid = [Vec<String>];

/// Header row of the grid, if any
pub fn headers(grid: &Grid) -> Option<&[String]> {
    grid.first().map(|row| row.as_slice())
}

/// Data rows paired with their 1-based position in the grid
pub fn data_rows(grid: &Grid) -> impl Iterator<Item = (usize, &[String])> {
    grid.iter()
        .enumerate()
        .skip(1)
        .map(|(index, row)| (index, row.as_slice()))
}

/// Trimmed cell text. Unresolved columns and short rows read as empty.
pub fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|index| row.get(index))
        .map(|value| value.trim())
        .unwrap_or("")
}
