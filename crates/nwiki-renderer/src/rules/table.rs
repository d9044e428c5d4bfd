//! Table row and cell splitting.
//!
//! Table bodies are delimited by `{|` and `|}`; `\n|-` separates rows.
//! Within a row line, a leading `!` types the line as header cells, `||`
//! separates cells, and `!!` splits a cell into consecutive header cells.
//! The cell type resets to normal after each `!!`-delimited run.

/// Whether a cell is emitted as `<th>` or `<td>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellKind {
    Header,
    Normal,
}

/// Split a table body into a row-major grid of typed cells.
///
/// Rows without any cells (the leading line of `{|`, stray blank lines)
/// are dropped.
pub(crate) fn split_rows(body: &str) -> Vec<Vec<(CellKind, String)>> {
    let mut rows = Vec::new();
    for raw_row in body.split("\n|-") {
        let mut cells = Vec::new();
        for line in raw_row.split('\n') {
            cells.extend(split_cells(line));
        }
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

/// Split one row line into typed cells.
///
/// The first character of the line is the cell-type marker (`!` for
/// header, anything else for normal) and is always consumed.
fn split_cells(line: &str) -> Vec<(CellKind, String)> {
    let line = line.trim_start();
    let mut chars = line.chars();
    let mut kind = match chars.next() {
        Some('!') => CellKind::Header,
        Some(_) => CellKind::Normal,
        None => return Vec::new(),
    };
    let rest = chars.as_str();
    if rest.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    for group in rest.split("||") {
        for (i, sub) in group.split("!!").enumerate() {
            // Within one `||` group, every cell after a `!!` split is a
            // header cell regardless of the line marker.
            let cell_kind = if i == 0 { kind } else { CellKind::Header };
            cells.push((cell_kind, sub.trim().to_owned()));
        }
        kind = CellKind::Normal;
    }
    cells
}
