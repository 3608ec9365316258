//! Small formatting helpers shared by renderers.

/// Wrap text in inline-code delimiters so it survives inside a table cell.
pub fn escape(text: &str) -> String {
    format!("`{}`", text)
}

/// Collapse line breaks (`\n`, `\r\n` or a lone `\r`) so a description stays
/// on one table row.
pub fn sanitize(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Render rows as a GitHub-flavoured pipe table.
///
/// Every column is left-aligned and padded to its widest cell. Rows shorter
/// than the header are padded with empty cells; extra cells are dropped.
pub fn tabulate(rows: &[Vec<String>], header: &[&str]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_row(header.iter().copied(), &widths));
    lines.push(format!(
        "|{}|",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in rows {
        let cells = (0..widths.len()).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
        lines.push(table_row(cells, &widths));
    }

    lines.join("\n")
}

/// Format a single row of cells, padded to the given column widths.
pub fn table_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!(" {:<width$} ", cell, width = width))
        .collect();
    format!("|{}|", padded.join("|"))
}
