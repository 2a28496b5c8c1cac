//! Plain-text table rendering for list output.

/// Render rows under a header as left-aligned columns separated by two spaces,
/// with a dashed rule under the header. Trailing whitespace is trimmed.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(columns).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();

    let mut output = String::new();
    output.push_str(&format_row(headers));
    output.push('\n');
    output.push_str(&format_row(&rule));
    output.push('\n');
    for row in rows {
        let cells: Vec<&str> = (0..columns)
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        output.push_str(&format_row(&cells));
        output.push('\n');
    }
    output
}
