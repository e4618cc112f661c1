use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad `s` with spaces up to `width` display columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    let mut out = String::with_capacity(s.len() + fill);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', fill));
    out
}

/// Widest cell per column; shorter rows count as empty cells.
pub fn column_widths<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<usize> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| display_width(cell.as_ref()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}
