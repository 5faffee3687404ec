//! Input normalization applied before tokenizing

/// Normalize raw statement text
///
/// Carriage returns are dropped, trailing whitespace is trimmed from every
/// line, and blank lines and `-` separator lines are removed.
pub fn strip_statement(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.replace('\r', ""))
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty() && line != "-")
        .collect::<Vec<_>>()
        .join("\n")
}
