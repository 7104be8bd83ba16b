/// Canonical form for CSV labels: invisible marks stripped, `_`/`-` read as spaces, whitespace
/// collapsed, ASCII lowercased.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['_', '-'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_label(value)
}
