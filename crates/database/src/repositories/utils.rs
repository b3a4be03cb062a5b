use services::common::{FilterableRecord, Page, RecordFilter, RepositoryError};

/// Filter a snapshot of `rows` (stored oldest first) and return the requested
/// page newest first, along with the number of matching rows.
pub fn select_newest_first<R: FilterableRecord + Clone>(
    rows: &[R],
    filter: &RecordFilter,
    page: Page,
) -> (Vec<R>, usize) {
    let mut matching: Vec<R> = rows
        .iter()
        .rev()
        .filter(|row| filter.matches(*row))
        .cloned()
        .collect();
    // Stable, so rows sharing a timestamp stay in reverse insertion order
    matching.sort_by_key(|row| std::cmp::Reverse(row.timestamp()));
    page.apply(matching)
}

/// Reject a second row with the same id
pub fn ensure_unique<R, K: PartialEq>(
    rows: &[R],
    id: &K,
    key: impl Fn(&R) -> &K,
) -> Result<(), RepositoryError> {
    if rows.iter().any(|row| key(row) == id) {
        return Err(RepositoryError::AlreadyExists);
    }
    Ok(())
}
