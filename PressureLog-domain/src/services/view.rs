use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entities::Reading;
use super::insights::{categorize, BloodPressureCategory};

/// Column a readings table can be ordered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortKey {
    /// When the reading was taken; the default because clinical review is
    /// recency-first
    #[default]
    CapturedAt,
    Systolic,
    Diastolic,
    Pulse,
}

/// Direction a sort column is ordered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    /// Most recent first by default
    #[default]
    Descending,
}

/// One table row: a reading plus its position in the sorted view.
///
/// Rows carry no identity beyond their source reading and are recomputed on
/// every refresh, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewRow {
    /// The underlying reading
    pub reading: Reading,

    /// 1-based rank across the whole filtered sequence, not just the page
    pub display_rank: usize,

    /// Clinical classification shown alongside the values
    pub category: BloodPressureCategory,
}

/// A sorted, filtered page of readings plus the post-filter total
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReadingsView {
    /// The rows of the requested page, in display order
    pub rows: Vec<ViewRow>,

    /// Post-filter, pre-pagination count, so the table can compute page
    /// counts without fetching every page
    pub total_count: usize,
}

/// Project a snapshot of stored readings into a table view model.
///
/// Recomputed fully on every call; no cross-call state. Sorting is stable:
/// rows with equal keys keep the order they appear in `readings`, which is
/// capture order for anything obtained from the repository.
pub fn build_view<F>(
    readings: &[Reading],
    sort_key: SortKey,
    direction: SortDirection,
    filter: F,
    page: usize,
    page_size: usize,
) -> ReadingsView
where
    F: Fn(&Reading) -> bool,
{
    let mut filtered: Vec<&Reading> = readings.iter().filter(|r| filter(r)).collect();

    // Equal keys compare Equal in either direction, so the stable sort
    // keeps their capture order regardless of the direction chosen
    filtered.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, sort_key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let total_count = filtered.len();

    let rows = filtered
        .into_iter()
        .enumerate()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .map(|(index, reading)| ViewRow {
            reading: reading.clone(),
            display_rank: index + 1,
            category: categorize(reading.systolic, reading.diastolic),
        })
        .collect();

    ReadingsView { rows, total_count }
}

fn compare_by_key(a: &Reading, b: &Reading, key: SortKey) -> Ordering {
    match key {
        SortKey::CapturedAt => a.captured_at.cmp(&b.captured_at),
        SortKey::Systolic => a.systolic.cmp(&b.systolic),
        SortKey::Diastolic => a.diastolic.cmp(&b.diastolic),
        SortKey::Pulse => a.pulse.cmp(&b.pulse),
    }
}
