use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Returns the indices of the `n` entries with the highest change percent,
/// in ascending order of change (the last index is the single top mover).
///
/// Sorts the full index range, so O(M log M), fine for one API page. The
/// sort is stable: equal changes keep their snapshot order. `n` larger than
/// the entry count degrades to all entries.
pub fn top_movers(change_percents: ArrayView1<'_, f64>, n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..change_percents.len()).collect();

    indices.sort_by(|&a, &b| {
        change_percents[a]
            .partial_cmp(&change_percents[b])
            .unwrap_or(Ordering::Equal)
    });

    let take = n.min(indices.len());
    indices.split_off(indices.len() - take)
}
