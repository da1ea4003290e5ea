// Scroll progress to region index mapping.
// Pure and deterministic; safe to call on every progress tick.

use crate::types::MapSettings;

/// Map continuous scroll progress onto a region index.
///
/// `None` until progress passes `selection_start`. Past the end of the
/// `total_regions * range_per_region` window the last index is held.
pub fn map_scroll_to_index(
    progress: f64,
    total_regions: usize,
    selection_start: f64,
    range_per_region: f64,
) -> Option<usize> {
    if total_regions == 0 || !progress.is_finite() {
        return None;
    }
    if progress == 0.0 || progress < selection_start {
        return None;
    }

    let total_range = total_regions as f64 * range_per_region;
    let selection_progress = (progress - selection_start) / total_range;

    // NaN comes from a zero range.
    if selection_progress.is_nan() || selection_progress <= 0.0 {
        return None;
    }
    if selection_progress >= 1.0 {
        return Some(total_regions - 1);
    }

    let index = (selection_progress * total_regions as f64).floor() as usize;
    Some(index.min(total_regions - 1))
}

impl MapSettings {
    /// [`map_scroll_to_index`] with this diagram's start and range.
    pub fn map_progress(&self, progress: f64, total_regions: usize) -> Option<usize> {
        map_scroll_to_index(
            progress,
            total_regions,
            self.selection_start,
            self.range_per_region,
        )
    }
}
