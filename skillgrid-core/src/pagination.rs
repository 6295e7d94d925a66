//! Windowed pagination over heatmap rows
//!
//! Global invariants enforced:
//! - `start_index` never goes negative
//! - Forward navigation is capped so the window never runs off the end
//! - Navigation never reorders or mutates the rows it windows

use anyhow::{bail, Result};
use std::collections::BTreeSet;

/// Default number of columns per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The contiguous slice of rows currently visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    start_index: usize,
    size: usize,
}

impl PaginationWindow {
    /// Window of `size` rows starting at index 0
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            bail!("page size must be positive");
        }
        Ok(PaginationWindow {
            start_index: 0,
            size,
        })
    }

    /// Window of `size` rows at an explicit start (used to restore a page)
    pub fn at(size: usize, start_index: usize) -> Result<Self> {
        let mut window = Self::new(size)?;
        window.start_index = start_index;
        Ok(window)
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether "previous page" is enabled
    pub fn can_page_backward(&self) -> bool {
        self.start_index > 0
    }

    /// Whether "next page" is enabled for `total` rows
    pub fn can_page_forward(&self, total: usize) -> bool {
        self.start_index.saturating_add(self.size) < total
    }

    /// `start := max(start - W, 0)`; no-op on the first page
    pub fn page_backward(&mut self) {
        self.start_index = self.start_index.saturating_sub(self.size);
    }

    /// `start := min(start + W, max(total - W, 0))`; no-op on the last page
    pub fn page_forward(&mut self, total: usize) {
        if !self.can_page_forward(total) {
            return;
        }
        let last_start = total.saturating_sub(self.size);
        self.start_index = (self.start_index + self.size).min(last_start);
    }

    /// Apply up to `pages` forward moves, stopping at the last page
    ///
    /// Returns the number of moves that changed the window.
    pub fn advance(&mut self, pages: usize, total: usize) -> usize {
        let mut moved = 0;
        while moved < pages && self.can_page_forward(total) {
            self.page_forward(total);
            moved += 1;
        }
        moved
    }

    /// Rows `[start, start + W)`, shorter at the tail, empty past the end
    pub fn visible_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.start_index.min(rows.len());
        let end = self.start_index.saturating_add(self.size).min(rows.len());
        &rows[start..end]
    }

    /// One-based `(first, last)` positions shown for `total` rows, `None` when empty
    pub fn visible_range(&self, total: usize) -> Option<(usize, usize)> {
        let end = self.start_index.saturating_add(self.size).min(total);
        (self.start_index < end).then(|| (self.start_index + 1, end))
    }
}

/// Every start index reachable from 0 by any sequence of page moves
///
/// Backward moves from a clamped last page land off the forward grid
/// (25 rows, W=10: 0, 10, 15, then back to 5), so the set is explored
/// rather than stepped. Returned in ascending order.
pub fn reachable_starts(size: usize, total: usize) -> Result<Vec<usize>> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![PaginationWindow::new(size)?];

    while let Some(window) = pending.pop() {
        if !seen.insert(window.start_index) {
            continue;
        }
        let mut forward = window;
        forward.page_forward(total);
        let mut backward = window;
        backward.page_backward();
        pending.push(forward);
        pending.push(backward);
    }

    Ok(seen.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(PaginationWindow::new(0).is_err());
    }

    #[test]
    fn test_forward_sequence_clamps_at_last_page() {
        let mut window = PaginationWindow::new(10).unwrap();
        let mut visited = vec![window.start_index()];
        for _ in 0..3 {
            window.page_forward(25);
            visited.push(window.start_index());
        }
        assert_eq!(visited, vec![0, 10, 15, 15]);
    }

    #[test]
    fn test_backward_sequence_stops_at_zero() {
        let mut window = PaginationWindow::at(10, 15).unwrap();
        window.page_backward();
        assert_eq!(window.start_index(), 5);
        window.page_backward();
        assert_eq!(window.start_index(), 0);
        window.page_backward();
        assert_eq!(window.start_index(), 0);
    }

    #[test]
    fn test_button_enablement_at_boundaries() {
        let mut window = PaginationWindow::new(10).unwrap();
        assert!(!window.can_page_backward());
        assert!(window.can_page_forward(25));

        window.page_forward(25);
        window.page_forward(25);
        assert_eq!(window.start_index(), 15);
        assert!(window.can_page_backward());
        assert!(!window.can_page_forward(25));
    }

    #[test]
    fn test_fewer_rows_than_window() {
        let rows: Vec<u32> = (0..4).collect();
        let mut window = PaginationWindow::new(10).unwrap();
        assert!(!window.can_page_forward(rows.len()));
        window.page_forward(rows.len());
        assert_eq!(window.start_index(), 0);
        assert_eq!(window.visible_slice(&rows), &rows[..]);
    }

    #[test]
    fn test_exact_multiple_of_window() {
        let mut window = PaginationWindow::new(10).unwrap();
        window.page_forward(20);
        assert_eq!(window.start_index(), 10);
        assert!(!window.can_page_forward(20));
        window.page_forward(20);
        assert_eq!(window.start_index(), 10);
    }

    #[test]
    fn test_visible_slice_tail_and_past_end() {
        let rows: Vec<u32> = (0..25).collect();
        let window = PaginationWindow::at(10, 20).unwrap();
        assert_eq!(window.visible_slice(&rows), &rows[20..25]);

        let window = PaginationWindow::at(10, 40).unwrap();
        assert!(window.visible_slice(&rows).is_empty());
    }

    #[test]
    fn test_visible_slice_does_not_touch_rows() {
        let rows = vec!["c", "a", "b"];
        let mut window = PaginationWindow::new(2).unwrap();
        window.page_forward(rows.len());
        assert_eq!(window.visible_slice(&rows), &["a", "b"]);
        assert_eq!(rows, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_visible_range() {
        let window = PaginationWindow::at(10, 15).unwrap();
        assert_eq!(window.visible_range(25), Some((16, 25)));
        assert_eq!(PaginationWindow::new(10).unwrap().visible_range(0), None);
    }

    #[test]
    fn test_reachable_starts() {
        assert_eq!(reachable_starts(10, 25).unwrap(), vec![0, 5, 10, 15]);
        assert_eq!(reachable_starts(10, 20).unwrap(), vec![0, 10]);
        assert_eq!(reachable_starts(10, 3).unwrap(), vec![0]);
        assert_eq!(reachable_starts(10, 0).unwrap(), vec![0]);
    }

    #[test]
    fn test_advance_stops_at_last_page() {
        let mut window = PaginationWindow::new(10).unwrap();
        assert_eq!(window.advance(usize::MAX, 25), 2);
        assert_eq!(window.start_index(), 15);

        let mut window = PaginationWindow::new(10).unwrap();
        assert_eq!(window.advance(1, 25), 1);
        assert_eq!(window.start_index(), 10);

        let mut window = PaginationWindow::new(10).unwrap();
        assert_eq!(window.advance(3, 4), 0);
        assert_eq!(window.start_index(), 0);
    }

    #[test]
    fn test_far_start_does_not_overflow() {
        let window = PaginationWindow::at(10, usize::MAX).unwrap();
        assert!(!window.can_page_forward(25));
        assert!(window.visible_slice(&[1, 2, 3]).is_empty());
        assert_eq!(window.visible_range(25), None);
    }
}
