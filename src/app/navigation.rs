//! Selection and scroll bookkeeping for the process list
//!
//! After every mutation, with `count > 0`:
//! `selected < count`, `scroll <= selected` and
//! `selected - scroll < visible_rows`. With an empty table both are 0.

use super::ProcessSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    selected: usize,
    scroll: usize,
    /// Process id the selection is pinned to, if any
    follow: Option<u32>,
    visible_rows: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { selected: 0, scroll: 0, follow: None, visible_rows: 1 }
    }
}

impl Viewport {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn follow_target(&self) -> Option<u32> {
        self.follow
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Updates the window height (from the renderer, every frame).
    pub fn set_visible_rows(&mut self, rows: usize, count: usize) {
        self.visible_rows = rows.max(1);
        self.clamp(count);
    }

    /// Moves the selection to `index`, clamped into the table.
    ///
    /// Cancels follow mode.
    pub fn select(&mut self, index: usize, count: usize) {
        self.follow = None;
        self.selected = index;
        self.clamp(count);
    }

    /// Moves the selection by `delta` rows. Cancels follow mode.
    pub fn scroll(&mut self, delta: isize, count: usize) {
        let target = self.selected.saturating_add_signed(delta);
        self.select(target, count);
    }

    /// Moves the selection by `delta` pages. Cancels follow mode.
    ///
    /// # Arguments
    /// * `delta` - Pages to move; negative moves up
    /// * `count` - Rows in the current table
    pub fn page(&mut self, delta: isize, count: usize) {
        let rows = self.visible_rows as isize;
        self.scroll(delta.saturating_mul(rows), count);
    }

    /// Pins the selection to `pid` until the next manual movement.
    pub fn follow(&mut self, pid: u32) {
        self.follow = Some(pid);
    }

    /// Restores the invariants after a republish or resort.
    ///
    /// In follow mode the selection jumps to the followed id; if it is gone,
    /// follow mode ends silently. Calling this twice changes nothing.
    pub fn readjust(&mut self, samples: &[ProcessSample]) {
        if let Some(pid) = self.follow {
            match samples.iter().position(|s| s.id == pid) {
                Some(index) => self.selected = index,
                None => self.follow = None,
            }
        }
        self.clamp(samples.len());
    }

    fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }

        self.selected = self.selected.min(count - 1);

        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.visible_rows {
            self.scroll = self.selected + 1 - self.visible_rows;
        }

        // No blank tail when the table shrinks
        let max_scroll = count.saturating_sub(self.visible_rows);
        self.scroll = self.scroll.min(max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(count: u32) -> Vec<ProcessSample> {
        (1..=count).map(|id| ProcessSample::stub(id, 0, "p")).collect()
    }

    fn assert_invariants(v: &Viewport, count: usize) {
        if count == 0 {
            assert_eq!((v.selected(), v.scroll_offset()), (0, 0));
            return;
        }
        assert!(v.selected() < count, "selected {} count {}", v.selected(), count);
        assert!(v.scroll_offset() <= v.selected());
        assert!(v.selected() - v.scroll_offset() < v.visible_rows());
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        let mut v = Viewport::default();
        v.set_visible_rows(5, 100);
        for step in [1, 1, 10, -3, 40, -100, 200] {
            v.scroll(step, 100);
            assert_invariants(&v, 100);
        }
        assert_eq!(v.selected(), 99);
        assert_eq!(v.scroll_offset(), 95);
    }

    #[test]
    fn test_page_moves_by_visible_rows() {
        let mut v = Viewport::default();
        v.set_visible_rows(10, 50);
        v.page(1, 50);
        assert_eq!(v.selected(), 10);
        v.page(-2, 50);
        assert_eq!(v.selected(), 0);
    }

    #[test]
    fn test_shrinking_table_clamps() {
        let mut v = Viewport::default();
        v.set_visible_rows(5, 30);
        v.select(29, 30);
        v.readjust(&table(3));
        assert_eq!(v.selected(), 2);
        assert_eq!(v.scroll_offset(), 0);
        v.readjust(&[]);
        assert_invariants(&v, 0);
    }

    #[test]
    fn test_follow_tracks_id_and_ends_when_gone() {
        let mut v = Viewport::default();
        v.set_visible_rows(3, 10);
        let mut samples = table(10);
        v.select(2, 10);
        v.follow(samples[2].id);

        samples.reverse();
        v.readjust(&samples);
        assert_eq!(samples[v.selected()].id, 3);
        assert_invariants(&v, samples.len());

        samples.retain(|s| s.id != 3);
        v.readjust(&samples);
        assert_eq!(v.follow_target(), None);
        assert_invariants(&v, samples.len());
    }

    #[test]
    fn test_manual_movement_cancels_follow() {
        let mut v = Viewport::default();
        v.follow(4);
        v.scroll(1, 10);
        assert_eq!(v.follow_target(), None);
    }

    #[test]
    fn test_readjust_is_idempotent() {
        let mut v = Viewport::default();
        v.set_visible_rows(4, 20);
        v.select(13, 20);
        v.follow(9);
        let samples = table(20);
        v.readjust(&samples);
        let once = v;
        v.readjust(&samples);
        assert_eq!(v, once);
    }
}
