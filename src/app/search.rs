//! Incremental search over executable names

use super::ProcessSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// Notice shown when the scan wraps around the table
    pub fn wrap_notice(&self) -> &'static str {
        match self {
            SearchDirection::Forward => "search hit BOTTOM, continuing at TOP",
            SearchDirection::Backward => "search hit TOP, continuing at BOTTOM",
        }
    }
}

/// Where a search landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub index: usize,
    /// The scan passed the end of the table before matching
    pub wrapped: bool,
}

/// Last pattern searched for. Once a search has run it stays active.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pattern: String,
    active: bool,
}

impl SearchState {
    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
        self.active = true;
    }

    pub fn pattern(&self) -> Option<&str> {
        self.active.then_some(self.pattern.as_str())
    }
}

/// Finds the next sample whose executable name contains `pattern`.
///
/// Scans strictly after `selected`, then wraps to the top up to and
/// including `selected`. Matching is a case-sensitive substring test.
///
/// # Arguments
/// * `samples` - The published table in display order
/// * `selected` - Index of the current selection
/// * `pattern` - Literal substring to look for
/// * `direction` - `Backward` mirrors the scan
pub fn find(
    samples: &[ProcessSample],
    selected: usize,
    pattern: &str,
    direction: SearchDirection,
) -> Option<SearchHit> {
    let count = samples.len();
    if count == 0 {
        return None;
    }
    let selected = selected.min(count - 1);

    (1..=count).find_map(|step| {
        let (index, wrapped) = match direction {
            SearchDirection::Forward => {
                let raw = selected + step;
                (raw % count, raw >= count)
            }
            SearchDirection::Backward => {
                (((selected + count) - step) % count, step > selected)
            }
        };
        samples[index]
            .exe_name
            .contains(pattern)
            .then_some(SearchHit { index, wrapped })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> Vec<ProcessSample> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ProcessSample::stub(i as u32 + 1, 0, name))
            .collect()
    }

    #[test]
    fn test_forward_wraps_to_top() {
        let samples = table(&["alpha", "beta", "gamma"]);
        let hit = find(&samples, 2, "a", SearchDirection::Forward);
        assert_eq!(hit, Some(SearchHit { index: 0, wrapped: true }));
    }

    #[test]
    fn test_forward_scans_strictly_after_selection() {
        let samples = table(&["alpha", "beta", "gamma"]);
        let hit = find(&samples, 0, "a", SearchDirection::Forward);
        assert_eq!(hit, Some(SearchHit { index: 1, wrapped: false }));
    }

    #[test]
    fn test_current_selection_matches_last() {
        let samples = table(&["alpha", "beta", "gamma"]);
        let hit = find(&samples, 1, "bet", SearchDirection::Forward);
        assert_eq!(hit, Some(SearchHit { index: 1, wrapped: true }));
    }

    #[test]
    fn test_backward_wraps_to_bottom() {
        let samples = table(&["alpha", "beta", "gamma"]);
        let hit = find(&samples, 0, "gam", SearchDirection::Backward);
        assert_eq!(hit, Some(SearchHit { index: 2, wrapped: true }));

        let hit = find(&samples, 2, "a", SearchDirection::Backward);
        assert_eq!(hit, Some(SearchHit { index: 1, wrapped: false }));
    }

    #[test]
    fn test_no_match() {
        let samples = table(&["alpha", "beta"]);
        assert_eq!(find(&samples, 0, "zeta", SearchDirection::Forward), None);
        assert_eq!(find(&[], 0, "a", SearchDirection::Backward), None);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let samples = table(&["Alpha"]);
        assert_eq!(find(&samples, 0, "alpha", SearchDirection::Forward), None);
    }

    #[test]
    fn test_state_inactive_until_first_search() {
        let mut state = SearchState::default();
        assert_eq!(state.pattern(), None);
        state.set_pattern("svc");
        assert_eq!(state.pattern(), Some("svc"));
    }
}
