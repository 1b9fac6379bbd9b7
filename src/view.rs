//! Heatmap view state machine.
//!
//! All UI state lives here as explicit fields with defined transition
//! rules; rendering (see `render`) is a pure function of this state.
//! Transitions are synchronous and run one at a time under the server's
//! state lock, so no field is ever observed mid-transition.

use crate::models::{Month, Year};

/// In-memory state of the heatmap view.
///
/// `default_map_visible` is one-way: it starts true and flips to false on
/// the first successful prediction, never back. A failed prediction leaves
/// everything except `loading` untouched, so the user keeps whatever was
/// on screen before the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selected_year: Year,
    pub selected_month: Month,
    pub heatmap_markup: Option<String>,
    pub default_map_visible: bool,
    pub loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_year: Year::default(),
            selected_month: Month::default(),
            heatmap_markup: None,
            default_map_visible: true,
            loading: false,
        }
    }
}

impl ViewState {
    /// Create the initial view state: default map shown, nothing fetched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the selected year. No other field changes.
    pub fn select_year(&mut self, year: Year) {
        self.selected_year = year;
    }

    /// Update the selected month. No other field changes.
    pub fn select_month(&mut self, month: Month) {
        self.selected_month = month;
    }

    /// Mark a prediction request as in flight.
    pub fn begin_predict(&mut self) {
        self.loading = true;
    }

    /// Apply a successful prediction result.
    ///
    /// Replaces the displayed markup and hides the default map. Hiding is
    /// idempotent: once hidden it stays hidden.
    pub fn settle_success(&mut self, markup: String) {
        self.heatmap_markup = Some(markup);
        self.default_map_visible = false;
        self.loading = false;
    }

    /// Apply a failed prediction.
    ///
    /// Only the loading flag is cleared; markup and map visibility keep
    /// their prior values. With overlapping requests this also clears the
    /// flag for a request still in flight - last write wins, matching the
    /// source behavior of no fencing.
    pub fn settle_failure(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(n: u8) -> Month {
        Month::new(n).expect("valid month")
    }

    #[test]
    fn test_initial_state() {
        let state = ViewState::new();
        assert_eq!(state.selected_year, Year::Y2023);
        assert_eq!(state.selected_month, month(1));
        assert!(state.heatmap_markup.is_none());
        assert!(state.default_map_visible);
        assert!(!state.loading);
    }

    #[test]
    fn test_selectors_touch_only_their_field() {
        for year in Year::ALL {
            for m in Month::all() {
                let mut state = ViewState::new();
                let before = state.clone();

                state.select_year(year);
                assert_eq!(state.selected_year, year);
                assert_eq!(state.selected_month, before.selected_month);
                assert_eq!(state.heatmap_markup, before.heatmap_markup);
                assert_eq!(state.default_map_visible, before.default_map_visible);
                assert_eq!(state.loading, before.loading);

                state.select_month(m);
                assert_eq!(state.selected_month, m);
                assert_eq!(state.selected_year, year);
                assert_eq!(state.heatmap_markup, before.heatmap_markup);
                assert_eq!(state.default_map_visible, before.default_map_visible);
            }
        }
    }

    #[test]
    fn test_begin_predict_sets_loading_only() {
        let mut state = ViewState::new();
        state.begin_predict();
        assert!(state.loading);
        assert!(state.default_map_visible);
        assert!(state.heatmap_markup.is_none());
    }

    #[test]
    fn test_success_hides_default_map_and_clears_loading() {
        let mut state = ViewState::new();
        state.begin_predict();
        state.settle_success("<div>A</div>".into());

        assert_eq!(state.heatmap_markup.as_deref(), Some("<div>A</div>"));
        assert!(!state.default_map_visible);
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_leaves_prior_state() {
        let mut state = ViewState::new();
        state.begin_predict();
        state.settle_failure();

        // Indistinguishable from initial, apart from the attempt itself
        assert_eq!(state, ViewState::new());
    }

    #[test]
    fn test_failure_after_success_keeps_result() {
        let mut state = ViewState::new();
        state.begin_predict();
        state.settle_success("<div>A</div>".into());

        state.begin_predict();
        state.settle_failure();

        assert_eq!(state.heatmap_markup.as_deref(), Some("<div>A</div>"));
        assert!(!state.default_map_visible);
        assert!(!state.loading);
    }

    #[test]
    fn test_default_map_never_returns() {
        let mut state = ViewState::new();
        state.begin_predict();
        state.settle_success("<div>A</div>".into());

        for _ in 0..10 {
            state.begin_predict();
            state.settle_failure();
            assert!(!state.default_map_visible);
        }
    }

    #[test]
    fn test_subsequent_success_replaces_markup() {
        let mut state = ViewState::new();
        state.settle_success("<div>A</div>".into());
        state.settle_success("<div>B</div>".into());

        assert_eq!(state.heatmap_markup.as_deref(), Some("<div>B</div>"));
        assert!(!state.default_map_visible);
    }

    #[test]
    fn test_overlapping_requests_last_write_wins() {
        let mut state = ViewState::new();

        // Two requests in flight; the second to settle determines the
        // final markup and loading flag regardless of start order.
        state.begin_predict();
        state.begin_predict();

        state.settle_success("<div>first</div>".into());
        assert!(!state.loading);

        state.settle_success("<div>second</div>".into());
        assert_eq!(state.heatmap_markup.as_deref(), Some("<div>second</div>"));
        assert!(!state.loading);
    }

    #[test]
    fn test_overlapping_failure_settles_loading_early() {
        let mut state = ViewState::new();

        state.begin_predict();
        state.begin_predict();

        // First settle is a failure: loading clears even though the other
        // request has not settled yet. No fencing, by construction.
        state.settle_failure();
        assert!(!state.loading);

        state.settle_success("<div>late</div>".into());
        assert_eq!(state.heatmap_markup.as_deref(), Some("<div>late</div>"));
    }
}
