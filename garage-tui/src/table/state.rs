//! Table interaction state and its reducer.
//!
//! Everything the user can change about a table lives in [`TableState`] and
//! changes only through [`reduce`]. Actions that depend on the data (page
//! counts, ids on the current page) carry that context with them, so the
//! reducer never looks at rows.

use garage_core::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Values typed into the inline add form, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: Vec<String>,
    pub focus: usize,
    /// Message from the last failed submission, shown inside the form.
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    pub sort: Option<ColumnSort>,
    pub filter_text: String,
    /// The filter input has keyboard focus.
    pub filter_focused: bool,
    pub page: usize,
    pub selected_ids: BTreeSet<RecordId>,
    pub add_form_open: bool,
    pub form: FormState,
    pub hidden_columns: BTreeSet<String>,
    /// Index into the data columns, used for keyboard sort and visibility.
    pub focused_column: usize,
    /// Row index within the current page.
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    SetFilter(String),
    FilterInput(char),
    FilterBackspace,
    FocusFilter,
    BlurFilter,
    /// Header activation: ascending, then descending, then unsorted.
    CycleSort(String),
    NextPage { page_count: usize },
    PrevPage,
    ClampPage { page_count: usize },
    ToggleRow(RecordId),
    SelectRows(Vec<RecordId>),
    DeselectRows(Vec<RecordId>),
    /// Keep only the listed ids selected.
    RetainRows(Vec<RecordId>),
    ClearSelection,
    ToggleColumn(String),
    SetHiddenColumns(BTreeSet<String>),
    FocusNextColumn { column_count: usize },
    FocusPrevColumn { column_count: usize },
    CursorDown { rows: usize },
    CursorUp,
    ClampCursor { rows: usize },
    OpenAddForm { fields: usize },
    CloseAddForm,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    SubmitStarted,
    SubmitFailed(String),
    SubmitSucceeded,
}

pub fn reduce(mut state: TableState, action: TableAction) -> TableState {
    match action {
        TableAction::SetFilter(text) => state.filter_text = text,
        TableAction::FilterInput(c) => state.filter_text.push(c),
        TableAction::FilterBackspace => {
            state.filter_text.pop();
        }
        TableAction::FocusFilter => state.filter_focused = true,
        TableAction::BlurFilter => state.filter_focused = false,
        TableAction::CycleSort(column_id) => {
            state.sort = match state.sort.take() {
                Some(current) if current.column_id == column_id => match current.direction {
                    SortDirection::Ascending => Some(ColumnSort {
                        column_id,
                        direction: SortDirection::Descending,
                    }),
                    SortDirection::Descending => None,
                },
                _ => Some(ColumnSort {
                    column_id,
                    direction: SortDirection::Ascending,
                }),
            };
        }
        TableAction::NextPage { page_count } => {
            if state.page + 1 < page_count {
                state.page += 1;
                state.cursor = 0;
            }
        }
        TableAction::PrevPage => {
            if state.page > 0 {
                state.page -= 1;
                state.cursor = 0;
            }
        }
        TableAction::ClampPage { page_count } => {
            let last = page_count.saturating_sub(1);
            if state.page > last {
                state.page = last;
                state.cursor = 0;
            }
        }
        TableAction::ToggleRow(id) => {
            if !state.selected_ids.remove(&id) {
                state.selected_ids.insert(id);
            }
        }
        TableAction::SelectRows(ids) => state.selected_ids.extend(ids),
        TableAction::DeselectRows(ids) => {
            for id in &ids {
                state.selected_ids.remove(id);
            }
        }
        TableAction::RetainRows(ids) => {
            let keep: BTreeSet<RecordId> = ids.into_iter().collect();
            state.selected_ids.retain(|id| keep.contains(id));
        }
        TableAction::ClearSelection => state.selected_ids.clear(),
        TableAction::ToggleColumn(column_id) => {
            if !state.hidden_columns.remove(&column_id) {
                state.hidden_columns.insert(column_id);
            }
        }
        TableAction::SetHiddenColumns(columns) => state.hidden_columns = columns,
        TableAction::FocusNextColumn { column_count } => {
            if column_count > 0 {
                state.focused_column = (state.focused_column + 1) % column_count;
            }
        }
        TableAction::FocusPrevColumn { column_count } => {
            if column_count > 0 {
                state.focused_column = if state.focused_column == 0 {
                    column_count - 1
                } else {
                    (state.focused_column - 1).min(column_count - 1)
                };
            }
        }
        TableAction::CursorDown { rows } => {
            if state.cursor + 1 < rows {
                state.cursor += 1;
            }
        }
        TableAction::CursorUp => state.cursor = state.cursor.saturating_sub(1),
        TableAction::ClampCursor { rows } => {
            state.cursor = state.cursor.min(rows.saturating_sub(1));
        }
        TableAction::OpenAddForm { fields } => {
            state.add_form_open = true;
            state.filter_focused = false;
            state.form = FormState {
                values: vec![String::new(); fields],
                ..FormState::default()
            };
        }
        TableAction::CloseAddForm => {
            state.add_form_open = false;
            state.form = FormState::default();
        }
        TableAction::FormInput(c) => {
            if state.add_form_open && !state.form.submitting {
                if let Some(value) = state.form.values.get_mut(state.form.focus) {
                    value.push(c);
                }
            }
        }
        TableAction::FormBackspace => {
            if state.add_form_open && !state.form.submitting {
                if let Some(value) = state.form.values.get_mut(state.form.focus) {
                    value.pop();
                }
            }
        }
        TableAction::FormNextField => {
            let fields = state.form.values.len();
            if fields > 0 {
                state.form.focus = (state.form.focus + 1) % fields;
            }
        }
        TableAction::FormPrevField => {
            let fields = state.form.values.len();
            if fields > 0 {
                state.form.focus = (state.form.focus + fields - 1) % fields;
            }
        }
        TableAction::SubmitStarted => {
            state.form.submitting = true;
            state.form.error = None;
        }
        TableAction::SubmitFailed(message) => {
            state.form.submitting = false;
            state.form.error = Some(message);
        }
        TableAction::SubmitSucceeded => {
            state.add_form_open = false;
            state.form = FormState::default();
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: TableState, actions: Vec<TableAction>) -> TableState {
        actions.into_iter().fold(state, reduce)
    }

    #[test]
    fn sort_cycles_through_three_states() {
        let price = || TableAction::CycleSort("price".to_string());
        let state = reduce(TableState::default(), price());
        assert_eq!(
            state.sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        let state = reduce(state, price());
        assert_eq!(
            state.sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        let state = reduce(state, price());
        assert_eq!(state.sort, None);
    }

    #[test]
    fn sorting_another_column_starts_ascending() {
        let state = apply(
            TableState::default(),
            vec![
                TableAction::CycleSort("price".to_string()),
                TableAction::CycleSort("price".to_string()),
                TableAction::CycleSort("name".to_string()),
            ],
        );
        assert_eq!(
            state.sort,
            Some(ColumnSort {
                column_id: "name".to_string(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn paging_stays_in_bounds() {
        let state = apply(
            TableState::default(),
            vec![
                TableAction::NextPage { page_count: 2 },
                TableAction::NextPage { page_count: 2 },
            ],
        );
        assert_eq!(state.page, 1);
        let state = apply(state, vec![TableAction::PrevPage, TableAction::PrevPage]);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn clamp_moves_page_back_when_results_shrink() {
        let mut state = TableState {
            page: 4,
            cursor: 3,
            ..TableState::default()
        };
        state = reduce(state, TableAction::ClampPage { page_count: 2 });
        assert_eq!(state.page, 1);
        assert_eq!(state.cursor, 0);
        state = reduce(state, TableAction::ClampPage { page_count: 0 });
        assert_eq!(state.page, 0);
    }

    #[test]
    fn deselecting_rows_leaves_others_selected() {
        let ids = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let state = apply(
            TableState::default(),
            vec![
                TableAction::SelectRows(ids(&["a", "b", "c"])),
                TableAction::DeselectRows(ids(&["a", "b"])),
            ],
        );
        let expected: BTreeSet<RecordId> = ids(&["c"]).into_iter().collect();
        assert_eq!(state.selected_ids, expected);
    }

    #[test]
    fn retain_drops_vanished_ids() {
        let state = apply(
            TableState::default(),
            vec![
                TableAction::SelectRows(vec!["v1".into(), "v2".into()]),
                TableAction::RetainRows(vec!["v2".into(), "v3".into()]),
            ],
        );
        assert_eq!(state.selected_ids.len(), 1);
        assert!(state.selected_ids.contains("v2"));
    }

    #[test]
    fn form_failure_keeps_form_open_with_error() {
        let state = apply(
            TableState::default(),
            vec![
                TableAction::OpenAddForm { fields: 2 },
                TableAction::FormInput('O'),
                TableAction::FormNextField,
                TableAction::FormInput('2'),
                TableAction::SubmitStarted,
                TableAction::FormInput('x'),
                TableAction::SubmitFailed("Price required".to_string()),
            ],
        );
        assert!(state.add_form_open);
        assert!(!state.form.submitting);
        assert_eq!(state.form.values, vec!["O".to_string(), "2".to_string()]);
        assert_eq!(state.form.error.as_deref(), Some("Price required"));
    }

    #[test]
    fn form_success_closes_and_resets() {
        let state = apply(
            TableState::default(),
            vec![
                TableAction::OpenAddForm { fields: 1 },
                TableAction::FormInput('a'),
                TableAction::SubmitStarted,
                TableAction::SubmitSucceeded,
            ],
        );
        assert!(!state.add_form_open);
        assert_eq!(state.form, FormState::default());
    }

    #[test]
    fn focus_wraps_both_ways() {
        let state = reduce(
            TableState::default(),
            TableAction::FocusPrevColumn { column_count: 3 },
        );
        assert_eq!(state.focused_column, 2);
        let state = reduce(state, TableAction::FocusNextColumn { column_count: 3 });
        assert_eq!(state.focused_column, 0);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Toggling a row twice restores the selection.
        #[test]
        fn prop_toggle_row_is_involution(
            initial in proptest::collection::btree_set("[a-z]{1,4}", 0..10),
            id in "[a-z]{1,4}",
        ) {
            let state = TableState { selected_ids: initial.clone(), ..TableState::default() };
            let state = reduce(state, TableAction::ToggleRow(id.clone()));
            let state = reduce(state, TableAction::ToggleRow(id));
            prop_assert_eq!(state.selected_ids, initial);
        }

        /// Typing then deleting the same number of characters restores the filter.
        #[test]
        fn prop_filter_backspace_undoes_input(base in "[a-z ]{0,8}", typed in "[a-zA-Z0-9]{0,8}") {
            let mut state = reduce(TableState::default(), TableAction::SetFilter(base.clone()));
            for c in typed.chars() {
                state = reduce(state, TableAction::FilterInput(c));
            }
            for _ in typed.chars() {
                state = reduce(state, TableAction::FilterBackspace);
            }
            prop_assert_eq!(state.filter_text, base);
        }

        /// The page index never exceeds the last page after clamping.
        #[test]
        fn prop_clamped_page_is_in_range(page in 0usize..50, page_count in 0usize..20) {
            let state = TableState { page, ..TableState::default() };
            let state = reduce(state, TableAction::ClampPage { page_count });
            prop_assert!(state.page <= page_count.saturating_sub(1));
        }

        /// Three activations of the same header return to unsorted.
        #[test]
        fn prop_sort_cycle_has_period_three(column in "[a-z]{1,8}") {
            let mut state = TableState::default();
            for _ in 0..3 {
                state = reduce(state, TableAction::CycleSort(column.clone()));
            }
            prop_assert_eq!(state.sort, None);
        }
    }
}
