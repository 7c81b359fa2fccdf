//! Generic tabular view over typed records.
//!
//! [`TableView`] owns the records, the column configuration and the
//! [`TableState`]. All derived data (filtered, sorted and paged rows, header
//! checkbox state) is recomputed from the full data on demand.

use super::column::ColumnDef;
use super::state::{reduce, SortDirection, TableAction, TableState};
use futures_util::future::BoxFuture;
use garage_core::{RecordId, Resource};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub type RowsCallback<R> = Box<dyn Fn(&[R]) + Send + Sync>;
pub type FormValues = BTreeMap<String, String>;
pub type SubmitCallback =
    Box<dyn Fn(FormValues) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Password,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FormField {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Description of the inline add form: ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

/// Tri-state of the header checkbox over the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Checked,
    Indeterminate,
    Unchecked,
}

pub struct TableConfig<R> {
    pub columns: Vec<ColumnDef<R>>,
    pub filter_column_id: Option<&'static str>,
    pub filter_placeholder: String,
    pub show_action_buttons: bool,
    pub show_actions_column: bool,
    pub page_size: usize,
    pub on_export_selected: Option<RowsCallback<R>>,
    pub on_delete_selected: Option<RowsCallback<R>>,
    pub on_export_all: Option<RowsCallback<R>>,
    pub on_add_submit: Option<SubmitCallback>,
    pub add_form: Option<AddForm>,
}

impl<R> TableConfig<R> {
    pub fn new(columns: Vec<ColumnDef<R>>) -> Self {
        Self {
            columns,
            filter_column_id: None,
            filter_placeholder: "Filter...".to_string(),
            show_action_buttons: true,
            show_actions_column: true,
            page_size: DEFAULT_PAGE_SIZE,
            on_export_selected: None,
            on_delete_selected: None,
            on_export_all: None,
            on_add_submit: None,
            add_form: None,
        }
    }

    pub fn filter_on(mut self, column_id: &'static str, placeholder: impl Into<String>) -> Self {
        self.filter_column_id = Some(column_id);
        self.filter_placeholder = placeholder.into();
        self
    }

    /// Zero falls back to the default size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    pub fn action_buttons(mut self, show: bool) -> Self {
        self.show_action_buttons = show;
        self
    }

    pub fn actions_column(mut self, show: bool) -> Self {
        self.show_actions_column = show;
        self
    }

    pub fn on_export_selected(mut self, callback: RowsCallback<R>) -> Self {
        self.on_export_selected = Some(callback);
        self
    }

    pub fn on_delete_selected(mut self, callback: RowsCallback<R>) -> Self {
        self.on_delete_selected = Some(callback);
        self
    }

    pub fn on_export_all(mut self, callback: RowsCallback<R>) -> Self {
        self.on_export_all = Some(callback);
        self
    }

    pub fn add_form(mut self, form: AddForm, on_submit: SubmitCallback) -> Self {
        self.add_form = Some(form);
        self.on_add_submit = Some(on_submit);
        self
    }
}

pub struct TableView<R> {
    config: TableConfig<R>,
    data: Vec<R>,
    state: TableState,
}

impl<R: Resource> TableView<R> {
    pub fn new(config: TableConfig<R>) -> Self {
        Self {
            config,
            data: Vec::new(),
            state: TableState::default(),
        }
    }

    pub fn with_data(mut self, data: Vec<R>) -> Self {
        self.set_data(data);
        self
    }

    pub fn config(&self) -> &TableConfig<R> {
        &self.config
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Replace the records. Selections of records that no longer exist are
    /// dropped and the page is clamped to the new result.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        let ids: Vec<RecordId> = self.data.iter().map(|r| r.id().clone()).collect();
        self.dispatch(TableAction::RetainRows(ids));
        self.clamp();
    }

    pub fn dispatch(&mut self, action: TableAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    // ------------------------------------------------------------------------
    // Derived rows
    // ------------------------------------------------------------------------

    fn filter_column(&self) -> Option<&ColumnDef<R>> {
        let id = self.config.filter_column_id?;
        self.config.columns.iter().find(|c| c.id == id)
    }

    pub fn filtered_rows(&self) -> Vec<&R> {
        let needle = self.state.filter_text.to_lowercase();
        match self.filter_column() {
            Some(column) if !needle.is_empty() => self
                .data
                .iter()
                .filter(|row| column.render(row).to_lowercase().contains(&needle))
                .collect(),
            _ => self.data.iter().collect(),
        }
    }

    pub fn sorted_rows(&self) -> Vec<&R> {
        let mut rows = self.filtered_rows();
        let Some(sort) = &self.state.sort else {
            return rows;
        };
        let Some(column) = self
            .config
            .columns
            .iter()
            .find(|c| c.id == sort.column_id && c.sortable)
        else {
            return rows;
        };
        rows.sort_by(|a, b| {
            let ordering = column.value(a).compare(&column.value(b));
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        rows
    }

    /// Number of pages; an empty result still has one (empty) page.
    pub fn page_count(&self) -> usize {
        let rows = self.filtered_rows().len();
        rows.div_ceil(self.config.page_size).max(1)
    }

    pub fn page_rows(&self) -> Vec<&R> {
        let size = self.config.page_size;
        self.sorted_rows()
            .into_iter()
            .skip(self.state.page * size)
            .take(size)
            .collect()
    }

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.config.columns
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef<R>> {
        self.config
            .columns
            .iter()
            .filter(|c| !self.state.hidden_columns.contains(c.id))
            .collect()
    }

    pub fn focused_column(&self) -> Option<&ColumnDef<R>> {
        self.config.columns.get(self.state.focused_column)
    }

    pub fn header_check(&self) -> HeaderCheck {
        let page = self.page_rows();
        let selected = page
            .iter()
            .filter(|r| self.state.selected_ids.contains(r.id()))
            .count();
        if selected == 0 {
            HeaderCheck::Unchecked
        } else if selected == page.len() {
            HeaderCheck::Checked
        } else {
            HeaderCheck::Indeterminate
        }
    }

    pub fn is_selected(&self, row: &R) -> bool {
        self.state.selected_ids.contains(row.id())
    }

    /// Selected records across all pages, in data order.
    pub fn selected_rows(&self) -> Vec<R> {
        self.data
            .iter()
            .filter(|r| self.state.selected_ids.contains(r.id()))
            .cloned()
            .collect()
    }

    pub fn cursor_row(&self) -> Option<&R> {
        self.page_rows().get(self.state.cursor).copied()
    }

    // ------------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------------

    fn clamp(&mut self) {
        let page_count = self.page_count();
        self.dispatch(TableAction::ClampPage { page_count });
        let rows = self.page_rows().len();
        self.dispatch(TableAction::ClampCursor { rows });
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.dispatch(TableAction::SetFilter(text.into()));
        self.clamp();
    }

    pub fn filter_input(&mut self, c: char) {
        self.dispatch(TableAction::FilterInput(c));
        self.clamp();
    }

    pub fn filter_backspace(&mut self) {
        self.dispatch(TableAction::FilterBackspace);
        self.clamp();
    }

    /// Give the filter input focus. Returns false when no filter column is
    /// configured.
    pub fn focus_filter(&mut self) -> bool {
        if self.filter_column().is_none() {
            return false;
        }
        self.dispatch(TableAction::FocusFilter);
        true
    }

    pub fn blur_filter(&mut self) {
        self.dispatch(TableAction::BlurFilter);
    }

    /// Header activation. Unknown and non-sortable columns are ignored.
    pub fn cycle_sort(&mut self, column_id: &str) {
        if self
            .config
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable)
        {
            self.dispatch(TableAction::CycleSort(column_id.to_string()));
        }
    }

    pub fn cycle_sort_focused(&mut self) {
        if let Some(id) = self.focused_column().map(|c| c.id) {
            self.cycle_sort(id);
        }
    }

    pub fn toggle_row(&mut self, id: &str) {
        self.dispatch(TableAction::ToggleRow(id.to_string()));
    }

    pub fn toggle_cursor_row(&mut self) {
        if let Some(id) = self.cursor_row().map(|r| r.id().clone()) {
            self.dispatch(TableAction::ToggleRow(id));
        }
    }

    /// Header checkbox: clear the page when it is fully selected, otherwise
    /// select every row on it. Other pages are untouched.
    pub fn toggle_page_selection(&mut self) {
        let ids: Vec<RecordId> = self.page_rows().iter().map(|r| r.id().clone()).collect();
        let action = match self.header_check() {
            HeaderCheck::Checked => TableAction::DeselectRows(ids),
            HeaderCheck::Indeterminate | HeaderCheck::Unchecked => TableAction::SelectRows(ids),
        };
        self.dispatch(action);
    }

    pub fn next_page(&mut self) {
        let page_count = self.page_count();
        self.dispatch(TableAction::NextPage { page_count });
    }

    pub fn prev_page(&mut self) {
        self.dispatch(TableAction::PrevPage);
    }

    pub fn cursor_down(&mut self) {
        let rows = self.page_rows().len();
        self.dispatch(TableAction::CursorDown { rows });
    }

    pub fn cursor_up(&mut self) {
        self.dispatch(TableAction::CursorUp);
    }

    pub fn focus_next_column(&mut self) {
        let column_count = self.config.columns.len();
        self.dispatch(TableAction::FocusNextColumn { column_count });
    }

    pub fn focus_prev_column(&mut self) {
        let column_count = self.config.columns.len();
        self.dispatch(TableAction::FocusPrevColumn { column_count });
    }

    /// Hide or show a column. Non-hideable columns are ignored.
    pub fn toggle_column(&mut self, column_id: &str) {
        if self
            .config
            .columns
            .iter()
            .any(|c| c.id == column_id && c.hideable)
        {
            self.dispatch(TableAction::ToggleColumn(column_id.to_string()));
        }
    }

    pub fn toggle_focused_column(&mut self) {
        if let Some(id) = self.focused_column().map(|c| c.id) {
            self.toggle_column(id);
        }
    }

    pub fn set_hidden_columns(&mut self, columns: BTreeSet<String>) {
        let known: BTreeSet<String> = columns
            .into_iter()
            .filter(|id| self.config.columns.iter().any(|c| c.id == id && c.hideable))
            .collect();
        self.dispatch(TableAction::SetHiddenColumns(known));
    }

    // ------------------------------------------------------------------------
    // Bulk actions
    // ------------------------------------------------------------------------

    /// Hand the selected records to the export callback. Returns whether the
    /// callback ran.
    pub fn export_selected(&self) -> bool {
        let rows = self.selected_rows();
        match &self.config.on_export_selected {
            Some(callback) if !rows.is_empty() => {
                callback(&rows);
                true
            }
            _ => false,
        }
    }

    pub fn export_all(&self) -> bool {
        match &self.config.on_export_all {
            Some(callback) => {
                callback(&self.data);
                true
            }
            None => false,
        }
    }

    /// Hand the selected records to the delete callback and clear the
    /// selection.
    pub fn delete_selected(&mut self) -> bool {
        let rows = self.selected_rows();
        let invoked = match &self.config.on_delete_selected {
            Some(callback) if !rows.is_empty() => {
                callback(&rows);
                true
            }
            _ => false,
        };
        if invoked {
            self.dispatch(TableAction::ClearSelection);
        }
        invoked
    }

    /// Row action from the actions column: delete the record under the cursor.
    pub fn delete_cursor_row(&mut self) -> bool {
        if !self.config.show_actions_column {
            return false;
        }
        let Some(row) = self.cursor_row().cloned() else {
            return false;
        };
        match &self.config.on_delete_selected {
            Some(callback) => {
                callback(std::slice::from_ref(&row));
                self.dispatch(TableAction::DeselectRows(vec![row.id().clone()]));
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Add form
    // ------------------------------------------------------------------------

    pub fn add_form(&self) -> Option<&AddForm> {
        self.config.add_form.as_ref()
    }

    pub fn open_add_form(&mut self) -> bool {
        let Some(fields) = self.config.add_form.as_ref().map(|f| f.fields.len()) else {
            return false;
        };
        self.dispatch(TableAction::OpenAddForm { fields });
        true
    }

    pub fn close_add_form(&mut self) {
        self.dispatch(TableAction::CloseAddForm);
    }

    pub fn form_input(&mut self, c: char) {
        self.dispatch(TableAction::FormInput(c));
    }

    pub fn form_backspace(&mut self) {
        self.dispatch(TableAction::FormBackspace);
    }

    pub fn form_next_field(&mut self) {
        self.dispatch(TableAction::FormNextField);
    }

    pub fn form_prev_field(&mut self) {
        self.dispatch(TableAction::FormPrevField);
    }

    /// Current form values keyed by field key. Everything but passwords is
    /// trimmed.
    pub fn form_values(&self) -> FormValues {
        let Some(form) = &self.config.add_form else {
            return FormValues::new();
        };
        form.fields
            .iter()
            .zip(self.state.form.values.iter())
            .map(|(field, value)| {
                let value = match field.kind {
                    FieldKind::Password => value.clone(),
                    _ => value.trim().to_string(),
                };
                (field.key.to_string(), value)
            })
            .collect()
    }

    /// Submit the add form and wait for the callback.
    ///
    /// Missing required fields fail without calling it. On success the form
    /// closes; on failure it stays open with the error shown inside.
    pub async fn submit_add_form(&mut self) -> Result<(), String> {
        if !self.state.add_form_open || self.state.form.submitting {
            return Err("No form to submit".to_string());
        }
        let values = self.form_values();
        let missing = self.config.add_form.as_ref().and_then(|form| {
            form.fields
                .iter()
                .find(|f| f.required && values.get(f.key).map_or(true, |v| v.is_empty()))
                .map(|f| format!("{} is required", f.label))
        });
        if let Some(message) = missing {
            self.dispatch(TableAction::SubmitFailed(message.clone()));
            return Err(message);
        }

        let future = match &self.config.on_add_submit {
            Some(submit) => submit(values),
            None => return Err("This table has no add action".to_string()),
        };
        self.dispatch(TableAction::SubmitStarted);
        match future.await {
            Ok(()) => {
                self.dispatch(TableAction::SubmitSucceeded);
                Ok(())
            }
            Err(message) => {
                self.dispatch(TableAction::SubmitFailed(message.clone()));
                Err(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::CellValue;
    use futures_util::FutureExt;
    use garage_core::Service;
    use std::sync::{Arc, Mutex};

    fn service(id: &str, name: &str, price: f64) -> Service {
        Service {
            id: id.to_string(),
            service_name: name.to_string(),
            description: None,
            price,
            duration: None,
            created_at: None,
        }
    }

    fn columns() -> Vec<ColumnDef<Service>> {
        vec![
            ColumnDef::text("service_name", "Service", |s: &Service| s.service_name.clone()),
            ColumnDef::number("price", "Price", |s: &Service| s.price),
            ColumnDef::optional_text("description", "Description", |s: &Service| {
                s.description.clone()
            })
            .not_sortable()
            .not_hideable(),
        ]
    }

    fn services(n: usize) -> Vec<Service> {
        (0..n)
            .map(|i| service(&format!("s{}", i), &format!("Service {}", i), i as f64))
            .collect()
    }

    fn table(data: Vec<Service>) -> TableView<Service> {
        TableView::new(TableConfig::new(columns()).filter_on("service_name", "Filter services..."))
            .with_data(data)
    }

    fn names(rows: &[&Service]) -> Vec<String> {
        rows.iter().map(|s| s.service_name.clone()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut view = table(vec![
            service("1", "Oil Change", 25.0),
            service("2", "Brake Check", 40.0),
            service("3", "oil filter", 10.0),
        ]);
        view.set_filter("OIL");
        assert_eq!(names(&view.filtered_rows()), vec!["Oil Change", "oil filter"]);
        view.set_filter("");
        assert_eq!(view.filtered_rows().len(), 3);
    }

    #[test]
    fn numeric_sort_puts_100_after_99() {
        let mut view = table(vec![
            service("1", "A", 100.0),
            service("2", "B", 99.0),
            service("3", "C", 5.0),
        ]);
        view.cycle_sort("price");
        let prices: Vec<f64> = view.sorted_rows().iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![5.0, 99.0, 100.0]);
        view.cycle_sort("price");
        let prices: Vec<f64> = view.sorted_rows().iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![100.0, 99.0, 5.0]);
        view.cycle_sort("price");
        assert_eq!(names(&view.sorted_rows()), vec!["A", "B", "C"]);
    }

    #[test]
    fn non_sortable_column_is_ignored() {
        let mut view = table(services(3));
        view.cycle_sort("description");
        assert_eq!(view.state().sort, None);
        view.cycle_sort("missing");
        assert_eq!(view.state().sort, None);
    }

    #[test]
    fn pages_hold_page_size_rows() {
        let view = table(services(25));
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page_rows().len(), 10);
        assert_eq!(table(Vec::new()).page_count(), 1);
    }

    #[test]
    fn filtering_clamps_page_index() {
        let mut view = table(services(25));
        view.next_page();
        view.next_page();
        assert_eq!(view.state().page, 2);
        view.set_filter("Service 1");
        // "Service 1" and "Service 10".."Service 19": eleven rows, two pages.
        assert_eq!(view.page_count(), 2);
        assert_eq!(view.state().page, 1);
        assert_eq!(view.page_rows().len(), 1);
    }

    #[test]
    fn header_checkbox_is_tri_state_over_page() {
        let mut view = table(services(15));
        assert_eq!(view.header_check(), HeaderCheck::Unchecked);
        view.toggle_page_selection();
        assert_eq!(view.header_check(), HeaderCheck::Checked);
        assert_eq!(view.state().selected_ids.len(), 10);

        view.toggle_row("s3");
        assert_eq!(view.header_check(), HeaderCheck::Indeterminate);
        view.toggle_page_selection();
        assert_eq!(view.header_check(), HeaderCheck::Checked);
        view.toggle_page_selection();
        assert_eq!(view.header_check(), HeaderCheck::Unchecked);
    }

    #[test]
    fn page_selection_leaves_other_pages_alone() {
        let mut view = table(services(15));
        view.next_page();
        view.toggle_row("s12");
        view.prev_page();
        view.toggle_page_selection();
        view.toggle_page_selection();
        assert_eq!(view.state().selected_ids.len(), 1);
        assert!(view.state().selected_ids.contains("s12"));
    }

    #[test]
    fn set_data_drops_vanished_selection() {
        let mut view = table(services(3));
        view.toggle_row("s0");
        view.toggle_row("s1");
        view.set_data(vec![service("s1", "Service 1", 1.0)]);
        assert_eq!(view.selected_rows().len(), 1);
    }

    #[test]
    fn hideable_columns_toggle() {
        let mut view = table(services(1));
        view.toggle_column("price");
        let ids: Vec<&str> = view.visible_columns().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["service_name", "description"]);
        view.toggle_column("description");
        assert_eq!(view.visible_columns().len(), 2);
        view.toggle_column("price");
        assert_eq!(view.visible_columns().len(), 3);
    }

    #[test]
    fn bulk_callbacks_receive_selected_rows() {
        let exported = Arc::new(Mutex::new(Vec::new()));
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let export_sink = exported.clone();
        let delete_sink = deleted.clone();
        let config = TableConfig::new(columns())
            .on_export_selected(Box::new(move |rows: &[Service]| {
                export_sink
                    .lock()
                    .unwrap()
                    .extend(rows.iter().map(|r| r.id.clone()));
            }))
            .on_delete_selected(Box::new(move |rows: &[Service]| {
                delete_sink
                    .lock()
                    .unwrap()
                    .extend(rows.iter().map(|r| r.id.clone()));
            }));
        let mut view = TableView::new(config).with_data(services(3));

        assert!(!view.export_selected());
        view.toggle_row("s2");
        view.toggle_row("s0");
        assert!(view.export_selected());
        assert!(view.delete_selected());

        assert_eq!(*exported.lock().unwrap(), vec!["s0", "s2"]);
        assert_eq!(*deleted.lock().unwrap(), vec!["s0", "s2"]);
        assert!(view.state().selected_ids.is_empty());
        assert!(!view.export_all());
    }

    fn add_form_table(result: Result<(), String>) -> (TableView<Service>, Arc<Mutex<Vec<FormValues>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let form = AddForm {
            title: "Add service",
            fields: vec![
                FormField::new("service_name", "Service name", FieldKind::Text).required(),
                FormField::new("price", "Price", FieldKind::Number).required(),
            ],
        };
        let config = TableConfig::new(columns()).add_form(
            form,
            Box::new(move |values| {
                sink.lock().unwrap().push(values);
                let result = result.clone();
                async move { result }.boxed()
            }),
        );
        (TableView::new(config), seen)
    }

    fn type_text(view: &mut TableView<Service>, text: &str) {
        for c in text.chars() {
            view.form_input(c);
        }
    }

    #[tokio::test]
    async fn successful_submit_closes_form() {
        let (mut view, seen) = add_form_table(Ok(()));
        assert!(view.open_add_form());
        type_text(&mut view, "Oil Change");
        view.form_next_field();
        type_text(&mut view, "25");

        assert_eq!(view.submit_add_form().await, Ok(()));
        assert!(!view.state().add_form_open);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0]["service_name"], "Oil Change");
        assert_eq!(seen[0]["price"], "25");
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_open_with_error() {
        let (mut view, _) = add_form_table(Err("Service already exists".to_string()));
        view.open_add_form();
        type_text(&mut view, "Oil Change");
        view.form_next_field();
        type_text(&mut view, "25");

        assert!(view.submit_add_form().await.is_err());
        assert!(view.state().add_form_open);
        assert_eq!(
            view.state().form.error.as_deref(),
            Some("Service already exists")
        );
        assert_eq!(view.state().form.values[0], "Oil Change");
    }

    #[tokio::test]
    async fn missing_required_field_skips_callback() {
        let (mut view, seen) = add_form_table(Ok(()));
        view.open_add_form();
        type_text(&mut view, "Oil Change");

        let result = view.submit_add_form().await;
        assert_eq!(result, Err("Price is required".to_string()));
        assert!(seen.lock().unwrap().is_empty());
        assert!(view.state().add_form_open);
    }

    #[test]
    fn passwords_keep_surrounding_spaces() {
        let form = AddForm {
            title: "Add user",
            fields: vec![
                FormField::new("name", "Name", FieldKind::Text),
                FormField::new("password", "Password", FieldKind::Password),
            ],
        };
        let config = TableConfig::new(columns())
            .add_form(form, Box::new(|_: FormValues| async { Ok::<(), String>(()) }.boxed()));
        let mut view = TableView::new(config);
        view.open_add_form();
        type_text(&mut view, "  Ann ");
        view.form_next_field();
        type_text(&mut view, " s3cret ");

        let values = view.form_values();
        assert_eq!(values["name"], "Ann");
        assert_eq!(values["password"], " s3cret ");
    }

    #[test]
    fn cell_values_feed_sorting() {
        let column = ColumnDef::<Service>::new("len", "Length", |s| {
            CellValue::Number(s.service_name.len() as f64)
        });
        assert_eq!(column.value(&service("1", "abc", 0.0)), CellValue::Number(3.0));
    }
}
