//! Generic tabular view reused by every resource page.
//!
//! - [`column`]: column definitions with typed cell accessors
//! - [`state`]: interaction state and the pure reducer
//! - [`view`]: derived rows, selection and bulk actions over the records
//! - [`render`]: ratatui rendering

pub mod column;
pub mod render;
pub mod state;
pub mod view;

pub use column::{CellValue, ColumnDef};
pub use render::{centered_rect, render_table};
pub use state::{reduce, ColumnSort, FormState, SortDirection, TableAction, TableState};
pub use view::{
    AddForm, FieldKind, FormField, FormValues, HeaderCheck, RowsCallback, SubmitCallback,
    TableConfig, TableView, DEFAULT_PAGE_SIZE,
};
