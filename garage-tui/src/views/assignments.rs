//! Mechanic assignments page.

use super::page::{field, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{AddForm, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView};
use garage_core::validation::required;
use garage_core::{Assign, NewAssign};

pub fn columns() -> Vec<ColumnDef<Assign>> {
    vec![
        ColumnDef::text("mechanic", "Mechanic", |a: &Assign| a.mechanic.clone()).min_width(14),
        ColumnDef::text("booking_id", "Booking", |a: &Assign| a.booking_id.clone()),
        ColumnDef::text("status", "Status", |a: &Assign| a.status.to_string()),
        ColumnDef::date("assigned_at", "Assigned", |a: &Assign| a.assigned_at),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Assign mechanic",
        fields: vec![
            FormField::new("booking_id", "Booking id", FieldKind::Text).required(),
            FormField::new("mechanic", "Mechanic", FieldKind::Text).required(),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewAssign, String> {
    let text = |key: &str| {
        required(key, field(values, key))
            .map(str::to_string)
            .map_err(|e| e.to_string())
    };
    Ok(NewAssign {
        booking_id: text("booking_id")?,
        mechanic: text("mechanic")?,
    })
}

pub fn page(ctx: &PageContext) -> ResourcePage<Assign> {
    let config = TableConfig::new(columns())
        .filter_on("mechanic", "Filter by mechanic...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<Assign, _, _>(ctx, build_payload));
    ResourcePage::new(View::Assignments, TableView::new(bulk_actions(config, ctx)))
}
