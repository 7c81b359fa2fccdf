//! Bookings page.

use super::page::{field, optional, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{AddForm, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView};
use garage_core::validation::{parse_date, required};
use garage_core::{Booking, NewBooking};

pub fn columns() -> Vec<ColumnDef<Booking>> {
    vec![
        ColumnDef::text("customer_name", "Customer", |b: &Booking| b.customer_name.clone())
            .min_width(14),
        ColumnDef::optional_text("vehicle", "Vehicle", |b: &Booking| b.vehicle.clone()),
        ColumnDef::optional_text("service", "Service", |b: &Booking| b.service.clone()),
        ColumnDef::date("booking_date", "Date", |b: &Booking| b.booking_date),
        ColumnDef::text("status", "Status", |b: &Booking| b.status.to_string()),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Add booking",
        fields: vec![
            FormField::new("customer_name", "Customer name", FieldKind::Text).required(),
            FormField::new("vehicle", "Vehicle", FieldKind::Text),
            FormField::new("service", "Service", FieldKind::Text),
            FormField::new("booking_date", "Date (YYYY-MM-DD)", FieldKind::Date),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewBooking, String> {
    let customer_name = required("customer_name", field(values, "customer_name"))
        .map_err(|e| e.to_string())?
        .to_string();
    let booking_date =
        parse_date("booking_date", field(values, "booking_date")).map_err(|e| e.to_string())?;
    Ok(NewBooking {
        customer_name,
        vehicle: optional(values, "vehicle"),
        service: optional(values, "service"),
        booking_date,
    })
}

pub fn page(ctx: &PageContext) -> ResourcePage<Booking> {
    let config = TableConfig::new(columns())
        .filter_on("customer_name", "Filter by customer...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<Booking, _, _>(ctx, build_payload));
    ResourcePage::new(View::Bookings, TableView::new(bulk_actions(config, ctx)))
}
