//! Vehicles page.

use super::page::{field, optional, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{AddForm, CellValue, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView};
use garage_core::validation::required;
use garage_core::{NewVehicle, Vehicle};

pub fn columns() -> Vec<ColumnDef<Vehicle>> {
    vec![
        ColumnDef::text("plate_number", "Plate", |v: &Vehicle| v.plate_number.clone())
            .min_width(10),
        ColumnDef::text("make", "Make", |v: &Vehicle| v.make.clone()),
        ColumnDef::text("model", "Model", |v: &Vehicle| v.model.clone()),
        ColumnDef::new("year", "Year", |v: &Vehicle| match v.year {
            Some(year) => CellValue::Number(year as f64),
            None => CellValue::Empty,
        })
        .min_width(6),
        ColumnDef::optional_text("owner", "Owner", |v: &Vehicle| v.owner.clone()),
        ColumnDef::date("created_at", "Registered", |v: &Vehicle| v.created_at),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Add vehicle",
        fields: vec![
            FormField::new("plate_number", "Plate number", FieldKind::Text).required(),
            FormField::new("make", "Make", FieldKind::Text).required(),
            FormField::new("model", "Model", FieldKind::Text).required(),
            FormField::new("year", "Year", FieldKind::Number),
            FormField::new("owner", "Owner", FieldKind::Text),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewVehicle, String> {
    let text = |key: &str| {
        required(key, field(values, key))
            .map(str::to_string)
            .map_err(|e| e.to_string())
    };
    let year = match optional(values, "year") {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| format!("Invalid value for year: '{}' is not a year", raw))?,
        ),
        None => None,
    };
    Ok(NewVehicle {
        make: text("make")?,
        model: text("model")?,
        plate_number: text("plate_number")?,
        year,
        owner: optional(values, "owner"),
    })
}

pub fn page(ctx: &PageContext) -> ResourcePage<Vehicle> {
    let config = TableConfig::new(columns())
        .filter_on("plate_number", "Filter by plate...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<Vehicle, _, _>(ctx, build_payload));
    ResourcePage::new(View::Vehicles, TableView::new(bulk_actions(config, ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_must_be_numeric() {
        let mut values = FormValues::new();
        values.insert("plate_number".into(), "KAA 001A".into());
        values.insert("make".into(), "Toyota".into());
        values.insert("model".into(), "Corolla".into());
        values.insert("year".into(), "2019".into());
        assert_eq!(build_payload(&values).unwrap().year, Some(2019));

        values.insert("year".into(), "new".into());
        assert!(build_payload(&values).is_err());
    }
}
