//! Inventory page with a stock sheet document.

use super::page::{field, optional, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{
    AddForm, CellValue, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView,
};
use futures_util::FutureExt;
use garage_core::report::{inventory_sheet, DocumentFormat};
use garage_core::validation::{parse_amount, parse_quantity, required};
use garage_core::{InventoryItem, NewInventoryItem};

pub fn columns(format: &DocumentFormat) -> Vec<ColumnDef<InventoryItem>> {
    vec![
        ColumnDef::text("item_name", "Item", |i: &InventoryItem| i.item_name.clone())
            .min_width(16),
        ColumnDef::optional_text("supplier", "Supplier", |i: &InventoryItem| {
            i.supplier.clone()
        }),
        ColumnDef::new("quantity", "Qty", |i: &InventoryItem| {
            CellValue::Number(i.quantity as f64)
        })
        .min_width(5),
        ColumnDef::number("unit_price", "Unit price", |i: &InventoryItem| i.unit_price)
            .currency(format.clone()),
        ColumnDef::number("stock_value", "Value", InventoryItem::stock_value)
            .currency(format.clone()),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Add stock item",
        fields: vec![
            FormField::new("item_name", "Item name", FieldKind::Text).required(),
            FormField::new("quantity", "Quantity", FieldKind::Number).required(),
            FormField::new("unit_price", "Unit price", FieldKind::Number).required(),
            FormField::new("supplier", "Supplier", FieldKind::Text),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewInventoryItem, String> {
    let item_name = required("item_name", field(values, "item_name"))
        .map_err(|e| e.to_string())?
        .to_string();
    let quantity = parse_quantity("quantity", field(values, "quantity")).map_err(|e| e.to_string())?;
    let unit_price =
        parse_amount("unit_price", field(values, "unit_price")).map_err(|e| e.to_string())?;
    Ok(NewInventoryItem {
        item_name,
        quantity,
        unit_price,
        supplier: optional(values, "supplier"),
    })
}

pub fn page(ctx: &PageContext) -> ResourcePage<InventoryItem> {
    let config = TableConfig::new(columns(&ctx.format))
        .filter_on("item_name", "Filter items...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<InventoryItem, _, _>(ctx, build_payload));

    ResourcePage::new(View::Inventory, TableView::new(bulk_actions(config, ctx))).with_document(
        Box::new(|table: &TableView<InventoryItem>, ctx: &PageContext| {
            let document = inventory_sheet(table.data(), &ctx.format);
            async move { Ok(("inventory".to_string(), document)) }.boxed()
        }),
    )
}
