//! Transactions page. Payments are created by the payment flow, so there is
//! no add form; `i` writes an invoice for the row under the cursor.

use super::page::ResourcePage;
use crate::commands::{bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{ColumnDef, TableConfig, TableView};
use futures_util::FutureExt;
use garage_core::report::{invoice, DocumentFormat};
use garage_core::Transaction;

pub fn columns(format: &DocumentFormat) -> Vec<ColumnDef<Transaction>> {
    vec![
        ColumnDef::optional_text("customer_name", "Customer", |t: &Transaction| {
            t.customer_name.clone()
        })
        .min_width(14),
        ColumnDef::optional_text("email", "Email", |t: &Transaction| t.email.clone()),
        ColumnDef::optional_text("service_name", "Service", |t: &Transaction| {
            t.service_name.clone()
        }),
        ColumnDef::number("amount", "Amount", |t: &Transaction| t.amount).currency(format.clone()),
        ColumnDef::text("status", "Status", |t: &Transaction| t.status.to_string()),
        ColumnDef::optional_text("payment_method", "Method", |t: &Transaction| {
            t.payment_method.clone()
        }),
        ColumnDef::date("created_at", "Date", |t: &Transaction| t.created_at),
    ]
}

pub fn page(ctx: &PageContext) -> ResourcePage<Transaction> {
    let config = TableConfig::new(columns(&ctx.format))
        .filter_on("customer_name", "Filter by customer...")
        .page_size(ctx.page_size)
        .actions_column(false);

    ResourcePage::new(View::Transactions, TableView::new(bulk_actions(config, ctx))).with_document(
        Box::new(|table: &TableView<Transaction>, ctx: &PageContext| {
            let result = match table.cursor_row() {
                Some(tx) => Ok((format!("invoice-{}", tx.id), invoice(tx, &ctx.format))),
                None => Err("Move the cursor to a transaction first".to_string()),
            };
            async move { result }.boxed()
        }),
    )
}
