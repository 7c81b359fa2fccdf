//! Declarative document descriptions for invoices and reports.
//!
//! A [`Document`] is handed to an external renderer as JSON. This module only
//! decides what goes on the page: titles, tables and the formatted strings in
//! their cells. Layout and fonts belong to the renderer.

use crate::{InventoryItem, Service, ServiceReportRow, Timestamp, Transaction};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Style names understood by the renderer.
pub mod styles {
    pub const HEADER: &str = "header";
    pub const SUBHEADER: &str = "subheader";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const TOTAL: &str = "total";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub subtitle: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text { text: String, style: Option<String> },
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub header_style: String,
}

impl Table {
    fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            header_style: styles::TABLE_HEADER.to_string(),
        }
    }
}

/// Currency and date formatting for generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFormat {
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: "%d %b %Y".to_string(),
        }
    }
}

impl DocumentFormat {
    pub fn currency(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }

    pub fn date(&self, timestamp: Option<Timestamp>) -> String {
        match timestamp {
            Some(ts) => ts.format(&self.date_format).to_string(),
            None => "-".to_string(),
        }
    }
}

/// Invoice for a single payment transaction.
pub fn invoice(transaction: &Transaction, format: &DocumentFormat) -> Document {
    let mut details = Table::new(&["Field", "Value"]);
    details.rows.push(vec!["Invoice".to_string(), transaction.id.clone()]);
    details.rows.push(vec![
        "Date".to_string(),
        format.date(transaction.created_at),
    ]);
    details.rows.push(vec![
        "Customer".to_string(),
        transaction.customer_name.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    if let Some(email) = &transaction.email {
        details.rows.push(vec!["Email".to_string(), email.clone()]);
    }
    details.rows.push(vec![
        "Payment method".to_string(),
        transaction.payment_method.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    if let Some(reference) = &transaction.reference {
        details.rows.push(vec!["Reference".to_string(), reference.clone()]);
    }
    details.rows.push(vec!["Status".to_string(), transaction.status.to_string()]);

    let mut items = Table::new(&["Description", "Amount"]);
    items.rows.push(vec![
        transaction
            .service_name
            .clone()
            .unwrap_or_else(|| "Garage service".to_string()),
        format.currency(transaction.amount),
    ]);

    Document {
        title: "Invoice".to_string(),
        subtitle: Some(format!("Issued {}", format.date(Some(Utc::now())))),
        blocks: vec![
            Block::Table(details),
            Block::Table(items),
            Block::Text {
                text: format!("Total: {}", format.currency(transaction.amount)),
                style: Some(styles::TOTAL.to_string()),
            },
        ],
    }
}

/// Services report from the report endpoint rows.
pub fn services_report(rows: &[ServiceReportRow], format: &DocumentFormat) -> Document {
    let mut table = Table::new(&["Service", "Bookings", "Revenue"]);
    for row in rows {
        table.rows.push(vec![
            row.service_name.clone(),
            row.bookings.to_string(),
            format.currency(row.revenue),
        ]);
    }
    let total: f64 = rows.iter().map(|r| r.revenue).sum();

    Document {
        title: "Services Report".to_string(),
        subtitle: Some(format!("Generated {}", format.date(Some(Utc::now())))),
        blocks: vec![
            Block::Table(table),
            Block::Text {
                text: format!("Total revenue: {}", format.currency(total)),
                style: Some(styles::TOTAL.to_string()),
            },
        ],
    }
}

/// Price list built from the services collection, used when the report
/// endpoint is unavailable or for exporting a selection.
pub fn services_price_list(services: &[Service], format: &DocumentFormat) -> Document {
    let mut table = Table::new(&["Service", "Description", "Price", "Added"]);
    for service in services {
        table.rows.push(vec![
            service.service_name.clone(),
            service.description.clone().unwrap_or_default(),
            format.currency(service.price),
            format.date(service.created_at),
        ]);
    }

    Document {
        title: "Services".to_string(),
        subtitle: Some(format!("{} services", services.len())),
        blocks: vec![Block::Table(table)],
    }
}

/// Summary of a set of transactions with paid revenue total.
pub fn transactions_summary(transactions: &[Transaction], format: &DocumentFormat) -> Document {
    let mut table = Table::new(&["Date", "Customer", "Method", "Status", "Amount"]);
    for tx in transactions {
        table.rows.push(vec![
            format.date(tx.created_at),
            tx.customer_name.clone().unwrap_or_default(),
            tx.payment_method.clone().unwrap_or_default(),
            tx.status.to_string(),
            format.currency(tx.amount),
        ]);
    }
    let stats = crate::DashboardStats::from_transactions(transactions);

    Document {
        title: "Transactions".to_string(),
        subtitle: Some(format!("{} transactions", stats.total_transactions)),
        blocks: vec![
            Block::Table(table),
            Block::Text {
                text: format!(
                    "Paid revenue: {} ({} paid, average {})",
                    format.currency(stats.total_revenue),
                    stats.paid_transactions,
                    format.currency(stats.average_transaction)
                ),
                style: Some(styles::TOTAL.to_string()),
            },
        ],
    }
}

/// Stock sheet for inventory items.
pub fn inventory_sheet(items: &[InventoryItem], format: &DocumentFormat) -> Document {
    let mut table = Table::new(&["Item", "Supplier", "Qty", "Unit price", "Value"]);
    for item in items {
        table.rows.push(vec![
            item.item_name.clone(),
            item.supplier.clone().unwrap_or_default(),
            item.quantity.to_string(),
            format.currency(item.unit_price),
            format.currency(item.stock_value()),
        ]);
    }
    let total: f64 = items.iter().map(InventoryItem::stock_value).sum();

    Document {
        title: "Inventory".to_string(),
        subtitle: None,
        blocks: vec![
            Block::Table(table),
            Block::Text {
                text: format!("Stock value: {}", format.currency(total)),
                style: Some(styles::TOTAL.to_string()),
            },
        ],
    }
}
