//! Services page.

use super::page::{field, optional, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{AddForm, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView};
use futures_util::FutureExt;
use garage_core::report::{services_price_list, services_report, DocumentFormat};
use garage_core::validation::{parse_amount, required};
use garage_core::{NewService, Service};

pub fn columns(format: &DocumentFormat) -> Vec<ColumnDef<Service>> {
    vec![
        ColumnDef::text("service_name", "Service", |s: &Service| s.service_name.clone())
            .min_width(16),
        ColumnDef::optional_text("description", "Description", |s: &Service| {
            s.description.clone()
        })
        .min_width(20),
        ColumnDef::number("price", "Price", |s: &Service| s.price).currency(format.clone()),
        ColumnDef::new("duration", "Minutes", |s: &Service| match s.duration {
            Some(minutes) => crate::table::CellValue::Number(minutes as f64),
            None => crate::table::CellValue::Empty,
        }),
        ColumnDef::date("created_at", "Added", |s: &Service| s.created_at),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Add service",
        fields: vec![
            FormField::new("service_name", "Service name", FieldKind::Text).required(),
            FormField::new("price", "Price", FieldKind::Number).required(),
            FormField::new("description", "Description", FieldKind::Text),
            FormField::new("duration", "Duration (minutes)", FieldKind::Number),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewService, String> {
    let service_name = required("service_name", field(values, "service_name"))
        .map_err(|e| e.to_string())?
        .to_string();
    let price = parse_amount("price", field(values, "price")).map_err(|e| e.to_string())?;
    let duration = match optional(values, "duration") {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| format!("Invalid value for duration: '{}' is not a number", raw))?,
        ),
        None => None,
    };
    Ok(NewService {
        service_name,
        price,
        description: optional(values, "description"),
        duration,
    })
}

pub fn page(ctx: &PageContext) -> ResourcePage<Service> {
    let config = TableConfig::new(columns(&ctx.format))
        .filter_on("service_name", "Filter services...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<Service, _, _>(ctx, build_payload));
    let table = TableView::new(bulk_actions(config, ctx));

    ResourcePage::new(View::Services, table).with_document(Box::new(
        |table: &TableView<Service>, ctx: &PageContext| {
            let services = table.data().to_vec();
            let client = ctx.client.clone();
            let format = ctx.format.clone();
            async move {
                match client.report().await {
                    Ok(rows) => Ok(("services-report".to_string(), services_report(&rows, &format))),
                    Err(err) => {
                        tracing::warn!(error = %err, "Report endpoint failed, using price list");
                        Ok((
                            "services-price-list".to_string(),
                            services_price_list(&services, &format),
                        ))
                    }
                }
            }
            .boxed()
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn payload_from_form() {
        let payload =
            build_payload(&values(&[("service_name", "Oil Change"), ("price", "25")])).unwrap();
        assert_eq!(payload.service_name, "Oil Change");
        assert_eq!(payload.price, 25.0);
        assert_eq!(payload.duration, None);
    }

    #[test]
    fn bad_price_is_rejected_before_sending() {
        let err = build_payload(&values(&[("service_name", "Wash"), ("price", "cheap")]))
            .unwrap_err();
        assert!(err.contains("price"));
        assert!(build_payload(&values(&[("price", "10")])).is_err());
    }
}
