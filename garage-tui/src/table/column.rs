//! Column definitions with accessors bound at definition time.

use garage_core::report::DocumentFormat;
use garage_core::Timestamp;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Typed value of one cell.
///
/// Values of the same kind compare naturally (numbers numerically, dates
/// chronologically, text case-insensitively). Mixed kinds order as
/// `Empty < Number < Date < Text` so the ordering stays total.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Date(Timestamp),
    Text(String),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
        }
    }

    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(ts) => write!(f, "{}", ts.format("%d %b %Y")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::text).unwrap_or(CellValue::Empty)
    }
}

impl From<Option<Timestamp>> for CellValue {
    fn from(value: Option<Timestamp>) -> Self {
        value.map(CellValue::Date).unwrap_or(CellValue::Empty)
    }
}

pub type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;
pub type Formatter = Arc<dyn Fn(&CellValue) -> String + Send + Sync>;

pub struct ColumnDef<R> {
    pub id: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub hideable: bool,
    pub min_width: u16,
    accessor: Accessor<R>,
    formatter: Option<Formatter>,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            header: self.header,
            sortable: self.sortable,
            hideable: self.hideable,
            min_width: self.min_width,
            accessor: Arc::clone(&self.accessor),
            formatter: self.formatter.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish()
    }
}

impl<R> ColumnDef<R> {
    pub fn new<F>(id: &'static str, header: &'static str, accessor: F) -> Self
    where
        F: Fn(&R) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id,
            header,
            sortable: true,
            hideable: true,
            min_width: 8,
            accessor: Arc::new(accessor),
            formatter: None,
        }
    }

    pub fn text<F>(id: &'static str, header: &'static str, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(id, header, move |row| CellValue::text(accessor(row)))
    }

    pub fn optional_text<F>(id: &'static str, header: &'static str, accessor: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(id, header, move |row| CellValue::from(accessor(row)))
    }

    pub fn number<F>(id: &'static str, header: &'static str, accessor: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        Self::new(id, header, move |row| CellValue::Number(accessor(row)))
    }

    pub fn date<F>(id: &'static str, header: &'static str, accessor: F) -> Self
    where
        F: Fn(&R) -> Option<Timestamp> + Send + Sync + 'static,
    {
        Self::new(id, header, move |row| CellValue::from(accessor(row)))
    }

    /// Render numbers as currency amounts.
    pub fn currency(self, format: DocumentFormat) -> Self {
        self.with_formatter(move |value| match value {
            CellValue::Number(n) => format.currency(*n),
            other => other.to_string(),
        })
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn not_hideable(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = width;
        self
    }

    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Display text of the cell; this is also what the filter matches.
    pub fn render(&self, row: &R) -> String {
        let value = self.value(row);
        match &self.formatter {
            Some(formatter) => formatter(&value),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numbers_compare_numerically() {
        let a = CellValue::Number(100.0);
        let b = CellValue::Number(99.0);
        assert_eq!(a.compare(&b), Ordering::Greater);
        // As text the order would be reversed.
        assert_eq!(
            CellValue::text("100").compare(&CellValue::text("99")),
            Ordering::Less
        );
    }

    #[test]
    fn dates_compare_chronologically() {
        let early = CellValue::Date(chrono::Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap());
        let late = CellValue::Date(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(early.compare(&late), Ordering::Less);
    }

    #[test]
    fn text_compares_lexicographically() {
        assert_eq!(
            CellValue::text("Banana").compare(&CellValue::text("apple")),
            Ordering::Less
        );
        assert_eq!(
            CellValue::text("A").compare(&CellValue::text("a")),
            Ordering::Less
        );
        assert_eq!(
            CellValue::text("Brake").compare(&CellValue::text("Brake")),
            Ordering::Equal
        );
    }

    #[test]
    fn empty_sorts_first() {
        assert_eq!(
            CellValue::Empty.compare(&CellValue::Number(-1.0)),
            Ordering::Less
        );
        assert_eq!(CellValue::text(""), CellValue::Empty);
    }

    #[test]
    fn render_uses_formatter() {
        struct Row {
            price: f64,
        }
        let plain = ColumnDef::<Row>::number("price", "Price", |r| r.price);
        let money = plain.clone().currency(DocumentFormat::default());
        let row = Row { price: 25.0 };
        assert_eq!(plain.render(&row), "25");
        assert_eq!(money.render(&row), "$25.00");
        assert_eq!(plain.render(&Row { price: 15.5 }), "15.5");
    }
}
