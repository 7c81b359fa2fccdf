//! Dashboard statistics computed from already-fetched records.

use crate::{PaymentStatus, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_transactions: usize,
    pub paid_transactions: usize,
    pub pending_transactions: usize,
    /// Sum of paid transaction amounts.
    pub total_revenue: f64,
    /// Revenue per paid transaction; zero when nothing has been paid.
    pub average_transaction: f64,
    pub services: usize,
    pub vehicles: usize,
    pub bookings: usize,
}

impl DashboardStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_transactions = transactions.len();
        let paid: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.status.is_paid())
            .collect();
        let pending_transactions = transactions
            .iter()
            .filter(|t| t.status == PaymentStatus::Pending)
            .count();
        let total_revenue: f64 = paid.iter().map(|t| t.amount).sum();
        // Guarded on the paid count; the total may be non-zero with nothing paid.
        let average_transaction = if paid.is_empty() {
            0.0
        } else {
            total_revenue / paid.len() as f64
        };

        Self {
            total_transactions,
            paid_transactions: paid.len(),
            pending_transactions,
            total_revenue,
            average_transaction,
            ..Self::default()
        }
    }

    pub fn with_counts(mut self, services: usize, vehicles: usize, bookings: usize) -> Self {
        self.services = services;
        self.vehicles = vehicles;
        self.bookings = bookings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: f64, status: PaymentStatus) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount,
            status,
            payment_method: None,
            customer_name: None,
            email: None,
            service_name: None,
            reference: None,
            created_at: None,
        }
    }

    #[test]
    fn average_uses_paid_count() {
        let stats = DashboardStats::from_transactions(&[
            tx("a", 100.0, PaymentStatus::Paid),
            tx("b", 50.0, PaymentStatus::Paid),
            tx("c", 999.0, PaymentStatus::Pending),
        ]);
        assert_eq!(stats.total_transactions, 3);
        assert_eq!(stats.paid_transactions, 2);
        assert_eq!(stats.pending_transactions, 1);
        assert_eq!(stats.total_revenue, 150.0);
        assert_eq!(stats.average_transaction, 75.0);
    }

    #[test]
    fn no_paid_transactions_yields_zero_average() {
        let stats = DashboardStats::from_transactions(&[
            tx("a", 10.0, PaymentStatus::Pending),
            tx("b", 20.0, PaymentStatus::Failed),
        ]);
        assert_eq!(stats.paid_transactions, 0);
        assert_eq!(stats.average_transaction, 0.0);
        assert!(stats.average_transaction.is_finite());
    }

    #[test]
    fn empty_ledger() {
        let stats = DashboardStats::from_transactions(&[]).with_counts(3, 2, 1);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.services, 3);
        assert_eq!(stats.bookings, 1);
    }
}
