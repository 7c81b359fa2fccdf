//! Navigation and view switching utilities.

use garage_core::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum View {
    #[default]
    Dashboard,
    Services,
    Vehicles,
    Bookings,
    Assignments,
    Inventory,
    Users,
    Transactions,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            other => other
                .resource_kind()
                .map(|kind| kind.label())
                .unwrap_or("Dashboard"),
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Dashboard,
            View::Services,
            View::Vehicles,
            View::Bookings,
            View::Assignments,
            View::Inventory,
            View::Users,
            View::Transactions,
        ]
    }

    /// Collection shown by this view; the dashboard aggregates several.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            View::Dashboard => None,
            View::Services => Some(ResourceKind::Service),
            View::Vehicles => Some(ResourceKind::Vehicle),
            View::Bookings => Some(ResourceKind::Booking),
            View::Assignments => Some(ResourceKind::Assign),
            View::Inventory => Some(ResourceKind::Inventory),
            View::Users => Some(ResourceKind::User),
            View::Transactions => Some(ResourceKind::Transaction),
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(View::Transactions.next(), View::Dashboard);
        assert_eq!(View::Dashboard.previous(), View::Transactions);
        for view in View::all() {
            assert_eq!(view.next().previous(), *view);
        }
    }

    #[test]
    fn titles_follow_resource_labels() {
        assert_eq!(View::Assignments.title(), "Assignments");
        assert_eq!(View::Dashboard.title(), "Dashboard");
        assert_eq!(View::from_index(7), Some(View::Transactions));
        assert_eq!(View::from_index(8), None);
    }
}
