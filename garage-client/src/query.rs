//! Query keys identify one cached read.

use std::collections::BTreeMap;
use std::fmt;

/// Endpoint path plus ordered parameters.
///
/// Parameters are kept in a `BTreeMap` so insertion order never produces two
/// keys for the same logical query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    endpoint: String,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parameter_order_does_not_matter() {
        let a = QueryKey::new("/api/v1/bookings")
            .with_param("status", "pending")
            .with_param("page", "2");
        let b = QueryKey::new("/api/v1/bookings")
            .with_param("page", "2")
            .with_param("status", "pending");
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_renders_query_string() {
        let key = QueryKey::new("/api/v1/payments")
            .with_param("status", "paid")
            .with_param("limit", "10");
        assert_eq!(key.to_string(), "/api/v1/payments?limit=10&status=paid");
        assert_eq!(QueryKey::new("/x").to_string(), "/x");
    }
}
