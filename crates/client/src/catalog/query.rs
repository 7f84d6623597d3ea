//! Catalog query parameters and validation.

use modelcat_core::Error;

use crate::fetcher::RequestParams;

/// Maximum length of the free-text search term.
const MAX_QUERY_CHARS: usize = 200;

/// Filters for the catalog endpoint.
///
/// Absent filters are omitted from the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Subscription plan the caller is on (e.g. "Pro+").
    pub plan: Option<String>,

    /// Match mode for `q` (e.g. "exact").
    pub mode: Option<String>,

    /// Restrict to one provider (e.g. "openai").
    pub provider: Option<String>,

    /// Free-text search term.
    pub q: Option<String>,
}

impl CatalogQuery {
    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("plan", self.plan.as_deref()),
            ("mode", self.mode.as_deref()),
            ("provider", self.provider.as_deref()),
            ("q", self.q.as_deref()),
        ]
    }
}

impl RequestParams for CatalogQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v.to_string())))
            .collect()
    }

    fn validate(&self) -> Result<(), Error> {
        for (name, value) in self.fields() {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::InvalidInput(format!("{name} cannot be empty")));
            }
        }

        if let Some(q) = &self.q
            && q.chars().count() > MAX_QUERY_CHARS
        {
            return Err(Error::InvalidInput(format!(
                "q too long: {} chars (max {MAX_QUERY_CHARS})",
                q.chars().count()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query() -> CatalogQuery {
        CatalogQuery {
            plan: Some("Pro+".into()),
            mode: Some("exact".into()),
            provider: Some("openai".into()),
            q: Some("gpt".into()),
        }
    }

    #[test]
    fn test_pairs_follow_declared_order() {
        let pairs = full_query().query_pairs();
        let names: Vec<_> = pairs.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["plan", "mode", "provider", "q"]);
        assert_eq!(pairs[0].1, "Pro+");
    }

    #[test]
    fn test_absent_filters_are_omitted() {
        let query = CatalogQuery { provider: Some("anthropic".into()), ..Default::default() };
        assert_eq!(query.query_pairs(), vec![("provider", "anthropic".to_string())]);
        assert!(CatalogQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn test_valid_query() {
        assert!(full_query().validate().is_ok());
        assert!(CatalogQuery::default().validate().is_ok());
    }

    #[test]
    fn test_empty_value_rejected() {
        let query = CatalogQuery { mode: Some("  ".into()), ..Default::default() };
        assert!(matches!(query.validate(), Err(Error::InvalidInput(msg)) if msg.contains("mode")));
    }

    #[test]
    fn test_q_too_long() {
        let query = CatalogQuery { q: Some("a".repeat(201)), ..Default::default() };
        assert!(query.validate().is_err());

        let query = CatalogQuery { q: Some("a".repeat(200)), ..Default::default() };
        assert!(query.validate().is_ok());
    }
}
