//! Canonical request construction.
//!
//! The canonical form is the request URL with query parameters appended in
//! the order the caller declares them. The same string goes on the wire and
//! into the cache key, so two calls with the same logical arguments always
//! share an entry.

use url::Url;

use super::hash::compute_cache_key;

/// A fully formed GET request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    url: Url,
}

impl CanonicalRequest {
    /// Build a request from an endpoint and ordered query parameters.
    ///
    /// Any query already on the endpoint is kept and the parameters are
    /// appended after it. Fragments are dropped.
    pub fn new<I, K, V>(endpoint: &Url, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = endpoint.clone();
        url.set_fragment(None);

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name.as_ref(), value.as_ref());
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }

        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Cache key for this request.
    pub fn key(&self) -> String {
        compute_cache_key(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("https://example.com/api/models").unwrap()
    }

    #[test]
    fn test_no_params_leaves_no_query() {
        let request = CanonicalRequest::new(&endpoint(), Vec::<(&str, &str)>::new());
        assert_eq!(request.as_str(), "https://example.com/api/models");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_params_keep_declared_order() {
        let request = CanonicalRequest::new(&endpoint(), [("plan", "Pro+"), ("q", "gpt")]);
        assert_eq!(request.url().query(), Some("plan=Pro%2B&q=gpt"));

        let reordered = CanonicalRequest::new(&endpoint(), [("q", "gpt"), ("plan", "Pro+")]);
        assert_ne!(request.key(), reordered.key());
    }

    #[test]
    fn test_same_params_same_key() {
        let a = CanonicalRequest::new(&endpoint(), [("mode", "exact"), ("provider", "openai")]);
        let b = CanonicalRequest::new(&endpoint(), [("mode", "exact"), ("provider", "openai")]);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_endpoint_query_and_fragment() {
        let endpoint = Url::parse("https://example.com/api/models?v=2#top").unwrap();
        let request = CanonicalRequest::new(&endpoint, [("q", "gpt")]);
        assert_eq!(request.as_str(), "https://example.com/api/models?v=2&q=gpt");
    }
}
