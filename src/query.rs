//! Query string parameters.
//!
//! Parsed once per request, percent-decoded, order preserved. Repeated keys
//! are kept: [`Query::get`] returns the first value, [`Query::get_all`] every
//! value in order.
//!
//! ```rust
//! use strata::Query;
//!
//! let q = Query::parse("tag=a&tag=b&q=hello%20world");
//! assert_eq!(q.get("tag"), Some("a"));
//! assert_eq!(q.get_all("tag").collect::<Vec<_>>(), ["a", "b"]);
//! assert_eq!(q.get("q"), Some("hello world"));
//! ```

use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Parses a raw query string (without the leading `?`). `+` decodes to a
    /// space; a key without `=` gets an empty value.
    pub fn parse(raw: &str) -> Self {
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with_temporary_key(q: &Query) -> Option<&str> {
        let key = String::from("page");
        q.get(&key)
    }

    #[test]
    fn values_outlive_the_lookup_key() {
        let q = Query::parse("page=5");
        assert_eq!(lookup_with_temporary_key(&q), Some("5"));
    }

    #[test]
    fn empty_query_has_no_pairs() {
        let q = Query::parse("");
        assert!(q.is_empty());
        assert_eq!(q.get("page"), None);
    }

    #[test]
    fn keeps_repeated_keys_in_order() {
        let q = Query::parse("sort=email&page=5&sort=name");
        assert_eq!(q.get("sort"), Some("email"));
        assert_eq!(q.get_all("sort").collect::<Vec<_>>(), ["email", "name"]);
        assert_eq!(q.iter().count(), 3);
    }

    #[test]
    fn decodes_plus_and_percent_escapes() {
        let q = Query::parse("name=Ada+Lovelace&mail=ada%40example.com");
        assert_eq!(q.get("name"), Some("Ada Lovelace"));
        assert_eq!(q.get("mail"), Some("ada@example.com"));
    }

    #[test]
    fn bare_keys_are_present_with_empty_values() {
        let q = Query::parse("include_posts&page=2");
        assert!(q.contains("include_posts"));
        assert_eq!(q.get("include_posts"), Some(""));
    }
}
