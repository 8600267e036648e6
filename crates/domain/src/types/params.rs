//! Ordered query parameters with explicit nulls

/// Ordered `(name, value)` pairs for the first request of an extraction.
///
/// A `None` value is an explicit null: the key is sent with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter with a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), Some(value.into())));
        self
    }

    /// Append a parameter whose value is an explicit null.
    #[must_use]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.0.push((name.into(), None));
        self
    }

    /// Look up a parameter: `None` if absent, `Some(None)` if explicitly null.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_absent_from_null() {
        let params = QueryParams::new().with("limit", "1000").with_null("filter[start_date]");

        assert_eq!(params.get("limit"), Some(Some("1000")));
        assert_eq!(params.get("filter[start_date]"), Some(None));
        assert_eq!(params.get("filter[end_date]"), None);
    }

    #[test]
    fn preserves_insertion_order() {
        let params = QueryParams::new().with("b", "2").with("a", "1");
        let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(params.len(), 2);
    }
}
