/// Query-string pairs in insertion order. Keys may repeat, which is how the
/// API receives multi-valued filters (`status=PENDING&status=COMPLETED`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Push free text, skipping absent or blank values
    pub fn push_text(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub fn push_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// One pair per value under the same key
    pub fn push_each<I>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        values.into_iter().fold(self, |params, v| params.push(key, v))
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_skipped() {
        let params = QueryParams::new()
            .push_text("searchName", Some("  "))
            .push_text("dateFrom", None)
            .push_text("query", Some(" ana "));
        assert_eq!(params.as_slice(), &[("query".to_string(), "ana".to_string())]);
    }

    #[test]
    fn repeated_keys_keep_order() {
        let params = QueryParams::new().push_each("status", ["PENDING", "COMPLETED"]);
        assert_eq!(params.get_all("status").collect::<Vec<_>>(), ["PENDING", "COMPLETED"]);
    }
}
