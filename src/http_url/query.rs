use super::canonical::percent_decode;

/// Split an encoded query into a flat `name, value, name, value, ...` list.
///
/// Only the first `=` of each `&`-separated segment separates the name from
/// the value. A segment without `=` has no value (`None`), which is distinct
/// from an empty value (`a` versus `a=`). Names are always `Some`.
pub fn query_string_to_names_and_values(encoded_query: &str) -> Vec<Option<String>> {
    let mut result = Vec::new();
    for segment in encoded_query.split('&') {
        match segment.split_once('=') {
            Some((name, value)) => {
                result.push(Some(name.to_string()));
                result.push(Some(value.to_string()));
            }
            None => {
                result.push(Some(segment.to_string()));
                result.push(None);
            }
        }
    }
    result
}

/// Join a flat `name, value, ...` list back into a query string.
///
/// A `None` value is written as a bare name, without `=`.
pub fn names_and_values_to_query_string(names_and_values: &[Option<String>]) -> String {
    let mut out = String::new();
    for (i, pair) in names_and_values.chunks(2).enumerate() {
        if i > 0 {
            out.push('&');
        }
        if let Some(name) = &pair[0] {
            out.push_str(name);
        }
        if let Some(Some(value)) = pair.get(1) {
            out.push('=');
            out.push_str(value);
        }
    }
    out
}

/// Decoded query parameters, grouped by name.
///
/// Names keep the order in which they first appear; the values of each name
/// keep their order too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    entries: Vec<(String, Vec<Option<String>>)>,
}

impl QueryParameters {
    pub fn parse(encoded_query: &str) -> Self {
        Self::from_encoded_names_and_values(&query_string_to_names_and_values(encoded_query))
    }

    pub fn from_encoded_names_and_values(names_and_values: &[Option<String>]) -> Self {
        let mut params = Self::default();
        for pair in names_and_values.chunks(2) {
            let name = pair[0].as_deref().map(|n| percent_decode(n, true).into_owned());
            let value = pair
                .get(1)
                .and_then(|v| v.as_deref())
                .map(|v| percent_decode(v, true).into_owned());
            params.push(name.unwrap_or_default(), value);
        }
        params
    }

    pub fn push(&mut self, name: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self, name: &str) -> &[Option<String>] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// First value of `name`. Parameters present without a value yield `None`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().and_then(|v| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
