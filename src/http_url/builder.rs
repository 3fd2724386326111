use std::fmt;

use url::Url;

use super::canonical::{canonicalize, percent_decode, Canonicalize};
use super::query::{
    names_and_values_to_query_string, query_string_to_names_and_values, QueryParameters,
};
use crate::error::UrlError;

/// Fluent builder for `http` and `https` URLs.
///
/// Path segments, query and fragment are stored in canonical (percent-encoded)
/// form. Query parameters live in a flat `name, value, ...` list where a
/// `None` value means the parameter has no `=`. A `None` list means the URL
/// has no query at all, which is different from an empty query (`?`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpUrlBuilder {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    encoded_path_segments: Vec<String>,
    encoded_query_names_and_values: Option<Vec<Option<String>>>,
    encoded_fragment: Option<String>,
}

impl HttpUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing absolute URL.
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let url = Url::parse(input)?;

        let mut builder = Self::new();
        builder
            .scheme(url.scheme())?
            .host(url.host_str().ok_or(UrlError::MissingHost)?)?;
        if let Some(port) = url.port() {
            builder.port(port)?;
        }
        if let Some(segments) = url.path_segments() {
            builder.encoded_path_segments = segments.map(str::to_string).collect();
        }
        builder.set_encoded_query(url.query());
        builder.set_encoded_fragment(url.fragment());
        Ok(builder)
    }

    pub fn scheme(&mut self, scheme: &str) -> Result<&mut Self, UrlError> {
        let scheme = if scheme.eq_ignore_ascii_case("http") {
            "http"
        } else if scheme.eq_ignore_ascii_case("https") {
            "https"
        } else {
            return Err(UrlError::UnexpectedScheme(scheme.to_string()));
        };
        self.scheme = Some(scheme.to_string());
        Ok(self)
    }

    /// Set the host. IPv6 literals may be given with or without brackets.
    pub fn host(&mut self, host: &str) -> Result<&mut Self, UrlError> {
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if bare.is_empty() || bare.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(UrlError::InvalidHost(host.to_string()));
        }
        self.host = Some(bare.to_ascii_lowercase());
        Ok(self)
    }

    pub fn port(&mut self, port: u16) -> Result<&mut Self, UrlError> {
        if port == 0 {
            return Err(UrlError::InvalidPort(port));
        }
        self.port = Some(port);
        Ok(self)
    }

    pub fn add_path_segment(&mut self, segment: &str) -> &mut Self {
        let canonical = canonicalize(segment, &Canonicalize::PATH_SEGMENT).into_owned();
        self.push_path_segment(canonical)
    }

    pub fn add_encoded_path_segment(&mut self, encoded_segment: &str) -> &mut Self {
        let canonical = canonicalize(encoded_segment, &Canonicalize::ENCODED_PATH_SEGMENT);
        self.push_path_segment(canonical.into_owned())
    }

    fn push_path_segment(&mut self, segment: String) -> &mut Self {
        // A trailing empty segment is the slash of "/a/" and gets replaced.
        match self.encoded_path_segments.last_mut() {
            Some(last) if last.is_empty() => *last = segment,
            _ => self.encoded_path_segments.push(segment),
        }
        self
    }

    pub fn encoded_path_segments(&self) -> &[String] {
        &self.encoded_path_segments
    }

    /// Replace the whole query with a raw (not yet encoded) query string.
    pub fn set_query(&mut self, query: Option<&str>) -> &mut Self {
        self.encoded_query_names_and_values = query.map(|q| {
            query_string_to_names_and_values(&canonicalize(q, &Canonicalize::QUERY))
        });
        self
    }

    /// Replace the whole query with an already-encoded query string.
    pub fn set_encoded_query(&mut self, encoded_query: Option<&str>) -> &mut Self {
        self.encoded_query_names_and_values = encoded_query.map(|q| {
            query_string_to_names_and_values(&canonicalize(q, &Canonicalize::ENCODED_QUERY))
        });
        self
    }

    pub fn add_query_parameter(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        let options = Canonicalize::QUERY_COMPONENT;
        self.push_canonical_query_parameter(
            canonicalize(name, &options).into_owned(),
            value.map(|v| canonicalize(v, &options).into_owned()),
        )
    }

    pub fn add_encoded_query_parameter(
        &mut self,
        encoded_name: &str,
        encoded_value: Option<&str>,
    ) -> &mut Self {
        let options = Canonicalize::ENCODED_QUERY_COMPONENT;
        self.push_canonical_query_parameter(
            canonicalize(encoded_name, &options).into_owned(),
            encoded_value.map(|v| canonicalize(v, &options).into_owned()),
        )
    }

    /// Replace every value of `name` with a single `value`.
    pub fn set_query_parameter(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.remove_all_query_parameters(name);
        self.add_query_parameter(name, value)
    }

    pub fn set_encoded_query_parameter(
        &mut self,
        encoded_name: &str,
        encoded_value: Option<&str>,
    ) -> &mut Self {
        self.remove_all_encoded_query_parameters(encoded_name);
        self.add_encoded_query_parameter(encoded_name, encoded_value)
    }

    pub fn remove_all_query_parameters(&mut self, name: &str) -> &mut Self {
        let canonical = canonicalize(name, &Canonicalize::QUERY_COMPONENT);
        self.remove_all_canonical_query_parameters(&canonical)
    }

    pub fn remove_all_encoded_query_parameters(&mut self, encoded_name: &str) -> &mut Self {
        let canonical = canonicalize(encoded_name, &Canonicalize::ENCODED_QUERY_COMPONENT);
        self.remove_all_canonical_query_parameters(&canonical)
    }

    /// Whether a parameter with the raw name `name` is present.
    pub fn contains_query_parameter(&self, name: &str) -> bool {
        let canonical = canonicalize(name, &Canonicalize::QUERY_COMPONENT);
        self.canonical_names().any(|n| n == canonical)
    }

    fn push_canonical_query_parameter(
        &mut self,
        name: String,
        value: Option<String>,
    ) -> &mut Self {
        let list = self.encoded_query_names_and_values.get_or_insert_with(Vec::new);
        list.push(Some(name));
        list.push(value);
        self
    }

    fn remove_all_canonical_query_parameters(&mut self, canonical_name: &str) -> &mut Self {
        let Some(list) = self.encoded_query_names_and_values.as_mut() else {
            return self;
        };

        let mut i = list.len();
        while i >= 2 {
            i -= 2;
            if list[i].as_deref() == Some(canonical_name) {
                list.drain(i..i + 2);
            }
        }

        if list.is_empty() {
            self.encoded_query_names_and_values = None;
        }
        self
    }

    fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.encoded_query_names_and_values
            .iter()
            .flat_map(|list| list.iter().step_by(2))
            .filter_map(|name| name.as_deref())
    }

    /// The query as it will appear on the wire, or `None` without a query.
    pub fn encoded_query(&self) -> Option<String> {
        self.encoded_query_names_and_values
            .as_deref()
            .map(names_and_values_to_query_string)
    }

    /// The query with every name and value decoded.
    pub fn query(&self) -> Option<String> {
        self.encoded_query_names_and_values.as_ref().map(|list| {
            let decoded: Vec<Option<String>> = list
                .iter()
                .map(|item| item.as_deref().map(|s| percent_decode(s, true).into_owned()))
                .collect();
            names_and_values_to_query_string(&decoded)
        })
    }

    /// Number of name/value pairs, counting repeated names.
    pub fn query_size(&self) -> usize {
        self.encoded_query_names_and_values
            .as_ref()
            .map_or(0, |list| list.len() / 2)
    }

    pub fn query_names_and_values(&self) -> QueryParameters {
        self.encoded_query_names_and_values
            .as_deref()
            .map(QueryParameters::from_encoded_names_and_values)
            .unwrap_or_default()
    }

    pub fn query_parameter_names(&self) -> Vec<String> {
        self.query_names_and_values()
            .names()
            .map(str::to_string)
            .collect()
    }

    pub fn query_parameter_values(&self, name: &str) -> Vec<Option<String>> {
        self.query_names_and_values().values(name).to_vec()
    }

    pub fn query_parameter(&self, name: &str) -> Option<String> {
        self.query_names_and_values().first(name).map(str::to_string)
    }

    pub fn set_fragment(&mut self, fragment: Option<&str>) -> &mut Self {
        self.encoded_fragment =
            fragment.map(|f| canonicalize(f, &Canonicalize::FRAGMENT).into_owned());
        self
    }

    pub fn set_encoded_fragment(&mut self, encoded_fragment: Option<&str>) -> &mut Self {
        self.encoded_fragment =
            encoded_fragment.map(|f| canonicalize(f, &Canonicalize::ENCODED_FRAGMENT).into_owned());
        self
    }

    pub fn encoded_fragment(&self) -> Option<&str> {
        self.encoded_fragment.as_deref()
    }

    pub fn fragment(&self) -> Option<String> {
        self.encoded_fragment
            .as_deref()
            .map(|f| percent_decode(f, false).into_owned())
    }

    pub fn build(&self) -> Result<Url, UrlError> {
        if self.scheme.is_none() {
            return Err(UrlError::MissingScheme);
        }
        if self.host.is_none() {
            return Err(UrlError::MissingHost);
        }
        Ok(Url::parse(&self.to_string())?)
    }

    fn effective_port(&self) -> Option<u16> {
        let default = match self.scheme.as_deref() {
            Some("http") => Some(80),
            Some("https") => Some(443),
            _ => None,
        };
        self.port.filter(|port| Some(*port) != default)
    }
}

impl fmt::Display for HttpUrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        if let Some(host) = &self.host {
            if host.contains(':') {
                write!(f, "[{host}]")?;
            } else {
                f.write_str(host)?;
            }
        }
        if let Some(port) = self.effective_port() {
            write!(f, ":{port}")?;
        }
        write!(f, "/{}", self.encoded_path_segments.join("/"))?;
        if let Some(query) = self.encoded_query() {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.encoded_fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HttpUrlBuilder {
        let mut builder = HttpUrlBuilder::new();
        builder.scheme("https").unwrap().host("example.com").unwrap();
        builder
    }

    #[test]
    fn add_query_parameter_encodes_space_and_ampersand() {
        let mut builder = base();
        builder.add_query_parameter("a b", Some("x&y"));
        assert_eq!(builder.encoded_query().as_deref(), Some("a+b=x%26y"));
        assert_eq!(builder.query().as_deref(), Some("a b=x&y"));
    }

    #[test]
    fn missing_value_differs_from_empty_value() {
        let mut builder = base();
        builder
            .add_query_parameter("flag", None)
            .add_query_parameter("empty", Some(""));
        assert_eq!(builder.encoded_query().as_deref(), Some("flag&empty="));
        assert_eq!(builder.query_parameter_values("flag"), vec![None]);
        assert_eq!(builder.query_parameter_values("empty"), vec![Some(String::new())]);
    }

    #[test]
    fn removing_last_parameter_drops_query() {
        let mut builder = base();
        builder.add_query_parameter("a", Some("1"));
        builder.remove_all_query_parameters("a");
        assert_eq!(builder.encoded_query(), None);
        assert_eq!(builder.to_string(), "https://example.com/");
    }

    #[test]
    fn empty_query_is_kept_distinct_from_no_query() {
        let mut builder = base();
        builder.set_encoded_query(Some(""));
        assert_eq!(builder.encoded_query().as_deref(), Some(""));
        assert_eq!(builder.to_string(), "https://example.com/?");
    }

    #[test]
    fn remove_compares_canonical_names() {
        let mut builder = base();
        builder
            .add_encoded_query_parameter("a+b", Some("1"))
            .add_query_parameter("a b", Some("2"))
            .add_query_parameter("ab", Some("3"));
        builder.remove_all_query_parameters("a b");
        assert_eq!(builder.encoded_query().as_deref(), Some("ab=3"));
    }

    #[test]
    fn set_replaces_every_value() {
        let mut builder = base();
        builder
            .add_query_parameter("page", Some("1"))
            .add_query_parameter("q", Some("rust"))
            .add_query_parameter("page", Some("2"))
            .set_query_parameter("page", Some("3"));
        assert_eq!(builder.encoded_query().as_deref(), Some("q=rust&page=3"));
        assert_eq!(builder.query_size(), 2);
    }

    #[test]
    fn encoded_parameters_keep_valid_escapes() {
        let mut builder = base();
        builder.add_encoded_query_parameter("q", Some("50%25+off&more=yes"));
        assert_eq!(
            builder.encoded_query().as_deref(),
            Some("q=50%25+off%26more%3Dyes")
        );
        assert_eq!(builder.query_parameter("q").as_deref(), Some("50% off&more=yes"));
    }

    #[test]
    fn set_query_splits_raw_string() {
        let mut builder = base();
        builder.set_query(Some("subject=math&easy&problem=5-2=3"));
        assert_eq!(
            builder.query_parameter_names(),
            vec!["subject", "easy", "problem"]
        );
        assert_eq!(builder.query_parameter("problem").as_deref(), Some("5-2=3"));
        assert!(builder.contains_query_parameter("easy"));
        assert!(!builder.contains_query_parameter("hard"));
    }

    #[test]
    fn path_segments_are_canonicalized() {
        let mut builder = base();
        builder
            .add_path_segment("docs")
            .add_path_segment("a/b c")
            .add_encoded_path_segment("x%20y");
        assert_eq!(builder.to_string(), "https://example.com/docs/a%2Fb%20c/x%20y");
    }

    #[test]
    fn default_port_is_omitted() {
        let mut builder = base();
        builder.port(443).unwrap();
        assert_eq!(builder.to_string(), "https://example.com/");
        builder.port(8443).unwrap();
        assert_eq!(builder.to_string(), "https://example.com:8443/");
    }

    #[test]
    fn rejects_invalid_arguments() {
        let mut builder = HttpUrlBuilder::new();
        assert_eq!(
            builder.scheme("ftp").unwrap_err(),
            UrlError::UnexpectedScheme("ftp".to_string())
        );
        assert_eq!(builder.host("").unwrap_err(), UrlError::InvalidHost(String::new()));
        assert_eq!(builder.port(0).unwrap_err(), UrlError::InvalidPort(0));
        assert_eq!(builder.build().unwrap_err(), UrlError::MissingScheme);
        builder.scheme("http").unwrap();
        assert_eq!(builder.build().unwrap_err(), UrlError::MissingHost);
    }

    #[test]
    fn fragment_round_trip() {
        let mut builder = base();
        builder.set_fragment(Some("section 2"));
        assert_eq!(builder.encoded_fragment(), Some("section%202"));
        assert_eq!(builder.fragment().as_deref(), Some("section 2"));
    }

    #[test]
    fn non_ascii_fragment_matches_built_url() {
        let mut builder = base();
        builder.set_fragment(Some("café"));
        assert_eq!(builder.encoded_fragment(), Some("caf%C3%A9"));
        assert_eq!(builder.fragment().as_deref(), Some("café"));
        assert_eq!(builder.build().unwrap().as_str(), builder.to_string());
    }

    #[test]
    fn encoded_mutations_compare_encoded_names() {
        let mut builder = base();
        builder
            .add_encoded_query_parameter("a%20b", Some("1"))
            .add_encoded_query_parameter("a+b", Some("2"))
            .add_query_parameter("ab", Some("3"));
        assert_eq!(
            builder.query_parameter_values("a b"),
            vec![Some("1".to_string()), Some("2".to_string())]
        );

        builder.remove_all_encoded_query_parameters("a+b");
        assert_eq!(builder.encoded_query().as_deref(), Some("a%20b=1&ab=3"));

        builder.set_encoded_query_parameter("a%20b", Some("x&y"));
        assert_eq!(builder.encoded_query().as_deref(), Some("ab=3&a%20b=x%26y"));
        assert_eq!(builder.query_parameter("a b").as_deref(), Some("x&y"));

        builder
            .remove_all_encoded_query_parameters("a%20b")
            .remove_all_encoded_query_parameters("ab");
        assert_eq!(builder.encoded_query(), None);
        assert_eq!(builder.to_string(), "https://example.com/");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let mut builder = HttpUrlBuilder::new();
        builder.scheme("http").unwrap().host("[::1]").unwrap().port(8080).unwrap();
        assert_eq!(builder.to_string(), "http://[::1]:8080/");
    }
}
