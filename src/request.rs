//! The incoming request a document is assembled for.

use std::borrow::Cow;

/// Method, decoded path and query parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Percent-decoded path, always starting with `/`.
    pub path: String,
    /// Decoded query parameters in URL order.
    pub query: Vec<(String, String)>,
}

impl Request {
    /// Parse a request target such as `/about/?clear_cache=clear_cache`.
    pub fn parse(url: &str) -> Self {
        Self::with_method("GET", url)
    }

    pub fn with_method(method: &str, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = percent_decode(path);
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_query(name), decode_query(value))
            })
            .collect();

        Self {
            method: method.to_ascii_uppercase(),
            path,
            query,
        }
    }

    /// First value of query parameter `name`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the query carries `key=key`, the form a cache bypass takes.
    pub fn has_bypass(&self, key: &str) -> bool {
        !key.is_empty() && self.query(key) == Some(key)
    }

    /// Page cache key: the path without query or trailing slash; `/` for the root.
    pub fn cache_key(&self) -> Cow<'_, str> {
        match self.path.trim_end_matches('/') {
            "" => Cow::Borrowed("/"),
            trimmed => Cow::Borrowed(trimmed),
        }
    }
}

fn percent_decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| text.to_owned())
}

/// Query components also encode spaces as `+`.
fn decode_query(text: &str) -> String {
    percent_decode(&text.replace('+', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_query() {
        let request = Request::parse("/blog/hello%20world/?page=2&tag=a+b");

        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/blog/hello world/");
        assert_eq!(request.query("page"), Some("2"));
        assert_eq!(request.query("tag"), Some("a b"));
        assert_eq!(request.query("missing"), None);
    }

    #[test]
    fn test_plus_is_literal_in_path() {
        let request = Request::parse("/c++/?q=c++");

        assert_eq!(request.path, "/c++/");
        assert_eq!(request.cache_key(), "/c++");
        assert_eq!(request.query("q"), Some("c  "));
    }

    #[test]
    fn test_cache_key_ignores_query_and_trailing_slash() {
        assert_eq!(Request::parse("/about").cache_key(), "/about");
        assert_eq!(Request::parse("/about/").cache_key(), "/about");
        assert_eq!(Request::parse("/about?x=1").cache_key(), "/about");
    }

    #[test]
    fn test_cache_key_root() {
        assert_eq!(Request::parse("/").cache_key(), "/");
        assert_eq!(Request::parse("").cache_key(), "/");
        assert_eq!(Request::parse("/?clear_cache=clear_cache").cache_key(), "/");
    }

    #[test]
    fn test_has_bypass_requires_matching_value() {
        let request = Request::parse("/?clear_cache=clear_cache&flush=1");
        assert!(request.has_bypass("clear_cache"));
        assert!(!request.has_bypass("flush"));
        assert!(!request.has_bypass("clear_all_cache"));
        assert!(!request.has_bypass(""));
    }

    #[test]
    fn test_flag_without_value() {
        let request = Request::parse("/a?debug");
        assert_eq!(request.query("debug"), Some(""));
    }

    #[test]
    fn test_with_method_uppercases() {
        assert_eq!(Request::with_method("post", "/form").method, "POST");
    }
}
