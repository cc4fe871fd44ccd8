//! URL template expansion and query string building.
//!
//! Templates use numbered placeholders (`items/{0}/parts/{1}`). Every value is
//! percent-escaped before substitution, so callers never pre-encode path
//! segments. Literal braces are written `{{` and `}}`.

use crate::{Error, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

/// Everything except RFC 3986 unreserved characters is escaped.
const URL_DATA: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const COLON_IN_TEMPLATE: &str = "Illegal character ':' in URL template. Format specifiers \
    inside placeholders (ex: {0:yyyy-MM-dd}) are not supported; format each value before \
    passing it to the call";

/// Percent-escapes a value for use inside a URL path segment or query value.
///
/// ```
/// assert_eq!(restline::url::escape("a b/c"), "a%20b%2Fc");
/// ```
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, URL_DATA).to_string()
}

/// Resolves a URL template against a base service URL.
///
/// * An empty or whitespace template yields `base_url` unchanged.
/// * A template starting with `http://` or `https://` is used as-is after
///   substitution.
/// * Otherwise the expanded template is appended to `base_url`, with a `/`
///   inserted unless the template starts with `/` or `?`.
///
/// `None` parameters substitute as empty strings.
///
/// # Errors
///
/// Returns [`Error::ConfigurationError`] when the template contains `:`
/// outside of an absolute URL's scheme and authority, when a placeholder is
/// malformed, or when it refers to a missing parameter.
///
/// ```
/// use restline::url::format_url;
///
/// let url = format_url("http://host/api", "items/{0}", &[Some("a b".to_string())]).unwrap();
/// assert_eq!(url, "http://host/api/items/a%20b");
/// ```
pub fn format_url(base_url: &str, template: &str, params: &[Option<String>]) -> Result<String> {
    if template.trim().is_empty() {
        return Ok(base_url.to_string());
    }

    let absolute = scheme_and_authority_len(template);
    if template[absolute.unwrap_or(0)..].contains(':') {
        return Err(Error::ConfigurationError(COLON_IN_TEMPLATE.to_string()));
    }

    let expanded = expand(template, params)?;
    if absolute.is_some() {
        return Ok(expanded);
    }

    let delimiter = if expanded.starts_with('/') || expanded.starts_with('?') {
        ""
    } else {
        "/"
    };
    Ok(format!("{base_url}{delimiter}{expanded}"))
}

/// Length of `scheme://authority` when the template is an absolute URL.
fn scheme_and_authority_len(template: &str) -> Option<usize> {
    let lower = template.get(..8).unwrap_or(template).to_ascii_lowercase();
    let scheme_len = if lower.starts_with("https://") {
        8
    } else if lower.starts_with("http://") {
        7
    } else {
        return None;
    };
    let authority_len = template[scheme_len..]
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(template.len() - scheme_len);
    Some(scheme_len + authority_len)
}

/// Substitutes `{N}` placeholders. Without parameters the template is returned untouched.
fn expand(template: &str, params: &[Option<String>]) -> Result<String> {
    if params.is_empty() {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut index = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => index.push(c),
                        None => {
                            return Err(Error::ConfigurationError(format!(
                                "Unclosed placeholder in URL template '{template}'"
                            )))
                        }
                    }
                }
                let index: usize = index.trim().parse().map_err(|_| {
                    Error::ConfigurationError(format!(
                        "Invalid placeholder '{{{index}}}' in URL template '{template}'"
                    ))
                })?;
                let value = params.get(index).ok_or_else(|| {
                    Error::ConfigurationError(format!(
                        "URL template '{template}' refers to parameter {index}, but only {} supplied",
                        params.len()
                    ))
                })?;
                if let Some(value) = value {
                    out.push_str(&escape(value));
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(Error::ConfigurationError(format!(
                    "Unmatched '}}' in URL template '{template}'"
                )))
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Builds a query string from the fields of a serializable value.
///
/// Fields are emitted in declaration order as `name=value` pairs joined by
/// `&`. Fields serializing to `null` are skipped. Strings are used verbatim,
/// other scalars use their JSON text, and every value is percent-escaped.
///
/// # Errors
///
/// Returns [`Error::SerializationFailed`] if the value cannot be serialized
/// and [`Error::ConfigurationError`] if it does not serialize to a map.
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Search { name: &'static str, page: Option<u32>, tag: Option<&'static str> }
///
/// let query = restline::url::build_query(&Search { name: "a b", page: Some(2), tag: None }).unwrap();
/// assert_eq!(query, "name=a%20b&page=2");
/// ```
pub fn build_query<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value =
        serde_json::to_value(value).map_err(|e| Error::SerializationFailed(e.to_string()))?;
    let members = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(members) => members,
        other => {
            return Err(Error::ConfigurationError(format!(
                "Query parameters must serialize to a struct or map, got {other}"
            )))
        }
    };

    let segments: Vec<String> = members
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(name, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", escape(name), escape(&text))
        })
        .collect();
    Ok(segments.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const BASE: &str = "http://localhost:5000/api";

    fn params(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_empty_template_returns_base() {
        assert_eq!(format_url(BASE, "", &[]).unwrap(), BASE);
        assert_eq!(format_url(BASE, "   ", &params(&[Some("x")])).unwrap(), BASE);
    }

    #[test]
    fn test_substitutes_in_order_and_escapes() {
        let url = format_url(BASE, "items/{0}/parts/{1}", &params(&[Some("a b"), Some("x/y")]))
            .unwrap();
        assert_eq!(url, "http://localhost:5000/api/items/a%20b/parts/x%2Fy");

        let url = format_url(BASE, "{1}/{0}/{1}", &params(&[Some("a"), Some("b")])).unwrap();
        assert_eq!(url, "http://localhost:5000/api/b/a/b");
    }

    #[test]
    fn test_null_parameter_is_empty() {
        let url = format_url(BASE, "items?name={0}&id={1}", &params(&[None, Some("7")])).unwrap();
        assert_eq!(url, "http://localhost:5000/api/items?name=&id=7");
    }

    #[test]
    fn test_delimiter_rules() {
        assert_eq!(
            format_url(BASE, "/items", &[]).unwrap(),
            "http://localhost:5000/api/items"
        );
        assert_eq!(
            format_url(BASE, "?q=1", &[]).unwrap(),
            "http://localhost:5000/api?q=1"
        );
        assert_eq!(
            format_url(BASE, "items", &[]).unwrap(),
            "http://localhost:5000/api/items"
        );
    }

    #[test]
    fn test_absolute_template_is_used_as_is() {
        let url = format_url(BASE, "https://other:8443/v1/{0}", &params(&[Some("é")])).unwrap();
        assert_eq!(url, "https://other:8443/v1/%C3%A9");
    }

    #[test]
    fn test_colon_is_rejected() {
        let err = format_url(BASE, "items/{0:yyyy}", &params(&[Some("x")])).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));

        let err = format_url(BASE, "http://host/a:b", &[]).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_malformed_placeholders() {
        let one = params(&[Some("a")]);
        assert!(format_url(BASE, "items/{1}", &one).is_err());
        assert!(format_url(BASE, "items/{x}", &one).is_err());
        assert!(format_url(BASE, "items/{0", &one).is_err());
        assert!(format_url(BASE, "items/0}", &one).is_err());
        assert_eq!(
            format_url(BASE, "items/{{{0}}}", &one).unwrap(),
            "http://localhost:5000/api/items/{a}"
        );
    }

    #[test]
    fn test_template_without_params_is_not_expanded() {
        assert_eq!(
            format_url(BASE, "items/{0}", &[]).unwrap(),
            "http://localhost:5000/api/items/{0}"
        );
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct QueryParameters {
        str_prop: Option<String>,
        str_field: Option<String>,
        int_field: Option<i32>,
        date_prop: Option<String>,
    }

    #[test]
    fn test_build_query_keeps_declaration_order_and_skips_nulls() {
        let query = build_query(&QueryParameters {
            str_prop: Some("b".to_string()),
            str_field: Some("a".to_string()),
            int_field: Some(123),
            date_prop: None,
        })
        .unwrap();
        assert_eq!(query, "StrProp=b&StrField=a&IntField=123");
    }

    #[test]
    fn test_build_query_escapes_values() {
        let mut map = BTreeMap::new();
        map.insert("q", "rust & tokio");
        map.insert("lang", "en-US");
        assert_eq!(build_query(&map).unwrap(), "lang=en-US&q=rust%20%26%20tokio");
    }

    #[test]
    fn test_build_query_edge_cases() {
        assert_eq!(build_query(&None::<QueryParameters>).unwrap(), "");
        assert!(matches!(
            build_query(&42).unwrap_err(),
            Error::ConfigurationError(_)
        ));
    }
}
