//! Page routes and the compare deep link.
//!
//! Paths are resolved relative to a deployment base path, so `/scope/method/x`
//! under base `/scope` is the detail page for `x`.

use crate::store::MAX_COMPARE;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

static DETAIL_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/method/([^/]+)/?$").unwrap());

/// Query parameter holding the comma-separated compare ids.
pub const COMPARE_PARAM: &str = "methods";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Explorer,
    MethodDetail(String),
    Compare(Vec<String>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route '{input}': {message}")]
    Invalid { input: String, message: String },
}

impl Route {
    /// Resolve `path_and_query` (for example `/method/ocr?x=1`) under `base_path`.
    pub fn parse(path_and_query: &str, base_path: &str) -> Result<Route, RouteError> {
        let url = Url::parse("http://localhost/")
            .and_then(|root| root.join(path_and_query))
            .map_err(|e| RouteError::Invalid {
                input: path_and_query.to_string(),
                message: e.to_string(),
            })?;

        let base = normalize_base(base_path);
        let path = match url.path().strip_prefix(base.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => return Ok(Route::Unknown(url.path().to_string())),
        };

        let route = match path {
            "" | "/" | "/index.html" => Route::Explorer,
            "/compare" | "/compare/" | "/compare.html" => Route::Compare(compare_ids(&url)),
            other => match DETAIL_PATH.captures(other) {
                Some(caps) => Route::MethodDetail(caps[1].trim_end_matches(".html").to_string()),
                None => Route::Unknown(other.to_string()),
            },
        };
        Ok(route)
    }

    /// Path for this route under `base_path`.
    pub fn to_path(&self, base_path: &str) -> String {
        let base = normalize_base(base_path);
        match self {
            Route::Explorer => format!("{}/", base),
            Route::MethodDetail(id) => format!("{}/method/{}", base, id),
            Route::Compare(ids) => format!("{}/compare?{}={}", base, COMPARE_PARAM, ids.join(",")),
            Route::Unknown(path) => format!("{}{}", base, path),
        }
    }
}

/// Root-relative path, as shown in share links.
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path(""))
    }
}

/// Ids from the `methods` query parameter: trimmed, empty entries dropped,
/// first occurrence kept, at most three.
pub fn compare_ids(url: &Url) -> Vec<String> {
    let Some(raw) = url
        .query_pairs()
        .find(|(k, _)| k == COMPARE_PARAM)
        .map(|(_, v)| v.into_owned())
    else {
        return Vec::new();
    };
    parse_compare_list(&raw)
}

pub fn parse_compare_list(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if ids.len() == MAX_COMPARE {
            break;
        }
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

fn normalize_base(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes_without_base() {
        assert_eq!(Route::parse("/", "").unwrap(), Route::Explorer);
        assert_eq!(
            Route::parse("/method/ocr-pipeline", "").unwrap(),
            Route::MethodDetail("ocr-pipeline".into())
        );
        assert_eq!(
            Route::parse("/nowhere", "").unwrap(),
            Route::Unknown("/nowhere".into())
        );
    }

    #[test]
    fn test_parse_respects_base_path() {
        assert_eq!(Route::parse("/scope/", "/scope/").unwrap(), Route::Explorer);
        assert_eq!(
            Route::parse("/scope/method/a", "scope").unwrap(),
            Route::MethodDetail("a".into())
        );
        assert!(matches!(
            Route::parse("/other/method/a", "/scope").unwrap(),
            Route::Unknown(_)
        ));
        assert!(matches!(
            Route::parse("/scopex/method/a", "/scope").unwrap(),
            Route::Unknown(_)
        ));
    }

    #[test]
    fn test_compare_link_dedups_and_caps() {
        let route = Route::parse("/compare?methods=a,%20b,a,,c,d", "").unwrap();
        assert_eq!(
            route,
            Route::Compare(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(Route::parse("/compare", "").unwrap(), Route::Compare(vec![]));
    }

    #[test]
    fn test_to_path_round_trips() {
        let route = Route::Compare(vec!["a".into(), "b".into()]);
        let path = route.to_path("/scope");
        assert_eq!(path, "/scope/compare?methods=a,b");
        assert_eq!(Route::parse(&path, "/scope").unwrap(), route);
    }

    #[test]
    fn test_display_is_root_relative_path() {
        let route = Route::Compare(vec!["a".into(), "b".into()]);
        assert_eq!(route.to_string(), "/compare?methods=a,b");
        assert_eq!(Route::MethodDetail("x".into()).to_string(), "/method/x");
    }
}
