//! Legacy path matching.
//!
//! Legacy route paths are absolute patterns of literal and `:param`
//! segments, with `*` matching the rest of the pathname. Without `exact` a
//! pattern matches any pathname it is a segment-wise prefix of.

use std::collections::BTreeMap;

use serde::Serialize;

/// Route parameters by name.
pub type Params = BTreeMap<String, String>;

/// The result of matching a legacy route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// The pattern that matched.
    pub path: String,
    /// The matched part of the pathname.
    pub url: String,
    /// Whether the whole pathname was matched.
    pub is_exact: bool,
    pub params: Params,
}

/// How to match a legacy route path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub path: String,
    pub exact: bool,
    /// Compare literal segments case-sensitively.
    pub sensitive: bool,
}

impl MatchOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }
}

/// The match every legacy tree starts from.
pub fn compute_root_match(pathname: &str) -> Match {
    Match {
        path: "/".to_string(),
        url: "/".to_string(),
        is_exact: pathname == "/",
        params: Params::new(),
    }
}

/// Match `pathname` against a legacy route pattern.
pub fn match_path(pathname: &str, options: &MatchOptions) -> Option<Match> {
    let pattern: Vec<&str> = segments(&options.path).collect();
    let path: Vec<&str> = segments(pathname).collect();

    let mut params = Params::new();
    let mut consumed = 0;
    let mut splat = false;
    for (i, segment) in pattern.iter().enumerate() {
        if *segment == "*" {
            splat = true;
            consumed = path.len();
            break;
        }
        let actual = *path.get(i)?;
        match segment.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if options.sensitive => {
                if *segment != actual {
                    return None;
                }
            }
            None => {
                if !segment.eq_ignore_ascii_case(actual) {
                    return None;
                }
            }
        }
        consumed = i + 1;
    }

    let is_exact = splat || consumed == path.len();
    if options.exact && !is_exact {
        return None;
    }

    let url = if options.path == "/" && consumed == 0 {
        "/".to_string()
    } else {
        format!("/{}", path[..consumed].join("/"))
    };

    Some(Match {
        path: options.path.clone(),
        url,
        is_exact,
        params,
    })
}

fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pathname: &str, path: &str) -> Option<Match> {
        match_path(pathname, &MatchOptions::new(path))
    }

    #[test]
    fn root_match() {
        let root = compute_root_match("/a");
        assert_eq!(root.url, "/");
        assert!(!root.is_exact);
        assert!(compute_root_match("/").is_exact);
    }

    #[test]
    fn prefix_matching_on_segment_boundaries() {
        let found = m("/a/blocker", "/a").unwrap();
        assert_eq!(found.url, "/a");
        assert!(!found.is_exact);
        assert!(m("/ab", "/a").is_none());
        assert!(m("/anything", "/").is_some());
    }

    #[test]
    fn params_are_captured() {
        let found = m("/a/one", "/a/:param").unwrap();
        assert_eq!(found.params.get("param").map(String::as_str), Some("one"));
        assert_eq!(found.url, "/a/one");
        assert!(found.is_exact);
        assert!(m("/a", "/a/:param").is_none());
    }

    #[test]
    fn exact_and_case() {
        assert!(match_path("/a/b", &MatchOptions::new("/a").exact(true)).is_none());
        assert!(match_path("/a/", &MatchOptions::new("/a").exact(true)).is_some());
        assert!(m("/A", "/a").is_some());
        assert!(match_path("/A", &MatchOptions::new("/a").sensitive(true)).is_none());
    }

    #[test]
    fn star_matches_the_rest() {
        let found = m("/x/y/z", "/x/*").unwrap();
        assert_eq!(found.url, "/x/y/z");
        assert!(found.is_exact);
    }
}
