//! Navigation targets: parsing, validation and resolution.

use std::fmt;

/// Errors for navigation targets that can never be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An explicit `pathname` contains a `?`.
    QuestionMarkInPathname { pathname: String },
    /// An explicit `pathname` contains a `#`.
    HashInPathname { pathname: String },
    /// An explicit `search` contains a `#`.
    HashInSearch { search: String },
    /// The target contains an ASCII control character.
    ControlCharacter { target: String, position: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::QuestionMarkInPathname { pathname } => {
                write!(f, "cannot include a '?' in pathname '{}'", pathname)
            }
            PathError::HashInPathname { pathname } => {
                write!(f, "cannot include a '#' in pathname '{}'", pathname)
            }
            PathError::HashInSearch { search } => {
                write!(f, "cannot include a '#' in search '{}'", search)
            }
            PathError::ControlCharacter { target, position } => {
                write!(
                    f,
                    "control character at position {} in target {:?}",
                    position, target
                )
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A fully resolved path: absolute pathname plus normalized search and hash.
///
/// `search` is either empty or starts with `?`; `hash` is either empty or
/// starts with `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl Path {
    /// The root path `/`.
    pub fn root() -> Self {
        Path {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// A path where every part is optional.
///
/// Missing parts are resolved against the current location: a missing
/// pathname keeps the current one, missing search and hash become empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialPath {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
}

impl PartialPath {
    pub fn pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum To {
    /// A path string such as `/a/b?x=1#top`, `child` or `../up`.
    Path(String),
    /// Explicit parts.
    Partial(PartialPath),
}

impl From<&str> for To {
    fn from(s: &str) -> Self {
        To::Path(s.to_string())
    }
}

impl From<String> for To {
    fn from(s: String) -> Self {
        To::Path(s)
    }
}

impl From<&String> for To {
    fn from(s: &String) -> Self {
        To::Path(s.clone())
    }
}

impl From<PartialPath> for To {
    fn from(p: PartialPath) -> Self {
        To::Partial(p)
    }
}

impl From<Path> for To {
    fn from(p: Path) -> Self {
        To::Partial(PartialPath {
            pathname: Some(p.pathname),
            search: Some(p.search),
            hash: Some(p.hash),
        })
    }
}

impl fmt::Display for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            To::Path(s) => write!(f, "{}", s),
            To::Partial(p) => write!(
                f,
                "{}{}{}",
                p.pathname.as_deref().unwrap_or(""),
                p.search.as_deref().unwrap_or(""),
                p.hash.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Split a path string into its parts.
///
/// The hash is everything from the first `#`, the search everything from the
/// first `?` before it. Empty parts are `None`.
///
/// ```rust
/// use navbridge_store::parse_path;
///
/// let parts = parse_path("/a/b?x=1#top");
/// assert_eq!(parts.pathname.as_deref(), Some("/a/b"));
/// assert_eq!(parts.search.as_deref(), Some("?x=1"));
/// assert_eq!(parts.hash.as_deref(), Some("#top"));
/// ```
pub fn parse_path(s: &str) -> PartialPath {
    let mut rest = s;
    let mut parts = PartialPath::default();

    if let Some(i) = rest.find('#') {
        parts.hash = Some(rest[i..].to_string());
        rest = &rest[..i];
    }
    if let Some(i) = rest.find('?') {
        parts.search = Some(rest[i..].to_string());
        rest = &rest[..i];
    }
    if !rest.is_empty() {
        parts.pathname = Some(rest.to_string());
    }
    parts
}

/// Resolve a target against the current pathname.
pub fn resolve_to(to: &To, current_pathname: &str) -> Result<Path, PathError> {
    let parts = match to {
        To::Path(s) => {
            check_control(s)?;
            parse_path(s)
        }
        To::Partial(p) => {
            validate_partial(p)?;
            p.clone()
        }
    };

    let pathname = match parts.pathname.as_deref() {
        None | Some("") => current_pathname.to_string(),
        Some(p) if p.starts_with('/') => normalize_pathname(p, "/"),
        Some(p) => normalize_pathname(p, current_pathname),
    };

    Ok(Path {
        pathname,
        search: normalize_prefixed(parts.search.as_deref(), '?'),
        hash: normalize_prefixed(parts.hash.as_deref(), '#'),
    })
}

/// Join a basename and a resolved path into an href.
pub fn join_basename(basename: &str, path: &Path) -> String {
    let base = basename.trim_end_matches('/');
    format!("{}{}", base, path)
}

fn validate_partial(p: &PartialPath) -> Result<(), PathError> {
    for part in [&p.pathname, &p.search, &p.hash].into_iter().flatten() {
        check_control(part)?;
    }
    if let Some(pathname) = &p.pathname {
        if pathname.contains('?') {
            return Err(PathError::QuestionMarkInPathname {
                pathname: pathname.clone(),
            });
        }
        if pathname.contains('#') {
            return Err(PathError::HashInPathname {
                pathname: pathname.clone(),
            });
        }
    }
    if let Some(search) = &p.search {
        if search.contains('#') {
            return Err(PathError::HashInSearch {
                search: search.clone(),
            });
        }
    }
    Ok(())
}

fn check_control(s: &str) -> Result<(), PathError> {
    match s.char_indices().find(|(_, c)| c.is_ascii_control()) {
        Some((position, _)) => Err(PathError::ControlCharacter {
            target: s.to_string(),
            position,
        }),
        None => Ok(()),
    }
}

/// Resolve `.` and `..` segments of `pathname` relative to `base`.
///
/// `..` never climbs above the root. A trailing slash on a non-root result
/// is kept.
fn normalize_pathname(pathname: &str, base: &str) -> String {
    let mut segments: Vec<&str> = if pathname.starts_with('/') {
        Vec::new()
    } else {
        base.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in pathname.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = format!("/{}", segments.join("/"));
    if pathname.ends_with('/') && out != "/" {
        out.push('/');
    }
    out
}

fn normalize_prefixed(part: Option<&str>, prefix: char) -> String {
    match part {
        None => String::new(),
        Some(s) if s.is_empty() || s.len() == 1 && s.starts_with(prefix) => String::new(),
        Some(s) if s.starts_with(prefix) => s.to_string(),
        Some(s) => format!("{}{}", prefix, s),
    }
}
