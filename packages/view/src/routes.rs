//! Modern route trees.
//!
//! Routes nest: a child path is relative to its parent, a `:name` segment
//! captures a param and a trailing `*` captures the rest of the pathname
//! under the `*` param. Every leaf (and every route with a path) forms a
//! branch; branches are ranked by specificity so that a splat route never
//! shadows a more specific sibling, and the best matching branch renders
//! from the outermost route inwards through [`Outlet`]s.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::component::{Child, Component};
use crate::element::Element;
use crate::error::Result;
use crate::matcher::Params;
use crate::scope::{ModernContext, Scope};

/// A node in a modern route tree.
#[derive(Clone, Default)]
pub struct RouteObject {
    /// `None` for layout and index routes.
    pub path: Option<String>,
    /// Renders at its parent's exact path.
    pub index: bool,
    /// `None` renders an [`Outlet`].
    pub element: Option<Child>,
    pub children: Vec<Rc<RouteObject>>,
}

impl RouteObject {
    pub fn new(path: impl Into<String>, element: Child) -> Self {
        Self {
            path: Some(path.into()),
            element: Some(element),
            ..Self::default()
        }
    }

    pub fn index(element: Child) -> Self {
        Self {
            index: true,
            element: Some(element),
            ..Self::default()
        }
    }

    /// A pathless route wrapping its children.
    pub fn layout(element: Child) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    pub fn child(mut self, child: RouteObject) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    fn label(&self) -> &str {
        match self.path.as_deref() {
            Some(path) => path,
            None if self.index => "(index)",
            None => "(layout)",
        }
    }
}

impl fmt::Debug for RouteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteObject")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// One route of a matched branch.
#[derive(Clone)]
pub struct RouteMatch {
    /// Params of this route and every route above it.
    pub params: Params,
    /// The pathname this route matched, including any splat.
    pub pathname: String,
    /// The pathname this route matched, excluding any splat.
    pub pathname_base: String,
    pub route: Rc<RouteObject>,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route.label())
            .field("params", &self.params)
            .field("pathname", &self.pathname)
            .field("pathname_base", &self.pathname_base)
            .finish()
    }
}

/// Where an [`Outlet`] continues rendering a matched branch.
#[derive(Clone)]
pub struct OutletSlot {
    matches: Rc<[RouteMatch]>,
    index: usize,
}

impl OutletSlot {
    /// The match the outlet will render.
    pub fn route_match(&self) -> &RouteMatch {
        &self.matches[self.index]
    }
}

#[derive(Clone)]
struct Meta {
    relative_path: String,
    route: Rc<RouteObject>,
}

struct Branch {
    path: String,
    score: isize,
    metas: Vec<Meta>,
}

/// A pattern matched against a pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternMatch {
    pub params: Params,
    pub pathname: String,
    pub pathname_base: String,
}

/// Match `pathname` against a route tree, returning the best branch from
/// the outermost route inwards.
pub fn match_routes(routes: &[Rc<RouteObject>], pathname: &str) -> Option<Vec<RouteMatch>> {
    let mut branches = Vec::new();
    flatten(routes, &[], "", &mut branches);
    // Stable: equal scores keep declaration order.
    branches.sort_by(|a, b| b.score.cmp(&a.score));

    branches.iter().find_map(|branch| {
        let found = match_branch(branch, pathname);
        if found.is_some() {
            trace!(branch = %branch.path, score = branch.score, pathname, "route branch matched");
        }
        found
    })
}

fn flatten(routes: &[Rc<RouteObject>], parents: &[Meta], parent_path: &str, out: &mut Vec<Branch>) {
    for route in routes {
        let mut relative_path = route.path.clone().unwrap_or_default();
        if relative_path.starts_with('/') {
            if let Some(rest) = relative_path.strip_prefix(parent_path) {
                relative_path = rest.to_string();
            }
        }
        let mut metas = parents.to_vec();
        metas.push(Meta {
            relative_path: relative_path.clone(),
            route: route.clone(),
        });
        let path = join_paths(parent_path, &relative_path);

        if !route.children.is_empty() {
            flatten(&route.children, &metas, &path, out);
        }
        if route.path.is_none() && !route.index {
            continue;
        }
        out.push(Branch {
            score: compute_score(&path, route.index),
            path,
            metas,
        });
    }
}

fn compute_score(path: &str, index: bool) -> isize {
    let segments: Vec<&str> = path.split('/').collect();
    let mut score = segments.len() as isize;
    if segments.contains(&"*") {
        score -= 2;
    }
    if index {
        score += 2;
    }
    for segment in segments.iter().filter(|s| **s != "*") {
        score += if segment.starts_with(':') {
            3
        } else if segment.is_empty() {
            1
        } else {
            10
        };
    }
    score
}

fn match_branch(branch: &Branch, pathname: &str) -> Option<Vec<RouteMatch>> {
    let mut params = Params::new();
    let mut matched = "/".to_string();
    let mut matches = Vec::with_capacity(branch.metas.len());
    let last = branch.metas.len().saturating_sub(1);

    for (i, meta) in branch.metas.iter().enumerate() {
        let remaining = if matched == "/" {
            pathname
        } else {
            pathname
                .get(matched.len()..)
                .filter(|rest| !rest.is_empty())
                .unwrap_or("/")
        };
        let found = match_pattern(&meta.relative_path, i == last, remaining)?;
        params.extend(found.params);
        matches.push(RouteMatch {
            params: params.clone(),
            pathname: join_paths(&matched, &found.pathname),
            pathname_base: join_paths(&matched, &found.pathname_base),
            route: meta.route.clone(),
        });
        if found.pathname_base != "/" {
            matched = join_paths(&matched, &found.pathname_base);
        }
    }
    Some(matches)
}

/// Match one route pattern. With `end`, the whole pathname must be
/// consumed unless the pattern ends in a splat.
pub(crate) fn match_pattern(pattern: &str, end: bool, pathname: &str) -> Option<PatternMatch> {
    let mut pattern: Vec<&str> = segments(pattern).collect();
    let splat = pattern.last() == Some(&"*");
    if splat {
        pattern.pop();
    }
    let path: Vec<&str> = segments(pathname).collect();
    if path.len() < pattern.len() {
        return None;
    }

    let mut params = Params::new();
    for (expected, actual) in pattern.iter().zip(&path) {
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if expected.eq_ignore_ascii_case(actual) => {}
            None => return None,
        }
    }

    let n = pattern.len();
    if end && !splat && path.len() != n {
        return None;
    }

    let pathname_base = format!("/{}", path[..n].join("/"));
    let pathname = if splat {
        params.insert("*".to_string(), path[n..].join("/"));
        format!("/{}", path.join("/"))
    } else {
        pathname_base.clone()
    };
    Some(PatternMatch {
        params,
        pathname,
        pathname_base,
    })
}

fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split('/').filter(|segment| !segment.is_empty())
}

/// Join two paths, collapsing repeated slashes and dropping a trailing one.
pub(crate) fn join_paths(a: &str, b: &str) -> String {
    let joined: Vec<&str> = segments(a).chain(segments(b)).collect();
    format!("/{}", joined.join("/"))
}

/// The part of `pathname` below `base`, or `None` when it is not below it.
pub(crate) fn strip_base<'a>(pathname: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(pathname);
    }
    let head = pathname.get(..base.len())?;
    if !head.eq_ignore_ascii_case(base) {
        return None;
    }
    match &pathname[base.len()..] {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

fn render_matches(matches: &Rc<[RouteMatch]>, index: usize, cx: &Scope) -> Result<Element> {
    let modern = cx.require_modern("Routes")?;
    let m = &matches[index];
    let ctx = ModernContext {
        router: modern.router.clone(),
        state: modern.state.clone(),
        params: m.params.clone(),
        pathname_base: m.pathname_base.clone(),
        outlet: (index + 1 < matches.len()).then(|| OutletSlot {
            matches: matches.clone(),
            index: index + 1,
        }),
    };
    let child = cx.child(m.route.label()).with_modern(ctx);
    match &m.route.element {
        Some(element) => element.render(&child),
        None => Outlet.render(&child),
    }
}

/// Renders the best match of a route tree below the enclosing route.
#[derive(Clone, Default)]
pub struct Routes {
    routes: Vec<Rc<RouteObject>>,
}

impl Routes {
    pub fn new(routes: impl IntoIterator<Item = RouteObject>) -> Self {
        Self {
            routes: routes.into_iter().map(Rc::new).collect(),
        }
    }

    pub fn from_shared(routes: Vec<Rc<RouteObject>>) -> Self {
        Self { routes }
    }

    pub fn route(mut self, route: RouteObject) -> Self {
        self.routes.push(Rc::new(route));
        self
    }

    pub fn routes(&self) -> &[Rc<RouteObject>] {
        &self.routes
    }
}

impl Component for Routes {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let modern = cx.require_modern("Routes")?;
        let pathname = &modern.location().pathname;
        let base = &modern.pathname_base;

        let Some(remaining) = strip_base(pathname, base) else {
            debug!(%pathname, %base, "location is outside the enclosing route");
            return Ok(Element::Empty);
        };
        let Some(mut matches) = match_routes(&self.routes, remaining) else {
            debug!(%pathname, "no routes matched location");
            return Ok(Element::Empty);
        };

        for m in &mut matches {
            let mut params = modern.params.clone();
            params.extend(std::mem::take(&mut m.params));
            m.params = params;
            m.pathname = join_paths(base, &m.pathname);
            m.pathname_base = join_paths(base, &m.pathname_base);
        }
        let matches: Rc<[RouteMatch]> = matches.into();
        render_matches(&matches, 0, cx)
    }
}

/// Renders the next route of the matched branch, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outlet;

impl Component for Outlet {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let modern = cx.require_modern("Outlet")?;
        match &modern.outlet {
            Some(slot) => render_matches(&slot.matches, slot.index, cx),
            None => Ok(Element::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::constant;

    fn tree() -> Vec<Rc<RouteObject>> {
        vec![
            Rc::new(
                RouteObject::new("/v6", constant("v6".into()))
                    .child(RouteObject::new(":param", constant("child".into()))),
            ),
            Rc::new(RouteObject::new("*", constant("rest".into()))),
        ]
    }

    fn labels(matches: &[RouteMatch]) -> Vec<String> {
        matches.iter().map(|m| m.route.label().to_string()).collect()
    }

    #[test]
    fn nested_param_route_matches() {
        let matches = match_routes(&tree(), "/v6/child").unwrap();
        assert_eq!(labels(&matches), vec!["/v6", ":param"]);
        assert_eq!(matches[1].params.get("param").map(String::as_str), Some("child"));
        assert_eq!(matches[1].pathname, "/v6/child");
        assert_eq!(matches[0].pathname_base, "/v6");
    }

    #[test]
    fn parent_path_matches_without_children() {
        let matches = match_routes(&tree(), "/v6").unwrap();
        assert_eq!(labels(&matches), vec!["/v6"]);
    }

    #[test]
    fn splat_is_ranked_last() {
        let mut routes = tree();
        routes.reverse();
        let matches = match_routes(&routes, "/v6/x").unwrap();
        assert_eq!(labels(&matches), vec!["/v6", ":param"]);

        let matches = match_routes(&routes, "/a/blocker").unwrap();
        assert_eq!(labels(&matches), vec!["*"]);
        assert_eq!(matches[0].params.get("*").map(String::as_str), Some("a/blocker"));
        assert_eq!(matches[0].pathname_base, "/");
    }

    #[test]
    fn index_routes_match_the_parent_path() {
        let routes = vec![Rc::new(
            RouteObject::layout(constant("layout".into()))
                .child(RouteObject::index(constant("home".into())))
                .child(RouteObject::new("about", constant("about".into()))),
        )];
        assert_eq!(labels(&match_routes(&routes, "/").unwrap()), vec!["(layout)", "(index)"]);
        assert_eq!(labels(&match_routes(&routes, "/about").unwrap()), vec!["(layout)", "about"]);
        assert!(match_routes(&routes, "/nope").is_none());
    }

    #[test]
    fn scores_follow_specificity() {
        assert!(compute_score("/v6/:param", false) > compute_score("/v6", false));
        assert!(compute_score("/v6", false) > compute_score("/*", false));
        assert!(compute_score("/a", true) > compute_score("/a", false));
    }

    #[test]
    fn strip_base_respects_segment_boundaries() {
        assert_eq!(strip_base("/a/b", "/a"), Some("/b"));
        assert_eq!(strip_base("/a", "/a"), Some("/"));
        assert_eq!(strip_base("/ab", "/a"), None);
        assert_eq!(strip_base("/x", "/"), Some("/x"));
    }

    #[test]
    fn join_paths_normalizes() {
        assert_eq!(join_paths("/", "/v6"), "/v6");
        assert_eq!(join_paths("/a/", "b/"), "/a/b");
        assert_eq!(join_paths("/", "/"), "/");
    }
}
