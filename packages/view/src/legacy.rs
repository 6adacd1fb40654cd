//! Legacy route components.

use std::rc::Rc;

use tracing::trace;

use crate::component::{Child, Component};
use crate::element::Element;
use crate::error::Result;
use crate::matcher::{match_path, Match, MatchOptions};
use crate::routes::{match_pattern, strip_base};
use crate::scope::{LegacyContext, ModernContext, Scope};

/// Renders its child when its path matches the legacy location.
#[derive(Clone)]
pub struct LegacyRoute {
    /// `None` matches whatever the enclosing route matched.
    pub path: Option<String>,
    pub exact: bool,
    pub sensitive: bool,
    pub child: Child,
}

impl LegacyRoute {
    pub fn new(path: impl Into<String>, child: Child) -> Self {
        Self {
            path: Some(path.into()),
            exact: false,
            sensitive: false,
            child,
        }
    }

    pub fn pathless(child: Child) -> Self {
        Self {
            path: None,
            exact: false,
            sensitive: false,
            child,
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Match against the legacy location in `legacy`.
    pub fn compute_match(&self, legacy: &LegacyContext) -> Option<Match> {
        match &self.path {
            None => Some(legacy.route_match.clone()),
            Some(path) => match_path(
                &legacy.location.pathname,
                &MatchOptions {
                    path: path.clone(),
                    exact: self.exact,
                    sensitive: self.sensitive,
                },
            ),
        }
    }

    fn label(&self) -> &str {
        self.path.as_deref().unwrap_or("(pathless)")
    }

    fn render_matched(&self, cx: &Scope, legacy: &LegacyContext, route_match: Match) -> Result<Element> {
        let ctx = LegacyContext {
            route_match,
            ..legacy.clone()
        };
        self.child.render(&cx.child(self.label()).with_legacy(ctx))
    }
}

impl Component for LegacyRoute {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let legacy = cx.require_legacy("LegacyRoute")?;
        match self.compute_match(legacy) {
            Some(route_match) => self.render_matched(cx, legacy, route_match),
            None => Ok(Element::Empty),
        }
    }
}

/// A legacy route whose subtree can also use modern routing.
///
/// Matches like a [`LegacyRoute`] and additionally provides a modern
/// context: a non-exact path `p` is matched as the modern pattern `p/*`, so
/// nested [`Routes`](crate::Routes) match below it and the rest of the
/// pathname is the `*` param.
#[derive(Clone)]
pub struct CompatRoute {
    route: LegacyRoute,
}

impl CompatRoute {
    pub fn new(path: impl Into<String>, child: Child) -> Self {
        Self {
            route: LegacyRoute::new(path, child),
        }
    }

    pub fn exact(mut self) -> Self {
        self.route = self.route.exact();
        self
    }

    pub fn compute_match(&self, legacy: &LegacyContext) -> Option<Match> {
        self.route.compute_match(legacy)
    }

    fn render_matched(&self, cx: &Scope, legacy: &LegacyContext, route_match: Match) -> Result<Element> {
        let modern = cx.require_modern("CompatRoute")?;
        let mut pattern = route_match.path.clone();
        if !self.route.exact {
            pattern = format!("{}/*", pattern.trim_end_matches('/'));
        }
        let pathname = &legacy.location.pathname;
        let found = strip_base(pathname, &modern.pathname_base)
            .and_then(|remaining| match_pattern(&pattern, true, remaining));
        let Some(found) = found else {
            trace!(%pattern, %pathname, "compat route has no modern match");
            return Ok(Element::Empty);
        };

        let mut params = modern.params.clone();
        params.extend(found.params);
        let modern_ctx = ModernContext {
            router: modern.router.clone(),
            state: modern.state.clone(),
            params,
            pathname_base: crate::routes::join_paths(&modern.pathname_base, &found.pathname_base),
            outlet: None,
        };
        let legacy_ctx = LegacyContext {
            route_match,
            ..legacy.clone()
        };
        let child = cx
            .child(self.route.label())
            .with_legacy(legacy_ctx)
            .with_modern(modern_ctx);
        self.route.child.render(&child)
    }
}

impl Component for CompatRoute {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let legacy = cx.require_legacy("CompatRoute")?;
        match self.compute_match(legacy) {
            Some(route_match) => self.render_matched(cx, legacy, route_match),
            None => Ok(Element::Empty),
        }
    }
}

/// One arm of a [`Switch`].
#[derive(Clone)]
pub enum SwitchArm {
    Route(LegacyRoute),
    Compat(CompatRoute),
}

impl SwitchArm {
    fn compute_match(&self, legacy: &LegacyContext) -> Option<Match> {
        match self {
            SwitchArm::Route(route) => route.compute_match(legacy),
            SwitchArm::Compat(route) => route.compute_match(legacy),
        }
    }

    fn render_matched(&self, cx: &Scope, legacy: &LegacyContext, route_match: Match) -> Result<Element> {
        match self {
            SwitchArm::Route(route) => route.render_matched(cx, legacy, route_match),
            SwitchArm::Compat(route) => route.render_matched(cx, legacy, route_match),
        }
    }
}

impl From<LegacyRoute> for SwitchArm {
    fn from(route: LegacyRoute) -> Self {
        SwitchArm::Route(route)
    }
}

impl From<CompatRoute> for SwitchArm {
    fn from(route: CompatRoute) -> Self {
        SwitchArm::Compat(route)
    }
}

/// Renders the first arm matching the legacy location.
#[derive(Clone, Default)]
pub struct Switch {
    arms: Vec<SwitchArm>,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, arm: impl Into<SwitchArm>) -> Self {
        self.arms.push(arm.into());
        self
    }

    pub fn into_child(self) -> Child {
        Rc::new(self)
    }
}

impl Component for Switch {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let legacy = cx.require_legacy("Switch")?;
        for (i, arm) in self.arms.iter().enumerate() {
            if let Some(route_match) = arm.compute_match(legacy) {
                trace!(arm = i, url = %route_match.url, "switch matched");
                return arm.render_matched(&cx.child(&i.to_string()), legacy, route_match);
            }
        }
        Ok(Element::Empty)
    }
}
