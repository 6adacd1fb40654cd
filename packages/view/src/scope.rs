//! Routing contexts threaded through a render pass.
//!
//! A [`Scope`] carries up to two contexts: the modern one (router, rendered
//! snapshot, params of the enclosing route) and the legacy one (a history
//! handle and the enclosing legacy match). Providers derive a child scope
//! with a new context; consumers read through the helper methods, which
//! fail with a [`RenderError`] when their context is absent.

use std::fmt;
use std::rc::Rc;

use navbridge_legacy_adapter::History;
use navbridge_store::{Location, NavigateOptions, Navigation, Router, RouterState, To};
use serde_json::Value;

use crate::effects::{Cleanup, EffectRegistry};
use crate::error::{RenderError, Result};
use crate::matcher::{Match, Params};
use crate::routes::OutletSlot;

/// Context for modern route consumers.
#[derive(Clone)]
pub struct ModernContext {
    pub router: Router,
    /// The snapshot being rendered.
    pub state: Rc<RouterState>,
    /// Params of the enclosing routes, outermost first.
    pub params: Params,
    /// The pathname matched by the enclosing routes; nested routes match
    /// what follows it.
    pub pathname_base: String,
    pub outlet: Option<OutletSlot>,
}

impl ModernContext {
    /// The context at the top of a tree.
    pub fn root(router: Router, state: Rc<RouterState>) -> Self {
        Self {
            router,
            state,
            params: Params::new(),
            pathname_base: "/".to_string(),
            outlet: None,
        }
    }

    pub fn location(&self) -> &Location {
        &self.state.location
    }
}

impl fmt::Debug for ModernContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModernContext")
            .field("location", &self.state.location.href())
            .field("params", &self.params)
            .field("pathname_base", &self.pathname_base)
            .field("outlet", &self.outlet.is_some())
            .finish()
    }
}

/// Context for legacy route consumers.
#[derive(Clone)]
pub struct LegacyContext {
    pub history: Rc<dyn History>,
    pub location: Location,
    pub route_match: Match,
    pub static_context: Option<Value>,
}

impl fmt::Debug for LegacyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyContext")
            .field("location", &self.location.href())
            .field("route_match", &self.route_match)
            .field("static_context", &self.static_context)
            .finish_non_exhaustive()
    }
}

/// Navigates relative to the enclosing modern route.
#[derive(Clone)]
pub struct Navigator {
    router: Router,
    base: String,
}

impl Navigator {
    pub fn navigate(&self, to: impl Into<To>, options: NavigateOptions) -> Result<Navigation> {
        let to = self.resolve(to.into());
        Ok(self.router.navigate(to, options)?)
    }

    pub fn go(&self, delta: isize) -> Result<Navigation> {
        Ok(self.router.go(delta)?)
    }

    /// Relative pathnames resolve against the route, not the location.
    fn resolve(&self, to: To) -> To {
        let base = self.base.trim_end_matches('/');
        match to {
            To::Path(s) if is_relative(&s) => To::Path(format!("{base}/{s}")),
            To::Partial(mut p) => {
                let joined = p
                    .pathname
                    .as_deref()
                    .filter(|pathname| is_relative(pathname))
                    .map(|pathname| format!("{base}/{pathname}"));
                if joined.is_some() {
                    p.pathname = joined;
                }
                To::Partial(p)
            }
            other => other,
        }
    }
}

fn is_relative(s: &str) -> bool {
    !s.is_empty() && !s.starts_with(['/', '?', '#'])
}

/// Everything a component can see while it renders.
#[derive(Clone)]
pub struct Scope {
    modern: Option<Rc<ModernContext>>,
    legacy: Option<Rc<LegacyContext>>,
    effects: EffectRegistry,
    key: Rc<str>,
}

impl Scope {
    pub fn new(effects: EffectRegistry) -> Self {
        Self {
            modern: None,
            legacy: None,
            effects,
            key: Rc::from(""),
        }
    }

    pub fn with_modern(&self, modern: ModernContext) -> Self {
        Self {
            modern: Some(Rc::new(modern)),
            ..self.clone()
        }
    }

    pub fn with_legacy(&self, legacy: LegacyContext) -> Self {
        Self {
            legacy: Some(Rc::new(legacy)),
            ..self.clone()
        }
    }

    /// A scope one level down the tree, for effect identity.
    pub fn child(&self, segment: &str) -> Self {
        Self {
            key: Rc::from(format!("{}/{}", self.key, segment)),
            ..self.clone()
        }
    }

    /// Position of this scope in the tree.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modern(&self) -> Option<&ModernContext> {
        self.modern.as_deref()
    }

    pub fn legacy(&self) -> Option<&LegacyContext> {
        self.legacy.as_deref()
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub(crate) fn require_modern(&self, component: &'static str) -> Result<&ModernContext> {
        self.modern()
            .ok_or(RenderError::MissingModernContext { component })
    }

    pub(crate) fn require_legacy(&self, component: &'static str) -> Result<&LegacyContext> {
        self.legacy()
            .ok_or(RenderError::MissingLegacyContext { component })
    }

    /// The legacy history handle.
    pub fn history(&self) -> Result<Rc<dyn History>> {
        Ok(self.require_legacy("history")?.history.clone())
    }

    pub fn legacy_location(&self) -> Result<Location> {
        Ok(self.require_legacy("legacy_location")?.location.clone())
    }

    /// Params of the enclosing legacy match.
    pub fn legacy_params(&self) -> Result<Params> {
        Ok(self.require_legacy("legacy_params")?.route_match.params.clone())
    }

    pub fn route_match(&self) -> Result<Match> {
        Ok(self.require_legacy("route_match")?.route_match.clone())
    }

    pub fn location(&self) -> Result<Location> {
        Ok(self.require_modern("location")?.location().clone())
    }

    /// Params of the enclosing modern routes.
    pub fn params(&self) -> Result<Params> {
        Ok(self.require_modern("params")?.params.clone())
    }

    pub fn navigator(&self) -> Result<Navigator> {
        let modern = self.require_modern("navigator")?;
        Ok(Navigator {
            router: modern.router.clone(),
            base: modern.pathname_base.clone(),
        })
    }

    /// Declare an effect owned by this position in the tree.
    pub fn use_effect(
        &self,
        id: &str,
        deps: Value,
        setup: impl FnOnce() -> Option<Cleanup> + 'static,
    ) {
        self.effects.use_effect(format!("{}#{}", self.key, id), deps, setup);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("key", &self.key)
            .field("modern", &self.modern)
            .field("legacy", &self.legacy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navbridge_store::{PartialPath, RouterConfig};

    fn modern_scope(base: &str) -> (Router, Scope) {
        let router = Router::new(RouterConfig::default().with_entries(["/a/b"])).unwrap();
        let mut ctx = ModernContext::root(router.clone(), router.state());
        ctx.pathname_base = base.to_string();
        (router, Scope::new(EffectRegistry::new()).with_modern(ctx))
    }

    #[test]
    fn missing_contexts_are_errors() {
        let cx = Scope::new(EffectRegistry::new());
        assert!(matches!(
            cx.history(),
            Err(RenderError::MissingLegacyContext { component: "history" })
        ));
        assert!(matches!(
            cx.params(),
            Err(RenderError::MissingModernContext { component: "params" })
        ));
    }

    #[test]
    fn navigator_resolves_against_the_route() {
        let (router, cx) = modern_scope("/a");
        let nav = cx.navigator().unwrap();

        nav.navigate("c", NavigateOptions::push()).unwrap();
        assert_eq!(router.location().pathname, "/a/c");

        nav.navigate("../d", NavigateOptions::push()).unwrap();
        assert_eq!(router.location().pathname, "/d");

        nav.navigate(PartialPath::default().pathname("e"), NavigateOptions::push())
            .unwrap();
        assert_eq!(router.location().pathname, "/a/e");

        nav.navigate("?q=1", NavigateOptions::replace()).unwrap();
        assert_eq!(router.location().href(), "/a/e?q=1");
    }

    #[test]
    fn child_keys_nest() {
        let cx = Scope::new(EffectRegistry::new()).child("a").child("0");
        assert_eq!(cx.key(), "/a/0");
    }
}
