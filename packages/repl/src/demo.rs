//! The demo application driven by the shell.
//!
//! Modern routes sit at the root: `/v6` and its children only see the
//! modern context. Everything else falls through to a legacy `Switch`
//! mounted under a [`UniversalRouter`], where `/a` is a [`CompatRoute`]
//! whose subtree mixes both APIs and `/a/blocker` guards an unsaved draft.

use std::cell::RefCell;
use std::rc::Rc;

use navbridge_legacy_adapter::{AdapterConfig, Confirm, Predicate, Unblock};
use navbridge_view::{
    component, Child, CompatRoute, Component, Element, LegacyRoute, Outlet, Params, RenderError,
    RouteObject, Routes, Scope, Switch, UniversalRouter,
};
use serde_json::json;
use tracing::debug;

/// Links shown at the top of every page.
pub const NAV_LINKS: [&str; 6] = ["/", "/a", "/a/blocker", "/a/one", "/v6", "/v6/child"];

/// Text the blocker page's input holds. The shell's `type` and `clear`
/// commands edit it.
pub type Draft = Rc<RefCell<String>>;

/// Build the route tree of the demo app.
pub fn routes(draft: Draft, confirm: Rc<dyn Confirm>) -> Vec<RouteObject> {
    let config = Rc::new(AdapterConfig::default().with_shared_confirm(confirm.clone()));
    let legacy = Rc::new(UniversalRouter::new(legacy_app(draft, confirm)).with_config(config));
    vec![
        RouteObject::new("/v6", v6_app()).child(RouteObject::new(":param", v6_child())),
        RouteObject::new("*", legacy),
    ]
}

fn nav() -> Child {
    component(|cx: &Scope| {
        let modern = cx
            .modern()
            .ok_or(RenderError::MissingModernContext { component: "nav" })?;
        let links = NAV_LINKS
            .iter()
            .map(|to| -> Result<Element, RenderError> {
                let href = modern.router.create_href(*to)?;
                Ok(Element::node("a", vec![Element::text(href)]))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Element::node("nav", links))
    })
}

fn json_params(params: &Params) -> Result<String, RenderError> {
    Ok(serde_json::to_string(params)?)
}

fn legacy_app(draft: Draft, confirm: Rc<dyn Confirm>) -> Child {
    let switch = Switch::new()
        .route(CompatRoute::new("/a", page_a(draft, confirm)))
        .route(LegacyRoute::new("/", home()))
        .into_child();
    let nav = nav();
    component(move |cx: &Scope| {
        Ok(Element::node(
            "div",
            vec![nav.render(&cx.child("nav"))?, switch.render(&cx.child("switch"))?],
        ))
    })
}

fn home() -> Child {
    component(|cx: &Scope| {
        debug!(legacy = %cx.legacy_location()?.pathname, modern = %cx.location()?.pathname, "home");
        Ok(Element::node("h2", vec!["Home".into()]))
    })
}

fn page_a(draft: Draft, confirm: Rc<dyn Confirm>) -> Child {
    let modern = Routes::new([RouteObject::new(":param", a_param())]);
    let legacy = Switch::new()
        .route(LegacyRoute::new("/a/blocker", blocker(draft, confirm)))
        .route(LegacyRoute::new("/a/:param", a_param()))
        .into_child();
    component(move |cx: &Scope| {
        Ok(Element::fragment(vec![
            Element::node("h2", vec!["A".into()]),
            Element::node(
                "p",
                vec![format!("useLocation v5: {}", cx.legacy_location()?.pathname).into()],
            ),
            Element::node(
                "p",
                vec![format!("useLocation v6: {}", cx.location()?.pathname).into()],
            ),
            Element::node(
                "div",
                vec![
                    Element::node("p", vec!["Rendered sub-tree using v6 <Routes>".into()]),
                    modern.render(&cx.child("routes"))?,
                ],
            ),
            Element::node(
                "div",
                vec![
                    Element::node("p", vec!["Rendered sub-tree using v5 <Switch>".into()]),
                    legacy.render(&cx.child("switch"))?,
                ],
            ),
        ]))
    })
}

fn a_param() -> Child {
    component(|cx: &Scope| {
        Ok(Element::fragment(vec![
            Element::node("h3", vec!["A Param".into()]),
            Element::node(
                "p",
                vec![format!("useParams v5 value: {}", json_params(&cx.legacy_params()?)?).into()],
            ),
            Element::node(
                "p",
                vec![format!("useParams v6 value: {}", json_params(&cx.params()?)?).into()],
            ),
            Element::node("button", vec!["push /a".into()]),
            Element::node("button", vec!["navigate /a".into()]),
        ]))
    })
}

fn v6_app() -> Child {
    let nav = nav();
    component(move |cx: &Scope| {
        Ok(Element::fragment(vec![
            nav.render(&cx.child("nav"))?,
            Element::node("h2", vec!["This route can only use v6 APIs".into()]),
            Element::node("p", vec![format!("Location v6: {}", cx.location()?.pathname).into()]),
            Outlet.render(cx)?,
        ]))
    })
}

fn v6_child() -> Child {
    component(|cx: &Scope| {
        Ok(Element::fragment(vec![
            Element::node("h3", vec!["V6 Child".into()]),
            Element::node("p", vec![format!("Params: {}", json_params(&cx.params()?)?).into()]),
            Element::node("button", vec!["navigate /".into()]),
        ]))
    })
}

/// Guards the draft: while it is non-empty, leaving the page asks first.
///
/// The guard is re-registered whenever the history or the draft changes,
/// and it releases itself once a transition is allowed.
fn blocker(draft: Draft, confirm: Rc<dyn Confirm>) -> Child {
    component(move |cx: &Scope| {
        let history = cx.history()?;
        let text = draft.borrow().clone();
        let deps = json!([history.location().key, text]);
        let confirm = confirm.clone();
        cx.use_effect("block", deps, move || {
            let slot: Rc<RefCell<Option<Unblock>>> = Rc::new(RefCell::new(None));
            let handle = slot.clone();
            let unblock = history.block(Predicate::positional(move |next, _| {
                let allow = text.is_empty()
                    || confirm.confirm(&format!("Are you sure you want to go to {}?", next.pathname));
                if allow {
                    if let Some(unblock) = handle.borrow().as_ref() {
                        unblock.unblock();
                    }
                }
                allow
            }));
            *slot.borrow_mut() = Some(unblock.clone());
            Some(Box::new(move || unblock.unblock()))
        });
        Ok(Element::node("input", vec![Element::text(draft.borrow().clone())]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_print_as_sorted_json() {
        let params = Params::from([
            ("z".to_string(), "last".to_string()),
            ("param".to_string(), "one".to_string()),
        ]);
        assert_eq!(json_params(&params).unwrap(), r#"{"param":"one","z":"last"}"#);
        assert_eq!(json_params(&Params::new()).unwrap(), "{}");
    }
}
