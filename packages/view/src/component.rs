//! Components.

use std::rc::Rc;

use crate::element::Element;
use crate::error::Result;
use crate::scope::Scope;

/// Something that renders in a [`Scope`].
pub trait Component {
    fn render(&self, cx: &Scope) -> Result<Element>;
}

impl<F> Component for F
where
    F: Fn(&Scope) -> Result<Element>,
{
    fn render(&self, cx: &Scope) -> Result<Element> {
        self(cx)
    }
}

/// A shared component in a tree.
pub type Child = Rc<dyn Component>;

/// Wrap a closure as a [`Child`].
pub fn component(f: impl Fn(&Scope) -> Result<Element> + 'static) -> Child {
    Rc::new(f)
}

/// A component that always renders `element`.
pub fn constant(element: Element) -> Child {
    Rc::new(move |_: &Scope| Ok(element.clone()))
}

/// Render each child in order into a fragment.
pub fn render_all(children: &[Child], cx: &Scope) -> Result<Element> {
    let mut out = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        out.push(child.render(&cx.child(&i.to_string()))?);
    }
    Ok(Element::Fragment(out))
}
