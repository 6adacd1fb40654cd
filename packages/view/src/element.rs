//! Render output.

use std::fmt;

/// What a component renders to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Element {
    #[default]
    Empty,
    Text(String),
    Node {
        tag: String,
        children: Vec<Element>,
    },
    Fragment(Vec<Element>),
}

impl Element {
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    pub fn node(tag: impl Into<String>, children: Vec<Element>) -> Self {
        Element::Node {
            tag: tag.into(),
            children,
        }
    }

    pub fn fragment(children: Vec<Element>) -> Self {
        Element::Fragment(children)
    }

    /// Whether nothing would be rendered.
    pub fn is_empty(&self) -> bool {
        match self {
            Element::Empty => true,
            Element::Text(_) | Element::Node { .. } => false,
            Element::Fragment(children) => children.iter().all(Element::is_empty),
        }
    }

    /// All text in document order.
    pub fn texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts(&self, out: &mut Vec<String>) {
        match self {
            Element::Empty => {}
            Element::Text(text) => out.push(text.clone()),
            Element::Node { children, .. } | Element::Fragment(children) => {
                for child in children {
                    child.collect_texts(out);
                }
            }
        }
    }

    /// Whether any text node contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Element::Empty => Ok(()),
            Element::Text(text) => writeln!(f, "{:indent$}{}", "", text, indent = depth * 2),
            Element::Node { tag, children } => {
                writeln!(f, "{:indent$}<{}>", "", tag, indent = depth * 2)?;
                for child in children {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Element::Fragment(children) => {
                for child in children {
                    child.write_indented(f, depth)?;
                }
                Ok(())
            }
        }
    }
}

/// Plain-text rendering: one line per text or tag, indented by nesting.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::text(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_indents_children() {
        let el = Element::node(
            "div",
            vec![Element::node("h2", vec!["A".into()]), Element::Empty, "tail".into()],
        );
        assert_eq!(el.to_string(), "<div>\n  <h2>\n    A\n  tail\n");
    }

    #[test]
    fn fragments_of_empties_are_empty() {
        assert!(Element::fragment(vec![Element::Empty, Element::fragment(vec![])]).is_empty());
        assert!(!Element::fragment(vec!["x".into()]).is_empty());
    }

    #[test]
    fn texts_in_document_order() {
        let el = Element::fragment(vec![
            "a".into(),
            Element::node("p", vec!["b".into(), Element::node("i", vec!["c".into()])]),
        ]);
        assert_eq!(el.texts(), vec!["a", "b", "c"]);
        assert!(el.contains_text("c"));
    }
}
