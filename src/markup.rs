//! Typed markup tree.
//!
//! Section builders and the graph renderer never concatenate markup strings
//! themselves: they build [`Markup`] values and [`Markup::render`] serializes
//! them, escaping every text node and attribute value on the way out. The only
//! unescaped content is [`Markup::Static`], which takes `&'static str` so that
//! analysis data can never reach it.

use crate::escape::escape_markup;
use std::fmt::Write;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["meta", "link", "br", "hr", "img", "input"];

/// SVG elements that may be self-closed when they have no children.
const SELF_CLOSING_SVG: &[&str] = &["rect", "circle", "line", "path", "ellipse", "polygon"];

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    Fragment(Vec<Markup>),
    Text(String),
    Static(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    /// Numeric attribute, formatted with [`fmt_num`].
    pub fn num(self, key: &'static str, value: f32) -> Self {
        self.attr(key, fmt_num(value))
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, M>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Markup::Text(value.into()))
    }

    pub fn raw(self, value: &'static str) -> Self {
        self.child(Markup::Static(value))
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}=\"{}\"", escape_markup(Some(value)));
        }
        if VOID_ELEMENTS.contains(&self.name) {
            out.push('>');
            return;
        }
        if self.children.is_empty() && SELF_CLOSING_SVG.contains(&self.name) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_into(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

impl Markup {
    /// An ordered group of siblings without a wrapping element.
    pub fn fragment<I, M>(items: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Markup>,
    {
        Markup::Fragment(items.into_iter().map(Into::into).collect())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    pub fn write_into(&self, out: &mut String) {
        match self {
            Markup::Element(el) => el.write_into(out),
            Markup::Fragment(items) => {
                for item in items {
                    item.write_into(out);
                }
            }
            Markup::Text(text) => out.push_str(&escape_markup(Some(text))),
            Markup::Static(raw) => out.push_str(raw),
        }
    }
}

impl From<Element> for Markup {
    fn from(value: Element) -> Self {
        Markup::Element(value)
    }
}

impl From<String> for Markup {
    fn from(value: String) -> Self {
        Markup::Text(value)
    }
}

impl From<&str> for Markup {
    fn from(value: &str) -> Self {
        Markup::Text(value.to_string())
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{value:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
