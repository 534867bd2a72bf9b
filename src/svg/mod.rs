//! Vector node tree shared by the chart and diagram renderers.
//!
//! Renderers build an [`Element`] tree of pure geometry; [`Element::to_svg`]
//! turns it into markup. Nothing here knows about a document model, so the
//! tree can be inspected directly in tests.

mod text;
mod writer;

pub use text::{fmt_num, fmt_value, measure_text};

/// SVG namespace.
pub const NS: &str = "http://www.w3.org/2000/svg";

/// Class attached to every primitive that carries a hover label.
pub const HOVER_CLASS: &str = "fc-hoverable";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One SVG element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Values that can be written as attribute text.
pub trait AttrValue {
    fn into_attr(self) -> String;
}

impl AttrValue for f64 {
    fn into_attr(self) -> String {
        fmt_num(self)
    }
}

impl AttrValue for usize {
    fn into_attr(self) -> String {
        self.to_string()
    }
}

impl AttrValue for i32 {
    fn into_attr(self) -> String {
        self.to_string()
    }
}

impl AttrValue for &str {
    fn into_attr(self) -> String {
        self.to_string()
    }
}

impl AttrValue for String {
    fn into_attr(self) -> String {
        self
    }
}

impl AttrValue for &String {
    fn into_attr(self) -> String {
        self.clone()
    }
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set`].
    pub fn attr(mut self, key: &'static str, value: impl AttrValue) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, replacing an earlier value for the same key.
    pub fn set(&mut self, key: &'static str, value: impl AttrValue) {
        let value = value.into_attr();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Mark as hoverable with a machine-readable label.
    pub fn tip(self, label: impl Into<String>) -> Self {
        self.attr("class", HOVER_CLASS).attr("data-tip", label.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric attribute value.
    pub fn num(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }

    /// Pre-order walk over this element and all element descendants.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in &self.children {
            if let Node::Element(el) = child {
                out.extend(el.descendants());
            }
        }
        out
    }

    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|el| el.name == name)
            .collect()
    }

    /// Hover labels in document order.
    pub fn tips(&self) -> Vec<&str> {
        self.descendants()
            .into_iter()
            .filter_map(|el| el.get("data-tip"))
            .collect()
    }

    /// Serialise to SVG markup.
    pub fn to_svg(&self) -> String {
        writer::write_svg(self)
    }
}

/// Root `<svg>` scaled to its container.
pub fn root(width: f64, height: f64) -> Element {
    Element::new("svg")
        .attr("xmlns", NS)
        .attr("viewBox", format!("0 0 {} {}", fmt_num(width), fmt_num(height)))
        .attr("preserveAspectRatio", "xMidYMid meet")
        .attr("width", "100%")
        .attr("height", "100%")
        .attr("style", "overflow:visible;display:block;")
}

/// Width and height parsed back from a root's `viewBox`.
pub fn view_box(svg: &Element) -> Option<(f64, f64)> {
    let mut parts = svg.get("viewBox")?.split_whitespace().skip(2);
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_replaces_attr() {
        let rect = Element::new("rect").attr("x", 1.0).attr("x", 2.5);
        assert_eq!(rect.attrs, vec![("x", "2.5".to_string())]);
    }

    #[test]
    fn test_tip_and_walk() {
        let svg = root(100.0, 50.0)
            .child(Element::new("g").child(Element::new("rect").tip("A: 1")))
            .child(Element::new("text").text("label"));
        assert_eq!(svg.tips(), ["A: 1"]);
        assert_eq!(svg.find_all("rect").len(), 1);
        assert_eq!(svg.text_content(), "label");
        assert_eq!(view_box(&svg), Some((100.0, 50.0)));
    }

    #[test]
    fn test_to_svg() {
        let svg = root(10.0, 10.0).child(Element::new("text").attr("x", 5.0).text("a < b"));
        let out = svg.to_svg();
        assert!(out.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 10 10\""));
        assert!(out.contains("<text x=\"5\">a &lt; b</text>"));
        assert!(out.ends_with("</svg>"));
    }

    #[test]
    fn test_empty_elements_self_close() {
        let out = Element::new("circle").attr("r", 3.0).to_svg();
        assert_eq!(out, "<circle r=\"3\"/>");
    }
}
