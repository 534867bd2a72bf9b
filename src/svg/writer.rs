use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::{Element, Node};

/// Serialise an element tree. Writing into memory cannot fail, so an
/// (unreachable) write error yields an empty string.
pub(super) fn write_svg(root: &Element) -> String {
    let mut writer = Writer::new(Vec::new());
    if write_element(&mut writer, root).is_err() {
        return String::new();
    }
    String::from_utf8(writer.into_inner()).unwrap_or_default()
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, el: &Element) -> std::io::Result<()> {
    let mut start = BytesStart::new(el.name);
    for (key, value) in &el.attrs {
        start.push_attribute((*key, value.as_str()));
    }

    if el.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name)))
}
