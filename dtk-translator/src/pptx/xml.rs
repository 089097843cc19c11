//! Minimal XML tree for OOXML parts.
//!
//! Slide parts are parsed into a tree, mutated in place (paragraph rebuilds,
//! attribute edits) and serialized back; untouched nodes round-trip with
//! their original structure. Names are kept as qualified strings
//! (`a:p`, `p:sp`); prefixes are stable within a part.

use dtk_core::{DtkError, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attrs: Vec::new(), children: Vec::new() }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// Concatenated text of direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Index of the first child element with `name`, if any.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|node| matches!(node, XmlNode::Element(e) if e.name == name))
    }

    /// Drop every child element whose name is in `names`; text nodes stay.
    pub fn remove_children_named(&mut self, names: &[&str]) {
        self.children.retain(
            |node| !matches!(node, XmlNode::Element(e) if names.contains(&e.name.as_str())),
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::End(_) => {
                    let finished = stack
                        .pop()
                        .ok_or_else(|| DtkError::Document("unbalanced xml".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_element(finished),
                        None => {
                            root = Some(finished);
                            break;
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(text.unescape().map_err(xml_err)?.into_owned());
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(String::from_utf8_lossy(&data.into_inner()).into_owned());
                    }
                }
                Event::Eof => break,
                // declaration, comments and PIs are regenerated or dropped
                _ => {}
            }
        }

        let root = root.ok_or_else(|| DtkError::Document("empty xml document".to_string()))?;
        Ok(Self { root })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(|e| DtkError::Document(format!("xml write failed: {}", e)))?;
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn xml_err(e: quick_xml::Error) -> DtkError {
    DtkError::Document(format!("xml parse failed: {}", e))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DtkError::Document(format!("xml parse failed: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DtkError::Document(format!("xml parse failed: {}", e)))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let write_err = |e: std::io::Error| DtkError::Document(format!("xml write failed: {}", e));

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(write_err)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t))).map_err(write_err)?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str()))).map_err(write_err)?;
    Ok(())
}
