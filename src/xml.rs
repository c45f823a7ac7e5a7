//! Owned XML element tree for editing a package part.
//!
//! Parsing keeps every event the reader produces. Text, comments, CDATA,
//! processing instructions and the declaration are stored as the raw events
//! and written back verbatim, so an unedited subtree serializes to the same
//! markup it was read from.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

/// A node in the tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element and its children.
    Element(Element),
    /// Any non-element content, kept as read.
    Other(Event<'static>),
}

/// An XML element.
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    /// Create an empty element with a qualified name such as `w:sz`.
    pub fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Qualified name as raw bytes.
    pub fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    /// Check the qualified name.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name.as_bytes()
    }

    /// Unescaped value of an attribute.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.start
            .try_get_attribute(key)
            .ok()
            .flatten()
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        let name = String::from_utf8_lossy(self.name()).into_owned();
        let mut start = BytesStart::new(name);
        let mut replaced = false;

        for attr in self.start.attributes().flatten() {
            if attr.key.as_ref() == key.as_bytes() {
                start.push_attribute((key, value));
                replaced = true;
            } else {
                start.push_attribute(attr);
            }
        }
        if !replaced {
            start.push_attribute((key, value));
        }

        self.start = start;
    }

    /// Child elements, skipping text and other nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    /// Mutable child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> + '_ {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    /// Child elements with the given name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |el| el.is(name))
    }

    /// Mutable child elements with the given name.
    pub fn elements_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements_mut().filter(move |el| el.is(name))
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(name))
    }

    /// Mutable first child element with the given name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.is(name))
    }

    /// Node index of the first child element with the given name.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.is(name)))
    }

    /// Node index before which an element must go to precede every element
    /// named in `successors`; the end of the child list if none is present.
    pub fn insertion_index(&self, successors: &[&str]) -> usize {
        self.children
            .iter()
            .position(|node| {
                matches!(node, Node::Element(el) if successors.iter().any(|s| el.is(s)))
            })
            .unwrap_or(self.children.len())
    }

    /// Element at a node index.
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        match self.children.get_mut(index) {
            Some(Node::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Insert a child element at a node index.
    pub fn insert_element(&mut self, index: usize, element: Element) {
        self.children.insert(index, Node::Element(element));
        self.self_closing = false;
    }

    /// Concatenated, unescaped character data of the direct text children.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Other(Event::Text(t)) => {
                    if let Ok(s) = t.unescape() {
                        text.push_str(&s);
                    }
                }
                Node::Other(Event::CData(c)) => {
                    text.push_str(&String::from_utf8_lossy(c));
                }
                _ => {}
            }
        }
        text
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(self.start.borrow()))?;
            return Ok(());
        }

        writer.write_event(Event::Start(self.start.borrow()))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(self.start.to_end()))?;
        Ok(())
    }
}

impl Node {
    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        match self {
            Node::Element(el) => el.write(writer),
            Node::Other(event) => {
                writer.write_event(event.clone())?;
                Ok(())
            }
        }
    }
}

/// A parsed XML part.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
}

impl XmlTree {
    /// Parse a part. Mismatched or unclosed tags are errors.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut nodes = Vec::new();
        let mut open: Vec<Element> = Vec::new();

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::XmlParse(format!(
                        "{} (at byte {})",
                        e,
                        reader.buffer_position()
                    )))
                }
            };

            let node = match event {
                Event::Start(start) => {
                    open.push(Element {
                        start: start.into_owned(),
                        children: Vec::new(),
                        self_closing: false,
                    });
                    continue;
                }
                Event::Empty(start) => Node::Element(Element {
                    start: start.into_owned(),
                    children: Vec::new(),
                    self_closing: true,
                }),
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unexpected closing tag".to_string()))?;
                    Node::Element(element)
                }
                Event::Eof => break,
                other => Node::Other(other.into_owned()),
            };

            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::XmlParse(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(unclosed.name())
            )));
        }

        Ok(Self { nodes })
    }

    /// The document element.
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    /// Mutable document element.
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Other(_) => None,
        })
    }

    /// Serialize the tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            node.write(&mut writer)?;
        }
        Ok(writer.into_inner())
    }
}
