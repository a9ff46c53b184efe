/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Generic document tree and its XML loader.
//!
//! The compiler consumes a tree of named nodes with string attributes and
//! ordered children. [`parse_document`] builds that tree from a QuickFIX
//! style XML dictionary; text content, comments, and processing
//! instructions are dropped.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

/// A named document node with string attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Element name.
    pub name: String,
    /// Attribute name to value.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns an attribute value or a [`ParseError::MissingAttribute`].
    ///
    /// # Errors
    /// Returns `ParseError` if the attribute is absent.
    pub fn require_attr(&self, key: &str) -> Result<&str, ParseError> {
        self.attr(key)
            .ok_or_else(|| ParseError::missing_attr(&self.name, key))
    }

    /// Returns the direct children.
    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Finds the first descendant named `name`, depth-first in document order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Parses an XML document into a [`Node`] tree.
///
/// # Arguments
/// * `xml` - XML document content
///
/// # Returns
/// The root element.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, has no root element, or
/// leaves elements unclosed.
pub fn parse_document(xml: &str) -> Result<Node, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(node_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let node = node_from_start(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node)?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::InvalidStructure {
            message: format!("unclosed element <{}>", open.name),
        });
    }

    root.ok_or_else(|| ParseError::InvalidStructure {
        message: "no root element found".to_string(),
    })
}

/// Builds a node from a start tag and its attributes.
fn node_from_start(e: &BytesStart<'_>) -> Result<Node, ParseError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut node = Node::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        node.attributes.insert(key.to_string(), value.into_owned());
    }

    Ok(node)
}

/// Attaches a finished node to its parent, or makes it the root.
fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(ParseError::InvalidStructure {
            message: format!("second root element <{}>", node.name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fix major="4" minor="4">
  <header>
    <field name="BeginString" required="Y"/>
  </header>
  <!-- comment -->
  <fields>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="54" name="Side" type="CHAR">
      <value enum="1" description="BUY"/>
      <value enum="2" description="SELL"/>
    </field>
  </fields>
</fix>"#;

    #[test]
    fn test_parse_document_root() {
        let root = parse_document(DOC).expect("Failed to parse document");
        assert_eq!(root.name, "fix");
        assert_eq!(root.attr("major"), Some("4"));
        assert_eq!(root.attr("minor"), Some("4"));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_find_descendant() {
        let root = parse_document(DOC).expect("Failed to parse document");
        let fields = root.find("fields").expect("fields section");
        assert_eq!(fields.children.len(), 2);

        let side = &fields.children[1];
        assert_eq!(side.attr("name"), Some("Side"));
        let codes: Vec<_> = side.elements().filter_map(|v| v.attr("enum")).collect();
        assert_eq!(codes, vec!["1", "2"]);

        // First match in document order is the header reference.
        let first = root.find("field").expect("field");
        assert_eq!(first.attr("required"), Some("Y"));
    }

    #[test]
    fn test_require_attr() {
        let node = Node::new("field").with_attr("name", "MsgType");
        assert_eq!(node.require_attr("name").unwrap(), "MsgType");
        assert!(matches!(
            node.require_attr("number"),
            Err(ParseError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let root = parse_document(
            r#"<fix><field name="Text" description="A &amp; B &lt;C&gt;"/></fix>"#,
        )
        .expect("Failed to parse document");
        let field = root.find("field").expect("field");
        assert_eq!(field.attr("description"), Some("A & B <C>"));
    }

    #[test]
    fn test_malformed_attributes_rejected() {
        assert!(matches!(
            parse_document(r#"<fix><field name="A" name="B"/></fix>"#),
            Err(ParseError::Xml(_))
        ));
        assert!(matches!(
            parse_document(r#"<fix><field name="A &bogus; B"/></fix>"#),
            Err(ParseError::Xml(_))
        ));
    }

    #[test]
    fn test_unclosed_element() {
        let result = parse_document("<fix><fields>");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            parse_document(""),
            Err(ParseError::InvalidStructure { .. })
        ));
    }
}
