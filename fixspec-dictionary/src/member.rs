/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Unresolved structural member trees.
//!
//! A [`Member`] names a field, a repeating group, or a component. Names are
//! not checked while the tree is built so that components may reference
//! definitions declared later in the document; see [`crate::resolve`] for
//! the pass that validates them.

use crate::node::Node;
use fixspec_core::MemberKind;
use serde::{Deserialize, Serialize};

/// A node of a structural member tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Name of the referenced field or component.
    pub name: String,
    /// Which kind of reference this is.
    pub kind: MemberKind,
    /// Whether the member must be present.
    pub required: bool,
    /// Whether the source carried a `required` attribute at all.
    pub required_declared: bool,
    /// Nested members in document order.
    pub children: Vec<Member>,
}

impl Member {
    /// Creates a field reference.
    #[must_use]
    pub fn field(name: impl Into<String>, required: bool) -> Self {
        Self::leaf(name, MemberKind::Field, required)
    }

    /// Creates a component reference.
    #[must_use]
    pub fn component(name: impl Into<String>, required: bool) -> Self {
        Self::leaf(name, MemberKind::Component, required)
    }

    /// Creates a repeating group with the given entry members.
    #[must_use]
    pub fn group(name: impl Into<String>, required: bool, children: Vec<Member>) -> Self {
        Self {
            children,
            ..Self::leaf(name, MemberKind::Group, required)
        }
    }

    /// Creates the root of a named fragment (component body, header, trailer).
    #[must_use]
    pub fn root(name: impl Into<String>, children: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Component,
            required: true,
            required_declared: false,
            children,
        }
    }

    fn leaf(name: impl Into<String>, kind: MemberKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            required_declared: true,
            children: Vec::new(),
        }
    }

    /// Builds a member tree from a `field`, `group`, or `component` node.
    ///
    /// `required` is true exactly when the attribute equals `"Y"`. Returns
    /// `None` for any other element name.
    #[must_use]
    pub fn from_node(node: &Node) -> Option<Self> {
        let kind = MemberKind::from_element(&node.name)?;
        let required_attr = node.attr("required");
        Some(Self {
            name: node.attr("name").unwrap_or_default().to_string(),
            kind,
            required: required_attr == Some("Y"),
            required_declared: required_attr.is_some(),
            children: Self::children_of(node),
        })
    }

    /// Builds the members declared directly under `node`, in document order.
    ///
    /// Child elements that are not structural members are ignored.
    #[must_use]
    pub fn children_of(node: &Node) -> Vec<Self> {
        node.elements().filter_map(Self::from_node).collect()
    }
}
