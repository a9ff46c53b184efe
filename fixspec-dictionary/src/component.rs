/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Named, reusable member fragments.

use crate::member::Member;
use crate::node::Node;
use fixspec_core::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Definition of a reusable component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Component name.
    pub name: String,
    /// Root of the component's member tree.
    pub root: Member,
}

impl Component {
    /// Creates a component from its members.
    #[must_use]
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Self {
        let name = name.into();
        Self {
            root: Member::root(name.clone(), members),
            name,
        }
    }

    /// Builds a component from a `<component>` declaration node.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidField` if the declaration has no name.
    pub fn from_node(node: &Node) -> Result<Self, SchemaError> {
        let name = node
            .attr("name")
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SchemaError::invalid_field("<unnamed>", "component without name"))?;
        Ok(Self::new(name, Member::children_of(node)))
    }

    /// Returns the component's top-level members.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.root.children
    }
}

/// Registry of components, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<Component>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a `<components>` section.
    ///
    /// # Errors
    /// Returns `SchemaError` for an unnamed or duplicate component.
    pub fn from_section(section: &Node) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for node in section.elements().filter(|n| n.name == "component") {
            registry.register(Component::from_node(node)?)?;
        }
        Ok(registry)
    }

    /// Registers a component.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateName` if the name is taken.
    pub fn register(&mut self, component: Component) -> Result<&Component, SchemaError> {
        if self.by_name.contains_key(&component.name) {
            return Err(SchemaError::duplicate_name("component", component.name));
        }
        debug!(name = %component.name, members = component.members().len(), "registered component");
        let idx = self.components.len();
        self.by_name.insert(component.name.clone(), idx);
        self.components.push(component);
        Ok(&self.components[idx])
    }

    /// Looks up a component by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Component> {
        self.by_name.get(name).map(|&idx| &self.components[idx])
    }

    /// Returns an iterator over the components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
