/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Schema compilation.
//!
//! [`Spec::compile`] drives one dictionary version through every stage:
//! fields, components, header and trailer (with location propagation),
//! messages, and finally resolution into [`MessageLayout`]s. Any failure
//! rejects the whole version.

use crate::component::{Component, ComponentRegistry};
use crate::config::CompilerConfig;
use crate::error::{CompileError, ParseError};
use crate::field::{Field, FieldRegistry};
use crate::member::Member;
use crate::message::{Message, MessageRegistry};
use crate::node::{Node, parse_document};
use crate::resolve::Resolver;
use crate::sequence::{MessageLayout, max_member_tag};
use fixspec_core::{Location, MemberKind, SchemaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

const UNKNOWN_VERSION: &str = "unknown version";

/// Version of a dictionary document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version number.
    pub major: u8,
    /// Minor version number.
    pub minor: u8,
    /// Service pack, 0 when none.
    pub service_pack: u8,
    /// Whether this is a FIXT transport dictionary.
    pub transport: bool,
}

impl Version {
    /// Creates a FIX application version.
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        Self {
            major,
            minor,
            service_pack: 0,
            transport: false,
        }
    }

    /// Sets the service pack.
    #[must_use]
    pub const fn with_service_pack(mut self, service_pack: u8) -> Self {
        self.service_pack = service_pack;
        self
    }

    /// Reads the version from a `<fix>` root element.
    ///
    /// # Errors
    /// Returns `ParseError` if the root is not `fix`, or if `major`/`minor`
    /// are missing or not small integers.
    pub fn from_node(root: &Node) -> Result<Self, ParseError> {
        if root.name != "fix" {
            return Err(ParseError::InvalidStructure {
                message: format!("expected <fix> root element, found <{}>", root.name),
            });
        }
        let number = |key: &str| -> Result<u8, ParseError> {
            let raw = root.require_attr(key)?;
            raw.trim()
                .parse()
                .map_err(|_| ParseError::invalid_attr("fix", key, raw))
        };
        let service_pack = match root.attr("servicepack") {
            Some(_) => number("servicepack")?,
            None => 0,
        };
        Ok(Self {
            major: number("major")?,
            minor: number("minor")?,
            service_pack,
            transport: root.attr("type") == Some("FIXT"),
        })
    }

    fn family(&self) -> &'static str {
        if self.transport { "FIXT" } else { "FIX" }
    }

    /// Returns the BeginString value, e.g. `FIX.4.4` or `FIXT.1.1`.
    #[must_use]
    pub fn begin_string(&self) -> String {
        match self.service_pack {
            0 => format!("{}.{}.{}", self.family(), self.major, self.minor),
            sp => format!("{}.{}.{}SP{sp}", self.family(), self.major, self.minor),
        }
    }

    /// Returns a human readable label, e.g. `FIX 5.0 SP2`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.service_pack {
            0 => format!("{} {}.{}", self.family(), self.major, self.minor),
            sp => format!("{} {}.{} SP{sp}", self.family(), self.major, self.minor),
        }
    }

    /// Returns the identifier naming this version in generated code, e.g. `FIX44`.
    #[must_use]
    pub fn symbol(&self) -> String {
        match self.service_pack {
            0 => format!("{}{}{}", self.family(), self.major, self.minor),
            sp => format!("{}{}{}SP{sp}", self.family(), self.major, self.minor),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A compiled, cross-referenced dictionary version.
#[derive(Debug, Clone)]
pub struct Spec {
    /// Dictionary version.
    pub version: Version,
    /// Registered fields, with locations and length pairs resolved.
    pub fields: FieldRegistry,
    /// Registered components.
    pub components: ComponentRegistry,
    /// Registered messages.
    pub messages: MessageRegistry,
    /// Header members shared by every message.
    pub header: Member,
    /// Trailer members shared by every message.
    pub trailer: Member,
    layouts: Vec<MessageLayout>,
    tag_bound: u32,
}

impl Spec {
    /// Compiles a parsed dictionary document.
    ///
    /// # Arguments
    /// * `root` - The `<fix>` root element
    /// * `config` - Compiler configuration
    ///
    /// # Errors
    /// Returns `CompileError` labelled with the version for the first
    /// structural or schema failure.
    pub fn compile(root: &Node, config: &CompilerConfig) -> Result<Self, CompileError> {
        let version = Version::from_node(root).map_err(|source| CompileError::Parse {
            version: UNKNOWN_VERSION.to_string(),
            source,
        })?;
        let label = version.label();
        let parse_err = |source: ParseError| CompileError::Parse {
            version: label.clone(),
            source,
        };
        let schema_err = |source: SchemaError| CompileError::Schema {
            version: label.clone(),
            source,
        };

        let section = |name: &str| {
            root.find(name)
                .ok_or_else(|| ParseError::missing_section(name))
        };
        let fields_node = section("fields").map_err(parse_err)?;
        let header_node = section("header").map_err(parse_err)?;
        let trailer_node = section("trailer").map_err(parse_err)?;
        let messages_node = section("messages").map_err(parse_err)?;

        let mut fields = FieldRegistry::from_section(fields_node).map_err(schema_err)?;
        let components = match root.find("components") {
            Some(node) => ComponentRegistry::from_section(node).map_err(schema_err)?,
            None => ComponentRegistry::new(),
        };

        let header = Member::root("header", Member::children_of(header_node));
        let trailer = Member::root("trailer", Member::children_of(trailer_node));
        propagate_location(&mut fields, &components, &header, Location::Header)
            .map_err(schema_err)?;
        propagate_location(&mut fields, &components, &trailer, Location::Trailer)
            .map_err(schema_err)?;

        let mut messages = MessageRegistry::new();
        for node in messages_node.elements().filter(|n| n.name == "message") {
            let message = Message::from_node(node, &header, &trailer).map_err(schema_err)?;
            messages.register(message).map_err(schema_err)?;
        }

        let resolver =
            Resolver::new(&fields, &components).with_strict(config.strict_references);
        for component in components.iter() {
            resolver
                .resolve(component.members(), &format!("component '{}'", component.name))
                .map_err(schema_err)?;
        }

        let mut resolved = Vec::with_capacity(messages.len());
        for message in messages.sorted_by_type() {
            let members = resolver
                .resolve(&message.members, &format!("message '{}'", message.name))
                .map_err(schema_err)?;
            resolved.push((message, members));
        }

        let max_used_tag = resolved
            .iter()
            .map(|(_, members)| max_member_tag(members))
            .max()
            .unwrap_or(0);
        let tag_bound = config.resolve_tag_bound(max_used_tag);
        let mut layouts = Vec::with_capacity(resolved.len());
        for (message, members) in resolved {
            layouts.push(MessageLayout::build(message, members, tag_bound).map_err(schema_err)?);
        }

        info!(
            version = %label,
            fields = fields.len(),
            components = components.len(),
            messages = messages.len(),
            tag_bound,
            "compiled dictionary"
        );

        Ok(Self {
            version,
            fields,
            components,
            messages,
            header,
            trailer,
            layouts,
            tag_bound,
        })
    }

    /// Parses and compiles a dictionary document.
    ///
    /// # Errors
    /// Returns `CompileError` if the XML is malformed or the schema invalid.
    pub fn compile_str(xml: &str, config: &CompilerConfig) -> Result<Self, CompileError> {
        let root = parse_document(xml).map_err(|source| CompileError::Parse {
            version: UNKNOWN_VERSION.to_string(),
            source,
        })?;
        Self::compile(&root, config)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.lookup(name)
    }

    /// Looks up a component by name.
    #[must_use]
    pub fn find_component(&self, name: &str) -> Option<&Component> {
        self.components.lookup(name)
    }

    /// Looks up a message by MsgType.
    #[must_use]
    pub fn message(&self, msg_type: &str) -> Option<&Message> {
        self.messages.lookup(msg_type)
    }

    /// Looks up a message layout by MsgType.
    #[must_use]
    pub fn layout(&self, msg_type: &str) -> Option<&MessageLayout> {
        self.layouts
            .binary_search_by(|l| l.msg_type.as_str().cmp(msg_type))
            .ok()
            .map(|idx| &self.layouts[idx])
    }

    /// Returns every message layout, sorted by MsgType.
    #[must_use]
    pub fn layouts(&self) -> &[MessageLayout] {
        &self.layouts
    }

    /// Returns the size of every tag sequence table in this version.
    #[must_use]
    pub fn tag_bound(&self) -> u32 {
        self.tag_bound
    }
}

/// Marks every field reachable from `tree` with `location`.
///
/// Component references are followed into the registered component.
fn propagate_location(
    fields: &mut FieldRegistry,
    components: &ComponentRegistry,
    tree: &Member,
    location: Location,
) -> Result<(), SchemaError> {
    let mut path = Vec::new();
    propagate_members(fields, components, &tree.children, location, &mut path)
}

fn propagate_members<'a>(
    fields: &mut FieldRegistry,
    components: &'a ComponentRegistry,
    members: &[Member],
    location: Location,
    path: &mut Vec<&'a str>,
) -> Result<(), SchemaError> {
    for member in members {
        match member.kind {
            MemberKind::Field | MemberKind::Group => {
                if !fields.set_location(&member.name, location) {
                    return Err(unresolved_in(location, &member.name));
                }
                propagate_members(fields, components, &member.children, location, path)?;
            }
            MemberKind::Component => {
                let component = components
                    .lookup(&member.name)
                    .ok_or_else(|| unresolved_in(location, &member.name))?;
                if path.contains(&component.name.as_str()) {
                    let mut cycle = path.clone();
                    cycle.push(&component.name);
                    return Err(SchemaError::CyclicComponentReference {
                        path: cycle.join(" -> "),
                    });
                }
                path.push(&component.name);
                propagate_members(fields, components, component.members(), location, path)?;
                path.pop();
            }
        }
    }
    Ok(())
}

fn unresolved_in(location: Location, name: &str) -> SchemaError {
    let name = name.to_string();
    match location {
        Location::Trailer => SchemaError::UnresolvedTrailerField { name },
        Location::Header | Location::Body => SchemaError::UnresolvedHeaderField { name },
    }
}
