/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field definitions and the field registry.
//!
//! Raw `<field>` declarations are converted into typed [`Field`] values at
//! registration: integer tag, parsed [`FieldType`], and a [`Location`] that
//! starts as [`Location::Body`]. After every field is registered,
//! [`FieldRegistry::pair_lengths`] links each `LENGTH` field with its data
//! field.

use crate::node::Node;
use fixspec_core::{FieldType, Location, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One value of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Wire code, e.g. `"1"`.
    pub code: String,
    /// Symbolic description, e.g. `"BUY"`.
    pub description: String,
}

/// Definition of a FIX field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field tag number.
    pub tag: u32,
    /// Field name.
    pub name: String,
    /// Declared data type.
    pub field_type: FieldType,
    /// Message section the field belongs to.
    pub location: Location,
    /// Tag of the paired length/data field, or 0.
    pub related: u32,
    /// Declared values, in declaration order, when the field is enumerated.
    pub values: Option<Vec<EnumValue>>,
    /// Field description.
    pub description: Option<String>,
}

impl Field {
    /// Creates a new body field with no relation and no values.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `name` - The field name
    /// * `field_type` - The field data type
    #[must_use]
    pub fn new(tag: u32, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            tag,
            name: name.into(),
            field_type,
            location: Location::Body,
            related: 0,
            values: None,
            description: None,
        }
    }

    /// Adds enumerated values.
    #[must_use]
    pub fn with_values(mut self, values: Vec<EnumValue>) -> Self {
        self.values = if values.is_empty() { None } else { Some(values) };
        self
    }

    /// Adds a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds a field from a `<field>` declaration node.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidField` for a missing name or a missing,
    /// non-numeric, or zero tag, and `SchemaError::UnknownFieldType` for an
    /// unrecognized type.
    pub fn from_node(node: &Node) -> Result<Self, SchemaError> {
        let name = match node.attr("name") {
            Some(name) if !name.is_empty() => name,
            _ => return Err(SchemaError::invalid_field("<unnamed>", "missing name")),
        };

        let number = node
            .attr("number")
            .ok_or_else(|| SchemaError::invalid_field(name, "missing tag number"))?;
        let tag: u32 = number
            .trim()
            .parse()
            .map_err(|_| SchemaError::invalid_field(name, format!("non-numeric tag '{number}'")))?;
        if tag == 0 {
            return Err(SchemaError::invalid_field(name, "tag must be positive"));
        }

        let type_name = node.attr("type").unwrap_or_default();
        let field_type =
            FieldType::parse(type_name).ok_or_else(|| SchemaError::UnknownFieldType {
                field: name.to_string(),
                type_name: type_name.to_string(),
            })?;

        let mut values: Vec<EnumValue> = Vec::new();
        for value in node.elements().filter(|n| n.name == "value") {
            let code = value
                .attr("enum")
                .ok_or_else(|| SchemaError::invalid_field(name, "value without enum code"))?;
            if values.iter().any(|v| v.code == code) {
                return Err(SchemaError::invalid_field(
                    name,
                    format!("duplicate enum code '{code}'"),
                ));
            }
            values.push(EnumValue {
                code: code.to_string(),
                description: value.attr("description").unwrap_or_default().to_string(),
            });
        }

        let field = Field::new(tag, name, field_type).with_values(values);
        Ok(match node.attr("description") {
            Some(description) => field.with_description(description),
            None => field,
        })
    }

    /// Returns true if the field declares enumerated values.
    #[must_use]
    pub fn is_enumerated(&self) -> bool {
        self.values.is_some()
    }
}

/// Registry of every field of one schema version.
///
/// Iteration follows registration order, which is also the order
/// length/value pairing scans in.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    by_tag: HashMap<u32, usize>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a `<fields>` section and pairs length fields.
    ///
    /// # Errors
    /// Returns `SchemaError` for the first invalid or duplicate declaration.
    pub fn from_section(section: &Node) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for node in section.elements().filter(|n| n.name == "field") {
            registry.register_node(node)?;
        }
        registry.pair_lengths();
        Ok(registry)
    }

    /// Registers a raw `<field>` declaration.
    ///
    /// # Errors
    /// Returns `SchemaError` if the declaration is invalid or collides with a
    /// registered name or tag.
    pub fn register_node(&mut self, node: &Node) -> Result<&Field, SchemaError> {
        let field = Field::from_node(node)?;
        self.register(field)
    }

    /// Registers a typed field.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateName` or `SchemaError::DuplicateTag`.
    pub fn register(&mut self, field: Field) -> Result<&Field, SchemaError> {
        if self.by_name.contains_key(&field.name) {
            return Err(SchemaError::duplicate_name("field", field.name));
        }
        if let Some(&idx) = self.by_tag.get(&field.tag) {
            return Err(SchemaError::DuplicateTag {
                tag: field.tag,
                name: field.name,
                existing: self.fields[idx].name.clone(),
            });
        }

        debug!(tag = field.tag, name = %field.name, "registered field");
        let idx = self.fields.len();
        self.by_name.insert(field.name.clone(), idx);
        self.by_tag.insert(field.tag, idx);
        self.fields.push(field);
        Ok(&self.fields[idx])
    }

    /// Pairs every `LENGTH` field with its data field.
    ///
    /// For each length field, in registration order, the first other
    /// non-length field whose name is a proper prefix of the length field's
    /// name (`EncodedText` for `EncodedTextLen`) becomes its partner; both
    /// sides store the other's tag. NumInGroup fields are never paired.
    /// A data field is claimed by at most one length field, so pairs are
    /// always symmetric.
    ///
    /// # Returns
    /// The number of pairs made.
    pub fn pair_lengths(&mut self) -> usize {
        let mut claimed: Vec<bool> = self.fields.iter().map(|f| f.related != 0).collect();
        let mut pairs = Vec::new();
        for (li, length) in self.fields.iter().enumerate() {
            if !length.field_type.is_length() || claimed[li] {
                continue;
            }
            let partner = self
                .fields
                .iter()
                .enumerate()
                .find(|&(di, data)| {
                    di != li
                        && !claimed[di]
                        && !data.field_type.is_length()
                        && data.name.len() < length.name.len()
                        && length.name.starts_with(data.name.as_str())
                })
                .map(|(di, _)| di);
            if let Some(di) = partner {
                claimed[li] = true;
                claimed[di] = true;
                pairs.push((li, di));
            }
        }

        for &(li, di) in &pairs {
            let (length_tag, data_tag) = (self.fields[li].tag, self.fields[di].tag);
            self.fields[li].related = data_tag;
            self.fields[di].related = length_tag;
            debug!(length = length_tag, data = data_tag, "paired length field");
        }
        pairs.len()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Looks up a field by tag.
    #[must_use]
    pub fn lookup_tag(&self, tag: u32) -> Option<&Field> {
        self.by_tag.get(&tag).map(|&idx| &self.fields[idx])
    }

    /// Sets the location of a named field.
    ///
    /// # Returns
    /// `false` if no field has that name.
    pub fn set_location(&mut self, name: &str, location: Location) -> bool {
        match self.by_name.get(name) {
            Some(&idx) => {
                self.fields[idx].location = location;
                true
            }
            None => false,
        }
    }

    /// Returns an iterator over the fields in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Returns the fields sorted ascending by tag.
    #[must_use]
    pub fn sorted_by_tag(&self) -> Vec<&Field> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.tag);
        fields
    }

    /// Returns the number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
