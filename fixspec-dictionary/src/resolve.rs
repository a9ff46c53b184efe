/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Resolution of member names into validated references.
//!
//! This is the second phase after [`Member`] tree construction. Field and
//! group names are looked up in the [`FieldRegistry`]; component references
//! are expanded in place with a deep copy of the component's members, so a
//! resolved tree only contains fields and groups.
//!
//! When a component reference carries an explicit `required` attribute, the
//! expanded members are required only if both they and the reference are.
//! Without the attribute, the expanded members keep their own flags. Group
//! entries start over: requiredness inside a group is relative to an entry.

use crate::component::ComponentRegistry;
use crate::field::FieldRegistry;
use crate::member::Member;
use fixspec_core::{MemberKind, SchemaError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A member whose name has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolved {
    /// A scalar field.
    Field {
        /// Field tag.
        tag: u32,
        /// Field name.
        name: String,
        /// Whether the field must be present.
        required: bool,
    },
    /// A repeating group.
    Group {
        /// Tag of the NumInGroup count field.
        count_tag: u32,
        /// Group (count field) name.
        name: String,
        /// Whether the group must be present.
        required: bool,
        /// Members of each entry.
        members: Vec<Resolved>,
    },
    /// A member that did not resolve; only produced by lenient resolution.
    Unresolved {
        /// The unresolved name.
        name: String,
    },
}

impl Resolved {
    /// Returns the tag this member occupies in its parent's sequence table.
    #[must_use]
    pub fn tag(&self) -> Option<u32> {
        match self {
            Self::Field { tag, .. } => Some(*tag),
            Self::Group { count_tag, .. } => Some(*count_tag),
            Self::Unresolved { .. } => None,
        }
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::Group { name, .. } | Self::Unresolved { name } => name,
        }
    }

    /// Returns whether the member is required.
    #[must_use]
    pub fn required(&self) -> bool {
        match self {
            Self::Field { required, .. } | Self::Group { required, .. } => *required,
            Self::Unresolved { .. } => false,
        }
    }
}

/// Resolves member trees against the field and component registries.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    fields: &'a FieldRegistry,
    components: &'a ComponentRegistry,
    strict: bool,
}

impl<'a> Resolver<'a> {
    /// Creates a strict resolver.
    ///
    /// # Arguments
    /// * `fields` - Registered fields
    /// * `components` - Registered components
    #[must_use]
    pub fn new(fields: &'a FieldRegistry, components: &'a ComponentRegistry) -> Self {
        Self {
            fields,
            components,
            strict: true,
        }
    }

    /// Sets whether an unresolved name is fatal.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves a member list.
    ///
    /// # Arguments
    /// * `members` - Members in document order
    /// * `context` - Owner description used in errors, e.g. `message 'Logon'`
    ///
    /// # Errors
    /// Returns `SchemaError::CyclicComponentReference` if a component expands
    /// into itself, and, when strict, `SchemaError::UnresolvedComponentReference`
    /// for a name no registry knows.
    pub fn resolve(&self, members: &[Member], context: &str) -> Result<Vec<Resolved>, SchemaError> {
        let mut path = Vec::new();
        let mut out = Vec::with_capacity(members.len());
        self.resolve_into(members, context, None, &mut path, &mut out)?;
        Ok(out)
    }

    fn resolve_into(
        &self,
        members: &[Member],
        context: &str,
        cap: Option<bool>,
        path: &mut Vec<&'a str>,
        out: &mut Vec<Resolved>,
    ) -> Result<(), SchemaError> {
        let components: &'a ComponentRegistry = self.components;
        for member in members {
            let required = member.required && cap.unwrap_or(true);
            match member.kind {
                MemberKind::Field => match self.fields.lookup(&member.name) {
                    Some(field) => out.push(Resolved::Field {
                        tag: field.tag,
                        name: field.name.clone(),
                        required,
                    }),
                    None => self.unresolved(member, context, out)?,
                },
                MemberKind::Group => match self.fields.lookup(&member.name) {
                    Some(field) => {
                        let mut entry = Vec::with_capacity(member.children.len());
                        self.resolve_into(&member.children, context, None, path, &mut entry)?;
                        out.push(Resolved::Group {
                            count_tag: field.tag,
                            name: field.name.clone(),
                            required,
                            members: entry,
                        });
                    }
                    None => self.unresolved(member, context, out)?,
                },
                MemberKind::Component => {
                    let Some(component) = components.lookup(&member.name) else {
                        self.unresolved(member, context, out)?;
                        continue;
                    };
                    if path.contains(&component.name.as_str()) {
                        let mut cycle: Vec<&str> = path.clone();
                        cycle.push(&component.name);
                        return Err(SchemaError::CyclicComponentReference {
                            path: cycle.join(" -> "),
                        });
                    }
                    let inner_cap = if member.required_declared {
                        Some(required)
                    } else {
                        cap
                    };
                    path.push(&component.name);
                    self.resolve_into(component.members(), context, inner_cap, path, out)?;
                    path.pop();
                }
            }
        }
        Ok(())
    }

    fn unresolved(
        &self,
        member: &Member,
        context: &str,
        out: &mut Vec<Resolved>,
    ) -> Result<(), SchemaError> {
        if self.strict {
            return Err(SchemaError::unresolved(&member.name, context));
        }
        warn!(name = %member.name, kind = %member.kind, context, "skipping unresolved member");
        out.push(Resolved::Unresolved {
            name: member.name.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::field::Field;
    use fixspec_core::FieldType;

    fn fields() -> FieldRegistry {
        let mut reg = FieldRegistry::new();
        for (tag, name, ty) in [
            (55, "Symbol", FieldType::String),
            (48, "SecurityID", FieldType::String),
            (453, "NoPartyIDs", FieldType::NumInGroup),
            (448, "PartyID", FieldType::String),
            (452, "PartyRole", FieldType::Int),
            (11, "ClOrdID", FieldType::String),
        ] {
            reg.register(Field::new(tag, name, ty)).unwrap();
        }
        reg
    }

    fn components() -> ComponentRegistry {
        let mut reg = ComponentRegistry::new();
        reg.register(Component::new(
            "Instrument",
            vec![Member::field("Symbol", true), Member::field("SecurityID", false)],
        ))
        .unwrap();
        reg.register(Component::new(
            "Parties",
            vec![Member::group(
                "NoPartyIDs",
                false,
                vec![Member::field("PartyID", true), Member::field("PartyRole", false)],
            )],
        ))
        .unwrap();
        reg
    }

    #[test]
    fn test_component_expanded_in_place() {
        let (f, c) = (fields(), components());
        let members = vec![
            Member::field("ClOrdID", true),
            Member::component("Instrument", true),
            Member::component("Parties", false),
        ];
        let resolved = Resolver::new(&f, &c).resolve(&members, "test").unwrap();
        let tags: Vec<_> = resolved.iter().filter_map(Resolved::tag).collect();
        assert_eq!(tags, vec![11, 55, 48, 453]);

        match &resolved[3] {
            Resolved::Group { members, .. } => {
                assert_eq!(members.len(), 2);
                assert!(members[0].required());
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_reference_weakens_children() {
        let (f, c) = (fields(), components());
        let members = vec![Member::component("Instrument", false)];
        let resolved = Resolver::new(&f, &c).resolve(&members, "test").unwrap();
        assert!(!resolved[0].required());
    }

    #[test]
    fn test_undeclared_required_keeps_component_flags() {
        let (f, c) = (fields(), components());
        let mut reference = Member::component("Instrument", false);
        reference.required_declared = false;
        let resolved = Resolver::new(&f, &c).resolve(&[reference], "test").unwrap();
        assert!(resolved[0].required());
        assert!(!resolved[1].required());
    }

    #[test]
    fn test_unresolved_is_fatal_when_strict() {
        let (f, c) = (fields(), components());
        let members = vec![Member::component("Nowhere", true)];
        let err = Resolver::new(&f, &c)
            .resolve(&members, "message 'Test'")
            .unwrap_err();
        assert_eq!(err, SchemaError::unresolved("Nowhere", "message 'Test'"));
    }

    #[test]
    fn test_unresolved_kept_when_lenient() {
        let (f, c) = (fields(), components());
        let members = vec![Member::field("Ghost", true), Member::field("Symbol", true)];
        let resolved = Resolver::new(&f, &c)
            .with_strict(false)
            .resolve(&members, "test")
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].tag(), None);
        assert_eq!(resolved[1].tag(), Some(55));
    }

    #[test]
    fn test_cycle_detected() {
        let f = fields();
        let mut c = ComponentRegistry::new();
        c.register(Component::new("A", vec![Member::component("B", true)]))
            .unwrap();
        c.register(Component::new(
            "B",
            vec![Member::field("Symbol", true), Member::component("A", true)],
        ))
        .unwrap();
        let err = Resolver::new(&f, &c)
            .resolve(&[Member::component("A", true)], "test")
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicComponentReference {
                path: "A -> B -> A".to_string()
            }
        );
    }

    #[test]
    fn test_same_component_twice_is_not_a_cycle() {
        let (f, c) = (fields(), components());
        let members = vec![
            Member::component("Instrument", true),
            Member::component("Instrument", true),
        ];
        let resolved = Resolver::new(&f, &c).resolve(&members, "test").unwrap();
        assert_eq!(resolved.len(), 4);
    }
}
