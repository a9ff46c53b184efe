/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Tag-indexed sequence tables.
//!
//! A [`TagSequence`] maps a tag number to the 1-based position at which that
//! tag is expected among a member list, so a decoder can check field order
//! with one array index per tag. Messages and every repeating group, at any
//! depth, get their own table; a parent table only records a group's count
//! tag.

use crate::message::Message;
use crate::resolve::Resolved;
use fixspec_core::SchemaError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Historical fixed size of a tag sequence table.
pub const LEGACY_TAG_BOUND: u32 = 1000;

/// Largest tag sequence table a compiler will allocate.
pub const MAX_TAG_BOUND: u32 = 100_000;

/// Returns the largest tag used by `members`, including nested group members.
///
/// Members without a tag count as 0.
#[must_use]
pub fn max_member_tag(members: &[Resolved]) -> u32 {
    members
        .iter()
        .map(|member| match member {
            Resolved::Group {
                count_tag, members, ..
            } => (*count_tag).max(max_member_tag(members)),
            other => other.tag().unwrap_or(0),
        })
        .max()
        .unwrap_or(0)
}

/// Tag-indexed table of expected member positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSequence {
    slots: Vec<u16>,
}

impl TagSequence {
    /// Builds the table for a member list.
    ///
    /// Every member consumes one position, including members that carry no
    /// tag (lenient placeholders). Tags at or above `bound` are left out of
    /// the table. When a tag occurs twice the first position is kept.
    ///
    /// # Arguments
    /// * `members` - Resolved members in order
    /// * `bound` - Table size; valid tags are `0..bound`
    /// * `owner` - Message name used in errors
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidMessage` if the member count exceeds the
    /// position range.
    pub fn build(members: &[Resolved], bound: u32, owner: &str) -> Result<Self, SchemaError> {
        let mut slots = vec![0u16; bound as usize];
        for (idx, member) in members.iter().enumerate() {
            let seq = u16::try_from(idx + 1).map_err(|_| {
                SchemaError::invalid_message(owner, format!("more than {} members", u16::MAX))
            })?;
            let Some(tag) = member.tag() else {
                continue;
            };
            let Some(slot) = slots.get_mut(tag as usize) else {
                warn!(owner, tag, bound, name = member.name(), "tag outside sequence table");
                continue;
            };
            if *slot == 0 {
                *slot = seq;
            } else {
                warn!(owner, tag, name = member.name(), "tag repeated in member list");
            }
        }
        Ok(Self { slots })
    }

    /// Returns the expected position of `tag`, if it belongs to the list.
    #[must_use]
    pub fn position(&self, tag: u32) -> Option<u16> {
        self.slots
            .get(tag as usize)
            .copied()
            .filter(|&seq| seq != 0)
    }

    /// Returns the raw table, indexed by tag.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.slots
    }

    /// Returns the table size.
    #[must_use]
    pub fn bound(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Returns `(tag, position)` for every recorded tag, ascending by tag.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(_, &seq)| seq != 0)
            .map(|(tag, &seq)| (tag as u32, seq))
    }
}

/// Sequence layout of one repeating group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLayout {
    /// Group (count field) name.
    pub name: String,
    /// Tag of the NumInGroup count field.
    pub count_tag: u32,
    /// Tag of the first member of each entry.
    pub delimiter_tag: u32,
    /// Positions of the entry members.
    pub tag_sequence: TagSequence,
    /// Layouts of the groups nested in each entry.
    pub groups: Vec<GroupLayout>,
}

impl GroupLayout {
    fn build(
        name: &str,
        count_tag: u32,
        members: &[Resolved],
        bound: u32,
        owner: &str,
    ) -> Result<Self, SchemaError> {
        let delimiter_tag = members.iter().find_map(Resolved::tag).ok_or_else(|| {
            SchemaError::invalid_message(owner, format!("group '{name}' has no members"))
        })?;
        Ok(Self {
            name: name.to_string(),
            count_tag,
            delimiter_tag,
            tag_sequence: TagSequence::build(members, bound, owner)?,
            groups: group_layouts(members, bound, owner)?,
        })
    }
}

fn group_layouts(
    members: &[Resolved],
    bound: u32,
    owner: &str,
) -> Result<Vec<GroupLayout>, SchemaError> {
    members
        .iter()
        .filter_map(|member| match member {
            Resolved::Group {
                count_tag,
                name,
                members,
                ..
            } => Some(GroupLayout::build(name, *count_tag, members, bound, owner)),
            _ => None,
        })
        .collect()
}

/// Fully resolved layout of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLayout {
    /// Message name.
    pub name: String,
    /// MsgType value.
    pub msg_type: String,
    /// MsgType packed into an integer.
    pub type_id: u64,
    /// Resolved top-level members (header, body, trailer).
    pub members: Vec<Resolved>,
    /// Positions of the top-level members.
    pub tag_sequence: TagSequence,
    /// Layouts of the top-level groups.
    pub groups: Vec<GroupLayout>,
}

impl MessageLayout {
    /// Builds the layout of `message` from its resolved members.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidMessage` for an empty group or a member
    /// list too long to number.
    pub fn build(message: &Message, members: Vec<Resolved>, bound: u32) -> Result<Self, SchemaError> {
        let tag_sequence = TagSequence::build(&members, bound, &message.name)?;
        let groups = group_layouts(&members, bound, &message.name)?;
        Ok(Self {
            name: message.name.clone(),
            msg_type: message.msg_type.clone(),
            type_id: message.type_id(),
            members,
            tag_sequence,
            groups,
        })
    }

    /// Returns the expected position of a top-level tag.
    #[must_use]
    pub fn position(&self, tag: u32) -> Option<u16> {
        self.tag_sequence.position(tag)
    }

    /// Finds a group layout by count tag, searching nested groups too.
    #[must_use]
    pub fn group(&self, count_tag: u32) -> Option<&GroupLayout> {
        fn search(groups: &[GroupLayout], count_tag: u32) -> Option<&GroupLayout> {
            groups.iter().find_map(|g| {
                if g.count_tag == count_tag {
                    Some(g)
                } else {
                    search(&g.groups, count_tag)
                }
            })
        }
        search(&self.groups, count_tag)
    }
}
