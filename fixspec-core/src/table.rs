/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Static table records instantiated by generated sources.
//!
//! A generated file holds, per FIX version, one [`VersionSpec`], a tag table
//! of [`TagSpec`] rows sorted by tag and terminated by [`TagSpec::SENTINEL`],
//! and one [`MsgSpec`] per message. Each message carries a tag-indexed
//! sequence table: `tag_seq[t]` is the 1-based position at which tag `t` is
//! expected, or 0 when the tag is not part of the message.

pub use crate::types::{Location, WireType};
use std::fmt;

/// Per-version root record.
#[derive(Debug)]
pub struct VersionSpec {
    /// Major version number.
    pub major: u8,
    /// Minor version number.
    pub minor: u8,
    /// Service pack number (0 when none).
    pub service_pack: u8,
    /// BeginString value (tag 8).
    pub begin_string: &'static str,
    /// Tag rows sorted by tag, terminated by [`TagSpec::SENTINEL`].
    pub tags: &'static [TagSpec],
    /// Messages sorted by message type.
    pub messages: &'static [&'static MsgSpec],
}

impl VersionSpec {
    /// Looks up a tag row by tag number.
    #[must_use]
    pub fn tag(&self, tag: u32) -> Option<&'static TagSpec> {
        find_tag(self.tags, tag)
    }

    /// Looks up a message by its MsgType (tag 35) value.
    #[must_use]
    pub fn message(&self, msg_type: &str) -> Option<&'static MsgSpec> {
        self.messages
            .binary_search_by(|m| m.msg_type.cmp(msg_type))
            .ok()
            .map(|idx| self.messages[idx])
    }
}

/// Static description of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    /// Field tag number (0 only for the sentinel).
    pub tag: u32,
    /// Wire type of the value.
    pub wire_type: WireType,
    /// Message section the field belongs to.
    pub location: Location,
    /// Tag of the paired length/data field, or 0.
    pub related: u32,
    /// Number of decimal digits in `tag`.
    pub tag_len: u8,
    /// Encoded `"<tag>="` prefix.
    pub prefix: &'static str,
}

impl TagSpec {
    /// Terminator row of every tag table.
    pub const SENTINEL: TagSpec = TagSpec {
        tag: 0,
        wire_type: WireType::String,
        location: Location::Body,
        related: 0,
        tag_len: 0,
        prefix: "",
    };

    /// Returns true if this row is the table terminator.
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.tag == 0
    }
}

/// Static description of a single message.
pub struct MsgSpec {
    /// Owning version.
    pub version: &'static VersionSpec,
    /// MsgType bytes packed big-endian into an integer.
    pub tid: u64,
    /// MsgType (tag 35) value.
    pub msg_type: &'static str,
    /// Message name.
    pub name: &'static str,
    /// Tag-indexed expected positions (0 = not part of the message).
    pub tag_seq: &'static [u16],
    /// Repeating groups appearing at the top level of the message.
    pub groups: &'static [&'static GroupSpec],
}

impl MsgSpec {
    /// Returns the expected 1-based position of `tag`, if it belongs to the message.
    #[inline]
    #[must_use]
    pub fn position(&self, tag: u32) -> Option<u16> {
        position(self.tag_seq, tag)
    }

    /// Returns true if `next` may follow `prev` in this message.
    #[inline]
    #[must_use]
    pub fn in_order(&self, prev: u32, next: u32) -> bool {
        in_order(self.tag_seq, prev, next)
    }

    /// Finds the group whose count field has tag `count_tag`.
    #[must_use]
    pub fn group(&self, count_tag: u32) -> Option<&'static GroupSpec> {
        self.groups.iter().copied().find(|g| g.count_tag == count_tag)
    }
}

impl fmt::Debug for MsgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `version` points back at this message; print only its BeginString.
        f.debug_struct("MsgSpec")
            .field("version", &self.version.begin_string)
            .field("tid", &self.tid)
            .field("msg_type", &self.msg_type)
            .field("name", &self.name)
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}

/// Static description of a repeating group.
#[derive(Debug)]
pub struct GroupSpec {
    /// Tag of the NumInGroup count field.
    pub count_tag: u32,
    /// Tag of the first field of every entry.
    pub delimiter_tag: u32,
    /// Tag-indexed expected positions within one entry.
    pub tag_seq: &'static [u16],
    /// Groups nested inside an entry.
    pub groups: &'static [&'static GroupSpec],
}

impl GroupSpec {
    /// Returns the expected 1-based position of `tag` within an entry.
    #[inline]
    #[must_use]
    pub fn position(&self, tag: u32) -> Option<u16> {
        position(self.tag_seq, tag)
    }

    /// Returns true if `next` may follow `prev` within an entry.
    #[inline]
    #[must_use]
    pub fn in_order(&self, prev: u32, next: u32) -> bool {
        in_order(self.tag_seq, prev, next)
    }
}

/// Binary searches a sorted, sentinel-terminated tag table.
#[must_use]
pub fn find_tag(tags: &'static [TagSpec], tag: u32) -> Option<&'static TagSpec> {
    if tag == 0 {
        return None;
    }
    let rows = match tags.last() {
        Some(last) if last.is_sentinel() => &tags[..tags.len() - 1],
        _ => tags,
    };
    rows.binary_search_by_key(&tag, |row| row.tag)
        .ok()
        .map(|idx| &rows[idx])
}

#[inline]
fn position(tag_seq: &[u16], tag: u32) -> Option<u16> {
    let idx = usize::try_from(tag).ok()?;
    match tag_seq.get(idx) {
        Some(&pos) if pos != 0 => Some(pos),
        _ => None,
    }
}

#[inline]
fn in_order(tag_seq: &[u16], prev: u32, next: u32) -> bool {
    match (position(tag_seq, prev), position(tag_seq, next)) {
        (Some(p), Some(n)) => p < n,
        _ => false,
    }
}
