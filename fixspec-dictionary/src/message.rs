/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Message definitions and the message registry.

use crate::member::Member;
use crate::node::Node;
use fixspec_core::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Maximum MsgType length that packs into a [`u64`] type id.
pub const MAX_MSG_TYPE_LEN: usize = 8;

/// Message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageCategory {
    /// Administrative message (session level).
    Admin,
    /// Application message.
    #[default]
    App,
}

impl MessageCategory {
    /// Parses a `msgcat` attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "app" => Some(Self::App),
            _ => None,
        }
    }
}

/// Packs MsgType bytes big-endian into an integer.
///
/// `""` packs to 0 and `"AB"` to `(b'A' << 8) | b'B'`.
#[must_use]
pub fn pack_type_id(msg_type: &str) -> u64 {
    msg_type
        .bytes()
        .fold(0u64, |id, b| (id << 8) | u64::from(b))
}

/// Recovers the MsgType string from a packed type id.
#[must_use]
pub fn unpack_type_id(type_id: u64) -> String {
    type_id
        .to_be_bytes()
        .iter()
        .skip_while(|&&b| b == 0)
        .map(|&b| char::from(b))
        .collect()
}

/// Definition of a FIX message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message name.
    pub name: String,
    /// MsgType (tag 35) value.
    pub msg_type: String,
    /// Message category (admin or app).
    pub category: MessageCategory,
    /// Message description.
    pub description: Option<String>,
    /// Header members, then the message's own members, then trailer members.
    pub members: Vec<Member>,
    header_len: usize,
    trailer_len: usize,
}

impl Message {
    /// Assembles a message from its own members and the shared header and trailer.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidMessage` if the name is empty or the
    /// MsgType is empty or longer than [`MAX_MSG_TYPE_LEN`] bytes.
    pub fn new(
        name: impl Into<String>,
        msg_type: impl Into<String>,
        body: Vec<Member>,
        header: &Member,
        trailer: &Member,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let msg_type = msg_type.into();
        if name.is_empty() {
            return Err(SchemaError::invalid_message("<unnamed>", "missing name"));
        }
        if msg_type.is_empty() || msg_type.len() > MAX_MSG_TYPE_LEN {
            return Err(SchemaError::invalid_message(
                name,
                format!("msgtype '{msg_type}' must be 1 to {MAX_MSG_TYPE_LEN} bytes"),
            ));
        }

        let mut members =
            Vec::with_capacity(header.children.len() + body.len() + trailer.children.len());
        members.extend(header.children.iter().cloned());
        members.extend(body);
        members.extend(trailer.children.iter().cloned());

        Ok(Self {
            name,
            msg_type,
            category: MessageCategory::default(),
            description: None,
            members,
            header_len: header.children.len(),
            trailer_len: trailer.children.len(),
        })
    }

    /// Builds a message from a `<message>` declaration node.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidMessage` for a missing name or msgtype or
    /// an unknown category.
    pub fn from_node(node: &Node, header: &Member, trailer: &Member) -> Result<Self, SchemaError> {
        let name = node.attr("name").unwrap_or_default();
        let msg_type = node.attr("msgtype").unwrap_or_default();
        let mut message = Self::new(name, msg_type, Member::children_of(node), header, trailer)?;

        if let Some(cat) = node.attr("msgcat") {
            message.category = MessageCategory::parse(cat).ok_or_else(|| {
                SchemaError::invalid_message(name, format!("unknown msgcat '{cat}'"))
            })?;
        }
        message.description = node.attr("description").map(str::to_string);
        Ok(message)
    }

    /// Returns the MsgType packed into an integer.
    #[must_use]
    pub fn type_id(&self) -> u64 {
        pack_type_id(&self.msg_type)
    }

    /// Returns the message's own members, without header and trailer.
    #[must_use]
    pub fn body(&self) -> &[Member] {
        &self.members[self.header_len..self.members.len() - self.trailer_len]
    }

    /// Returns true if this is a session-level message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.category == MessageCategory::Admin
    }
}

/// Registry of messages, keyed by MsgType and by name.
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    messages: Vec<Message>,
    by_type: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl MessageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a message.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateName` if the MsgType or name is taken.
    pub fn register(&mut self, message: Message) -> Result<&Message, SchemaError> {
        if self.by_type.contains_key(&message.msg_type) {
            return Err(SchemaError::duplicate_name("msgtype", message.msg_type));
        }
        if self.by_name.contains_key(&message.name) {
            return Err(SchemaError::duplicate_name("message", message.name));
        }
        debug!(
            msg_type = %message.msg_type,
            name = %message.name,
            members = message.members.len(),
            "registered message"
        );
        let idx = self.messages.len();
        self.by_type.insert(message.msg_type.clone(), idx);
        self.by_name.insert(message.name.clone(), idx);
        self.messages.push(message);
        Ok(&self.messages[idx])
    }

    /// Looks up a message by MsgType.
    #[must_use]
    pub fn lookup(&self, msg_type: &str) -> Option<&Message> {
        self.by_type.get(msg_type).map(|&idx| &self.messages[idx])
    }

    /// Looks up a message by name.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<&Message> {
        self.by_name.get(name).map(|&idx| &self.messages[idx])
    }

    /// Returns an iterator over the messages in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Returns the messages sorted by MsgType.
    #[must_use]
    pub fn sorted_by_type(&self) -> Vec<&Message> {
        let mut messages: Vec<_> = self.messages.iter().collect();
        messages.sort_by(|a, b| a.msg_type.cmp(&b.msg_type));
        messages
    }

    /// Returns the number of registered messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no message is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Member {
        Member::root(
            "header",
            vec![
                Member::field("BeginString", true),
                Member::field("BodyLength", true),
            ],
        )
    }

    fn trailer() -> Member {
        Member::root("trailer", vec![Member::field("CheckSum", true)])
    }

    #[test]
    fn test_pack_type_id() {
        assert_eq!(pack_type_id(""), 0);
        assert_eq!(pack_type_id("A"), 65);
        assert_eq!(pack_type_id("0"), 48);
        assert_eq!(pack_type_id("AB"), 16706);
        assert_eq!(pack_type_id("AB"), (u64::from(b'A') << 8) | u64::from(b'B'));
    }

    #[test]
    fn test_type_id_round_trip() {
        for msg_type in ["A", "0", "AB", "AE", "BH", "xx"] {
            assert_eq!(unpack_type_id(pack_type_id(msg_type)), msg_type);
        }
        assert_eq!(unpack_type_id(16706), "AB");
        assert_eq!(unpack_type_id(0), "");
    }

    #[test]
    fn test_members_assembled() {
        let msg = Message::new(
            "Heartbeat",
            "0",
            vec![Member::field("TestReqID", false)],
            &header(),
            &trailer(),
        )
        .unwrap();
        let names: Vec<_> = msg.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["BeginString", "BodyLength", "TestReqID", "CheckSum"]
        );
        assert_eq!(msg.body().len(), 1);
        assert_eq!(msg.body()[0].name, "TestReqID");
        assert_eq!(msg.type_id(), 48);
    }

    #[test]
    fn test_from_node() {
        let node = Node::new("message")
            .with_attr("name", "Logon")
            .with_attr("msgtype", "A")
            .with_attr("msgcat", "admin")
            .with_child(
                Node::new("field")
                    .with_attr("name", "EncryptMethod")
                    .with_attr("required", "Y"),
            );
        let msg = Message::from_node(&node, &header(), &trailer()).unwrap();
        assert!(msg.is_admin());
        assert_eq!(msg.members.len(), 4);
        assert!(msg.body()[0].required);
    }

    #[test]
    fn test_invalid_messages() {
        let missing_type = Node::new("message").with_attr("name", "Bad");
        assert!(matches!(
            Message::from_node(&missing_type, &header(), &trailer()),
            Err(SchemaError::InvalidMessage { .. })
        ));

        let bad_cat = Node::new("message")
            .with_attr("name", "Bad")
            .with_attr("msgtype", "Z")
            .with_attr("msgcat", "other");
        assert!(matches!(
            Message::from_node(&bad_cat, &header(), &trailer()),
            Err(SchemaError::InvalidMessage { .. })
        ));

        let too_long = Message::new("Long", "ABCDEFGHI", vec![], &header(), &trailer());
        assert!(too_long.is_err());
    }

    #[test]
    fn test_registry() {
        let mut reg = MessageRegistry::new();
        for (name, ty) in [("Logon", "A"), ("Heartbeat", "0"), ("NewOrderSingle", "D")] {
            reg.register(Message::new(name, ty, vec![], &header(), &trailer()).unwrap())
                .unwrap();
        }
        let types: Vec<_> = reg
            .sorted_by_type()
            .iter()
            .map(|m| m.msg_type.as_str())
            .collect();
        assert_eq!(types, vec!["0", "A", "D"]);
        assert_eq!(reg.lookup("A").map(|m| m.name.as_str()), Some("Logon"));
        assert!(reg.lookup_name("Heartbeat").is_some());

        let dup = Message::new("Other", "A", vec![], &header(), &trailer()).unwrap();
        assert!(matches!(
            reg.register(dup),
            Err(SchemaError::DuplicateName { .. })
        ));
    }
}
