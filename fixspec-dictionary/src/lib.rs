/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixspec Dictionary
//!
//! Loading and compilation of FIX dictionaries.
//!
//! This crate provides:
//! - **Document loading**: QuickFIX-style XML into a [`Node`] tree
//! - **Registries**: fields (with length/value pairing), components, and messages
//! - **Resolution**: component expansion, cycle detection, and location propagation
//! - **Sequence tables**: per-message and per-group tag-indexed position tables
//!
//! [`Spec::compile`] runs the whole pipeline for one dictionary version.

pub mod component;
pub mod config;
pub mod error;
pub mod field;
pub mod member;
pub mod message;
pub mod node;
pub mod resolve;
pub mod sequence;
pub mod spec;

pub use component::{Component, ComponentRegistry};
pub use config::CompilerConfig;
pub use error::{CompileError, ParseError};
pub use field::{EnumValue, Field, FieldRegistry};
pub use member::Member;
pub use message::{
    Message, MessageCategory, MessageRegistry, pack_type_id, unpack_type_id,
};
pub use node::{Node, parse_document};
pub use resolve::{Resolved, Resolver};
pub use sequence::{
    GroupLayout, LEGACY_TAG_BOUND, MAX_TAG_BOUND, MessageLayout, TagSequence, max_member_tag,
};
pub use spec::{Spec, Version};
