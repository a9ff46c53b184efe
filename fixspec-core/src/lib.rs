/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixspec Core
//!
//! Core types and error definitions shared by the fixspec crates.
//!
//! This crate provides the fundamental building blocks used by the dictionary
//! compiler and by code that consumes its generated tables:
//! - **Error types**: the fatal [`SchemaError`] family, built with `thiserror`
//! - **Primitive enums**: [`FieldType`], [`WireType`], [`Location`], [`MemberKind`]
//! - **Runtime records**: [`TagSpec`], [`MsgSpec`], [`GroupSpec`], [`VersionSpec`]
//!
//! ## Generated Tables
//!
//! The records in [`table`] are what generated sources instantiate as
//! `static` data. A decoder looks up the expected position of a tag inside a
//! message in O(1) through [`MsgSpec::position`] without hashing.

pub mod error;
pub mod table;
pub mod types;

pub use error::SchemaError;
pub use table::{GroupSpec, MsgSpec, TagSpec, VersionSpec, find_tag};
pub use types::{FieldType, Location, MemberKind, WireType};
