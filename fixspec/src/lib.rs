/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixspec
//!
//! A compiler from FIX dictionaries to static, order-indexed tables.
//!
//! fixspec reads a QuickFIX-style XML dictionary, cross-references its
//! fields, components, groups, and messages, and emits Rust source holding a
//! tag table sorted by tag plus one tag-indexed sequence table per message,
//! so a decoder can check field order with a single array lookup per tag.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fixspec::prelude::*;
//! use std::path::Path;
//!
//! let xml = std::fs::read_to_string("FIX44.xml")?;
//! let code = generate_str(&xml, &CompilerConfig::default(), &GeneratorConfig::default())?;
//! write_artifact(Path::new("src/fix44.rs"), &code)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Error taxonomy, primitive enums, and runtime table records
//! - [`dictionary`]: Dictionary loading, registries, resolution, and compilation
//! - [`codegen`]: Table emission

use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod core {
    //! Error taxonomy, primitive enums, and runtime table records.
    pub use fixspec_core::*;
}

pub mod dictionary {
    //! Dictionary loading, registries, resolution, and compilation.
    pub use fixspec_dictionary::*;
}

pub mod codegen {
    //! Table emission.
    pub use fixspec_codegen::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use fixspec_core::{
        FieldType, GroupSpec, Location, MemberKind, MsgSpec, SchemaError, TagSpec, VersionSpec,
        WireType,
    };

    // Dictionary
    pub use fixspec_dictionary::{
        CompileError, CompilerConfig, Field, Member, MessageLayout, ParseError, Spec, Version,
    };

    // Codegen
    pub use fixspec_codegen::{CodegenError, GeneratorConfig, TableEmitter};

    // Helpers
    pub use crate::{compile_str, generate_str, write_artifact};
}

#[cfg(test)]
#[path = "fixtures/fix44_tables.rs"]
mod fix44_tables;

/// Compiles a dictionary document.
///
/// # Errors
/// Returns `CompileError` naming the version and the offending definition.
pub fn compile_str(
    xml: &str,
    config: &fixspec_dictionary::CompilerConfig,
) -> Result<fixspec_dictionary::Spec, fixspec_dictionary::CompileError> {
    fixspec_dictionary::Spec::compile_str(xml, config)
}

/// Compiles a dictionary document and generates its tables.
///
/// # Errors
/// Returns `CodegenError` if compilation or generation fails.
pub fn generate_str(
    xml: &str,
    compiler: &fixspec_dictionary::CompilerConfig,
    generator: &fixspec_codegen::GeneratorConfig,
) -> Result<String, fixspec_codegen::CodegenError> {
    fixspec_codegen::generate_from_xml(xml, compiler, generator)
}

/// Writes a generated artifact.
///
/// The contents go to a temporary file in the target directory which is
/// then renamed over `path`, so `path` never holds partial output.
///
/// # Errors
/// Returns `std::io::Error` if the temporary file cannot be written or
/// renamed.
pub fn write_artifact(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    const DICT: &str = r#"<fix major="4" minor="4">
  <header>
    <field name="BeginString" required="Y"/>
    <field name="BodyLength" required="Y"/>
  </header>
  <trailer>
    <field name="CheckSum" required="Y"/>
  </trailer>
  <messages>
    <message name="Heartbeat" msgtype="0" msgcat="admin">
      <field name="MsgType" required="Y"/>
    </message>
  </messages>
  <fields>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="9" name="BodyLength" type="LENGTH"/>
    <field number="10" name="CheckSum" type="STRING"/>
    <field number="35" name="MsgType" type="STRING"/>
    <field number="349" name="EncodedTextLen" type="LENGTH"/>
    <field number="358" name="EncodedText" type="DATA"/>
  </fields>
</fix>"#;

    #[test]
    fn test_compile_str() {
        let spec = compile_str(DICT, &CompilerConfig::default()).unwrap();
        assert_eq!(spec.version, Version::new(4, 4));

        let hb = spec.layout("0").unwrap();
        assert_eq!(hb.position(8), Some(1));
        assert_eq!(hb.position(9), Some(2));
        assert_eq!(hb.position(35), Some(3));
        assert_eq!(hb.position(10), Some(4));
        assert_eq!(hb.tag_sequence.entries().count(), 4);

        assert_eq!(spec.find_field("EncodedTextLen").unwrap().related, 358);
        assert_eq!(spec.find_field("EncodedText").unwrap().related, 349);
        assert_eq!(spec.find_field("BodyLength").unwrap().related, 0);
    }

    #[test]
    fn test_generate_str() {
        let code = generate_str(
            DICT,
            &CompilerConfig::default(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert!(code.contains("pub static FIX44_HEARTBEAT: MsgSpec"));
        assert!(code.contains("prefix: \"349=\""));
    }

    const LEGS_DICT: &str = r#"<fix major="4" minor="4">
  <header>
    <field name="BeginString" required="Y"/>
    <field name="BodyLength" required="Y"/>
    <field name="MsgType" required="Y"/>
  </header>
  <trailer>
    <field name="CheckSum" required="Y"/>
  </trailer>
  <messages>
    <message name="NewOrderSingle" msgtype="D" msgcat="app">
      <field name="ClOrdID" required="Y"/>
      <group name="NoLegs" required="N">
        <field name="LegSymbol" required="Y"/>
      </group>
    </message>
    <message name="Heartbeat" msgtype="0" msgcat="admin"/>
  </messages>
  <fields>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="9" name="BodyLength" type="LENGTH"/>
    <field number="10" name="CheckSum" type="STRING"/>
    <field number="11" name="ClOrdID" type="STRING"/>
    <field number="35" name="MsgType" type="STRING"/>
    <field number="354" name="EncodedTextLen" type="LENGTH"/>
    <field number="355" name="EncodedText" type="DATA"/>
    <field number="555" name="NoLegs" type="NUMINGROUP"/>
    <field number="600" name="LegSymbol" type="STRING"/>
  </fields>
</fix>"#;

    #[test]
    fn test_generated_fixture_is_current() {
        let code = generate_str(
            LEGS_DICT,
            &CompilerConfig::default(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert_eq!(code, include_str!("fixtures/fix44_tables.rs"));
    }

    #[test]
    fn test_generated_tables_compile_and_query() {
        use crate::fix44_tables::FIX44;

        assert_eq!(FIX44.begin_string, "FIX.4.4");
        let order = FIX44.message("D").unwrap();
        assert_eq!(order.name, "NewOrderSingle");
        assert_eq!(order.tid, 68);
        assert_eq!(order.position(8), Some(1));
        assert_eq!(order.position(11), Some(4));
        assert_eq!(order.position(555), Some(5));
        assert_eq!(order.position(10), Some(6));
        assert_eq!(order.position(600), None);
        assert!(order.in_order(11, 555));
        assert!(!order.in_order(10, 11));
        assert!(std::ptr::eq(order.version, &FIX44));

        let legs = order.group(555).unwrap();
        assert_eq!(legs.delimiter_tag, 600);
        assert_eq!(legs.position(600), Some(1));

        let heartbeat = FIX44.message("0").unwrap();
        assert_eq!(heartbeat.position(10), Some(4));
        assert!(heartbeat.groups.is_empty());
        assert!(FIX44.message("Z").is_none());

        let encoded = FIX44.tag(354).unwrap();
        assert_eq!(encoded.wire_type, WireType::Length);
        assert_eq!(encoded.related, 355);
        assert_eq!(FIX44.tag(355).unwrap().related, 354);
        assert_eq!(FIX44.tag(35).unwrap().location, Location::Header);
        assert_eq!(FIX44.tag(600).unwrap().prefix, "600=");
        assert!(FIX44.tag(12).is_none());
        assert!(FIX44.tags.last().unwrap().is_sentinel());
    }

    #[test]
    fn test_write_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fix44.rs");
        write_artifact(&path, "first").unwrap();
        write_artifact(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_compile_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fix44.rs");
        let xml = DICT.replace("\"DATA\"", "\"FROBNICATE\"");
        let result = generate_str(&xml, &CompilerConfig::default(), &GeneratorConfig::default())
            .and_then(|code| write_artifact(&path, &code).map_err(CodegenError::from));
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
