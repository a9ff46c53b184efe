/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixspec Codegen
//!
//! Generation of static FIX tables from compiled dictionaries.
//!
//! This crate turns a compiled [`Spec`] into Rust source declaring the
//! tag table and per-message sequence tables of `fixspec_core::table`.
//!
//! ## Usage
//!
//! Typically used in a `build.rs` script or through the `fixspec-gen` binary.

pub mod error;
pub mod generator;

pub use error::CodegenError;
pub use generator::{GeneratorConfig, TableEmitter, TagRow, tag_rows};

use fixspec_dictionary::{CompilerConfig, Spec};
use std::path::Path;

/// Generates Rust tables from a FIX dictionary XML string.
///
/// # Arguments
/// * `xml` - Dictionary document content
/// * `compiler` - Compiler configuration
/// * `generator` - Generator configuration
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if compilation or generation fails; no partial
/// output is returned.
pub fn generate_from_xml(
    xml: &str,
    compiler: &CompilerConfig,
    generator: &GeneratorConfig,
) -> Result<String, CodegenError> {
    let spec = Spec::compile_str(xml, compiler)?;
    TableEmitter::with_config(generator.clone()).emit(&spec)
}

/// Generates Rust tables from a FIX dictionary file.
///
/// The file name is quoted in the generated banner unless the generator
/// configuration already names a source.
///
/// # Errors
/// Returns `CodegenError` if reading, compilation, or generation fails.
pub fn generate_from_file(
    path: &Path,
    compiler: &CompilerConfig,
    generator: &GeneratorConfig,
) -> Result<String, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    let mut generator = generator.clone();
    if generator.source_name.is_none() {
        generator.source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }
    generate_from_xml(&xml, compiler, &generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixspec_core::SchemaError;

    const MINIMAL: &str = r#"<fix major="4" minor="2">
  <header><field name="BeginString" required="Y"/></header>
  <trailer><field name="CheckSum" required="Y"/></trailer>
  <messages>
    <message name="Heartbeat" msgtype="0" msgcat="admin"/>
  </messages>
  <fields>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="10" name="CheckSum" type="STRING"/>
  </fields>
</fix>"#;

    #[test]
    fn test_generate_from_xml() {
        let code = generate_from_xml(
            MINIMAL,
            &CompilerConfig::default(),
            &GeneratorConfig::default(),
        )
        .unwrap();
        assert!(code.contains("pub static FIX42: VersionSpec"));
        assert!(code.contains("pub static FIX42_HEARTBEAT: MsgSpec"));
    }

    #[test]
    fn test_unknown_type_produces_no_output() {
        let xml = MINIMAL.replace(
            r#"name="CheckSum" type="STRING""#,
            r#"name="CheckSum" type="FROBNICATE""#,
        );
        let err = generate_from_xml(&xml, &CompilerConfig::default(), &GeneratorConfig::default())
            .unwrap_err();
        let compile = err.compile_error().unwrap();
        assert_eq!(compile.version(), "FIX 4.2");
        assert!(matches!(
            compile.schema_error(),
            Some(SchemaError::UnknownFieldType { .. })
        ));
        assert!(err.to_string().contains("CheckSum"));
    }

    #[test]
    fn test_generate_from_missing_file() {
        let err = generate_from_file(
            Path::new("/nonexistent/FIX42.xml"),
            &CompilerConfig::default(),
            &GeneratorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }
}
