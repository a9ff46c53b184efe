/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Table emitter for compiled FIX dictionaries.
//!
//! Generates Rust source declaring the static records of
//! `fixspec_core::table` for one version: the [`TagSpec`] table sorted by
//! tag, one `MsgSpec` per message sorted by MsgType, and one `GroupSpec` per
//! repeating group. The output only depends on the compiled [`Spec`], so
//! emitting the same dictionary twice yields identical text.
//!
//! The output opens with inner `//!` docs, so it must be compiled as a
//! module file (`#[path = "fix44.rs"] mod fix44;`), not spliced in with
//! `include!`.
//!
//! [`TagSpec`]: fixspec_core::TagSpec

use crate::error::CodegenError;
use arrayvec::ArrayString;
use fixspec_core::{Location, WireType};
use fixspec_dictionary::{GroupLayout, MessageLayout, Spec};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::info;

/// Sequence table values written per output line.
const SEQ_PER_LINE: usize = 32;

/// Capacity of a tag prefix: ten decimal digits plus `=`.
const PREFIX_CAPACITY: usize = 11;

/// Configuration for table generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Module path the generated code imports its record types from.
    pub runtime_path: String,
    /// Visibility of the generated statics (e.g., "pub", "pub(crate)").
    pub visibility: String,
    /// Whether to emit group tables.
    pub emit_groups: bool,
    /// Dictionary file name quoted in the generated banner.
    pub source_name: Option<String>,
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime module path.
    #[must_use]
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Sets the visibility of the generated statics.
    #[must_use]
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// Sets whether group tables are emitted.
    #[must_use]
    pub fn with_emit_groups(mut self, emit_groups: bool) -> Self {
        self.emit_groups = emit_groups;
        self
    }

    /// Sets the source name quoted in the banner.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: "fixspec_core::table".to_string(),
            visibility: "pub".to_string(),
            emit_groups: true,
            source_name: None,
        }
    }
}

/// Data of one emitted tag table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRow {
    /// Field tag.
    pub tag: u32,
    /// Wire type of the field.
    pub wire_type: WireType,
    /// Message section of the field.
    pub location: Location,
    /// Tag of the paired length/data field, or 0.
    pub related: u32,
    /// Number of decimal digits in the tag.
    pub tag_len: u8,
    /// `"<tag>="` prefix.
    pub prefix: ArrayString<PREFIX_CAPACITY>,
}

impl TagRow {
    /// Creates a row, deriving the formatting fields from the tag.
    #[must_use]
    pub fn new(tag: u32, wire_type: WireType, location: Location, related: u32) -> Self {
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(tag);
        let mut prefix = ArrayString::new();
        prefix.push_str(digits);
        prefix.push('=');
        Self {
            tag,
            wire_type,
            location,
            related,
            tag_len: digits.len() as u8,
            prefix,
        }
    }
}

/// Extracts the tag table rows of a compiled spec, ascending by tag.
#[must_use]
pub fn tag_rows(spec: &Spec) -> Vec<TagRow> {
    spec.fields
        .sorted_by_tag()
        .into_iter()
        .map(|f| TagRow::new(f.tag, f.field_type.wire_type(), f.location, f.related))
        .collect()
}

/// Emits static tables from compiled dictionaries.
#[derive(Debug, Default)]
pub struct TableEmitter {
    config: GeneratorConfig,
}

impl TableEmitter {
    /// Creates a new emitter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new emitter with the specified configuration.
    #[must_use]
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the Rust source for a compiled spec.
    ///
    /// # Arguments
    /// * `spec` - The compiled dictionary version
    ///
    /// # Returns
    /// The generated Rust source code.
    ///
    /// # Errors
    /// Returns `CodegenError::Fmt` if writing to the buffer fails.
    pub fn emit(&self, spec: &Spec) -> Result<String, CodegenError> {
        let mut code = String::new();
        let symbol = spec.version.symbol();
        let rows = tag_rows(spec);

        let mut idents = HashSet::new();
        idents.insert(symbol.clone());
        let tags_ident = unique_ident(&mut idents, format!("{symbol}_TAGS"));
        let message_idents: Vec<String> = spec
            .layouts()
            .iter()
            .map(|l| {
                unique_ident(
                    &mut idents,
                    format!("{symbol}_{}", to_screaming_snake_case(&l.name)),
                )
            })
            .collect();

        self.write_preamble(&mut code, spec)?;
        self.write_version(&mut code, spec, &symbol, &tags_ident, &message_idents)?;
        self.write_tag_table(&mut code, spec, &tags_ident, &rows)?;
        for (layout, ident) in spec.layouts().iter().zip(&message_idents) {
            self.write_message(&mut code, &symbol, ident, layout, &mut idents)?;
        }

        info!(
            version = %spec.version,
            tags = rows.len(),
            messages = message_idents.len(),
            bytes = code.len(),
            "emitted tables"
        );
        Ok(code)
    }

    fn write_preamble(&self, code: &mut String, spec: &Spec) -> Result<(), CodegenError> {
        writeln!(code, "//! Generated {} tables.", spec.version)?;
        writeln!(code, "//!")?;
        if let Some(ref source) = self.config.source_name {
            writeln!(code, "//! Source: {source}")?;
        }
        writeln!(code, "//! This file was automatically generated. Do not edit.")?;
        writeln!(code)?;

        let has_groups = self.config.emit_groups
            && spec.layouts().iter().any(|l| !l.groups.is_empty());
        let records = if has_groups {
            "GroupSpec, Location, MsgSpec, TagSpec, VersionSpec, WireType"
        } else {
            "Location, MsgSpec, TagSpec, VersionSpec, WireType"
        };
        writeln!(code, "use {}::{{{records}}};", self.config.runtime_path)?;
        writeln!(code)?;
        Ok(())
    }

    fn write_version(
        &self,
        code: &mut String,
        spec: &Spec,
        symbol: &str,
        tags_ident: &str,
        message_idents: &[String],
    ) -> Result<(), CodegenError> {
        let version = &spec.version;
        writeln!(code, "/// {version} specification.")?;
        writeln!(
            code,
            "{} static {symbol}: VersionSpec = VersionSpec {{",
            self.config.visibility
        )?;
        writeln!(code, "    major: {},", version.major)?;
        writeln!(code, "    minor: {},", version.minor)?;
        writeln!(code, "    service_pack: {},", version.service_pack)?;
        writeln!(code, "    begin_string: {:?},", version.begin_string())?;
        writeln!(code, "    tags: &{tags_ident},")?;
        writeln!(code, "    messages: &[")?;
        for ident in message_idents {
            writeln!(code, "        &{ident},")?;
        }
        writeln!(code, "    ],")?;
        writeln!(code, "}};")?;
        writeln!(code)?;
        Ok(())
    }

    fn write_tag_table(
        &self,
        code: &mut String,
        spec: &Spec,
        tags_ident: &str,
        rows: &[TagRow],
    ) -> Result<(), CodegenError> {
        writeln!(code, "/// {} tag table, sorted by tag.", spec.version)?;
        writeln!(
            code,
            "{} static {tags_ident}: [TagSpec; {}] = [",
            self.config.visibility,
            rows.len() + 1
        )?;
        for row in rows {
            writeln!(
                code,
                "    TagSpec {{ tag: {}, wire_type: WireType::{}, location: Location::{}, related: {}, tag_len: {}, prefix: {:?} }},",
                row.tag,
                row.wire_type.as_str(),
                row.location.as_str(),
                row.related,
                row.tag_len,
                row.prefix.as_str(),
            )?;
        }
        writeln!(code, "    TagSpec::SENTINEL,")?;
        writeln!(code, "];")?;
        writeln!(code)?;
        Ok(())
    }

    fn write_message(
        &self,
        code: &mut String,
        symbol: &str,
        ident: &str,
        layout: &MessageLayout,
        idents: &mut HashSet<String>,
    ) -> Result<(), CodegenError> {
        let groups = if self.config.emit_groups {
            self.write_groups(code, ident, &layout.groups, idents)?
        } else {
            Vec::new()
        };

        writeln!(code, "/// {} (MsgType = {}).", layout.name, layout.msg_type)?;
        writeln!(
            code,
            "{} static {ident}: MsgSpec = MsgSpec {{",
            self.config.visibility
        )?;
        writeln!(code, "    version: &{symbol},")?;
        writeln!(code, "    tid: {},", layout.type_id)?;
        writeln!(code, "    msg_type: {:?},", layout.msg_type)?;
        writeln!(code, "    name: {:?},", layout.name)?;
        write_tag_seq(code, layout.tag_sequence.as_slice())?;
        write_group_refs(code, &groups)?;
        writeln!(code, "}};")?;
        writeln!(code)?;
        Ok(())
    }

    /// Writes the statics of `groups` and their nested groups, returning
    /// the identifiers of `groups` in order.
    fn write_groups(
        &self,
        code: &mut String,
        parent: &str,
        groups: &[GroupLayout],
        idents: &mut HashSet<String>,
    ) -> Result<Vec<String>, CodegenError> {
        let mut written = Vec::with_capacity(groups.len());
        for group in groups {
            let ident = unique_ident(
                idents,
                format!("{parent}_{}", to_screaming_snake_case(&group.name)),
            );
            let nested = self.write_groups(code, &ident, &group.groups, idents)?;

            writeln!(
                code,
                "/// {} group (count tag {}).",
                group.name, group.count_tag
            )?;
            writeln!(
                code,
                "{} static {ident}: GroupSpec = GroupSpec {{",
                self.config.visibility
            )?;
            writeln!(code, "    count_tag: {},", group.count_tag)?;
            writeln!(code, "    delimiter_tag: {},", group.delimiter_tag)?;
            write_tag_seq(code, group.tag_sequence.as_slice())?;
            write_group_refs(code, &nested)?;
            writeln!(code, "}};")?;
            writeln!(code)?;
            written.push(ident);
        }
        Ok(written)
    }
}

fn write_tag_seq(code: &mut String, seq: &[u16]) -> Result<(), CodegenError> {
    writeln!(code, "    tag_seq: &[")?;
    let mut buf = itoa::Buffer::new();
    for chunk in seq.chunks(SEQ_PER_LINE) {
        code.push_str("        ");
        for (i, pos) in chunk.iter().enumerate() {
            if i > 0 {
                code.push(' ');
            }
            code.push_str(buf.format(*pos));
            code.push(',');
        }
        code.push('\n');
    }
    writeln!(code, "    ],")?;
    Ok(())
}

fn write_group_refs(code: &mut String, idents: &[String]) -> Result<(), CodegenError> {
    if idents.is_empty() {
        writeln!(code, "    groups: &[],")?;
        return Ok(());
    }
    writeln!(code, "    groups: &[")?;
    for ident in idents {
        writeln!(code, "        &{ident},")?;
    }
    writeln!(code, "    ],")?;
    Ok(())
}

/// Returns `base`, or `base_2`, `base_3`, ... if already taken, and records it.
fn unique_ident(taken: &mut HashSet<String>, base: String) -> String {
    let mut ident = base.clone();
    let mut n = 2;
    while taken.contains(&ident) {
        ident = format!("{base}_{n}");
        n += 1;
    }
    taken.insert(ident.clone());
    ident
}

/// Converts a string to SCREAMING_SNAKE_CASE, replacing characters that
/// cannot appear in an identifier with `_`.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_uppercase() && prev_lower {
            result.push('_');
        }
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixspec_dictionary::CompilerConfig;

    const DICT: &str = r#"<fix major="4" minor="4">
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
      <group name="NoPartyIDs" required="N">
        <field name="PartyID" required="Y"/>
        <group name="NoPartySubIDs" required="N">
          <field name="PartySubID" required="Y"/>
        </group>
      </group>
      <field name="EncodedTextLen" required="N"/>
      <field name="EncodedText" required="N"/>
    </message>
    <message name="Heartbeat" msgtype="0" msgcat="admin"/>
  </messages>
  <fields>
    <field number="35" name="MsgType" type="STRING"/>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="9" name="BodyLength" type="LENGTH"/>
    <field number="10" name="CheckSum" type="STRING"/>
    <field number="11" name="ClOrdID" type="STRING"/>
    <field number="448" name="PartyID" type="STRING"/>
    <field number="453" name="NoPartyIDs" type="NUMINGROUP"/>
    <field number="523" name="PartySubID" type="STRING"/>
    <field number="802" name="NoPartySubIDs" type="NUMINGROUP"/>
    <field number="354" name="EncodedTextLen" type="LENGTH"/>
    <field number="355" name="EncodedText" type="DATA"/>
  </fields>
</fix>"#;

    fn spec() -> Spec {
        Spec::compile_str(DICT, &CompilerConfig::default()).unwrap()
    }

    #[test]
    fn test_to_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("MsgType"), "MSG_TYPE");
        assert_eq!(to_screaming_snake_case("ClOrdID"), "CL_ORD_ID");
        assert_eq!(to_screaming_snake_case("BeginString"), "BEGIN_STRING");
        assert_eq!(to_screaming_snake_case("NoPartyIDs"), "NO_PARTY_IDS");
        assert_eq!(to_screaming_snake_case("Leg-Ref"), "LEG_REF");
    }

    #[test]
    fn test_unique_ident() {
        let mut taken = HashSet::new();
        assert_eq!(unique_ident(&mut taken, "A".to_string()), "A");
        assert_eq!(unique_ident(&mut taken, "A".to_string()), "A_2");
        assert_eq!(unique_ident(&mut taken, "A".to_string()), "A_3");
    }

    #[test]
    fn test_tag_rows() {
        let rows = tag_rows(&spec());
        let tags: Vec<_> = rows.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec![8, 9, 10, 11, 35, 354, 355, 448, 453, 523, 802]);

        let len = rows.iter().find(|r| r.tag == 354).unwrap();
        assert_eq!(len.wire_type, WireType::Length);
        assert_eq!(len.related, 355);
        assert_eq!(len.tag_len, 3);
        assert_eq!(len.prefix.as_str(), "354=");

        let begin = &rows[0];
        assert_eq!(begin.location, Location::Header);
        assert_eq!(begin.prefix.as_str(), "8=");
        assert_eq!(begin.tag_len, 1);
    }

    #[test]
    fn test_tag_row_max_tag() {
        let row = TagRow::new(u32::MAX, WireType::Int, Location::Body, 0);
        assert_eq!(row.tag_len, 10);
        assert_eq!(row.prefix.as_str(), "4294967295=");
    }

    #[test]
    fn test_emit_is_deterministic() {
        let emitter = TableEmitter::new();
        let first = emitter.emit(&spec()).unwrap();
        let second = emitter.emit(&spec()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_structure() {
        let code = TableEmitter::with_config(GeneratorConfig::new().with_source_name("FIX44.xml"))
            .emit(&spec())
            .unwrap();

        assert!(code.contains("//! Source: FIX44.xml"));
        assert!(code.contains(
            "use fixspec_core::table::{GroupSpec, Location, MsgSpec, TagSpec, VersionSpec, WireType};"
        ));
        assert!(code.contains("pub static FIX44: VersionSpec = VersionSpec {"));
        assert!(code.contains("    begin_string: \"FIX.4.4\","));
        assert!(code.contains("pub static FIX44_TAGS: [TagSpec; 12] = ["));
        assert!(code.contains(
            "TagSpec { tag: 9, wire_type: WireType::Length, location: Location::Header, related: 0, tag_len: 1, prefix: \"9=\" },"
        ));
        assert!(code.contains("    TagSpec::SENTINEL,\n];"));

        let heartbeat = code.find("static FIX44_HEARTBEAT: MsgSpec").unwrap();
        let order = code.find("static FIX44_NEW_ORDER_SINGLE: MsgSpec").unwrap();
        assert!(heartbeat < order);
        assert!(code.contains("    tid: 48,"));
        assert!(code.contains("    tid: 68,"));
        assert!(code.contains("    msg_type: \"D\","));

        assert!(code.contains("static FIX44_NEW_ORDER_SINGLE_NO_PARTY_IDS: GroupSpec"));
        assert!(code.contains(
            "static FIX44_NEW_ORDER_SINGLE_NO_PARTY_IDS_NO_PARTY_SUB_IDS: GroupSpec"
        ));
        assert!(code.contains("        &FIX44_NEW_ORDER_SINGLE_NO_PARTY_IDS,"));
        assert!(code.contains("    delimiter_tag: 448,"));
    }

    #[test]
    fn test_message_list_sorted_in_version() {
        let code = TableEmitter::new().emit(&spec()).unwrap();
        let version_block = &code[code.find("VersionSpec {").unwrap()..];
        let hb = version_block.find("&FIX44_HEARTBEAT,").unwrap();
        let nos = version_block.find("&FIX44_NEW_ORDER_SINGLE,").unwrap();
        assert!(hb < nos);
    }

    #[test]
    fn test_emit_without_groups() {
        let code = TableEmitter::with_config(
            GeneratorConfig::new()
                .with_emit_groups(false)
                .with_visibility("pub(crate)"),
        )
        .emit(&spec())
        .unwrap();
        assert!(!code.contains("GroupSpec"));
        assert!(code.contains("pub(crate) static FIX44_TAGS"));
        assert!(code.contains("    groups: &[],"));
    }

    #[test]
    fn test_sequence_values_emitted() {
        let spec = spec();
        let code = TableEmitter::new().emit(&spec).unwrap();
        let hb = spec.layout("0").unwrap();
        assert_eq!(hb.tag_sequence.bound(), 803);

        let start = code.find("static FIX44_HEARTBEAT: MsgSpec").unwrap();
        let block = &code[start..];
        let seq_start = block.find("tag_seq: &[").unwrap();
        let seq_end = block[seq_start..].find("],").unwrap();
        let values: Vec<u16> = block[seq_start + "tag_seq: &[".len()..seq_start + seq_end]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 803);
        assert_eq!(values[8], 1);
        assert_eq!(values[9], 2);
        assert_eq!(values[35], 3);
        assert_eq!(values[10], 4);
        assert_eq!(values.iter().filter(|&&v| v != 0).count(), 4);
    }
}
