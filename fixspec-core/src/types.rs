/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Primitive enumerations shared by the compiler and the generated tables.
//!
//! - [`FieldType`]: the type a dictionary declares for a field
//! - [`WireType`]: the compact wire-type set the runtime encoder understands
//! - [`Location`]: the message section a field may appear in
//! - [`MemberKind`]: the three kinds of structural member

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// FIX field data type as declared in a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Integer value.
    Int,
    /// Length field (for data fields).
    Length,
    /// Sequence number.
    SeqNum,
    /// Number of entries in a repeating group.
    NumInGroup,
    /// Tag number reference.
    TagNum,
    /// Day of month (1-31).
    DayOfMonth,
    /// Floating point number.
    Float,
    /// Quantity.
    Qty,
    /// Price.
    Price,
    /// Price offset.
    PriceOffset,
    /// Amount (price * quantity).
    Amt,
    /// Percentage.
    Percentage,
    /// Single character.
    Char,
    /// Boolean (Y/N).
    Boolean,
    /// String.
    String,
    /// Space separated strings (FIX 4.2 - 4.4 spelling).
    MultipleValueString,
    /// Multiple character value (space-separated).
    MultipleCharValue,
    /// Multiple string value (space-separated).
    MultipleStringValue,
    /// Country code (ISO 3166).
    Country,
    /// Currency code (ISO 4217).
    Currency,
    /// Exchange code (ISO 10383 MIC).
    Exchange,
    /// Month-year (YYYYMM or YYYYMMDD or YYYYMMWW).
    MonthYear,
    /// UTC timestamp.
    UtcTimestamp,
    /// UTC time only.
    UtcTimeOnly,
    /// UTC date only.
    UtcDateOnly,
    /// UTC date (FIX 4.2 spelling of `UTCDATEONLY`).
    UtcDate,
    /// Local market date.
    LocalMktDate,
    /// Local market time.
    LocalMktTime,
    /// Timezone time only.
    TzTimeOnly,
    /// Timezone timestamp.
    TzTimestamp,
    /// FIX 4.0/4.1 timestamp.
    Time,
    /// FIX 4.0/4.1 date.
    Date,
    /// Raw data (binary).
    Data,
    /// XML data.
    XmlData,
    /// Language code (ISO 639-1).
    Language,
    /// Pattern (regex).
    Pattern,
    /// Tenor (e.g., "1M", "3M").
    Tenor,
    /// XML identifier.
    Xid,
    /// Reference to an XML identifier.
    XidRef,
    /// Reserved tag ranges.
    Reserved,
}

impl FieldType {
    /// Parses a dictionary type name.
    ///
    /// Matching is case-insensitive. Returns `None` for names outside the
    /// recognized set; callers turn that into a fatal error.
    ///
    /// # Arguments
    /// * `s` - The type name from the FIX dictionary
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "INT" => Self::Int,
            "LENGTH" => Self::Length,
            "SEQNUM" => Self::SeqNum,
            "NUMINGROUP" => Self::NumInGroup,
            "TAGNUM" => Self::TagNum,
            "DAYOFMONTH" => Self::DayOfMonth,
            "FLOAT" => Self::Float,
            "QTY" | "QUANTITY" => Self::Qty,
            "PRICE" => Self::Price,
            "PRICEOFFSET" => Self::PriceOffset,
            "AMT" | "AMOUNT" => Self::Amt,
            "PERCENTAGE" => Self::Percentage,
            "CHAR" => Self::Char,
            "BOOLEAN" => Self::Boolean,
            "STRING" => Self::String,
            "MULTIPLEVALUESTRING" => Self::MultipleValueString,
            "MULTIPLECHARVALUE" => Self::MultipleCharValue,
            "MULTIPLESTRINGVALUE" => Self::MultipleStringValue,
            "COUNTRY" => Self::Country,
            "CURRENCY" => Self::Currency,
            "EXCHANGE" => Self::Exchange,
            "MONTHYEAR" => Self::MonthYear,
            "UTCTIMESTAMP" => Self::UtcTimestamp,
            "UTCTIMEONLY" => Self::UtcTimeOnly,
            "UTCDATEONLY" => Self::UtcDateOnly,
            "UTCDATE" => Self::UtcDate,
            "LOCALMKTDATE" => Self::LocalMktDate,
            "LOCALMKTTIME" => Self::LocalMktTime,
            "TZTIMEONLY" => Self::TzTimeOnly,
            "TZTIMESTAMP" => Self::TzTimestamp,
            "TIME" => Self::Time,
            "DATE" => Self::Date,
            "DATA" => Self::Data,
            "XMLDATA" => Self::XmlData,
            "LANGUAGE" => Self::Language,
            "PATTERN" => Self::Pattern,
            "TENOR" => Self::Tenor,
            "XID" => Self::Xid,
            "XIDREF" => Self::XidRef,
            "RESERVED100PLUS" | "RESERVED1000PLUS" | "RESERVED4000PLUS" => Self::Reserved,
            _ => return None,
        })
    }

    /// Maps this dictionary type onto the runtime wire-type set.
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        match self {
            Self::Int | Self::TagNum | Self::DayOfMonth => WireType::Int,
            Self::Length => WireType::Length,
            Self::SeqNum => WireType::SeqNum,
            Self::NumInGroup => WireType::NumInGroup,
            Self::Float
            | Self::Qty
            | Self::Price
            | Self::PriceOffset
            | Self::Amt
            | Self::Percentage => WireType::Float,
            Self::Char => WireType::Char,
            Self::Boolean => WireType::Bool,
            Self::String
            | Self::Language
            | Self::Pattern
            | Self::Tenor
            | Self::Xid
            | Self::XidRef
            | Self::Reserved => WireType::String,
            Self::MultipleValueString | Self::MultipleCharValue | Self::MultipleStringValue => {
                WireType::MultiValue
            }
            Self::Country => WireType::Country,
            Self::Currency => WireType::Currency,
            Self::Exchange => WireType::Exchange,
            Self::MonthYear => WireType::MonthYear,
            Self::UtcTimestamp | Self::TzTimestamp | Self::Time => WireType::Timestamp,
            Self::UtcTimeOnly | Self::TzTimeOnly | Self::LocalMktTime => WireType::TimeOnly,
            Self::UtcDateOnly | Self::UtcDate | Self::LocalMktDate | Self::Date => WireType::Date,
            Self::Data | Self::XmlData => WireType::Data,
        }
    }

    /// Returns true if this is a `LENGTH` field that may pair with a data field.
    #[must_use]
    pub const fn is_length(&self) -> bool {
        matches!(self, Self::Length)
    }
}

/// Wire-level value type understood by the runtime encoder/decoder.
///
/// The discriminants are stable identifiers written into generated tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum WireType {
    /// Free text.
    String = 1,
    /// Signed integer.
    Int = 2,
    /// Decimal number.
    Float = 3,
    /// `Y` / `N`.
    Bool = 4,
    /// Single character.
    Char = 5,
    /// Date and time of day.
    Timestamp = 6,
    /// Date only.
    Date = 7,
    /// Time of day only.
    TimeOnly = 8,
    /// Length-prefixed raw bytes.
    Data = 9,
    /// Byte count of a paired data field.
    Length = 10,
    /// Message sequence number.
    SeqNum = 11,
    /// Repeating group entry count.
    NumInGroup = 12,
    /// ISO 3166 country code.
    Country = 13,
    /// ISO 4217 currency code.
    Currency = 14,
    /// ISO 10383 market identifier.
    Exchange = 15,
    /// Space separated values.
    MultiValue = 16,
    /// Month and year.
    MonthYear = 17,
}

impl WireType {
    /// Returns the variant name as spelled in generated source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::Timestamp => "Timestamp",
            Self::Date => "Date",
            Self::TimeOnly => "TimeOnly",
            Self::Data => "Data",
            Self::Length => "Length",
            Self::SeqNum => "SeqNum",
            Self::NumInGroup => "NumInGroup",
            Self::Country => "Country",
            Self::Currency => "Currency",
            Self::Exchange => "Exchange",
            Self::MultiValue => "MultiValue",
            Self::MonthYear => "MonthYear",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section of a message in which a field may appear.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum Location {
    /// Message body (the default until propagation says otherwise).
    #[default]
    Body = 0,
    /// Standard header.
    Header = 1,
    /// Standard trailer.
    Trailer = 2,
}

impl Location {
    /// Returns the variant name as spelled in generated source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::Header => "Header",
            Self::Trailer => "Trailer",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a structural member node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    /// Reference to a scalar field.
    Field,
    /// Repeating group, named after its NumInGroup count field.
    Group,
    /// Reference to a named component.
    Component,
}

impl MemberKind {
    /// Maps a document element name to a member kind.
    ///
    /// Returns `None` for elements that are not structural members.
    #[must_use]
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "field" => Some(Self::Field),
            "group" => Some(Self::Group),
            "component" => Some(Self::Component),
            _ => None,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("field"),
            Self::Group => f.write_str("group"),
            Self::Component => f.write_str("component"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{FromPrimitive, ToPrimitive};

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("INT"), Some(FieldType::Int));
        assert_eq!(FieldType::parse("string"), Some(FieldType::String));
        assert_eq!(
            FieldType::parse("UTCTIMESTAMP"),
            Some(FieldType::UtcTimestamp)
        );
        assert_eq!(
            FieldType::parse("RESERVED1000PLUS"),
            Some(FieldType::Reserved)
        );
        assert_eq!(FieldType::parse("FROBNICATE"), None);
        assert_eq!(FieldType::parse(""), None);
    }

    #[test]
    fn test_wire_type_mapping() {
        assert_eq!(FieldType::Price.wire_type(), WireType::Float);
        assert_eq!(FieldType::Length.wire_type(), WireType::Length);
        assert_eq!(FieldType::XmlData.wire_type(), WireType::Data);
        assert_eq!(FieldType::LocalMktDate.wire_type(), WireType::Date);
        assert_eq!(FieldType::Time.wire_type(), WireType::Timestamp);
        assert_eq!(
            FieldType::MultipleValueString.wire_type(),
            WireType::MultiValue
        );
    }

    #[test]
    fn test_wire_type_identifiers() {
        assert_eq!(WireType::Int.to_u8(), Some(2));
        assert_eq!(WireType::from_u8(12), Some(WireType::NumInGroup));
        assert_eq!(WireType::from_u8(0), None);
    }

    #[test]
    fn test_location_default_and_ids() {
        assert_eq!(Location::default(), Location::Body);
        assert_eq!(Location::Trailer.to_u8(), Some(2));
        assert_eq!(Location::from_u8(1), Some(Location::Header));
        assert_eq!(Location::Header.to_string(), "Header");
    }

    #[test]
    fn test_member_kind_from_element() {
        assert_eq!(MemberKind::from_element("field"), Some(MemberKind::Field));
        assert_eq!(MemberKind::from_element("group"), Some(MemberKind::Group));
        assert_eq!(
            MemberKind::from_element("component"),
            Some(MemberKind::Component)
        );
        assert_eq!(MemberKind::from_element("value"), None);
    }
}
