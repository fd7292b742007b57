//! Value syntax of a schema node: basetype, constraints and labels.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SMI basetype of a node's syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BaseType {
    Integer32,
    Integer64,
    Unsigned32,
    Unsigned64,
    OctetString,
    ObjectIdentifier,
    Enum,
    Bits,
}

/// Typed-value variant selected by a syntax.
///
/// Most kinds follow the basetype directly; `TimeTicks`, `IpAddress` and
/// `TruthValue` are recognised by type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer32,
    Integer64,
    Unsigned32,
    Unsigned64,
    OctetString,
    IpAddress,
    ObjectIdentifier,
    Enum,
    Boolean,
    Bits,
    TimeInterval,
}

impl ValueKind {
    /// Lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer32 => "integer32",
            Self::Integer64 => "integer64",
            Self::Unsigned32 => "unsigned32",
            Self::Unsigned64 => "unsigned64",
            Self::OctetString => "octet string",
            Self::IpAddress => "IP address",
            Self::ObjectIdentifier => "object identifier",
            Self::Enum => "enumeration",
            Self::Boolean => "truth value",
            Self::Bits => "bits",
            Self::TimeInterval => "time ticks",
        }
    }

    /// Whether the kind is one of the four plain integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Integer32 | Self::Integer64 | Self::Unsigned32 | Self::Unsigned64
        )
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive numeric range. For octet strings it bounds the length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    pub min: i128,
    pub max: i128,
}

impl Range {
    pub fn new(min: i128, max: i128) -> Self {
        Self { min, max }
    }

    /// Range holding exactly one value.
    pub fn single(value: i128) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One label of an enumeration or bit table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedNumber {
    pub label: String,
    pub number: i64,
}

/// Bidirectional label/number table for enumerations and bits.
///
/// Numbers are unique; a later entry with the same number replaces the
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<NamedNumber>", into = "Vec<NamedNumber>"))]
pub struct NamedNumbers {
    entries: Vec<NamedNumber>,
}

impl NamedNumbers {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (label, number) in entries {
            table.insert(label, number);
        }
        table
    }

    fn insert(&mut self, label: impl Into<String>, number: i64) {
        let entry = NamedNumber {
            label: label.into(),
            number,
        };
        match self.entries.binary_search_by_key(&number, |e| e.number) {
            Ok(pos) => self.entries[pos] = entry,
            Err(pos) => self.entries.insert(pos, entry),
        }
    }

    /// Label for a number.
    pub fn label(&self, number: i64) -> Option<&str> {
        self.entries
            .binary_search_by_key(&number, |e| e.number)
            .ok()
            .map(|pos| self.entries[pos].label.as_str())
    }

    /// Number for a label.
    pub fn number(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.number)
    }

    pub fn contains_number(&self, number: i64) -> bool {
        self.label(number).is_some()
    }

    /// Entries in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedNumber> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<NamedNumber>> for NamedNumbers {
    fn from(entries: Vec<NamedNumber>) -> Self {
        Self::new(entries.into_iter().map(|e| (e.label, e.number)))
    }
}

impl From<NamedNumbers> for Vec<NamedNumber> {
    fn from(table: NamedNumbers) -> Self {
        table.entries
    }
}

/// Syntax of a scalar, column or named type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Syntax {
    /// Declared type name (`DisplayString`, `TimeTicks`, ...).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub type_name: Option<String>,
    /// Type the declared type was derived from.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub parent_type: Option<String>,
    pub base: BaseType,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub ranges: Vec<Range>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "NamedNumbers::is_empty"))]
    pub named_numbers: NamedNumbers,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub display_hint: Option<String>,
}

impl Syntax {
    pub fn new(base: BaseType) -> Self {
        Self {
            type_name: None,
            parent_type: None,
            base,
            ranges: Vec::new(),
            named_numbers: NamedNumbers::default(),
            display_hint: None,
        }
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    pub fn with_parent_type(mut self, name: impl Into<String>) -> Self {
        self.parent_type = Some(name.into());
        self
    }

    pub fn with_range(mut self, min: i128, max: i128) -> Self {
        self.ranges.push(Range::new(min, max));
        self
    }

    pub fn with_size(self, size: usize) -> Self {
        self.with_range(size as i128, size as i128)
    }

    pub fn with_named_numbers<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        self.named_numbers = NamedNumbers::new(entries);
        self
    }

    pub fn with_display_hint(mut self, hint: impl Into<String>) -> Self {
        self.display_hint = Some(hint.into());
        self
    }

    /// Whether the declared type or its parent is called `name`.
    pub fn is_type(&self, name: &str) -> bool {
        self.type_name.as_deref() == Some(name) || self.parent_type.as_deref() == Some(name)
    }

    /// Typed-value variant for this syntax.
    pub fn kind(&self) -> ValueKind {
        match self.base {
            BaseType::Integer32 => ValueKind::Integer32,
            BaseType::Integer64 => ValueKind::Integer64,
            BaseType::Unsigned32 if self.is_type("TimeTicks") => ValueKind::TimeInterval,
            BaseType::Unsigned32 => ValueKind::Unsigned32,
            BaseType::Unsigned64 => ValueKind::Unsigned64,
            BaseType::OctetString if self.is_type("IpAddress") => ValueKind::IpAddress,
            BaseType::OctetString => ValueKind::OctetString,
            BaseType::ObjectIdentifier => ValueKind::ObjectIdentifier,
            BaseType::Enum if self.is_type("TruthValue") => ValueKind::Boolean,
            BaseType::Enum => ValueKind::Enum,
            BaseType::Bits => ValueKind::Bits,
        }
    }

    /// Size of a fixed-length syntax: exactly one range with `min == max`.
    pub fn fixed_len(&self) -> Option<usize> {
        match self.ranges.as_slice() {
            [range] if range.min == range.max => usize::try_from(range.min).ok(),
            _ => None,
        }
    }

    /// Whether `value` satisfies the declared ranges (always true without ranges).
    pub fn in_range(&self, value: i128) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(value))
    }
}
