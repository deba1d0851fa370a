//! Field introspection maps returned by the header views.

use std::collections::BTreeMap;
use std::fmt;

/// The decoded value of a single header field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// A numeric field.
    Num(u64),
    /// A field rendered as text, such as an address.
    Text(String),
}

impl FieldValue {
    /// Return the numeric value, if this is a numeric field.
    pub fn as_num(&self) -> Option<u64> {
        match self {
            FieldValue::Num(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Return the text value, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Num(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Num(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! num_field_from {
    ($($t:ty),+) => {
        $(
            impl From<$t> for FieldValue {
                #[inline]
                fn from(value: $t) -> Self {
                    FieldValue::Num(value as u64)
                }
            }
        )+
    };
}

num_field_from!(u8, u16, u32, u64);

impl From<String> for FieldValue {
    #[inline]
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    #[inline]
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Field name to decoded value.
///
/// Keys are unique across the headers of a frame, so the maps of several
/// headers can be merged without collisions.
pub type FieldMap = BTreeMap<&'static str, FieldValue>;
