use byte_unit::{Byte, UnitType};
use confparse_core::convert;
use confparse_core::{ConfigTableItem, ConfigTarget};
use serde::Serialize;
use std::fmt;

/// Value storage for one `--bind` argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Int(i32),
    Bool(bool),
    String(Option<String>),
    Bytes(u64),
    Percent(u64),
    Strv(Vec<String>),
    Float(f32),
}

impl BoundValue {
    pub const TYPES: &'static str = "int|bool|string|bytes|percent|strv|float";

    /// Zero value for a type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        let value = match name {
            "int" => BoundValue::Int(0),
            "bool" => BoundValue::Bool(false),
            "string" => BoundValue::String(None),
            "bytes" => BoundValue::Bytes(0),
            "percent" => BoundValue::Percent(0),
            "strv" => BoundValue::Strv(Vec::new()),
            "float" => BoundValue::Float(0.0),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Int(v) => write!(f, "{}", v),
            BoundValue::Bool(v) => write!(f, "{}", v),
            BoundValue::String(Some(v)) => write!(f, "\"{}\"", v),
            BoundValue::String(None) => write!(f, "(unset)"),
            BoundValue::Bytes(v) => {
                let adjusted = Byte::from_u64(*v).get_appropriate_unit(UnitType::Binary);
                write!(f, "{} ({:.2})", v, adjusted)
            }
            BoundValue::Percent(v) => write!(f, "{}%", v),
            BoundValue::Strv(v) => write!(f, "[{}]", v.join(", ")),
            BoundValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// `[SECTION.]KEY=TYPE` from the command line, plus the value it collects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub section: Option<String>,
    pub key: String,
    pub value: BoundValue,
}

impl Binding {
    /// Borrow this binding as a parser table entry
    pub fn table_item(&mut self) -> ConfigTableItem<'_> {
        let Binding {
            section,
            key,
            value,
        } = self;
        let section = section.as_deref();
        let key = key.as_str();

        match value {
            BoundValue::Int(v) => {
                ConfigTableItem::new(section, key, convert::parse_int, ConfigTarget::Int(v))
            }
            BoundValue::Bool(v) => {
                ConfigTableItem::new(section, key, convert::parse_bool, ConfigTarget::Bool(v))
            }
            BoundValue::String(v) => {
                ConfigTableItem::new(section, key, convert::parse_string, ConfigTarget::String(v))
            }
            BoundValue::Bytes(v) => {
                ConfigTableItem::new(section, key, convert::parse_bytes, ConfigTarget::Size(v))
            }
            BoundValue::Percent(v) => {
                ConfigTableItem::new(section, key, convert::parse_percent, ConfigTarget::Size(v))
            }
            BoundValue::Strv(v) => {
                ConfigTableItem::new(section, key, convert::parse_strv, ConfigTarget::Strv(v))
            }
            BoundValue::Float(v) => {
                ConfigTableItem::new(section, key, convert::parse_float, ConfigTarget::Float(v))
            }
        }
    }

    pub fn label(&self) -> String {
        match &self.section {
            Some(section) => format!("[{}] {}", section, self.key),
            None => format!("[*] {}", self.key),
        }
    }
}

/// Parse `[SECTION.]KEY=TYPE`
///
/// The section is everything before the last `.`; without one the key is
/// matched in every section.
pub fn parse_binding(s: &str) -> Result<Binding, String> {
    let (name, type_name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected [SECTION.]KEY=TYPE, got '{}'", s))?;

    let value = BoundValue::from_type_name(type_name.trim()).ok_or_else(|| {
        format!(
            "unknown type '{}', expected one of {}",
            type_name,
            BoundValue::TYPES
        )
    })?;

    let (section, key) = match name.rsplit_once('.') {
        Some((section, key)) => (Some(section.to_string()), key),
        None => (None, name),
    };

    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }

    Ok(Binding {
        section,
        key: key.to_string(),
        value,
    })
}
