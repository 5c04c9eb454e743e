use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "single" | "s" => Ok(BondOrder::Single),
            "2" | "double" | "d" => Ok(BondOrder::Double),
            "3" | "triple" | "t" => Ok(BondOrder::Triple),
            "4" | "ar" | "aromatic" | "a" => Ok(BondOrder::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

/// A scalar metadata value attached to a [`Molecule`](super::molecule::Molecule).
///
/// The variants mirror the value kinds structure toolkits store on records:
/// integers, booleans, floating point numbers and free text.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Bool(bool),
    Double(f64),
    Str(String),
}

impl PropertyValue {
    /// Infers the most specific value kind for a textual data item.
    ///
    /// Integers are tried first, then floats, then the literals `true` and
    /// `false`; anything else stays text.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return PropertyValue::Int(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return PropertyValue::Double(v);
            }
        }
        match trimmed {
            "true" => PropertyValue::Bool(true),
            "false" => PropertyValue::Bool(false),
            _ => PropertyValue::Str(text.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "integer",
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Double(_) => "float",
            PropertyValue::Str(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            // Always carries a fractional part or exponent.
            PropertyValue::Double(v) => write!(f, "{v:?}"),
            PropertyValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Double(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_parses_codes_and_names() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("Double".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!(" t ".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("ar".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert!("5".parse::<BondOrder>().is_err());
    }

    #[test]
    fn infer_prefers_integers_then_floats() {
        assert_eq!(PropertyValue::infer("42"), PropertyValue::Int(42));
        assert_eq!(PropertyValue::infer(" -7 "), PropertyValue::Int(-7));
        assert_eq!(PropertyValue::infer("1.5"), PropertyValue::Double(1.5));
        assert_eq!(PropertyValue::infer("true"), PropertyValue::Bool(true));
        assert_eq!(
            PropertyValue::infer("c1ccccc1"),
            PropertyValue::Str("c1ccccc1".to_string())
        );
    }

    #[test]
    fn infer_keeps_non_finite_floats_as_text() {
        assert_eq!(
            PropertyValue::infer("NaN"),
            PropertyValue::Str("NaN".to_string())
        );
        assert_eq!(
            PropertyValue::infer("inf"),
            PropertyValue::Str("inf".to_string())
        );
    }

    #[test]
    fn display_renders_raw_value() {
        assert_eq!(PropertyValue::from(3).to_string(), "3");
        assert_eq!(PropertyValue::from(false).to_string(), "false");
        assert_eq!(PropertyValue::from("CCO").to_string(), "CCO");
        assert_eq!(PropertyValue::from(6.0).to_string(), "6.0");
        assert_eq!(PropertyValue::from(2.25).kind(), "float");
    }
}
