use serde::{Deserialize, Deserializer};
use tracing::warn;

/// One inbound metric field, keeping "missing" apart from "zero".
///
/// `Absent` means the key never appeared in the payload, `Null` means it was
/// sent as JSON `null`.  `Defaulted` marks a documented constant substituted
/// during normalization so the display can tell it from a reported value.
///
/// Deserializes from an optional JSON value; use it under
/// `#[serde(default)]` so a missing key lands on [`Field::Absent`].  A value
/// of the wrong type is logged and becomes [`Field::Null`] instead of
/// failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
    Defaulted(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Field<T> {
    /// The carried value, whether reported or substituted.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) | Self::Defaulted(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }

    /// Substitute `fallback` when the field is absent or null.
    pub fn or_default_to(self, fallback: T) -> Self {
        match self {
            Self::Absent | Self::Null => Self::Defaulted(fallback),
            other => other,
        }
    }

    /// Take `other` when this field holds no reported value.
    ///
    /// If neither side has a value, `self` wins so `Null` vs `Absent` survives.
    pub fn or(self, other: Self) -> Self {
        match (&self, &other) {
            (Self::Value(_), _) => self,
            (_, Self::Value(_)) => other,
            _ => self,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(f(v)),
            Self::Defaulted(v) => Field::Defaulted(f(v)),
        }
    }
}

impl<T: Copy> Field<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
            return Ok(Self::Null);
        };
        match T::deserialize(value) {
            Ok(v) => Ok(Self::Value(v)),
            Err(e) => {
                warn!("Ignoring mistyped field value: {e}");
                Ok(Self::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Payload {
        a: Field<f64>,
        b: Field<f64>,
        c: Field<f64>,
    }

    #[test]
    fn missing_null_and_zero_stay_distinct() {
        let payload: Payload = serde_json::from_str(r#"{"b": null, "c": 0.0}"#).unwrap();
        assert_eq!(payload.a, Field::Absent);
        assert_eq!(payload.b, Field::Null);
        assert_eq!(payload.c, Field::Value(0.0));
    }

    #[test]
    fn mistyped_value_becomes_null() {
        let payload: Payload = serde_json::from_str(r#"{"a": "n/a", "b": [1], "c": 2}"#).unwrap();
        assert_eq!(payload.a, Field::Null);
        assert_eq!(payload.b, Field::Null);
        assert_eq!(payload.c, Field::Value(2.0));
    }

    #[test]
    fn default_only_replaces_missing_values() {
        assert_eq!(Field::Value(0.0).or_default_to(0.5), Field::Value(0.0));
        assert_eq!(Field::<f64>::Null.or_default_to(0.5), Field::Defaulted(0.5));
        assert_eq!(Field::<f64>::Absent.or_default_to(0.5), Field::Defaulted(0.5));
    }

    #[test]
    fn or_prefers_reported_values() {
        assert_eq!(Field::Value(1.0).or(Field::Value(2.0)), Field::Value(1.0));
        assert_eq!(Field::Null.or(Field::Value(2.0)), Field::Value(2.0));
        assert_eq!(Field::<f64>::Null.or(Field::Absent), Field::Null);
    }

    #[test]
    fn substituted_values_are_flagged() {
        assert!(Field::Defaulted(0.5).is_defaulted());
        assert!(!Field::Value(0.5).is_defaulted());
        assert_eq!(Field::Defaulted(0.5).get(), Some(0.5));
    }
}
