use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidateLength;

/// Represents optional field semantics in PATCH/UPDATE requests.
///
/// - `Unchanged` → field absent from the payload
/// - `SetToNull` → explicitly `null`
/// - `SetToValue` → set to provided value
///
/// Use with `#[serde(default)]` on the containing struct so that absent keys
/// deserialize to `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionField::SetToValue(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

// ---------------------- Validation support ----------------------

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }
    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

// ---------------------- Core helpers ----------------------

impl<T> OptionField<T> {
    /// True when `Unchanged`.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// If `SetToValue`, returns a reference to inner value.
    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Applies the patch to a required field: `SetToNull` keeps the current value.
    pub fn apply_required(self, current: T) -> T {
        match self {
            Self::SetToValue(v) => v,
            _ => current,
        }
    }

    /// Applies the patch to a nullable field.
    pub fn apply_nullable(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v),
        }
    }
}

impl OptionField<String> {
    /// Trims a `SetToValue` payload in place, before validation runs.
    pub fn trim_in_place(&mut self) {
        if let Self::SetToValue(text) = self {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
        }
    }
}

pub type PatchString = OptionField<String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        title: OptionField<String>,
        repo_link: OptionField<String>,
        is_featured: OptionField<bool>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let patch: Patch = serde_json::from_str(r#"{"repo_link": null, "is_featured": true}"#).unwrap();
        assert!(patch.title.is_unchanged());
        assert_eq!(patch.repo_link, OptionField::SetToNull);
        assert_eq!(patch.is_featured, OptionField::SetToValue(true));
    }

    #[test]
    fn applies_to_nullable_and_required_fields() {
        let current = Some("https://old.dev".to_string());
        assert_eq!(OptionField::<String>::Unchanged.apply_nullable(current.clone()), current);
        assert_eq!(OptionField::<String>::SetToNull.apply_nullable(current.clone()), None);
        assert_eq!(OptionField::SetToNull.apply_required("kept".to_string()), "kept");
        assert_eq!(OptionField::SetToValue("new".to_string()).apply_required("old".into()), "new");
    }

    #[test]
    fn trim_in_place_only_touches_values() {
        let mut field: PatchString = OptionField::SetToValue("  padded \n".into());
        field.trim_in_place();
        assert_eq!(field, OptionField::SetToValue("padded".into()));

        let mut null: PatchString = OptionField::SetToNull;
        null.trim_in_place();
        assert_eq!(null, OptionField::SetToNull);
    }

    #[test]
    fn length_validation_skips_untouched_fields() {
        let field: PatchString = OptionField::Unchanged;
        assert!(field.validate_length(Some(1), Some(3), None));
        let field: PatchString = OptionField::SetToValue("toolong".into());
        assert!(!field.validate_length(Some(1), Some(3), None));
    }
}
