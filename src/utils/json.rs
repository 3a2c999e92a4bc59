use serde::de::DeserializeOwned;
use serde_json::Value;

/// One field of a sparse update body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Omitted,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Patch::Omitted)
    }

    /// Downgrades `Set` values the legacy update rule ignores (empty strings,
    /// empty lists) to `Omitted`.
    pub fn ignore_if(self, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Patch::Set(value) if is_empty(&value) => Patch::Omitted,
            other => other,
        }
    }

    /// Writes the patch into `slot`; `Clear` resets it to its default.
    pub fn apply_to(self, slot: &mut T)
    where
        T: Default,
    {
        match self {
            Patch::Omitted => {}
            Patch::Clear => *slot = T::default(),
            Patch::Set(value) => *slot = value,
        }
    }
}

pub fn classify_patch<T: DeserializeOwned>(
    field: &str,
    optional_value: Option<&Value>,
) -> Result<Patch<T>, String> {
    match optional_value {
        None => Ok(Patch::Omitted),
        Some(Value::Null) => Ok(Patch::Clear),
        Some(other) => serde_json::from_value(other.clone())
            .map(Patch::Set)
            .map_err(|err| format!("invalid value for {field}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distinguishes_omitted_null_and_value() {
        let body = json!({ "role": "Engineer", "link": null });
        let role: Patch<String> = classify_patch("role", body.get("role")).unwrap();
        let link: Patch<String> = classify_patch("link", body.get("link")).unwrap();
        let company: Patch<String> = classify_patch("company", body.get("company")).unwrap();
        assert_eq!(role, Patch::Set("Engineer".to_string()));
        assert_eq!(link, Patch::Clear);
        assert!(company.is_omitted());
    }

    #[test]
    fn rejects_wrong_types() {
        let body = json!({ "requirements": "rust" });
        let err = classify_patch::<Vec<String>>("requirements", body.get("requirements"))
            .unwrap_err();
        assert!(err.contains("requirements"));
    }

    #[test]
    fn empty_values_become_omitted() {
        let patch = Patch::Set(String::new()).ignore_if(|s| s.is_empty());
        assert!(patch.is_omitted());
        let mut slot = "kept".to_string();
        patch.apply_to(&mut slot);
        assert_eq!(slot, "kept");
    }

    #[test]
    fn clear_resets_to_default() {
        let mut slot = vec!["a".to_string()];
        Patch::<Vec<String>>::Clear.apply_to(&mut slot);
        assert!(slot.is_empty());
    }
}
