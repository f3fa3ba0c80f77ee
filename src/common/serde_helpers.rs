use serde::{Deserialize, Deserializer};

/// Trata `?campo=` como ausente em vez de erro de parse.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Para atualizações parciais: campo ausente => `None`, `null` => `Some(None)`.
/// Deve ser usado junto com `#[serde(default)]`.
pub fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Aplica um patch `Option<Option<T>>` sobre o valor atual.
pub fn apply_patch<T>(current: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *current = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct Filtro {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        status: Option<Uuid>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        obs: Option<Option<String>>,
    }

    #[test]
    fn empty_filter_is_none() {
        let f: Filtro = serde_json::from_str(r#"{"status": ""}"#).unwrap();
        assert!(f.status.is_none());

        let id = Uuid::new_v4();
        let f: Filtro = serde_json::from_value(serde_json::json!({ "status": id.to_string() })).unwrap();
        assert_eq!(f.status, Some(id));

        assert!(serde_json::from_str::<Filtro>(r#"{"status": "abc"}"#).is_err());
    }

    #[test]
    fn double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.obs, None);

        let null: Patch = serde_json::from_str(r#"{"obs": null}"#).unwrap();
        assert_eq!(null.obs, Some(None));

        let value: Patch = serde_json::from_str(r#"{"obs": "x"}"#).unwrap();
        assert_eq!(value.obs, Some(Some("x".to_string())));
    }

    #[test]
    fn apply_patch_keeps_or_replaces() {
        let mut current = Some("antigo".to_string());
        apply_patch(&mut current, None);
        assert_eq!(current.as_deref(), Some("antigo"));

        apply_patch(&mut current, Some(None));
        assert_eq!(current, None);

        apply_patch(&mut current, Some(Some("novo".to_string())));
        assert_eq!(current.as_deref(), Some("novo"));
    }
}
