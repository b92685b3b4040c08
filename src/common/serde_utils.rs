// src/common/serde_utils.rs

use serde::{Deserialize, Deserializer};

// Distingue "campo ausente" de "campo = null" nos PATCHs:
//   ausente -> None            (não mexe na coluna)
//   null    -> Some(None)      (limpa a coluna)
//   valor   -> Some(Some(v))
// Usar sempre junto com `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
