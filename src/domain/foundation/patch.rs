//! Serde helpers for partial updates.

use serde::{Deserialize, Deserializer};

/// Deserializes a present field into `Some(value)`, keeping `null` as
/// `Some(None)`.
///
/// Combine with `#[serde(default)]` so an absent field stays `None`:
///
/// ```ignore
/// #[serde(default, deserialize_with = "present")]
/// pub email: Option<Option<String>>,
/// ```
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
