//! Catalog API types

use serde::{Deserialize, Deserializer, Serialize};

/// One municipality as listed by the catalog.
///
/// The IBGE API answers with numeric ids and Portuguese field names
/// (`{"id": 5300108, "nome": "Brasília", ...}`); both spellings and both id
/// shapes are accepted, extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "id", deserialize_with = "id_as_string")]
    pub external_id: String,
    #[serde(alias = "nome")]
    pub name: String,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
