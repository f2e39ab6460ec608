//! Entity analysis decoding.

use crate::error::{Error, Result};
use crate::model::Entity;
use serde::Deserialize;

/// Wire form of an entity analysis result.
#[derive(Debug, Deserialize)]
struct EntityResult {
    entities: Vec<Entity>,
}

/// Decode an entity analysis result into sensitive text spans.
///
/// Blank-text entities are skipped with a warning; they would otherwise
/// containment-match every region on every page. Malformed JSON rejects
/// the whole document with [`Error::MalformedEntities`].
pub fn parse_entities(data: &[u8]) -> Result<Vec<Entity>> {
    let result: EntityResult =
        serde_json::from_slice(data).map_err(|e| Error::MalformedEntities(e.to_string()))?;

    let mut entities = Vec::new();
    for entity in result.entities {
        if entity.text.trim().is_empty() {
            log::warn!(
                "Skipping entity with blank text (category: {:?})",
                entity.category
            );
            continue;
        }
        entities.push(entity);
    }

    log::debug!("Parsed {} entities from entity analysis", entities.len());
    Ok(entities)
}
