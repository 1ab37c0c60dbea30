//! Snapshot — the normalized set of entities a migration runs on.
//!
//! Accepts the two shapes a states dump comes in:
//!
//! - a list of records `[{"entity_id": …, "state": …, "attributes": {…}}, …]`
//! - a mapping `{"light.kitchen": {"state": …, "attributes": {…}}, …}`
//!
//! Input order is preserved (document order for the mapping form).

use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};

use crate::entity::{AttributeValue, Entity};
use crate::error::MalformedInputError;
use crate::filter::EntityFilter;
use crate::id::EntityId;

/// Ordered, id-indexed collection of entities.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    excluded: BTreeSet<EntityId>,
}

impl Snapshot {
    /// Normalize a decoded states payload.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] when the payload is not a list or
    /// mapping of entity-shaped objects, an id is missing or malformed, or an
    /// id appears twice.
    pub fn from_json(value: &Value) -> Result<Self, MalformedInputError> {
        let entities = match value {
            Value::Array(records) => records
                .iter()
                .enumerate()
                .map(|(idx, record)| {
                    let locator = format!("#{idx}");
                    let object = record
                        .as_object()
                        .ok_or_else(|| MalformedInputError::NotAnObject {
                            record: locator.clone(),
                        })?;
                    let entity_id = object
                        .get("entity_id")
                        .and_then(Value::as_str)
                        .ok_or(MalformedInputError::MissingEntityId { record: locator })?;
                    parse_record(entity_id, object)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(records) => records
                .iter()
                .map(|(entity_id, record)| {
                    let object =
                        record
                            .as_object()
                            .ok_or_else(|| MalformedInputError::NotAnObject {
                                record: entity_id.clone(),
                            })?;
                    parse_record(entity_id, object)
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(MalformedInputError::NotACollection {
                    found: json_type(other),
                });
            }
        };
        Self::from_entities(entities)
    }

    /// Build a snapshot from already-constructed entities.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError::DuplicateEntityId`] if two entities share an id.
    pub fn from_entities(
        entities: impl IntoIterator<Item = Entity>,
    ) -> Result<Self, MalformedInputError> {
        let mut snapshot = Self::default();
        for entity in entities {
            if snapshot.index.contains_key(entity.id()) {
                return Err(MalformedInputError::DuplicateEntityId {
                    id: entity.id().to_string(),
                });
            }
            snapshot
                .index
                .insert(entity.id().clone(), snapshot.entities.len());
            snapshot.entities.push(entity);
        }
        Ok(snapshot)
    }

    /// Drop every entity the filter excludes, remembering their ids.
    #[must_use]
    pub fn filtered(self, filter: &EntityFilter) -> Self {
        let mut excluded = self.excluded;
        let mut kept = Vec::with_capacity(self.entities.len());
        for entity in self.entities {
            if filter.excludes(&entity) {
                excluded.insert(entity.id().clone());
            } else {
                kept.push(entity);
            }
        }
        let index = kept
            .iter()
            .enumerate()
            .map(|(idx, entity)| (entity.id().clone(), idx))
            .collect();
        Self {
            entities: kept,
            index,
            excluded,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&idx| &self.entities[idx])
    }

    /// Whether `id` was removed by a filter.
    #[must_use]
    pub fn is_excluded(&self, id: &str) -> bool {
        self.excluded.contains(id)
    }

    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Entities in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn parse_record(entity_id: &str, record: &Map<String, Value>) -> Result<Entity, MalformedInputError> {
    let mut builder = Entity::builder().entity_id(entity_id);
    match record.get("state") {
        None | Some(Value::Null) => {}
        Some(Value::String(state)) => builder = builder.state(state.as_str()),
        Some(other) => builder = builder.state(other.to_string()),
    }
    if let Some(Value::Object(attributes)) = record.get("attributes") {
        builder = builder.attributes(
            attributes
                .iter()
                .map(|(key, value)| (key.clone(), AttributeValue::from(value.clone())))
                .collect(),
        );
    }
    builder.build()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UNKNOWN_STATE;
    use serde_json::json;

    #[test]
    fn should_parse_list_form_in_input_order() {
        let snapshot = Snapshot::from_json(&json!([
            {"entity_id": "switch.b", "state": "off", "attributes": {}},
            {"entity_id": "light.a", "state": "on", "attributes": {"friendly_name": "Lamp"}},
        ]))
        .unwrap();

        let ids: Vec<_> = snapshot.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["switch.b", "light.a"]);
        assert_eq!(snapshot.get("light.a").unwrap().display_name(), "Lamp");
    }

    #[test]
    fn should_parse_mapping_form_in_document_order() {
        let snapshot = Snapshot::from_json(&json!({
            "sensor.z": {"state": "21.5", "attributes": {"unit_of_measurement": "°C"}},
            "light.a": {"state": "on"},
        }))
        .unwrap();

        let ids: Vec<_> = snapshot.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["sensor.z", "light.a"]);
        assert_eq!(snapshot.get("sensor.z").unwrap().state(), "21.5");
    }

    #[test]
    fn should_tolerate_missing_attributes_and_state() {
        let snapshot = Snapshot::from_json(&json!([{"entity_id": "sun.sun"}])).unwrap();
        let entity = snapshot.get("sun.sun").unwrap();
        assert!(entity.attributes().is_empty());
        assert_eq!(entity.state(), UNKNOWN_STATE);
        assert_eq!(entity.display_name(), "Sun");
    }

    #[test]
    fn should_render_non_string_state_as_text() {
        let snapshot =
            Snapshot::from_json(&json!([{"entity_id": "sensor.count", "state": 3}])).unwrap();
        assert_eq!(snapshot.get("sensor.count").unwrap().state(), "3");
    }

    #[test]
    fn should_keep_non_string_attribute_values() {
        let snapshot = Snapshot::from_json(&json!([{
            "entity_id": "climate.hall",
            "state": "heat",
            "attributes": {"temperature": 20, "presets": ["eco", "comfort"], "away": false}
        }]))
        .unwrap();
        let entity = snapshot.get("climate.hall").unwrap();
        assert_eq!(entity.attribute("temperature"), Some(&AttributeValue::Int(20)));
        assert_eq!(entity.attribute("away"), Some(&AttributeValue::Bool(false)));
    }

    #[test]
    fn should_reject_scalar_top_level() {
        let result = Snapshot::from_json(&json!("states"));
        assert_eq!(
            result.unwrap_err(),
            MalformedInputError::NotACollection { found: "string" }
        );
    }

    #[test]
    fn should_reject_non_object_record() {
        let result = Snapshot::from_json(&json!([{"entity_id": "light.a"}, 42]));
        assert_eq!(
            result.unwrap_err(),
            MalformedInputError::NotAnObject {
                record: "#1".to_string()
            }
        );
    }

    #[test]
    fn should_reject_record_without_entity_id() {
        let result = Snapshot::from_json(&json!([{"state": "on"}]));
        assert_eq!(
            result.unwrap_err(),
            MalformedInputError::MissingEntityId {
                record: "#0".to_string()
            }
        );
    }

    #[test]
    fn should_reject_id_without_separator() {
        let result = Snapshot::from_json(&json!({"kitchen": {"state": "on"}}));
        assert_eq!(
            result.unwrap_err(),
            MalformedInputError::InvalidEntityId {
                id: "kitchen".to_string()
            }
        );
    }

    #[test]
    fn should_reject_duplicate_ids() {
        let result = Snapshot::from_json(&json!([
            {"entity_id": "light.a", "state": "on"},
            {"entity_id": "light.a", "state": "off"},
        ]));
        assert!(matches!(
            result,
            Err(MalformedInputError::DuplicateEntityId { id }) if id == "light.a"
        ));
    }

    #[test]
    fn should_drop_filtered_entities_and_remember_them() {
        let snapshot = Snapshot::from_json(&json!([
            {"entity_id": "light.a", "state": "on"},
            {"entity_id": "group.all_lights", "state": "on", "attributes": {"hidden": true}},
            {"entity_id": "automation.wake", "state": "on"},
        ]))
        .unwrap()
        .filtered(&EntityFilter::default().exclude_domain("automation"));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("light.a").is_some());
        assert!(snapshot.get("group.all_lights").is_none());
        assert!(snapshot.is_excluded("group.all_lights"));
        assert!(snapshot.is_excluded("automation.wake"));
        assert!(!snapshot.is_excluded("light.a"));
        assert_eq!(snapshot.excluded_count(), 2);
    }
}
