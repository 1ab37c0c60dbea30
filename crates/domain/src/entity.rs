//! Entity — one record of the states snapshot.
//!
//! An entity represents a single observable/controllable object (a light,
//! a sensor, a group of other entities, …) identified by `domain.object_id`.

mod attribute_value;

pub use attribute_value::AttributeValue;

use std::collections::BTreeMap;

use crate::error::MalformedInputError;
use crate::id::EntityId;
use crate::naming::humanize;

/// State reported when a record carries none.
pub const UNKNOWN_STATE: &str = "unknown";

/// A normalized state record. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    state: String,
    friendly_name: Option<String>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.id.domain()
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        self.id.object_id()
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The explicit `friendly_name` attribute, if any.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    /// Display name: the friendly name, or the humanized object id.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.friendly_name
            .clone()
            .unwrap_or_else(|| humanize(self.object_id()))
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Whether the `hidden` attribute is set to `true`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.attribute("hidden").and_then(AttributeValue::as_bool) == Some(true)
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<String>,
    state: Option<String>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: BTreeMap<String, AttributeValue>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Consume the builder, validate the id, and return an [`Entity`].
    ///
    /// A missing state becomes [`UNKNOWN_STATE`]; a string `friendly_name`
    /// attribute becomes the entity's friendly name.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError::InvalidEntityId`] if the id is missing
    /// or not of the form `domain.object_id`.
    pub fn build(self) -> Result<Entity, MalformedInputError> {
        let id = EntityId::parse(self.entity_id.unwrap_or_default())?;
        let friendly_name = self
            .attributes
            .get("friendly_name")
            .and_then(AttributeValue::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(Entity {
            id,
            state: self.state.unwrap_or_else(|| UNKNOWN_STATE.to_string()),
            friendly_name,
            attributes: self.attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_entity_with_friendly_name() {
        let entity = Entity::builder()
            .entity_id("light.kitchen")
            .state("on")
            .attribute("friendly_name", "Kitchen Ceiling")
            .build()
            .unwrap();
        assert_eq!(entity.domain(), "light");
        assert_eq!(entity.state(), "on");
        assert_eq!(entity.friendly_name(), Some("Kitchen Ceiling"));
        assert_eq!(entity.display_name(), "Kitchen Ceiling");
    }

    #[test]
    fn should_derive_display_name_from_object_id() {
        let entity = Entity::builder()
            .entity_id("switch.garden_pump")
            .build()
            .unwrap();
        assert_eq!(entity.friendly_name(), None);
        assert_eq!(entity.display_name(), "Garden Pump");
    }

    #[test]
    fn should_ignore_non_string_friendly_name() {
        let entity = Entity::builder()
            .entity_id("sensor.power")
            .attribute("friendly_name", true)
            .build()
            .unwrap();
        assert_eq!(entity.display_name(), "Power");
    }

    #[test]
    fn should_default_state_to_unknown() {
        let entity = Entity::builder().entity_id("sun.sun").build().unwrap();
        assert_eq!(entity.state(), UNKNOWN_STATE);
    }

    #[test]
    fn should_reject_missing_entity_id() {
        let result = Entity::builder().state("on").build();
        assert!(matches!(
            result,
            Err(MalformedInputError::InvalidEntityId { .. })
        ));
    }

    #[test]
    fn should_report_hidden_only_when_attribute_is_true() {
        let hidden = Entity::builder()
            .entity_id("group.all_lights")
            .attribute("hidden", true)
            .build()
            .unwrap();
        let visible = Entity::builder()
            .entity_id("group.kitchen")
            .attribute("hidden", "yes")
            .build()
            .unwrap();
        assert!(hidden.is_hidden());
        assert!(!visible.is_hidden());
    }
}
