//! Group — an entity whose attributes list other entities as members.
//!
//! A group flagged with `view: true` becomes a dashboard view; every other
//! group becomes a card.

use crate::entity::{AttributeValue, Entity};
use crate::id::EntityId;

/// Membership and presentation data read from a `group.*` entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: EntityId,
    /// Friendly name or humanized object id.
    pub name: String,
    pub view: bool,
    pub icon: Option<String>,
    /// `control: hidden` disables the header toggle of the group's card.
    pub control_hidden: bool,
    /// Member references in declaration order; not yet resolved against the snapshot.
    pub members: Vec<String>,
    /// Member entries that are not strings, rendered for diagnostics.
    pub invalid_members: Vec<String>,
}

impl Group {
    /// Read group data from an entity, or `None` if it is not a group.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Option<Self> {
        if !entity.id().is_group() {
            return None;
        }

        let mut members = Vec::new();
        let mut invalid_members = Vec::new();
        match entity.attribute("entity_id") {
            Some(AttributeValue::List(values)) => {
                for value in values {
                    match value.as_str() {
                        Some(member) => members.push(member.trim().to_string()),
                        None => invalid_members.push(value.to_string()),
                    }
                }
            }
            Some(AttributeValue::String(member)) => members.push(member.trim().to_string()),
            Some(AttributeValue::Null) | None => {}
            Some(other) => invalid_members.push(other.to_string()),
        }

        Some(Self {
            id: entity.id().clone(),
            name: entity.display_name(),
            view: entity.attribute("view").and_then(AttributeValue::as_bool) == Some(true),
            icon: entity
                .attribute("icon")
                .and_then(AttributeValue::as_str)
                .map(str::to_string),
            control_hidden: entity.attribute("control").and_then(AttributeValue::as_str)
                == Some("hidden"),
            members,
            invalid_members,
        })
    }
}
