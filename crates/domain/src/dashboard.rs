//! Dashboard tree — configuration → views → cards.
//!
//! Field declaration order is the serialized key order; every collection is a
//! `Vec`, so rendering the tree is deterministic.

use serde::{Deserialize, Serialize};

use crate::entity::{AttributeValue, Entity};
use crate::id::EntityId;

/// The complete dashboard document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub title: String,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Configuration {
    /// All cards, view by view.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.views.iter().flat_map(|view| view.cards.iter())
    }

    /// Every entity id shown by a card, in document order.
    ///
    /// History graphs list the entities they plot, which usually also have a
    /// card of their own, so an id may appear more than once here.
    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.cards().flat_map(Card::entity_ids)
    }
}

/// A top-level dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub title: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Card {
    /// A titled list of entities.
    Entities {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        show_header_toggle: Option<bool>,
        #[serde(default)]
        entities: Vec<EntityId>,
    },
    /// A camera stream.
    PictureEntity {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        entity: EntityId,
        camera_image: EntityId,
        show_info: bool,
        tap_action: String,
    },
    /// Recorded history of the listed entities.
    HistoryGraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hours_to_show: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh_interval: Option<u32>,
        #[serde(default)]
        entities: Vec<EntityId>,
    },
    MediaControl { entity: EntityId },
    PlantStatus { entity: EntityId },
    WeatherForecast { entity: EntityId },
}

impl Card {
    /// An untitled entities card.
    #[must_use]
    pub fn entities(entities: Vec<EntityId>) -> Self {
        Self::Entities {
            title: None,
            show_header_toggle: None,
            entities,
        }
    }

    /// Entity ids shown by this card.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<&EntityId> {
        match self {
            Self::Entities { entities, .. } | Self::HistoryGraph { entities, .. } => {
                entities.iter().collect()
            }
            Self::PictureEntity { entity, .. }
            | Self::MediaControl { entity }
            | Self::PlantStatus { entity }
            | Self::WeatherForecast { entity } => vec![entity],
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Entities { title, .. }
            | Self::PictureEntity { title, .. }
            | Self::HistoryGraph { title, .. } => title.as_deref(),
            Self::MediaControl { .. } | Self::PlantStatus { .. } | Self::WeatherForecast { .. } => {
                None
            }
        }
    }
}

/// Card types dedicated to a single entity of a given domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainCardKind {
    PictureEntity,
    HistoryGraph,
    MediaControl,
    PlantStatus,
    WeatherForecast,
}

impl DomainCardKind {
    /// The dedicated card type for `domain`, if there is one.
    #[must_use]
    pub fn for_domain(domain: &str) -> Option<Self> {
        match domain {
            "camera" => Some(Self::PictureEntity),
            "history_graph" => Some(Self::HistoryGraph),
            "media_player" => Some(Self::MediaControl),
            "plant" => Some(Self::PlantStatus),
            "weather" => Some(Self::WeatherForecast),
            _ => None,
        }
    }

    /// Build the card showing `entity`.
    #[must_use]
    pub fn card_for(self, entity: &Entity) -> Card {
        let id = entity.id().clone();
        match self {
            Self::PictureEntity => Card::PictureEntity {
                title: Some(entity.display_name()),
                camera_image: id.clone(),
                entity: id,
                show_info: true,
                tap_action: "dialog".to_string(),
            },
            Self::HistoryGraph => Card::HistoryGraph {
                title: Some(entity.display_name()),
                hours_to_show: whole_number(entity, "hours_to_show"),
                refresh_interval: whole_number(entity, "refresh"),
                entities: plotted_entities(entity),
            },
            Self::MediaControl => Card::MediaControl { entity: id },
            Self::PlantStatus => Card::PlantStatus { entity: id },
            Self::WeatherForecast => Card::WeatherForecast { entity: id },
        }
    }
}

fn whole_number(entity: &Entity, key: &str) -> Option<u32> {
    entity
        .attribute(key)
        .and_then(AttributeValue::as_int)
        .and_then(|value| u32::try_from(value).ok())
}

/// Entity ids listed by a `history_graph` entity; malformed references are skipped.
fn plotted_entities(entity: &Entity) -> Vec<EntityId> {
    let raw: Vec<&str> = match entity.attribute("entity_id") {
        Some(AttributeValue::List(values)) => {
            values.iter().filter_map(AttributeValue::as_str).collect()
        }
        Some(AttributeValue::String(value)) => vec![value.as_str()],
        _ => Vec::new(),
    };
    raw.into_iter()
        .filter_map(|value| EntityId::parse(value.trim()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EntityId {
        EntityId::parse(raw).unwrap()
    }

    #[test]
    fn should_serialize_card_type_first() {
        let card = Card::Entities {
            title: Some("Kitchen".to_string()),
            show_header_toggle: Some(true),
            entities: vec![id("light.kitchen")],
        };
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(
            json,
            r#"{"type":"entities","title":"Kitchen","show_header_toggle":true,"entities":["light.kitchen"]}"#
        );
    }

    #[test]
    fn should_omit_absent_optional_fields() {
        let json = serde_json::to_string(&Card::entities(vec![id("light.a")])).unwrap();
        assert_eq!(json, r#"{"type":"entities","entities":["light.a"]}"#);

        let view = View {
            title: "Home".to_string(),
            id: "home".to_string(),
            icon: None,
            cards: vec![],
        };
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"title":"Home","id":"home","cards":[]}"#);
    }

    #[test]
    fn should_map_domains_to_dedicated_cards() {
        assert_eq!(
            DomainCardKind::for_domain("camera"),
            Some(DomainCardKind::PictureEntity)
        );
        assert_eq!(
            DomainCardKind::for_domain("media_player"),
            Some(DomainCardKind::MediaControl)
        );
        assert_eq!(
            DomainCardKind::for_domain("history_graph"),
            Some(DomainCardKind::HistoryGraph)
        );
        assert_eq!(DomainCardKind::for_domain("light"), None);
    }

    #[test]
    fn should_build_camera_card_from_entity() {
        let camera = Entity::builder()
            .entity_id("camera.porch")
            .attribute("friendly_name", "Porch")
            .build()
            .unwrap();
        let card = DomainCardKind::PictureEntity.card_for(&camera);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(
            json,
            r#"{"type":"picture-entity","title":"Porch","entity":"camera.porch","camera_image":"camera.porch","show_info":true,"tap_action":"dialog"}"#
        );
        assert_eq!(card.entity_ids(), vec![&id("camera.porch")]);
        assert_eq!(card.title(), Some("Porch"));
    }

    #[test]
    fn should_build_history_graph_card_from_entity() {
        let graph = Entity::builder()
            .entity_id("history_graph.climate")
            .attribute("friendly_name", "Climate")
            .attribute(
                "entity_id",
                AttributeValue::from(serde_json::json!(["sensor.temp", "not-an-id", 7, "sensor.humidity"])),
            )
            .attribute("hours_to_show", AttributeValue::Int(24))
            .attribute("refresh", AttributeValue::Int(60))
            .build()
            .unwrap();

        let card = DomainCardKind::HistoryGraph.card_for(&graph);

        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(
            json,
            r#"{"type":"history-graph","title":"Climate","hours_to_show":24,"refresh_interval":60,"entities":["sensor.temp","sensor.humidity"]}"#
        );
        assert_eq!(card.title(), Some("Climate"));
    }

    #[test]
    fn should_omit_unset_history_graph_settings() {
        let graph = Entity::builder()
            .entity_id("history_graph.power")
            .attribute("entity_id", "sensor.power")
            .attribute("hours_to_show", AttributeValue::Int(-3))
            .build()
            .unwrap();

        let json = serde_json::to_string(&DomainCardKind::HistoryGraph.card_for(&graph)).unwrap();

        assert_eq!(
            json,
            r#"{"type":"history-graph","title":"Power","entities":["sensor.power"]}"#
        );
    }

    #[test]
    fn should_list_entity_ids_across_views() {
        let config = Configuration {
            title: "Home".to_string(),
            views: vec![
                View {
                    title: "A".to_string(),
                    id: "a".to_string(),
                    icon: None,
                    cards: vec![Card::entities(vec![id("light.a"), id("light.b")])],
                },
                View {
                    title: "B".to_string(),
                    id: "b".to_string(),
                    icon: Some("mdi:tv".to_string()),
                    cards: vec![Card::MediaControl {
                        entity: id("media_player.tv"),
                    }],
                },
            ],
        };
        let ids: Vec<_> = config.entity_ids().map(EntityId::as_str).collect();
        assert_eq!(ids, vec!["light.a", "light.b", "media_player.tv"]);
        assert_eq!(config.cards().count(), 2);
    }
}
