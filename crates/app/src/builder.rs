//! Turns a [`Classification`] into a [`Configuration`].

use std::collections::HashSet;

use lovelace_domain::dashboard::{Card, Configuration, View};
use lovelace_domain::group::Group;
use lovelace_domain::id::EntityId;
use lovelace_domain::naming::{humanize, slugify};
use lovelace_domain::snapshot::Snapshot;

use crate::classifier::{CardPlan, Classification, ViewPlan};

/// Id of the default view when the run title has no usable characters.
pub const DEFAULT_VIEW_ID: &str = "default_view";

/// Assemble the dashboard tree titled `title`.
#[must_use]
pub fn build(snapshot: &Snapshot, classification: &Classification, title: &str) -> Configuration {
    let mut ids = ViewIds::default();
    let views = classification
        .all_views()
        .map(|plan| build_view(snapshot, plan, title, &mut ids))
        .collect();

    Configuration {
        title: title.to_string(),
        views,
    }
}

fn build_view(snapshot: &Snapshot, plan: &ViewPlan, run_title: &str, ids: &mut ViewIds) -> View {
    let Some(group_id) = &plan.group else {
        let slug = slugify(run_title);
        let slug = if slug.is_empty() {
            DEFAULT_VIEW_ID.to_string()
        } else {
            slug
        };
        return View {
            title: run_title.to_string(),
            id: ids.claim(&slug),
            icon: None,
            cards: build_cards(snapshot, &plan.cards, Some(run_title)),
        };
    };

    let group = group_of(snapshot, group_id);
    View {
        title: title_of(group.as_ref(), group_id),
        id: ids.claim(group_id.object_id()),
        icon: group.and_then(|group| group.icon),
        cards: build_cards(snapshot, &plan.cards, None),
    }
}

fn build_cards(snapshot: &Snapshot, plans: &[CardPlan], loose_title: Option<&str>) -> Vec<Card> {
    plans
        .iter()
        .map(|plan| match plan {
            CardPlan::Group { group, entities } => {
                let data = group_of(snapshot, group);
                Card::Entities {
                    title: Some(title_of(data.as_ref(), group)),
                    show_header_toggle: Some(!data.is_some_and(|data| data.control_hidden)),
                    entities: entities.clone(),
                }
            }
            CardPlan::Loose { entities } => Card::Entities {
                title: loose_title.map(str::to_string),
                show_header_toggle: None,
                entities: entities.clone(),
            },
            CardPlan::Domain { card, .. } => card.clone(),
        })
        .collect()
}

fn group_of(snapshot: &Snapshot, id: &EntityId) -> Option<Group> {
    snapshot.get(id.as_str()).and_then(Group::from_entity)
}

fn title_of(group: Option<&Group>, id: &EntityId) -> String {
    group.map_or_else(|| humanize(id.object_id()), |group| group.name.clone())
}

/// View ids handed out so far; repeats get a numeric suffix.
#[derive(Default)]
struct ViewIds(HashSet<String>);

impl ViewIds {
    fn claim(&mut self, base: &str) -> String {
        if self.0.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.0.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifyOptions, classify};
    use serde_json::json;

    fn configure(payload: serde_json::Value, title: &str) -> Configuration {
        let snapshot = Snapshot::from_json(&payload).unwrap();
        let classification = classify(&snapshot, ClassifyOptions::default());
        build(&snapshot, &classification, title)
    }

    #[test]
    fn should_build_default_view_for_single_entity() {
        let config = configure(
            json!([{"entity_id": "light.kitchen", "state": "on", "attributes": {}}]),
            "Home",
        );

        assert_eq!(config.title, "Home");
        assert_eq!(config.views.len(), 1);
        let view = &config.views[0];
        assert_eq!(view.title, "Home");
        assert_eq!(view.id, "home");
        assert_eq!(
            view.cards,
            vec![Card::Entities {
                title: Some("Home".to_string()),
                show_header_toggle: None,
                entities: vec![EntityId::parse("light.kitchen").unwrap()],
            }]
        );
    }

    #[test]
    fn should_emit_no_views_for_empty_snapshot() {
        let config = configure(json!([]), "Home");
        assert_eq!(config.title, "Home");
        assert!(config.views.is_empty());
    }

    #[test]
    fn should_title_views_and_cards_after_groups() {
        let config = configure(
            json!([
                {"entity_id": "group.living_room", "state": "on", "attributes": {
                    "view": true, "icon": "mdi:sofa", "entity_id": ["light.lamp", "group.tv_corner"]
                }},
                {"entity_id": "group.tv_corner", "state": "on", "attributes": {
                    "friendly_name": "TV Corner", "control": "hidden", "entity_id": ["switch.amp"]
                }},
                {"entity_id": "light.lamp", "state": "on"},
                {"entity_id": "switch.amp", "state": "off"},
            ]),
            "Home",
        );

        assert_eq!(config.views.len(), 1);
        let view = &config.views[0];
        assert_eq!(view.title, "Living Room");
        assert_eq!(view.id, "living_room");
        assert_eq!(view.icon.as_deref(), Some("mdi:sofa"));
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].title(), None);
        assert_eq!(
            view.cards[1],
            Card::Entities {
                title: Some("TV Corner".to_string()),
                show_header_toggle: Some(false),
                entities: vec![EntityId::parse("switch.amp").unwrap()],
            }
        );
    }

    #[test]
    fn should_enable_header_toggle_by_default() {
        let config = configure(
            json!([
                {"entity_id": "group.kitchen", "state": "on", "attributes": {"entity_id": []}},
            ]),
            "Home",
        );
        let card = &config.views[0].cards[0];
        assert!(matches!(
            card,
            Card::Entities { title: Some(title), show_header_toggle: Some(true), entities }
                if title == "Kitchen" && entities.is_empty()
        ));
    }

    #[test]
    fn should_suffix_colliding_view_ids() {
        let config = configure(
            json!([
                {"entity_id": "group.home", "state": "on", "attributes": {"view": true, "entity_id": []}},
                {"entity_id": "light.loose", "state": "on"},
            ]),
            "Home",
        );

        let ids: Vec<_> = config.views.iter().map(|view| view.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "home_2"]);
    }

    #[test]
    fn should_fall_back_to_default_view_id_for_unsluggable_title() {
        let config = configure(json!([{"entity_id": "light.a", "state": "on"}]), "★★★");
        assert_eq!(config.views[0].id, DEFAULT_VIEW_ID);
        assert_eq!(config.views[0].title, "★★★");
    }

    #[test]
    fn should_place_default_view_last() {
        let config = configure(
            json!([
                {"entity_id": "light.loose", "state": "on"},
                {"entity_id": "group.upstairs", "state": "on", "attributes": {"view": true, "entity_id": ["light.bed"]}},
                {"entity_id": "light.bed", "state": "on"},
            ]),
            "My Place",
        );

        let titles: Vec<_> = config.views.iter().map(|view| view.title.as_str()).collect();
        assert_eq!(titles, vec!["Upstairs", "My Place"]);
        assert_eq!(config.views[1].id, "my_place");
    }

    #[test]
    fn should_keep_domain_cards_unchanged() {
        let config = configure(
            json!([{"entity_id": "weather.home", "state": "sunny"}]),
            "Home",
        );
        assert_eq!(
            config.views[0].cards,
            vec![Card::WeatherForecast {
                entity: EntityId::parse("weather.home").unwrap()
            }]
        );
    }
}
