//! Grouping classifier: decides which container shows each entity.
//!
//! View groups are expanded first, in snapshot order, then every non-view
//! group that no view claimed, then the leftover entities fill the implicit
//! default view. A member is shown by the first container that claims it;
//! later references are dropped with a warning. Member groups are expanded
//! depth-first on an explicit stack that also tracks the groups currently
//! open, so a cycle ends the descent instead of looping.
//!
//! A `history_graph` entity gets its own card; the entities it plots are
//! references only and are still claimed by their own containers.

use std::collections::{HashMap, HashSet};

use lovelace_domain::dashboard::{Card, DomainCardKind};
use lovelace_domain::entity::Entity;
use lovelace_domain::group::Group;
use lovelace_domain::id::EntityId;
use lovelace_domain::snapshot::Snapshot;
use lovelace_domain::warning::UnresolvedGroupWarning;

/// Classifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Give cameras, history graphs, media players, plants and weather
    /// entities their own card.
    pub domain_cards: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self { domain_cards: true }
    }
}

/// One card the classifier decided to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum CardPlan {
    /// Entities card of a non-view group.
    Group {
        group: EntityId,
        entities: Vec<EntityId>,
    },
    /// Entities card for a container's members that are neither groups nor
    /// domain-card entities.
    Loose { entities: Vec<EntityId> },
    /// Dedicated single-entity card.
    Domain { entity: EntityId, card: Card },
}

impl CardPlan {
    /// Entity ids shown by this card (a group card does not list its own id).
    #[must_use]
    pub fn entity_ids(&self) -> Vec<&EntityId> {
        match self {
            Self::Group { entities, .. } | Self::Loose { entities } => entities.iter().collect(),
            Self::Domain { entity, .. } => vec![entity],
        }
    }
}

/// Cards of one view; `group` is `None` for the implicit default view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPlan {
    pub group: Option<EntityId>,
    pub cards: Vec<CardPlan>,
}

/// Result of classifying a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// One plan per view group, in snapshot order.
    pub views: Vec<ViewPlan>,
    /// Everything no view claimed; `None` when nothing is left.
    pub default_view: Option<ViewPlan>,
    pub warnings: Vec<UnresolvedGroupWarning>,
}

impl Classification {
    /// View plans in output order (default view last).
    pub fn all_views(&self) -> impl Iterator<Item = &ViewPlan> {
        self.views.iter().chain(self.default_view.iter())
    }
}

/// Partition `snapshot` into views and cards.
#[must_use]
pub fn classify(snapshot: &Snapshot, options: ClassifyOptions) -> Classification {
    let groups: Vec<Group> = snapshot.iter().filter_map(Group::from_entity).collect();
    let arena: HashMap<&str, &Group> = groups
        .iter()
        .map(|group| (group.id.as_str(), group))
        .collect();

    let mut expansion = Expansion {
        snapshot,
        arena: &arena,
        options,
        claimed_by: HashMap::new(),
        in_progress: HashSet::new(),
        warnings: Vec::new(),
    };

    let mut views = Vec::new();
    for group in groups.iter().filter(|group| group.view) {
        let (loose, nested) = expansion.expand(group);
        let mut cards = Vec::with_capacity(nested.len() + 1);
        if !loose.is_empty() {
            cards.push(CardPlan::Loose { entities: loose });
        }
        cards.extend(nested);
        views.push(ViewPlan {
            group: Some(group.id.clone()),
            cards,
        });
    }

    // Cards of the default view, keyed by the snapshot position of their source.
    let mut positioned: Vec<(usize, Vec<CardPlan>)> = Vec::new();
    for (position, entity) in snapshot.iter().enumerate() {
        let Some(group) = arena.get(entity.id().as_str()).copied() else {
            continue;
        };
        if group.view || expansion.claimed_by.contains_key(&group.id) {
            continue;
        }
        expansion
            .claimed_by
            .insert(group.id.clone(), group.id.clone());
        positioned.push((position, expansion.card_group(group)));
    }

    let mut loose = Vec::new();
    for (position, entity) in snapshot.iter().enumerate() {
        if entity.id().is_group() || expansion.claimed_by.contains_key(entity.id()) {
            continue;
        }
        match expansion.domain_card(entity) {
            Some(card) => positioned.push((
                position,
                vec![CardPlan::Domain {
                    entity: entity.id().clone(),
                    card,
                }],
            )),
            None => loose.push(entity.id().clone()),
        }
    }
    positioned.sort_by_key(|(position, _)| *position);

    let mut cards = Vec::new();
    if !loose.is_empty() {
        cards.push(CardPlan::Loose { entities: loose });
    }
    cards.extend(positioned.into_iter().flat_map(|(_, plans)| plans));
    let default_view = (!cards.is_empty()).then_some(ViewPlan { group: None, cards });

    tracing::debug!(
        views = views.len(),
        default_view = default_view.is_some(),
        warnings = expansion.warnings.len(),
        "classification complete"
    );

    Classification {
        views,
        default_view,
        warnings: expansion.warnings,
    }
}

struct Expansion<'a> {
    snapshot: &'a Snapshot,
    arena: &'a HashMap<&'a str, &'a Group>,
    options: ClassifyOptions,
    /// Member id → container that claimed it first.
    claimed_by: HashMap<EntityId, EntityId>,
    /// Groups whose expansion has started but not finished.
    in_progress: HashSet<EntityId>,
    warnings: Vec<UnresolvedGroupWarning>,
}

/// A group being expanded and what it has collected so far.
struct Frame<'a> {
    group: &'a Group,
    next: usize,
    loose: Vec<EntityId>,
    nested: Vec<CardPlan>,
}

/// Where a claimed member ends up.
enum Placement<'a> {
    Skipped,
    Loose(EntityId),
    Card(CardPlan),
    Group(&'a Group),
}

impl<'a> Expansion<'a> {
    /// The group's own entities card followed by the cards of its nested groups.
    fn card_group(&mut self, group: &'a Group) -> Vec<CardPlan> {
        let (entities, nested) = self.expand(group);
        let mut cards = Vec::with_capacity(nested.len() + 1);
        cards.push(CardPlan::Group {
            group: group.id.clone(),
            entities,
        });
        cards.extend(nested);
        cards
    }

    /// Claim the members of `root`, returning its loose members and the
    /// cards of its member groups and domain-card entities, in member order.
    ///
    /// Member groups are expanded on an explicit stack of frames, so chain
    /// length is bounded by memory only.
    fn expand(&mut self, root: &'a Group) -> (Vec<EntityId>, Vec<CardPlan>) {
        let mut current = self.enter(root);
        let mut parents: Vec<Frame<'a>> = Vec::new();
        loop {
            let group = current.group;
            if let Some(member) = group.members.get(current.next) {
                current.next += 1;
                match self.place(group, member) {
                    Placement::Skipped => {}
                    Placement::Loose(id) => current.loose.push(id),
                    Placement::Card(card) => current.nested.push(card),
                    Placement::Group(member_group) => {
                        let child = self.enter(member_group);
                        parents.push(std::mem::replace(&mut current, child));
                    }
                }
                continue;
            }

            self.in_progress.remove(&group.id);
            let Some(mut parent) = parents.pop() else {
                return (current.loose, current.nested);
            };
            parent.nested.push(CardPlan::Group {
                group: group.id.clone(),
                entities: current.loose,
            });
            parent.nested.extend(current.nested);
            current = parent;
        }
    }

    fn enter(&mut self, group: &'a Group) -> Frame<'a> {
        self.in_progress.insert(group.id.clone());
        for raw in &group.invalid_members {
            self.warn(UnresolvedGroupWarning::InvalidMember {
                group: group.id.clone(),
                raw: raw.clone(),
            });
        }
        Frame {
            group,
            next: 0,
            loose: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Resolve one member reference of `group` and claim it if it is free.
    fn place(&mut self, group: &Group, member: &str) -> Placement<'a> {
        let snapshot = self.snapshot;
        let arena = self.arena;

        if snapshot.is_excluded(member) {
            tracing::debug!(group = %group.id, %member, "member filtered out");
            return Placement::Skipped;
        }
        let Some(entity) = snapshot.get(member) else {
            self.warn(UnresolvedGroupWarning::MissingMember {
                group: group.id.clone(),
                member: member.to_string(),
            });
            return Placement::Skipped;
        };
        let id = entity.id();
        let member_group = arena.get(id.as_str()).copied();

        if let Some(member_group) = member_group {
            if member_group.view {
                self.warn(UnresolvedGroupWarning::NestedView {
                    group: group.id.clone(),
                    member: id.clone(),
                });
                return Placement::Skipped;
            }
            if self.in_progress.contains(id) {
                self.warn(UnresolvedGroupWarning::Cycle {
                    group: group.id.clone(),
                    member: id.clone(),
                });
                return Placement::Skipped;
            }
        }
        if let Some(first) = self.claimed_by.get(id) {
            let claimed_by = first.clone();
            self.warn(UnresolvedGroupWarning::DuplicateMembership {
                group: group.id.clone(),
                member: id.clone(),
                claimed_by,
            });
            return Placement::Skipped;
        }
        self.claimed_by.insert(id.clone(), group.id.clone());

        if let Some(member_group) = member_group {
            Placement::Group(member_group)
        } else if let Some(card) = self.domain_card(entity) {
            Placement::Card(CardPlan::Domain {
                entity: id.clone(),
                card,
            })
        } else {
            Placement::Loose(id.clone())
        }
    }

    fn domain_card(&self, entity: &Entity) -> Option<Card> {
        if !self.options.domain_cards {
            return None;
        }
        DomainCardKind::for_domain(entity.domain()).map(|kind| kind.card_for(entity))
    }

    fn warn(&mut self, warning: UnresolvedGroupWarning) {
        if matches!(warning, UnresolvedGroupWarning::DuplicateMembership { .. }) {
            tracing::debug!(group = %warning.group(), "{warning}");
        } else {
            tracing::warn!(group = %warning.group(), "{warning}");
        }
        self.warnings.push(warning);
    }
}
