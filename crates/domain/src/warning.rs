//! Non-fatal conditions met while resolving group membership.
//!
//! The classifier drops the offending reference and keeps going; each drop
//! is recorded as an [`UnresolvedGroupWarning`].

use crate::id::EntityId;

/// A group member reference that was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedGroupWarning {
    /// The member id does not exist in the snapshot.
    #[error("{group}: member {member:?} not found")]
    MissingMember { group: EntityId, member: String },

    /// The member entry is not an entity id string.
    #[error("{group}: member {raw} is not an entity id")]
    InvalidMember { group: EntityId, raw: String },

    /// The member is a view group; views do not nest.
    #[error("{group}: member {member} is a view and cannot be nested")]
    NestedView { group: EntityId, member: EntityId },

    /// The member group is already being expanded.
    #[error("{group}: member {member} forms a cycle")]
    Cycle { group: EntityId, member: EntityId },

    /// The member was claimed by an earlier group.
    #[error("{group}: member {member} already shown by {claimed_by}")]
    DuplicateMembership {
        group: EntityId,
        member: EntityId,
        claimed_by: EntityId,
    },
}

impl UnresolvedGroupWarning {
    /// The group whose member list contained the reference.
    #[must_use]
    pub fn group(&self) -> &EntityId {
        match self {
            Self::MissingMember { group, .. }
            | Self::InvalidMember { group, .. }
            | Self::NestedView { group, .. }
            | Self::Cycle { group, .. }
            | Self::DuplicateMembership { group, .. } => group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EntityId {
        EntityId::parse(raw).unwrap()
    }

    #[test]
    fn should_display_missing_member() {
        let warning = UnresolvedGroupWarning::MissingMember {
            group: id("group.kitchen"),
            member: "light.gone".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "group.kitchen: member \"light.gone\" not found"
        );
    }

    #[test]
    fn should_display_duplicate_membership_with_first_claimant() {
        let warning = UnresolvedGroupWarning::DuplicateMembership {
            group: id("group.b"),
            member: id("light.lamp"),
            claimed_by: id("group.a"),
        };
        assert_eq!(
            warning.to_string(),
            "group.b: member light.lamp already shown by group.a"
        );
        assert_eq!(warning.group(), &id("group.b"));
    }
}
