//! Entity filter applied to a snapshot before classification.

use std::collections::BTreeSet;

use crate::entity::Entity;

/// Decides which entities are left out of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFilter {
    exclude_domains: BTreeSet<String>,
    skip_hidden: bool,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self {
            exclude_domains: BTreeSet::new(),
            skip_hidden: true,
        }
    }
}

impl EntityFilter {
    /// A filter that keeps every entity.
    #[must_use]
    pub fn keep_all() -> Self {
        Self {
            exclude_domains: BTreeSet::new(),
            skip_hidden: false,
        }
    }

    #[must_use]
    pub fn exclude_domain(mut self, domain: impl Into<String>) -> Self {
        self.exclude_domains.insert(domain.into());
        self
    }

    #[must_use]
    pub fn exclude_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_domains.extend(domains.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    /// Whether `entity` must be left out.
    #[must_use]
    pub fn excludes(&self, entity: &Entity) -> bool {
        self.exclude_domains.contains(entity.domain()) || (self.skip_hidden && entity.is_hidden())
    }
}
