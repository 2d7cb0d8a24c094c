use arrayvec::ArrayVec;

use crate::config::CombatConfig;

use super::{Category, Tag};

/// Small, ordered, duplicate-free set of tags carried by an effect or runner.
///
/// Order is authoring order and is preserved; it decides which tag's policy
/// drives a refresh when several tags overflow together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: ArrayVec<Tag, { CombatConfig::MAX_TAGS_PER_EFFECT }>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag. Returns false if it was already present or the set is full.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.contains(&tag) {
            return false;
        }
        if self.tags.try_push(tag).is_err() {
            tracing::warn!(
                capacity = CombatConfig::MAX_TAGS_PER_EFFECT,
                "tag set full, dropping tag"
            );
            return false;
        }
        true
    }

    /// Builder: add a tag.
    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true if any tag is shared with `other`.
    pub fn intersects(&self, other: &TagSet) -> bool {
        self.tags.iter().any(|t| other.contains(t))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in reaction precedence order (lowest priority value first).
    /// Ties keep insertion order.
    pub fn by_priority(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.iter().collect();
        tags.sort_by_key(|t| t.priority());
        tags
    }

    /// Distinct categories of the tags, in reaction precedence order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::with_capacity(self.tags.len());
        for category in self.by_priority().into_iter().filter_map(Tag::category) {
            if !out.contains(category) {
                out.push(category.clone());
            }
        }
        out
    }

    /// Returns true if any tag's category is `category` or descends from it.
    pub fn has_category(&self, category: &Category) -> bool {
        self.tags
            .iter()
            .filter_map(Tag::category)
            .any(|c| c.is_a(category))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
