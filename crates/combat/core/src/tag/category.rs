use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct CategoryDefinition {
    name: String,
    parent: Option<Category>,
}

/// Elemental or semantic grouping used to match interaction rules.
///
/// Categories form a tree (`Fire` under `Elemental`). Handles are cheap to clone
/// and compare by identity: two categories authored with the same name are
/// still different categories.
#[derive(Clone)]
pub struct Category(Arc<CategoryDefinition>);

impl Category {
    /// Creates a root category.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(CategoryDefinition {
            name: name.into(),
            parent: None,
        }))
    }

    /// Creates a category nested under `parent`.
    pub fn with_parent(name: impl Into<String>, parent: &Category) -> Self {
        Self(Arc::new(CategoryDefinition {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Category> {
        self.0.parent.as_ref()
    }

    /// Iterates this category followed by each ancestor up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &Category> + '_ {
        std::iter::successors(Some(self), |category| category.parent())
    }

    /// Returns true if this category is `other` or descends from it.
    pub fn is_a(&self, other: &Category) -> bool {
        self.lineage().any(|category| category == other)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Category").field(&self.0.name).finish()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
