//! Tags: shared, immutable labels that group effects for stacking and interactions.
//!
//! A [`Tag`] is authored once (usually by `combat-content`) and referenced by
//! every effect and runner that carries it. Tags compare by identity, and no
//! per-instance state ever lives on a tag definition: remaining durations,
//! stack counts and potency belong to runners and registries.

mod category;
mod policy;
mod set;

pub use category::Category;
pub use policy::{DurationBehavior, OverflowBehavior, StackPolicy, StackPolicyResult};
pub use set::TagSet;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct TagDefinition {
    name: String,
    priority: i32,
    stack_policy: Option<StackPolicy>,
    category: Option<Category>,
}

/// Handle to a shared tag definition.
#[derive(Clone)]
pub struct Tag(Arc<TagDefinition>);

impl Tag {
    /// Creates a tag with no stack policy and no category.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self::builder(name).priority(priority).build()
    }

    pub fn builder(name: impl Into<String>) -> TagBuilder {
        TagBuilder {
            name: name.into(),
            priority: 0,
            stack_policy: None,
            category: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Reaction precedence; lower values win.
    pub fn priority(&self) -> i32 {
        self.0.priority
    }

    pub fn stack_policy(&self) -> Option<&StackPolicy> {
        self.0.stack_policy.as_ref()
    }

    pub fn category(&self) -> Option<&Category> {
        self.0.category.as_ref()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.0.name).finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder for [`Tag`] definitions.
#[derive(Debug)]
pub struct TagBuilder {
    name: String,
    priority: i32,
    stack_policy: Option<StackPolicy>,
    category: Option<Category>,
}

impl TagBuilder {
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn stack_policy(mut self, policy: StackPolicy) -> Self {
        self.stack_policy = Some(policy);
        self
    }

    pub fn category(mut self, category: &Category) -> Self {
        self.category = Some(category.clone());
        self
    }

    pub fn build(self) -> Tag {
        Tag(Arc::new(TagDefinition {
            name: self.name,
            priority: self.priority,
            stack_policy: self.stack_policy,
            category: self.category,
        }))
    }
}
