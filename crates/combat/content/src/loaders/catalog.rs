//! Status catalog loader.
//!
//! A catalog bundles every shared definition a fight needs: categories, tags,
//! status definitions and the interaction rules between categories. Names are
//! resolved here once; the resulting handles are shared by every combatant.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::{
    Category, CategoryInteraction, CombatConfig, Effect, EffectKind, InteractionKind,
    InteractionRegistry, StatusSpec, TIMER_EPSILON, Tag, TagSet, VisualId,
};

use crate::formats::{CatalogFile, EffectKindSpec, EffectSpec, StatusDef, TimingSpec};
use crate::loaders::{LoadResult, read_file};

/// Resolved, shareable combat content.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    categories: BTreeMap<String, Category>,
    tags: BTreeMap<String, Tag>,
    statuses: BTreeMap<String, Arc<StatusSpec>>,
    interactions: Arc<InteractionRegistry>,
}

impl Catalog {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn status(&self, name: &str) -> Option<&Arc<StatusSpec>> {
        self.statuses.get(name)
    }

    /// Status names in sorted order.
    pub fn status_names(&self) -> impl Iterator<Item = &str> {
        self.statuses.keys().map(String::as_str)
    }

    /// Interaction rules, shared by every combatant built from this catalog.
    pub fn interactions(&self) -> Arc<InteractionRegistry> {
        Arc::clone(&self.interactions)
    }

    /// Resolves an authored catalog.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names and on any reference to a name that was not
    /// declared earlier in its section.
    pub fn from_file(file: CatalogFile) -> LoadResult<Self> {
        let mut catalog = Self::default();

        for spec in file.categories {
            let category = match &spec.parent {
                Some(parent) => Category::with_parent(&spec.name, catalog.require_category(parent)?),
                None => Category::new(&spec.name),
            };
            insert_unique(&mut catalog.categories, "category", spec.name, category)?;
        }

        for spec in file.tags {
            let mut builder = Tag::builder(&spec.name).priority(spec.priority);
            if let Some(policy) = spec.stack_policy {
                builder = builder.stack_policy(policy);
            }
            if let Some(category) = &spec.category {
                builder = builder.category(catalog.require_category(category)?);
            }
            insert_unique(&mut catalog.tags, "tag", spec.name, builder.build())?;
        }

        for def in file.statuses {
            let name = def.name.clone();
            let status = catalog
                .build_status(def)
                .map_err(|e| anyhow::anyhow!("Invalid status '{}': {}", name, e))?;
            insert_unique(&mut catalog.statuses, "status", name, status.shared())?;
        }

        let mut interactions = InteractionRegistry::new();
        for spec in file.interactions {
            let incoming = catalog.require_category(&spec.incoming)?;
            let existing = catalog.require_category(&spec.existing)?;
            let mut rule =
                CategoryInteraction::new(incoming, existing, spec.kind).magnitude(spec.magnitude);
            if spec.bidirectional {
                rule = rule.bidirectional();
            }
            match (&spec.replacement, spec.kind) {
                (Some(status), _) => {
                    rule = rule.replacement(Arc::clone(catalog.require_status(status)?));
                }
                (None, InteractionKind::Transform) => anyhow::bail!(
                    "Transform interaction {} -> {} needs a replacement status",
                    spec.incoming,
                    spec.existing
                ),
                (None, _) => {}
            }
            interactions.register(rule);
        }
        catalog.interactions = Arc::new(interactions);

        Ok(catalog)
    }

    fn build_status(&self, def: StatusDef) -> LoadResult<StatusSpec> {
        match &def.timing {
            TimingSpec::Tick { interval, .. } | TimingSpec::Condition { interval, .. } => {
                check_interval(*interval)?
            }
            TimingSpec::Duration(_) | TimingSpec::Delayed(_) => {}
        }

        let mut status = match def.timing {
            TimingSpec::Duration(duration) => StatusSpec::duration(def.name, duration),
            TimingSpec::Tick { duration, interval } => {
                StatusSpec::tick(def.name, duration, interval)
            }
            TimingSpec::Delayed(delay) => StatusSpec::delayed(def.name, delay),
            TimingSpec::Condition {
                interval,
                condition,
            } => StatusSpec::condition(def.name, interval, condition),
        };

        status.tags = self.resolve_tags(&def.tags)?;
        if let Some(effect) = def.on_start {
            status = status.on_start(self.build_effect(effect)?);
        }
        if let Some(effect) = def.on_tick {
            status = status.on_tick(self.build_effect(effect)?);
        }
        if let Some(effect) = def.on_end {
            status = status.on_end(self.build_effect(effect)?);
        }
        if def.revertible {
            status = status.revertible();
        }

        Ok(status)
    }

    fn build_effect(&self, spec: EffectSpec) -> LoadResult<Effect> {
        let kind = match spec.kind {
            EffectKindSpec::Damage(effect) => EffectKind::Damage(effect),
            EffectKindSpec::Heal(effect) => EffectKind::Heal(effect),
            EffectKindSpec::ModifyStat(effect) => EffectKind::ModifyStat(effect),
            EffectKindSpec::Control(effect) => EffectKind::Control(effect),
            EffectKindSpec::ApplyStatus(name) => {
                EffectKind::ApplyStatus(Arc::clone(self.require_status(&name)?))
            }
            EffectKindSpec::Dispel(name) => EffectKind::Dispel(self.require_category(&name)?.clone()),
        };

        let mut effect = Effect::new(kind).tags(self.resolve_tags(&spec.tags)?);
        if let Some(visual) = spec.visual {
            effect = effect.visual(VisualId(visual));
        }
        Ok(effect)
    }

    fn resolve_tags(&self, names: &[String]) -> LoadResult<TagSet> {
        if names.len() > CombatConfig::MAX_TAGS_PER_EFFECT {
            anyhow::bail!(
                "{} tags exceed the limit of {}",
                names.len(),
                CombatConfig::MAX_TAGS_PER_EFFECT
            );
        }
        names
            .iter()
            .map(|name| self.require_tag(name).cloned())
            .collect()
    }

    fn require_category(&self, name: &str) -> LoadResult<&Category> {
        self.categories
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown category '{}'", name))
    }

    fn require_tag(&self, name: &str) -> LoadResult<&Tag> {
        self.tags
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tag '{}'", name))
    }

    fn require_status(&self, name: &str) -> LoadResult<&Arc<StatusSpec>> {
        self.statuses
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown status '{}'", name))
    }
}

/// Zero means every frame; any other interval must exceed the timer epsilon.
fn check_interval(interval: f32) -> LoadResult<()> {
    if interval == 0.0 || (interval.is_finite() && interval > TIMER_EPSILON) {
        return Ok(());
    }
    anyhow::bail!(
        "interval {} must be 0 (every frame) or greater than {}",
        interval,
        TIMER_EPSILON
    )
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    section: &str,
    name: String,
    value: T,
) -> LoadResult<()> {
    if map.contains_key(&name) {
        anyhow::bail!("Duplicate {} '{}'", section, name);
    }
    map.insert(name, value);
    Ok(())
}

/// Loader for status catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and resolve a catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a [`CatalogFile`]
    ///
    /// # Returns
    ///
    /// Returns a resolved [`Catalog`]. Errors name the file and the first
    /// unresolved or duplicate entry.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Parse and resolve a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        Catalog::from_file(file)
    }

    /// The catalog shipped with this crate.
    pub fn builtin() -> LoadResult<Catalog> {
        Self::parse(include_str!("../../data/catalog.ron"))
    }
}
