use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::ModelError;
use crate::model::types::*;

/// Lookup table over a loaded object tree, keyed by canonical path.
///
/// Aliases are never followed implicitly: callers ask the index to
/// [`resolve`](ObjectIndex::resolve) them before rendering.
#[derive(Debug, Default)]
pub struct ObjectIndex {
    roots: Vec<Entity>,
    paths: HashMap<String, Vec<usize>>,
}

impl ObjectIndex {
    pub fn from_entities(roots: Vec<Entity>) -> Result<Self, ModelError> {
        for root in &roots {
            root.validate()?;
        }

        let mut paths = HashMap::new();
        for (i, root) in roots.iter().enumerate() {
            Self::index_entity(root, String::new(), vec![i], &mut paths)?;
        }

        debug!(roots = roots.len(), objects = paths.len(), "built object index");
        Ok(Self { roots, paths })
    }

    /// Parse a JSON array of entities and index it.
    pub fn load_json(json: &str) -> Result<Self, ModelError> {
        let roots: Vec<Entity> = serde_json::from_str(json)?;
        Self::from_entities(roots)
    }

    // Members without an explicit path get `parent.name`.
    fn index_entity(
        entity: &Entity,
        parent: String,
        position: Vec<usize>,
        paths: &mut HashMap<String, Vec<usize>>,
    ) -> Result<(), ModelError> {
        let path = match &entity.path {
            Some(path) => path.clone(),
            None if parent.is_empty() => entity.name.clone(),
            None => format!("{}.{}", parent, entity.name),
        };

        for (i, member) in entity.members.iter().enumerate() {
            if let Member::Object(child) = member {
                let mut child_position = position.clone();
                child_position.push(i);
                Self::index_entity(child, path.clone(), child_position, paths)?;
            }
        }

        if paths.contains_key(&path) {
            return Err(ModelError::InvalidEntity {
                name: path,
                reason: "another entity has the same path".to_string(),
            });
        }
        paths.insert(path, position);
        Ok(())
    }

    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Entity> {
        let position = self.paths.get(path)?;
        let (first, rest) = position.split_first()?;
        let mut entity = self.roots.get(*first)?;
        for i in rest {
            entity = match entity.members.get(*i)? {
                Member::Object(child) => child,
                Member::Alias(_) => return None,
            };
        }
        Some(entity)
    }

    /// Follow an alias (and any alias it points at) to the entity it names.
    pub fn resolve(&self, alias: &Alias) -> Result<&Entity, ModelError> {
        let mut seen = HashSet::new();
        let mut target = alias.target_path.as_str();

        loop {
            if !seen.insert(target.to_string()) {
                return Err(ModelError::AliasCycle(alias.name.clone()));
            }

            if let Some(entity) = self.get(target) {
                return Ok(entity);
            }

            match self.find_alias(target) {
                Some(next) => target = next.target_path.as_str(),
                None => {
                    return Err(ModelError::UnresolvedAlias {
                        name: alias.name.clone(),
                        target: alias.target_path.clone(),
                    })
                }
            }
        }
    }

    /// Aliases are not indexed; find one by its parent's path plus its own name.
    pub fn find_alias(&self, path: &str) -> Option<&Alias> {
        let (parent, name) = path.rsplit_once('.')?;
        self.get(parent)?.members.iter().find_map(|member| match member {
            Member::Alias(alias) if alias.name == name => Some(alias),
            _ => None,
        })
    }
}
