//! Arena-backed documentation tree.
//!
//! Every node lives in a single insertion-ordered map keyed by [`ReflectionId`]. Parent
//! links are plain ids, so moving a node between containers is a field update and never
//! transfers ownership.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::model::{Reflection, ReflectionId, ReflectionKind};

/// Root container of a documentation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    name: String,
    #[serde(with = "arena")]
    reflections: IndexMap<ReflectionId, Reflection>,
    next_id: u32,
}

impl Project {
    /// Creates a project holding only its root reflection.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Reflection::new(ReflectionId::ROOT, name.clone(), ReflectionKind::Project, None);
        let mut reflections = IndexMap::new();
        reflections.insert(ReflectionId::ROOT, root);
        Self {
            name,
            reflections,
            next_id: 1,
        }
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the root reflection.
    pub fn root(&self) -> ReflectionId {
        ReflectionId::ROOT
    }

    /// Number of reflections, root included.
    pub fn len(&self) -> usize {
        self.reflections.len()
    }

    /// Returns `true` when the project holds nothing besides its root.
    pub fn is_empty(&self) -> bool {
        self.reflections.len() <= 1
    }

    pub fn contains(&self, id: ReflectionId) -> bool {
        self.reflections.contains_key(&id)
    }

    pub fn get(&self, id: ReflectionId) -> Option<&Reflection> {
        self.reflections.get(&id)
    }

    pub fn get_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.reflections.get_mut(&id)
    }

    /// Adds a new reflection below `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::UnknownReflection`] if `parent` is not part of the project.
    pub fn add_reflection(
        &mut self,
        parent: ReflectionId,
        name: impl Into<String>,
        kind: ReflectionKind,
    ) -> Result<ReflectionId> {
        if !self.contains(parent) {
            return Err(DocsError::unknown(parent));
        }

        let id = ReflectionId::new(self.next_id);
        self.next_id += 1;
        self.reflections
            .insert(id, Reflection::new(id, name, kind, Some(parent)));
        if let Some(owner) = self.reflections.get_mut(&parent) {
            owner.children.push(id);
        }
        Ok(id)
    }

    /// Adds a top-level module.
    pub fn add_module(&mut self, name: impl Into<String>) -> ReflectionId {
        let id = ReflectionId::new(self.next_id);
        self.next_id += 1;
        self.reflections.insert(
            id,
            Reflection::new(id, name, ReflectionKind::Module, Some(ReflectionId::ROOT)),
        );
        if let Some(root) = self.reflections.get_mut(&ReflectionId::ROOT) {
            root.children.push(id);
        }
        id
    }

    /// Children of `id`, or an empty slice for unknown ids.
    pub fn children_of(&self, id: ReflectionId) -> &[ReflectionId] {
        self.reflections
            .get(&id)
            .map(|reflection| reflection.children.as_slice())
            .unwrap_or_default()
    }

    pub fn parent_of(&self, id: ReflectionId) -> Option<ReflectionId> {
        self.reflections.get(&id).and_then(|reflection| reflection.parent)
    }

    /// Iterates over every reflection in creation order.
    pub fn reflections(&self) -> impl Iterator<Item = &Reflection> {
        self.reflections.values()
    }

    /// All modules, in creation order.
    pub fn modules(&self) -> Vec<ReflectionId> {
        self.reflections()
            .filter(|reflection| reflection.is_module())
            .map(|reflection| reflection.id)
            .collect()
    }

    /// Moves `id` to the end of `new_parent`'s child list.
    ///
    /// # Errors
    ///
    /// Fails for the project root and when either id is unknown.
    pub fn move_reflection(&mut self, id: ReflectionId, new_parent: ReflectionId) -> Result<()> {
        if id == ReflectionId::ROOT {
            return Err(DocsError::RootRemoval);
        }
        if !self.contains(new_parent) {
            return Err(DocsError::unknown(new_parent));
        }
        let reflection = self
            .reflections
            .get_mut(&id)
            .ok_or_else(|| DocsError::unknown(id))?;
        let old_parent = reflection.parent.replace(new_parent);

        if let Some(owner) = old_parent.and_then(|parent| self.reflections.get_mut(&parent)) {
            owner.children.retain(|child| *child != id);
        }
        if let Some(owner) = self.reflections.get_mut(&new_parent) {
            owner.children.push(id);
        }
        Ok(())
    }

    /// Removes a reflection together with the descendants still attached to it.
    ///
    /// The reflection is also detached from its parent's child list. Descendants are
    /// only followed while their parent link points back into the removed subtree, so
    /// nodes that were already moved elsewhere survive.
    ///
    /// # Errors
    ///
    /// Fails for the project root and for ids that are not part of the project.
    pub fn remove_reflection(&mut self, id: ReflectionId) -> Result<()> {
        if id == ReflectionId::ROOT {
            return Err(DocsError::RootRemoval);
        }
        let parent = self
            .reflections
            .get(&id)
            .ok_or_else(|| DocsError::unknown(id))?
            .parent;

        if let Some(owner) = parent.and_then(|parent| self.reflections.get_mut(&parent)) {
            owner.children.retain(|child| *child != id);
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(removed) = self.reflections.shift_remove(&current) {
                pending.extend(removed.children.into_iter().filter(|child| {
                    self.reflections
                        .get(child)
                        .is_some_and(|node| node.parent == Some(current))
                }));
            }
        }

        Ok(())
    }
}

/// Serializes the arena as a plain list; ids are recovered from each reflection.
mod arena {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::model::{Reflection, ReflectionId};

    pub fn serialize<S>(
        reflections: &IndexMap<ReflectionId, Reflection>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(reflections.values())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<IndexMap<ReflectionId, Reflection>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<Reflection>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|reflection| (reflection.id, reflection))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_only_has_root() {
        let project = Project::new("docs");
        assert!(project.is_empty());
        assert_eq!(project.len(), 1);
        assert_eq!(project.get(project.root()).unwrap().kind, ReflectionKind::Project);
        assert!(project.modules().is_empty());
    }

    #[test]
    fn add_reflection_links_parent_and_child() {
        let mut project = Project::new("docs");
        let module = project.add_module("math");
        let add = project
            .add_reflection(module, "add", ReflectionKind::Function)
            .unwrap();

        assert_eq!(project.children_of(project.root()), &[module]);
        assert_eq!(project.children_of(module), &[add]);
        assert_eq!(project.parent_of(add), Some(module));
    }

    #[test]
    fn add_reflection_rejects_unknown_parent() {
        let mut project = Project::new("docs");
        let module = project.add_module("math");
        project.remove_reflection(module).unwrap();

        let err = project
            .add_reflection(module, "add", ReflectionKind::Function)
            .unwrap_err();
        assert!(matches!(err, DocsError::UnknownReflection { id } if id == module));
    }

    #[test]
    fn remove_reflection_drops_subtree_and_detaches() {
        let mut project = Project::new("docs");
        let module = project.add_module("math");
        let class = project
            .add_reflection(module, "Vector", ReflectionKind::Class)
            .unwrap();
        let method = project
            .add_reflection(class, "length", ReflectionKind::Function)
            .unwrap();

        project.remove_reflection(module).unwrap();

        assert!(!project.contains(module));
        assert!(!project.contains(class));
        assert!(!project.contains(method));
        assert!(project.children_of(project.root()).is_empty());
    }

    #[test]
    fn remove_reflection_keeps_moved_children() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let b = project.add_module("b");
        let item = project
            .add_reflection(a, "item", ReflectionKind::Variable)
            .unwrap();

        // item is still listed under `a` but now belongs to `b`
        project.get_mut(item).unwrap().parent = Some(b);
        project.get_mut(b).unwrap().children.push(item);

        project.remove_reflection(a).unwrap();

        assert!(project.contains(item));
        assert_eq!(project.children_of(b), &[item]);
    }

    #[test]
    fn move_reflection_relinks_both_parents() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let b = project.add_module("b");
        let item = project
            .add_reflection(a, "item", ReflectionKind::Variable)
            .unwrap();

        project.move_reflection(item, b).unwrap();

        assert!(project.children_of(a).is_empty());
        assert_eq!(project.children_of(b), &[item]);
        assert_eq!(project.parent_of(item), Some(b));
    }

    #[test]
    fn modules_include_nested_modules_only() {
        let mut project = Project::new("docs");
        let outer = project.add_module("outer");
        let ns = project
            .add_reflection(outer, "ns", ReflectionKind::Namespace)
            .unwrap();
        let inner = project
            .add_reflection(ns, "outer/inner", ReflectionKind::Module)
            .unwrap();

        assert_eq!(project.modules(), vec![outer, inner]);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut project = Project::new("docs");
        let root = project.root();
        assert!(matches!(
            project.remove_reflection(root),
            Err(DocsError::RootRemoval)
        ));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut project = Project::new("docs");
        let first = project.add_module("first");
        project.remove_reflection(first).unwrap();
        let second = project.add_module("second");
        assert_ne!(first, second);
    }

    #[test]
    fn json_roundtrip_preserves_order() {
        let mut project = Project::new("docs");
        let b = project.add_module("b");
        let a = project.add_module("a");
        project
            .add_reflection(b, "helper", ReflectionKind::Function)
            .unwrap();

        let json = serde_json::to_string(&project).unwrap();
        let restored: Project = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.modules(), vec![b, a]);
        assert_eq!(restored.children_of(b).len(), 1);
        assert_eq!(restored.name(), "docs");
    }
}
