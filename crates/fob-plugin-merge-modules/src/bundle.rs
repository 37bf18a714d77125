//! A group of modules that is merged into one target module.

use fob_docs::{remove_tag_from_comment, Project, Reflection, ReflectionId};
use rustc_hash::FxHashSet;

/// Comment tag that marks the module the rest of its bundle is merged into.
pub const TARGET_MODULE_TAG: &str = "@mergeTarget";

/// Ordered set of modules slated to be merged.
///
/// Bundles are built by a [`GroupingStrategy`](crate::GroupingStrategy) and consumed by
/// [`merge`](Self::merge), so a bundle cannot be merged twice.
#[derive(Debug, Clone)]
pub struct ModuleBundle {
    name: String,
    modules: Vec<ReflectionId>,
}

impl ModuleBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modules(&self) -> &[ReflectionId] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Appends a module. Duplicates are not filtered.
    pub fn add(&mut self, module: ReflectionId) {
        self.modules.push(module);
    }

    /// Module that survives the merge.
    ///
    /// In order of preference: the first module tagged `@mergeTarget`, the first module
    /// with a documentation summary, the first module.
    pub fn target_module(&self, project: &Project) -> Option<ReflectionId> {
        let present: Vec<&Reflection> = self
            .modules
            .iter()
            .filter_map(|id| project.get(*id))
            .collect();

        present
            .iter()
            .find(|module| module.has_tag(TARGET_MODULE_TAG))
            .or_else(|| present.iter().find(|module| module.has_summary()))
            .or_else(|| present.first())
            .map(|module| module.id)
    }

    /// Merges every module of the bundle into the target module.
    ///
    /// Children of all modules are moved, in bundle order, below the target; the marker
    /// tag is stripped from the target; the other modules are emptied and removed from
    /// the project. Returns the number of removed modules.
    pub fn merge(self, project: &mut Project) -> usize {
        let modules: Vec<ReflectionId> = self
            .modules
            .iter()
            .copied()
            .filter(|id| {
                let present = project.contains(*id);
                if !present {
                    tracing::warn!(
                        bundle = %self.name,
                        module = %id,
                        "skipping module that is no longer part of the project"
                    );
                }
                present
            })
            .collect();

        let Some(target) = self.target_module(project) else {
            tracing::debug!(bundle = %self.name, "nothing to merge in empty bundle");
            return 0;
        };

        let bundled: FxHashSet<ReflectionId> = modules.iter().copied().collect();

        // The target must not stay below a module that is about to be removed, and none
        // of its ancestors may end up among its own children.
        self.lift_out_of_bundled_ancestors(project, target, &bundled);

        let children: Vec<ReflectionId> = modules
            .iter()
            .flat_map(|id| project.children_of(*id).to_vec())
            .filter(|child| !bundled.contains(child))
            .collect();

        if let Some(module) = project.get_mut(target) {
            remove_tag_from_comment(module, TARGET_MODULE_TAG);
        }

        for child in &children {
            if let Some(reflection) = project.get_mut(*child) {
                reflection.parent = Some(target);
            }
        }
        let child_count = children.len();
        if let Some(module) = project.get_mut(target) {
            module.children = children;
        }

        let mut removed = 0;
        for module in modules.iter().copied().filter(|id| *id != target) {
            if let Some(reflection) = project.get_mut(module) {
                reflection.children.clear();
            }
            match project.remove_reflection(module) {
                Ok(()) => removed += 1,
                Err(error) => {
                    tracing::warn!(
                        bundle = %self.name,
                        module = %module,
                        "failed to remove merged module: {error}"
                    )
                }
            }
        }

        tracing::debug!(
            bundle = %self.name,
            target = %target,
            children = child_count,
            removed,
            "merged module bundle"
        );
        removed
    }

    /// Re-attaches the target to the parent of its outermost bundled ancestor.
    ///
    /// Anything between that ancestor and the target (namespaces, nested modules) stays
    /// where it is and is collected with the rest of the bundle's children.
    fn lift_out_of_bundled_ancestors(
        &self,
        project: &mut Project,
        target: ReflectionId,
        bundled: &FxHashSet<ReflectionId>,
    ) {
        let mut outermost = None;
        let mut current = project.parent_of(target);
        while let Some(ancestor) = current {
            if bundled.contains(&ancestor) {
                outermost = Some(ancestor);
            }
            current = project.parent_of(ancestor);
        }

        let Some(anchor) = outermost.and_then(|ancestor| project.parent_of(ancestor)) else {
            return;
        };
        if let Err(error) = project.move_reflection(target, anchor) {
            tracing::warn!(
                bundle = %self.name,
                target = %target,
                "failed to re-attach target module: {error}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fob_docs::{Comment, CommentTag, ReflectionKind};

    fn bundle_of(modules: &[ReflectionId]) -> ModuleBundle {
        let mut bundle = ModuleBundle::new("test");
        for module in modules {
            bundle.add(*module);
        }
        bundle
    }

    #[test]
    fn target_falls_back_to_first_module() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let b = project.add_module("b");
        assert_eq!(bundle_of(&[a, b]).target_module(&project), Some(a));
    }

    #[test]
    fn documented_module_beats_declaration_order() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let b = project.add_module("b");
        project.get_mut(a).unwrap().comment = Some(Comment::new(""));
        project.get_mut(b).unwrap().comment = Some(Comment::new("Documented."));
        assert_eq!(bundle_of(&[a, b]).target_module(&project), Some(b));
    }

    #[test]
    fn tagged_module_beats_documented_module() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let b = project.add_module("b");
        let c = project.add_module("c");
        project.get_mut(a).unwrap().comment = Some(Comment::new("Documented."));
        project.get_mut(b).unwrap().comment =
            Some(Comment::default().with_tag(CommentTag::new("@MergeTarget", "")));
        project.get_mut(c).unwrap().comment =
            Some(Comment::default().with_tag(CommentTag::new("@mergeTarget", "")));
        assert_eq!(bundle_of(&[a, b, c]).target_module(&project), Some(b));
    }

    #[test]
    fn empty_bundle_is_a_noop() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        assert_eq!(ModuleBundle::new("empty").merge(&mut project), 0);
        assert!(project.contains(a));
    }

    #[test]
    fn single_module_bundle_only_strips_tag() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let x = project
            .add_reflection(a, "x", ReflectionKind::Function)
            .unwrap();
        project.get_mut(a).unwrap().comment = Some(
            Comment::new("Docs.").with_tag(CommentTag::new("@mergeTarget", "")),
        );

        assert_eq!(bundle_of(&[a]).merge(&mut project), 0);

        let module = project.get(a).unwrap();
        assert_eq!(module.children, vec![x]);
        assert!(!module.has_tag(TARGET_MODULE_TAG));
        assert_eq!(module.comment.as_ref().unwrap().summary, "Docs.");
    }

    #[test]
    fn stale_ids_are_skipped() {
        let mut project = Project::new("docs");
        let gone = project.add_module("gone");
        let a = project.add_module("a");
        let b = project.add_module("b");
        let y = project
            .add_reflection(b, "y", ReflectionKind::Variable)
            .unwrap();
        project.remove_reflection(gone).unwrap();

        assert_eq!(bundle_of(&[gone, a, b]).merge(&mut project), 1);
        assert_eq!(project.children_of(a), &[y]);
        assert_eq!(project.modules(), vec![a]);
    }

    #[test]
    fn nested_target_is_lifted_to_surviving_ancestor() {
        let mut project = Project::new("docs");
        let outer = project.add_module("outer");
        let inner = project
            .add_reflection(outer, "outer/inner", ReflectionKind::Module)
            .unwrap();
        let f = project
            .add_reflection(outer, "f", ReflectionKind::Function)
            .unwrap();
        let g = project
            .add_reflection(inner, "g", ReflectionKind::Function)
            .unwrap();
        project.get_mut(inner).unwrap().comment =
            Some(Comment::default().with_tag(CommentTag::new("@mergeTarget", "")));

        assert_eq!(bundle_of(&[outer, inner]).merge(&mut project), 1);

        assert!(!project.contains(outer));
        assert_eq!(project.parent_of(inner), Some(project.root()));
        assert_eq!(project.children_of(project.root()), &[inner]);
        assert_eq!(project.children_of(inner), &[f, g]);
    }

    #[test]
    fn target_below_namespace_of_bundled_module_is_lifted() {
        let mut project = Project::new("docs");
        let a = project.add_module("a");
        let ns = project
            .add_reflection(a, "ns", ReflectionKind::Namespace)
            .unwrap();
        let x = project
            .add_reflection(a, "x", ReflectionKind::Variable)
            .unwrap();
        let b = project
            .add_reflection(ns, "b", ReflectionKind::Module)
            .unwrap();
        let y = project
            .add_reflection(ns, "y", ReflectionKind::Function)
            .unwrap();
        let z = project
            .add_reflection(b, "z", ReflectionKind::Function)
            .unwrap();
        project.get_mut(b).unwrap().comment =
            Some(Comment::default().with_tag(CommentTag::new("@mergeTarget", "")));

        assert_eq!(bundle_of(&[a, b]).merge(&mut project), 1);

        assert!(!project.contains(a));
        assert_eq!(project.parent_of(b), Some(project.root()));
        assert_eq!(project.children_of(project.root()), &[b]);
        assert_eq!(project.children_of(b), &[ns, x, z]);
        assert_eq!(project.parent_of(ns), Some(b));
        assert_eq!(project.children_of(ns), &[y]);

        // every surviving node reaches the root without revisiting a node
        for node in [b, ns, x, y, z] {
            let mut seen = vec![node];
            let mut current = project.parent_of(node);
            while let Some(parent) = current {
                assert!(!seen.contains(&parent), "cycle through {parent}");
                seen.push(parent);
                current = project.parent_of(parent);
            }
            assert_eq!(seen.last(), Some(&project.root()));
        }
    }
}
