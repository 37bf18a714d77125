//! Partitioning of project modules into bundles.

use std::path::{Component, Path};

use fob_docs::{Project, Reflection};
use indexmap::IndexMap;
use regex::Regex;

use crate::bundle::ModuleBundle;

/// Name of the single bundle produced by [`GroupingStrategy::Project`].
const PROJECT_BUNDLE: &str = "project";

/// Key used to put modules of the same group into one bundle.
#[derive(Debug, Clone)]
pub enum GroupBy {
    /// Modules with identical names are merged.
    Name,
    /// Modules in the same directory are merged. `depth` limits how many leading
    /// directory components take part in the key.
    Directory { depth: Option<usize> },
    /// The first capture group (or the whole match) of the pattern applied to the module
    /// name. Modules that do not match are left alone.
    Pattern(Regex),
}

impl GroupBy {
    /// Bundle key for `module`, or `None` when the module takes no part in merging.
    pub fn key(&self, module: &Reflection) -> Option<String> {
        match self {
            Self::Name => Some(module.name.clone()),
            Self::Directory { depth } => Some(directory_key(module, *depth)),
            Self::Pattern(pattern) => {
                let captures = pattern.captures(&module.name)?;
                captures
                    .get(1)
                    .or_else(|| captures.get(0))
                    .map(|matched| matched.as_str().to_string())
            }
        }
    }
}

fn directory_key(module: &Reflection, depth: Option<usize>) -> String {
    let path = module
        .source
        .as_deref()
        .unwrap_or_else(|| Path::new(&module.name));

    let components = path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .take(depth.unwrap_or(usize::MAX))
        .collect::<Vec<_>>();

    if components.is_empty() {
        ".".to_string()
    } else {
        components.join("/")
    }
}

/// Decides how the modules of a project are split into bundles.
#[derive(Debug, Clone)]
pub enum GroupingStrategy {
    /// One bundle with every module of the project.
    Project,
    /// One bundle per distinct [`GroupBy`] key.
    Module(GroupBy),
}

impl GroupingStrategy {
    /// Build the bundles for `project`.
    ///
    /// Bundles keep the project's module order, and keyed bundles are ordered by the
    /// first module that produced their key.
    pub fn bundles(&self, project: &Project) -> Vec<ModuleBundle> {
        let modules = project.modules();
        match self {
            Self::Project => {
                if modules.is_empty() {
                    return Vec::new();
                }
                let mut bundle = ModuleBundle::new(PROJECT_BUNDLE);
                for module in modules {
                    bundle.add(module);
                }
                vec![bundle]
            }
            Self::Module(group_by) => {
                let mut bundles: IndexMap<String, ModuleBundle> = IndexMap::new();
                for id in modules {
                    let Some(key) = project.get(id).and_then(|module| group_by.key(module))
                    else {
                        continue;
                    };
                    bundles
                        .entry(key.clone())
                        .or_insert_with(|| ModuleBundle::new(key))
                        .add(id);
                }
                bundles.into_values().collect()
            }
        }
    }
}
