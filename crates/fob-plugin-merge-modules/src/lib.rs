//! Documentation plugin that merges modules
//!
//! Generated API documentation is usually split along file boundaries. This plugin
//! folds several documentation modules into a single target module once the
//! documentation tree is built and before it is rendered.
//!
//! ## Modes
//!
//! - **`project`**: every module of the project is merged into one.
//! - **`module`**: modules are bundled by a key (module name, containing directory, or a
//!   regular expression) and each bundle is merged on its own.
//! - **`off`**: the plugin does nothing.
//!
//! Inside a bundle the surviving module is the first one tagged `@mergeTarget`, else the
//! first documented one, else the first one. The tag is removed from the output.
//!
//! ## Example Usage
//!
//! ```rust
//! use fob_docs::{Converter, ConverterContext, Project, ReflectionKind};
//! use fob_plugin_merge_modules::MergeModulesPlugin;
//!
//! let mut project = Project::new("my-lib");
//! let strings = project.add_module("strings");
//! let numbers = project.add_module("numbers");
//! project.add_reflection(strings, "pad", ReflectionKind::Function).unwrap();
//! project.add_reflection(numbers, "clamp", ReflectionKind::Function).unwrap();
//!
//! let mut converter = Converter::new();
//! converter.register(Box::new(MergeModulesPlugin::new()));
//! converter.emit_begin(&ConverterContext::default());
//! converter.emit_resolve_begin(&mut project);
//!
//! assert_eq!(project.modules(), vec![strings]);
//! assert_eq!(project.children_of(strings).len(), 2);
//! ```

use std::borrow::Cow;

use fob_docs::{ConverterContext, ConverterPlugin, DeclarationNode, Project, ReflectionId};

pub mod bundle;
pub mod config;
pub mod error;
pub mod grouping;
pub mod merger;
pub mod rename;

pub use bundle::{ModuleBundle, TARGET_MODULE_TAG};
pub use config::{MergeMode, MergeModulesConfig, MergeOptions};
pub use error::{ConfigError, Result};
pub use grouping::{GroupBy, GroupingStrategy};
pub use merger::{MergeReport, ModuleMerger};
pub use rename::rename_default_export;

/// Converter plugin that merges documentation modules.
///
/// # Architecture
///
/// ```text
/// begin ─▶ resolve options
/// create_declaration ─▶ rename `default` exports
/// resolve_begin ─▶ ModuleMerger ─▶ ModuleBundle::merge (per bundle)
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergeModulesPlugin {
    options: MergeOptions,
    last_report: Option<MergeReport>,
}

impl MergeModulesPlugin {
    /// Plugin with default options. The options are replaced from the host settings
    /// when the conversion begins.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MergeOptions) -> Self {
        Self {
            options,
            last_report: None,
        }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.is_enabled()
    }

    /// Report of the most recent merge, if one ran.
    pub fn last_report(&self) -> Option<MergeReport> {
        self.last_report
    }
}

impl ConverterPlugin for MergeModulesPlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-merge-modules".into()
    }

    fn begin(&mut self, ctx: &ConverterContext) {
        self.options = MergeOptions::from_settings(&ctx.settings);
        self.last_report = None;
    }

    fn create_declaration(
        &mut self,
        project: &mut Project,
        reflection: ReflectionId,
        node: Option<&DeclarationNode>,
    ) {
        if !self.is_enabled() || !self.options.rename_defaults {
            return;
        }
        if let Some(reflection) = project.get_mut(reflection) {
            rename_default_export(reflection, node);
        }
    }

    fn resolve_begin(&mut self, project: &mut Project) {
        if let Some(merger) = ModuleMerger::for_mode(&self.options.mode) {
            self.last_report = Some(merger.execute(project));
        }
    }
}
