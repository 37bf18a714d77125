//! Converter hook contract.
//!
//! The host builds the documentation tree and drives registered plugins through three
//! lifecycle points:
//!
//! ```text
//! begin ──▶ create_declaration (once per node) ──▶ resolve_begin ──▶ render
//! ```
//!
//! Plugins only see plain data: the resolved settings at `begin`, the freshly created
//! reflection (plus an optional syntax classification) at `create_declaration`, and the
//! finished tree at `resolve_begin`.

use std::borrow::Cow;

use figment::Figment;

use crate::model::ReflectionId;
use crate::project::Project;

/// State handed to plugins when a conversion starts.
#[derive(Debug, Clone)]
pub struct ConverterContext {
    /// Host settings. Plugins extract their own section from it.
    pub settings: Figment,
}

impl ConverterContext {
    pub fn new(settings: Figment) -> Self {
        Self { settings }
    }
}

impl Default for ConverterContext {
    fn default() -> Self {
        Self::new(Figment::new())
    }
}

/// Syntax shape of the declaration a reflection was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationNodeKind {
    Variable,
    Function,
    Class,
    Interface,
    Other,
}

/// Host-provided view of the syntax node behind a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    pub kind: DeclarationNodeKind,
    /// Identifier text, when the declaration is named.
    pub name: Option<String>,
}

impl DeclarationNode {
    pub fn named(kind: DeclarationNodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
        }
    }

    pub fn anonymous(kind: DeclarationNodeKind) -> Self {
        Self { kind, name: None }
    }
}

/// Lifecycle hooks a documentation plugin can subscribe to.
///
/// All hooks default to no-ops.
pub trait ConverterPlugin {
    fn name(&self) -> Cow<'static, str>;

    /// Fires once before any declaration is converted.
    fn begin(&mut self, _ctx: &ConverterContext) {}

    /// Fires for every declaration reflection the host creates.
    fn create_declaration(
        &mut self,
        _project: &mut Project,
        _reflection: ReflectionId,
        _node: Option<&DeclarationNode>,
    ) {
    }

    /// Fires once after the tree is complete and before it is resolved.
    fn resolve_begin(&mut self, _project: &mut Project) {}
}

/// Minimal event dispatcher used by hosts to drive registered plugins.
#[derive(Default)]
pub struct Converter {
    plugins: Vec<Box<dyn ConverterPlugin>>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin. Hooks fire in registration order.
    pub fn register(&mut self, plugin: Box<dyn ConverterPlugin>) {
        tracing::debug!(plugin = %plugin.name(), "registered converter plugin");
        self.plugins.push(plugin);
    }

    /// Names of the registered plugins.
    pub fn plugin_names(&self) -> Vec<Cow<'static, str>> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    pub fn emit_begin(&mut self, ctx: &ConverterContext) {
        for plugin in &mut self.plugins {
            plugin.begin(ctx);
        }
    }

    pub fn emit_create_declaration(
        &mut self,
        project: &mut Project,
        reflection: ReflectionId,
        node: Option<&DeclarationNode>,
    ) {
        for plugin in &mut self.plugins {
            plugin.create_declaration(project, reflection, node);
        }
    }

    pub fn emit_resolve_begin(&mut self, project: &mut Project) {
        for plugin in &mut self.plugins {
            plugin.resolve_begin(project);
        }
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
