use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stable identifier of a reflection inside a [`Project`](crate::Project).
///
/// Identifiers are handed out in creation order and never reused within a project, so
/// a removed reflection's id stays dangling instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectionId(u32);

impl ReflectionId {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ReflectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Enumerates the node kinds the documentation tree can hold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionKind {
    Project,
    Module,
    Namespace,
    Class,
    Interface,
    Function,
    Variable,
    TypeAlias,
    Enum,
    #[default]
    Other,
}

/// A single node of the documentation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    /// Identifier of this node inside its project.
    pub id: ReflectionId,
    /// Display name (for modules usually the path-like module name).
    pub name: String,
    /// Node kind.
    pub kind: ReflectionKind,
    /// Parsed documentation comment, if the declaration had one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<Comment>,
    /// Originating source file.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<PathBuf>,
    /// Ordered child nodes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<ReflectionId>,
    /// Back-reference to the owning node. `None` only for the project root.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<ReflectionId>,
}

impl Reflection {
    pub(crate) fn new(
        id: ReflectionId,
        name: impl Into<String>,
        kind: ReflectionKind,
        parent: Option<ReflectionId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            comment: None,
            source: None,
            children: Vec::new(),
            parent,
        }
    }

    /// Returns `true` if the node is a module.
    pub fn is_module(&self) -> bool {
        self.kind == ReflectionKind::Module
    }

    /// Returns `true` if the comment carries a block tag named `tag` (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.comment
            .as_ref()
            .is_some_and(|comment| comment.has_tag(tag))
    }

    /// Returns `true` if the comment has a non-empty summary.
    pub fn has_summary(&self) -> bool {
        self.comment.as_ref().is_some_and(Comment::has_summary)
    }
}

/// Structured documentation comment: free-form summary followed by block tags.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Summary text before any tags.
    #[serde(default)]
    pub summary: String,
    /// Block tags in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub block_tags: Vec<CommentTag>,
}

impl Comment {
    /// Creates a comment with the given summary and no tags.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            block_tags: Vec::new(),
        }
    }

    /// Builder-style helper that appends a block tag.
    pub fn with_tag(mut self, tag: CommentTag) -> Self {
        self.block_tags.push(tag);
        self
    }

    /// Returns `true` when the summary text is non-empty.
    pub fn has_summary(&self) -> bool {
        !self.summary.is_empty()
    }

    /// Returns `true` if any block tag matches `tag` case-insensitively.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.block_tags.iter().any(|block| block.matches(tag))
    }

    /// Removes the last block tag matching `tag` case-insensitively.
    ///
    /// Returns the removed tag, or `None` when nothing matched.
    pub fn remove_last_tag(&mut self, tag: &str) -> Option<CommentTag> {
        let index = self.block_tags.iter().rposition(|block| block.matches(tag))?;
        Some(self.block_tags.remove(index))
    }
}

/// A named block tag such as `@remarks` or `@mergeTarget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentTag {
    /// Tag name including the leading `@`.
    pub tag: String,
    /// Tag body.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub content: String,
}

impl CommentTag {
    /// Creates a tag. A missing `@` prefix is added.
    pub fn new(tag: impl Into<String>, content: impl Into<String>) -> Self {
        let tag = tag.into();
        let tag = if tag.starts_with('@') {
            tag
        } else {
            format!("@{tag}")
        };
        Self {
            tag,
            content: content.into(),
        }
    }

    /// Case-insensitive comparison against a tag name (with or without `@`).
    pub fn matches(&self, tag: &str) -> bool {
        let wanted = tag.strip_prefix('@').unwrap_or(tag);
        let own = self.tag.strip_prefix('@').unwrap_or(&self.tag);
        own.to_lowercase() == wanted.to_lowercase()
    }
}
