#![deny(clippy::all)]

//! In-memory documentation tree for Fob documentation tooling.
//!
//! This crate provides:
//! - An arena-backed [`Project`] of [`Reflection`]s with id-based parent links.
//! - A comment model with block tags and a parser for JSDoc / TSDoc blocks.
//! - The converter hook contract ([`ConverterPlugin`]) plugins use to rewrite the tree
//!   between conversion and rendering.

pub mod error;
pub mod jsdoc;
pub mod model;
pub mod plugin;
pub mod project;
pub mod tags;

pub use error::{DocsError, Result};
pub use jsdoc::parse_comment;
pub use model::{Comment, CommentTag, Reflection, ReflectionId, ReflectionKind};
pub use plugin::{
    Converter, ConverterContext, ConverterPlugin, DeclarationNode, DeclarationNodeKind,
};
pub use project::Project;
pub use tags::remove_tag_from_comment;
