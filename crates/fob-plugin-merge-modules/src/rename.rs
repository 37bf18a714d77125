use fob_docs::{DeclarationNode, DeclarationNodeKind, Reflection};

const DEFAULT_EXPORT_NAME: &str = "default";

/// Renames a `default` export to the identifier of the exported declaration.
///
/// Only variable, function, class and interface declarations that carry an identifier
/// are considered. Returns `true` if the reflection was renamed.
pub fn rename_default_export(reflection: &mut Reflection, node: Option<&DeclarationNode>) -> bool {
    if reflection.name != DEFAULT_EXPORT_NAME {
        return false;
    }

    let Some(node) = node else {
        return false;
    };
    let renamable = matches!(
        node.kind,
        DeclarationNodeKind::Variable
            | DeclarationNodeKind::Function
            | DeclarationNodeKind::Class
            | DeclarationNodeKind::Interface
    );
    if !renamable {
        return false;
    }

    match node.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => {
            reflection.name = name.to_string();
            true
        }
        None => false,
    }
}
