use crate::model::{CommentTag, Reflection};

/// Removes a block tag from the comment of `reflection`.
///
/// Matching is case-insensitive. When the tag occurs more than once, the last
/// occurrence is removed. Reflections without a comment or without a matching tag are
/// left untouched.
pub fn remove_tag_from_comment(reflection: &mut Reflection, tag: &str) -> Option<CommentTag> {
    reflection
        .comment
        .as_mut()
        .and_then(|comment| comment.remove_last_tag(tag))
}
