use crate::model::{Comment, CommentTag};

/// Parse a JSDoc / TSDoc block into a [`Comment`].
///
/// Accepts the comment with or without its `/** */` delimiters. Lines before the first
/// `@tag` form the summary; every `@tag` line opens a block tag whose content continues
/// until the next tag. Inline tags such as `{@link Foo}` are left in the text.
pub fn parse_comment(raw: &str) -> Comment {
    let mut summary_lines = Vec::new();
    let mut tags: Vec<(String, Vec<String>)> = Vec::new();

    for line in normalize_lines(strip_delimiters(raw)) {
        if let Some(rest) = line.strip_prefix('@') {
            let (tag, payload) = split_tag_payload(rest);
            if !tag.is_empty() {
                let mut content = Vec::new();
                if !payload.is_empty() {
                    content.push(payload.to_string());
                }
                tags.push((format!("@{tag}"), content));
                continue;
            }
        }

        match tags.last_mut() {
            Some((_, content)) => {
                if !line.is_empty() || !content.is_empty() {
                    content.push(line);
                }
            }
            None => summary_lines.push(line),
        }
    }

    Comment {
        summary: compose_text(summary_lines, " "),
        block_tags: tags
            .into_iter()
            .map(|(tag, content)| CommentTag {
                tag,
                content: compose_text(content, "\n"),
            })
            .collect(),
    }
}

fn strip_delimiters(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("/**").unwrap_or(trimmed);
    trimmed.strip_suffix("*/").unwrap_or(trimmed)
}

fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.trim().to_string()
        })
        .collect()
}

fn compose_text(lines: Vec<String>, separator: &str) -> String {
    let lines = lines
        .into_iter()
        .skip_while(|line| line.is_empty())
        .collect::<Vec<_>>();
    lines.join(separator).trim().to_string()
}

fn split_tag_payload(input: &str) -> (&str, &str) {
    let mut parts = input.splitn(2, char::is_whitespace);
    let tag = parts.next().unwrap_or("");
    let payload = parts.next().unwrap_or("").trim();
    (tag, payload)
}
