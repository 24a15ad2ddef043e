//! Minimal YAML frontmatter handling: split it off and read its tag list.

/// Split `---`-delimited frontmatter from the body.
/// Returns `(frontmatter, body)`; frontmatter is `None` when absent or unterminated.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed
        .strip_prefix("---\n")
        .or_else(|| trimmed.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Tags declared in frontmatter, either inline (`tags: [a, b]`, `tags: a, b`)
/// or as a block list (`tags:` followed by `- a` lines).
pub fn tags(frontmatter: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_block = false;

    for line in frontmatter.lines() {
        if in_block {
            let item = line.trim_start();
            if let Some(value) = item.strip_prefix("- ") {
                push_tag(&mut out, value);
                continue;
            }
            if item.is_empty() {
                continue;
            }
            in_block = false;
        }

        let Some(value) = line
            .strip_prefix("tags:")
            .or_else(|| line.strip_prefix("tag:"))
        else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            in_block = true;
            continue;
        }
        let inner = value.trim_start_matches('[').trim_end_matches(']');
        for part in inner.split(',') {
            push_tag(&mut out, part);
        }
    }
    out
}

fn push_tag(out: &mut Vec<String>, raw: &str) {
    let tag = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_start_matches('#');
    if !tag.is_empty() {
        out.push(tag.to_string());
    }
}
