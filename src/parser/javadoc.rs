use super::defs::TagDef;

/// Doc comment split into its main text and block tags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JavaDoc {
    pub comment: String,
    pub tags: Vec<TagDef>,
}

/// Split a `/** ... */` comment starting on `line`.
///
/// Leading `*` gutters are stripped from every line. A line whose first
/// non-blank character is `@` opens a block tag that runs until the next tag;
/// everything before the first tag is the comment text.
pub fn parse_javadoc(text: &str, line: usize) -> JavaDoc {
    let inner = text.strip_prefix("/**").unwrap_or(text);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    let mut comment_lines: Vec<&str> = Vec::new();
    let mut tags: Vec<TagDef> = Vec::new();
    let mut current: Option<(String, Vec<String>, usize)> = None;

    for (index, raw) in inner.lines().enumerate() {
        let content = strip_gutter(raw);
        if let Some(rest) = content.strip_prefix('@') {
            let name_len = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            if name_len > 0 {
                if let Some(tag) = current.take() {
                    tags.push(finish_tag(tag));
                }
                let value = rest[name_len..].trim().to_string();
                current = Some((rest[..name_len].to_string(), vec![value], line + index));
                continue;
            }
        }
        match current.as_mut() {
            Some((_, value, _)) => value.push(content.trim_end().to_string()),
            None => comment_lines.push(content.trim_end()),
        }
    }
    if let Some(tag) = current.take() {
        tags.push(finish_tag(tag));
    }

    JavaDoc {
        comment: comment_lines.join("\n").trim().to_string(),
        tags,
    }
}

fn strip_gutter(line: &str) -> &str {
    let trimmed = line.trim_start();
    let without_stars = trimmed.trim_start_matches('*');
    if without_stars.len() == trimmed.len() {
        return trimmed;
    }
    without_stars.strip_prefix(' ').unwrap_or(without_stars)
}

fn finish_tag((name, value, line): (String, Vec<String>, usize)) -> TagDef {
    TagDef {
        name,
        value: value.join("\n").trim().to_string(),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_comment_and_tags() {
        let doc = parse_javadoc(
            "/**\n * Adds two numbers.\n *\n * @param a first\n *   operand\n * @return the sum\n */",
            10,
        );
        assert_eq!(doc.comment, "Adds two numbers.");
        assert_eq!(doc.tags.len(), 2);
        assert_eq!(doc.tags[0].name, "param");
        assert_eq!(doc.tags[0].value, "a first\n  operand");
        assert_eq!(doc.tags[0].line, 13);
        assert_eq!(doc.tags[1].name, "return");
        assert_eq!(doc.tags[1].value, "the sum");
    }

    #[test]
    fn single_line_comment() {
        let doc = parse_javadoc("/** Hello world */", 1);
        assert_eq!(doc.comment, "Hello world");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn inline_at_sign_is_not_a_tag() {
        let doc = parse_javadoc("/** Mail me @ home\n * @deprecated */", 1);
        assert_eq!(doc.comment, "Mail me @ home");
        assert_eq!(doc.tags[0].name, "deprecated");
        assert_eq!(doc.tags[0].value, "");
    }
}
