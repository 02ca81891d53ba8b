use pulldown_cmark::Event::{Code, End, HardBreak, Rule, SoftBreak, Start, Text};
use pulldown_cmark::{Options, Parser, Tag};

/// Default number of plain chars kept in an article excerpt.
pub const DEFAULT_EXCERPT_LENGTH: usize = 140;

/// Extract the excerpt from markdown (or MDX) content.
///
/// The whole body is converted into plain text with whitespace collapsed,
/// then pruned to at most `length` chars on a word boundary. A pruned
/// excerpt ends with `…`.
pub fn extract_excerpt(markdown: &str, length: usize) -> String {
    // MDX module statements carry no readable text.
    let body = markdown
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with("import ") || line.starts_with("export "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let text = strip_markdown(&body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    prune(&text, length)
}

fn prune(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_owned();
    }

    let head = text.chars().take(length).collect::<String>();
    // Only cut on a boundary if the next char doesn't continue the word.
    let next_is_space = text
        .chars()
        .nth(length)
        .map(char::is_whitespace)
        .unwrap_or(true);
    let mut excerpt = if next_is_space {
        head
    } else {
        match head.rfind(' ') {
            Some(index) => head[..index].to_owned(),
            None => head,
        }
    };
    excerpt.truncate(excerpt.trim_end().len());
    excerpt.push('…');
    excerpt
}

/// Convert markdown into plain text.
#[must_use]
pub fn strip_markdown(markdown: &str) -> String {
    // GFM tables and tasks lists are not enabled.
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut buffer = String::new();

    for event in parser {
        match event {
            // Start and end events don't carry the text inside the tag,
            // that's handled by the `Text` arm.
            Start(tag) => start_tag(&tag, &mut buffer),
            End(tag) => end_tag(&tag, &mut buffer),
            Text(text) => buffer.push_str(&text),
            Code(code) => buffer.push_str(&code),
            SoftBreak | HardBreak | Rule => fresh_line(&mut buffer),
            // Inline html and JSX.
            _ => (),
        }
    }
    buffer
}

fn start_tag(tag: &Tag, buffer: &mut String) {
    match tag {
        Tag::CodeBlock(_) | Tag::List(_) => fresh_line(buffer),
        Tag::Link(_, _, title) => {
            if !title.is_empty() {
                buffer.push_str(title);
            }
        }
        _ => (),
    }
}

fn end_tag(tag: &Tag, buffer: &mut String) {
    match tag {
        Tag::Table(_)
        | Tag::TableHead
        | Tag::TableRow
        | Tag::Heading(..)
        | Tag::BlockQuote
        | Tag::CodeBlock(_)
        | Tag::Paragraph
        | Tag::Item => fresh_line(buffer),
        _ => (),
    }
}

fn fresh_line(buffer: &mut String) {
    buffer.push('\n');
}
