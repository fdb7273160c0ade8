use std::{collections::HashMap, path::Path, sync::LazyLock};

use chrono::{DateTime, Local, NaiveDate};
use log::debug;
use maud::html;
use pulldown_cmark::{
    html::push_html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;

use crate::error::{self, Error, Result};

use super::{data::Post, utils::title_from_stem};

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*)$").unwrap());

const TOC_MARKER: &str = "[TOC]";

/// Reads one note and renders it into a [`Post`].
pub(super) fn parse_markdown_file(path: &Path) -> Result<Post> {
    debug!("Parsing {path:?}");
    let content = error::read_to_string(path)?;
    let date = modified_date(path)?;
    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let (title, body) = match extract_title(&content) {
        Some((title, body)) => (title, body),
        None => (title_from_stem(&slug), content),
    };

    Ok(Post {
        title,
        date,
        content: markdown_to_html(&body),
        slug,
    })
}

/// Finds the first level-1 heading line and cuts exactly that line out.
pub(super) fn extract_title(content: &str) -> Option<(String, String)> {
    let caps = TITLE_LINE.captures(content)?;
    let line = caps.get(0)?;
    let title = caps[1].trim().to_string();
    let mut body = String::with_capacity(content.len());
    body.push_str(&content[..line.start()]);
    body.push_str(&content[line.end()..]);
    Some((title, body.trim_start().to_string()))
}

/// Local calendar day of the file's last modification.
pub(super) fn modified_date(path: &Path) -> Result<NaiveDate> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::file_read(path, e))?;
    Ok(DateTime::<Local>::from(modified).date_naive())
}

pub(super) fn markdown_to_html(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let events = highlight_code_blocks(Parser::new_ext(body, options));
    let (events, headings) = anchor_headings(events);
    let events = insert_toc(events, &headings);

    let mut out = String::with_capacity(body.len() * 2);
    push_html(&mut out, events.into_iter());
    out
}

/// Lowercase, non-alphanumeric runs collapsed into `-`.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn language_class(info: &str) -> Option<String> {
    let lang: String = info
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        .collect();
    (!lang.is_empty()).then(|| format!("language-{lang}"))
}

/// Wraps every code block into a `codehilite` container; colouring is up to the stylesheet.
fn highlight_code_blocks<'a>(parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut code: Option<(Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let class = match kind {
                    CodeBlockKind::Fenced(info) => language_class(&info),
                    CodeBlockKind::Indented => None,
                };
                code = Some((class, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((class, text)) = code.take() {
                    let block: String = html! {
                        div.codehilite { pre { code class=[class] { (text) } } }
                    }
                    .into();
                    events.push(Event::Html(format!("{block}\n").into()));
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, buf)) = code.as_mut() {
                    buf.push_str(&text);
                }
            }
            _ => events.push(event),
        }
    }
    events
}

struct Heading {
    level: HeadingLevel,
    id: String,
    text: String,
}

/// Gives every heading a unique `id`, the way a table of contents links to it.
fn anchor_headings(events: Vec<Event<'_>>) -> (Vec<Event<'_>>, Vec<Heading>) {
    let mut out = Vec::with_capacity(events.len());
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    // index of the pending Start(Heading) in `out`, and its text so far
    let mut open: Option<(usize, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                open = Some((out.len(), String::new()));
                out.push(event);
            }
            Event::Text(ref t) | Event::Code(ref t) if open.is_some() => {
                if let Some((_, text)) = open.as_mut() {
                    text.push_str(t);
                }
                out.push(event);
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some((start, text)) = open.take() {
                    let id = unique_id(&mut seen, slugify(&text));
                    if let Event::Start(Tag::Heading { id: slot, .. }) = &mut out[start] {
                        if slot.is_none() {
                            *slot = Some(CowStr::from(id.clone()));
                        }
                    }
                    headings.push(Heading { level, id, text });
                }
                out.push(event);
            }
            _ => out.push(event),
        }
    }
    (out, headings)
}

fn unique_id(seen: &mut HashMap<String, usize>, base: String) -> String {
    let base = if base.is_empty() { "_".to_string() } else { base };
    let count = seen.entry(base.clone()).or_insert(0);
    let id = if *count == 0 {
        base
    } else {
        format!("{base}_{count}")
    };
    *count += 1;
    id
}

fn level_number(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn render_toc(headings: &[Heading]) -> String {
    let mut toc = String::from("<div class=\"toc\">\n");
    let mut depth: Vec<usize> = Vec::new();

    for heading in headings {
        let level = level_number(heading.level);
        // close deeper lists, unless the heading still nests below the parent list
        while let [.., parent, top] = depth[..] {
            if top <= level {
                break;
            }
            if parent < level {
                if let Some(top) = depth.last_mut() {
                    *top = level;
                }
                break;
            }
            toc.push_str("</li>\n</ul>\n");
            depth.pop();
        }
        match depth.last() {
            Some(&top) if level > top => {
                toc.push_str("<ul>\n");
                depth.push(level);
            }
            Some(_) => toc.push_str("</li>\n"),
            None => {
                toc.push_str("<ul>\n");
                depth.push(level);
            }
        }
        let item: String = html! { a href={ "#" (heading.id) } { (heading.text) } }.into();
        toc.push_str(&format!("<li>{item}"));
    }
    for _ in &depth {
        toc.push_str("</li>\n</ul>\n");
    }
    toc.push_str("</div>\n");
    toc
}

/// Replaces a paragraph holding nothing but `[TOC]` with the heading list.
fn insert_toc<'a>(events: Vec<Event<'a>>, headings: &[Heading]) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::with_capacity(events.len());
    let mut paragraph: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Paragraph) => paragraph = Some((out.len(), String::new())),
            Event::Text(t) => {
                if let Some((_, text)) = paragraph.as_mut() {
                    text.push_str(t);
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if let Some((start, text)) = paragraph.take() {
                    if text.trim() == TOC_MARKER
                        && out[start + 1..].iter().all(|e| matches!(e, Event::Text(_)))
                    {
                        out.truncate(start);
                        out.push(Event::Html(render_toc(headings).into()));
                        continue;
                    }
                }
            }
            _ => {}
        }
        out.push(event);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::{fs::File, time::SystemTime};

    fn write_note(dir: &Path, name: &str, body: &str, ymd: (i32, u32, u32)) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        let when = Local
            .with_ymd_and_hms(ymd.0, ymd.1, ymd.2, 12, 0, 0)
            .unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::from(when))
            .unwrap();
        path
    }

    #[test]
    fn first_level_one_heading_is_the_title() {
        let (title, body) = extract_title("# Hello World  \n\nSome text.\n").unwrap();
        assert_eq!(title, "Hello World");
        assert_eq!(body, "Some text.\n");
    }

    #[test]
    fn only_the_first_heading_is_removed() {
        let (title, body) = extract_title("# One\ntext\n# Two\n").unwrap();
        assert_eq!(title, "One");
        assert_eq!(body, "text\n# Two\n");
    }

    #[test]
    fn deeper_headings_are_not_titles() {
        assert!(extract_title("## Section\n### Sub\n#hashtag\n").is_none());
        let (title, body) = extract_title("intro\n## Section\n# Real\nrest").unwrap();
        assert_eq!(title, "Real");
        assert_eq!(body, "intro\n## Section\n\nrest");
    }

    #[test]
    fn crlf_heading() {
        let (title, body) = extract_title("# Windows\r\nbody\r\n").unwrap();
        assert_eq!(title, "Windows");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn renders_inline_and_tables() {
        let html = markdown_to_html("Some *text*.\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<em>text</em>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn fenced_code_is_wrapped_and_escaped() {
        let html = markdown_to_html("```rust\nlet a = 1 < 2;\n```\n");
        assert!(html.contains(concat!(
            "<div class=\"codehilite\"><pre><code class=\"language-rust\">",
            "let a = 1 &lt; 2;\n",
            "</code></pre></div>",
        )));
    }

    #[test]
    fn code_without_language_has_no_class() {
        let html = markdown_to_html("    indented\n");
        assert!(html.contains(
            "<div class=\"codehilite\"><pre><code>indented\n</code></pre></div>"
        ));
    }

    #[test]
    fn headings_get_unique_ids() {
        let html = markdown_to_html("## Setup Steps\n\n## Setup Steps\n\n### `x` & y\n");
        assert!(html.contains("<h2 id=\"setup-steps\">Setup Steps</h2>"));
        assert!(html.contains("<h2 id=\"setup-steps_1\">Setup Steps</h2>"));
        assert!(html.contains("<h3 id=\"x-y\">"));
    }

    #[test]
    fn toc_marker_becomes_nested_list() {
        let html = markdown_to_html("[TOC]\n\n## Alpha\n\n### Beta\n\n## Gamma\n");
        assert!(!html.contains("[TOC]"));
        assert!(html.starts_with("<div class=\"toc\">"));
        assert!(html.contains("<a href=\"#alpha\">Alpha</a>"));
        assert!(html.contains("<ul>\n<li><a href=\"#beta\">Beta</a></li>\n</ul>"));
        assert!(html.contains("<li><a href=\"#gamma\">Gamma</a></li>\n</ul>\n</div>"));
    }

    #[test]
    fn toc_nests_after_skipped_level() {
        let html = markdown_to_html("[TOC]\n\n## Top\n\n#### Deep\n\n### Mid\n\n## Next\n");
        assert!(html.contains(concat!(
            "<ul>\n",
            "<li><a href=\"#top\">Top</a><ul>\n",
            "<li><a href=\"#deep\">Deep</a></li>\n",
            "<li><a href=\"#mid\">Mid</a></li>\n",
            "</ul>\n",
            "</li>\n",
            "<li><a href=\"#next\">Next</a></li>\n",
            "</ul>\n",
        )));
    }

    #[test]
    fn toc_marker_inside_text_is_left_alone() {
        let html = markdown_to_html("see [TOC] here\n\n## A\n");
        assert!(html.contains("see [TOC] here"));
        assert!(!html.contains("class=\"toc\""));
    }

    #[test]
    fn parse_with_heading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(
            dir.path(),
            "hello-world.md",
            "# Hello World\n\nSome *text*.",
            (2021, 3, 4),
        );
        let post = parse_markdown_file(&path).unwrap();
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.date.to_string(), "2021-03-04");
        assert!(post.content.contains("<em>text</em>"));
        assert!(!post.content.contains("Hello World"));
    }

    #[test]
    fn parse_without_heading_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(
            dir.path(),
            "reverse_engineering-notes.md",
            "Written on 1999-12-31.\n\n## Part\n",
            (2022, 11, 30),
        );
        let post = parse_markdown_file(&path).unwrap();
        assert_eq!(post.title, "Reverse Engineering Notes");
        assert_eq!(post.date.to_string(), "2022-11-30");
        assert!(post.content.contains("<h2 id=\"part\">Part</h2>"));
    }

    #[test]
    fn date_is_always_ten_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(dir.path(), "early.md", "x", (2005, 1, 2));
        let date = parse_markdown_file(&path).unwrap().date.to_string();
        assert_eq!(date, "2005-01-02");
        assert_eq!(date.len(), 10);
    }

    #[test]
    fn missing_note_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_markdown_file(&dir.path().join("gone.md")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
