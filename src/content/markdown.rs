//! Markdown rendering with heading anchors and syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Markdown renderer. Headings get slugified `id` attributes and an anchor
/// link; fenced code blocks are highlighted with syntect, falling back to a
/// plain `<pre><code>` block for unknown languages.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "InspiredGitHub".to_string(),
        }
    }

    /// Render a Markdown body to HTML. Total: a body that defeats the
    /// highlighter still renders, just unhighlighted.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();

        // Fenced code block state.
        let mut in_code = false;
        let mut code_lang: Option<String> = None;
        let mut code = String::new();

        // Heading state: inner events are buffered so the id can be derived
        // from the heading text before the start tag is emitted.
        let mut heading_open = false;
        let mut heading_text = String::new();
        let mut heading_events: Vec<Event> = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code = false;
                    let rendered = self.highlight(&code, code_lang.as_deref());
                    events.push(Event::Html(CowStr::from(rendered)));
                    code_lang = None;
                }
                Event::Text(text) if in_code => {
                    code.push_str(&text);
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading_open = true;
                    heading_text.clear();
                    heading_events.clear();
                }
                Event::End(TagEnd::Heading(level)) => {
                    heading_open = false;
                    let id = slug::slugify(&heading_text);
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id: Some(CowStr::from(id.clone())),
                        classes: Vec::new(),
                        attrs: Vec::new(),
                    }));
                    events.push(Event::Html(CowStr::from(format!(
                        "<a class=\"heading-anchor\" href=\"#{id}\" aria-label=\"Link to section\"></a>"
                    ))));
                    events.append(&mut heading_events);
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                event if heading_open => {
                    match &event {
                        Event::Text(t) => heading_text.push_str(t),
                        Event::Code(t) => heading_text.push_str(t),
                        _ => {}
                    }
                    heading_events.push(event);
                }
                event => events.push(event),
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l));
        let theme = self.theme_set.themes.get(&self.theme_name);

        match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).unwrap_or_else(
                    |e| {
                        tracing::warn!("highlighting failed: {}", e);
                        plain_code_block(code)
                    },
                )
            }
            _ => plain_code_block(code),
        }
    }
}

fn plain_code_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>\n", escape_html(code))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
