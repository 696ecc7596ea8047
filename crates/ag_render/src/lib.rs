//! Renders a generated article and its SEO metadata as a standalone HTML page.
//!
//! Rendering is a pure function of its inputs: the same article and metadata
//! always produce byte-identical output.

use ag_core::{Article, ArticleSection, SeoMetadata};

const STYLE: &str = include_str!("style.css");

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes free text and turns its newlines into `<br>`.
fn text_block(text: &str) -> String {
    escape_html(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

fn render_head(seo: &SeoMetadata) -> String {
    format!(
        r#"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="{keywords}">
    <meta property="og:title" content="{og_title}">
    <meta property="og:description" content="{og_description}">
    <style>
{STYLE}    </style>
</head>"#,
        title = escape_html(&seo.title),
        description = escape_html(&seo.description),
        keywords = escape_html(&seo.keywords.join(", ")),
        og_title = escape_html(seo.og_title()),
        og_description = escape_html(seo.og_description()),
    )
}

fn render_section(section: &ArticleSection) -> String {
    format!(
        r#"
        <div class="section">
            <h2>{heading}</h2>
            <p>{content}</p>
        </div>
"#,
        heading = escape_html(&section.heading),
        content = text_block(&section.content),
    )
}

fn render_reference(reference: &str) -> String {
    let reference = escape_html(reference);
    format!(r#"<li><a href="{reference}" target="_blank">{reference}</a></li>"#)
}

pub fn render_html(article: &Article, seo: &SeoMetadata) -> String {
    let sections: String = article.sections.iter().map(render_section).collect();
    let references: String = article
        .references
        .iter()
        .map(|reference| render_reference(reference))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
{head}
<body>
    <article>
        <h1>{title}</h1>

        <div class="introduction">
            {introduction}
        </div>
{sections}
        <div class="conclusion">
            <h2>Conclusion</h2>
            <p>{conclusion}</p>
        </div>

        <div class="references">
            <h3>References</h3>
            <ul>
                {references}
            </ul>
        </div>
    </article>
</body>
</html>
"#,
        head = render_head(seo),
        title = escape_html(&article.title),
        introduction = text_block(&article.introduction),
        conclusion = text_block(&article.conclusion),
    )
}
