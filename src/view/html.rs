//! HTML serialization of a rendered code block
//!
//! Produces the markup a page embeds: an optional header with the filename and
//! copy button, then a `<pre>` holding one `<div>` per line. Token colours are
//! inlined from the theme so the output needs no stylesheet to be readable;
//! classes are emitted as well for pages that bring their own.

use crate::view::code_block::{Header, RenderedCodeBlock, RenderedLine, BLOCK_CLASS};
use crate::view::theme::{css_color, Theme};
use html_escape::{encode_double_quoted_attribute, encode_text};
use ratatui::style::{Modifier, Style};

/// Render `block` as an HTML fragment.
pub fn render_html(block: &RenderedCodeBlock, theme: &Theme) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<div class=\"{}\">",
        encode_double_quoted_attribute(&block.class_name)
    ));

    if let Some(header) = &block.header {
        push_header(&mut html, header);
    }

    html.push_str(&format!(
        "<pre class=\"{BLOCK_CLASS}__pre {}\" style=\"{}background-color:transparent\">",
        encode_double_quoted_attribute(&block.language_class),
        css_declarations(Style::default().fg(theme.text_fg)),
    ));
    html.push_str(&format!("<code class=\"{BLOCK_CLASS}__code\">"));
    for line in &block.lines {
        push_line(&mut html, line, block.line_number_width, theme);
    }
    html.push_str("</code></pre></div>");

    html
}

fn push_header(html: &mut String, header: &Header) {
    html.push_str(&format!("<header class=\"{BLOCK_CLASS}__header\">"));

    if let Some(filename) = &header.filename {
        html.push_str(&format!(
            "<span class=\"{BLOCK_CLASS}__filename\">{}</span>",
            encode_text(filename)
        ));
    }

    if let Some(button) = &header.copy_button {
        let modifier = if button.copied {
            format!(" {BLOCK_CLASS}__copy--copied")
        } else {
            String::new()
        };
        html.push_str(&format!(
            "<button type=\"button\" class=\"{BLOCK_CLASS}__copy{modifier}\" aria-live=\"polite\">{}</button>",
            encode_text(&button.label)
        ));
    }

    html.push_str("</header>");
}

fn push_line(html: &mut String, line: &RenderedLine, number_width: usize, theme: &Theme) {
    html.push_str(&format!(
        "<div class=\"{BLOCK_CLASS}__line\" data-key=\"{}\">",
        encode_double_quoted_attribute(&line.key)
    ));

    if let Some(label) = &line.number_label {
        html.push_str(&format!(
            "<span class=\"{BLOCK_CLASS}__line-number\" style=\"min-width:{number_width}ch\">{}</span>",
            encode_text(label)
        ));
    }

    html.push_str(&format!("<span class=\"{BLOCK_CLASS}__tokens\">"));
    for span in &line.spans {
        html.push_str(&format!(
            "<span class=\"{BLOCK_CLASS}__token {}\" data-key=\"{}\" style=\"{}\">{}</span>",
            span.class_name(),
            encode_double_quoted_attribute(&span.key),
            css_declarations(theme.span_style(span.category)),
            encode_text(&span.text)
        ));
    }
    html.push_str("</span></div>");
}

/// Inline CSS for a terminal style: colour plus italic/bold
fn css_declarations(style: Style) -> String {
    let mut css = String::new();
    if let Some(color) = style.fg.and_then(css_color) {
        css.push_str(&format!("color:{color};"));
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        css.push_str("font-style:italic;");
    }
    if style.add_modifier.contains(Modifier::BOLD) {
        css.push_str("font-weight:bold;");
    }
    css
}
