use crate::common::harness::{CodeBlockHarness, ScriptedClipboard};
use codeblock::primitives::highlighter::TreeSitterTokenizer;
use codeblock::primitives::language::LanguageTag;
use codeblock::view::code_block::{CodeBlockProps, CopyButton, Header};
use codeblock::view::html::render_html;
use std::sync::Arc;

fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// CRLF TypeScript snippet with a filename and a clipboard
#[test]
fn test_typescript_block_with_header() {
    let clipboard = Arc::new(ScriptedClipboard::new());
    let mut harness = CodeBlockHarness::with_parts(
        60,
        6,
        Arc::new(TreeSitterTokenizer::new()),
        Some(clipboard),
    )
    .unwrap();
    harness.set_props(
        CodeBlockProps::new("const x = 1;\r\nconst y = 2;\r\n").with_filename("example.ts"),
    );

    let rendered = harness.render().unwrap().clone();

    assert_eq!(rendered.normalized_code, "const x = 1;\nconst y = 2;");
    assert_eq!(rendered.language, LanguageTag::Tsx);
    assert_eq!(rendered.language_class, "language-tsx");
    assert_eq!(rendered.line_number_width, 1);
    assert_eq!(rendered.line_number_count(), 2);
    assert_eq!(rendered.lines[0].number_label.as_deref(), Some("1"));
    assert_eq!(rendered.lines[1].number_label.as_deref(), Some("2"));
    assert_eq!(
        rendered.header,
        Some(Header {
            filename: Some("example.ts".to_string()),
            copy_button: Some(CopyButton {
                label: "Copy".to_string(),
                copied: false,
            }),
        })
    );

    assert_eq!(harness.get_row_text(0), "example.ts  [Copy]");
    assert_eq!(harness.get_row_text(1), "1 │ const x = 1;");
    assert_eq!(harness.get_row_text(2), "2 │ const y = 2;");
    assert_eq!(harness.get_row_text(3), "");
}

/// Keywords get the theme's keyword colour on screen
#[test]
fn test_keywords_are_coloured() {
    let mut harness =
        CodeBlockHarness::with_parts(40, 3, Arc::new(TreeSitterTokenizer::new()), None).unwrap();
    harness.set_props(CodeBlockProps::new("const a = 1;").with_language(LanguageTag::JavaScript));
    harness.render().unwrap();

    // "1 │ " occupies the first four columns
    let keyword = harness.theme().syntax_keyword;
    assert_eq!(harness.buffer()[(4, 0)].fg, keyword);
    assert_eq!(harness.buffer()[(8, 0)].fg, keyword);
}

/// No filename, no language, no clipboard: no header at all
#[test]
fn test_bare_block_has_no_header() {
    let mut harness = CodeBlockHarness::new(40, 4).unwrap();
    harness.set_props(CodeBlockProps::new("plain text"));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.header, None);
    assert_eq!(rendered.language, LanguageTag::Plain);

    assert_eq!(harness.get_row_text(0), "1 │ plain text");
    harness.assert_screen_not_contains("[Copy]");
}

#[test]
fn test_nine_lines_use_one_digit() {
    let mut harness = CodeBlockHarness::new(40, 12).unwrap();
    harness.set_props(CodeBlockProps::new(numbered_lines(9)));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.line_number_width, 1);
    assert!(rendered
        .lines
        .iter()
        .all(|line| line.number_label.as_ref().map(String::len) == Some(1)));

    assert_eq!(harness.get_row_text(0), "1 │ line 1");
    assert_eq!(harness.get_row_text(8), "9 │ line 9");
}

#[test]
fn test_ten_lines_use_two_digits() {
    let mut harness = CodeBlockHarness::new(40, 12).unwrap();
    harness.set_props(CodeBlockProps::new(numbered_lines(10)));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.line_number_width, 2);
    assert_eq!(rendered.lines[0].number_label.as_deref(), Some(" 1"));
    assert_eq!(rendered.lines[9].number_label.as_deref(), Some("10"));

    assert_eq!(harness.get_row_text(0), " 1 │ line 1");
    assert_eq!(harness.get_row_text(9), "10 │ line 10");
}

/// Trailing blank lines are trimmed before counting, so they do not widen the gutter
#[test]
fn test_trailing_blank_lines_do_not_count() {
    let mut harness = CodeBlockHarness::new(40, 12).unwrap();
    harness.set_props(CodeBlockProps::new(format!("{}\r\n\r\n\r\n", numbered_lines(9))));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.lines.len(), 9);
    assert_eq!(rendered.line_number_width, 1);
}

#[test]
fn test_crlf_never_reaches_the_screen() {
    let mut harness = CodeBlockHarness::new(40, 5).unwrap();
    harness.set_props(CodeBlockProps::new("a\r\nb\rc\r\n"));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.normalized_code, "a\nb\nc");
    assert_eq!(rendered.lines.len(), 3);

    let screen = harness.screen_to_string();
    assert!(!screen.contains('\r'));
    assert_eq!(harness.get_row_text(1), "2 │ b");
    assert_eq!(harness.get_row_text(2), "3 │ c");
}

/// Interior blank lines keep their number and render empty
#[test]
fn test_blank_interior_line() {
    let mut harness = CodeBlockHarness::new(40, 5).unwrap();
    harness.set_props(CodeBlockProps::new("a\n\nb"));

    let rendered = harness.render().unwrap();
    assert!(rendered.lines[1].spans.is_empty());
    assert_eq!(harness.get_row_text(1), "2 │");
}

#[test]
fn test_hidden_line_numbers() {
    let mut harness = CodeBlockHarness::new(40, 5).unwrap();
    harness.set_props(
        CodeBlockProps::new("a\nb")
            .with_filename("notes.txt")
            .with_line_numbers(false),
    );

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.line_number_count(), 0);

    assert_eq!(harness.get_row_text(0), "notes.txt");
    assert_eq!(harness.get_row_text(1), "a");
    harness.assert_screen_not_contains("│");
}

/// Unknown extensions fall back to plain text without failing
#[test]
fn test_unknown_extension_falls_back() {
    let mut harness =
        CodeBlockHarness::with_parts(40, 4, Arc::new(TreeSitterTokenizer::new()), None).unwrap();
    harness.set_props(CodeBlockProps::new("fn main() {}").with_filename("main.rs"));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.language, LanguageTag::Plain);
    assert_eq!(rendered.language_class, "language-plain");
    assert!(rendered.lines[0].spans.iter().all(|span| span.category.is_none()));
    harness.assert_screen_contains("fn main() {}");
}

/// An explicit language overrides the filename
#[test]
fn test_explicit_language_wins() {
    let mut harness = CodeBlockHarness::new(40, 4).unwrap();
    harness.set_props(
        CodeBlockProps::new("{\"a\": 1}")
            .with_filename("data.css")
            .with_language(LanguageTag::Json),
    );
    assert_eq!(harness.render().unwrap().language, LanguageTag::Json);
}

/// The HTML surface carries the same structure as the terminal one
#[test]
fn test_html_output() {
    let clipboard = Arc::new(ScriptedClipboard::new());
    let mut harness = CodeBlockHarness::with_clipboard(40, 4, clipboard).unwrap();
    harness.set_props(
        CodeBlockProps::new("<b>&</b>\n")
            .with_filename("snippet.html")
            .with_class_name("tutorial"),
    );
    let rendered = harness.render().unwrap().clone();

    let html = render_html(&rendered, harness.theme());
    assert!(html.starts_with("<div class=\"code-block tutorial\">"));
    assert!(html.contains("<span class=\"code-block__filename\">snippet.html</span>"));
    assert!(html.contains(">Copy</button>"));
    assert!(html.contains("language-markup"));
    assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    assert!(html.contains("data-key=\"line-0\""));
    assert!(!html.contains("data-key=\"line-1\""));
}

/// Empty or whitespace-only code renders one empty, numbered line
#[test]
fn test_empty_code_renders_empty_area() {
    for code in ["", " \r\n\t", "\n\n\n"] {
        for language in LanguageTag::ALL {
            let mut harness = CodeBlockHarness::with_parts(
                20,
                3,
                Arc::new(TreeSitterTokenizer::new()),
                None,
            )
            .unwrap();
            harness.set_props(CodeBlockProps::new(code).with_language(language));

            let rendered = harness.render().unwrap();
            assert_eq!(rendered.normalized_code, "", "code {code:?} as {language}");
            assert_eq!(rendered.lines.len(), 1);
            assert!(rendered.lines[0].spans.is_empty());
            assert_eq!(rendered.line_number_width, 1);
            assert_eq!(rendered.line_number_count(), 1);
            assert_eq!(rendered.lines[0].number_label.as_deref(), Some("1"));

            assert_eq!(harness.get_row_text(0), "1 │");
            assert_eq!(harness.get_row_text(1), "");
        }
    }
}

/// Tabs are drawn as spaces up to the next tab stop
#[test]
fn test_tabs_expanded_on_screen() {
    let mut harness = CodeBlockHarness::new(40, 4).unwrap();
    harness.set_props(CodeBlockProps::new("a\n\tb\nab\tc"));

    let rendered = harness.render().unwrap();
    assert_eq!(rendered.lines[1].spans[0].text, "\tb");

    let screen = harness.screen_to_string();
    assert!(!screen.contains('\t'));
    assert_eq!(harness.get_row_text(1), "2 │         b");
    assert_eq!(harness.get_row_text(2), "3 │ ab      c");
}
