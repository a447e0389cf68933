use crate::primitives::highlighter::HighlightCategory;
use ratatui::style::{Color, Modifier, Style};

/// Name of the theme used when none is configured
pub const DEFAULT_THEME_NAME: &str = "night-owl";

/// Colours for a code block: chrome plus one colour per highlight category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,

    pub text_fg: Color,
    pub background: Color,
    pub line_number_fg: Color,
    pub header_fg: Color,
    pub filename_fg: Color,
    pub copy_button_fg: Color,
    pub copied_fg: Color,
    pub italic_comments: bool,

    pub syntax_attribute: Color,
    pub syntax_comment: Color,
    pub syntax_constant: Color,
    pub syntax_function: Color,
    pub syntax_keyword: Color,
    pub syntax_number: Color,
    pub syntax_operator: Color,
    pub syntax_property: Color,
    pub syntax_punctuation: Color,
    pub syntax_string: Color,
    pub syntax_tag: Color,
    pub syntax_type: Color,
    pub syntax_variable: Color,
}

impl Theme {
    /// Night Owl, a dark theme tuned for code read at night
    pub fn night_owl() -> Self {
        Self {
            name: "night-owl".to_string(),
            text_fg: Color::Rgb(214, 222, 235),
            background: Color::Rgb(1, 22, 39),
            line_number_fg: Color::Rgb(75, 100, 121),
            header_fg: Color::Rgb(126, 151, 172),
            filename_fg: Color::Rgb(214, 222, 235),
            copy_button_fg: Color::Rgb(130, 170, 255),
            copied_fg: Color::Rgb(173, 219, 103),
            italic_comments: true,

            syntax_attribute: Color::Rgb(197, 228, 120),
            syntax_comment: Color::Rgb(99, 119, 119),
            syntax_constant: Color::Rgb(130, 170, 255),
            syntax_function: Color::Rgb(130, 170, 255),
            syntax_keyword: Color::Rgb(127, 219, 202),
            syntax_number: Color::Rgb(247, 140, 108),
            syntax_operator: Color::Rgb(127, 219, 202),
            syntax_property: Color::Rgb(128, 203, 196),
            syntax_punctuation: Color::Rgb(199, 146, 234),
            syntax_string: Color::Rgb(173, 219, 103),
            syntax_tag: Color::Rgb(127, 219, 202),
            syntax_type: Color::Rgb(255, 203, 139),
            syntax_variable: Color::Rgb(214, 222, 235),
        }
    }

    /// Light counterpart of Night Owl
    pub fn night_owl_light() -> Self {
        Self {
            name: "night-owl-light".to_string(),
            text_fg: Color::Rgb(64, 63, 83),
            background: Color::Rgb(251, 251, 251),
            line_number_fg: Color::Rgb(144, 167, 178),
            header_fg: Color::Rgb(144, 167, 178),
            filename_fg: Color::Rgb(64, 63, 83),
            copy_button_fg: Color::Rgb(72, 118, 214),
            copied_fg: Color::Rgb(8, 145, 106),
            italic_comments: true,

            syntax_attribute: Color::Rgb(72, 118, 214),
            syntax_comment: Color::Rgb(152, 159, 177),
            syntax_constant: Color::Rgb(188, 84, 84),
            syntax_function: Color::Rgb(72, 118, 214),
            syntax_keyword: Color::Rgb(153, 76, 195),
            syntax_number: Color::Rgb(170, 9, 130),
            syntax_operator: Color::Rgb(12, 150, 155),
            syntax_property: Color::Rgb(12, 150, 155),
            syntax_punctuation: Color::Rgb(153, 76, 195),
            syntax_string: Color::Rgb(201, 103, 101),
            syntax_tag: Color::Rgb(153, 76, 195),
            syntax_type: Color::Rgb(17, 17, 17),
            syntax_variable: Color::Rgb(64, 63, 83),
        }
    }

    /// High-contrast theme built from the basic terminal palette
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            text_fg: Color::White,
            background: Color::Black,
            line_number_fg: Color::Gray,
            header_fg: Color::White,
            filename_fg: Color::LightYellow,
            copy_button_fg: Color::LightCyan,
            copied_fg: Color::LightGreen,
            italic_comments: false,

            syntax_attribute: Color::LightYellow,
            syntax_comment: Color::Gray,
            syntax_constant: Color::LightMagenta,
            syntax_function: Color::LightYellow,
            syntax_keyword: Color::Cyan,
            syntax_number: Color::LightMagenta,
            syntax_operator: Color::White,
            syntax_property: Color::LightCyan,
            syntax_punctuation: Color::White,
            syntax_string: Color::LightGreen,
            syntax_tag: Color::LightBlue,
            syntax_type: Color::Yellow,
            syntax_variable: Color::White,
        }
    }

    /// Look up a built-in theme by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "night-owl" | "dark" => Some(Self::night_owl()),
            "night-owl-light" | "light" => Some(Self::night_owl_light()),
            "high-contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Names accepted by [`Theme::from_name`]
    pub fn available_themes() -> &'static [&'static str] {
        &["night-owl", "night-owl-light", "high-contrast"]
    }

    pub fn category_color(&self, category: HighlightCategory) -> Color {
        match category {
            HighlightCategory::Attribute => self.syntax_attribute,
            HighlightCategory::Comment => self.syntax_comment,
            HighlightCategory::Constant => self.syntax_constant,
            HighlightCategory::Function => self.syntax_function,
            HighlightCategory::Keyword => self.syntax_keyword,
            HighlightCategory::Number => self.syntax_number,
            HighlightCategory::Operator => self.syntax_operator,
            HighlightCategory::Property => self.syntax_property,
            HighlightCategory::Punctuation => self.syntax_punctuation,
            HighlightCategory::String => self.syntax_string,
            HighlightCategory::Tag => self.syntax_tag,
            HighlightCategory::Type => self.syntax_type,
            HighlightCategory::Variable => self.syntax_variable,
        }
    }

    /// Terminal style for a span; unclassified text uses the plain text colour
    pub fn span_style(&self, category: Option<HighlightCategory>) -> Style {
        match category {
            Some(HighlightCategory::Comment) if self.italic_comments => Style::default()
                .fg(self.syntax_comment)
                .add_modifier(Modifier::ITALIC),
            Some(category) => Style::default().fg(self.category_color(category)),
            None => Style::default().fg(self.text_fg),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::night_owl()
    }
}

/// CSS colour value for a terminal colour, `None` for [`Color::Reset`]
pub fn css_color(color: Color) -> Option<String> {
    let (r, g, b) = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (128, 0, 0),
        Color::Green => (0, 128, 0),
        Color::Yellow => (128, 128, 0),
        Color::Blue => (0, 0, 128),
        Color::Magenta => (128, 0, 128),
        Color::Cyan => (0, 128, 128),
        Color::Gray => (192, 192, 192),
        Color::DarkGray => (128, 128, 128),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (0, 0, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        Color::Indexed(index) => indexed_rgb(index),
    };
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Approximate RGB for an xterm 256-colour index
fn indexed_rgb(index: u8) -> (u8, u8, u8) {
    const BASIC: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    match index {
        0..=15 => BASIC[index as usize],
        16..=231 => {
            let cube = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (level(cube / 36), level((cube / 6) % 6), level(cube % 6))
        }
        _ => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}
