//! Writing rendered lines straight to a terminal stream
//!
//! Used by the command-line tool, which prints a code block and exits rather
//! than taking over the screen.

use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::QueueableCommand;
use ratatui::style::{Color, Modifier};
use ratatui::text::Line;
use std::io::{self, Write};

/// Write `lines` with ANSI colours, one terminal line each.
pub fn write_ansi<W: Write>(out: &mut W, lines: &[Line<'_>]) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            if let Some(color) = span.style.fg.and_then(to_crossterm) {
                out.queue(SetForegroundColor(color))?;
            }
            if span.style.add_modifier.contains(Modifier::ITALIC) {
                out.queue(SetAttribute(Attribute::Italic))?;
            }
            if span.style.add_modifier.contains(Modifier::BOLD) {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            out.queue(Print(span.content.as_ref()))?;
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(ResetColor)?;
        }
        out.queue(Print("\n"))?;
    }
    out.flush()
}

/// Write `lines` as unstyled text.
pub fn write_plain<W: Write>(out: &mut W, lines: &[Line<'_>]) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            out.write_all(span.content.as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn to_crossterm(color: Color) -> Option<CrosstermColor> {
    Some(match color {
        Color::Reset => return None,
        Color::Black => CrosstermColor::Black,
        Color::Red => CrosstermColor::DarkRed,
        Color::Green => CrosstermColor::DarkGreen,
        Color::Yellow => CrosstermColor::DarkYellow,
        Color::Blue => CrosstermColor::DarkBlue,
        Color::Magenta => CrosstermColor::DarkMagenta,
        Color::Cyan => CrosstermColor::DarkCyan,
        Color::Gray => CrosstermColor::Grey,
        Color::DarkGray => CrosstermColor::DarkGrey,
        Color::LightRed => CrosstermColor::Red,
        Color::LightGreen => CrosstermColor::Green,
        Color::LightYellow => CrosstermColor::Yellow,
        Color::LightBlue => CrosstermColor::Blue,
        Color::LightMagenta => CrosstermColor::Magenta,
        Color::LightCyan => CrosstermColor::Cyan,
        Color::White => CrosstermColor::White,
        Color::Rgb(r, g, b) => CrosstermColor::Rgb { r, g, b },
        Color::Indexed(i) => CrosstermColor::AnsiValue(i),
    })
}
