//! ANSI output for rendered lines
//!
//! Maps ratatui styles onto crossterm escape sequences and wraps each link
//! extent in an OSC 8 hyperlink, so clicking opens the URL in the user's
//! browser instead of anything executing in place.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor};
use ratatui::style::Modifier;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use chatdown_core::{LinkSpan, Rendered};

const OSC8_CLOSE: &str = "\x1b]8;;\x1b\\";

pub fn print_rendered(out: &Rendered, w: &mut impl Write) -> io::Result<()> {
    for (line_idx, line) in out.lines.iter().enumerate() {
        let mut links: Vec<&LinkSpan> =
            out.links.iter().filter(|l| l.line == line_idx).collect();
        links.sort_by_key(|l| l.start_col);

        let mut col = 0usize;
        let mut open: Option<&LinkSpan> = None;
        for span in &line.spans {
            if open.is_none() {
                if let Some(link) = links.iter().copied().find(|l| l.start_col == col) {
                    write!(w, "\x1b]8;;{}\x1b\\", link.url)?;
                    open = Some(link);
                }
            }
            write_span(w, span)?;
            col += span.content.as_ref().width();
            if open.is_some_and(|l| l.end_col <= col) {
                write!(w, "{OSC8_CLOSE}")?;
                open = None;
            }
        }
        if open.is_some() {
            write!(w, "{OSC8_CLOSE}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_span(w: &mut impl Write, span: &Span<'_>) -> io::Result<()> {
    if let Some(color) = span.style.fg {
        write!(w, "{}", SetForegroundColor(convert(color)))?;
    }
    if let Some(color) = span.style.bg {
        write!(w, "{}", SetBackgroundColor(convert(color)))?;
    }
    let mods = span.style.add_modifier;
    if mods.contains(Modifier::BOLD) {
        write!(w, "{}", SetAttribute(Attribute::Bold))?;
    }
    if mods.contains(Modifier::ITALIC) {
        write!(w, "{}", SetAttribute(Attribute::Italic))?;
    }
    if mods.contains(Modifier::UNDERLINED) {
        write!(w, "{}", SetAttribute(Attribute::Underlined))?;
    }
    if mods.contains(Modifier::CROSSED_OUT) {
        write!(w, "{}", SetAttribute(Attribute::CrossedOut))?;
    }
    write!(w, "{}", span.content)?;
    write!(w, "{}", SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn convert(color: ratatui::style::Color) -> Color {
    use ratatui::style::Color as Rat;
    match color {
        Rat::Reset => Color::Reset,
        Rat::Black => Color::Black,
        Rat::Red => Color::DarkRed,
        Rat::Green => Color::DarkGreen,
        Rat::Yellow => Color::DarkYellow,
        Rat::Blue => Color::DarkBlue,
        Rat::Magenta => Color::DarkMagenta,
        Rat::Cyan => Color::DarkCyan,
        Rat::Gray => Color::Grey,
        Rat::DarkGray => Color::DarkGrey,
        Rat::LightRed => Color::Red,
        Rat::LightGreen => Color::Green,
        Rat::LightYellow => Color::Yellow,
        Rat::LightBlue => Color::Blue,
        Rat::LightMagenta => Color::Magenta,
        Rat::LightCyan => Color::Cyan,
        Rat::White => Color::White,
        Rat::Rgb(r, g, b) => Color::Rgb { r, g, b },
        Rat::Indexed(i) => Color::AnsiValue(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdown_core::{render_message, Theme};

    #[test]
    fn links_are_wrapped_in_osc8() {
        let out = render_message("see [docs](https://example.com)", &Theme::dark());
        let mut buf = Vec::new();
        print_rendered(&out, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\x1b]8;;https://example.com\x1b\\"));
        assert!(text.contains(OSC8_CLOSE));
    }

    #[test]
    fn plain_text_survives_styling() {
        let out = render_message("hello **there**", &Theme::dark());
        let mut buf = Vec::new();
        print_rendered(&out, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("hello"));
        assert!(text.contains("there"));
    }
}
