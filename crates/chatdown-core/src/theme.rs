//! Color themes for rendered messages
//!
//! The theme is a plain configuration value passed into the renderer; the
//! pipeline holds no ambient styling state.

use ratatui::style::Color;

/// Palette for one rendering pass.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // Prose
    pub text_color: Color,
    pub dim_color: Color,
    pub heading_color: Color,
    pub quote_color: Color,
    pub link_color: Color,
    pub list_marker_color: Color,
    pub math_color: Color,
    pub border_color: Color,

    // Code
    pub code_fg_color: Color,
    pub code_bg_color: Color,
    pub label_fg_color: Color,
    pub label_bg_color: Color,

    // Syntax highlighting
    pub syntax_keyword_color: Color,
    pub syntax_function_color: Color,
    pub syntax_string_color: Color,
    pub syntax_number_color: Color,
    pub syntax_comment_color: Color,
    pub syntax_type_color: Color,
    pub syntax_variable_color: Color,
    pub syntax_punctuation_color: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            text_color: Color::Rgb(205, 214, 222),
            dim_color: Color::Rgb(110, 118, 129),
            heading_color: Color::Rgb(240, 198, 116),
            quote_color: Color::Rgb(139, 148, 158),
            link_color: Color::Rgb(110, 168, 254),
            list_marker_color: Color::Rgb(139, 190, 178),
            math_color: Color::Rgb(214, 188, 250),
            border_color: Color::Rgb(88, 96, 105),
            code_fg_color: Color::Rgb(230, 219, 178),
            code_bg_color: Color::Rgb(40, 44, 52),
            label_fg_color: Color::Rgb(22, 24, 28),
            label_bg_color: Color::Rgb(139, 190, 178),
            syntax_keyword_color: Color::Rgb(198, 146, 233),
            syntax_function_color: Color::Rgb(130, 170, 255),
            syntax_string_color: Color::Rgb(152, 195, 121),
            syntax_number_color: Color::Rgb(209, 154, 102),
            syntax_comment_color: Color::Rgb(106, 115, 125),
            syntax_type_color: Color::Rgb(229, 192, 123),
            syntax_variable_color: Color::Rgb(224, 108, 117),
            syntax_punctuation_color: Color::Rgb(171, 178, 191),
        }
    }

    /// Matches the web app's light treatment (gray chrome, oneLight-ish code).
    pub fn light() -> Self {
        Self {
            name: "light",
            text_color: Color::Rgb(36, 41, 47),
            dim_color: Color::Rgb(140, 149, 159),
            heading_color: Color::Rgb(130, 80, 223),
            quote_color: Color::Rgb(87, 96, 106),
            link_color: Color::Rgb(9, 105, 218),
            list_marker_color: Color::Rgb(17, 99, 41),
            math_color: Color::Rgb(130, 80, 223),
            border_color: Color::Rgb(208, 215, 222),
            code_fg_color: Color::Rgb(36, 41, 47),
            code_bg_color: Color::Rgb(225, 225, 225),
            label_fg_color: Color::Rgb(36, 41, 47),
            label_bg_color: Color::Rgb(243, 244, 246),
            syntax_keyword_color: Color::Rgb(166, 38, 164),
            syntax_function_color: Color::Rgb(64, 120, 242),
            syntax_string_color: Color::Rgb(80, 161, 79),
            syntax_number_color: Color::Rgb(152, 104, 1),
            syntax_comment_color: Color::Rgb(160, 161, 167),
            syntax_type_color: Color::Rgb(193, 132, 1),
            syntax_variable_color: Color::Rgb(228, 86, 73),
            syntax_punctuation_color: Color::Rgb(56, 58, 66),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
