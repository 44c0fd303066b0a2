//! Terminal styles for the startup lines and the console session.

use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    /// Startup banner
    pub heading: Style,
    /// Left-hand side of `label: value` startup lines
    pub label: Style,
    pub note: Style,
    pub caution: Style,
    /// The `What do you want to do?` line
    pub menu: Style,
    /// Questions asked inside a flow
    pub question: Style,
    /// Friend and item names printed as a list
    pub listing: Style,
    /// `Great! ...`, `Got it! ...`, `Alright, ...`
    pub done: Style,
    /// `Sorry, ...`, empty-name refusals and store errors
    pub refusal: Style,
}

impl Theme {
    /// Colors only when stdout is a terminal and the environment allows them
    /// (`NO_COLOR`, `CLICOLOR`, as read by `console`).
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() || !console::colors_enabled() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            label: Style::new().white().dimmed(),
            note: Style::new().magenta(),
            caution: Style::new().yellow().bold(),
            menu: Style::new().cyan().bold(),
            question: Style::new().cyan(),
            listing: Style::new().bright_white(),
            done: Style::new().green().bold(),
            refusal: Style::new().red(),
        }
    }

    /// No escape codes at all; what piped output and tests see
    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            label: Style::new(),
            note: Style::new(),
            caution: Style::new(),
            menu: Style::new(),
            question: Style::new(),
            listing: Style::new(),
            done: Style::new(),
            refusal: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_has_no_escape_codes() {
        let theme = Theme::plain();
        let line = format!("{}", "Sorry, I didn't find that friend.".style(theme.refusal.clone()));
        assert_eq!(line, "Sorry, I didn't find that friend.");
    }

    #[test]
    fn test_colored_theme_styles_refusals() {
        let theme = Theme::colored();
        let line = format!("{}", "Sorry".style(theme.refusal.clone()));
        assert!(line.contains("\x1b["));
        assert!(line.contains("Sorry"));
    }
}
