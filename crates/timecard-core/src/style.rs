use owo_colors::{OwoColorize, Style};

/// Console styling for the four table roles: title, subtitle, separator and
/// value (committed or provisional).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub enable_color: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

impl Palette {
    pub fn colored() -> Self {
        Self { enable_color: true }
    }

    pub fn plain() -> Self {
        Self {
            enable_color: false,
        }
    }

    /// Colored when stdout is a terminal, plain otherwise.
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;
        Self {
            enable_color: std::io::stdout().is_terminal(),
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enable_color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(text, Style::new().blue().bold())
    }

    pub fn subtitle(&self, text: &str) -> String {
        self.paint(text, Style::new().cyan().underline())
    }

    pub fn separator(&self) -> String {
        self.paint("|", Style::new().bright_black())
    }

    pub fn value(&self, commit: bool, text: &str) -> String {
        if commit {
            self.paint(text, Style::new().green().bold())
        } else {
            self.paint(text, Style::new().green())
        }
    }

    pub fn provisional_line(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_palette_passes_text_through() {
        let palette = Palette::plain();
        assert_eq!(palette.title("--cpu--"), "--cpu--");
        assert_eq!(palette.separator(), "|");
        assert_eq!(palette.value(true, "  42"), "  42");
    }

    #[test]
    fn test_colored_palette_distinguishes_commit() {
        let palette = Palette::colored();
        let committed = palette.value(true, "42");
        let provisional = palette.value(false, "42");
        assert!(committed.contains("42"));
        assert!(committed.contains('\u{1b}'));
        assert_ne!(committed, provisional);
    }
}
