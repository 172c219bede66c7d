use std::io::IsTerminal;

use crossterm::style::Stylize;

/// Decides whether prompt headings and complaints get terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    use_colors: bool,
}

impl Palette {
    pub fn new(use_colors: bool) -> Self {
        Palette { use_colors }
    }

    /// Colors only when stdout is a TTY and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        // https://no-color.org/
        if std::env::var_os("NO_COLOR").is_some() {
            return Palette::new(false);
        }
        Palette::new(std::io::stdout().is_terminal())
    }

    pub fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn complaint(&self, text: &str) -> String {
        if self.use_colors {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_writes_no_escape_codes() {
        let palette = Palette::new(false);
        assert_eq!(palette.heading("Calculating..."), "Calculating...");
        assert_eq!(palette.complaint("Please enter a valid day"), "Please enter a valid day");
    }

    #[test]
    fn colored_palette_keeps_text() {
        let palette = Palette::new(true);
        assert!(palette.complaint("Please enter a valid day").contains("Please enter a valid day"));
        assert!(palette.heading("Calculating...").contains("Calculating..."));
    }
}
