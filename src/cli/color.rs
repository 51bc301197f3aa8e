use clap::ValueEnum;

/// When to colorize diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Let the terminal decide
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn apply(&self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {}
        }
    }
}
