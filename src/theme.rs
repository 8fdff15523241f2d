/// Colour scheme of a sales page. Each variant maps to a CSS modifier class
/// defined in the page styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Cyan,
    Purple,
}

impl Theme {
    pub fn class(self) -> &'static str {
        match self {
            Theme::Cyan => "theme-cyan",
            Theme::Purple => "theme-purple",
        }
    }
}
