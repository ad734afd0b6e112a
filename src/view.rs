use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The page currently selected by the site navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Research,
    Models,
    Performance,
    About,
    Contact,
}

impl View {
    // Navigation order
    pub const ALL: [View; 6] = [
        View::Home,
        View::Research,
        View::Models,
        View::Performance,
        View::About,
        View::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Research => "research",
            View::Models => "models",
            View::Performance => "performance",
            View::About => "about",
            View::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Research => "Research",
            View::Models => "Models",
            View::Performance => "Performance",
            View::About => "About",
            View::Contact => "Contact",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}'")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}
