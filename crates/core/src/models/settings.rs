use serde::{Deserialize, Serialize};

/// UI / analysis language. Exactly two values; toggled, never chosen freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "TR")]
    Turkish,
}

impl Language {
    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Turkish,
            Language::Turkish => Language::English,
        }
    }

    /// Short tag shown on the toggle button and stored in the snapshot.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Turkish => "TR",
        }
    }

    /// Name used when instructing the analysis service which language to answer in.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Turkish => "Turkish",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Visual theme preference, carried in the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Cyber,
    Dark,
}

/// User preferences that survive across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}
