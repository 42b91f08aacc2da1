//! The two supported conversation languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conversation language.
///
/// Serialized exactly as the backend expects it (`"English"` / `"Hindi"`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English (`en-US`).
    #[default]
    English,
    /// Hindi (`hi-IN`).
    Hindi,
}

impl Language {
    /// BCP-47 locale used for speech capture and playback.
    pub fn locale(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Hindi => "hi-IN",
        }
    }

    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Self::English => Self::Hindi,
            Self::Hindi => Self::English,
        }
    }

    /// Pick the variant of a localized string for this language.
    pub fn pick<'a>(self, english: &'a str, hindi: &'a str) -> &'a str {
        match self {
            Self::English => english,
            Self::Hindi => hindi,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "English"),
            Self::Hindi => write!(f, "Hindi"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" | "en-us" => Ok(Self::English),
            "hindi" | "hi" | "hi-in" => Ok(Self::Hindi),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}
