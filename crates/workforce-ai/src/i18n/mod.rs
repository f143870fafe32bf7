//! Supported languages, keyword-based detection, and the translation seam.

mod detector;
mod translator;

pub use detector::detect_language;
pub use translator::{Translate, TranslationError, TranslatorHandle, TranslatorStatus};

use serde::{Deserialize, Serialize};

/// Languages the assistant can answer in. English is the base language every
/// draft is generated in before translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zu,
    Xh,
    Af,
    Nso,
    St,
}

impl Language {
    /// Keyword detection walks this order, so score ties resolve to the
    /// earliest entry. English is the fallback, never scored.
    pub const DETECTION_ORDER: [Language; 5] = [
        Language::Zu,
        Language::Xh,
        Language::Af,
        Language::Nso,
        Language::St,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zu => "zu",
            Language::Xh => "xh",
            Language::Af => "af",
            Language::Nso => "nso",
            Language::St => "st",
        }
    }

    /// NLLB-200 identifier used when invoking the translation backend.
    pub const fn nllb_code(self) -> &'static str {
        match self {
            Language::En => "eng_Latn",
            Language::Zu => "zul_Latn",
            Language::Xh => "xho_Latn",
            Language::Af => "afr_Latn",
            Language::Nso => "nso_Latn",
            Language::St => "sot_Latn",
        }
    }

    pub fn from_code(raw: &str) -> Option<Language> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "zu" => Some(Language::Zu),
            "xh" => Some(Language::Xh),
            "af" => Some(Language::Af),
            "nso" => Some(Language::Nso),
            "st" => Some(Language::St),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
