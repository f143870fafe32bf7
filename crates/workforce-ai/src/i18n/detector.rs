use std::collections::HashSet;

use super::Language;

fn keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Zu => &[
            "sawubona",
            "ngicela",
            "ngifuna",
            "imali",
            "yami",
            "ukubona",
            "usuku",
            "amalanga",
            "umsebenzi",
            "ngiyabonga",
            "isikhathi",
            "ngiyanicela",
            "ngingathanda",
            "eholidini",
            "umholo",
        ],
        Language::Xh => &[
            "molo",
            "ndifuna",
            "ndingathanda",
            "imali",
            "yam",
            "ukwazi",
            "ndicela",
            "ndibona",
            "umsebenzi",
            "enkosi",
            "ixesha",
            "amalanga",
            "eholide",
            "umvuzo",
        ],
        Language::Af => &[
            "hoeveel",
            "verlof",
            "salaris",
            "asseblief",
            "dankie",
            "werk",
            "betaling",
            "geld",
            "voorskot",
            "beleid",
            "siekteverlof",
            "jaarlikse",
            "balans",
            "oor",
        ],
        Language::Nso => &[
            "dumela", "kgopela", "nyaka", "tshelete", "mosomo", "matšatši", "leholetse", "moputso",
            "lebaka",
        ],
        Language::St => &[
            "lumela",
            "kopa",
            "batla",
            "tjhelete",
            "mosebetsi",
            "matsatsi",
            "phomolo",
            "moputso",
            "molao",
        ],
        Language::En => &[],
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphabetic() || c == 'š' || c == 'ž'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score the message against each language's keyword set. The first language
/// in [`Language::DETECTION_ORDER`] reaching the highest nonzero hit count
/// wins; no hits at all means English.
pub fn detect_language(text: &str) -> Language {
    let words = word_set(text);

    let mut best: Option<(Language, usize)> = None;
    for language in Language::DETECTION_ORDER {
        let score = keywords(language)
            .iter()
            .filter(|keyword| words.contains(**keyword))
            .count();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((language, score));
        }
    }

    match best {
        Some((language, score)) => {
            tracing::debug!(%language, score, "language detected by keyword match");
            language
        }
        None => Language::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_as_fallback() {
        assert_eq!(
            detect_language("How many leave days do I have?"),
            Language::En
        );
    }

    #[test]
    fn numerals_only_default_to_english() {
        assert_eq!(detect_language("12345"), Language::En);
    }

    #[test]
    fn detects_zulu_keywords() {
        assert_eq!(
            detect_language("Sawubona, ngicela ukubona imali yami"),
            Language::Zu
        );
    }

    #[test]
    fn detects_xhosa_keywords() {
        assert_eq!(
            detect_language("Molo, ndifuna ukwazi ngemali yam"),
            Language::Xh
        );
    }

    #[test]
    fn detects_afrikaans_keywords() {
        assert_eq!(detect_language("Hoeveel verlof het ek oor?"), Language::Af);
    }

    #[test]
    fn detects_sepedi_keywords() {
        assert_eq!(detect_language("Dumela, ke kgopela matšatši"), Language::Nso);
    }

    #[test]
    fn dominant_language_wins_over_stray_english_words() {
        assert_eq!(
            detect_language("Please sawubona ngicela amalanga for leave"),
            Language::Zu
        );
    }

    #[test]
    fn score_ties_resolve_in_detection_order() {
        // "imali" appears in both the isiZulu and isiXhosa keyword sets.
        assert_eq!(detect_language("imali"), Language::Zu);
    }

    #[test]
    fn word_boundaries_are_respected() {
        // "oor" is an Afrikaans keyword but must not match inside "door".
        assert_eq!(detect_language("the door is open"), Language::En);
    }
}
