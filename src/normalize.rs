//! Title cleanup heuristics used before searching the streaming catalog.
//!
//! Chart titles carry noise the catalog search does not like: remix credits,
//! featured artists, edit markers. [`clean_title`] strips that noise and
//! [`extract_artist_from_title`] tries to recover an artist from it for sources
//! that only publish a title.

use crate::types::{NormalizedQuery, RawTrackRecord};
use regex::Regex;
use std::sync::LazyLock;

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Suffix markers, applied in order. Each one cuts from the marker to the end.
static NOISE_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bfeat\..*$").unwrap(),
        Regex::new(r"(?i)\bft\..*$").unwrap(),
        Regex::new(r"(?i)\bremix.*$").unwrap(),
        Regex::new(r"(?i)\bradio edit.*$").unwrap(),
    ]
});

static REMIX_CREDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(([^)]+)\s+remix\)").unwrap());
static FEATURED_CREDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:feat\.?|ft\.?)\s+([^)\]]+)").unwrap());
static CONJUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+(&|and)\s+").unwrap());

/// Remove remix/feat/edit noise from a scraped title.
///
/// Drops every `(...)` and `[...]` group, then cuts the title at the first
/// `feat.`, `ft.`, `remix` or `radio edit` marker (case-insensitive) and trims
/// the rest. Applying it twice gives the same result as applying it once.
///
/// ```rust
/// use chart_playlist::normalize::clean_title;
///
/// assert_eq!(clean_title("Song (Radio Edit)"), "Song");
/// assert_eq!(clean_title("Song feat. Someone Else"), "Song");
/// ```
pub fn clean_title(raw: &str) -> String {
    let without_groups = PARENTHESIZED.replace_all(raw, "");
    let mut title = BRACKETED.replace_all(&without_groups, "").into_owned();

    for suffix in NOISE_SUFFIXES.iter() {
        title = suffix.replace(&title, "").into_owned();
    }

    title.trim().to_string()
}

/// Guess an artist name from a title that has no separate artist field.
///
/// Patterns are tried in order and the first hit wins:
/// 1. `(<name> Remix)` gives `<name>`
/// 2. `feat.` / `ft.` gives the text after the marker
/// 3. `<title> - <artist>` gives the part after the first `" - "`
/// 4. `<artist>'s ...` gives the text before `'s`
/// 5. `<words> & <words>` / `<words> and <words>` gives the last word before
///    the conjunction. This one is a rough guess.
///
/// Returns an empty string when nothing matches.
pub fn extract_artist_from_title(raw: &str) -> String {
    if let Some(name) = REMIX_CREDIT.captures(raw).and_then(|c| c.get(1)) {
        return name.as_str().trim().to_string();
    }

    if let Some(name) = FEATURED_CREDIT.captures(raw).and_then(|c| c.get(1)) {
        return name.as_str().trim().to_string();
    }

    if let Some(artist) = raw.split(" - ").nth(1) {
        let artist = artist.trim();
        if !artist.is_empty() {
            return artist.to_string();
        }
    }

    if let Some((owner, _)) = raw.split_once("'s") {
        let owner = owner.trim();
        if !owner.is_empty() {
            return owner.to_string();
        }
    }

    if let Some(conjunction) = CONJUNCTION.find(raw) {
        if let Some(word) = raw[..conjunction.start()].split_whitespace().last() {
            return word.to_string();
        }
    }

    String::new()
}

impl NormalizedQuery {
    /// Derive search terms for a record.
    ///
    /// The explicit artist wins; otherwise one is extracted from the raw title.
    /// If cleaning would leave nothing of the title, the trimmed raw title is
    /// searched instead.
    pub fn from_record(record: &RawTrackRecord) -> Self {
        let cleaned = clean_title(&record.title);
        let cleaned_title = if cleaned.is_empty() {
            record.title.trim().to_string()
        } else {
            cleaned
        };

        let explicit_artist = record.artist.trim();
        let artist = if explicit_artist.is_empty() {
            extract_artist_from_title(&record.title)
        } else {
            explicit_artist.to_string()
        };

        Self {
            cleaned_title,
            artist,
        }
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// Used for names recovered from URL slugs.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(ch);
            at_word_start = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_removes_annotations() {
        assert_eq!(clean_title("Song (Radio Edit)"), "Song");
        assert_eq!(clean_title("Song [Remix]"), "Song");
        assert_eq!(clean_title("Song feat. X"), "Song");
        assert_eq!(clean_title("Song FT. X and Y"), "Song");
        assert_eq!(clean_title("Song (feat. X) [Extended Mix]"), "Song");
        assert_eq!(clean_title("Song Remix by Someone"), "Song");
        assert_eq!(clean_title("Song radio edit 2024"), "Song");
        assert_eq!(clean_title("  Plain Title  "), "Plain Title");
    }

    #[test]
    fn test_clean_title_keeps_words_containing_markers() {
        assert_eq!(clean_title("Left. Right."), "Left. Right.");
        assert_eq!(clean_title("Premixed Feelings"), "Premixed Feelings");
    }

    #[test]
    fn test_clean_title_is_idempotent() {
        let samples = [
            "Song (Radio Edit)",
            "Song [Remix] feat. Someone",
            "((nested) parens) tail",
            "open ( never closed",
            "close ) before ( open",
            "[a ( b ] c )",
            "Remix",
            "Track ft. A (B Remix) [C]",
            "   ",
            "",
            "Hypnotized - John Summit Remix",
        ];

        for sample in samples {
            let once = clean_title(sample);
            assert_eq!(clean_title(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_extract_artist_patterns() {
        assert_eq!(extract_artist_from_title("Song (DJ Foo Remix)"), "DJ Foo");
        assert_eq!(extract_artist_from_title("Song (feat. Jane Doe)"), "Jane Doe");
        assert_eq!(extract_artist_from_title("Song ft. Jane Doe"), "Jane Doe");
        assert_eq!(extract_artist_from_title("Song - Bar"), "Bar");
        assert_eq!(extract_artist_from_title("Avicii's Tribute"), "Avicii");
        assert_eq!(extract_artist_from_title("Salt & Pepper Groove"), "Salt");
        assert_eq!(extract_artist_from_title("Rhythm and Blues"), "Rhythm");
        assert_eq!(extract_artist_from_title("Plain Title"), "");
    }

    #[test]
    fn test_extract_artist_first_pattern_wins() {
        // Remix credit beats the dash split
        assert_eq!(
            extract_artist_from_title("Song - Other (Fouk Remix)"),
            "Fouk"
        );
        // Featured credit beats possessive
        assert_eq!(
            extract_artist_from_title("Summer's End feat. Ola"),
            "Ola"
        );
    }

    #[test]
    fn test_extract_artist_ignores_marker_inside_words() {
        assert_eq!(extract_artist_from_title("Left Side"), "");
    }

    #[test]
    fn test_normalized_query_prefers_explicit_artist() {
        let record = RawTrackRecord::new("Whistle Me (Fouk Remix)", "Elisa Elisa");
        let query = NormalizedQuery::from_record(&record);
        assert_eq!(query.cleaned_title, "Whistle Me");
        assert_eq!(query.artist, "Elisa Elisa");
    }

    #[test]
    fn test_normalized_query_extracts_missing_artist() {
        let record = RawTrackRecord::new("Whistle Me (Fouk Remix)", "");
        let query = NormalizedQuery::from_record(&record);
        assert_eq!(query.cleaned_title, "Whistle Me");
        assert_eq!(query.artist, "Fouk");
    }

    #[test]
    fn test_normalized_query_keeps_title_when_cleaning_empties_it() {
        let record = RawTrackRecord::new("(Intro)", "Someone");
        let query = NormalizedQuery::from_record(&record);
        assert_eq!(query.cleaned_title, "(Intro)");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("i adore you"), "I Adore You");
        assert_eq!(title_case("JOHN summit"), "John Summit");
        assert_eq!(title_case("7 seconds"), "7 Seconds");
    }
}
