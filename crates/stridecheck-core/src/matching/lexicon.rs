//! Sentiment lexicon for context classification.
//!
//! A closed, enumerated phrase table. Entries carry an explicit polarity so
//! the table can be extended or replaced without touching matching logic;
//! there is no generalization beyond literal (case-insensitive) lookup.

use serde::{Deserialize, Serialize};

/// Polarity of a lexicon phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The phrase dissuades ("avoid", "don't buy").
    Negative,
    /// The phrase endorses. Reserved for future scoring; the builtin table
    /// carries none.
    Positive,
}

/// Builtin dissuasion phrases.
///
/// Mixed Chinese/English because the evaluated agents answer in either
/// language. Warning glyphs count as dissuasion markers.
const BUILTIN_ENTRIES: &[(&str, Polarity)] = &[
    ("不要买", Polarity::Negative),
    ("不推荐", Polarity::Negative),
    ("避开", Polarity::Negative),
    ("避坑", Polarity::Negative),
    ("劝退", Polarity::Negative),
    ("不适合", Polarity::Negative),
    ("不要选", Polarity::Negative),
    ("谨慎", Polarity::Negative),
    ("禁止", Polarity::Negative),
    ("不建议", Polarity::Negative),
    ("❌", Polarity::Negative),
    ("⚠️", Polarity::Negative),
    ("not recommended", Polarity::Negative),
    ("don't buy", Polarity::Negative),
    ("avoid", Polarity::Negative),
    ("not suitable", Polarity::Negative),
    ("exercise caution", Polarity::Negative),
    ("prohibited", Polarity::Negative),
];

/// A sentiment phrase table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    entries: Vec<(String, Polarity)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(
            BUILTIN_ENTRIES
                .iter()
                .map(|(phrase, polarity)| (phrase.to_string(), *polarity)),
        )
    }
}

impl Lexicon {
    /// Build a lexicon from explicit entries. Phrases are stored case-folded.
    pub fn new(entries: impl IntoIterator<Item = (String, Polarity)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(phrase, polarity)| (phrase.to_lowercase(), polarity))
                .collect(),
        }
    }

    /// All phrases of a given polarity.
    pub fn phrases(&self, polarity: Polarity) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, p)| *p == polarity)
            .map(|(phrase, _)| phrase.as_str())
    }

    /// Does the text contain any negative-polarity phrase?
    ///
    /// Case-insensitive literal lookup.
    pub fn contains_negative(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.phrases(Polarity::Negative)
            .any(|phrase| lowered.contains(phrase))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_negative_phrases() {
        let lexicon = Lexicon::default();
        assert!(lexicon.contains_negative("I would AVOID this model"));
        assert!(lexicon.contains_negative("这双鞋不推荐给大体重跑者"));
        assert!(lexicon.contains_negative("⚠️ 偏窄"));
        assert!(!lexicon.contains_negative("a great daily trainer"));
    }

    #[test]
    fn test_custom_entries() {
        let lexicon = Lexicon::new(vec![("Steer Clear".to_string(), Polarity::Negative)]);
        assert!(lexicon.contains_negative("you should steer clear of it"));
        assert!(!lexicon.contains_negative("avoid it"));
    }

    #[test]
    fn test_positive_entries_do_not_dissuade() {
        let lexicon = Lexicon::new(vec![("great".to_string(), Polarity::Positive)]);
        assert!(!lexicon.contains_negative("a great shoe"));
    }
}
