//! Valence lexicon used by the sentiment scorer.
//!
//! Valences sit on a `-4.0..=4.0` scale. Keys are lowercase; multi-word
//! entries are a single space-separated phrase of two words.

use std::collections::HashMap;

use tweetlens_core::{lexicon_file::MAX_PHRASE_WORDS, LexiconFile};

/// General-purpose English word valences.
const BASE_WORDS: &[(&str, f32)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("lovely", 2.8),
    ("adore", 2.6),
    ("like", 1.5),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("good", 1.9),
    ("great", 3.1),
    ("greatest", 3.2),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("wonderful", 2.7),
    ("fantastic", 2.6),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("beautiful", 2.9),
    ("happy", 2.7),
    ("happiness", 2.6),
    ("glad", 2.0),
    ("joy", 2.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("win", 2.8),
    ("winning", 2.4),
    ("won", 2.7),
    ("success", 2.7),
    ("successful", 2.8),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("grateful", 2.0),
    ("proud", 2.1),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("safe", 1.9),
    ("strong", 2.3),
    ("support", 1.7),
    ("agree", 1.5),
    ("yes", 1.7),
    ("cute", 2.0),
    ("smile", 1.5),
    ("laugh", 2.6),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("incredible", 1.8),
    ("positive", 2.6),
    ("recommend", 1.5),
    ("helpful", 1.8),
    ("free", 2.3),
    ("peace", 2.5),
    ("friend", 2.2),
    ("friends", 2.1),
    ("care", 2.2),
    ("win-win", 2.5),
    ("well", 1.1),
    ("pretty", 2.2),
    ("interesting", 1.7),
    ("welcome", 2.0),
    ("honored", 2.2),
    ("favorite", 2.0),
    ("fine", 0.8),
    // negative
    ("hate", -2.7),
    ("hated", -3.2),
    ("hates", -1.9),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("sad", -2.1),
    ("angry", -2.3),
    ("mad", -2.2),
    ("upset", -1.6),
    ("annoying", -1.7),
    ("annoyed", -1.6),
    ("boring", -1.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("lose", -1.3),
    ("lost", -1.3),
    ("loss", -1.3),
    ("wrong", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("crash", -1.7),
    ("crisis", -3.1),
    ("disaster", -3.1),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("kill", -3.7),
    ("killed", -3.5),
    ("dead", -3.3),
    ("death", -2.9),
    ("die", -2.9),
    ("hurt", -2.4),
    ("pain", -2.3),
    ("cry", -2.1),
    ("crying", -2.1),
    ("fear", -2.2),
    ("afraid", -2.0),
    ("scared", -1.9),
    ("worried", -1.2),
    ("worry", -1.9),
    ("stupid", -2.4),
    ("ugly", -2.3),
    ("wtf", -2.8),
    ("no", -1.2),
    ("against", -1.3),
    ("enemy", -2.5),
    ("war", -2.9),
    ("attack", -2.1),
    ("lie", -1.6),
    ("lies", -1.8),
    ("liar", -2.2),
    ("corrupt", -3.0),
    ("fraud", -2.8),
    ("shame", -2.1),
    ("sick", -2.3),
    ("broken", -2.1),
    ("ruin", -2.8),
    ("ruined", -2.4),
    ("poor", -2.1),
    ("weak", -1.9),
    ("evil", -3.4),
    ("hell", -3.6),
    ("damn", -1.7),
    ("sucks", -1.5),
    ("suck", -1.9),
    ("negative", -2.7),
    ("threat", -2.4),
    ("unfair", -2.1),
    ("lonely", -1.5),
    ("tired", -1.9),
    // emoticons
    (":)", 2.0),
    (":-)", 1.3),
    (":d", 2.9),
    (";)", 0.9),
    ("<3", 1.9),
    (":(", -1.9),
    (":-(", -1.5),
    (":'(", -2.2),
];

/// Internet slang. Later entries override base words with the same key.
const SLANG_WORDS: &[(&str, f32)] = &[
    ("lit", 2.8),
    ("fire", 2.8),
    ("cool", 2.4),
    ("vibes", 0.0),
    ("savage", 1.6),
    ("cringe", -2.2),
    ("dope", 2.4),
    ("hyped", 2.2),
    ("omg", 1.5),
    ("yas", 2.4),
    ("yass", 2.4),
    ("slay", 2.7),
    ("mood", 0.0),
    ("fomo", -0.8),
    ("sus", -0.8),
    ("bff", 2.4),
    ("yolo", 1.8),
    ("tbh", 0.6),
    ("shook", -1.0),
    ("thirsty", -1.5),
    ("iconic", 1.9),
    ("queen", 2.4),
    ("trash", -2.5),
    ("epic", 2.2),
    ("fleek", 2.2),
    ("sorry", -1.5),
    ("basic", -1.0),
    ("lame", -1.9),
    ("dank", 1.9),
    ("chill", 1.6),
    ("salty", -1.3),
    ("blessed", 2.4),
    ("fake", -1.9),
    ("sick", 2.4),
    ("woke", 1.5),
    ("lol", 2.2),
    ("lmao", 2.4),
    ("smh", -1.9),
    ("rofl", 2.4),
    ("good vibes", 2.0),
    ("no cap", 1.4),
];

/// Words that intensify the valence of the word that follows.
pub(crate) const BOOSTERS: &[&str] = &[
    "absolutely",
    "amazingly",
    "completely",
    "deeply",
    "especially",
    "extremely",
    "fully",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "most",
    "particularly",
    "purely",
    "quite",
    "really",
    "so",
    "super",
    "thoroughly",
    "too",
    "totally",
    "truly",
    "utterly",
    "very",
];

/// Words that soften the valence of the word that follows.
pub(crate) const DAMPENERS: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
    "sorta",
];

/// Words that flip the valence of words shortly after them.
pub(crate) const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "neither", "never", "no", "nobody", "none", "nope", "nor", "not",
    "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

/// Immutable word → valence table.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f32>,
}

impl Lexicon {
    /// The built-in lexicon: base English words plus internet slang.
    #[must_use]
    pub fn builtin() -> Self {
        let mut valences = HashMap::with_capacity(BASE_WORDS.len() + SLANG_WORDS.len());
        for &(word, valence) in BASE_WORDS.iter().chain(SLANG_WORDS) {
            valences.insert(word.to_string(), valence);
        }
        Self { valences }
    }

    /// The built-in lexicon with `overrides` merged on top.
    ///
    /// Phrases longer than the scorer can match are skipped with a warning;
    /// files read through `load_lexicon_file` never contain them.
    #[must_use]
    pub fn with_overrides(overrides: &LexiconFile) -> Self {
        let mut lexicon = Self::builtin();
        for (word, valence) in &overrides.words {
            let parts: Vec<&str> = word.split_whitespace().collect();
            if parts.is_empty() || parts.len() > MAX_PHRASE_WORDS {
                tracing::warn!(word = %word, "lexicon override skipped: unmatchable phrase");
                continue;
            }
            lexicon.valences.insert(parts.join(" ").to_lowercase(), *valence);
        }
        lexicon
    }

    /// Valence of a lowercase word, phrase or emoticon.
    #[must_use]
    pub fn valence(&self, key: &str) -> Option<f32> {
        self.valences.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn builtin_has_base_and_slang_words() {
        let lex = Lexicon::builtin();
        assert!(lex.valence("love").unwrap() > 0.0);
        assert!(lex.valence("trash").unwrap() < 0.0);
        assert!(lex.valence("good vibes").unwrap() > 0.0);
    }

    #[test]
    fn slang_overrides_base_meaning() {
        let lex = Lexicon::builtin();
        assert!(lex.valence("sick").unwrap() > 0.0);
    }

    #[test]
    fn neutral_filler_is_absent() {
        let lex = Lexicon::builtin();
        assert!(lex.valence("okay").is_none());
        assert!(lex.valence("this").is_none());
    }

    #[test]
    fn all_valences_within_scale() {
        for &(word, valence) in BASE_WORDS.iter().chain(SLANG_WORDS) {
            assert!(valence.abs() <= 4.0, "{word} out of range");
            assert_eq!(word, word.to_lowercase(), "{word} must be lowercase");
        }
    }

    #[test]
    fn overrides_are_lowercased_and_merged() {
        let mut words = BTreeMap::new();
        words.insert("Rizz".to_string(), 2.5);
        words.insert("Good   Vibes".to_string(), 3.0);
        let lex = Lexicon::with_overrides(&LexiconFile { words });
        assert!((lex.valence("rizz").unwrap() - 2.5).abs() < f32::EPSILON);
        assert!((lex.valence("good vibes").unwrap() - 3.0).abs() < f32::EPSILON);
        assert!(lex.len() > 2);
    }

    #[test]
    fn long_override_phrases_are_skipped() {
        let mut words = BTreeMap::new();
        words.insert("not my vibe".to_string(), -3.0);
        let lex = Lexicon::with_overrides(&LexiconFile { words });
        assert!(lex.valence("not my vibe").is_none());
        assert_eq!(lex.len(), Lexicon::builtin().len());
    }
}
