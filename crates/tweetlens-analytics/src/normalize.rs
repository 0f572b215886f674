//! Tweet cleanup and tokenization shared by every text path.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").expect("valid regex"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid regex"));
static RETWEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*RT(?:\s*:\s*|\s+)").expect("valid regex"));
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w)").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static ACRONYM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(BRB|IDK|BTW|TTYL|IMO|IMHO|FYI|TMI|BYOB)\b").expect("valid regex")
});
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*").expect("valid regex"));

/// Chat acronyms and their expansions.
const ACRONYMS: &[(&str, &str)] = &[
    ("BRB", "be right back"),
    ("IDK", "I don't know"),
    ("BTW", "by the way"),
    ("TTYL", "talk to you later"),
    ("IMO", "in my opinion"),
    ("IMHO", "in my humble opinion"),
    ("FYI", "for your information"),
    ("TMI", "too much information"),
    ("BYOB", "bring your own beer"),
];

/// Which cleanup steps a [`TextNormalizer`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerPolicy {
    pub expand_acronyms: bool,
    pub strip_mentions: bool,
    pub strip_urls: bool,
    pub strip_retweet_marker: bool,
    pub strip_hashtag_marks: bool,
}

impl Default for NormalizerPolicy {
    fn default() -> Self {
        Self {
            expand_acronyms: true,
            strip_mentions: true,
            strip_urls: true,
            strip_retweet_marker: true,
            strip_hashtag_marks: true,
        }
    }
}

/// Applies one fixed cleanup policy to tweet text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    policy: NormalizerPolicy,
}

impl TextNormalizer {
    #[must_use]
    pub fn new(policy: NormalizerPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> NormalizerPolicy {
        self.policy
    }

    /// Clean tweet text while preserving case and punctuation.
    ///
    /// Removes mentions, URLs, a leading `RT :` marker and hashtag `#` signs,
    /// expands chat acronyms, and collapses whitespace. Typographic
    /// apostrophes become ASCII so `don’t` and `don't` read the same.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut out = text.replace(['\u{2019}', '\u{2018}'], "'");

        if self.policy.expand_acronyms {
            out = ACRONYM_RE
                .replace_all(&out, |caps: &Captures<'_>| expand_acronym(&caps[1]))
                .into_owned();
        }
        if self.policy.strip_mentions {
            out = MENTION_RE.replace_all(&out, "").into_owned();
        }
        if self.policy.strip_urls {
            out = URL_RE.replace_all(&out, "").into_owned();
        }
        if self.policy.strip_retweet_marker {
            out = RETWEET_RE.replace(&out, "").into_owned();
        }
        if self.policy.strip_hashtag_marks {
            out = HASHTAG_RE.replace_all(&out, "$1").into_owned();
        }

        WHITESPACE_RE.replace_all(&out, " ").trim().to_string()
    }

    /// Clean, lowercase and split text into word tokens.
    ///
    /// Inner apostrophes are kept (`don't`), all other punctuation is dropped.
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text).to_lowercase();
        TOKEN_RE
            .find_iter(&cleaned)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn expand_acronym(raw: &str) -> String {
    let upper = raw.to_ascii_uppercase();
    ACRONYMS
        .iter()
        .find(|(acronym, _)| *acronym == upper)
        .map_or_else(|| raw.to_string(), |(_, expansion)| (*expansion).to_string())
}
