use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Largest absolute valence a lexicon entry may carry.
pub const MAX_VALENCE: f32 = 4.0;

/// Longest phrase, in words, the scorer can match.
pub const MAX_PHRASE_WORDS: usize = 2;

/// Word valences merged over the built-in sentiment lexicon.
///
/// Keys may be single words or two-word phrases; matching is
/// case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconFile {
    #[serde(default)]
    pub words: BTreeMap<String, f32>,
}

/// Load and validate a lexicon override file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lexicon_file(path: &Path) -> Result<LexiconFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LexiconFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file = parse_lexicon_file(&content)?;
    tracing::debug!(
        path = %path.display(),
        entries = file.words.len(),
        "lexicon overrides loaded"
    );
    Ok(file)
}

fn parse_lexicon_file(content: &str) -> Result<LexiconFile, ConfigError> {
    let file: LexiconFile = serde_yaml::from_str(content).map_err(ConfigError::LexiconFileParse)?;
    validate_lexicon(&file)?;
    Ok(file)
}

fn validate_lexicon(file: &LexiconFile) -> Result<(), ConfigError> {
    for (word, valence) in &file.words {
        if word.trim().is_empty() {
            return Err(ConfigError::Validation(
                "lexicon words must be non-empty".to_string(),
            ));
        }
        if word.split_whitespace().count() > MAX_PHRASE_WORDS {
            return Err(ConfigError::Validation(format!(
                "lexicon phrase '{word}' is longer than {MAX_PHRASE_WORDS} words"
            )));
        }
        if !valence.is_finite() || valence.abs() > MAX_VALENCE {
            return Err(ConfigError::Validation(format!(
                "lexicon word '{word}' has valence {valence}; must lie in [-{MAX_VALENCE}, {MAX_VALENCE}]"
            )));
        }
    }
    Ok(())
}
