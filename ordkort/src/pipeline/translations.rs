//! Translation fan-out over the classroom's learner first languages.

use futures::future::join_all;
use lesson::{LearnerProfile, Translation};
use ordkort_agent::Translator;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use uuid::Uuid;

use super::Stage;
use crate::store::{RecordStore, Result};

/// Distinct, non-empty first-language codes, sorted.
pub fn distinct_languages(profiles: &[LearnerProfile]) -> BTreeSet<String> {
    profiles
        .iter()
        .filter_map(|p| p.l1.as_deref())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text stored when no translation could be obtained: the word itself.
pub fn fallback_translation(word: &str) -> String {
    word.to_string()
}

/// Translate `word` into every language and replace one row per language.
///
/// Provider calls run concurrently; rows are written one language at a
/// time, so a store failure leaves earlier languages written.
pub async fn run(
    records: &dyn RecordStore,
    stage: Stage<'_, dyn Translator>,
    content_id: Uuid,
    word: &str,
    source_language: &str,
    languages: &BTreeSet<String>,
) -> Result<Vec<Translation>> {
    let texts: Vec<String> = match stage {
        Stage::Remote(translator) => {
            let calls = languages
                .iter()
                .map(|target| translator.translate(word, source_language, target));
            join_all(calls)
                .await
                .into_iter()
                .zip(languages)
                .map(|(result, target)| match result {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(
                            stage = "translations",
                            language = %target,
                            error = %e,
                            "Translation failed, using word"
                        );
                        fallback_translation(word)
                    }
                })
                .collect()
        }
        Stage::Fallback => languages.iter().map(|_| fallback_translation(word)).collect(),
    };

    let mut rows = Vec::with_capacity(languages.len());
    for (language_code, text) in languages.iter().zip(texts) {
        let row = Translation {
            content_id,
            language_code: language_code.clone(),
            text,
        };
        records.replace_translation(&row).await?;
        rows.push(row);
    }

    debug!(stage = "translations", %content_id, languages = rows.len(), "Stage complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(l1: Option<&str>) -> LearnerProfile {
        LearnerProfile {
            id: Uuid::new_v4(),
            classroom_id: None,
            l1: l1.map(str::to_string),
            difficulty_level: 1,
        }
    }

    #[test]
    fn test_distinct_languages() {
        let profiles = vec![
            profile(Some("so")),
            profile(Some("ar")),
            profile(None),
            profile(Some("ar")),
            profile(Some("  ")),
        ];
        let languages: Vec<String> = distinct_languages(&profiles).into_iter().collect();
        assert_eq!(languages, vec!["ar", "so"]);
    }

    #[test]
    fn test_fallback_is_verbatim() {
        assert_eq!(fallback_translation("brød"), "brød");
    }
}
