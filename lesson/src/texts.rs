//! Leveled reading texts.
//!
//! Builds the prompt pair for the text provider, parses whatever comes
//! back, and supplies the template texts used whenever the provider is
//! skipped or its output is unusable.

use uuid::Uuid;

use crate::illustration::{level_alt_text, Illustration};
use crate::types::{Level, LeveledText};

/// Exactly one text per level, in level order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTexts([String; 3]);

impl LevelTexts {
    pub fn new(level_1: String, level_2: String, level_3: String) -> Self {
        Self([level_1, level_2, level_3])
    }

    /// Template texts built by substituting the word into fixed sentences.
    pub fn template(word: &str) -> Self {
        Self::new(
            level_template(Level::One, word),
            level_template(Level::Two, word),
            level_template(Level::Three, word),
        )
    }

    pub fn get(&self, level: Level) -> &str {
        &self.0[level.number() as usize - 1]
    }

    /// Rows for the `level_texts` table, all sharing one illustration.
    pub fn into_rows(
        self,
        content_id: Uuid,
        word: &str,
        illustration: &Illustration,
    ) -> Vec<LeveledText> {
        Level::ALL
            .into_iter()
            .zip(self.0)
            .map(|(level, text)| LeveledText {
                content_id,
                level,
                text,
                image_url: Some(illustration.url.clone()),
                image_alt: Some(level_alt_text(level, word)),
            })
            .collect()
    }
}

/// Template sentence for one level.
pub fn level_template(level: Level, word: &str) -> String {
    match level {
        Level::One => format!("Jeg ser {}. Det er fint.", word),
        Level::Two => format!("{} er tema i dag. Vi lærer ord og setninger om {}.", word, word),
        Level::Three => format!("I dag snakker vi om {}. Les og øv: \"{}\".", word, word),
    }
}

/// Prompt pair sent to the text provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTextPrompt {
    pub system: String,
    pub user: String,
}

impl LevelTextPrompt {
    /// Sampling temperature used for leveled texts
    pub const TEMPERATURE: f32 = 0.4;
    /// Completion token budget
    pub const MAX_TOKENS: u32 = 400;

    pub fn for_word(word: &str) -> Self {
        let system =
            "Du skriver veldig enkle norske setninger for voksne på nivå A1-A2.".to_string();

        let mut user = String::new();
        user.push_str(&format!(
            "Du skal lage 3 svært korte norske lesetekster (nivå 1-3) for voksne A1-A2. Bruk nøkkelordet \"{}\".\n",
            word
        ));
        user.push_str(
            "Nivå 1: 1-2 enkle setninger. Nivå 2: 2-3 enkle setninger. Nivå 3: 3-4 korte setninger.\n",
        );
        user.push_str("Returner som JSON-array med tre strenger.");

        Self { system, user }
    }
}

/// Parse provider output into three texts.
///
/// Strict parsing first: a JSON array (optionally inside a Markdown code
/// fence) whose first three elements are non-empty. Otherwise the raw
/// output is split into non-empty lines, accepted only when exactly three
/// remain. Returns `None` when neither yields three texts.
pub fn parse_level_texts(raw: &str) -> Option<LevelTexts> {
    parse_json_array(raw).or_else(|| parse_lines(raw))
}

fn parse_json_array(raw: &str) -> Option<LevelTexts> {
    let body = strip_code_fence(raw);
    let values: Vec<serde_json::Value> = serde_json::from_str(body).ok()?;
    if values.len() < 3 {
        return None;
    }

    let mut texts = values.into_iter().take(3).map(|value| match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    });

    let (a, b, c) = (texts.next()?, texts.next()?, texts.next()?);
    if a.is_empty() || b.is_empty() || c.is_empty() {
        return None;
    }
    Some(LevelTexts::new(a, b, c))
}

fn parse_lines(raw: &str) -> Option<LevelTexts> {
    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    match lines.as_slice() {
        [a, b, c] => Some(LevelTexts::new(a.to_string(), b.to_string(), c.to_string())),
        _ => None,
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let raw = r#"["Jeg har en katt.", "Katten er liten. Den sover.",
            "Katten heter Mio. Den liker melk. Den sover mye."]"#;
        let texts = parse_level_texts(raw).unwrap();
        assert_eq!(texts.get(Level::One), "Jeg har en katt.");
        assert_eq!(texts.get(Level::Three), "Katten heter Mio. Den liker melk. Den sover mye.");
    }

    #[test]
    fn test_parse_json_array_takes_first_three() {
        let texts = parse_level_texts(r#"["a", "b", "c", "d"]"#).unwrap();
        assert_eq!(texts, LevelTexts::new("a".into(), "b".into(), "c".into()));
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n[\"en\", \"to\", \"tre\"]\n```";
        let texts = parse_level_texts(raw).unwrap();
        assert_eq!(texts.get(Level::Two), "to");
    }

    #[test]
    fn test_parse_lines_requires_exactly_three() {
        let texts = parse_level_texts("Linje en.\n\nLinje to.\nLinje tre.\n").unwrap();
        assert_eq!(texts.get(Level::Two), "Linje to.");

        assert!(parse_level_texts("En.\nTo.").is_none());
        assert!(parse_level_texts("En.\nTo.\nTre.\nFire.").is_none());
    }

    #[test]
    fn test_parse_rejects_short_array_and_empty_strings() {
        assert!(parse_level_texts(r#"["bare en", "to"]"#).is_none());
        assert!(parse_level_texts(r#"["", "to", "tre"]"#).is_none());
        assert!(parse_level_texts("").is_none());
    }

    #[test]
    fn test_template_embeds_word() {
        let texts = LevelTexts::template("skole");
        assert_eq!(texts.get(Level::One), "Jeg ser skole. Det er fint.");
        assert_eq!(
            texts.get(Level::Two),
            "skole er tema i dag. Vi lærer ord og setninger om skole."
        );
        assert_eq!(texts.get(Level::Three), "I dag snakker vi om skole. Les og øv: \"skole\".");
    }

    #[test]
    fn test_into_rows_shares_illustration() {
        let illustration = Illustration {
            url: "https://cdn.test/dailyword-1.svg".into(),
            alt: "Illustration of sol".into(),
        };
        let rows = LevelTexts::template("sol").into_rows(Uuid::nil(), "sol", &illustration);

        assert_eq!(rows.len(), 3);
        let levels: Vec<u8> = rows.iter().map(|r| r.level.number()).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert!(rows
            .iter()
            .all(|r| r.image_url.as_deref() == Some("https://cdn.test/dailyword-1.svg")));
        assert_eq!(rows[1].image_alt.as_deref(), Some("Nivå 2: sol"));
    }

    #[test]
    fn test_prompt_mentions_word_and_levels() {
        let prompt = LevelTextPrompt::for_word("tog");
        assert!(prompt.user.contains("\"tog\""));
        assert!(prompt.user.contains("Nivå 3: 3-4 korte setninger."));
        assert!(prompt.user.contains("JSON-array med tre strenger"));
        assert!(prompt.system.contains("A1-A2"));
    }
}
