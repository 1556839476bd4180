//! Task battery construction.
//!
//! Each level gets a single-choice question plus one level-specific task.
//! Distractors are sampled without replacement from a [`DistractorPool`]
//! and every option list is shuffled exactly once; answer indices are
//! computed against that same stored order.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::texts::level_template;
use crate::types::{AnswerKey, Level, Task, TaskData, TaskKind};

/// Distractors added to each option list
pub const DISTRACTORS_PER_TASK: usize = 3;

/// Marker for the missing word in fill-in sentences
pub const BLANK: &str = "_____";

/// Pool of common words used as wrong options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistractorPool {
    words: Vec<String>,
}

impl DistractorPool {
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Everyday Norwegian words at beginner level.
    pub fn common_words() -> Self {
        Self::new([
            "mat", "hus", "bok", "bil", "skole", "vann", "sol", "katt", "hund", "stol", "bord",
            "eple", "brød", "melk", "buss", "tog", "jakke", "sko", "lampe", "vindu",
        ])
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sample up to `count` distinct words, skipping any that match
    /// `exclude` case-insensitively.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        exclude: &[&str],
        count: usize,
    ) -> Vec<String> {
        let excluded: Vec<String> = exclude.iter().map(|w| w.trim().to_lowercase()).collect();

        let mut candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| !excluded.contains(&w.to_lowercase()))
            .collect();
        candidates.sort_by_key(|w| w.to_lowercase());
        candidates.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());

        candidates
            .choose_multiple(rng, count)
            .map(|w| (*w).clone())
            .collect()
    }
}

impl Default for DistractorPool {
    fn default() -> Self {
        Self::common_words()
    }
}

/// Build the full task battery for a content item.
///
/// Levels 1 to 3 each get an `mcq` task, followed by `fill_blank`,
/// `sentence_complete` and `word_association` respectively.
pub fn build_battery<R: Rng + ?Sized>(
    content_id: Uuid,
    word: &str,
    theme: Option<&str>,
    pool: &DistractorPool,
    rng: &mut R,
) -> Vec<Task> {
    let theme = theme
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.to_lowercase() != word.to_lowercase());
    let builder = BatteryBuilder { content_id, word, theme, pool };

    let mut tasks = Vec::with_capacity(6);
    for level in Level::ALL {
        tasks.push(builder.mcq(level, rng));
        tasks.push(match level {
            Level::One => builder.fill_blank(rng),
            Level::Two => builder.sentence_complete(rng),
            Level::Three => builder.word_association(rng),
        });
    }
    tasks
}

struct BatteryBuilder<'a> {
    content_id: Uuid,
    word: &'a str,
    theme: Option<&'a str>,
    pool: &'a DistractorPool,
}

impl BatteryBuilder<'_> {
    fn excluded(&self) -> Vec<&str> {
        let mut excluded = vec![self.word];
        excluded.extend(self.theme);
        excluded
    }

    /// Correct answers plus distractors, shuffled once.
    fn options<R: Rng + ?Sized>(&self, correct: &[&str], rng: &mut R) -> Vec<String> {
        let mut options: Vec<String> = correct.iter().map(|c| c.to_string()).collect();
        options.extend(self.pool.sample(rng, &self.excluded(), DISTRACTORS_PER_TASK));
        options.shuffle(rng);
        options
    }

    fn task(
        &self,
        kind: TaskKind,
        level: Level,
        prompt: String,
        data: TaskData,
        answer: AnswerKey,
    ) -> Task {
        Task {
            id: None,
            content_id: self.content_id,
            kind,
            level,
            prompt: Some(prompt),
            data,
            answer,
        }
    }

    fn mcq<R: Rng + ?Sized>(&self, level: Level, rng: &mut R) -> Task {
        let options = self.options(&[self.word], rng);
        let index = options.iter().position(|o| o == self.word).unwrap_or(0);

        self.task(
            TaskKind::Mcq,
            level,
            format!("Velg riktig ord: {}", self.word),
            TaskData {
                question: Some("Hva er dagens ord?".to_string()),
                sentence: None,
                options,
            },
            AnswerKey::Index { index },
        )
    }

    fn fill_blank<R: Rng + ?Sized>(&self, rng: &mut R) -> Task {
        self.task(
            TaskKind::FillBlank,
            Level::One,
            "Fyll inn det manglende ordet".to_string(),
            TaskData {
                question: None,
                sentence: Some(level_template(Level::One, BLANK)),
                options: self.options(&[self.word], rng),
            },
            AnswerKey::Correct {
                correct: self.word.to_string(),
            },
        )
    }

    fn sentence_complete<R: Rng + ?Sized>(&self, rng: &mut R) -> Task {
        self.task(
            TaskKind::SentenceComplete,
            Level::Two,
            "Fullfør setningen".to_string(),
            TaskData {
                question: Some(format!("Fullfør setningen: I dag lærer vi om {}.", BLANK)),
                sentence: None,
                options: self.options(&[self.word], rng),
            },
            AnswerKey::Correct {
                correct: self.word.to_string(),
            },
        )
    }

    fn word_association<R: Rng + ?Sized>(&self, rng: &mut R) -> Task {
        let correct: Vec<&str> = std::iter::once(self.word).chain(self.theme).collect();

        self.task(
            TaskKind::WordAssociation,
            Level::Three,
            "Velg ord som passer".to_string(),
            TaskData {
                question: Some(format!("Hvilke ord hører til dagens tema «{}»?", self.word)),
                sentence: None,
                options: self.options(&correct, rng),
            },
            AnswerKey::CorrectSet {
                correct: correct.into_iter().map(String::from).collect(),
            },
        )
    }
}
