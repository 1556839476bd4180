//! Lesson model for Ordkort
//!
//! Everything a daily word turns into, without any I/O:
//!
//! - **Types**: content items, translations, leveled texts, tasks, learner
//!   profiles and weekly tests, shaped like the rows the backend stores
//! - **Illustration**: the deterministic SVG fallback and image prompt
//! - **Texts**: leveled text prompts, LLM output parsing and template fallback
//! - **Battery**: per-level interactive tasks with shuffled distractors
//! - **Scoring**: binary answer checking per task kind
//! - **Weekly**: the weekly test assembled from approved words
//!
//! # Example
//!
//! ```
//! use lesson::{build_battery, DistractorPool};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let tasks = build_battery(uuid::Uuid::new_v4(), "eple", None, &DistractorPool::common_words(), &mut rng);
//! assert_eq!(tasks.len(), 6);
//! ```

pub mod battery;
pub mod error;
pub mod illustration;
pub mod scoring;
pub mod texts;
pub mod types;
pub mod weekly;

// Re-export main types
pub use battery::{build_battery, DistractorPool, DISTRACTORS_PER_TASK};
pub use error::LessonError;
pub use illustration::{Illustration, ImageFormat};
pub use scoring::score;
pub use texts::{LevelTextPrompt, LevelTexts};
pub use types::*;
pub use weekly::{build_weekly_test, iso_week, WEEKLY_TEST_SIZE};
