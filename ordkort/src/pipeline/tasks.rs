//! Task battery stage.

use lesson::{build_battery, DistractorPool, Task};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::store::{RecordStore, Result};

/// Replace the item's tasks with a fresh battery.
pub async fn run<R: Rng + ?Sized>(
    records: &dyn RecordStore,
    content_id: Uuid,
    word: &str,
    theme: Option<&str>,
    pool: &DistractorPool,
    rng: &mut R,
) -> Result<Vec<Task>> {
    let battery = build_battery(content_id, word, theme, pool, rng);
    let stored = records.replace_tasks(content_id, &battery).await?;

    debug!(stage = "tasks", %content_id, tasks = stored.len(), "Stage complete");
    Ok(stored)
}
