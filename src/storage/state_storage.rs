use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::timeline::{default_state, entities::AppState};

use super::key_value::KeyValueStore;

pub const STATE_KEY: &str = "timeline-stepper-state";

/// Loads and saves [AppState] as a single json blob inside a [KeyValueStore].
pub struct StateStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StateStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the saved state. Falls back to [default_state] when nothing was saved or the blob
    /// can't be parsed. A broken blob is left alone until the next [StateStorage::save].
    pub async fn load(&self, today: NaiveDate) -> Result<AppState> {
        let Some(blob) = self.store.get(STATE_KEY).await? else {
            debug!("No saved state, starting from default");
            return Ok(default_state(today));
        };

        match serde_json::from_str::<AppState>(&blob) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Failed to parse saved state: {e}");
                Ok(default_state(today))
            }
        }
    }

    pub async fn save(&self, state: &AppState) -> Result<()> {
        let blob = serde_json::to_string(state)?;
        self.store.set(STATE_KEY, &blob).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        storage::key_value::{FileKeyValueStore, KeyValueStore},
        timeline::{default_state, entities::Todo},
        utils::logging::TEST_LOGGING,
    };

    use super::{StateStorage, STATE_KEY};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_load_without_saved_state() -> Result<()> {
        let dir = tempdir()?;
        let storage = StateStorage::new(FileKeyValueStore::new(dir.path().to_owned())?);
        assert_eq!(storage.load(today()).await?, default_state(today()));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<()> {
        let dir = tempdir()?;
        let storage = StateStorage::new(FileKeyValueStore::new(dir.path().to_owned())?);

        let mut state = default_state(today());
        state.goal.text = "Learn the violin".into();
        state.days[1].todos.push(Todo::new("77", "Scales").with_completed(true));
        state.current_day_id = 2;
        storage.save(&state).await?;

        let other_day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(storage.load(other_day).await?, state);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_state_falls_back_to_default() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;
        store.set(STATE_KEY, "{\"days\": [").await?;

        let storage = StateStorage::new(&store);
        assert_eq!(storage.load(today()).await?, default_state(today()));
        assert_eq!(store.get(STATE_KEY).await?.as_deref(), Some("{\"days\": ["));
        Ok(())
    }
}
