//! Map-backed [`DowntimeApi`] used for dry runs and tests.
//!
//! Stores each downtime the way the platform does (an entity with tags), so
//! read-back goes through the same tag decoding as a live backend would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::dto::{ExternalCreateInput, ExternalUpdateInput, RecurrenceInput, UpdateConfig};
use crate::schema::Mode;
use crate::tags::{to_entity_tags, DowntimeEntity};

use super::traits::{ApiError, DowntimeApi};

struct StoredDowntime {
    account_id: u64,
    input: ExternalCreateInput,
    entity: DowntimeEntity,
}

#[derive(Default)]
pub struct InMemoryDowntimeApi {
    downtimes: RwLock<HashMap<String, StoredDowntime>>,
    next_id: AtomicU64,
}

impl InMemoryDowntimeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.downtimes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mode of a stored downtime.
    pub fn mode_of(&self, guid: &str) -> Option<Mode> {
        self.downtimes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(guid)
            .map(|d| d.input.mode())
    }

    fn entity(guid: &str, account_id: u64, input: &ExternalCreateInput) -> Result<DowntimeEntity, ApiError> {
        let tags = to_entity_tags(account_id, input).map_err(|e| ApiError::Rejected(e.to_string()))?;
        Ok(DowntimeEntity {
            guid: guid.to_string(),
            name: input.name.clone(),
            monitor_guids: input.monitor_guids.clone(),
            tags,
        })
    }
}

/// Fold an edit into the stored create payload. Modes must already match.
fn merge_update(input: &ExternalCreateInput, update: &ExternalUpdateInput) -> ExternalCreateInput {
    let (window, recurrence) = match &update.config {
        UpdateConfig::Once { window } => (window, RecurrenceInput::Once),
        UpdateConfig::Daily { window, end_repeat } => (
            window,
            RecurrenceInput::Daily {
                end_repeat: end_repeat.clone(),
            },
        ),
        UpdateConfig::Weekly {
            window,
            end_repeat,
            maintenance_days,
        } => (
            window,
            RecurrenceInput::Weekly {
                end_repeat: end_repeat.clone(),
                maintenance_days: maintenance_days.clone(),
            },
        ),
        UpdateConfig::Monthly {
            window,
            end_repeat,
            frequency,
        } => (
            window,
            RecurrenceInput::Monthly {
                end_repeat: end_repeat.clone(),
                frequency: frequency.clone(),
            },
        ),
    };
    debug_assert_eq!(input.mode(), update.mode());

    ExternalCreateInput {
        name: update.name.clone(),
        monitor_guids: update.monitor_guids.clone(),
        window: window.clone(),
        recurrence,
    }
}

#[async_trait::async_trait]
impl DowntimeApi for InMemoryDowntimeApi {
    async fn create(&self, account_id: u64, input: &ExternalCreateInput) -> Result<String, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let guid = format!("{account_id}|SYNTH|DOWNTIME|{id}");
        let entity = Self::entity(&guid, account_id, input)?;

        self.downtimes.write().unwrap_or_else(PoisonError::into_inner).insert(
            guid.clone(),
            StoredDowntime {
                account_id,
                input: input.clone(),
                entity,
            },
        );
        info!(guid = %guid, name = %input.name, mode = %input.mode(), "created downtime");
        Ok(guid)
    }

    async fn update(&self, guid: &str, input: &ExternalUpdateInput) -> Result<(), ApiError> {
        let mut downtimes = self.downtimes.write().unwrap_or_else(PoisonError::into_inner);
        let stored = downtimes
            .get_mut(guid)
            .ok_or_else(|| ApiError::NotFound(guid.to_string()))?;

        let deployed = stored.input.mode();
        if deployed != input.mode() {
            return Err(ApiError::Rejected(format!(
                "cannot change the mode of downtime '{guid}' from {deployed} to {}",
                input.mode()
            )));
        }

        let merged = merge_update(&stored.input, input);
        stored.entity = Self::entity(guid, stored.account_id, &merged)?;
        stored.input = merged;
        info!(guid, name = %input.name, mode = %deployed, "updated downtime");
        Ok(())
    }

    async fn delete(&self, guid: &str) -> Result<(), ApiError> {
        match self.downtimes.write().unwrap_or_else(PoisonError::into_inner).remove(guid) {
            Some(_) => {
                info!(guid, "deleted downtime");
                Ok(())
            }
            None => Err(ApiError::NotFound(guid.to_string())),
        }
    }

    async fn read(&self, guid: &str) -> Result<Option<DowntimeEntity>, ApiError> {
        let entity = self
            .downtimes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(guid)
            .map(|d| d.entity.clone());
        debug!(guid, found = entity.is_some(), "read downtime");
        Ok(entity)
    }

    fn api_name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{build, build_update};
    use crate::schema::RawScheduleConfig;
    use crate::validation::validate;

    fn schedule(yaml: &str) -> crate::model::DowntimeSchedule {
        validate(&RawScheduleConfig::from_yaml(yaml).unwrap()).unwrap()
    }

    const DAILY: &str = "mode: DAILY\nname: nightly\nstart_time: \"2024-01-01T02:00:00\"\nend_time: \"2024-01-01T03:00:00\"\ntime_zone: UTC\n";
    const WEEKLY: &str = "mode: WEEKLY\nname: weekly\nstart_time: \"2024-01-01T02:00:00\"\nend_time: \"2024-01-01T03:00:00\"\ntime_zone: UTC\nmaintenance_days: [MONDAY]\n";

    #[tokio::test]
    async fn create_read_delete() {
        let api = InMemoryDowntimeApi::new();
        let guid = api.create(7, &build(&schedule(DAILY))).await.unwrap();
        assert_eq!(api.len(), 1);
        assert_eq!(api.mode_of(&guid), Some(Mode::Daily));

        let entity = api.read(&guid).await.unwrap().unwrap();
        assert_eq!(entity.name, "nightly");
        assert!(entity.tags.iter().any(|t| t.key == "type" && t.values == ["DAILY"]));

        api.delete(&guid).await.unwrap();
        assert!(api.read(&guid).await.unwrap().is_none());
        assert!(matches!(api.delete(&guid).await, Err(ApiError::NotFound(_))));
        assert!(api.is_empty());
    }

    #[tokio::test]
    async fn update_rejects_mode_change() {
        let api = InMemoryDowntimeApi::new();
        let guid = api.create(7, &build(&schedule(DAILY))).await.unwrap();
        let err = api.update(&guid, &build_update(&schedule(WEEKLY))).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
        assert_eq!(api.mode_of(&guid), Some(Mode::Daily));
    }

    #[tokio::test]
    async fn update_in_place() {
        let api = InMemoryDowntimeApi::new();
        let guid = api.create(7, &build(&schedule(DAILY))).await.unwrap();
        let renamed = DAILY.replace("nightly", "renamed");
        api.update(&guid, &build_update(&schedule(&renamed))).await.unwrap();
        assert_eq!(api.read(&guid).await.unwrap().unwrap().name, "renamed");
        assert!(matches!(
            api.update("missing", &build_update(&schedule(DAILY))).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_accepts_end_date_without_midnight() {
        let api = InMemoryDowntimeApi::new();
        let yaml = DAILY.replace("UTC", "America/Santiago") + "end_repeat:\n  on_date: \"2024-09-08\"\n";
        let guid = api.create(7, &build(&schedule(&yaml))).await.unwrap();
        let entity = api.read(&guid).await.unwrap().unwrap();
        assert!(entity.tags.iter().any(|t| t.key == "endRepeat" && t.values == ["1725768000000"]));
    }
}
