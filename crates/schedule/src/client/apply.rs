//! Reconcile a validated schedule against what is deployed.
//!
//! The mode of a deployed downtime is immutable, so a mode change is applied
//! as delete + create. Any other change is an in-place edit.

use serde::Serialize;
use tracing::{info, warn};

use crate::dto::{build, build_update};
use crate::model::DowntimeSchedule;
use crate::schema::Mode;
use crate::tags::{from_entity, TagError};
use crate::validation::{validate, ValidationErrors};

use super::traits::{ApiError, DowntimeApi};

/// A downtime that already exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    pub guid: String,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Created { guid: String },
    Updated { guid: String },
    /// The mode changed; the old downtime was deleted and a new one created.
    Replaced { old_guid: String, guid: String },
}

impl ApplyOutcome {
    /// GUID of the downtime now deployed.
    pub fn guid(&self) -> &str {
        match self {
            ApplyOutcome::Created { guid }
            | ApplyOutcome::Updated { guid }
            | ApplyOutcome::Replaced { guid, .. } => guid,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to decode downtime '{guid}': {source}")]
    Tags {
        guid: String,
        #[source]
        source: TagError,
    },

    #[error("downtime '{guid}' does not read back as a valid schedule\n{errors}")]
    Invalid { guid: String, errors: ValidationErrors },
}

/// Push `schedule` to the platform, creating, editing or replacing as needed.
pub async fn apply(
    api: &dyn DowntimeApi,
    account_id: u64,
    deployed: Option<&Deployed>,
    schedule: &DowntimeSchedule,
) -> Result<ApplyOutcome, ApiError> {
    let Some(deployed) = deployed else {
        let guid = api.create(account_id, &build(schedule)).await?;
        info!(guid = %guid, name = schedule.name(), backend = api.api_name(), "downtime created");
        return Ok(ApplyOutcome::Created { guid });
    };

    if deployed.mode == schedule.mode() {
        api.update(&deployed.guid, &build_update(schedule)).await?;
        info!(guid = %deployed.guid, name = schedule.name(), "downtime updated in place");
        return Ok(ApplyOutcome::Updated {
            guid: deployed.guid.clone(),
        });
    }

    warn!(
        guid = %deployed.guid,
        from = %deployed.mode,
        to = %schedule.mode(),
        "mode changed; replacing downtime"
    );
    api.delete(&deployed.guid).await?;
    let guid = api.create(account_id, &build(schedule)).await?;
    Ok(ApplyOutcome::Replaced {
        old_guid: deployed.guid.clone(),
        guid,
    })
}

/// Read a deployed downtime back into a validated schedule. `None` when the
/// downtime no longer exists.
pub async fn refresh(api: &dyn DowntimeApi, guid: &str) -> Result<Option<DowntimeSchedule>, ApplyError> {
    let Some(entity) = api.read(guid).await? else {
        return Ok(None);
    };
    let raw = from_entity(&entity).map_err(|source| ApplyError::Tags {
        guid: guid.to_string(),
        source,
    })?;
    validate(&raw)
        .map(Some)
        .map_err(|errors| ApplyError::Invalid {
            guid: guid.to_string(),
            errors,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::InMemoryDowntimeApi;
    use crate::schema::RawScheduleConfig;

    fn schedule(mode_block: &str) -> DowntimeSchedule {
        let yaml = format!(
            "name: window\nstart_time: \"2024-04-01T01:00:00\"\nend_time: \"2024-04-01T02:00:00\"\ntime_zone: Europe/Paris\n{mode_block}"
        );
        validate(&RawScheduleConfig::from_yaml(&yaml).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn create_then_update_then_replace() {
        let api = InMemoryDowntimeApi::new();
        let daily = schedule("mode: DAILY\n");

        let created = apply(&api, 1, None, &daily).await.unwrap();
        assert!(matches!(created, ApplyOutcome::Created { .. }));
        let deployed = Deployed {
            guid: created.guid().to_string(),
            mode: Mode::Daily,
        };

        let daily_capped = schedule("mode: DAILY\nend_repeat:\n  on_repeat: 5\n");
        let updated = apply(&api, 1, Some(&deployed), &daily_capped).await.unwrap();
        assert_eq!(updated, ApplyOutcome::Updated { guid: deployed.guid.clone() });
        assert_eq!(refresh(&api, &deployed.guid).await.unwrap(), Some(daily_capped));

        let monthly = schedule("mode: MONTHLY\nfrequency:\n  days_of_month: [1]\n");
        let replaced = apply(&api, 1, Some(&deployed), &monthly).await.unwrap();
        match &replaced {
            ApplyOutcome::Replaced { old_guid, guid } => {
                assert_eq!(old_guid, &deployed.guid);
                assert_ne!(guid, old_guid);
            }
            other => panic!("expected replacement, got {other:?}"),
        }
        assert!(refresh(&api, &deployed.guid).await.unwrap().is_none());
        assert_eq!(refresh(&api, replaced.guid()).await.unwrap(), Some(monthly));
        assert_eq!(api.len(), 1);
    }

    #[tokio::test]
    async fn replacing_a_vanished_downtime_fails() {
        let api = InMemoryDowntimeApi::new();
        let deployed = Deployed {
            guid: "gone".to_string(),
            mode: Mode::Once,
        };
        let err = apply(&api, 1, Some(&deployed), &schedule("mode: DAILY\n")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(api.is_empty());
    }
}
