//! Background dataset reload.
//!
//! Fetches the source tables again, rebuilds the base dataset and swaps it
//! into the session, logging each step to the job tracker.

use std::sync::Arc;

use log::{error, info};
use parking_lot::RwLock;

use super::dataset::{build_base_dataset, fetch_tables, BaseDataset};
use super::job_tracker::{JobTracker, LogLevel};
use super::session::Session;
use crate::config::PipelineSettings;
use crate::sources::CsvSource;

/// Reload the dataset under `job_id`.
///
/// Meant to be spawned as a background task. On failure the session keeps
/// serving the previous dataset.
pub async fn reload_dataset_async(
    job_id: String,
    tracker: JobTracker,
    source: Arc<dyn CsvSource>,
    settings: PipelineSettings,
    session: Arc<RwLock<Session>>,
) -> Result<Arc<BaseDataset>, String> {
    tracker.log(&job_id, LogLevel::Info, "Fetching source tables...");
    let tables = match fetch_tables(source.as_ref()).await {
        Ok(tables) => {
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "Fetched {} confirmed rows{}",
                    tables.confirmed.len(),
                    if tables.lockdown.is_some() {
                        " and the lockdown table"
                    } else {
                        ", no lockdown table"
                    }
                ),
            );
            tables
        }
        Err(e) => {
            let message = format!("Failed to fetch sources: {}", e);
            error!("Reload {}: {}", job_id, message);
            tracker.fail_job(&job_id, message.clone());
            return Err(message);
        }
    };

    tracker.log(&job_id, LogLevel::Info, "Merging tables...");
    let built = tokio::task::spawn_blocking(move || build_base_dataset(&tables, &settings)).await;
    let dataset = match built {
        Ok(Ok(dataset)) => Arc::new(dataset),
        Ok(Err(e)) => {
            let message = format!("Failed to build dataset: {}", e);
            error!("Reload {}: {}", job_id, message);
            tracker.fail_job(&job_id, message.clone());
            return Err(message);
        }
        Err(e) => {
            let message = format!("Task join error: {}", e);
            error!("Reload {}: {}", job_id, message);
            tracker.fail_job(&job_id, message.clone());
            return Err(message);
        }
    };

    for skipped in &dataset.report.skipped {
        tracker.log(
            &job_id,
            LogLevel::Warning,
            format!("Skipped {}: {}", skipped.display_name, skipped.reason),
        );
    }

    session.write().replace_dataset(Arc::clone(&dataset));
    info!("Reload {} installed {} regions", job_id, dataset.len());
    tracker.log(
        &job_id,
        LogLevel::Success,
        format!("Loaded {} regions", dataset.len()),
    );
    tracker.complete_job(&job_id, serde_json::to_value(&dataset.report).ok());

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ViewState;
    use crate::services::job_tracker::{JobKind, JobStatus};
    use crate::sources::{InMemorySource, SourceKind};

    const HEADER: &str = "Province/State,Country/Region,Lat,Long,3/1/20,3/2/20";

    fn source(regions: &[&str]) -> InMemorySource {
        let rows: String = regions
            .iter()
            .map(|r| format!(",{},0,0,150,300\n", r))
            .collect();
        let table = format!("{HEADER}\n{rows}");
        InMemorySource::new()
            .with_table(SourceKind::Confirmed, table.clone())
            .with_table(SourceKind::Deaths, table.clone())
            .with_table(SourceKind::Recovered, table)
    }

    async fn session_for(regions: &[&str]) -> Arc<RwLock<Session>> {
        let tables = fetch_tables(&source(regions)).await.unwrap();
        let dataset = build_base_dataset(&tables, &PipelineSettings::default()).unwrap();
        Arc::new(RwLock::new(Session::new(
            Arc::new(dataset),
            ["Italy"],
            ViewState::default(),
        )))
    }

    #[tokio::test]
    async fn test_reload_swaps_dataset_and_keeps_selection() {
        let session = session_for(&["Italy"]).await;
        let tracker = JobTracker::new();
        let job_id = tracker.create_job(JobKind::DatasetReload);

        let dataset = reload_dataset_async(
            job_id.clone(),
            tracker.clone(),
            Arc::new(source(&["Italy", "Spain"])),
            PipelineSettings::default(),
            Arc::clone(&session),
        )
        .await
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(session.read().dataset().len(), 2);
        assert_eq!(session.read().selection().selected_names(), vec!["Italy".to_string()]);
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.unwrap()["merged"], 2);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_dataset() {
        let session = session_for(&["Italy"]).await;
        let tracker = JobTracker::new();
        let job_id = tracker.create_job(JobKind::DatasetReload);

        let result = reload_dataset_async(
            job_id.clone(),
            tracker.clone(),
            Arc::new(InMemorySource::new()),
            PipelineSettings::default(),
            Arc::clone(&session),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(session.read().dataset().len(), 1);
        assert_eq!(tracker.get_job(&job_id).unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_merge_failure_fails_job() {
        let session = session_for(&["Italy"]).await;
        let tracker = JobTracker::new();
        let job_id = tracker.create_job(JobKind::DatasetReload);
        let broken = source(&["Italy"])
            .with_table(SourceKind::Confirmed, "Province/State,Lat,Long,3/1/20\n,0,0,150\n");

        let err = reload_dataset_async(
            job_id.clone(),
            tracker.clone(),
            Arc::new(broken),
            PipelineSettings::default(),
            Arc::clone(&session),
        )
        .await
        .unwrap_err();

        assert!(err.starts_with("Failed to build dataset"));
        assert_eq!(session.read().dataset().len(), 1);
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.logs.last().unwrap().message, err);
    }
}
