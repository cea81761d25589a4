//! In-process schedule binding.
//!
//! One tokio interval task per schedule descriptor.  The cron expressions
//! on the descriptors document the intended wall-clock slots for external
//! scheduler infrastructure; in-process we bind the plain cadence.  Jobs
//! themselves stay invocable on demand through the admin API.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::info;

use rally_engine::{jobs::schedules, MaintenanceJobs};

/// Spawn one ticking task per maintenance job.
///
/// The first (immediate) tick of each interval is consumed so startup
/// does not fire every job at once.
pub fn spawn(jobs: Arc<MaintenanceJobs>) -> Vec<JoinHandle<()>> {
    schedules()
        .into_iter()
        .map(|schedule| {
            let jobs = jobs.clone();
            info!(
                job = schedule.job.name(),
                cron = schedule.cron,
                every_secs = schedule.every.as_secs(),
                "Scheduled job"
            );
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(schedule.every);
                interval.tick().await;
                loop {
                    interval.tick().await;
                    jobs.run_logged(schedule.job, Utc::now()).await;
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rally_engine::LoggingDispatcher;
    use rally_store::MemoryStore;

    #[tokio::test]
    async fn test_spawns_one_task_per_job() {
        let store = Arc::new(MemoryStore::new());
        let jobs = Arc::new(MaintenanceJobs::new(store, Arc::new(LoggingDispatcher)));

        let handles = spawn(jobs);
        assert_eq!(handles.len(), schedules().len());
        for handle in handles {
            handle.abort();
        }
    }
}
