//! Cron runner for maintenance jobs.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use super::{SchedulerConfig, purge_rate_limits};
use crate::state::RateLimiters;

/// Owns the cron runner and the ids of the jobs it registered.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
    jobs: Vec<Uuid>,
}

impl Scheduler {
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        Ok(Self {
            inner: JobScheduler::new().await?,
            config,
            jobs: Vec::new(),
        })
    }

    /// Drop elapsed limiter windows on `schedule` (six-field cron).
    pub async fn add_rate_limit_purge(
        &mut self,
        schedule: &str,
        limiters: RateLimiters,
    ) -> Result<Uuid, JobSchedulerError> {
        let job = Job::new_async(schedule, move |_id, _lock| {
            let limiters = limiters.clone();
            Box::pin(async move {
                let purged = purge_rate_limits(&limiters).await;
                tracing::trace!(purged, "Rate limit purge tick");
            })
        })?;

        let id = self.inner.add(job).await?;
        self.jobs.push(id);
        tracing::info!(%schedule, job_id = %id, "Rate limit purge scheduled");
        Ok(id)
    }

    /// Begin firing jobs. A disabled scheduler keeps its jobs idle.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!(jobs = self.jobs.len(), "Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!(jobs = self.jobs.len(), "Scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_malformed_schedule() {
        let mut scheduler = Scheduler::new(SchedulerConfig::default()).await.unwrap();
        let result = scheduler
            .add_rate_limit_purge("every minute", RateLimiters::fixed_window())
            .await;
        assert!(result.is_err());
        assert!(scheduler.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_registers_purge_job() {
        let mut scheduler = Scheduler::new(SchedulerConfig { enabled: false })
            .await
            .unwrap();
        scheduler
            .add_rate_limit_purge("0 * * * * *", RateLimiters::fixed_window())
            .await
            .unwrap();
        assert_eq!(scheduler.jobs.len(), 1);
        scheduler.start().await.unwrap();
    }
}
