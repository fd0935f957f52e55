use chrono::{DateTime, Utc};

use super::{JsonCollection, StoreError, Write};
use crate::models::job::{JobPatch, JobRecord, NewJob};

pub struct JobStore {
    jobs: JsonCollection<JobRecord>,
}

impl JobStore {
    pub fn new(jobs: JsonCollection<JobRecord>) -> Self {
        Self { jobs }
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        self.jobs.ensure_exists(&[]).await
    }

    pub async fn create(
        &self,
        job: NewJob,
        owner: String,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, StoreError> {
        self.jobs
            .transact(|jobs| {
                let id = next_id(jobs, now);
                let record = job.into_record(id, owner, now);
                jobs.push(record.clone());
                Write::Commit(record)
            })
            .await
    }

    /// Jobs owned by `owner`, or every job when `None`. Newest first.
    pub async fn list(&self, owner: Option<&str>) -> Result<Vec<JobRecord>, StoreError> {
        let mut jobs = self.jobs.load().await?;
        if let Some(owner) = owner {
            jobs.retain(|j| j.email == owner);
        }
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    pub async fn get(&self, id: &str) -> Result<Option<JobRecord>, StoreError> {
        let jobs = self.jobs.load().await?;
        Ok(jobs.into_iter().find(|j| j.id == id))
    }

    pub async fn update(
        &self,
        id: &str,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JobRecord>, StoreError> {
        self.jobs
            .transact(|jobs| match jobs.iter_mut().find(|j| j.id == id) {
                Some(job) => {
                    patch.apply(job, now);
                    Write::Commit(Some(job.clone()))
                }
                None => Write::Discard(None),
            })
            .await
    }

    /// Removes and returns the job.
    pub async fn delete(&self, id: &str) -> Result<Option<JobRecord>, StoreError> {
        self.jobs
            .transact(|jobs| match jobs.iter().position(|j| j.id == id) {
                Some(index) => Write::Commit(Some(jobs.remove(index))),
                None => Write::Discard(None),
            })
            .await
    }
}

/// Epoch milliseconds of `now`, bumped until no existing job uses it.
fn next_id(jobs: &[JobRecord], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    while jobs.iter().any(|j| j.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::models::GenerationRequest;
    use crate::models::job::JobStatus;
    use chrono::{Duration, TimeZone};

    async fn store() -> (tempfile::TempDir, JobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(JsonCollection::new(dir.path().join("jobs.json")));
        store.init().await.unwrap();
        (dir, store)
    }

    fn new_job(title: &str) -> NewJob {
        NewJob {
            details: GenerationRequest {
                job_title: title.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_unique_millisecond_ids() {
        let (_dir, jobs) = store().await;
        let now = at(1_700_000_000_000);

        let a = jobs.create(new_job("Barista"), "a@x.io".into(), now).await.unwrap();
        let b = jobs.create(new_job("Cook"), "a@x.io".into(), now).await.unwrap();

        assert_eq!(a.id, "1700000000000");
        assert_eq!(b.id, "1700000000001");
        assert_eq!(a.status, JobStatus::Active);
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_newest_first() {
        let (_dir, jobs) = store().await;
        let base = at(1_700_000_000_000);
        jobs.create(new_job("Old"), "a@x.io".into(), base).await.unwrap();
        jobs.create(new_job("Other"), "b@x.io".into(), base + Duration::seconds(5))
            .await
            .unwrap();
        jobs.create(new_job("New"), "a@x.io".into(), base + Duration::seconds(10))
            .await
            .unwrap();

        let mine: Vec<_> = jobs
            .list(Some("a@x.io"))
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.details.job_title)
            .collect();
        assert_eq!(mine, vec!["New", "Old"]);
        assert_eq!(jobs.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let (_dir, jobs) = store().await;
        assert!(jobs
            .update("missing", JobPatch::default(), Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(jobs.delete("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_then_delete_roundtrip() {
        let (_dir, jobs) = store().await;
        let created = jobs
            .create(new_job("Barista"), "a@x.io".into(), at(1_700_000_000_000))
            .await
            .unwrap();

        let patch = JobPatch {
            status: Some(JobStatus::Draft),
            ..Default::default()
        };
        let updated = jobs.update(&created.id, patch, Utc::now()).await.unwrap().unwrap();
        assert_eq!(updated.status, JobStatus::Draft);
        assert!(updated.updated_at.is_some());
        assert_eq!(jobs.get(&created.id).await.unwrap(), Some(updated.clone()));

        let removed = jobs.delete(&created.id).await.unwrap();
        assert_eq!(removed, Some(updated));
        assert!(jobs.get(&created.id).await.unwrap().is_none());
    }
}
