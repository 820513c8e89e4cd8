use metrics_exporter_prometheus::PrometheusHandle;
use screening_chat::workflows::screening::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local submission store, newest first.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<VecDeque<SubmissionRecord>>>,
}

impl InMemorySubmissionRepository {
    fn guard(&self) -> Result<MutexGuard<'_, VecDeque<SubmissionRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("submission store lock poisoned".into()))
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn append(&self, record: SubmissionRecord) -> Result<SubmissionId, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        let id = record.id.clone();
        guard.push_front(record);
        Ok(id)
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Ok(self.guard()?.iter().cloned().collect())
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.guard()?.clear();
        Ok(())
    }
}
