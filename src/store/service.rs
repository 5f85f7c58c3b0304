//! Record store service shared by the HTTP surface.

use crate::{
    metrics::{MetricsSnapshot, StoreMetrics},
    store::{
        records::StudentRecords,
        seed::sample_students,
        types::{NewStudent, StoreError, Student, StudentKey, StudentPatch},
    },
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Sole owner of the student collection.
///
/// Every operation takes the collection lock exactly once and completes while holding it, so
/// callers never observe a partially applied mutation. Construct one store near process start
/// and share it through an `Arc`; tests build their own isolated instances.
pub struct RecordStore {
    records: RwLock<StudentRecords>,
    metrics: StoreMetrics,
}

/// Abstraction over the record store used by external surfaces (HTTP).
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Return every student in insertion order.
    async fn list_students(&self) -> Vec<Student>;

    /// Look up a single student by key.
    async fn get_student(&self, key: &StudentKey) -> Result<Student, StoreError>;

    /// Insert a new student, rejecting key collisions.
    async fn create_student(&self, student: NewStudent) -> Result<Student, StoreError>;

    /// Merge a partial update into an existing student.
    async fn update_student(
        &self,
        key: &StudentKey,
        patch: StudentPatch,
    ) -> Result<Student, StoreError>;

    /// Remove a student.
    async fn delete_student(&self, key: &StudentKey) -> Result<(), StoreError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl RecordStore {
    /// Build an empty store.
    pub fn new() -> Self {
        Self::from_records(StudentRecords::new())
    }

    /// Build a store preloaded with the given students, rejecting duplicate keys.
    pub fn with_students<I>(students: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Student>,
    {
        StudentRecords::from_students(students).map(Self::from_records)
    }

    /// Build a store preloaded with the sample roster.
    pub fn with_sample_data() -> Result<Self, StoreError> {
        let store = Self::with_students(sample_students())?;
        tracing::info!("Seeded sample students");
        Ok(store)
    }

    fn from_records(records: StudentRecords) -> Self {
        Self {
            records: RwLock::new(records),
            metrics: StoreMetrics::new(),
        }
    }

    /// Snapshot of every student in insertion order.
    pub async fn find_all(&self) -> Vec<Student> {
        self.records.read().await.all().to_vec()
    }

    /// Look up a student by key.
    pub async fn find_by_key(&self, key: &StudentKey) -> Result<Student, StoreError> {
        let result = self.records.read().await.find(key).cloned();
        self.track_miss(&result);
        result
    }

    /// Append a student to the end of the collection.
    pub async fn insert(&self, student: NewStudent) -> Result<Student, StoreError> {
        let mut records = self.records.write().await;
        let result = records.insert(student);
        match &result {
            Ok(student) => {
                self.metrics.record_insert();
                tracing::info!(key = %student.key, count = records.len(), "Inserted student");
            }
            Err(err) => tracing::debug!(error = %err, "Insert rejected"),
        }
        result
    }

    /// Merge a partial update into the student addressed by `key`.
    pub async fn update(
        &self,
        key: &StudentKey,
        patch: StudentPatch,
    ) -> Result<Student, StoreError> {
        let result = self.records.write().await.update(key, patch);
        match &result {
            Ok(_) => {
                self.metrics.record_update();
                tracing::info!(key = %key, "Updated student");
            }
            Err(err) => tracing::debug!(key = %key, error = %err, "Update rejected"),
        }
        self.track_miss(&result);
        result
    }

    /// Remove the student addressed by `key`.
    pub async fn delete(&self, key: &StudentKey) -> Result<Student, StoreError> {
        let mut records = self.records.write().await;
        let result = records.remove(key);
        if result.is_ok() {
            self.metrics.record_delete();
            tracing::info!(key = %key, count = records.len(), "Deleted student");
        }
        self.track_miss(&result);
        result
    }

    fn track_miss<T>(&self, result: &Result<T, StoreError>) {
        if matches!(result, Err(StoreError::NotFound(_))) {
            self.metrics.record_miss();
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentApi for RecordStore {
    async fn list_students(&self) -> Vec<Student> {
        self.find_all().await
    }

    async fn get_student(&self, key: &StudentKey) -> Result<Student, StoreError> {
        self.find_by_key(key).await
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        self.insert(student).await
    }

    async fn update_student(
        &self,
        key: &StudentKey,
        patch: StudentPatch,
    ) -> Result<Student, StoreError> {
        self.update(key, patch).await
    }

    async fn delete_student(&self, key: &StudentKey) -> Result<(), StoreError> {
        self.delete(key).await.map(|_| ())
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(raw: &str) -> StudentKey {
        StudentKey::parse(raw).expect("valid key")
    }

    fn new_student(raw_key: &str) -> NewStudent {
        NewStudent {
            key: Some(key(raw_key)),
            name: format!("Student {raw_key}"),
            enrollment_term: "2021-1".into(),
            credits_completed: 0,
        }
    }

    #[tokio::test]
    async fn inserted_students_are_found_by_key() {
        let store = RecordStore::new();
        let inserted = store.insert(new_student("A")).await.expect("insert");
        assert_eq!(store.find_by_key(&key("A")).await, Ok(inserted));
        assert_eq!(store.find_all().await.len(), 1);
    }

    #[tokio::test]
    async fn stores_are_isolated() {
        let first = RecordStore::new();
        let second = RecordStore::new();
        first.insert(new_student("A")).await.unwrap();
        assert!(second.find_all().await.is_empty());
    }

    #[tokio::test]
    async fn sample_data_contains_documented_student() {
        let store = RecordStore::with_sample_data().expect("seed");
        let student = store.find_by_key(&key("885112")).await.expect("seeded");
        assert_eq!(student.name, "Adolfo Toledo");
        assert_eq!(store.find_all().await.len(), 5);
    }

    #[tokio::test]
    async fn metrics_follow_store_activity() {
        let store = RecordStore::new();
        store.insert(new_student("A")).await.unwrap();
        store
            .update(
                &key("A"),
                StudentPatch {
                    credits_completed: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store.delete(&key("A")).await.unwrap();
        assert!(store.delete(&key("A")).await.is_err());
        assert!(store.find_by_key(&key("A")).await.is_err());

        let snapshot = store.metrics_snapshot();
        assert_eq!(snapshot.students_inserted, 1);
        assert_eq!(snapshot.students_updated, 1);
        assert_eq!(snapshot.students_deleted, 1);
        assert_eq!(snapshot.lookups_missed, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_keep_keys_unique() {
        let store = Arc::new(RecordStore::new());
        let mut handles = Vec::new();
        for attempt in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                // Half the tasks race on the same key.
                let raw = if attempt % 2 == 0 {
                    "shared".to_string()
                } else {
                    format!("unique-{attempt}")
                };
                store.insert(new_student(&raw)).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.expect("task") {
                successes += 1;
            }
        }

        assert_eq!(successes, 17);
        assert_eq!(store.find_all().await.len(), 17);
    }
}
