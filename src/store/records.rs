//! Insertion-ordered student collection and its lookup/mutation rules.

use super::types::{NewStudent, Student, StoreError, StudentKey, StudentPatch};

/// Insertion-ordered collection of student records with unique keys.
///
/// This is the synchronous core of the store; [`crate::store::RecordStore`] wraps it in a lock
/// so that each operation applies atomically.
#[derive(Debug, Default)]
pub struct StudentRecords {
    students: Vec<Student>,
    next_surrogate: u64,
}

impl StudentRecords {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from existing records, rejecting duplicate keys.
    pub fn from_students<I>(students: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Student>,
    {
        let mut records = Self::new();
        for student in students {
            records.insert(student.into())?;
        }
        Ok(records)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[Student] {
        &self.students
    }

    /// Look up a record by key.
    pub fn find(&self, key: &StudentKey) -> Result<&Student, StoreError> {
        self.students
            .iter()
            .find(|student| &student.key == key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    /// Append a record, assigning a surrogate key when none was supplied.
    pub fn insert(&mut self, new_student: NewStudent) -> Result<Student, StoreError> {
        let key = match new_student.key {
            Some(key) => {
                if self.position(&key).is_some() {
                    return Err(StoreError::DuplicateKey(key));
                }
                key
            }
            None => self.next_surrogate_key(),
        };
        let student = Student {
            key,
            name: new_student.name,
            enrollment_term: new_student.enrollment_term,
            credits_completed: new_student.credits_completed,
        };
        self.students.push(student.clone());
        Ok(student)
    }

    /// Merge a partial update into the record addressed by `key`.
    pub fn update(&mut self, key: &StudentKey, patch: StudentPatch) -> Result<Student, StoreError> {
        let index = self
            .position(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if let Some(body_key) = patch.key.as_ref().filter(|body_key| *body_key != key) {
            return Err(StoreError::KeyMismatch {
                path: key.clone(),
                body: body_key.clone(),
            });
        }
        let student = &mut self.students[index];
        patch.merge_into(student);
        Ok(student.clone())
    }

    /// Remove the record addressed by `key`, keeping the relative order of the rest.
    pub fn remove(&mut self, key: &StudentKey) -> Result<Student, StoreError> {
        let index = self
            .position(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        Ok(self.students.remove(index))
    }

    fn position(&self, key: &StudentKey) -> Option<usize> {
        self.students.iter().position(|student| &student.key == key)
    }

    fn next_surrogate_key(&mut self) -> StudentKey {
        loop {
            self.next_surrogate += 1;
            let candidate = StudentKey::from(self.next_surrogate);
            if self.position(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::EnrollmentTerm;

    fn key(raw: &str) -> StudentKey {
        StudentKey::parse(raw).expect("valid key")
    }

    fn new_student(raw_key: &str, name: &str) -> NewStudent {
        NewStudent {
            key: Some(key(raw_key)),
            name: name.into(),
            enrollment_term: "2020-1".into(),
            credits_completed: 0,
        }
    }

    fn keys(records: &StudentRecords) -> Vec<&str> {
        records.all().iter().map(|student| student.key.as_str()).collect()
    }

    #[test]
    fn documented_lifecycle_example() {
        let mut records = StudentRecords::new();
        let inserted = records
            .insert(NewStudent {
                key: Some(key("885112")),
                name: "Adolfo Toledo".into(),
                enrollment_term: "2019-2".into(),
                credits_completed: 130,
            })
            .expect("insert");
        assert_eq!(records.find(&key("885112")), Ok(&inserted));

        let updated = records
            .update(
                &key("885112"),
                StudentPatch {
                    credits_completed: Some(140),
                    ..Default::default()
                },
            )
            .expect("update");
        assert_eq!(updated.credits_completed, 140);
        assert_eq!(updated.name, "Adolfo Toledo");
        assert_eq!(updated.enrollment_term, EnrollmentTerm::from("2019-2"));

        records.remove(&key("885112")).expect("delete");
        assert_eq!(
            records.find(&key("885112")),
            Err(StoreError::NotFound(key("885112")))
        );
    }

    #[test]
    fn find_misses_unknown_keys() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        assert!(matches!(records.find(&key("B")), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn len_tracks_insert_and_delete() {
        let mut records = StudentRecords::new();
        assert!(records.is_empty());
        records.insert(new_student("A", "Ada")).unwrap();
        assert_eq!(records.len(), 1);
        records.insert(new_student("B", "Bea")).unwrap();
        assert_eq!(records.len(), 2);
        records.remove(&key("A")).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn delete_preserves_insertion_order() {
        let mut records = StudentRecords::new();
        for raw in ["A", "B", "C"] {
            records.insert(new_student(raw, raw)).unwrap();
        }
        records.remove(&key("B")).unwrap();
        assert_eq!(keys(&records), vec!["A", "C"]);
    }

    #[test]
    fn second_delete_reports_not_found() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        assert!(records.remove(&key("A")).is_ok());
        assert_eq!(
            records.remove(&key("A")),
            Err(StoreError::NotFound(key("A")))
        );
    }

    #[test]
    fn duplicate_insert_is_rejected_without_mutation() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        let err = records.insert(new_student("A", "Impostor")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey(key("A")));
        assert_eq!(records.len(), 1);
        assert_eq!(records.find(&key("A")).unwrap().name, "Ada");
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        let patch = StudentPatch {
            name: Some("Ada Lovelace".into()),
            credits_completed: Some(12),
            ..Default::default()
        };
        let once = records.update(&key("A"), patch.clone()).unwrap();
        let twice = records.update(&key("A"), patch).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn update_does_not_reorder() {
        let mut records = StudentRecords::new();
        for raw in ["A", "B", "C"] {
            records.insert(new_student(raw, raw)).unwrap();
        }
        records
            .update(
                &key("A"),
                StudentPatch {
                    name: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(keys(&records), vec!["A", "B", "C"]);
    }

    #[test]
    fn update_rejects_conflicting_key() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        let err = records
            .update(
                &key("A"),
                StudentPatch {
                    key: Some(key("Z")),
                    name: Some("Zed".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::KeyMismatch {
                path: key("A"),
                body: key("Z"),
            }
        );
        assert_eq!(records.find(&key("A")).unwrap().name, "Ada");
        assert!(records.find(&key("Z")).is_err());
    }

    #[test]
    fn update_accepts_matching_echoed_key() {
        let mut records = StudentRecords::new();
        records.insert(new_student("A", "Ada")).unwrap();
        let updated = records
            .update(
                &key("A"),
                StudentPatch {
                    key: Some(key("A")),
                    credits_completed: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.key, key("A"));
        assert_eq!(updated.credits_completed, 3);
    }

    #[test]
    fn update_miss_reports_not_found() {
        let mut records = StudentRecords::new();
        let err = records
            .update(&key("missing"), StudentPatch::default())
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(key("missing")));
        assert!(records.is_empty());
    }

    #[test]
    fn surrogate_keys_skip_taken_values() {
        let mut records = StudentRecords::new();
        records.insert(new_student("2", "Taken")).unwrap();
        let anonymous = || NewStudent {
            key: None,
            name: "Anon".into(),
            enrollment_term: EnrollmentTerm::Numeric(2021),
            credits_completed: 0,
        };
        let first = records.insert(anonymous()).unwrap();
        let second = records.insert(anonymous()).unwrap();
        assert_eq!(first.key.as_str(), "1");
        assert_eq!(second.key.as_str(), "3");
    }

    #[test]
    fn from_students_rejects_duplicates() {
        let student = Student {
            key: key("A"),
            name: "Ada".into(),
            enrollment_term: "2020-1".into(),
            credits_completed: 0,
        };
        let err = StudentRecords::from_students([student.clone(), student]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey(key("A")));
    }
}
