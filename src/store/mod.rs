//! In-memory student record store: types, ordering rules, and the shared service.

pub mod records;
pub mod seed;
mod service;
pub mod types;

pub use records::StudentRecords;
pub use service::{RecordStore, StudentApi};
pub use types::{EnrollmentTerm, KeyError, NewStudent, StoreError, Student, StudentKey, StudentPatch};
