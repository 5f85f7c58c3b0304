//! Sample roster loaded when `SEED_SAMPLE_STUDENTS` is enabled.

use super::types::{EnrollmentTerm, Student, StudentKey};

const SAMPLE_ROSTER: [(u64, &str, &str, u32); 5] = [
    (123456, "Andrea Salinas", "2016-2", 200),
    (654321, "Lupita López", "2017-2", 100),
    (885112, "Adolfo Toledo", "2019-2", 130),
    (128742, "Merlina Guzman", "2020-2", 200),
    (896236, "Luis Morales", "2021-1", 190),
];

/// Sample students keyed by matriculation number.
pub fn sample_students() -> Vec<Student> {
    SAMPLE_ROSTER
        .iter()
        .map(|&(matriculation, name, term, credits)| Student {
            key: StudentKey::from(matriculation),
            name: name.to_string(),
            enrollment_term: EnrollmentTerm::from(term),
            credits_completed: credits,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_keys_are_unique() {
        let students = sample_students();
        let keys: HashSet<_> = students.iter().map(|student| student.key.clone()).collect();
        assert_eq!(keys.len(), students.len());
    }
}
