use crate::core::relations;
use crate::core::store::EntityStore;
use crate::domain::model::{Aggregate, SalaryReport, StudentTutorPair, Subject, Tutor};

/// Read-only queries over a populated store.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a EntityStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// Names of all students whose tutor teaches the named subject.
    ///
    /// A missing subject yields an empty list; it is logged, not raised.
    pub fn students_under_subject_teachers(&self, subject_name: &str) -> Vec<String> {
        let subject = match self.store.get::<Subject>(subject_name) {
            Ok(subject) => subject,
            Err(_) => {
                tracing::warn!(subject = subject_name, "No subject found with name");
                return Vec::new();
            }
        };

        let names: Vec<String> = relations::students_of_tutors_teaching(self.store, subject)
            .into_iter()
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            tracing::debug!(subject = subject_name, "subject found, no students");
        }
        names
    }

    /// Every student paired with the tutor that owns it, numbered from 1.
    pub fn student_tutor_pairs(&self) -> Vec<StudentTutorPair> {
        self.store
            .all::<Tutor>()
            .flat_map(|tutor| {
                tutor
                    .teaching_group()
                    .iter()
                    .map(move |student| (student.name(), tutor.name.as_str()))
            })
            .enumerate()
            .map(|(i, (student, tutor))| StudentTutorPair {
                index: i + 1,
                student_name: student.to_string(),
                tutor_name: tutor.to_string(),
            })
            .collect()
    }

    pub fn average_semesters(&self) -> Aggregate<f64> {
        let count = self.store.len::<Subject>();
        if count == 0 {
            return Aggregate::NoData;
        }
        let total: u64 = self
            .store
            .all::<Subject>()
            .map(|s| u64::from(s.number_of_semesters))
            .sum();
        Aggregate::Value(total as f64 / count as f64)
    }

    pub fn max_salary(&self) -> Aggregate<u32> {
        self.store.all::<Tutor>().map(|t| t.salary).max().into()
    }

    /// Tutors earning strictly more than `threshold`, in store order.
    pub fn high_earners(&self, threshold: u32) -> Vec<SalaryReport> {
        self.store
            .all::<Tutor>()
            .filter(|t| t.salary > threshold)
            .map(|t| SalaryReport {
                tutor_name: t.name.clone(),
                salary: t.salary,
            })
            .collect()
    }
}
