//! Tutor ↔ subject (taught-set) and tutor ↔ student (teaching group)
//! associations.
//!
//! These are free functions over the store rather than methods on [`Tutor`],
//! so neither entity carries back-references to the other.

use crate::core::store::EntityStore;
use crate::domain::model::{EntityKind, NewStudent, Student, Subject, Tutor};
use crate::utils::error::{Result, SchoolError};
use std::collections::HashSet;

/// Register `subject_name` in the tutor's taught-set.
///
/// Returns `true` when a new edge was created and `false` when the pair was
/// already present.
///
/// # Errors
///
/// Returns `NotFound` if the tutor or the subject does not exist.
pub fn add_subject_to_tutor(
    store: &mut EntityStore,
    tutor_code: &str,
    subject_name: &str,
) -> Result<bool> {
    store.get::<Subject>(subject_name)?;
    let (_, tutor) = store.tutor_mut(tutor_code)?;

    if tutor.teaches(subject_name) {
        tracing::debug!(tutor = tutor_code, subject = subject_name, "subject already taught");
        return Ok(false);
    }
    tutor.subjects.push(subject_name.to_string());
    tracing::debug!(tutor = tutor_code, subject = subject_name, "subject added");
    Ok(true)
}

/// Create a student inside the tutor's teaching group.
///
/// # Errors
///
/// Returns `DuplicateKey` if any teaching group already holds a student with
/// the same id, or `NotFound` if the tutor does not exist.
pub fn add_student_to_tutor<'s>(
    store: &'s mut EntityStore,
    tutor_code: &str,
    student: NewStudent,
) -> Result<&'s Student> {
    if store.contains_student(&student.id) {
        return Err(SchoolError::DuplicateKey {
            entity: EntityKind::Student,
            key: student.id,
        });
    }

    let id = student.id.clone();
    let (position, tutor) = store.tutor_mut(tutor_code)?;
    tutor.teaching_group.push(Student::from_new(student));
    store.register_student(&id, position);
    tracing::debug!(tutor = tutor_code, student = %id, "student added to teaching group");

    let store: &'s EntityStore = store;
    store
        .get::<Tutor>(tutor_code)?
        .teaching_group()
        .last()
        .ok_or(SchoolError::NotFound {
            entity: EntityKind::Student,
            key: id,
        })
}

/// All tutors whose taught-set contains the subject, in store order.
///
/// # Errors
///
/// Returns `SubjectNotFound` if no subject has this name. A subject that
/// exists but is taught by nobody yields an empty list.
pub fn tutors_teaching_subject<'s>(
    store: &'s EntityStore,
    subject_name: &str,
) -> Result<Vec<&'s Tutor>> {
    if store.get::<Subject>(subject_name).is_err() {
        return Err(SchoolError::SubjectNotFound {
            name: subject_name.to_string(),
        });
    }

    Ok(store
        .all::<Tutor>()
        .filter(|t| t.teaches(subject_name))
        .collect())
}

/// Names of the students taught by any tutor teaching `subject`, in
/// tutor-then-student order. Each student is listed once.
pub fn students_of_tutors_teaching<'s>(store: &'s EntityStore, subject: &Subject) -> Vec<&'s str> {
    let mut seen = HashSet::new();
    store
        .all::<Tutor>()
        .filter(|t| t.teaches(&subject.name))
        .flat_map(|t| t.teaching_group())
        .filter(|s| seen.insert(s.id()))
        .map(Student::name)
        .collect()
}
