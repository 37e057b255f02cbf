use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Tutor,
    Subject,
    Student,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Tutor => "Tutor",
            EntityKind::Subject => "Subject",
            EntityKind::Student => "Student",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub number_of_semesters: u32,
}

impl Subject {
    pub fn new(name: impl Into<String>, number_of_semesters: u32) -> Self {
        Self {
            name: name.into(),
            number_of_semesters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

/// A student always lives inside exactly one tutor's teaching group. There is
/// no public constructor; students are created by
/// [`add_student_to_tutor`](crate::core::relations::add_student_to_tutor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    name: String,
    id: String,
    address: Address,
}

impl Student {
    pub(crate) fn from_new(student: NewStudent) -> Self {
        Self {
            name: student.name,
            id: student.id,
            address: student.address,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Input for creating a student inside a teaching group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub id: String,
    #[serde(flatten)]
    pub address: Address,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            address: Address {
                street: street.into(),
                city: city.into(),
                postal_code: postal_code.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tutor {
    code: String,
    pub name: String,
    pub salary: u32,
    pub(crate) subjects: Vec<String>,
    pub(crate) teaching_group: Vec<Student>,
}

impl Tutor {
    pub fn new(code: impl Into<String>, name: impl Into<String>, salary: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            salary,
            subjects: Vec::new(),
            teaching_group: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Names of the subjects in the taught-set, in the order they were added.
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn teaches(&self, subject_name: &str) -> bool {
        self.subjects.iter().any(|s| s == subject_name)
    }

    pub fn teaching_group(&self) -> &[Student] {
        &self.teaching_group
    }
}

// ========== Query results ==========

/// Result of an aggregate over a possibly empty set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Aggregate<T> {
    Value(T),
    NoData,
}

impl<T> Aggregate<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Aggregate::Value(v) => Some(v),
            Aggregate::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }
}

impl<T> From<Option<T>> for Aggregate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Aggregate::NoData, Aggregate::Value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTutorPair {
    /// 1-based position in the join output.
    pub index: usize,
    pub student_name: String,
    pub tutor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryReport {
    pub tutor_name: String,
    pub salary: u32,
}
