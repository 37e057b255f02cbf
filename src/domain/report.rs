use crate::domain::model::{Aggregate, SalaryReport, StudentTutorPair};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Task {
    pub const ALL: [Task; 5] = [Task::One, Task::Two, Task::Three, Task::Four, Task::Five];

    pub fn ordinal(self) -> &'static str {
        match self {
            Task::One => "one",
            Task::Two => "two",
            Task::Three => "three",
            Task::Four => "four",
            Task::Five => "five",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Task::One => "students whose tutor teaches a subject",
            Task::Two => "students and their tutors",
            Task::Three => "average semester length",
            Task::Four => "highest tutor salary",
            Task::Five => "tutors above a salary threshold",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {}", self.ordinal())
    }
}

/// One task's output, handed to a report emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ReportSection {
    SubjectStudents {
        subject: String,
        students: Vec<String>,
    },
    StudentTutorPairs {
        pairs: Vec<StudentTutorPair>,
    },
    AverageSemesters {
        average: Aggregate<f64>,
    },
    MaxSalary {
        salary: Aggregate<u32>,
    },
    HighEarners {
        threshold: u32,
        tutors: Vec<SalaryReport>,
    },
    Failed {
        task: Task,
        message: String,
    },
}

impl ReportSection {
    pub fn task(&self) -> Task {
        match self {
            ReportSection::SubjectStudents { .. } => Task::One,
            ReportSection::StudentTutorPairs { .. } => Task::Two,
            ReportSection::AverageSemesters { .. } => Task::Three,
            ReportSection::MaxSalary { .. } => Task::Four,
            ReportSection::HighEarners { .. } => Task::Five,
            ReportSection::Failed { task, .. } => *task,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ReportSection::Failed { .. })
    }
}
