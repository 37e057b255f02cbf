use crate::config::AppSettings;
use crate::core::relations::{add_student_to_tutor, add_subject_to_tutor};
use crate::core::session::{transaction, CommitPolicy, TransactionOutcome};
use crate::core::store::EntityStore;
use crate::core::StoreBootstrap;
use crate::domain::model::{NewStudent, Subject, Tutor};
use crate::utils::error::{Result, SchoolError};
use crate::utils::validation::{
    validate_non_empty_string, validate_pattern, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SAMPLE_DATASET: &str = include_str!("../../data/school.toml");

pub const TUTOR_CODE_PATTERN: &str = r"^[A-Z]{4}$";
pub const STUDENT_ID_PATTERN: &str = r"^stu-\d{2}-\d{4}$";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub subjects: Vec<SubjectRecord>,
    #[serde(default)]
    pub tutors: Vec<TutorRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: String,
    pub number_of_semesters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorRecord {
    pub code: String,
    pub name: String,
    pub salary: u32,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub id: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl From<&StudentRecord> for NewStudent {
    fn from(r: &StudentRecord) -> Self {
        NewStudent::new(&r.name, &r.id, &r.street, &r.city, &r.postal_code)
    }
}

impl Dataset {
    /// 內建範例資料 (4 個科目、5 位老師、10 位學生)
    pub fn sample() -> Result<Self> {
        Self::from_toml_str(SAMPLE_DATASET)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SchoolError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SchoolError::ConfigValidationError {
            field: "dataset".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn student_count(&self) -> usize {
        self.tutors.iter().map(|t| t.students.len()).sum()
    }

    /// Write every record into `store`: subjects, then tutors, then the
    /// taught-sets, then the teaching groups.
    ///
    /// # Errors
    ///
    /// Stops at the first duplicate key or dangling reference.
    pub fn load_into(&self, store: &mut EntityStore) -> Result<()> {
        for s in &self.subjects {
            store.insert(Subject::new(&s.name, s.number_of_semesters))?;
        }
        for t in &self.tutors {
            store.insert(Tutor::new(&t.code, &t.name, t.salary))?;
        }
        for t in &self.tutors {
            for subject in &t.subjects {
                add_subject_to_tutor(store, &t.code, subject)?;
            }
        }
        for t in &self.tutors {
            for student in &t.students {
                add_student_to_tutor(store, &t.code, student.into())?;
            }
        }
        Ok(())
    }

    /// Per-record checks: names present, codes and ids well formed.
    pub fn validate_records(&self) -> Result<()> {
        for s in &self.subjects {
            validate_non_empty_string("subjects.name", &s.name)?;
        }
        for t in &self.tutors {
            validate_pattern("tutors.code", &t.code, TUTOR_CODE_PATTERN)?;
            validate_non_empty_string("tutors.name", &t.name)?;
            for student in &t.students {
                validate_pattern("tutors.students.id", &student.id, STUDENT_ID_PATTERN)?;
                validate_non_empty_string("tutors.students.name", &student.name)?;
            }
        }
        Ok(())
    }

    pub fn validate_unique_keys(&self) -> Result<()> {
        validate_unique("subjects.name", self.subjects.iter().map(|s| s.name.as_str()))?;
        validate_unique("tutors.code", self.tutors.iter().map(|t| t.code.as_str()))?;
        validate_unique(
            "tutors.students.id",
            self.tutors
                .iter()
                .flat_map(|t| t.students.iter().map(|s| s.id.as_str())),
        )
    }

    /// Validation matching how setup will commit. Under
    /// [`CommitPolicy::Always`] duplicate keys are left for the setup
    /// transaction, so the records loaded before the duplicate are kept.
    pub fn validate_for(&self, policy: CommitPolicy) -> Result<()> {
        self.validate_records()?;
        match policy {
            CommitPolicy::OnSuccess => self.validate_unique_keys(),
            CommitPolicy::Always => {
                if let Err(e) = self.validate_unique_keys() {
                    tracing::warn!("⚠️ Dataset has duplicate keys, setup will stop there: {}", e);
                }
                Ok(())
            }
        }
    }
}

impl Validate for Dataset {
    fn validate(&self) -> Result<()> {
        self.validate_records()?;
        self.validate_unique_keys()
    }
}

/// Read the configured dataset (or the built-in sample) and validate it for
/// the configured commit policy.
pub fn load_dataset(settings: &AppSettings) -> Result<Dataset> {
    let dataset = match &settings.dataset {
        Some(path) => {
            tracing::info!("📁 Loading dataset from: {}", path);
            Dataset::from_file(path)?
        }
        None => {
            tracing::info!("📁 Using built-in sample dataset");
            Dataset::sample()?
        }
    };
    dataset.validate_for(settings.commit_policy)?;
    Ok(dataset)
}

/// Opens a store populated from a [`Dataset`] in a single transaction.
#[derive(Debug, Clone)]
pub struct DatasetBootstrap {
    dataset: Dataset,
    policy: CommitPolicy,
}

impl DatasetBootstrap {
    pub fn new(dataset: Dataset, policy: CommitPolicy) -> Self {
        Self { dataset, policy }
    }
}

impl StoreBootstrap for DatasetBootstrap {
    fn open(&self) -> Result<EntityStore> {
        let mut store = EntityStore::new();
        let (outcome, result) =
            transaction(&mut store, self.policy, |tx| self.dataset.load_into(tx));

        match (outcome, result) {
            (_, Ok(())) => {
                tracing::info!(
                    subjects = store.len::<Subject>(),
                    tutors = store.len::<Tutor>(),
                    students = store.student_count(),
                    "dataset loaded"
                );
                Ok(store)
            }
            (TransactionOutcome::PartiallyCommitted, Err(e)) => {
                tracing::error!("❌ Setup failed, continuing with partial data: {}", e);
                Ok(store)
            }
            (_, Err(e)) => Err(e),
        }
    }
}
