use crate::core::queries::QueryEngine;
use crate::core::store::EntityStore;
use crate::domain::ports::{ReportEmitter, ReportSettings};
use crate::domain::report::{ReportSection, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TaskFailure {
    pub task: Task,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: Vec<Task>,
    pub failed: Vec<TaskFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the five report tasks in order against one store.
pub struct ReportRunner<'a, C: ReportSettings> {
    queries: QueryEngine<'a>,
    settings: C,
}

impl<'a, C: ReportSettings> ReportRunner<'a, C> {
    pub fn new(store: &'a EntityStore, settings: C) -> Self {
        Self {
            queries: QueryEngine::new(store),
            settings,
        }
    }

    pub fn section(&self, task: Task) -> ReportSection {
        match task {
            Task::One => {
                let subject = self.settings.subject().to_string();
                let students = self.queries.students_under_subject_teachers(&subject);
                ReportSection::SubjectStudents { subject, students }
            }
            Task::Two => ReportSection::StudentTutorPairs {
                pairs: self.queries.student_tutor_pairs(),
            },
            Task::Three => ReportSection::AverageSemesters {
                average: self.queries.average_semesters(),
            },
            Task::Four => ReportSection::MaxSalary {
                salary: self.queries.max_salary(),
            },
            Task::Five => {
                let threshold = self.settings.salary_threshold();
                ReportSection::HighEarners {
                    threshold,
                    tutors: self.queries.high_earners(threshold),
                }
            }
        }
    }

    /// Emit every task. A task whose section cannot be emitted is recorded as
    /// failed and the run moves on to the next task.
    pub fn run<E: ReportEmitter + ?Sized>(&self, emitter: &mut E) -> RunSummary {
        let started_at = Utc::now();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for task in Task::ALL {
            tracing::debug!("Running {} ({})", task, task.description());
            let section = self.section(task);

            match emitter.emit(&section) {
                Ok(()) => succeeded.push(task),
                Err(e) => {
                    tracing::error!("❌ {} failed: {}", task, e);
                    let message = e.to_string();
                    let marker = ReportSection::Failed {
                        task,
                        message: message.clone(),
                    };
                    if let Err(e) = emitter.emit(&marker) {
                        tracing::warn!("Could not report failure of {}: {}", task, e);
                    }
                    failed.push(TaskFailure { task, message });
                }
            }
        }

        if let Err(e) = emitter.finish() {
            tracing::error!("❌ Report could not be finished: {}", e);
        }

        tracing::info!(
            succeeded = succeeded.len(),
            failed = failed.len(),
            "report run complete"
        );

        RunSummary {
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Aggregate, Subject, Tutor};
    use crate::utils::error::{Result, SchoolError};

    struct Settings;

    impl ReportSettings for Settings {
        fn subject(&self) -> &str {
            "Science"
        }

        fn salary_threshold(&self) -> u32 {
            10000
        }
    }

    #[derive(Default)]
    struct Recording {
        sections: Vec<ReportSection>,
        fail_on: Option<Task>,
    }

    impl ReportEmitter for Recording {
        fn emit(&mut self, section: &ReportSection) -> Result<()> {
            if Some(section.task()) == self.fail_on && !section.is_failure() {
                return Err(SchoolError::ReportError {
                    message: "sink closed".to_string(),
                });
            }
            self.sections.push(section.clone());
            Ok(())
        }
    }

    #[test]
    fn test_run_emits_five_sections_in_order() {
        let mut store = EntityStore::new();
        store.insert(Subject::new("Science", 3)).unwrap();
        store.insert(Tutor::new("JSMI", "John Smith", 42000)).unwrap();

        let mut emitter = Recording::default();
        let summary = ReportRunner::new(&store, Settings).run(&mut emitter);

        assert!(summary.is_success());
        let tasks: Vec<Task> = emitter.sections.iter().map(ReportSection::task).collect();
        assert_eq!(tasks, Task::ALL.to_vec());
        assert_eq!(
            emitter.sections[3],
            ReportSection::MaxSalary {
                salary: Aggregate::Value(42000)
            }
        );
    }

    #[test]
    fn test_failed_task_does_not_stop_the_run() {
        let store = EntityStore::new();
        let mut emitter = Recording {
            fail_on: Some(Task::Two),
            ..Default::default()
        };

        let summary = ReportRunner::new(&store, Settings).run(&mut emitter);

        assert_eq!(summary.succeeded, vec![Task::One, Task::Three, Task::Four, Task::Five]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].task, Task::Two);
        assert!(emitter.sections[1].is_failure());
        assert_eq!(emitter.sections.len(), 5);
    }
}
