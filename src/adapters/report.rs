use crate::config::ReportFormat;
use crate::core::{Aggregate, ReportEmitter, ReportSection, Result, Task};
use serde::Serialize;
use std::io::Write;

fn header(task: Task) -> String {
    format!("------Result from task {}------", task.ordinal())
}

/// Human-readable console report.
pub struct TextEmitter<W: Write> {
    out: W,
}

impl<W: Write> TextEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportEmitter for TextEmitter<W> {
    fn emit(&mut self, section: &ReportSection) -> Result<()> {
        writeln!(self.out, "{}", header(section.task()))?;
        match section {
            ReportSection::SubjectStudents { students, .. } => {
                for name in students {
                    writeln!(self.out, "{}", name)?;
                }
            }
            ReportSection::StudentTutorPairs { pairs } => {
                for p in pairs {
                    writeln!(
                        self.out,
                        "{} Student: {}, \t Tutor: {}",
                        p.index, p.student_name, p.tutor_name
                    )?;
                }
            }
            ReportSection::AverageSemesters { average } => match average {
                Aggregate::Value(avg) => writeln!(self.out, "Average semester length: {:.2}\n", avg)?,
                Aggregate::NoData => writeln!(self.out, "No subjects found.\n")?,
            },
            ReportSection::MaxSalary { salary } => match salary {
                Aggregate::Value(max) => writeln!(self.out, "Highest salary for tutor: {} $\n", max)?,
                Aggregate::NoData => writeln!(self.out, "No tutors found.\n")?,
            },
            ReportSection::HighEarners { tutors, .. } => {
                for t in tutors {
                    writeln!(self.out, "{}'s salary: {} $", t.tutor_name, t.salary)?;
                }
            }
            ReportSection::Failed { message, .. } => {
                writeln!(self.out, "Error: {}", message)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per line, one line per section.
pub struct JsonEmitter<W: Write> {
    out: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportEmitter for JsonEmitter<W> {
    fn emit(&mut self, section: &ReportSection) -> Result<()> {
        serde_json::to_writer(&mut self.out, section)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    task: &'static str,
    row: usize,
    name: &'a str,
    value: String,
}

/// Flat `task,row,name,value` table covering all sections.
pub struct CsvEmitter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
        }
    }

    fn row(&mut self, task: Task, row: usize, name: &str, value: String) -> Result<()> {
        self.writer.serialize(CsvRow {
            task: task.ordinal(),
            row,
            name,
            value,
        })?;
        Ok(())
    }
}

fn aggregate_cell<T: ToString>(aggregate: Aggregate<T>) -> String {
    aggregate.value().map(|v| v.to_string()).unwrap_or_default()
}

impl<W: Write> ReportEmitter for CsvEmitter<W> {
    fn emit(&mut self, section: &ReportSection) -> Result<()> {
        let task = section.task();
        match section {
            ReportSection::SubjectStudents { subject, students } => {
                for (i, name) in students.iter().enumerate() {
                    self.row(task, i + 1, name, subject.clone())?;
                }
            }
            ReportSection::StudentTutorPairs { pairs } => {
                for p in pairs {
                    self.row(task, p.index, &p.student_name, p.tutor_name.clone())?;
                }
            }
            ReportSection::AverageSemesters { average } => {
                self.row(task, 1, "average_semesters", aggregate_cell(*average))?;
            }
            ReportSection::MaxSalary { salary } => {
                self.row(task, 1, "max_salary", aggregate_cell(*salary))?;
            }
            ReportSection::HighEarners { tutors, .. } => {
                for (i, t) in tutors.iter().enumerate() {
                    self.row(task, i + 1, &t.tutor_name, t.salary.to_string())?;
                }
            }
            ReportSection::Failed { message, .. } => {
                self.row(task, 0, "error", message.clone())?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn emitter_for<'w, W: Write + 'w>(format: ReportFormat, out: W) -> Box<dyn ReportEmitter + 'w> {
    match format {
        ReportFormat::Text => Box::new(TextEmitter::new(out)),
        ReportFormat::Json => Box::new(JsonEmitter::new(out)),
        ReportFormat::Csv => Box::new(CsvEmitter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SalaryReport, StudentTutorPair};

    fn render_text(section: &ReportSection) -> String {
        let mut emitter = TextEmitter::new(Vec::new());
        emitter.emit(section).unwrap();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn test_text_student_tutor_pairs() {
        let text = render_text(&ReportSection::StudentTutorPairs {
            pairs: vec![StudentTutorPair {
                index: 1,
                student_name: "Ethan Parker".to_string(),
                tutor_name: "John Smith".to_string(),
            }],
        });
        assert_eq!(
            text,
            "------Result from task two------\n1 Student: Ethan Parker, \t Tutor: John Smith\n"
        );
    }

    #[test]
    fn test_text_aggregates() {
        let avg = render_text(&ReportSection::AverageSemesters {
            average: Aggregate::Value(2.25),
        });
        assert!(avg.contains("Average semester length: 2.25"));

        let none = render_text(&ReportSection::MaxSalary {
            salary: Aggregate::NoData,
        });
        assert!(none.starts_with("------Result from task four------"));
        assert!(none.contains("No tutors found."));
    }

    #[test]
    fn test_text_empty_subject_still_prints_header() {
        let text = render_text(&ReportSection::SubjectStudents {
            subject: "Unknown".to_string(),
            students: vec![],
        });
        assert_eq!(text, "------Result from task one------\n");
    }

    #[test]
    fn test_json_one_line_per_section() {
        let mut emitter = JsonEmitter::new(Vec::new());
        emitter
            .emit(&ReportSection::HighEarners {
                threshold: 10000,
                tutors: vec![SalaryReport {
                    tutor_name: "John Smith".to_string(),
                    salary: 42000,
                }],
            })
            .unwrap();
        emitter
            .emit(&ReportSection::MaxSalary {
                salary: Aggregate::NoData,
            })
            .unwrap();

        let out = String::from_utf8(emitter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["section"], "high_earners");
        assert_eq!(lines[0]["tutors"][0]["salary"], 42000);
        assert_eq!(lines[1]["salary"]["status"], "no_data");
    }

    #[test]
    fn test_csv_rows() {
        let mut buf = Vec::new();
        {
            let mut emitter = CsvEmitter::new(&mut buf);
            emitter
                .emit(&ReportSection::AverageSemesters {
                    average: Aggregate::Value(2.25),
                })
                .unwrap();
            emitter
                .emit(&ReportSection::Failed {
                    task: Task::Four,
                    message: "boom".to_string(),
                })
                .unwrap();
            emitter.finish().unwrap();
        }

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "task,row,name,value\nthree,1,average_semesters,2.25\nfour,0,error,boom\n"
        );
    }

    #[test]
    fn test_csv_no_data_is_empty_cell() {
        let mut buf = Vec::new();
        {
            let mut emitter = CsvEmitter::new(&mut buf);
            emitter
                .emit(&ReportSection::MaxSalary {
                    salary: Aggregate::NoData,
                })
                .unwrap();
            emitter
                .emit(&ReportSection::MaxSalary {
                    salary: Aggregate::Value(42000),
                })
                .unwrap();
            emitter.finish().unwrap();
        }

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "task,row,name,value\nfour,1,max_salary,\nfour,1,max_salary,42000\n"
        );
    }
}
