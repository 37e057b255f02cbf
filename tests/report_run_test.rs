use anyhow::Result;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use tutorbase::config::dataset::load_dataset;
use tutorbase::config::toml_config::TomlConfig;
use tutorbase::core::session::CommitPolicy;
use tutorbase::core::{ReportSection, StoreBootstrap, Task, Tutor};
use tutorbase::utils::validation::Validate;
use tutorbase::{
    AppSettings, Dataset, DatasetBootstrap, EntityStore, JsonEmitter, ReportFormat, ReportRunner,
    SchoolError, TextEmitter,
};

fn sample_store() -> Result<EntityStore> {
    Ok(DatasetBootstrap::new(Dataset::sample()?, CommitPolicy::OnSuccess).open()?)
}

#[test]
fn test_text_report_for_sample_dataset() -> Result<()> {
    let store = sample_store()?;
    let runner = ReportRunner::new(&store, AppSettings::default());
    let mut emitter = TextEmitter::new(Vec::new());

    let summary = runner.run(&mut emitter);
    assert!(summary.is_success());
    assert!(summary.finished_at >= summary.started_at);

    let text = String::from_utf8(emitter.into_inner())?;
    let expected = "\
------Result from task one------
Ethan Parker
Sophia Mitchell
Lucas Harper
Ava Thompson
------Result from task two------
1 Student: Ethan Parker, \t Tutor: John Smith
2 Student: Sophia Mitchell, \t Tutor: John Smith
3 Student: Lucas Harper, \t Tutor: John Smith
4 Student: Ava Thompson, \t Tutor: John Smith
5 Student: Isabella Garcia, \t Tutor: Maria Brown
6 Student: James Miller, \t Tutor: Maria Brown
7 Student: Lily Roberts, \t Tutor: Paul Johnson
8 Student: Henry Wilson, \t Tutor: Claire Davis
9 Student: Grace Edwards, \t Tutor: Claire Davis
10 Student: Olivia Brooks, \t Tutor: Emily Clark
------Result from task three------
Average semester length: 2.25

------Result from task four------
Highest salary for tutor: 42000 $

------Result from task five------
John Smith's salary: 42000 $
Maria Brown's salary: 39500 $
Emily Clark's salary: 23900 $
";
    assert_eq!(text, expected);
    Ok(())
}

#[test]
fn test_empty_store_reports_no_data() -> Result<()> {
    let store = EntityStore::new();
    let runner = ReportRunner::new(&store, AppSettings::default());
    let mut emitter = TextEmitter::new(Vec::new());

    let summary = runner.run(&mut emitter);
    assert!(summary.is_success());

    let text = String::from_utf8(emitter.into_inner())?;
    assert!(text.contains("No subjects found."));
    assert!(text.contains("No tutors found."));
    assert!(text.contains("------Result from task five------"));
    Ok(())
}

#[test]
fn test_config_file_drives_json_report() -> Result<()> {
    let dir = TempDir::new()?;
    let dataset_path = dir.path().join("school.toml");
    std::fs::write(
        &dataset_path,
        r#"
[[subjects]]
name = "Math"
number_of_semesters = 4

[[tutors]]
code = "ABCD"
name = "Ada Byron"
salary = 50000
subjects = ["Math"]

[[tutors.students]]
name = "Kim Lee"
id = "stu-24-0001"
street = "Elm 1"
city = "Glendale"
postal_code = "91201 CA"
"#,
    )?;

    let mut config_file = NamedTempFile::new()?;
    write!(
        config_file,
        r#"
[report]
format = "json"
subject = "Math"
salary_threshold = 45000

[setup]
dataset = "{}"
"#,
        dataset_path.to_string_lossy().replace('\\', "/")
    )?;

    let config = TomlConfig::from_file(config_file.path())?;
    config.validate()?;
    let settings = AppSettings::from_toml(&config);
    assert_eq!(settings.format, ReportFormat::Json);

    let dataset = Dataset::from_file(settings.dataset.as_deref().unwrap_or_default())?;
    dataset.validate()?;
    let store = DatasetBootstrap::new(dataset, settings.commit_policy).open()?;

    let runner = ReportRunner::new(&store, settings);
    assert_eq!(
        runner.section(Task::One),
        ReportSection::SubjectStudents {
            subject: "Math".to_string(),
            students: vec!["Kim Lee".to_string()],
        }
    );

    let mut emitter = JsonEmitter::new(Vec::new());
    let summary = runner.run(&mut emitter);
    assert!(summary.is_success());

    let out = String::from_utf8(emitter.into_inner())?;
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<Vec<serde_json::Value>, serde_json::Error>>()?;
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["students"][0], "Kim Lee");
    assert_eq!(lines[2]["average"]["value"], 4.0);
    assert_eq!(lines[4]["threshold"], 45000);
    assert_eq!(lines[4]["tutors"][0]["tutor_name"], "Ada Byron");
    Ok(())
}

#[test]
fn test_duplicate_student_in_dataset_aborts_setup() -> Result<()> {
    let dataset = Dataset::from_toml_str(DUPLICATE_STUDENT_DATASET)?;

    assert!(dataset.validate().is_err());
    assert!(DatasetBootstrap::new(dataset.clone(), CommitPolicy::OnSuccess)
        .open()
        .is_err());

    let partial = DatasetBootstrap::new(dataset, CommitPolicy::Always).open()?;
    assert_eq!(partial.student_count(), 1);
    assert_eq!(partial.owner_of("stu-25-0001")?.code(), "AAAA");
    Ok(())
}

const DUPLICATE_STUDENT_DATASET: &str = r#"
[[tutors]]
code = "AAAA"
name = "First"
salary = 1

[[tutors.students]]
name = "Twin"
id = "stu-25-0001"
street = "Road 1"
city = "Town"
postal_code = "1"

[[tutors]]
code = "BBBB"
name = "Second"
salary = 2

[[tutors.students]]
name = "Twin"
id = "stu-25-0001"
street = "Road 2"
city = "Town"
postal_code = "2"
"#;

#[test]
fn test_always_policy_keeps_students_loaded_before_duplicate() -> Result<()> {
    let dir = TempDir::new()?;
    let dataset_path = dir.path().join("dup.toml");
    std::fs::write(&dataset_path, DUPLICATE_STUDENT_DATASET)?;

    let settings = AppSettings {
        dataset: Some(dataset_path.to_string_lossy().into_owned()),
        commit_policy: CommitPolicy::Always,
        ..AppSettings::default()
    };

    let dataset = load_dataset(&settings)?;
    let store = DatasetBootstrap::new(dataset, settings.commit_policy).open()?;

    assert_eq!(store.student_count(), 1);
    assert_eq!(store.owner_of("stu-25-0001")?.code(), "AAAA");
    assert_eq!(store.len::<Tutor>(), 2);
    Ok(())
}

#[test]
fn test_on_success_policy_rejects_duplicate_before_setup() -> Result<()> {
    let dir = TempDir::new()?;
    let dataset_path = dir.path().join("dup.toml");
    std::fs::write(&dataset_path, DUPLICATE_STUDENT_DATASET)?;

    let settings = AppSettings {
        dataset: Some(dataset_path.to_string_lossy().into_owned()),
        ..AppSettings::default()
    };

    assert!(matches!(
        load_dataset(&settings),
        Err(SchoolError::InvalidConfigValueError { ref field, .. }) if field == "tutors.students.id"
    ));
    Ok(())
}
