pub mod dataset;
pub mod toml_config;

use crate::core::session::CommitPolicy;
use crate::core::ReportSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_SUBJECT: &str = "Science";
pub const DEFAULT_SALARY_THRESHOLD: u32 = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Effective settings after merging defaults, the TOML file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSettings {
    pub format: ReportFormat,
    pub subject: String,
    pub salary_threshold: u32,
    pub dataset: Option<String>,
    pub commit_policy: CommitPolicy,
    pub json_logs: bool,
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            subject: DEFAULT_SUBJECT.to_string(),
            salary_threshold: DEFAULT_SALARY_THRESHOLD,
            dataset: None,
            commit_policy: CommitPolicy::default(),
            json_logs: false,
            verbose: false,
        }
    }
}

impl AppSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            format: config.report.format.unwrap_or(defaults.format),
            subject: config.report.subject.clone().unwrap_or(defaults.subject),
            salary_threshold: config
                .report
                .salary_threshold
                .unwrap_or(defaults.salary_threshold),
            dataset: config.dataset_path().map(str::to_string),
            commit_policy: config.commit_policy(),
            json_logs: config.json_logs(),
            verbose: config.verbose(),
        }
    }
}

impl ReportSettings for AppSettings {
    fn subject(&self) -> &str {
        &self.subject
    }

    fn salary_threshold(&self) -> u32 {
        self.salary_threshold
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("subject", &self.subject)?;
        if let Some(dataset) = &self.dataset {
            validate_path("dataset", dataset)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "tutorbase")]
#[command(about = "Runs the tutor/subject report queries over an in-memory store")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to a TOML dataset; the built-in sample is used when omitted
    #[arg(long)]
    pub dataset: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Subject used by task one
    #[arg(long)]
    pub subject: Option<String>,

    /// Salary threshold used by task five
    #[arg(long)]
    pub salary_threshold: Option<u32>,

    /// on_success (default) or always
    #[arg(long)]
    pub commit_policy: Option<CommitPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Load and validate the dataset without running the report
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, settings: &mut AppSettings) {
        if let Some(dataset) = &self.dataset {
            settings.dataset = Some(dataset.clone());
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(subject) = &self.subject {
            settings.subject = subject.clone();
        }
        if let Some(threshold) = self.salary_threshold {
            settings.salary_threshold = threshold;
        }
        if let Some(policy) = self.commit_policy {
            settings.commit_policy = policy;
        }
        settings.verbose |= self.verbose;
        settings.json_logs |= self.json_logs;
    }
}
