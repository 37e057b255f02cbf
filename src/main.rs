use clap::Parser;
use tutorbase::config::dataset::load_dataset;
use tutorbase::config::toml_config::TomlConfig;
use tutorbase::core::StoreBootstrap;
use tutorbase::utils::error::{ErrorSeverity, SchoolError};
use tutorbase::utils::{logger, validation::Validate};
use tutorbase::{emitter_for, AppSettings, CliConfig, DatasetBootstrap, ReportRunner};

fn exit_code(e: &SchoolError) -> i32 {
    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(stage: &str, e: &SchoolError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

fn main() {
    let args = CliConfig::parse();

    // 載入 TOML 配置
    let file_config = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };

    let mut settings = AppSettings::from_toml(&file_config);
    args.apply_overrides(&mut settings);

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }

    tracing::info!("Starting tutorbase");
    tracing::debug!("Effective settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = file_config.validate().and_then(|_| settings.validate()) {
        fail("Configuration validation", &e);
    }

    let dataset = match load_dataset(&settings) {
        Ok(dataset) => dataset,
        Err(e) => fail("Dataset loading", &e),
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - report will not be produced");
        println!("📋 Dataset Summary:");
        println!("  Subjects: {}", dataset.subjects.len());
        println!("  Tutors:   {}", dataset.tutors.len());
        println!("  Students: {}", dataset.student_count());
        println!("  Commit policy: {:?}", settings.commit_policy);
        return;
    }

    let bootstrap = DatasetBootstrap::new(dataset, settings.commit_policy);
    let store = match bootstrap.open() {
        Ok(store) => store,
        Err(e) => fail("Setup", &e),
    };

    let format = settings.format;
    let runner = ReportRunner::new(&store, settings);
    let stdout = std::io::stdout();
    let mut emitter = emitter_for(format, stdout.lock());
    let summary = runner.run(&mut *emitter);

    if summary.is_success() {
        tracing::info!("✅ All {} tasks completed", summary.succeeded.len());
    } else {
        for failure in &summary.failed {
            tracing::error!("❌ {} failed: {}", failure.task, failure.message);
        }
        std::process::exit(2);
    }
}
