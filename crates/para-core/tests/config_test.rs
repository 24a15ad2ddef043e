//! Tests for layered configuration loading.

use std::sync::Mutex;

use para_core::config::{ConfigOverrides, ParaConfig};
use para_core::errors::ConfigError;
use para_core::Category;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_para_env_vars() {
    for key in [
        "PARA_CATEGORIES",
        "PARA_DB_PATH",
        "PARA_OLLAMA_URL",
        "PARA_GENERATIVE_MODEL",
        "PARA_GENERATIVE_TIMEOUT_SECS",
        "PARA_INDEX_K",
        "PARA_CONSENSUS_PENALTY",
        "PARA_ENGINE_WORKERS",
        "PARA_LEARNING_WINDOW",
        "PARA_LEARNING_MAX_STEP",
    ] {
        std::env::remove_var(key);
    }
}

/// Point HOME at an isolated directory so a developer's own config never leaks in.
fn isolated_home() -> tempfile::TempDir {
    let home = tempdir();
    std::env::set_var("HOME", home.path());
    home
}

#[test]
fn layered_resolution_prefers_overrides_then_env_then_project_then_user() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_para_env_vars();
    let home = isolated_home();

    let user_dir = home.path().join(".para");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        r#"
[index]
k = 3

[engine]
workers = 2

[consensus]
single_signal_penalty = 0.5
"#,
    )
    .unwrap();

    let project = tempdir();
    std::fs::write(
        project.path().join("para.toml"),
        r#"
[index]
k = 7

[consensus]
single_signal_penalty = 0.7
"#,
    )
    .unwrap();

    std::env::set_var("PARA_CONSENSUS_PENALTY", "0.75");

    let overrides = ConfigOverrides {
        workers: Some(16),
        ..Default::default()
    };
    let config = ParaConfig::load(project.path(), Some(&overrides)).unwrap();

    // Project beats user.
    assert_eq!(config.index.k, 7);
    // Env beats project.
    assert_eq!(config.consensus.single_signal_penalty, 0.75);
    // Overrides beat user.
    assert_eq!(config.engine.workers, 16);

    clear_para_env_vars();
}

#[test]
fn missing_files_fall_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_para_env_vars();
    let _home = isolated_home();

    let dir = tempdir();
    let config = ParaConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.categories.labels.len(), 4);
    assert_eq!(config.consensus.single_signal_penalty, 0.8);
    assert_eq!(config.index.k, 10);
    assert_eq!(config.generative.timeout_secs, 45);
    assert!(config.engine.require_review_on_discrepancy);
}

#[test]
fn empty_category_list_is_fatal() {
    let config = ParaConfig::from_toml(
        r#"
[categories]
labels = []
"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingCategories)
    ));
}

#[test]
fn custom_labels_drop_default_aliases() {
    let config = ParaConfig::from_toml(
        r#"
[categories]
labels = ["Work", "Life"]
"#,
    )
    .unwrap();
    let set = config.category_set().unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.normalize("work"), Some(Category::new("Work")));
    assert_eq!(set.normalize("project"), None);
}

#[test]
fn penalty_out_of_range_fails_validation() {
    let config = ParaConfig::from_toml(
        r#"
[consensus]
single_signal_penalty = 1.5
"#,
    )
    .unwrap();
    match config.validate() {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "consensus.single_signal_penalty");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn zero_workers_fails_validation() {
    let config = ParaConfig::from_toml("[engine]\nworkers = 0\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn invalid_toml_reports_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_para_env_vars();
    let _home = isolated_home();

    let dir = tempdir();
    std::fs::write(dir.path().join("para.toml"), "[index\nk = ").unwrap();
    assert!(matches!(
        ParaConfig::load(dir.path(), None),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn env_category_list_replaces_labels() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_para_env_vars();
    let _home = isolated_home();

    std::env::set_var("PARA_CATEGORIES", "Inbox, Projects");
    let dir = tempdir();
    let config = ParaConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.categories.labels, vec!["Inbox", "Projects"]);
    let set = config.category_set().unwrap();
    assert_eq!(set.normalize("task"), Some(Category::new("Projects")));

    clear_para_env_vars();
}

#[test]
fn config_round_trips_through_toml() {
    let config = ParaConfig::default();
    let text = config.to_toml().unwrap();
    let back = ParaConfig::from_toml(&text).unwrap();
    assert_eq!(back.categories.labels, config.categories.labels);
    assert_eq!(back.learning.window, config.learning.window);
    assert_eq!(back.generative.backends, config.generative.backends);
}
