use selfup_cli::config::GlobalConfig;
use serial_test::serial;
use tempfile::TempDir;

const CONFIG_PATH_ENV: &str = "SELFUP_CONFIG_PATH";

#[tokio::test]
#[serial]
async fn test_env_override_selects_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("mirror.toml");
    std::fs::write(
        &path,
        r#"
[update]
release_base = "https://mirror.example.com/selfup"
show_progress = false
"#,
    )
    .unwrap();

    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(CONFIG_PATH_ENV, &path) };
    let default_path = GlobalConfig::default_path();
    let config = GlobalConfig::load().await;
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert_eq!(default_path, Some(path));
    let config = config.unwrap();
    assert_eq!(config.update.release_base, "https://mirror.example.com/selfup");
    assert!(!config.update.show_progress);
    assert_eq!(config.update.binary_name, "selfup");
}

#[tokio::test]
#[serial]
async fn test_explicit_path_wins_over_env() {
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("explicit.toml");
    std::fs::write(&explicit, "[update]\nbinary_name = \"selfup-lite\"\n").unwrap();

    unsafe { std::env::set_var(CONFIG_PATH_ENV, temp.path().join("ignored.toml")) };
    let config = GlobalConfig::load_with_optional(Some(explicit)).await;
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert_eq!(config.unwrap().update.binary_name, "selfup-lite");
}
