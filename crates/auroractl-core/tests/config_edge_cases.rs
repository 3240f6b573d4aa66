use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use auroractl_core::config::{Config, ConfigError, Profile};
use auroractl_core::WaitConfig;
use tempfile::TempDir;

/// Returns true if running as root (euid == 0). Used to skip permission tests.
#[cfg(unix)]
fn is_root() -> bool {
    std::process::Command::new("id")
        .arg("-u")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim() == "0")
        .unwrap_or(false)
}

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Missing and empty files
// ---------------------------------------------------------------------------

#[test]
fn load_from_nonexistent_path_returns_default_config() {
    let path = PathBuf::from("/tmp/auroractl-test-nonexistent/does/not/exist/config.toml");
    assert!(!path.exists());

    let config = Config::load_from_path(&path).expect("missing file is not an error");

    assert!(config.profiles.is_empty());
    assert!(config.default_profile.is_none());
}

#[test]
fn load_empty_config_file_returns_default_config() {
    let (_dir, path) = write_config("");

    let config = Config::load_from_path(&path).expect("empty file should parse as default");

    assert_eq!(config, Config::default());
    let resolved = config.resolve_profile(None).unwrap();
    assert_eq!(resolved.profile, Profile::default());
}

// ---------------------------------------------------------------------------
// Malformed content
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_toml_returns_parse_error() {
    let (_dir, path) = write_config("[[[broken");

    let err = Config::load_from_path(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().contains("parse"), "{err}");
}

#[test]
fn load_wrong_value_type_returns_parse_error() {
    let (_dir, path) = write_config(
        r#"
[profiles.prod.polling]
interval_secs = "every minute"
"#,
    );

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn load_unknown_engine_returns_parse_error() {
    let (_dir, path) = write_config(
        r#"
[profiles.prod.instance]
engine = "oracle-ee"
"#,
    );

    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn load_config_with_unknown_fields_ignores_them() {
    let (_dir, path) = write_config(
        r#"
unknown_top_level_key = "hello"

[profiles.prod]
region = "eu-west-1"
totally_unknown_field = true
"#,
    );

    let config = Config::load_from_path(&path).expect("unknown fields should be ignored");

    assert_eq!(config.profiles["prod"].region.as_deref(), Some("eu-west-1"));
}

// ---------------------------------------------------------------------------
// Profile selection
// ---------------------------------------------------------------------------

#[test]
fn dangling_default_profile_is_reported() {
    let (_dir, path) = write_config(
        r#"
default_profile = "prod"

[profiles.dev]
region = "us-east-1"
"#,
    );
    let config = Config::load_from_path(&path).unwrap();

    let err = config.resolve_profile(None).unwrap_err();
    assert_eq!(err.to_string(), "Profile 'prod' not found");

    // an explicit choice still works
    let resolved = config.resolve_profile(Some("dev")).unwrap();
    assert_eq!(resolved.profile.region.as_deref(), Some("us-east-1"));
}

#[test]
fn profile_polling_becomes_wait_config() {
    let (_dir, path) = write_config(
        r#"
default_profile = "ci"

[profiles.ci.polling]
interval_secs = 5
max_attempts = 40
"#,
    );
    let config = Config::load_from_path(&path).unwrap();

    let resolved = config.resolve_profile(None).unwrap();
    let wait = resolved.profile.polling.to_wait_config().unwrap();

    assert_eq!(
        wait,
        WaitConfig {
            interval: Duration::from_secs(5),
            max_attempts: Some(40),
            timeout: None,
        }
    );
}

// ---------------------------------------------------------------------------
// Permission errors (unix only)
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn load_unreadable_file_returns_load_error() {
    use std::os::unix::fs::PermissionsExt;

    if is_root() {
        eprintln!("skipping test: running as root");
        return;
    }

    let (_dir, path) = write_config("# valid toml");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::LoadError { .. }), "{err}");

    // Restore permissions so TempDir cleanup can remove the file
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
}
