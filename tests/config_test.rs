// tests/config_test.rs
use pr_release::cli::orchestration::GitHubSettings;
use pr_release::config::{load_config, Config};
use pr_release::domain::BumpCategory;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const GITHUB_VARS: [&str; 4] = [
    "GITHUB_REPOSITORY",
    "GITHUB_API_URL",
    "GITHUB_TOKEN",
    "RELEASE_TOKEN",
];

/// Run `f` with the GitHub variables set to `vars` only, restoring them after
fn with_github_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let saved: Vec<(&str, Option<String>)> =
        GITHUB_VARS.iter().map(|k| (*k, env::var(k).ok())).collect();
    for key in GITHUB_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    f();

    for (key, value) in saved {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(
        config.labels.get("release: minor"),
        Some(&BumpCategory::Minor)
    );
    assert_eq!(config.release.remote, "origin");
    assert_eq!(config.release.tag_pattern, "{version}");
    assert_eq!(config.github.token_env, "GITHUB_TOKEN");
    assert!(config.release.fetch_tags);
    assert!(!config.release.draft);
}

#[test]
fn test_load_from_file() {
    let temp_file = write_config(
        r#"
[labels]
"semver:major" = "major"
"semver:feature" = "minor"
"semver:fix" = "patch"

[github]
repository = "acme/widgets"
timeout_secs = 5

[release]
remote = "upstream"
tag_pattern = "v{version}"
draft = true
"#,
    );

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.labels.len(), 3);
    assert_eq!(
        config.labels.get("semver:feature"),
        Some(&BumpCategory::Minor)
    );
    assert_eq!(config.github.repository.as_deref(), Some("acme/widgets"));
    assert_eq!(config.github.timeout_secs, 5);
    assert_eq!(config.release.remote, "upstream");
    assert_eq!(config.tag_pattern().unwrap().as_str(), "v{version}");
    assert!(config.release.draft);
    // untouched keys keep their defaults
    assert_eq!(config.release.changelog_heading, "## What's Changed");
}

#[test]
fn test_invalid_category_is_rejected() {
    let temp_file = write_config(
        r#"
[labels]
"release: huge" = "gigantic"
"#,
    );

    assert!(load_config(Some(temp_file.path().to_str().unwrap())).is_err());
}

#[test]
fn test_pattern_without_placeholder_is_rejected() {
    let temp_file = write_config(
        r#"
[release]
tag_pattern = "release"
"#,
    );

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("{version}"), "{}", err);
}

#[test]
fn test_missing_explicit_file_is_error() {
    assert!(load_config(Some("/nonexistent/prrelease.toml")).is_err());
}

#[test]
#[serial]
fn test_settings_from_config_win_over_environment() {
    with_github_env(
        &[
            ("GITHUB_REPOSITORY", "env/repo"),
            ("GITHUB_API_URL", "https://env.example"),
        ],
        || {
            let mut config = Config::default();
            config.github.repository = Some("acme/widgets".to_string());
            config.github.api_url = Some("https://ghe.example/api/v3".to_string());

            let settings = GitHubSettings::resolve(&config, None).unwrap();
            assert_eq!(settings.repository.to_string(), "acme/widgets");
            assert_eq!(settings.api_url, "https://ghe.example/api/v3");
            assert_eq!(settings.timeout, Duration::from_secs(30));
        },
    );
}

#[test]
#[serial]
fn test_settings_from_environment() {
    with_github_env(
        &[
            ("GITHUB_REPOSITORY", "env/repo"),
            ("GITHUB_API_URL", "https://env.example"),
            ("GITHUB_TOKEN", "ghs_secret"),
        ],
        || {
            let settings = GitHubSettings::resolve(
                &Config::default(),
                Some("git@github.com:remote/ignored.git"),
            )
            .unwrap();
            assert_eq!(settings.repository.to_string(), "env/repo");
            assert_eq!(settings.api_url, "https://env.example");
            assert_eq!(settings.token.as_deref(), Some("ghs_secret"));
        },
    );
}

#[test]
#[serial]
fn test_settings_inferred_from_remote_url() {
    with_github_env(&[], || {
        let settings = GitHubSettings::resolve(
            &Config::default(),
            Some("https://github.com/acme/widgets.git"),
        )
        .unwrap();
        assert_eq!(settings.repository.owner, "acme");
        assert_eq!(settings.repository.name, "widgets");
        assert_eq!(settings.api_url, "https://api.github.com");
        assert_eq!(settings.token, None);
    });
}

#[test]
#[serial]
fn test_token_read_from_configured_variable() {
    with_github_env(
        &[("GITHUB_TOKEN", "ignored"), ("RELEASE_TOKEN", "ghp_release")],
        || {
            let mut config = Config::default();
            config.github.token_env = "RELEASE_TOKEN".to_string();
            config.github.repository = Some("acme/widgets".to_string());

            let settings = GitHubSettings::resolve(&config, None).unwrap();
            assert_eq!(settings.token.as_deref(), Some("ghp_release"));
            assert!(settings.client().is_ok());
        },
    );
}

#[test]
#[serial]
fn test_unknown_repository_is_config_error() {
    with_github_env(&[("GITHUB_TOKEN", "  ")], || {
        let err = GitHubSettings::resolve(&Config::default(), Some("/srv/git/widgets.git"))
            .unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"), "{}", err);
    });
}
