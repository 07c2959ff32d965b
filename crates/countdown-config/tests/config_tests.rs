// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use countdown_config::diagnostic::{ConfigError, suggest_key};
use countdown_config::{load_and_validate_str, load_config, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_countdown_config() {
    let toml = r#"
[bot]
name = "deadlines"
log_level = "debug"

[telegram]
bot_token = "123:ABC"

[storage]
database_path = "/tmp/countdown-test.db"
wal_mode = false

[chats]
fallback_chat_id = -1001234

[conversation]
ttl_secs = 600

[prometheus]
enabled = true
listen_address = "0.0.0.0:9100"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "deadlines");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.storage.database_path, "/tmp/countdown-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.chats.fallback_chat_id, Some(-1001234));
    assert_eq!(config.conversation.ttl_secs, 600);
    assert!(config.prometheus.enabled);
    assert_eq!(config.prometheus.listen_address, "0.0.0.0:9100");
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "countdown");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.storage.database_path.ends_with("countdown.db"));
    assert!(config.storage.wal_mode);
    assert!(config.chats.fallback_chat_id.is_none());
    assert_eq!(config.conversation.ttl_secs, 1800);
    assert!(!config.prometheus.enabled);
}

#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[agent]
name = "x"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn suggestion_for_typo() {
    assert_eq!(
        suggest_key("fallback_chat", &["fallback_chat_id"]),
        Some("fallback_chat_id".to_string())
    );
    assert!(suggest_key("zzzzzz", &["ttl_secs"]).is_none());
}

#[test]
fn diagnostic_unknown_key_carries_suggestion_and_valid_keys() {
    let toml = r#"
[conversation]
ttl_sec = 60
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "ttl_sec"
                && suggestion.as_deref() == Some("ttl_secs")
                && valid_keys.contains("ttl_secs")
        })
    });
    assert!(found, "expected UnknownKey for ttl_sec, got: {errors:?}");
}

#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[chats]
fallback_chat_id = "general"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "databse_path".to_string(),
        suggestion: Some("database_path".to_string()),
        valid_keys: "database_path, wal_mode".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `database_path`"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("databse_path"));
}

#[test]
fn validation_rejects_bad_listen_address() {
    let toml = r#"
[prometheus]
listen_address = "not an address"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad address should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("listen_address"))
    ));
}

#[test]
fn prefixed_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "countdown.toml",
            r#"
[storage]
database_path = "from-file.db"
"#,
        )?;
        jail.set_env("COUNTDOWN_STORAGE_DATABASE_PATH", "from-env.db");
        jail.set_env("COUNTDOWN_TELEGRAM_BOT_TOKEN", "42:xyz");

        let config = load_config()?;
        assert_eq!(config.storage.database_path, "from-env.db");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("42:xyz"));
        Ok(())
    });
}

#[test]
fn legacy_env_names_are_honoured() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("TELEGRAM_TOKEN", "1:legacy");
        jail.set_env("TEST_CHAT_ID", "-100555");
        jail.set_env("LOG_LEVEL", "debug");

        let config = load_config()?;
        assert_eq!(config.telegram.bot_token.as_deref(), Some("1:legacy"));
        assert_eq!(config.chats.fallback_chat_id, Some(-100555));
        assert_eq!(config.bot.log_level, "debug");
        Ok(())
    });
}

#[test]
fn prefixed_env_wins_over_legacy() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("TELEGRAM_TOKEN", "1:legacy");
        jail.set_env("COUNTDOWN_TELEGRAM_BOT_TOKEN", "2:prefixed");

        let config = load_config()?;
        assert_eq!(config.telegram.bot_token.as_deref(), Some("2:prefixed"));
        Ok(())
    });
}

#[test]
fn redacted_toml_hides_token() {
    let config = load_config_from_str(
        r#"
[telegram]
bot_token = "123:SECRET"
"#,
    )
    .unwrap();
    let rendered = countdown_config::to_redacted_toml(&config).unwrap();
    assert!(!rendered.contains("SECRET"));
    assert!(rendered.contains("[REDACTED]"));
}
