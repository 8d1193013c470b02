//! Logging setup as seen from outside the crate.

use bridge_traits::time::LogLevel;
use core_runtime::logging::{
    init_logging, parse_log_level, redact_if_sensitive, strip_path, LogFormat, LoggingConfig,
};

#[test]
fn test_logging_initialization_once() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_spans(false);

    assert!(init_logging(config.clone()).is_ok());

    // A second global subscriber is refused
    assert!(init_logging(config).is_err());

    tracing::info!(target: "core_service", "logging initialized");
}

#[test]
fn test_invalid_filter_rejected_before_install() {
    let config = LoggingConfig::default().with_filter("core_service=notalevel");
    let err = init_logging(config).unwrap_err();
    assert!(err.to_string().contains("Invalid log filter"));
}

#[test]
fn test_redaction_of_media_store_credentials() {
    assert_eq!(redact_if_sensitive("api_secret", "shh"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("api_key", "123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("anon_key", "anon"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Basic abc"), "[REDACTED]");
}

#[test]
fn test_redaction_passes_song_fields() {
    assert_eq!(redact_if_sensitive("title", "Test Song"), "Test Song");
    assert_eq!(redact_if_sensitive("song_id", "42"), "42");
    assert_eq!(
        redact_if_sensitive("public_id", "music_app/songs/abc"),
        "music_app/songs/abc"
    );
}

#[test]
fn test_path_stripping() {
    assert_eq!(strip_path("/home/user/music/song.mp3"), "song.mp3");
    assert_eq!(strip_path("C:\\Users\\John\\Music\\song.mp3"), "song.mp3");
    assert_eq!(strip_path("filename.txt"), "filename.txt");
    assert_eq!(strip_path(""), "");
}

#[test]
fn test_format_and_level_parsing() {
    assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!(" Pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    assert!("yaml".parse::<LogFormat>().is_err());

    assert_eq!(parse_log_level("warning").unwrap(), LogLevel::Warn);
    assert_eq!(parse_log_level("TRACE").unwrap(), LogLevel::Trace);
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_pii_redaction(false)
        .with_spans(false)
        .with_target(false);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact_pii);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
}
