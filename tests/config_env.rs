//! `Config::from_env` tests. They mutate process environment, so each runs
//! serially.

use serial_test::serial;
use tagsmith::config::{Config, LogFormat};

const VARS: &[&str] = &[
    "GROQ_API_KEY",
    "GROQ_BASE_URL",
    "TAGSMITH_PROVIDER",
    "TAGSMITH_MODELS",
    "TAGSMITH_TIMEOUT_SECS",
    "TAGSMITH_MAX_INPUT_CHARS",
    "TAGSMITH_MAX_TAGS",
    "TAGSMITH_BIND",
    "TAGSMITH_LOG_FORMAT",
    "PORT",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    clear_env();
    unsafe {
        std::env::set_var("GROQ_API_KEY", "gsk_env");
        std::env::set_var("PORT", "7070");
        std::env::set_var("TAGSMITH_MODELS", "groq=llama-3.1-8b-instant");
        std::env::set_var("TAGSMITH_PROVIDER", "groq");
        std::env::set_var("TAGSMITH_LOG_FORMAT", "json");
    }

    let config = Config::from_env();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.provider.api_key.as_deref(), Some("gsk_env"));
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.model().unwrap(), "llama-3.1-8b-instant");
    assert_eq!(config.log_format, LogFormat::Json);
}

#[test]
#[serial]
fn from_env_reports_bad_numbers_with_variable_name() {
    clear_env();
    unsafe {
        std::env::set_var("TAGSMITH_TIMEOUT_SECS", "soon");
    }

    let result = Config::from_env();
    clear_env();

    let message = result.unwrap_err().to_string();
    assert!(message.contains("TAGSMITH_TIMEOUT_SECS"), "{message}");
}
