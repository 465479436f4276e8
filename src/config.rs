use std::env;
use secrecy::SecretString;

use crate::services::scoring::ScoringPolicy;

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub ai_api_key: SecretString,
    pub ai_api_base: String,
    pub ai_model: String,
    pub ai_timeout_seconds: u64,
    pub scoring_negative_marking: bool,
    pub scoring_pass_threshold_percent: f64,
    pub submission_window_seconds: i64,
    pub login_rate_limit_max_attempts: u32,
    pub login_rate_limit_window_seconds: u64,
    pub max_pdf_bytes: usize,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "examforge-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: parsed_or("JWT_EXPIRATION_HOURS", 24),
            ai_api_key: SecretString::from(env::var("AI_API_KEY").unwrap_or_default()),
            ai_api_base: env::var("AI_API_BASE")
                .unwrap_or_else(|_| GEMINI_OPENAI_BASE.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-001".to_string()),
            ai_timeout_seconds: parsed_or("AI_TIMEOUT_SECONDS", 8),
            scoring_negative_marking: parsed_or("SCORING_NEGATIVE_MARKING", false),
            scoring_pass_threshold_percent: parsed_or("SCORING_PASS_THRESHOLD_PERCENT", 50.0),
            submission_window_seconds: parsed_or("SUBMISSION_WINDOW_SECONDS", 30),
            login_rate_limit_max_attempts: parsed_or("LOGIN_RATE_LIMIT_MAX_ATTEMPTS", 5),
            login_rate_limit_window_seconds: parsed_or("LOGIN_RATE_LIMIT_WINDOW_SECONDS", 15),
            max_pdf_bytes: parsed_or("MAX_PDF_BYTES", 10 * 1024 * 1024),
        }
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            negative_marking: self.scoring_negative_marking,
            pass_threshold_percent: self.scoring_pass_threshold_percent,
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.ai_api_key.expose_secret().is_empty() {
            panic!("FATAL: AI_API_KEY is not set. Question generation and evaluation need it.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "examforge-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            ai_api_key: SecretString::from("test-ai-key".to_string()),
            ai_api_base: "http://127.0.0.1:9".to_string(),
            ai_model: "test-model".to_string(),
            ai_timeout_seconds: 1,
            scoring_negative_marking: false,
            scoring_pass_threshold_percent: 50.0,
            submission_window_seconds: 30,
            login_rate_limit_max_attempts: 5,
            login_rate_limit_window_seconds: 15,
            max_pdf_bytes: 1024 * 1024,
        }
    }
}
