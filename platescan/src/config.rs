use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Like [`parse_env_or`], but zero is rejected as well.
fn parse_nonzero_env_or(var: &str, default: u64) -> u64 {
    match parse_env_or(var, default) {
        0 => {
            tracing::warn!("{} must be greater than zero. Using default {}.", var, default);
            default
        }
        n => n,
    }
}

/// Read an optional string variable, treating an empty value as unset.
fn env_opt(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    pub timeout_secs: u64,
    pub preprocess: bool,
    pub max_image_dimension: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            timeout_secs: 60,
            preprocess: false,
            max_image_dimension: 4096,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 5000),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or(ocr_defaults.model),
                api_key: env_opt("OCR_API_KEY"),
                base_url: env_opt("OCR_BASE_URL"),
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr_defaults.languages),
                timeout_secs: parse_nonzero_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                preprocess: parse_env_or("OCR_PREPROCESS", ocr_defaults.preprocess),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Providers reachable through an OpenAI-compatible chat completions API.
pub const KNOWN_OCR_API_PROVIDERS: &[&str] = &["openai", "openrouter", "mistral", "deepseek"];

/// Split an OCR model string into (provider, model).
///
/// Anything without a known API provider prefix runs on the local engine.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_OCR_API_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
        if prefix_lower == "local" {
            return ("local", rest);
        }
    }
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("PORT");
        std::env::remove_var("HOST");

        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_port_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("PORT", "8080");
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        std::env::remove_var("PORT");
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("PORT", "not-a-port");
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        std::env::remove_var("PORT");
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("OCR_TIMEOUT", "0");
        let config = Config::default();
        assert_eq!(config.ocr.timeout_secs, 60);

        std::env::set_var("OCR_TIMEOUT", "15");
        let config = Config::default();
        assert_eq!(config.ocr.timeout_secs, 15);
        std::env::remove_var("OCR_TIMEOUT");
    }

    #[test]
    fn test_ocr_defaults() {
        let defaults = OcrConfig::default();
        assert_eq!(defaults.model, "local/tesseract");
        assert_eq!(defaults.languages, "eng");
        assert!(!defaults.preprocess);
        assert!(defaults.api_key.is_none());
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("OCR_API_KEY", "  ");
        let config = Config::default();
        assert!(config.ocr.api_key.is_none());
        std::env::remove_var("OCR_API_KEY");
    }

    #[test]
    fn test_parse_ocr_provider_model() {
        assert_eq!(parse_ocr_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
        assert_eq!(
            parse_ocr_provider_model("openrouter/google/gemini-flash"),
            ("openrouter", "google/gemini-flash")
        );
        assert_eq!(
            parse_ocr_provider_model("local/tesseract"),
            ("local", "tesseract")
        );
        assert_eq!(parse_ocr_provider_model("tesseract"), ("local", "tesseract"));
        assert_eq!(
            parse_ocr_provider_model("unknown/thing"),
            ("local", "unknown/thing")
        );
    }
}
