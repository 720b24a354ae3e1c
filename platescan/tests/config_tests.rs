mod common;

use std::env;

use common::serial;
use platescan::config::{parse_ocr_provider_model, Config, KNOWN_OCR_API_PROVIDERS};
use platescan::ocr::OcrProvider;

fn clear_env() {
    for var in [
        "HOST",
        "PORT",
        "MAX_UPLOAD_BYTES",
        "OCR_MODEL",
        "OCR_API_KEY",
        "OCR_BASE_URL",
        "OCR_LANGUAGES",
        "OCR_TIMEOUT",
        "OCR_PREPROCESS",
        "OCR_MAX_DIMENSION",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();

    let config = Config::from_env();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.max_upload_bytes, 20 * 1024 * 1024);
    assert_eq!(config.ocr.model, "local/tesseract");
    assert_eq!(config.ocr.languages, "eng");
    assert_eq!(config.ocr.timeout_secs, 60);
    assert!(!config.ocr.preprocess);
}

#[test]
#[serial]
fn test_ocr_settings_from_env() {
    clear_env();
    env::set_var("OCR_MODEL", "mistral/pixtral-12b-2409");
    env::set_var("OCR_API_KEY", "secret");
    env::set_var("OCR_BASE_URL", "http://localhost:8080/v1");
    env::set_var("OCR_TIMEOUT", "5");
    env::set_var("OCR_PREPROCESS", "true");
    env::set_var("OCR_MAX_DIMENSION", "1024");

    let config = Config::from_env();
    assert_eq!(config.ocr.model, "mistral/pixtral-12b-2409");
    assert_eq!(config.ocr.api_key.as_deref(), Some("secret"));
    assert_eq!(config.ocr.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(config.ocr.timeout_secs, 5);
    assert!(config.ocr.preprocess);
    assert_eq!(config.ocr.max_image_dimension, 1024);

    let provider = OcrProvider::new(&config.ocr).unwrap();
    assert!(provider.is_available());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_numbers_fall_back() {
    clear_env();
    env::set_var("PORT", "70000");
    env::set_var("OCR_TIMEOUT", "soon");

    let config = Config::from_env();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.ocr.timeout_secs, 60);

    clear_env();
}

#[test]
fn test_known_providers() {
    assert!(KNOWN_OCR_API_PROVIDERS.contains(&"openai"));
    assert!(KNOWN_OCR_API_PROVIDERS.contains(&"mistral"));
    assert_eq!(parse_ocr_provider_model("OpenAI/gpt-4o"), ("OpenAI", "gpt-4o"));
}
