use loqa_notebook::Config;
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const MINIMAL: &str = r#"
[service]
name = "loqa-notebook-test"

[service.http]
bind = "127.0.0.1"
port = 3999

[transcription]
nats_url = "nats://localhost:4222"

[summarizer]
api_key = "test-key"

[store]
base_url = "http://localhost:8000"
"#;

#[test]
fn test_load_minimal_config_uses_defaults() {
    let file = write_config(MINIMAL);
    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(cfg.service.name, "loqa-notebook-test");
    assert_eq!(cfg.service.http.port, 3999);
    assert_eq!(cfg.summarizer.model, "gemini-2.0-flash");
    assert_eq!(
        cfg.summarizer.endpoint,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(cfg.summarizer.timeout_secs, 60);
    assert_eq!(cfg.store.timeout_secs, 60);

    let session = cfg.session.to_session_config();
    assert_eq!(session.save_grace_delay, Duration::from_millis(800));
    assert_eq!(session.leave_grace_delay, Duration::from_millis(500));
    assert_eq!(session.notice_ttl, Duration::from_secs(2));
    assert_eq!(session.error_notice_ttl, Duration::from_secs(3));
    assert_eq!(session.search_url, "https://www.perplexity.ai/search");
    assert!(session.session_id.starts_with("notebook-"));
}

#[test]
fn test_session_settings_override_defaults() {
    let contents = format!(
        "{}\n[session]\nsave_grace_delay_ms = 50\nsearch_url = \"https://search.example/q\"\n",
        MINIMAL
    );
    let file = write_config(&contents);
    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();

    let session = cfg.session.to_session_config();
    assert_eq!(session.save_grace_delay, Duration::from_millis(50));
    assert_eq!(session.leave_grace_delay, Duration::from_millis(500));
    assert_eq!(session.search_url, "https://search.example/q");
}

#[test]
fn test_missing_section_is_an_error() {
    let file = write_config("[service]\nname = \"x\"\n");
    assert!(Config::load(file.path().to_str().unwrap()).is_err());
}
