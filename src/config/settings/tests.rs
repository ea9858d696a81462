use super::*;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config {
        ollama: OllamaConfig::default(),
        chunking: ChunkingConfig::default(),
        llm: LlmConfig::default(),
        kb: KbConfig::default(),
        base_dir: PathBuf::from("/tmp/scam-triage-test"),
    };

    assert!(config.validate().is_ok());
}

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let config = Config::load(temp_dir.path()).expect("load should succeed");

    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.chunking, ChunkingConfig::default());
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn save_and_reload_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let mut config = Config::load(temp_dir.path()).expect("load should succeed");
    config.chunking.window_size = 800;
    config.chunking.overlap = 100;
    config.llm.provider = "ollama".to_string();
    config.save().expect("save should succeed");

    let reloaded = Config::load(temp_dir.path()).expect("reload should succeed");
    assert_eq!(reloaded.chunking.window_size, 800);
    assert_eq!(reloaded.chunking.overlap, 100);
    assert_eq!(reloaded.llm.provider, "ollama");
}

#[test]
fn overlap_must_be_smaller_than_window() {
    let config = ChunkingConfig {
        window_size: 500,
        overlap: 500,
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OverlapTooLarge(500, 500))
    ));

    let config = ChunkingConfig {
        window_size: 500,
        overlap: 700,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OverlapTooLarge(700, 500))
    ));
}

#[test]
fn window_size_bounds() {
    let config = ChunkingConfig {
        window_size: 50,
        overlap: 10,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWindowSize(50))
    ));
}

#[test]
fn invalid_llm_provider_rejected() {
    let config = LlmConfig {
        provider: "palm".to_string(),
        ..LlmConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProvider(_))
    ));
}

#[test]
fn ollama_base_url() {
    let config = OllamaConfig::default();
    let url = config.base_url().expect("url should parse");

    assert_eq!(url.host_str(), Some("localhost"));
    assert_eq!(url.port(), Some(11434));
}

#[test]
fn invalid_protocol_rejected() {
    let config = OllamaConfig {
        protocol: "ftp".to_string(),
        ..OllamaConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));
}

#[test]
fn kb_dir_resolves_relative_to_base() {
    let config = Config {
        ollama: OllamaConfig::default(),
        chunking: ChunkingConfig::default(),
        llm: LlmConfig::default(),
        kb: KbConfig::default(),
        base_dir: PathBuf::from("/var/lib/triage"),
    };

    assert_eq!(config.kb_dir_path(), PathBuf::from("/var/lib/triage/kb"));

    let config = Config {
        kb: KbConfig {
            dir: PathBuf::from("/srv/kb"),
        },
        ..config
    };
    assert_eq!(config.kb_dir_path(), PathBuf::from("/srv/kb"));
}
