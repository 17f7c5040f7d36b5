use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[cfg(test)]
mod config_tests {
    use super::*;
    use ocsight::config::Config;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        // Logging defaults
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.output, "console");

        // Resolver defaults
        assert_eq!(config.resolver.entry_point, "index.js");
        assert_eq!(config.resolver.script_suffix, "js");
        assert_eq!(config.resolver.entry_point_override, None);
        assert_eq!(
            config.resolver.bundled_dirs,
            vec![PathBuf::from("lib"), PathBuf::from("..").join("libexec"), PathBuf::from(".")]
        );
        assert_eq!(
            config.resolver.development_dirs,
            vec![PathBuf::from("src"), PathBuf::from("..").join("src"), PathBuf::from("..").join("lib")]
        );

        // Runtime defaults
        assert_eq!(config.runtime.candidates, vec!["bun", "node"]);
        assert!(config.runtime.forward_signals);
    }

    // Environment variables are process-wide, so every env-dependent check
    // lives in this one test
    #[test]
    fn test_env_variable_override() {
        env::set_var("OCSIGHT_RUNTIME", " node , ,deno ");
        env::set_var("OCSIGHT_ENTRY_POINT", "/opt/ocsight/engine.js");
        env::set_var("OCSIGHT_RESOLVE_SYMLINKS", "false");
        env::set_var("LOG_LEVEL", "debug");

        let mut config = Config::default();
        config
            .apply_env_overrides()
            .expect("Failed to apply env overrides");

        assert_eq!(config.runtime.candidates, vec!["node", "deno"]);
        assert_eq!(
            config.resolver.entry_point_override,
            Some(PathBuf::from("/opt/ocsight/engine.js"))
        );
        assert!(!config.resolver.resolve_symlinks);
        assert_eq!(config.logging.level, "debug");

        env::set_var("OCSIGHT_FORWARD_SIGNALS", "sometimes");
        assert!(Config::default().apply_env_overrides().is_err());

        // Cleanup
        env::remove_var("OCSIGHT_RUNTIME");
        env::remove_var("OCSIGHT_ENTRY_POINT");
        env::remove_var("OCSIGHT_RESOLVE_SYMLINKS");
        env::remove_var("OCSIGHT_FORWARD_SIGNALS");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    fn test_config_file_loading() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let test_config = r#"
[logging]
level = "debug"
format = "json"

[resolver]
entry_point = "main.mjs"
script_suffix = "mjs"
resolve_symlinks = false

[runtime]
candidates = ["node"]
"#;
        fs::write(&config_path, test_config).expect("Failed to write test config");

        let config = Config::load_from_file(&config_path).expect("Failed to load config");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        // Unspecified fields keep their defaults
        assert_eq!(config.logging.output, "console");
        assert_eq!(config.resolver.entry_point, "main.mjs");
        assert_eq!(config.resolver.script_suffix, "mjs");
        assert!(!config.resolver.resolve_symlinks);
        assert_eq!(config.resolver.bundled_dirs.len(), 3);
        assert_eq!(config.runtime.candidates, vec!["node"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[runtime\ncandidates = ").unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_save_and_reload() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("saved.toml");

        let mut config = Config::default();
        config.runtime.candidates = vec!["deno".to_string()];
        config.resolver.entry_point_override = Some(PathBuf::from("/srv/engine/index.js"));

        config.save_to_file(&config_path).expect("Failed to save config");
        let loaded = Config::load_from_file(&config_path).expect("Failed to reload config");

        assert_eq!(loaded, config);
    }
}
