//! Integration tests for config

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;
    use upkeep_config::*;
    use upkeep_errors::{ConfigError, Error, UserFacingError};
    use upkeep_types::ColorChoice;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.criteria, "BrowseOnly=0 and IsInstalled=0");
        assert_eq!(config.filter.rules, vec!["include:$true".to_string()]);
        assert_eq!(config.filter.update_limit, 1000);
        assert_eq!(config.timing.retry_delay_secs, 5);
        assert_eq!(config.timing.download_pause_secs, 30);
        assert_eq!(config.timing.reboot_debounce_secs, 15);
        assert_eq!(config.timing.poll_interval_secs, 1);
        assert_eq!(config.reboot.blocking_process, "TiWorker");
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
color = "never"

[filter]
rules = [
    "exclude:$_.Title -like '*Preview*'",
    "include:$true",
]
update_limit = 25

[timing]
download_pause_secs = 0
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.filter.rules.len(), 2);
        assert_eq!(config.filter.update_limit, 25);
        assert_eq!(config.timing.download_pause_secs, 0);
        // untouched sections keep their defaults
        assert_eq!(config.timing.retry_delay_secs, 5);
        assert_eq!(config.search.client_application_id, "upkeep");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load_or_default(Some(&path)).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_the_real_cause() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0x5b, 0xff, 0xfe, 0x5d]).unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        match &err {
            Error::Io { kind, path, .. } => {
                assert_eq!(*kind, std::io::ErrorKind::InvalidData);
                assert_eq!(path.as_deref(), Some(temp_file.path()));
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
        assert!(err
            .user_message()
            .starts_with(&temp_file.path().display().to_string()));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_a_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[filter]\nupdate_limit = \"lots\"").unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_merge_vars() {
        let mut config = Config::default();
        config
            .merge_vars(vars(&[
                ("UPKEEP_SEARCH_CRITERIA", "IsInstalled=0 and Type='Software'"),
                (
                    "UPKEEP_FILTERS",
                    "exclude:$_.InstallationBehavior.CanRequestUserInput\n\n  include:$true  \n",
                ),
                ("UPKEEP_UPDATE_LIMIT", " 10 "),
                ("UPKEEP_CLIENT_ID", "packer"),
                ("UPKEEP_COLOR", "always"),
            ]))
            .unwrap();

        assert_eq!(config.search.criteria, "IsInstalled=0 and Type='Software'");
        assert_eq!(
            config.filter.rules,
            vec![
                "exclude:$_.InstallationBehavior.CanRequestUserInput".to_string(),
                "include:$true".to_string()
            ]
        );
        assert_eq!(config.filter.update_limit, 10);
        assert_eq!(config.search.client_application_id, "packer");
        assert_eq!(config.general.color, ColorChoice::Always);
    }

    #[test]
    fn test_invalid_var_value() {
        let mut config = Config::default();
        let err = config
            .merge_vars(vars(&[("UPKEEP_UPDATE_LIMIT", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "UPKEEP_UPDATE_LIMIT"
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("UPKEEP_COLOR");
        std::env::set_var("UPKEEP_COLOR", "never");

        let mut config = Config::default();
        config.merge_env().unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);

        // Clean up
        std::env::remove_var("UPKEEP_COLOR");
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = Config::default();
        config.filter.update_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.rules.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.timing.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reboot.blocking_process = "  ".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.criteria = String::new();
        assert!(config.validate().is_err());
    }
}
