//! Integration tests for error types

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use upkeep_errors::*;

    #[test]
    fn test_error_conversion() {
        let service_err = UpdateServiceError::SearchFailed {
            message: "0x8024402c".into(),
        };
        let err: Error = service_err.into();
        assert!(matches!(err, Error::UpdateService(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            field: "UPKEEP_UPDATE_LIMIT".into(),
            value: "many".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for UPKEEP_UPDATE_LIMIT: many"
        );
    }

    #[test]
    fn test_filter_error_keeps_rule_in_chain() {
        let err = FilterError::UnknownProperty {
            property: "Colour".into(),
        }
        .in_rule("exclude:$_.Colour -eq 'red'");

        assert!(err.to_string().contains("exclude:$_.Colour"));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "unknown update property `Colour`");
        assert_eq!(err.user_code(), Some("filter.unknown_property"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
    }

    #[test]
    fn test_io_error_with_path_names_the_file() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::io_with_path(&io_err, "/etc/upkeep/config.toml");
        assert_eq!(
            err.user_message(),
            "/etc/upkeep/config.toml: access denied"
        );
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_install_failure_is_not_hidden_behind_generic_message() {
        let err: Error = UpdateServiceError::InstallFailed {
            message: "0x80240022".into(),
        }
        .into();
        assert_eq!(err.user_message(), "install failed: 0x80240022");
        assert!(err.user_hint().is_some());
    }
}
