//! Integration tests for events

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use upkeep_errors::UpdateServiceError;
    use upkeep_events::*;
    use upkeep_types::{RebootReason, ResultCode, Update};

    #[tokio::test]
    async fn test_emitter_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_operation_started("update");
        tx.emit_warning_with_context("servicing count unavailable", "access denied");
        tx.emit_operation_failed(
            "update",
            FailureContext::new(Some("service.install"), "install failed", None::<String>, false),
        );

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            AppEvent::General(GeneralEvent::OperationStarted { .. })
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(
            event2,
            AppEvent::General(GeneralEvent::Warning {
                context: Some(_),
                ..
            })
        ));

        let event3 = rx.recv().await.unwrap();
        assert_eq!(event3.log_level(), tracing::Level::ERROR);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_operation_started("ignored");
    }

    #[test]
    fn test_log_levels() {
        let failed = AppEvent::Search(SearchEvent::Failed {
            result_code: ResultCode::Failed,
            failure: None,
            retry_in: Duration::from_secs(5),
        });
        assert_eq!(failed.log_level(), tracing::Level::WARN);
        assert_eq!(failed.log_target(), "upkeep::events::search");

        let installed = AppEvent::Install(InstallEvent::UpdateInstalled {
            update: Update::new("a", "A").summary(),
        });
        assert_eq!(installed.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_failure_context_from_error() {
        let err = UpdateServiceError::SearchFailed {
            message: "0x8024402c".into(),
        };
        let failure = FailureContext::from_error(&err);
        assert_eq!(failure.code.as_deref(), Some("service.search"));
        assert_eq!(failure.message, "search failed: 0x8024402c");
        assert!(failure.retryable);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = AppEvent::Reboot(RebootEvent::Required {
            reason: RebootReason::InstallResult,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "reboot");
        assert_eq!(json["event"]["type"], "Required");
        assert_eq!(json["event"]["reason"]["kind"], "install_result");
    }
}
