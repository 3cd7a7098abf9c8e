//! Integration tests for the portable platform

#[cfg(not(windows))]
mod portable {
    use upkeep_errors::{Error, PlatformError};
    use upkeep_platform::Platform;
    use upkeep_types::{DownloadPriority, UpdateCollection};

    #[tokio::test]
    async fn update_service_is_unavailable() {
        let platform = Platform::current("upkeep-tests").unwrap();
        assert!(platform.updates().ensure_available().is_err());

        let err = platform.updates().search("IsInstalled=0").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::CapabilityUnavailable { .. })
        ));

        let err = platform
            .updates()
            .download(&UpdateCollection::new(), DownloadPriority::High)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Platform(_)));
    }

    #[test]
    fn probes_answer() {
        let platform = Platform::current("upkeep-tests").unwrap();
        assert!(!platform
            .process()
            .is_running("upkeep-no-such-process-7f3a")
            .unwrap());
        assert!(platform.clock().uptime() > std::time::Duration::ZERO);
        // the flag file normally does not exist on build hosts; only the call must succeed
        let _ = platform.reboot_state().reboot_required();
    }
}
