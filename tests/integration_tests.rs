#[cfg(test)]
mod config_tests {
    use psconvert::config::{Config, CustomMapping};
    use psconvert::Direction;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.conversion.default_direction, Direction::Auto);
        assert!(config.conversion.record_history);
        assert!(!config.lookup.enabled);
        assert_eq!(config.lookup.timeout_ms, 5000);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.lookup.enabled = true;
        config.custom_mappings.push(CustomMapping {
            cmd: "ll".to_string(),
            powershell: "Get-ChildItem -Force".to_string(),
        });
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert!(loaded.lookup.enabled);
        assert_eq!(loaded.custom_mappings, config.custom_mappings);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "lookup: [not, a, map]").unwrap();
        assert!(Config::load_from_file(&config_path).is_err());
        assert!(Config::load_from_file(dir.path().join("missing.yaml")).is_err());
    }
}

#[cfg(test)]
mod conversion_tests {
    use psconvert::{Converter, Dialect, Direction, SourceKind};

    fn converter() -> Converter {
        Converter::with_builtin_mappings().unwrap()
    }

    #[test]
    fn test_basic_mappings() {
        let converter = converter();
        let cases = [
            ("dir", "Get-ChildItem"),
            ("cls", "Clear-Host"),
            ("ipconfig", "Get-NetIPConfiguration"),
            ("whoami", "$env:USERNAME"),
            ("md logs", "New-Item -ItemType Directory -Path \"logs\""),
        ];
        for (input, expected) in cases {
            let result = converter.convert(input, Direction::CmdToPowerShell);
            assert_eq!(result.output, expected, "input: {input}");
        }
    }

    #[test]
    fn test_required_scenarios() {
        let converter = converter();

        let result = converter.convert("dir /s *.txt", Direction::CmdToPowerShell);
        assert!(result.output.contains("Get-ChildItem"));
        assert!(result.output.contains("-Recurse"));
        assert!(result.output.contains("*.txt"));

        let result = converter.convert("taskkill /im notepad.exe /f", Direction::CmdToPowerShell);
        assert_eq!(result.output, "Stop-Process -Name \"notepad\" -Force");

        let result = converter.convert("", Direction::CmdToPowerShell);
        assert_eq!(result.kind, SourceKind::Empty);
        assert_eq!(result.output, "");

        assert_eq!(converter.detect("Get-ChildItem -Recurse"), Dialect::PowerShell);

        let result = converter.convert("dier", Direction::CmdToPowerShell);
        let dir = result.similar.iter().find(|s| s.command == "dir").unwrap();
        assert!(dir.similarity_percent > 50);
    }

    #[test]
    fn test_multi_flag_dir_keeps_both_flags() {
        let result = converter().convert("dir /s /b", Direction::CmdToPowerShell);
        assert!(result.output.contains("-Recurse"));
        assert!(result.output.contains("-Name"));
    }

    #[test]
    fn test_dir_switches_in_any_order_keep_their_meaning() {
        let converter = converter();
        let cases = [
            ("dir /b /s", "Get-ChildItem -Recurse -Name"),
            ("dir /a:d /s", "Get-ChildItem -Directory -Recurse"),
            ("dir /s /a:d", "Get-ChildItem -Recurse -Directory"),
            ("dir C:\\logs /a:d", "Get-ChildItem -Path \"C:\\logs\" -Directory"),
        ];
        for (input, expected) in cases {
            let result = converter.convert(input, Direction::CmdToPowerShell);
            assert_eq!(result.output, expected, "input: {input}");
            assert!(!result.output.contains("\"/"), "switch captured as path: {input}");
        }
    }

    #[test]
    fn test_quoted_separator_is_not_split() {
        let result = converter().convert("echo \"a && b\"", Direction::CmdToPowerShell);
        assert_eq!(result.output, "Write-Host \"a && b\"");
    }

    #[test]
    fn test_chained_powershell_to_cmd() {
        let result = converter().convert(
            "Set-Location C:\\src; Get-ChildItem -Filter *.rs -Recurse",
            Direction::PowerShellToCmd,
        );
        assert_eq!(result.output, "cd /d C:\\src && dir *.rs /s");
        assert_eq!(result.target, Some(Dialect::Cmd));
    }

    #[test]
    fn test_powershell_scenarios() {
        let converter = converter();
        let cases = [
            ("Remove-Item temp -Recurse -Force", "del temp /f /s /q"),
            ("Copy-Item a.txt b.txt", "copy a.txt b.txt"),
            ("Rename-Item old.txt new.txt", "ren old.txt new.txt"),
            ("Get-Content \"My Notes.txt\"", "type \"My Notes.txt\""),
            ("Test-Connection google.com -Count 4", "ping google.com -n 4"),
            ("New-Item -ItemType Directory -Path logs", "md logs"),
            ("Write-Host \"hello\"", "echo hello"),
            ("$env:USERNAME", "echo %USERNAME%"),
            ("Get-Process -Name chrome", "tasklist /fi \"imagename eq chrome.exe\""),
        ];
        for (input, expected) in cases {
            let result = converter.convert(input, Direction::PowerShellToCmd);
            assert_eq!(result.output, expected, "input: {input}");
        }
    }

    #[test]
    fn test_cmd_scenarios() {
        let converter = converter();
        let cases = [
            ("set MODE=release", "$env:MODE = \"release\""),
            ("echo.", "Write-Host \"\""),
            ("ipconfig /flushdns", "Clear-DnsClientCache"),
            ("net stop spooler", "Stop-Service -Name \"spooler\""),
            ("ping google.com -n 4", "Test-Connection -ComputerName \"google.com\" -Count 4"),
            ("type log.txt | find \"error\"", "Select-String -Path \"log.txt\" -Pattern \"error\""),
            ("cd", "Get-Location"),
            ("taskkill /pid 1234 /f", "Stop-Process -Id 1234 -Force"),
        ];
        for (input, expected) in cases {
            let result = converter.convert(input, Direction::CmdToPowerShell);
            assert_eq!(result.output, expected, "input: {input}");
        }
    }

    #[test]
    fn test_unknown_switch_keeps_arguments() {
        let result = converter().convert("del /z old.txt", Direction::CmdToPowerShell);
        assert_eq!(result.output, "Remove-Item -Path \"old.txt\" # unknown parameter: /z");
    }

    #[test]
    fn test_examples_convert_as_documented() {
        let converter = converter();
        let store = converter.translator().store().clone();
        for example in store.examples() {
            let result = converter.convert(example.cmd, Direction::CmdToPowerShell);
            assert_eq!(result.output, example.powershell, "example: {}", example.cmd);
        }
    }
}

#[cfg(test)]
mod history_tests {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use psconvert::history::MAX_HISTORY;
    use psconvert::{
        ConversionService, Converter, Dialect, Direction, HistoryRecorder, JsonFileStore, KvStore, LocalStrategy,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    struct FailingStore;

    /// Store that never answers.
    struct StalledStore;

    #[async_trait]
    impl KvStore for StalledStore {
        async fn save(&self, _key: &str, _value: Value) -> Result<()> {
            std::future::pending().await
        }

        async fn load(&self, _key: &str) -> Result<Option<Value>> {
            std::future::pending().await
        }

        async fn clear(&self, _key: &str) -> Result<()> {
            std::future::pending().await
        }
    }

    #[async_trait]
    impl KvStore for FailingStore {
        async fn save(&self, _key: &str, _value: Value) -> Result<()> {
            bail!("disk full")
        }

        async fn load(&self, _key: &str) -> Result<Option<Value>> {
            bail!("disk gone")
        }

        async fn clear(&self, _key: &str) -> Result<()> {
            bail!("read-only")
        }
    }

    #[tokio::test]
    async fn test_failing_store_does_not_break_record() {
        let history = HistoryRecorder::with_store(Arc::new(FailingStore));
        history.record("dir", "Get-ChildItem", Dialect::Cmd).await;
        assert_eq!(history.len().await, 1);
        assert_eq!(history.load().await, 0);
        assert_eq!(history.len().await, 1);
        history.clear().await;
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_convert_completes_with_stalled_store() {
        let local = LocalStrategy::new(Converter::with_builtin_mappings().unwrap().translator().clone());
        let history =
            HistoryRecorder::with_store(Arc::new(StalledStore)).with_timeout(Duration::from_millis(50));
        let service = ConversionService::new(Arc::new(local), Arc::new(history));

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            service.convert("dir", Direction::CmdToPowerShell),
        )
        .await
        .unwrap();
        assert_eq!(result.output, "Get-ChildItem");

        let history = service.history();
        tokio::time::timeout(Duration::from_secs(2), async {
            assert_eq!(history.load().await, 0);
            assert_eq!(history.len().await, 1);
            history.clear().await;
        })
        .await
        .unwrap();
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let dir = tempdir().unwrap();
        {
            let store = Arc::new(JsonFileStore::new(dir.path()).unwrap());
            let history = HistoryRecorder::with_store(store);
            for i in 0..(MAX_HISTORY + 5) {
                history.record(&format!("cmd{i}"), "out", Dialect::Cmd).await;
            }
        }

        assert!(dir.path().join("history.json").exists());
        let history = HistoryRecorder::with_store(Arc::new(JsonFileStore::new(dir.path()).unwrap()));
        assert_eq!(history.load().await, MAX_HISTORY);
        let entries = history.list().await;
        assert_eq!(entries[0].input, format!("cmd{}", MAX_HISTORY + 4));
        assert_eq!(entries.last().unwrap().input, "cmd5");
    }

    #[tokio::test]
    async fn test_corrupt_history_file_is_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("history.json"), "{ not json").unwrap();
        let history = HistoryRecorder::with_store(Arc::new(JsonFileStore::new(dir.path()).unwrap()));
        assert_eq!(history.load().await, 0);
        history.record("cls", "Clear-Host", Dialect::Cmd).await;
        assert_eq!(history.len().await, 1);
    }
}

#[cfg(test)]
mod storage_tests {
    use psconvert::{HistoryRecorder, JsonFileStore, KvStore, SettingsStore};
    use psconvert::Dialect;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_export_includes_history_and_import_restores_it() {
        let source_dir = tempdir().unwrap();
        let source: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(source_dir.path()).unwrap());
        let history = HistoryRecorder::with_store(Arc::clone(&source));
        history.record("dir", "Get-ChildItem", Dialect::Cmd).await;
        let settings = SettingsStore::new(Arc::clone(&source));
        settings.save_setting("default_direction", &"auto").await.unwrap();

        let bundle = settings.export_data().await.unwrap();
        assert_eq!(bundle.data.history.len(), 1);
        assert_eq!(bundle.data.settings.len(), 1);

        let target_dir = tempdir().unwrap();
        let target: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(target_dir.path()).unwrap());
        SettingsStore::new(Arc::clone(&target)).import_data(&bundle).await.unwrap();

        let restored = HistoryRecorder::with_store(target);
        assert_eq!(restored.load().await, 1);
        assert_eq!(restored.list().await[0].output, "Get-ChildItem");
    }

    #[tokio::test]
    async fn test_clear_all() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(dir.path()).unwrap());
        let settings = SettingsStore::new(Arc::clone(&store));
        settings.save_setting("x", &1).await.unwrap();
        settings.clear_all().await.unwrap();
        assert_eq!(settings.load_setting("x", 0).await, 0);
    }
}

#[cfg(test)]
mod lookup_tests {
    use async_trait::async_trait;
    use psconvert::config::Config;
    use psconvert::{
        ConversionService, Dialect, Direction, LookupCoordinator, LookupError, LookupResponse, RemoteLookup,
        SourceKind,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Remote that answers after `delay` and counts calls.
    struct SlowRemote {
        delay: Duration,
        calls: AtomicUsize,
    }

    impl SlowRemote {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RemoteLookup for SlowRemote {
        async fn lookup(&self, command: &str, _source: Dialect) -> Result<LookupResponse, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(LookupResponse {
                found: command == "robocopy",
                target: Some("Copy-Item -Recurse".to_string()),
                description: Some("Robust file copy".to_string()),
                documentation_links: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_call() {
        let remote = SlowRemote::new(Duration::from_millis(50));
        let coordinator = Arc::new(LookupCoordinator::new(remote.clone(), Duration::from_secs(5), 16));
        let cancel = CancellationToken::new();

        let (a, b, c) = tokio::join!(
            coordinator.lookup("robocopy a b", Dialect::Cmd, &cancel),
            coordinator.lookup("ROBOCOPY", Dialect::Cmd, &cancel),
            coordinator.lookup("robocopy /mir", Dialect::Cmd, &cancel),
        );

        assert!(a.unwrap().found);
        assert!(b.unwrap().found);
        assert!(c.unwrap().found);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.cache_stats().coalesced, 2);
        assert_eq!(coordinator.pending_count(), 0);

        coordinator.lookup("robocopy", Dialect::Cmd, &cancel).await.unwrap();
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_dialects_are_separate_keys() {
        let remote = SlowRemote::new(Duration::from_millis(1));
        let coordinator = LookupCoordinator::new(remote.clone(), Duration::from_secs(5), 16);
        let cancel = CancellationToken::new();
        coordinator.lookup("robocopy", Dialect::Cmd, &cancel).await.unwrap();
        coordinator.lookup("robocopy", Dialect::PowerShell, &cancel).await.unwrap();
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_remote_times_out() {
        let remote = SlowRemote::new(Duration::from_secs(10));
        let coordinator = LookupCoordinator::new(remote, Duration::from_millis(20), 16);
        let result = coordinator.lookup("robocopy", Dialect::Cmd, &CancellationToken::new()).await;
        assert!(matches!(result, Err(LookupError::Timeout(_))));
        assert_eq!(coordinator.pending_count(), 0);
        assert_eq!(coordinator.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_cancelled_lookup() {
        let remote = SlowRemote::new(Duration::from_secs(10));
        let coordinator = LookupCoordinator::new(remote, Duration::from_secs(5), 16);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = coordinator.lookup("robocopy", Dialect::Cmd, &cancel).await;
        assert!(matches!(result, Err(LookupError::Cancelled)));
    }

    #[tokio::test]
    async fn test_aborted_leader_releases_pending_entry() {
        let remote = SlowRemote::new(Duration::from_secs(10));
        let coordinator = Arc::new(LookupCoordinator::new(remote, Duration::from_secs(5), 16));

        let leader = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator.lookup("robocopy", Dialect::Cmd, &CancellationToken::new()).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(coordinator.pending_count(), 1);

        let follower = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator.lookup("robocopy", Dialect::Cmd, &CancellationToken::new()).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        leader.abort();
        let _ = leader.await;
        assert_eq!(coordinator.pending_count(), 0);
        assert!(matches!(follower.await.unwrap(), Err(LookupError::Abandoned)));
    }

    fn lookup_config(timeout_ms: u64) -> Config {
        let mut config = Config::default();
        config.lookup.enabled = true;
        config.lookup.timeout_ms = timeout_ms;
        config.storage.persist = false;
        config
    }

    #[tokio::test]
    async fn test_service_uses_remote_answer() {
        let remote = SlowRemote::new(Duration::from_millis(1));
        let service = ConversionService::from_config_with_remote(&lookup_config(1000), remote).unwrap();

        let result = service.convert("robocopy src dst", Direction::CmdToPowerShell).await;
        assert_eq!(result.kind, SourceKind::Remote);
        assert_eq!(result.output, "Copy-Item -Recurse");
        assert_eq!(service.history().len().await, 1);

        // Known commands never reach the remote
        let result = service.convert("dir", Direction::CmdToPowerShell).await;
        assert_eq!(result.kind, SourceKind::LocalExact);
    }

    #[tokio::test]
    async fn test_service_timeout_degrades_to_local_fallback() {
        let remote = SlowRemote::new(Duration::from_secs(10));
        let service = ConversionService::from_config_with_remote(&lookup_config(20), remote).unwrap();

        let result = service.convert("robocopy src dst", Direction::CmdToPowerShell).await;
        assert_eq!(result.kind, SourceKind::FallbackUnknown);
        assert!(result.output.starts_with("# No direct PowerShell equivalent found for:"));
        assert!(service.history().is_empty().await);
    }

    #[tokio::test]
    async fn test_service_shutdown_cancels_lookups() {
        let remote = SlowRemote::new(Duration::from_secs(10));
        let service = ConversionService::from_config_with_remote(&lookup_config(5000), remote).unwrap();
        service.shutdown();

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            service.convert("robocopy", Direction::CmdToPowerShell),
        )
        .await
        .unwrap();
        assert_eq!(result.kind, SourceKind::FallbackUnknown);
    }

    #[tokio::test]
    async fn test_default_lookup_adds_documentation_links() {
        let service = ConversionService::from_config(&lookup_config(1000)).unwrap();
        let result = service.convert("robocopy", Direction::CmdToPowerShell).await;
        assert_eq!(result.kind, SourceKind::FallbackUnknown);
        assert!(result.suggestions.iter().any(|s| s.contains("learn.microsoft.com")));
    }
}
