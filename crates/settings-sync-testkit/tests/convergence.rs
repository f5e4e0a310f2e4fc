//! End-to-end sync between devices sharing one in-memory account service.

use std::sync::Arc;

use chrono::Duration;

use settings_sync::{JobOutcome, SettingsSyncConfig, SettingsSyncJob};
use settings_sync_core::{AutoArchiveInactive, PodcastsSortType, SettingKey, SettingValue};
use settings_sync_protocol::{KeyOutcome, MemoryServer, Protocol};
use settings_sync_testkit::{at, multi_device_fixtures, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_edit_propagates_to_second_device() {
    init_tracing();
    let devices = multi_device_fixtures(2);
    let (phone, tablet) = (&devices[0], &devices[1]);

    phone.advance(Duration::hours(1));
    phone.edit(SettingKey::SkipForward, SettingValue::Seconds(45));
    assert_eq!(phone.job().run().await, JobOutcome::Succeeded);

    let stored = phone.server.setting("skipForward").await.unwrap();
    assert_eq!(stored.value, serde_json::json!(45));
    assert_eq!(stored.modified_at, Some(at("2024-01-01T01:00:00Z")));

    let report = tablet.session().run().await.unwrap();
    assert_eq!(report.outcome("skipForward"), Some(KeyOutcome::Adopted));
    assert_eq!(tablet.value(SettingKey::SkipForward), SettingValue::Seconds(45));
    assert!(!tablet.needs_sync(SettingKey::SkipForward));
}

#[tokio::test]
async fn test_later_edit_wins_regardless_of_sync_order() {
    init_tracing();
    for phone_first in [true, false] {
        let devices = multi_device_fixtures(2);
        let (phone, tablet) = (&devices[0], &devices[1]);

        phone.advance(Duration::hours(3));
        phone.edit(SettingKey::SkipBack, SettingValue::Seconds(15));
        tablet.advance(Duration::hours(4));
        tablet.edit(SettingKey::SkipBack, SettingValue::Seconds(25));

        let order = if phone_first {
            [phone, tablet, phone]
        } else {
            [tablet, phone, tablet]
        };
        for device in order {
            device.session().run().await.unwrap();
        }

        assert_eq!(phone.value(SettingKey::SkipBack), SettingValue::Seconds(25));
        assert_eq!(tablet.value(SettingKey::SkipBack), SettingValue::Seconds(25));
    }
}

#[tokio::test]
async fn test_independent_keys_merge() {
    let devices = multi_device_fixtures(2);
    let (phone, tablet) = (&devices[0], &devices[1]);

    phone.advance(Duration::minutes(5));
    phone.edit(
        SettingKey::PodcastsSortOrder,
        SettingValue::PodcastsSort(PodcastsSortType::DragAndDrop),
    );
    tablet.advance(Duration::minutes(10));
    tablet.edit(
        SettingKey::AutoArchiveInactive,
        SettingValue::AutoArchiveInactive(AutoArchiveInactive::Weeks2),
    );

    phone.session().run().await.unwrap();
    tablet.session().run().await.unwrap();
    phone.session().run().await.unwrap();

    for device in [phone, tablet] {
        assert_eq!(
            device.value(SettingKey::PodcastsSortOrder),
            SettingValue::PodcastsSort(PodcastsSortType::DragAndDrop)
        );
        assert_eq!(
            device.value(SettingKey::AutoArchiveInactive),
            SettingValue::AutoArchiveInactive(AutoArchiveInactive::Weeks2)
        );
    }
}

#[tokio::test]
async fn test_fresh_install_takes_server_state() {
    let fixture = TestFixture::new();
    fixture
        .server
        .seed("autoArchivePlayed", 4, Some(at("2023-05-01T00:00:00Z")))
        .await;
    fixture.server.seed("marketingOptIn", true, None).await;

    let report = fixture.session().run().await.unwrap();

    assert_eq!(report.protocol, Protocol::Current);
    assert_eq!(report.sent_count, SettingKey::all().count());
    assert_eq!(report.outcome("autoArchivePlayed"), Some(KeyOutcome::Adopted));
    assert_eq!(
        report.outcome("marketingOptIn"),
        Some(KeyOutcome::SkippedNoTimestamp)
    );
    assert_eq!(
        fixture.value(SettingKey::AutoArchiveAfterPlaying),
        SettingValue::AutoArchiveAfterPlaying(settings_sync_core::AutoArchiveAfterPlaying::Weeks1)
    );
    assert_eq!(fixture.value(SettingKey::MarketingOptIn), SettingValue::Flag(false));
}

#[tokio::test]
async fn test_legacy_device_applies_changed_values() {
    init_tracing();
    let fixture = TestFixture::legacy();
    fixture.server.seed_legacy("skipForward", 20).await;
    fixture.edit(SettingKey::SkipBack, SettingValue::Seconds(12));

    assert_eq!(fixture.job().run().await, JobOutcome::Succeeded);

    assert_eq!(fixture.value(SettingKey::SkipForward), SettingValue::Seconds(20));
    assert!(!fixture.needs_sync(SettingKey::SkipForward));
    assert_eq!(fixture.value(SettingKey::SkipBack), SettingValue::Seconds(12));
    assert_eq!(
        fixture.server.legacy_value("skipBack").await,
        Some(serde_json::json!(12))
    );
    assert!(fixture.server.change_requests().await.is_empty());
}

#[tokio::test]
async fn test_flag_flip_switches_endpoint() {
    let fixture = TestFixture::legacy();
    let job = fixture.job();

    assert_eq!(job.run().await, JobOutcome::Succeeded);
    fixture.flag.set_enabled(true);
    assert_eq!(job.run().await, JobOutcome::Succeeded);

    assert_eq!(fixture.server.legacy_requests().await.len(), 1);
    assert_eq!(fixture.server.change_requests().await.len(), 1);
}

#[tokio::test]
async fn test_transport_failure_fails_only_that_attempt() {
    let fixture = TestFixture::new();
    fixture.edit(SettingKey::MarketingOptIn, SettingValue::Flag(true));
    fixture.server.fail_next("connection reset").await;

    let job = fixture.job();
    assert_eq!(job.run().await, JobOutcome::Failed);
    assert!(fixture.needs_sync(SettingKey::MarketingOptIn));

    assert_eq!(job.run().await, JobOutcome::Succeeded);
    let stored = fixture.server.setting("marketingOptIn").await.unwrap();
    assert_eq!(stored.value, serde_json::json!(true));
}

#[tokio::test]
async fn test_disabled_without_fallback_sends_nothing() {
    let server = Arc::new(MemoryServer::new());
    let config = SettingsSyncConfig {
        settings_sync_enabled: false,
        legacy_fallback: false,
    };
    let fixture = TestFixture::with_server(Arc::clone(&server), false);
    let job = SettingsSyncJob::new(
        Arc::clone(&fixture.store),
        server,
        config.flag(),
        &config,
    );

    let report = job.try_run().await.unwrap();
    assert_eq!(report.protocol, Protocol::Disabled);
    assert!(fixture.server.change_requests().await.is_empty());
    assert!(fixture.server.legacy_requests().await.is_empty());
}
