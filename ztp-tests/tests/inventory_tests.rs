//! Registry semantics through the service facade

use std::collections::HashSet;
use tempfile::TempDir;
use ztp_daemon::envelope::{Operation, Status};
use ztp_daemon::{HostMap, ZtpError};
use ztp_tests::{TestHostBuilder, TestSettingsBuilder, TestZtpHarness};

async fn empty_harness(temp_dir: &TempDir) -> TestZtpHarness {
    let core = TestSettingsBuilder::new(temp_dir.path()).build();
    TestZtpHarness::new(core, HostMap::new(), temp_dir.path())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_read_all_is_insertion_order_independent() {
    for order in [["10.0.0.5", "10.0.0.6"], ["10.0.0.6", "10.0.0.5"]] {
        let temp_dir = TempDir::new().unwrap();
        let harness = empty_harness(&temp_dir).await;
        for (i, ip) in order.iter().enumerate() {
            harness
                .service()
                .create_host(TestHostBuilder::new(ip, &format!("sw{}", i)).build())
                .await
                .unwrap();
        }

        let keys: HashSet<String> = harness.service().read_hosts().await.unwrap().into_iter().collect();
        assert_eq!(
            keys,
            HashSet::from(["10.0.0.5".to_string(), "10.0.0.6".to_string()])
        );
        harness.shutdown().await;
    }
}

#[tokio::test]
async fn test_create_twice_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;
    let service = harness.service();

    service
        .create_host(TestHostBuilder::new("10.0.0.5", "sw1").build())
        .await
        .unwrap();
    service
        .create_host(
            TestHostBuilder::new("10.0.0.5", "sw1b")
                .with_ethernet("aa:aa:aa:aa:aa:aa")
                .build(),
        )
        .await
        .unwrap();

    let host = service.read_host("10.0.0.5").await.unwrap();
    assert_eq!(host.hostname, "sw1b");
    assert_eq!(host.ethernet, "aa:aa:aa:aa:aa:aa");
    harness.shutdown().await;
}

#[tokio::test]
async fn test_delete_present_and_absent() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;
    let inventory = harness.service().inventory();

    assert!(matches!(
        inventory.delete("10.0.0.5").await,
        Err(ZtpError::HostNotFound(_))
    ));
    inventory
        .create(TestHostBuilder::new("10.0.0.5", "sw1").build())
        .await
        .unwrap();
    inventory.delete("10.0.0.5").await.unwrap();
    assert!(matches!(
        inventory.read_one("10.0.0.5").await,
        Err(ZtpError::HostNotFound(_))
    ));
    harness.shutdown().await;
}

#[tokio::test]
async fn test_update_moves_or_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;
    let service = harness.service();
    service
        .create_host(TestHostBuilder::new("10.0.0.5", "sw1").build())
        .await
        .unwrap();

    service
        .update_host("10.0.0.5", TestHostBuilder::new("10.0.0.9", "sw1").build())
        .await
        .unwrap();
    assert!(service.read_host("10.0.0.5").await.is_err());
    assert_eq!(service.read_host("10.0.0.9").await.unwrap().hostname, "sw1");

    service
        .update_host("10.0.0.9", TestHostBuilder::new("10.0.0.9", "core1").build())
        .await
        .unwrap();
    assert_eq!(service.read_hosts().await.unwrap(), vec!["10.0.0.9"]);
    assert_eq!(service.read_host("10.0.0.9").await.unwrap().hostname, "core1");
    harness.shutdown().await;
}

#[tokio::test]
async fn test_update_lowercases_vendor() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;

    let updated = harness
        .service()
        .update_host(
            "10.0.0.5",
            TestHostBuilder::new("10.0.0.5", "sw1").with_vendor("Junos").build(),
        )
        .await
        .unwrap();
    assert_eq!(updated.vendor, "junos");
    harness.shutdown().await;
}

#[tokio::test]
async fn test_lock_freezes_registry_until_unlock() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;
    let service = harness.service();
    service
        .create_host(TestHostBuilder::new("10.0.0.5", "sw1").build())
        .await
        .unwrap();
    let before = service.serialize_hosts().await.unwrap();

    service.lock().await.unwrap();
    let attempts = [
        Status::of(&service.create_host(TestHostBuilder::new("10.0.0.6", "sw2").build()).await),
        Status::of(&service.read_host("10.0.0.5").await),
        Status::of(
            &service
                .update_host("10.0.0.5", TestHostBuilder::new("10.0.0.7", "sw3").build())
                .await,
        ),
        Status::of(&service.inventory().delete("10.0.0.5").await),
    ];
    assert!(attempts.iter().all(|status| *status == Status::Locked));
    assert!(matches!(
        service.serialize_hosts().await,
        Err(ZtpError::Locked(Operation::Serialize))
    ));

    service.unlock().await.unwrap();
    assert_eq!(service.serialize_hosts().await.unwrap(), before);

    service
        .create_host(TestHostBuilder::new("10.0.0.6", "sw2").build())
        .await
        .unwrap();
    assert_eq!(service.read_hosts().await.unwrap().len(), 2);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_serialize_decodes_to_same_keys() {
    let temp_dir = TempDir::new().unwrap();
    let harness = empty_harness(&temp_dir).await;
    let service = harness.service();

    let empty: HostMap = serde_yaml::from_str(&service.serialize_hosts().await.unwrap()).unwrap();
    assert!(empty.is_empty());

    for (ip, name) in [("10.0.0.5", "sw1"), ("10.0.0.6", "sw2"), ("10.0.0.7", "sw3")] {
        service
            .create_host(TestHostBuilder::new(ip, name).build())
            .await
            .unwrap();
    }
    let decoded: HostMap = serde_yaml::from_str(&service.serialize_hosts().await.unwrap()).unwrap();
    let mut keys: Vec<String> = decoded.keys().cloned().collect();
    let mut expected = service.read_hosts().await.unwrap();
    keys.sort();
    expected.sort();
    assert_eq!(keys, expected);
    harness.shutdown().await;
}
