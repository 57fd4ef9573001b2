use super::*;
use std::collections::HashSet;

fn host(ip: &str, name: &str) -> HostRecord {
    HostRecord::new(ip, "00:11:22:33:44:55", name, "junos")
}

fn spawn_inventory(seed: HostMap) -> (InventoryHandle, ShutdownTx, tokio::task::JoinHandle<()>) {
    let (handle, actor, shutdown) = create_inventory_actor(seed, Duration::from_secs(5));
    let task = tokio::spawn(actor.run());
    (handle, shutdown, task)
}

#[tokio::test]
async fn test_create_then_read_one() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    let stored = inventory.create(host("10.0.0.5", "sw1")).await.unwrap();
    assert_eq!(stored.hostname, "sw1");
    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap(), stored);
}

#[tokio::test]
async fn test_create_overwrites_same_ip() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();
    inventory.create(host("10.0.0.5", "sw1-new")).await.unwrap();

    assert_eq!(inventory.read_all().await.unwrap(), vec!["10.0.0.5"]);
    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap().hostname, "sw1-new");
}

#[tokio::test]
async fn test_create_without_fixed_ip_is_rejected() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    let err = inventory.create(host("", "sw1")).await.unwrap_err();
    assert!(matches!(err, ZtpError::InvalidHost(_)));
    assert!(inventory.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_blank_hostname_is_rejected() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    let err = inventory.create(host("10.0.0.9", "")).await.unwrap_err();
    assert!(matches!(err, ZtpError::InvalidHost(_)));
    assert!(inventory.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_to_escaping_hostname_keeps_previous_record() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();

    let err = inventory
        .update("10.0.0.5", host("10.0.0.5", "../escaped"))
        .await
        .unwrap_err();
    assert!(matches!(err, ZtpError::InvalidHost(_)));
    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap().hostname, "sw1");
}

#[tokio::test]
async fn test_read_all_returns_every_key() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    for (ip, name) in [("10.0.0.7", "sw3"), ("10.0.0.5", "sw1"), ("10.0.0.6", "sw2")] {
        inventory.create(host(ip, name)).await.unwrap();
    }
    let keys: HashSet<String> = inventory.read_all().await.unwrap().into_iter().collect();
    let expected: HashSet<String> = ["10.0.0.5", "10.0.0.6", "10.0.0.7"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_read_one_missing_is_not_found() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    assert!(matches!(
        inventory.read_one("10.0.0.99").await,
        Err(ZtpError::HostNotFound(ip)) if ip == "10.0.0.99"
    ));
}

#[tokio::test]
async fn test_update_moves_key() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();

    let moved = inventory
        .update("10.0.0.5", host("10.0.0.9", "sw1"))
        .await
        .unwrap();
    assert_eq!(moved.fixed_ip, "10.0.0.9");
    assert!(inventory.read_one("10.0.0.5").await.is_err());
    assert_eq!(inventory.read_one("10.0.0.9").await.unwrap().hostname, "sw1");
}

#[tokio::test]
async fn test_update_same_key_overwrites() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();

    inventory
        .update("10.0.0.5", host("10.0.0.5", "core1"))
        .await
        .unwrap();
    assert_eq!(inventory.read_all().await.unwrap(), vec!["10.0.0.5"]);
    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap().hostname, "core1");
}

#[tokio::test]
async fn test_update_unknown_previous_ip_inserts() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    inventory
        .update("10.0.0.1", host("10.0.0.5", "sw1"))
        .await
        .unwrap();
    assert_eq!(inventory.read_all().await.unwrap(), vec!["10.0.0.5"]);
}

#[tokio::test]
async fn test_update_with_empty_ip_keeps_previous_record() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();

    let err = inventory.update("10.0.0.5", host("", "sw1")).await.unwrap_err();
    assert!(matches!(err, ZtpError::InvalidHost(_)));
    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap().hostname, "sw1");
}

#[tokio::test]
async fn test_delete() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();

    inventory.delete("10.0.0.5").await.unwrap();
    assert!(inventory.read_all().await.unwrap().is_empty());
    // A second delete finds nothing
    assert!(matches!(
        inventory.delete("10.0.0.5").await,
        Err(ZtpError::HostNotFound(_))
    ));
}

#[tokio::test]
async fn test_serialize_empty_and_populated() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());

    let empty: HostMap = serde_yaml::from_str(&inventory.serialize().await.unwrap()).unwrap();
    assert!(empty.is_empty());

    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();
    inventory.create(host("10.0.0.6", "sw2")).await.unwrap();
    let decoded: HostMap = serde_yaml::from_str(&inventory.serialize().await.unwrap()).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded["10.0.0.6"].hostname, "sw2");
}

#[tokio::test]
async fn test_lock_rejects_until_unlock() {
    let (inventory, _shutdown, _task) = spawn_inventory(HostMap::new());
    inventory.create(host("10.0.0.5", "sw1")).await.unwrap();
    inventory.lock().await.unwrap();

    assert!(matches!(
        inventory.create(host("10.0.0.6", "sw2")).await,
        Err(ZtpError::Locked(Operation::Create))
    ));
    assert!(matches!(
        inventory.delete("10.0.0.5").await,
        Err(ZtpError::Locked(Operation::Delete))
    ));
    assert!(matches!(
        inventory.read_all().await,
        Err(ZtpError::Locked(Operation::ReadAll))
    ));
    // Locking twice is fine
    inventory.lock().await.unwrap();

    // Snapshot still sees the frozen state
    let frozen = inventory.snapshot().await.unwrap();
    assert_eq!(frozen.keys().collect::<Vec<_>>(), vec!["10.0.0.5"]);

    inventory.unlock().await.unwrap();
    inventory.create(host("10.0.0.6", "sw2")).await.unwrap();
    assert_eq!(inventory.read_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_seeded_hosts_are_visible() {
    let mut seed = HostMap::new();
    seed.insert("10.0.0.5".into(), host("10.0.0.5", "sw1"));
    let (inventory, _shutdown, _task) = spawn_inventory(seed);

    assert_eq!(inventory.read_one("10.0.0.5").await.unwrap().hostname, "sw1");
}

#[tokio::test]
async fn test_shutdown_stops_actor() {
    let (inventory, shutdown, task) = spawn_inventory(HostMap::new());

    shutdown.send(()).await.unwrap();
    task.await.unwrap();

    assert!(matches!(
        inventory.read_all().await,
        Err(ZtpError::Internal(_))
    ));
}

#[tokio::test]
async fn test_request_times_out_when_actor_is_not_running() {
    let (inventory, _actor, _shutdown) =
        create_inventory_actor(HostMap::new(), Duration::from_millis(50));

    // Actor is never spawned, so the reply never arrives
    assert!(matches!(
        inventory.read_all().await,
        Err(ZtpError::Timeout { operation: Operation::ReadAll, .. })
    ));
}
