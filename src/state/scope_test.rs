use std::time::Duration;

use super::*;

#[test]
fn new_scope_is_mounted() {
    assert!(ViewScope::new().is_mounted());
}

#[test]
fn clones_share_mount_state() {
    let scope = ViewScope::new();
    let clone = scope.clone();
    clone.unmount();
    assert!(!scope.is_mounted());
}

#[tokio::test]
async fn guard_passes_output_while_mounted() {
    let scope = ViewScope::new();
    assert_eq!(scope.guard(async { 7 }).await, Some(7));
}

#[tokio::test(start_paused = true)]
async fn guard_drops_output_when_unmounted_mid_flight() {
    let scope = ViewScope::new();
    let handle = {
        let scope = scope.clone();
        tokio::spawn(async move {
            scope
                .guard(async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    "late"
                })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    scope.unmount();

    assert_eq!(handle.await.unwrap(), None);
}
