//! Contract: fire-and-continue failure policy
//!
//! Remote failures are logged and abandoned, never retried, and never
//! fatal. The cached IP advances optimistically even when the add fails:
//! that is the original updater's documented fragile behavior and these
//! tests pin it down exactly, not a corrected version.

mod common;

use common::*;
use dreamdns_core::{Reconciler, TickOutcome};

#[tokio::test]
async fn failed_add_still_advances_cached_ip() {
    let resolver = ScriptedResolver::new();
    resolver.push_ip("1.2.3.4");
    resolver.push_ip("1.2.3.4");

    let provider = MockProvider::new();
    provider.fail_add("error");

    let (mut reconciler, _events) = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        test_config("home.example.com"),
    )
    .expect("reconciler construction succeeds");

    let outcome = reconciler.tick().await;
    assert!(matches!(outcome, TickOutcome::Applied { add_ok: false, .. }));

    // The cache moved despite the failed add, so the same IP on the next
    // tick is a no-op: the provider stays stale until the IP changes
    // again.
    assert_eq!(reconciler.last_ip(), Some("1.2.3.4"));
    assert_eq!(reconciler.tick().await, TickOutcome::Unchanged);
    assert_eq!(provider.add_calls(), 1);
}

#[tokio::test]
async fn list_failure_skips_removals_but_still_adds() {
    let resolver = ScriptedResolver::new();
    resolver.push_ip("1.2.3.4");

    // Records exist, but the list call fails: the cycle sees an empty set,
    // so no removals happen and the add still runs.
    let provider = MockProvider::with_records(vec![a_record("home.example.com", "9.9.9.9")]);
    provider.fail_list();

    let (mut reconciler, _events) = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        test_config("home.example.com"),
    )
    .expect("reconciler construction succeeds");

    let outcome = reconciler.tick().await;
    assert_eq!(
        outcome,
        TickOutcome::Applied {
            ip: "1.2.3.4".to_string(),
            removed: 0,
            add_ok: true,
        }
    );
    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.remove_calls(), 0);
    assert_eq!(provider.add_calls(), 1);
}

#[tokio::test]
async fn resolver_failure_touches_nothing() {
    let resolver = ScriptedResolver::new();
    resolver.push_failure("dns lookup timed out");
    resolver.push_ip("1.2.3.4");

    let provider = MockProvider::new();

    let (mut reconciler, _events) = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        test_config("home.example.com"),
    )
    .expect("reconciler construction succeeds");

    // Failed resolve: no provider calls, state untouched
    assert_eq!(reconciler.tick().await, TickOutcome::ResolveFailed);
    assert_eq!(provider.list_calls(), 0);
    assert_eq!(provider.add_calls(), 0);
    assert_eq!(reconciler.last_ip(), None);

    // The loop recovers on the next tick
    assert!(matches!(
        reconciler.tick().await,
        TickOutcome::Applied { .. }
    ));
    assert_eq!(reconciler.last_ip(), Some("1.2.3.4"));
}
