use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use eventcore::{Event, EventDispatcher, EventPriority};

#[derive(Debug, Clone)]
struct Ping;
impl Event for Ping {}

#[derive(Debug, Clone)]
struct Pong;
impl Event for Pong {}

struct Counter {
    pings: AtomicU32,
    pongs: AtomicU32,
}

impl Counter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            pings: AtomicU32::new(0),
            pongs: AtomicU32::new(0),
        })
    }

    fn on_ping(&self, _event: &Ping) {
        self.pings.fetch_add(1, Ordering::Relaxed);
    }

    fn on_pong(&self, _event: &Pong) {
        self.pongs.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_unsubscribe_removes_only_matching_owner() {
    let dispatcher = EventDispatcher::new();
    let leaving = Counter::new();
    let staying = Counter::new();
    dispatcher.subscribe(&leaving, Counter::on_ping);
    dispatcher.subscribe(&staying, Counter::on_ping);

    let removed = dispatcher.unsubscribe::<Ping, _>(&leaving);
    assert_eq!(removed, 1);

    dispatcher.dispatch(&Ping);
    assert_eq!(leaving.pings.load(Ordering::Relaxed), 0);
    assert_eq!(staying.pings.load(Ordering::Relaxed), 1);
}

#[test]
fn test_unsubscribe_removes_all_subscriptions_of_owner_for_type() {
    let dispatcher = EventDispatcher::new();
    let owner = Counter::new();
    // Matching is by owner identity alone: both subscriptions to Ping go
    dispatcher.subscribe(&owner, Counter::on_ping);
    dispatcher.subscribe_with_priority(&owner, Counter::on_ping, EventPriority::High);
    assert_eq!(dispatcher.listener_count::<Ping>(), 2);

    let removed = dispatcher.unsubscribe::<Ping, _>(&owner);
    assert_eq!(removed, 2);
    assert_eq!(dispatcher.listener_count::<Ping>(), 0);
    assert_eq!(dispatcher.total_listener_count(), 0);
}

#[test]
fn test_unsubscribe_leaves_other_event_types_untouched() {
    let dispatcher = EventDispatcher::new();
    let owner = Counter::new();
    dispatcher.subscribe(&owner, Counter::on_ping);
    dispatcher.subscribe(&owner, Counter::on_pong);

    dispatcher.unsubscribe::<Ping, _>(&owner);

    dispatcher.dispatch(&Ping);
    dispatcher.dispatch(&Pong);
    assert_eq!(owner.pings.load(Ordering::Relaxed), 0);
    assert_eq!(owner.pongs.load(Ordering::Relaxed), 1);
}

#[test]
fn test_unsubscribe_unknown_owner_returns_zero() {
    let dispatcher = EventDispatcher::new();
    let subscribed = Counter::new();
    let stranger = Counter::new();
    dispatcher.subscribe(&subscribed, Counter::on_ping);

    assert_eq!(dispatcher.unsubscribe::<Ping, _>(&stranger), 0);
    assert_eq!(dispatcher.listener_count::<Ping>(), 1);
}

#[test]
fn test_unsubscribing_last_listener_drops_type_entry() {
    let dispatcher = EventDispatcher::new();
    let owner = Counter::new();
    dispatcher.subscribe(&owner, Counter::on_ping);
    assert_eq!(dispatcher.event_type_count(), 1);

    dispatcher.unsubscribe::<Ping, _>(&owner);
    assert_eq!(dispatcher.event_type_count(), 0);
}
