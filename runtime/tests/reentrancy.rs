//! Integration tests for dispatching and subscribing from inside listeners
//!
//! Nested dispatches are queued and drained after the current notification
//! pass, in FIFO order.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use unistate_core::{Action, from_fn};
use unistate_runtime::{Store, StoreConfig, StoreError, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Push(u32),
    Fail,
}

impl Action for Step {
    fn kind(&self) -> &'static str {
        match self {
            Self::Push(_) => "PUSH",
            Self::Fail => "FAIL",
        }
    }
}

type Trail = Vec<u32>;

fn trail_store(config: StoreConfig) -> Arc<Store<impl unistate_core::Reducer<State = Trail, Action = Step> + Send + Sync + 'static>> {
    Arc::new(Store::with_config(
        from_fn(Vec::new(), |trail: &Trail, step: &Step| match step {
            Step::Push(n) => {
                let mut next = trail.clone();
                next.push(*n);
                Some(next)
            },
            Step::Fail => None,
        }),
        None,
        config,
    ))
}

#[test]
fn test_nested_dispatch_is_queued_until_pass_completes() {
    let store = trail_store(StoreConfig::default());
    let seen = Arc::new(Mutex::new(Vec::<(&str, Trail)>::new()));
    let fired = Arc::new(AtomicBool::new(false));

    let weak = Arc::downgrade(&store);
    let log = Arc::clone(&seen);
    let once = Arc::clone(&fired);
    let _first = store.subscribe(move || {
        let store = weak.upgrade().unwrap();
        log.lock().unwrap().push(("first", store.state().to_vec()));
        if !once.swap(true, Ordering::SeqCst) {
            store.dispatch(Step::Push(2)).unwrap();
            // Still the outer state: the nested action has not run yet
            assert_eq!(*store.state(), vec![1]);
            assert!(store.is_dispatching());
        }
    });

    let weak = Arc::downgrade(&store);
    let log = Arc::clone(&seen);
    let _second = store.subscribe(move || {
        let store = weak.upgrade().unwrap();
        log.lock().unwrap().push(("second", store.state().to_vec()));
    });

    store.dispatch(Step::Push(1)).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("first", vec![1]),
            ("second", vec![1]),
            ("first", vec![1, 2]),
            ("second", vec![1, 2]),
        ]
    );
    assert_eq!(*store.state(), vec![1, 2]);
    assert_eq!(store.dispatch_count(), 2);
    assert!(!store.is_dispatching());
}

#[test]
fn test_queued_actions_apply_in_fifo_order() {
    let store = trail_store(StoreConfig::default());
    let weak: Weak<_> = Arc::downgrade(&store);
    let fired = AtomicBool::new(false);

    let _subscription = store.subscribe(move || {
        if fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let store = weak.upgrade().unwrap();
        for n in 10..13 {
            store.dispatch(Step::Push(n)).unwrap();
        }
    });

    store.dispatch(Step::Push(0)).unwrap();

    assert_eq!(*store.state(), vec![0, 10, 11, 12]);
}

#[test]
fn test_failed_queued_action_is_reported_to_outer_caller() {
    let store = trail_store(StoreConfig::default());
    let weak = Arc::downgrade(&store);
    let fired = AtomicBool::new(false);

    let _subscription = store.subscribe(move || {
        if !fired.swap(true, Ordering::SeqCst) {
            let store = weak.upgrade().unwrap();
            store.dispatch(Step::Fail).unwrap();
            store.dispatch(Step::Push(7)).unwrap();
        }
    });

    let error = store.dispatch(Step::Push(1)).unwrap_err();

    match error {
        StoreError::Notification(report) => {
            assert!(report.listener_failures.is_empty());
            assert_eq!(report.queued_failures.len(), 1);
            assert_eq!(report.queued_failures[0].action, "FAIL");
        },
        other => panic!("unexpected error: {other:?}"),
    }
    // The outer action and the queued action after the failure both landed
    assert_eq!(*store.state(), vec![1, 7]);
}

#[test]
fn test_uncaught_listener_panic_discards_queued_actions() {
    let store = trail_store(StoreConfig::default().with_catch_listener_panics(false));
    let nested_ok = Arc::new(OnceLock::new());

    let weak = Arc::downgrade(&store);
    let sink = Arc::clone(&nested_ok);
    let _first = store.subscribe(move || {
        if sink.get().is_none() {
            let store = weak.upgrade().unwrap();
            sink.set(store.dispatch(Step::Push(100)).is_ok()).unwrap();
        }
    });

    let panicked = AtomicBool::new(false);
    let _second = store.subscribe(move || {
        if !panicked.swap(true, Ordering::SeqCst) {
            panic!("render failed");
        }
    });

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.dispatch(Step::Push(1))
    }));

    assert!(outcome.is_err());
    assert_eq!(nested_ok.get(), Some(&true));
    // The outer action committed; the accepted nested action never ran
    assert_eq!(*store.state(), vec![1]);
    assert!(!store.is_dispatching());

    // The queue does not carry the discarded action into the next dispatch
    store.dispatch(Step::Push(2)).unwrap();
    assert_eq!(*store.state(), vec![1, 2]);
}

#[test]
fn test_queue_bound_rejects_overflow() {
    let store = trail_store(StoreConfig::default().with_max_queued_actions(2));
    let weak = Arc::downgrade(&store);
    let fired = AtomicBool::new(false);
    let overflow = Arc::new(Mutex::new(None));
    let overflow_sink = Arc::clone(&overflow);

    let _subscription = store.subscribe(move || {
        if fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let store = weak.upgrade().unwrap();
        store.dispatch(Step::Push(1)).unwrap();
        store.dispatch(Step::Push(2)).unwrap();
        *overflow_sink.lock().unwrap() = Some(store.dispatch(Step::Push(3)));
    });

    store.dispatch(Step::Push(0)).unwrap();

    let overflow = overflow.lock().unwrap().take().unwrap();
    assert!(matches!(overflow, Err(StoreError::QueueFull { capacity: 2 })));
    assert_eq!(*store.state(), vec![0, 1, 2]);
}

#[test]
fn test_unsubscribe_mid_pass_skips_later_listener() {
    let store = trail_store(StoreConfig::default());
    let victim_calls = Arc::new(AtomicUsize::new(0));
    let victim_slot: Arc<OnceLock<Subscription>> = Arc::new(OnceLock::new());

    let slot = Arc::clone(&victim_slot);
    let _killer = store.subscribe(move || {
        if let Some(victim) = slot.get() {
            victim.unsubscribe();
        }
    });

    let calls = Arc::clone(&victim_calls);
    let victim = store.subscribe(move || {
        calls.fetch_add(1, Ordering::SeqCst);
    });
    victim_slot.set(victim).unwrap();

    store.dispatch(Step::Push(1)).unwrap();
    store.dispatch(Step::Push(2)).unwrap();

    assert_eq!(victim_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn test_self_unsubscribe_runs_exactly_once() {
    let store = trail_store(StoreConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let own: Arc<OnceLock<Subscription>> = Arc::new(OnceLock::new());

    let counter = Arc::clone(&calls);
    let slot = Arc::clone(&own);
    let subscription = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(me) = slot.get() {
            me.unsubscribe();
        }
    });
    own.set(subscription).unwrap();

    store.dispatch(Step::Push(1)).unwrap();
    store.dispatch(Step::Push(2)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_subscribe_mid_pass_waits_for_next_pass() {
    let store = trail_store(StoreConfig::default());
    let late_calls = Arc::new(AtomicUsize::new(0));
    let late_handles = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&store);
    let calls = Arc::clone(&late_calls);
    let handles = Arc::clone(&late_handles);
    let added = AtomicBool::new(false);
    let _adder = store.subscribe(move || {
        if added.swap(true, Ordering::SeqCst) {
            return;
        }
        let store = weak.upgrade().unwrap();
        let calls = Arc::clone(&calls);
        let handle = store.subscribe(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        handles.lock().unwrap().push(handle);
    });

    store.dispatch(Step::Push(1)).unwrap();
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    store.dispatch(Step::Push(2)).unwrap();
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}
