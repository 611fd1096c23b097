//! Integration tests for Syncstore

use proptest::prelude::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use syncstore::runtime::Component;
use syncstore::{create_store, use_store, Listener, SetStateAction, Store};

#[test]
fn store_integration() {
    let store = create_store(0);
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_clone = log.clone();
    store.subscribe(move || log_clone.lock().unwrap().push('a'));

    store.set_value(5);
    assert_eq!(store.get_value(), 5);
    assert_eq!(*log.lock().unwrap(), vec!['a']);
}

#[test]
fn store_subscription() {
    let store = Store::new(0);
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let unsubscribe = store.subscribe(move || {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(counter.load(Ordering::SeqCst), 0);

    store.update(|n| *n += 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    unsubscribe.unsubscribe();
    store.update(|n| *n += 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(store.get_value(), 2);
}

#[test]
fn guard_subscription() {
    let store = Store::new(0);
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let guard = store
        .subscribe(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        })
        .into_guard();

    store.set_value(1);
    drop(guard);
    store.set_value(2);

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn same_listener_subscribed_twice() {
    let store = Store::new(0);
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    let listener = Listener::new(move || {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    store.subscribe(listener.clone());
    store.subscribe(listener);
    store.set_value(1);

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn hook_updater_form() {
    let store = create_store(1);
    let (_, set_value) = use_store(&store);

    set_value.set(SetStateAction::update(|x: i32| x + 1));
    assert_eq!(store.get_value(), 2);
}

#[test]
fn hook_literal_form() {
    let store = create_store(1);
    let (_, set_value) = use_store(&store);

    set_value.set(5);
    assert_eq!(store.get_value(), 5);
}

#[test]
fn component_counter() {
    let count = Store::builder(0).label("count").build();
    let renders = Arc::new(AtomicUsize::new(0));

    let component = Component::mount({
        let count = count.clone();
        let renders = renders.clone();
        move || {
            renders.fetch_add(1, Ordering::SeqCst);
            let (value, set_value) = use_store(&count);
            (format!("count: {}", value), set_value)
        }
    });

    assert_eq!(component.output().0, "count: 0");

    let set_value = component.output().1;
    set_value.update(|n| n + 1);
    set_value.update(|n| n + 1);
    assert!(component.flush());
    assert!(!component.flush());

    assert_eq!(component.output().0, "count: 2");
    assert_eq!(renders.load(Ordering::SeqCst), 2);
}

#[test]
fn components_share_a_store() {
    let store = Store::new(10);
    let mount = || {
        Component::mount({
            let store = store.clone();
            move || use_store(&store).0
        })
    };
    let first = mount();
    let second = mount();
    assert_eq!(store.listener_count(), 2);

    store.set_value(11);
    first.flush();
    second.flush();
    assert_eq!(first.output(), 11);
    assert_eq!(second.output(), 11);

    drop(first);
    assert_eq!(store.listener_count(), 1);
}

proptest! {
    #[test]
    fn last_write_wins(initial in any::<i64>(), writes in proptest::collection::vec(any::<i64>(), 0..32)) {
        let store = Store::new(initial);
        for value in &writes {
            store.set_value(*value);
        }
        let expected = writes.last().copied().unwrap_or(initial);
        prop_assert_eq!(store.get_value(), expected);
        prop_assert_eq!(store.version(), writes.len() as u64);
    }

    #[test]
    fn each_listener_runs_once_in_order(count in 0usize..16, removed in proptest::collection::vec(any::<bool>(), 16)) {
        let store = Store::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..count)
            .map(|i| {
                let log = log.clone();
                store.subscribe(move || log.lock().unwrap().push(i))
            })
            .collect();
        for (handle, remove) in handles.iter().zip(&removed) {
            if *remove {
                handle.unsubscribe();
            }
        }

        store.set_value(1);
        let expected: Vec<usize> = (0..count).filter(|i| !removed[*i]).collect();
        let logged = log.lock().unwrap().clone();
        prop_assert_eq!(logged, expected);
    }
}
