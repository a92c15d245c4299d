use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use pictura_request::{
    AnonymousProcessor, CachePolicy, ImageRequest, OpaqueKey, Priority, ProcessorState,
    TransportDescriptor, Url,
};
use serde_json::Value;

fn request() -> ImageRequest {
    ImageRequest::new(Url::parse("http://x/1.png").unwrap())
}

#[test]
fn priority_does_not_back_propagate() {
    let mut r = request();
    r.set_priority(Priority::High);

    let mut c = r.clone();
    c.set_priority(Priority::VeryLow);

    assert_eq!(r.priority(), Priority::High);
    assert_eq!(c.priority(), Priority::VeryLow);
}

#[test]
fn flags_do_not_back_propagate() {
    let r = request();
    let mut c = r.clone();
    c.set_memory_cache_reads(false);
    c.set_memory_cache_writes(false);

    assert!(r.memory_cache_reads());
    assert!(r.memory_cache_writes());
    assert!(!c.memory_cache_reads());
    assert!(!c.memory_cache_writes());
}

#[test]
fn processors_do_not_back_propagate() {
    let mut r = request();
    r.process_with_fn("A", Some);
    let before: Vec<String> = r.processors().identifiers().map(String::from).collect();

    let mut c = r.clone();
    c.process_with(AnonymousProcessor::new("B", Some));

    let after: Vec<String> = r.processors().identifiers().map(String::from).collect();
    assert_eq!(before, after);
    assert_eq!(c.processors().len(), r.processors().len() + 1);
    assert!(matches!(r.processor_state(), ProcessorState::Chain(_)));
}

#[test]
fn resource_does_not_back_propagate() {
    let r = request();
    let mut c = r.clone();
    c.set_resource(
        TransportDescriptor::new(Url::parse("http://x/2.png").unwrap())
            .cache_policy(CachePolicy::ReloadRevalidatingCacheData),
    );

    assert_eq!(r.locator(), "http://x/1.png");
    assert_eq!(
        r.transport().cache_policy,
        CachePolicy::UseProtocolCachePolicy
    );
    assert_eq!(c.locator(), "http://x/2.png");
}

#[test]
fn user_info_and_overrides_do_not_back_propagate() {
    let r = request().with_image_id("img-1");
    let mut c = r.clone();
    c.set_image_id("img-2");
    c.user_info_mut().insert("trace".to_string(), Value::from(7));
    c.set_cache_key(Some(OpaqueKey::new("custom")));
    c.set_load_key(Some(OpaqueKey::new("custom")));

    assert_eq!(r.image_id(), Some("img-1"));
    assert!(!r.user_info().contains_key("trace"));
    assert!(r.cache_key_override().is_none());
    assert!(r.load_key_override().is_none());
    assert_eq!(c.image_id(), Some("img-2"));
}

#[test]
fn progress_handler_does_not_back_propagate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let r = request();
    let mut c = r.clone();

    let sink = calls.clone();
    c.on_progress(move |_| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    r.notify_progress(1, Some(2));
    c.notify_progress(1, Some(2));

    assert!(r.progress_handler().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn reads_never_detach() {
    let r = request();
    let c = r.clone();

    let _ = c.cache_key();
    let _ = c.load_key();
    let _ = c.processors();
    let _ = c.transport();

    assert!(r.shares_state_with(&c));
}

#[test]
fn copies_mutated_on_other_threads_stay_isolated() {
    let original = request().with_priority(Priority::Low);

    let handles: Vec<_> = Priority::ALL
        .into_iter()
        .map(|priority| {
            let mut copy = original.clone();
            thread::spawn(move || {
                copy.set_priority(priority);
                copy.process_with_fn(format!("p-{priority}"), Some);
                copy
            })
        })
        .collect();

    for (handle, priority) in handles.into_iter().zip(Priority::ALL) {
        let copy = handle.join().unwrap();
        assert_eq!(copy.priority(), priority);
        assert_ne!(copy.cache_key(), original.cache_key());
        assert_eq!(copy.load_key(), original.load_key());
    }

    assert_eq!(original.priority(), Priority::Low);
}
