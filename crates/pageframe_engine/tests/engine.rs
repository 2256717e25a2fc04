use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pageframe_engine::{
    start_engine_with, EngineConfig, EngineEvent, FetchError, RetrievalOutput, Retriever,
    ScrollOptions, ScrollTarget, SettleReport,
};

struct CannedRetriever {
    pages: HashMap<String, (Duration, String)>,
}

#[async_trait::async_trait]
impl Retriever for CannedRetriever {
    async fn retrieve(&self, url: &str) -> Result<RetrievalOutput, FetchError> {
        let (delay, content) = self.pages.get(url).cloned().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(RetrievalOutput {
            title: Some(url.to_string()),
            content,
            status: 200,
        })
    }
}

#[derive(Default)]
struct RecordingTarget {
    scrolls: Mutex<Vec<ScrollOptions>>,
}

impl ScrollTarget for RecordingTarget {
    fn scroll_into_view(&self, options: ScrollOptions) {
        self.scrolls.lock().unwrap().push(options);
    }
}

fn config() -> EngineConfig {
    EngineConfig {
        scroll_delay: Duration::from_millis(20),
        ..EngineConfig::default()
    }
}

#[test]
fn completions_carry_their_generation() {
    let retriever = Arc::new(CannedRetriever {
        pages: HashMap::from([
            ("slow".to_string(), (Duration::from_millis(150), "<p>slow</p>".to_string())),
            ("fast".to_string(), (Duration::ZERO, "<p>fast</p>".to_string())),
        ]),
    });
    let target = Arc::new(RecordingTarget::default());
    let (handle, events) = start_engine_with(config(), retriever, target).unwrap();

    handle.retrieve(1, "slow");
    handle.retrieve(2, "fast");

    let first = events.recv_timeout(Duration::from_secs(2)).expect("first event");
    let second = events.recv_timeout(Duration::from_secs(2)).expect("second event");

    match (first, second) {
        (
            EngineEvent::RetrievalCompleted {
                generation: 2,
                result: Ok(fast),
            },
            EngineEvent::RetrievalCompleted {
                generation: 1,
                result: Ok(slow),
            },
        ) => {
            assert_eq!(fast.content, "<p>fast</p>");
            assert_eq!(slow.content, "<p>slow</p>");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn render_emits_settled_surface() {
    let retriever = Arc::new(CannedRetriever {
        pages: HashMap::new(),
    });
    let target = Arc::new(RecordingTarget::default());
    let (handle, events) = start_engine_with(config(), retriever, target).unwrap();

    handle.render(3, r#"<body><a href="/x">x</a></body>"#);

    match events.recv_timeout(Duration::from_secs(2)) {
        Some(EngineEvent::SurfaceSettled(surface)) => {
            assert_eq!(surface.generation, 3);
            assert_eq!(surface.sandbox, "allow-same-origin allow-scripts");
            assert!(matches!(
                surface.report,
                SettleReport::Measured {
                    links_rewritten: 1,
                    ..
                }
            ));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn scroll_requests_are_coalesced() {
    let retriever = Arc::new(CannedRetriever {
        pages: HashMap::new(),
    });
    let target = Arc::new(RecordingTarget::default());
    let (handle, _events) = start_engine_with(config(), retriever, target.clone()).unwrap();

    handle.scroll_to_results();
    handle.scroll_to_results();
    handle.scroll_to_results();
    std::thread::sleep(Duration::from_millis(300));

    assert_eq!(*target.scrolls.lock().unwrap(), vec![ScrollOptions::RESULTS]);
}

#[test]
fn older_render_queued_after_newer_is_skipped() {
    let retriever = Arc::new(CannedRetriever {
        pages: HashMap::new(),
    });
    let target = Arc::new(RecordingTarget::default());
    let (handle, events) = start_engine_with(config(), retriever, target).unwrap();

    handle.render(2, "<p>newer</p>");
    handle.render(1, "<p>older</p>");

    match events.recv_timeout(Duration::from_secs(2)) {
        Some(EngineEvent::SurfaceSettled(surface)) => {
            assert_eq!(surface.generation, 2);
            assert_eq!(surface.preview, "newer");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(events.recv_timeout(Duration::from_millis(300)), None);
}

#[test]
fn events_end_when_the_handle_is_dropped() {
    let retriever = Arc::new(CannedRetriever {
        pages: HashMap::new(),
    });
    let target = Arc::new(RecordingTarget::default());
    let (handle, events) = start_engine_with(config(), retriever, target).unwrap();

    drop(handle);

    assert_eq!(events.recv(), None);
}

#[derive(Default)]
struct TagRecordingRetriever {
    tags: Mutex<Vec<(u64, u64)>>,
}

#[async_trait::async_trait]
impl Retriever for TagRecordingRetriever {
    async fn retrieve(&self, _url: &str) -> Result<RetrievalOutput, FetchError> {
        let before = engine_logging::active_generation();
        tokio::task::yield_now().await;
        let after = engine_logging::active_generation();
        self.tags.lock().unwrap().push((before, after));
        Ok(RetrievalOutput {
            title: None,
            content: String::new(),
            status: 200,
        })
    }
}

#[test]
fn retrieval_task_logs_under_its_generation() {
    let retriever = Arc::new(TagRecordingRetriever::default());
    let target = Arc::new(RecordingTarget::default());
    let (handle, events) = start_engine_with(config(), retriever.clone(), target).unwrap();

    handle.retrieve(7, "https://example.com");
    events.recv_timeout(Duration::from_secs(2)).expect("completion");

    assert_eq!(*retriever.tags.lock().unwrap(), vec![(7, 7)]);
}
