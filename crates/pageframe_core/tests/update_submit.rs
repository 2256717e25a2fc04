use std::sync::Once;

use pageframe_core::{
    update, AppState, Effect, Msg, SubmissionRequest, ViewState, EMPTY_INPUT_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::UrlSubmitted)
}

#[test]
fn empty_input_shows_banner_without_network_call() {
    init_logging();
    let (mut next, effects) = submit_url(AppState::new(), "   \n");
    let view = next.view();

    assert!(effects.is_empty());
    assert_eq!(view.view_state, ViewState::Error);
    assert_eq!(view.error_text.as_deref(), Some("⚠️ Please enter a valid URL"));
    assert_eq!(
        view.error_text,
        Some(format!("{} {}", pageframe_core::WARNING_GLYPH, EMPTY_INPUT_MESSAGE))
    );
    assert!(!view.loading_visible);
    assert!(!view.result_visible);
    assert_eq!(view.latest_generation, 0);
    assert!(next.consume_dirty());
}

#[test]
fn valid_submission_enters_loading_then_scrolls_then_retrieves() {
    init_logging();
    let (next, effects) = submit_url(AppState::new(), "  https://example.com/article  ");
    let view = next.view();

    assert_eq!(view.view_state, ViewState::Loading);
    assert!(view.loading_visible);
    assert!(!view.result_visible);
    assert!(!view.error_visible());
    assert_eq!(
        effects,
        vec![
            Effect::ScrollToResults,
            Effect::Retrieve {
                generation: 1,
                request: SubmissionRequest {
                    url: "https://example.com/article".to_string(),
                },
            },
        ]
    );
}

#[test]
fn new_submission_hides_previous_error() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "");
    assert!(state.view().error_visible());

    let (next, effects) = submit_url(state, "https://example.com");
    let view = next.view();

    assert_eq!(view.view_state, ViewState::Loading);
    assert!(!view.error_visible());
    assert_eq!(effects.len(), 2);
}

#[test]
fn each_submission_issues_a_new_generation() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example.com");
    let (state, effects) = submit_url(state, "https://b.example.com");

    assert_eq!(state.latest_generation(), 2);
    assert!(effects.contains(&Effect::Retrieve {
        generation: 2,
        request: SubmissionRequest {
            url: "https://b.example.com".to_string(),
        },
    }));
}

#[test]
fn focusing_input_clears_error_only() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "");
    let before = state.view();
    assert!(before.error_visible());

    let (mut next, effects) = update(state, Msg::InputFocused);
    let after = next.view();

    assert!(effects.is_empty());
    assert!(!after.error_visible());
    assert_eq!(after.result_visible, before.result_visible);
    assert_eq!(after.loading_visible, before.loading_visible);
    assert!(next.consume_dirty());
}

#[test]
fn focusing_input_without_error_is_clean() {
    init_logging();
    let (mut next, effects) = update(AppState::new(), Msg::InputFocused);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn submission_tags_log_lines_with_its_generation() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "https://a.example.com");
    assert_eq!(engine_logging::active_generation(), 1);

    let (_, _) = submit_url(state, "https://b.example.com");
    assert_eq!(engine_logging::active_generation(), 2);
    engine_logging::set_active_generation(0);
}
