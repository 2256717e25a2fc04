use engine_logging::{engine_debug, engine_info, engine_warn, set_active_generation};

use crate::{
    validate_input, AppState, Effect, Generation, InfoBar, Msg, RetrievalFailure,
    RetrievalResult, SurfaceSummary, FALLBACK_ERROR_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Log lines emitted while handling `msg` are tagged with the submission it concerns.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if let Some(generation) = msg.generation() {
        set_active_generation(generation);
    }
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::InputFocused => {
            if state.regions_mut().clear_error() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UrlSubmitted => submit(&mut state),
        Msg::RetrievalCompleted { generation, result } => {
            complete(&mut state, generation, result)
        }
        Msg::SurfaceSettled(summary) => {
            settle(&mut state, summary);
            Vec::new()
        }
        Msg::RenderFailed { generation, reason } => {
            if state.is_rendered(generation) {
                engine_warn!("Render of generation {} failed: {}", generation, reason);
                state.regions_mut().show_error(FALLBACK_ERROR_MESSAGE);
                state.mark_dirty();
                vec![Effect::ScrollToResults]
            } else {
                engine_debug!("Ignoring render failure for stale generation {}", generation);
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let request = match validate_input(state.input()) {
        Ok(request) => request,
        Err(err) => {
            state.regions_mut().show_error(&err.to_string());
            state.mark_dirty();
            return Vec::new();
        }
    };

    let generation = state.begin_submission(request.clone());
    set_active_generation(generation);
    engine_info!("Submitting generation {} url={}", generation, request.url);
    state.regions_mut().enter_loading();
    state.mark_dirty();
    vec![
        Effect::ScrollToResults,
        Effect::Retrieve {
            generation,
            request,
        },
    ]
}

fn complete(
    state: &mut AppState,
    generation: Generation,
    result: Result<RetrievalResult, RetrievalFailure>,
) -> Vec<Effect> {
    let Some(in_flight) = state.take_current(generation) else {
        engine_debug!(
            "Discarding stale retrieval for generation {} (latest {})",
            generation,
            state.latest_generation()
        );
        return Vec::new();
    };

    state.mark_dirty();
    match result {
        Ok(retrieved) => {
            let info_bar = InfoBar {
                displayed_url: in_flight.request.url,
                displayed_title: retrieved.display_title().to_owned(),
            };
            state.regions_mut().enter_success(info_bar);
            state.set_rendered_generation(generation);
            vec![
                Effect::RenderSurface {
                    generation,
                    content: retrieved.content,
                },
                Effect::ScrollToResults,
            ]
        }
        Err(failure) => {
            engine_warn!(
                "Retrieval for generation {} failed: {:?}",
                generation,
                failure.kind
            );
            state.regions_mut().show_error(failure.display_message());
            vec![Effect::ScrollToResults]
        }
    }
}

fn settle(state: &mut AppState, summary: SurfaceSummary) {
    if !state.is_rendered(summary.generation) {
        engine_debug!(
            "Ignoring settled surface for stale generation {}",
            summary.generation
        );
        return;
    }
    if summary.height_px.is_none() {
        engine_info!(
            "Surface for generation {} rendered with unknown geometry",
            summary.generation
        );
    }
    state.regions_mut().set_surface(summary);
    state.mark_dirty();
}
