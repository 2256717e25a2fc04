use crate::view_model::AppViewModel;
use crate::{ErrorBanner, Generation, SubmissionRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBar {
    pub displayed_url: String,
    pub displayed_title: String,
}

/// What the renderer reported about the mounted surface once it settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSummary {
    pub generation: Generation,
    pub sandbox: String,
    /// `None` when the embedded document could not be inspected.
    pub height_px: Option<u32>,
    pub links_rewritten: Option<usize>,
    pub preview: String,
}

/// The regions of the page the orchestrator drives.
///
/// Visibility of the loading indicator and the result region is a projection of
/// [`ViewState`], so at most one of loading, result and error is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiRegions {
    view_state: ViewState,
    banner: ErrorBanner,
    info_bar: Option<InfoBar>,
    surface: Option<SurfaceSummary>,
}

impl UiRegions {
    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn loading_visible(&self) -> bool {
        self.view_state == ViewState::Loading
    }

    pub fn result_visible(&self) -> bool {
        self.view_state == ViewState::Success
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn info_bar(&self) -> Option<&InfoBar> {
        self.info_bar.as_ref()
    }

    pub fn surface(&self) -> Option<&SurfaceSummary> {
        self.surface.as_ref()
    }

    pub(crate) fn enter_loading(&mut self) {
        self.view_state = ViewState::Loading;
        self.banner.clear();
    }

    pub(crate) fn enter_success(&mut self, info_bar: InfoBar) {
        self.view_state = ViewState::Success;
        self.banner.clear();
        self.info_bar = Some(info_bar);
        self.surface = None;
    }

    /// Shows the banner; the result region is hidden by leaving `Success`.
    pub(crate) fn show_error(&mut self, message: &str) {
        self.view_state = ViewState::Error;
        self.banner.show(message);
    }

    pub(crate) fn clear_error(&mut self) -> bool {
        self.banner.clear()
    }

    pub(crate) fn set_surface(&mut self, summary: SurfaceSummary) {
        self.surface = Some(summary);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) generation: Generation,
    pub(crate) request: SubmissionRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    regions: UiRegions,
    latest_generation: Generation,
    in_flight: Option<InFlight>,
    rendered_generation: Option<Generation>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            view_state: self.regions.view_state(),
            input: self.input.clone(),
            loading_visible: self.regions.loading_visible(),
            result_visible: self.regions.result_visible(),
            error_text: self.regions.banner().visible_text().map(ToOwned::to_owned),
            info_bar: self.regions.info_bar().cloned(),
            surface: self.regions.surface().cloned(),
            latest_generation: self.latest_generation,
            dirty: self.dirty,
        }
    }

    pub fn regions(&self) -> &UiRegions {
        &self.regions
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn latest_generation(&self) -> Generation {
        self.latest_generation
    }

    /// Returns whether the view changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub(crate) fn regions_mut(&mut self) -> &mut UiRegions {
        &mut self.regions
    }

    /// Issues the next generation and records the submission as the one in flight.
    /// Any earlier in-flight submission is superseded.
    pub(crate) fn begin_submission(&mut self, request: SubmissionRequest) -> Generation {
        self.latest_generation += 1;
        let generation = self.latest_generation;
        self.in_flight = Some(InFlight {
            generation,
            request,
        });
        generation
    }

    /// Takes the in-flight submission if `generation` is the one the view is waiting on.
    pub(crate) fn take_current(&mut self, generation: Generation) -> Option<InFlight> {
        if self.regions.view_state() != ViewState::Loading {
            return None;
        }
        match &self.in_flight {
            Some(in_flight) if in_flight.generation == generation => self.in_flight.take(),
            _ => None,
        }
    }

    pub(crate) fn set_rendered_generation(&mut self, generation: Generation) {
        self.rendered_generation = Some(generation);
    }

    /// True if `generation` is the latest content handed to the renderer and still shown.
    pub(crate) fn is_rendered(&self, generation: Generation) -> bool {
        self.rendered_generation == Some(generation)
            && self.regions.view_state() == ViewState::Success
    }
}
