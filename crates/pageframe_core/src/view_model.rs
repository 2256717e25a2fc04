use crate::{Generation, InfoBar, SurfaceSummary, ViewState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view_state: ViewState,
    pub input: String,
    pub loading_visible: bool,
    pub result_visible: bool,
    /// Banner text, present only while the banner is visible.
    pub error_text: Option<String>,
    pub info_bar: Option<InfoBar>,
    pub surface: Option<SurfaceSummary>,
    pub latest_generation: Generation,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn error_visible(&self) -> bool {
        self.error_text.is_some()
    }
}
