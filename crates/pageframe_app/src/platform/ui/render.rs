use pageframe_core::{AppViewModel, InfoBar, SurfaceSummary, ViewState};

use super::constants::*;

/// Status lines printed whenever the view changes.
pub fn status_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if view.loading_visible {
        lines.push(LOADING_TEXT.to_string());
    }
    if let Some(error) = &view.error_text {
        lines.push(error.clone());
    }
    if view.result_visible {
        if let Some(info_bar) = &view.info_bar {
            lines.push(format_info_bar(info_bar));
        }
        if let Some(surface) = &view.surface {
            lines.push(format_surface(surface));
        }
    }
    lines
}

/// The results section, printed when the view scrolls to it.
pub fn results_lines(view: &AppViewModel) -> Vec<String> {
    if view.view_state == ViewState::Idle {
        return Vec::new();
    }

    let mut lines = vec![RESULTS_HEADER.to_string()];
    lines.extend(status_lines(view));
    if view.result_visible {
        if let Some(surface) = view.surface.as_ref().filter(|s| !s.preview.is_empty()) {
            lines.push(String::new());
            lines.push(surface.preview.clone());
        }
    }
    lines
}

fn format_info_bar(info_bar: &InfoBar) -> String {
    format!(
        "{LABEL_URL}: {} | {LABEL_TITLE}: {}",
        info_bar.displayed_url, info_bar.displayed_title
    )
}

fn format_surface(surface: &SurfaceSummary) -> String {
    let height = surface
        .height_px
        .map(|h| format!("{h}px"))
        .unwrap_or_else(|| UNKNOWN_GEOMETRY.to_string());
    let links = surface
        .links_rewritten
        .map(|n| n.to_string())
        .unwrap_or_else(|| UNKNOWN_GEOMETRY.to_string());
    let sandbox = if surface.sandbox.is_empty() {
        "(none)"
    } else {
        surface.sandbox.as_str()
    };
    format!("{LABEL_SANDBOX}: {sandbox} | {LABEL_HEIGHT}: {height} | {LABEL_LINKS}: {links}")
}
