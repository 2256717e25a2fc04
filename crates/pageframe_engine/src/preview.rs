use ego_tree::iter::Edge;
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};

const TRUNCATED_MARKER: &str = "\n.[truncated]";
pub const MAX_PREVIEW_CONTENT: usize = 2_048;

/// Visible text of the document body with whitespace collapsed, truncated for display.
pub fn prepare_preview(markup: &str) -> String {
    let text = visible_text(markup);
    if text.len() <= MAX_PREVIEW_CONTENT {
        text
    } else {
        let mut end = MAX_PREVIEW_CONTENT;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        let truncated = &text[..end];
        format!("{truncated}{TRUNCATED_MARKER}")
    }
}

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let Ok(body_sel) = Selector::parse("body") else {
        return String::new();
    };
    let Some(body) = document.select(&body_sel).next() else {
        return String::new();
    };

    // One pass; text is collected only outside hidden subtrees.
    let mut hidden_depth = 0usize;
    let mut words = Vec::new();
    for edge in body.traverse() {
        match edge {
            Edge::Open(node) if is_hidden(node) => hidden_depth += 1,
            Edge::Close(node) if is_hidden(node) => hidden_depth = hidden_depth.saturating_sub(1),
            Edge::Open(node) if hidden_depth == 0 => {
                if let Some(text) = node.value().as_text() {
                    words.extend(text.split_whitespace());
                }
            }
            _ => {}
        }
    }
    words.join(" ")
}

fn is_hidden(node: NodeRef<'_, Node>) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
}
