use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Measures the rendered height of an embedded document.
pub trait LayoutProbe: Send + Sync {
    fn content_height(&self, document: &Html) -> u32;
}

/// Estimates height by flowing text into fixed-width line boxes, one block at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFlowProbe {
    pub viewport_width: u32,
    pub line_height: u32,
    pub char_width: u32,
    pub block_margin: u32,
}

impl Default for BlockFlowProbe {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            line_height: 20,
            char_width: 8,
            block_margin: 16,
        }
    }
}

impl LayoutProbe for BlockFlowProbe {
    fn content_height(&self, document: &Html) -> u32 {
        let Ok(body_sel) = Selector::parse("body") else {
            return 0;
        };
        let Some(body) = document.select(&body_sel).next() else {
            return 0;
        };
        let mut flow = Flow::new(self);
        flow.visit_children(body);
        flow.finish()
    }
}

struct Flow<'p> {
    probe: &'p BlockFlowProbe,
    height: u32,
    pending_chars: u32,
}

impl<'p> Flow<'p> {
    fn new(probe: &'p BlockFlowProbe) -> Self {
        Self {
            probe,
            height: 0,
            pending_chars: 0,
        }
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => {
                let visible = text.split_whitespace().map(|w| w.chars().count() + 1).sum::<usize>();
                self.pending_chars = self
                    .pending_chars
                    .saturating_add(u32::try_from(visible).unwrap_or(u32::MAX));
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element);
                }
            }
            _ => {}
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "script" | "style" | "template" | "noscript" | "head" | "meta" | "link" => {}
            "br" => {
                self.flush_line_box();
                self.height = self.height.saturating_add(self.probe.line_height);
            }
            "img" | "video" | "canvas" | "iframe" => {
                let declared = element
                    .value()
                    .attr("height")
                    .and_then(|h| h.trim().trim_end_matches("px").parse::<u32>().ok());
                self.flush_line_box();
                self.height = self
                    .height
                    .saturating_add(declared.unwrap_or(self.probe.line_height));
            }
            "p" | "div" | "section" | "article" | "header" | "footer" | "nav" | "main"
            | "aside" | "figure" | "figcaption" | "table" | "tr" | "blockquote" | "pre"
            | "ul" | "ol" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr" | "form"
            | "address" => {
                self.flush_line_box();
                self.visit_children(element);
                self.flush_line_box();
                self.height = self.height.saturating_add(self.probe.block_margin);
            }
            _ => self.visit_children(element),
        }
    }

    fn visit_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            self.visit_node(child);
        }
    }

    fn flush_line_box(&mut self) {
        if self.pending_chars == 0 {
            return;
        }
        let per_line = (self.probe.viewport_width / self.probe.char_width.max(1)).max(1);
        let lines = self.pending_chars.div_ceil(per_line);
        self.height = self
            .height
            .saturating_add(lines.saturating_mul(self.probe.line_height));
        self.pending_chars = 0;
    }

    fn finish(mut self) -> u32 {
        self.flush_line_box();
        self.height
    }
}
