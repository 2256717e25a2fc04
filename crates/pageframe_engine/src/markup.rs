use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Anchors open a new top-level browsing context.
pub const LINK_TARGET: &str = "_blank";
/// The opened context gets neither an opener reference nor a referrer.
pub const LINK_REL: &str = "noopener noreferrer";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenDocument {
    pub html: String,
    pub links_rewritten: usize,
}

/// Serializes `document` back to markup with every `<a>` forced to open externally.
pub fn rewrite_links(document: &Html) -> RewrittenDocument {
    let mut ctx = SerializeContext::default();
    for child in document.tree.root().children() {
        visit_node(child, &mut ctx);
    }
    RewrittenDocument {
        html: ctx.out,
        links_rewritten: ctx.links_rewritten,
    }
}

#[derive(Default)]
struct SerializeContext {
    out: String,
    links_rewritten: usize,
}

fn visit_node(node: NodeRef<'_, Node>, ctx: &mut SerializeContext) {
    match node.value() {
        Node::Doctype(doctype) => {
            ctx.out.push_str("<!DOCTYPE ");
            ctx.out.push_str(doctype.name());
            ctx.out.push('>');
        }
        Node::Comment(comment) => {
            ctx.out.push_str("<!--");
            ctx.out.push_str(comment);
            ctx.out.push_str("-->");
        }
        Node::Text(text) => {
            if parent_is_raw_text(node) {
                ctx.out.push_str(text);
            } else {
                escape_into(&mut ctx.out, text, false);
            }
        }
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, ctx);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, ctx);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, ctx: &mut SerializeContext) {
    let name = element.value().name();
    let is_anchor = name.eq_ignore_ascii_case("a");

    ctx.out.push('<');
    ctx.out.push_str(name);
    // Qualified names, so foreign-content attributes such as `xlink:href` keep their prefix.
    for (name, value) in element.value().attrs.iter() {
        let local: &str = &name.local;
        if is_anchor
            && name.prefix.is_none()
            && (local.eq_ignore_ascii_case("target") || local.eq_ignore_ascii_case("rel"))
        {
            continue;
        }
        match &name.prefix {
            Some(prefix) => {
                let prefix: &str = prefix;
                push_attr(&mut ctx.out, &format!("{prefix}:{local}"), value);
            }
            None => push_attr(&mut ctx.out, local, value),
        }
    }
    if is_anchor {
        push_attr(&mut ctx.out, "target", LINK_TARGET);
        push_attr(&mut ctx.out, "rel", LINK_REL);
        ctx.links_rewritten += 1;
    }
    ctx.out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    for child in element.children() {
        visit_node(child, ctx);
    }
    ctx.out.push_str("</");
    ctx.out.push_str(name);
    ctx.out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(out, value, true);
    out.push('"');
}

fn parent_is_raw_text(node: NodeRef<'_, Node>) -> bool {
    node.parent()
        .and_then(|parent| parent.value().as_element().map(|el| el.name().to_owned()))
        .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name.as_str()))
}

fn escape_into(out: &mut String, text: &str, in_attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
