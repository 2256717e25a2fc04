use pageframe_engine::{
    LayoutProbe, RendererSettings, SandboxPolicy, SandboxRenderer, SettleReport,
};
use pretty_assertions::assert_eq;
use scraper::{Html, Selector};

struct FixedHeight(u32);

impl LayoutProbe for FixedHeight {
    fn content_height(&self, _document: &Html) -> u32 {
        self.0
    }
}

fn renderer_with(policy: SandboxPolicy) -> SandboxRenderer {
    SandboxRenderer::with_probe(RendererSettings { policy }, Box::new(FixedHeight(480)))
}

const PAGE: &str = r#"<html><head><title>Links</title></head><body>
<a href="https://one.example">one</a>
<a href="/two" target="_self" rel="opener">two</a>
<p>text <a href="three.html">three</a></p>
</body></html>"#;

#[tokio::test]
async fn same_url_twice_leaves_one_active_surface() {
    let mut renderer = renderer_with(SandboxPolicy::default());

    renderer.render(1, PAGE).await.expect("first render");
    renderer.render(2, PAGE).await.expect("second render");

    let active = renderer.active().expect("active surface");
    assert_eq!(active.generation(), 2);
}

#[tokio::test]
async fn every_link_opens_externally_without_opener() {
    let mut renderer = renderer_with(SandboxPolicy::default());

    let rendered = renderer.render(1, PAGE).await.expect("render");

    assert_eq!(
        rendered.report,
        SettleReport::Measured {
            height_px: 480,
            links_rewritten: 3
        }
    );

    let markup = renderer.active().and_then(|s| s.markup()).expect("markup");
    let document = Html::parse_document(markup);
    let anchors = Selector::parse("a").unwrap();
    let mut count = 0;
    for anchor in document.select(&anchors) {
        assert_eq!(anchor.value().attr("target"), Some("_blank"));
        assert_eq!(anchor.value().attr("rel"), Some("noopener noreferrer"));
        count += 1;
    }
    assert_eq!(count, 3);
}

#[tokio::test]
async fn surface_height_follows_probe() {
    let mut renderer = renderer_with(SandboxPolicy::default());

    renderer.render(4, "<p>short</p>").await.expect("render");

    assert_eq!(renderer.active().and_then(|s| s.height_px()), Some(480));
}

#[tokio::test]
async fn opaque_origin_reports_unknown_geometry_but_keeps_content() {
    let policy = SandboxPolicy {
        allow_scripts: true,
        allow_same_origin: false,
    };
    let mut renderer = renderer_with(policy);

    let rendered = renderer.render(1, PAGE).await.expect("render");

    assert_eq!(rendered.report, SettleReport::GeometryUnknown);
    assert_eq!(rendered.sandbox, "allow-scripts");

    let active = renderer.active().expect("content stays mounted");
    assert_eq!(active.markup(), Some(PAGE));
    assert_eq!(active.height_px(), None);
}

#[tokio::test]
async fn preview_carries_visible_text() {
    let mut renderer = renderer_with(SandboxPolicy::default());

    let rendered = renderer
        .render(
            1,
            "<html><head><style>p{}</style></head><body><h1>Hello</h1><script>x()</script><p>world</p></body></html>",
        )
        .await
        .expect("render");

    assert!(rendered.preview.contains("Hello"));
    assert!(rendered.preview.contains("world"));
    assert!(!rendered.preview.contains("x()"));
}
