use md2html::application::render::{RenderOutput, RenderRequest, RenderService, render_service};

fn render_fixture() -> RenderOutput {
    let markdown = include_str!("fixtures/profile.md");
    render_service()
        .render(&RenderRequest::new(markdown))
        .expect("fixture renders")
}

#[test]
fn duplicate_headings_get_distinct_anchors() {
    let output = render_fixture();
    assert!(output.html.contains(r#"<h2 id="overview">Overview</h2>"#));
    assert!(output.html.contains(r#"<h2 id="overview-2">Overview</h2>"#));
    assert_eq!(output.anchored_headings, 2);
}

#[test]
fn extensions_of_the_profile_are_enabled() {
    let html = render_fixture().html;
    assert!(html.contains("<del>old</del>"));
    assert!(html.contains("<table>"));
    assert!(html.contains("<dl>"));
    assert!(html.contains(r#"<pre lang="rust"><code>"#));
}

#[test]
fn only_absolute_links_open_in_new_context() {
    let output = render_fixture();
    let html = &output.html;

    assert!(html.contains(
        r#"<a href="https://docs.example.com" target="_blank" rel="noopener noreferrer">docs</a>"#
    ));
    assert!(html.contains(r#"<a href="./next.md">next</a>"#));
    assert!(html.contains(r##"<a href="#overview">top</a>"##));
    // autolinked www.example.com counts as absolute
    assert_eq!(output.external_links, 2);
}

#[test]
fn raw_html_is_not_passed_through() {
    let html = render_fixture().html;
    assert!(!html.contains("<script>"));
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(render_fixture().html, render_fixture().html);
}

#[test]
fn natural_and_suffixed_anchors_do_not_collide() {
    let output = render_service()
        .render(&RenderRequest::new("# Notes\n# Notes\n# Notes 2\n"))
        .expect("renders");
    assert_eq!(
        output.html,
        "<h1 id=\"notes\">Notes</h1>\n<h1 id=\"notes-2\">Notes</h1>\n<h1 id=\"notes-2-2\">Notes 2</h1>\n"
    );
}

#[test]
fn explicit_heading_ids_are_honoured() {
    let output = render_service()
        .render(&RenderRequest::new("## Setup {#install}\n\n## Install\n"))
        .expect("renders");
    assert_eq!(
        output.html,
        "<h2 id=\"install\">Setup</h2>\n<h2 id=\"install-2\">Install</h2>\n"
    );
}
