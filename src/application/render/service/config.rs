use comrak::options::Options;

/// Compiled-in renderer profile. Not configurable at runtime.
pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_extensions(&mut options);
    options
}

fn configure_extensions(options: &mut Options<'static>) {
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.description_lists = true;
    ext.math_dollars = true;

    let parse = &mut options.parse;
    parse.smart = true;

    // Raw HTML stays omitted (comrak's safe default); headings get ids in the
    // post-processing pass rather than through `header_ids` anchors.
    let render = &mut options.render;
    render.r#unsafe = false;
    render.github_pre_lang = true;
}
