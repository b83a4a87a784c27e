use std::collections::HashSet;

/// The fixed policy for user-generated content.
///
/// ammonia's defaults already cover the usual UGC tag set (headings, lists,
/// tables, images, links, code). On top of that links get `nofollow`, and
/// `<code>`/`<pre>` may keep a `class` so fenced code blocks retain their
/// `language-*` marker.
fn ugc_policy() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();
    builder
        .link_rel(Some("nofollow noopener noreferrer"))
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("pre", &["class"])
        .url_schemes(HashSet::from(["http", "https", "mailto"]));
    builder
}

/// Sanitize untrusted HTML against the UGC allow-list.
pub fn sanitize_html(unsafe_html: &str) -> String {
    ugc_policy().clean(unsafe_html).to_string()
}
