use pulldown_cmark::{html, Options, Parser};

/// Render a raw Markdown string to HTML.
///
/// Supports GitHub Flavored Markdown (GFM) features: tables,
/// footnotes, strikethrough, task lists, and smart punctuation.
/// The output is NOT sanitized; pass it through `sanitize::sanitize_html`.
pub fn render_markdown(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(raw, options);
    let mut html_output = String::with_capacity(raw.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph() {
        assert_eq!(render_markdown("Hello, reader!").trim(), "<p>Hello, reader!</p>");
    }

    #[test]
    fn test_headings_and_emphasis() {
        let result = render_markdown("## Part two\n\nSome **bold** and *italic* prose.");
        assert!(result.contains("<h2>Part two</h2>"));
        assert!(result.contains("<strong>bold</strong>"));
        assert!(result.contains("<em>italic</em>"));
    }

    #[test]
    fn test_fenced_code_keeps_language_class() {
        let result = render_markdown("```go\nfunc main() {}\n```");
        assert!(result.contains("<pre><code class=\"language-go\">"));
        assert!(result.contains("func main() {}"));
    }

    #[test]
    fn test_gfm_table_and_strikethrough() {
        let result = render_markdown("| A | B |\n|---|---|\n| 1 | ~~2~~ |");
        assert!(result.contains("<table>"));
        assert!(result.contains("<del>2</del>"));
    }

    #[test]
    fn test_links_and_images() {
        let result = render_markdown("[repo](https://github.com) ![cat](https://img/cat.png)");
        assert!(result.contains("<a href=\"https://github.com\">repo</a>"));
        assert!(result.contains("<img src=\"https://img/cat.png\" alt=\"cat\""));
    }

    #[test]
    fn test_raw_html_passes_through_unsanitized() {
        let result = render_markdown("<script>alert(1)</script>");
        assert!(result.contains("<script>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }
}
