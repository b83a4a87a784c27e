use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;

/// Template names, relative to the template root.
pub const EACH_DOC: &str = "pages/each-doc.html";
pub const EACH_THREAD: &str = "pages/each-thread.html";
pub const BLOGS: &str = "pages/blogs.html";
pub const ERROR: &str = "pages/error.html";

const EMBEDDED: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("partials/header.html", include_str!("../../templates/partials/header.html")),
    ("partials/thread-nav.html", include_str!("../../templates/partials/thread-nav.html")),
    ("partials/blogs-item.html", include_str!("../../templates/partials/blogs-item.html")),
    ("partials/social-btns.html", include_str!("../../templates/partials/social-btns.html")),
    (EACH_DOC, include_str!("../../templates/pages/each-doc.html")),
    (EACH_THREAD, include_str!("../../templates/pages/each-thread.html")),
    (BLOGS, include_str!("../../templates/pages/blogs.html")),
    (ERROR, include_str!("../../templates/pages/error.html")),
];

/// Named page templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Templates compiled into the binary.
    pub fn embedded() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED.iter().copied())?;
        Ok(Self { tera })
    }

    /// Load every `*.html` under `dir`, for editing templates without a rebuild.
    pub fn from_dir(dir: &Path) -> Result<Self, AppError> {
        let glob = dir.join("**").join("*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;
        for name in [EACH_DOC, EACH_THREAD, BLOGS, ERROR] {
            if !tera.get_template_names().any(|n| n == name) {
                return Err(AppError::Internal(format!(
                    "template '{name}' missing from {}",
                    dir.display()
                )));
            }
        }
        Ok(Self { tera })
    }

    /// Render `name` with `view` as the context.
    pub fn render<T: Serialize>(&self, name: &str, view: &T) -> Result<String, AppError> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(name, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_compile() {
        assert!(Templates::embedded().is_ok());
    }

    #[test]
    fn test_error_page_escapes_message() {
        let templates = Templates::embedded().unwrap();
        let html = templates
            .render(
                ERROR,
                &serde_json::json!({ "status": 400, "message": "<b>Invalid Index</b>" }),
            )
            .unwrap();
        assert!(html.contains("400"));
        assert!(html.contains("&lt;b&gt;Invalid Index&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn test_unknown_template_is_template_error() {
        let templates = Templates::embedded().unwrap();
        let err = templates
            .render("pages/nope.html", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }

    #[test]
    fn test_missing_variable_is_template_error() {
        let templates = Templates::embedded().unwrap();
        let err = templates.render(EACH_DOC, &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }
}
