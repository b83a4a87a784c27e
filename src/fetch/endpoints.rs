use url::Url;

use crate::error::AppError;

/// URL builder for the backend blog API.
#[derive(Debug, Clone)]
pub struct BlogApi {
    base: Url,
}

impl BlogApi {
    pub fn new(base: &str) -> Result<Self, AppError> {
        let base = Url::parse(base)
            .map_err(|e| AppError::Internal(format!("Invalid API_URL '{base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(AppError::Internal(format!("API_URL '{base}' cannot be a base URL")));
        }
        Ok(Self { base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET {API}/api/public/blog/{id}`
    pub fn blog(&self, id: &str) -> String {
        self.endpoint(&["api", "public", "blog", id]).into()
    }

    /// `GET {API}/api/public/blog/doc/{id}`
    pub fn blog_document(&self, id: &str) -> String {
        self.endpoint(&["api", "public", "blog", "doc", id]).into()
    }

    /// `GET {API}/api/public/blog/all?tech={bool}`
    pub fn all_blogs(&self, tech: bool) -> String {
        let mut url = self.endpoint(&["api", "public", "blog", "all"]);
        url.query_pairs_mut()
            .append_pair("tech", if tech { "true" } else { "false" });
        url.into()
    }
}
