use serde::Deserialize;

/// `?search=` filter used by the admin list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryDto {
    pub search: Option<String>,
}

impl SearchQueryDto {
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
