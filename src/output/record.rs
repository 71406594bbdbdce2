use crate::state::Resource;
use serde::Serialize;

/// Column names, in output order
pub const HEADER: [&str; 6] = [
    "url",
    "status",
    "redirects number",
    "final URL",
    "allowed by robots.txt",
    "error",
];

/// One CSV row; every field is text, absent values are empty strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub url: String,
    pub status: String,
    pub redirects: String,
    pub final_url: String,
    pub robots: String,
    pub error: String,
}

impl From<&Resource> for OutputRecord {
    fn from(resource: &Resource) -> Self {
        Self {
            url: resource.url.clone(),
            status: resource.status_text(),
            redirects: resource.redirects_followed.to_string(),
            final_url: resource.final_url.clone().unwrap_or_default(),
            robots: resource
                .robots_status
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            error: resource
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}
