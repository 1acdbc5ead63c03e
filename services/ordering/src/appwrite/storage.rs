//! File storage URLs for the configured bucket

use reqwest::Url;

use super::endpoint_url;
use crate::config::BackendConfig;

/// Builds URLs for files in the storage bucket
#[derive(Debug, Clone)]
pub struct Storage {
    endpoint: Url,
    project_id: String,
    bucket_id: String,
}

impl Storage {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            project_id: config.project_id.clone(),
            bucket_id: config.bucket_id.clone(),
        }
    }

    fn file_url(&self, file_id: &str, action: &str) -> Url {
        endpoint_url(
            &self.endpoint,
            &format!("/storage/buckets/{}/files/{}/{}", self.bucket_id, file_id, action),
        )
    }

    /// URL serving the original file
    pub fn file_view_url(&self, file_id: &str) -> String {
        let mut url = self.file_url(file_id, "view");
        url.query_pairs_mut().append_pair("project", &self.project_id);
        url.to_string()
    }

    /// URL serving a resized preview of an image file
    pub fn file_preview_url(&self, file_id: &str, width: u32, height: u32) -> String {
        let mut url = self.file_url(file_id, "preview");
        url.query_pairs_mut()
            .append_pair("width", &width.to_string())
            .append_pair("height", &height.to_string())
            .append_pair("project", &self.project_id);
        url.to_string()
    }
}
