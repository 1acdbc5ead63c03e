//! Avatar image URLs

use reqwest::Url;

use super::endpoint_url;
use crate::config::BackendConfig;

/// Builds avatar URLs served by the backend
#[derive(Debug, Clone)]
pub struct Avatars {
    endpoint: Url,
    project_id: String,
}

impl Avatars {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            project_id: config.project_id.clone(),
        }
    }

    /// URL of an image rendering the initials of `name`
    pub fn initials_url(&self, name: &str) -> String {
        let mut url = endpoint_url(&self.endpoint, "/avatars/initials");
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", &self.project_id);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_url() {
        let config = BackendConfig::new("https://cloud.appwrite.io/v1", "food").unwrap();
        let avatars = Avatars::new(&config);

        assert_eq!(
            avatars.initials_url("Ada"),
            "https://cloud.appwrite.io/v1/avatars/initials?name=Ada&project=food"
        );
        assert_eq!(
            avatars.initials_url("Ada Lovelace"),
            "https://cloud.appwrite.io/v1/avatars/initials?name=Ada+Lovelace&project=food"
        );
    }
}
