use url::Url;

/// The root URL of a board service API, and the two credential strings needed to use it
#[derive(Clone)]
pub struct Resource {
    base_url: Url,
    key: String,
    token: String,
}

impl Resource {
    pub fn new(base_url: Url, key: String, token: String) -> Self {
        Self { base_url, key, token }
    }

    /// Build the URL of an API endpoint, by appending `path` to the base URL and adding the credentials as query parameters.
    ///
    /// Since the resulting URL contains secrets, it must not be logged. Log `path` instead.
    pub fn combine(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut built = self.base_url.join(path.trim_start_matches('/'))?;
        built.query_pairs_mut()
            .append_pair("key", &self.key)
            .append_pair("token", &self.token);
        Ok(built)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.base_url.as_str())
            .field("key", &"<hidden>")
            .field("token", &"<hidden>")
            .finish()
    }
}
