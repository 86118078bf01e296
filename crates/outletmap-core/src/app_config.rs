use url::Url;

/// Backend origin, stored with a trailing `/` on its path so endpoint paths
/// join beneath it instead of replacing the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parses an `http://` or `https://` origin, optionally with a path prefix.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value is not a URL, uses
    /// another scheme, has no host, or carries a query string or fragment.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let mut url =
            Url::parse(trimmed).map_err(|e| format!("'{raw}' is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("'{raw}' must start with http:// or https://"));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(format!("'{raw}' has no host"));
        }
        if url.query().is_some() {
            return Err(format!("'{raw}' must not contain a query string"));
        }
        if url.fragment().is_some() {
            return Err(format!("'{raw}' must not contain a fragment"));
        }

        let path = format!("{}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        Ok(Self(url))
    }

    /// The origin without its trailing slash, e.g. `http://127.0.0.1:8000`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// Joins an endpoint path such as `outlets` onto the origin.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `path` cannot form a URL relative to the
    /// origin.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path.trim_start_matches('/'))
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: BaseUrl,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Radius used when deriving highlighted outlets, in metres.
    pub coverage_radius_m: f64,
    /// Render bot replies without passing them through the sanitizer.
    pub trust_bot_html: bool,
}
