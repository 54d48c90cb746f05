use url::Url;

/// Turns stored image references into absolute URLs on the media host.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base: Url,
}

impl MediaResolver {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(MediaResolver { base })
    }

    /// `skills/go.png` becomes `<base>/skills/go.png`; absolute http(s)
    /// references and empty values are returned unchanged.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.is_empty() || is_absolute(reference) {
            return reference.to_string();
        }
        match self.base.join(reference.trim_start_matches('/')) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!(reference, error = %e, "Could not resolve media reference");
                reference.to_string()
            }
        }
    }
}

fn is_absolute(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
