use std::time::Duration;

/// Builder-style configuration for extractor implementations.
pub struct ExtractConfig {
    pub base_url: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            dimension: 0,
            timeout: Duration::ZERO,
        }
    }
}

impl ExtractConfig {
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dimension = dim;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
