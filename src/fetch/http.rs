//! HTTP image source

use super::ImageSource;
use crate::error::{CoverError, Result};
use crate::lookup::lastfm::{REQUEST_TIMEOUT, USER_AGENT};
use std::io::Write;

/// Plain blocking GET for image URLs
pub struct HttpImageSource {
    http: reqwest::blocking::Client,
}

impl HttpImageSource {
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoverError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }
}

impl ImageSource for HttpImageSource {
    fn download(&self, url: &str, writer: &mut dyn Write) -> std::result::Result<u64, String> {
        let mut response = self.http.get(url).send().map_err(|e| {
            if e.is_timeout() {
                format!("timed out after {}s", REQUEST_TIMEOUT.as_secs())
            } else {
                e.to_string()
            }
        })?;

        if !response.status().is_success() {
            return Err(format!("HTTP status {}", response.status()));
        }

        response.copy_to(writer).map_err(|e| e.to_string())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_error() {
        let source = HttpImageSource::new().unwrap();
        let mut sink = Vec::new();
        let result = source.download("http://127.0.0.1:1/cover.jpg", &mut sink);
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_url_is_error() {
        let source = HttpImageSource::new().unwrap();
        let mut sink = Vec::new();
        assert!(source.download("not a url", &mut sink).is_err());
    }
}
