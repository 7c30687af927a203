//! LastFM-compatible `album.getinfo` client

use super::CoverCatalog;
use crate::config::ApiSettings;
use crate::error::{CoverError, Result};
use crate::types::CoverLookup;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout applied to every HTTP request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("coverfetch/", env!("CARGO_PKG_VERSION"));

/// Position of the wanted size in the response's image list.
/// LastFM orders sizes small, medium, large, extralarge, mega, "" (largest last).
pub const IMAGE_VARIANT_INDEX: usize = 5;

#[derive(Debug, Deserialize)]
struct AlbumInfoResponse {
    album: Option<AlbumInfo>,
    error: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfo {
    name: String,
    #[serde(default)]
    image: Vec<ImageVariant>,
}

#[derive(Debug, Deserialize)]
struct ImageVariant {
    #[serde(rename = "#text", default)]
    url: String,
    #[serde(default)]
    size: String,
}

/// Parse an `album.getinfo` JSON body into a `CoverLookup`
///
/// Fails on malformed JSON, an API error object, a missing `album`, fewer than
/// `IMAGE_VARIANT_INDEX + 1` images, or an empty URL at that position.
pub fn parse_album_response(artist: &str, album: &str, body: &str) -> Result<CoverLookup> {
    let response: AlbumInfoResponse = serde_json::from_str(body)
        .map_err(|e| CoverError::lookup(artist, album, format!("malformed response: {}", e)))?;

    if let Some(code) = response.error {
        let message = response.message.unwrap_or_default();
        return Err(CoverError::lookup(
            artist,
            album,
            format!("API error {}: {}", code, message),
        ));
    }

    let info = response
        .album
        .ok_or_else(|| CoverError::lookup(artist, album, "response has no album"))?;

    let variant = info.image.get(IMAGE_VARIANT_INDEX).ok_or_else(|| {
        CoverError::lookup(
            artist,
            album,
            format!(
                "expected at least {} image variants, got {}",
                IMAGE_VARIANT_INDEX + 1,
                info.image.len()
            ),
        )
    })?;

    if variant.url.trim().is_empty() {
        return Err(CoverError::lookup(artist, album, "no image available"));
    }

    debug!(
        "Selected {} image for {} - {}: {}",
        if variant.size.is_empty() { "unsized" } else { variant.size.as_str() },
        artist,
        info.name,
        variant.url
    );

    Ok(CoverLookup {
        canonical_album: info.name,
        image_url: variant.url.trim().to_string(),
    })
}

/// Blocking HTTP client for a LastFM-compatible API
pub struct LastFmClient {
    http: reqwest::blocking::Client,
    api: ApiSettings,
}

impl LastFmClient {
    pub fn new(api: ApiSettings) -> Result<Self> {
        Self::from_builder(client_builder(), api)
    }

    fn from_builder(builder: reqwest::blocking::ClientBuilder, api: ApiSettings) -> Result<Self> {
        let http = builder
            .build()
            .map_err(|e| CoverError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, api })
    }

    fn request(&self, artist: &str, album: &str) -> Result<String> {
        let response = self
            .http
            .get(&self.api.url)
            .query(&[
                ("api_key", self.api.key.as_str()),
                ("method", self.api.method.as_str()),
                ("format", self.api.format.as_str()),
                ("artist", artist),
                ("album", album),
            ])
            .send()
            .map_err(|e| CoverError::lookup(artist, album, describe_request_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CoverError::lookup(artist, album, describe_request_error(&e)))?;

        // LastFM reports API errors with a JSON body and a 4xx status; keep the message.
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(CoverError::lookup(
                artist,
                album,
                format!("HTTP status {}", status),
            ));
        }

        Ok(body)
    }
}

impl CoverCatalog for LastFmClient {
    fn lookup(&self, artist: &str, album: &str) -> Result<CoverLookup> {
        let body = self.request(artist, album)?;
        let lookup = parse_album_response(artist, album, &body)?;
        info!("Get info for {} - {} - OK", artist, album);
        Ok(lookup)
    }

    fn name(&self) -> &'static str {
        "lastfm"
    }
}

fn client_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
}

fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out after {}s", REQUEST_TIMEOUT.as_secs())
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
