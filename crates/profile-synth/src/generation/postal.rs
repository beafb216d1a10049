use super::reference::state_abbreviation;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_POSTAL_BASE_URL: &str = "http://api.zippopotam.us";
pub const DEFAULT_POSTAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a postal lookup produced no code. Callers substitute a random zip for
/// every variant; the split keeps "not found" apart from transient failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    #[error("no state abbreviation for '{state}'")]
    UnmappedState { state: String },
    #[error("no postal code listed for {city}, {state}")]
    NotFound { city: String, state: String },
    #[error("postal lookup timed out")]
    Timeout,
    #[error("postal service answered with status {0}")]
    Status(u16),
    #[error("postal request failed: {0}")]
    Transport(String),
    #[error("postal response could not be parsed: {0}")]
    MalformedBody(String),
}

impl LookupFailure {
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_) | Self::Status(_))
    }
}

/// Resolves a postal code for a city/state pair.
pub trait PostalLookup: Send + Sync {
    fn lookup_zip(
        &self,
        city: &str,
        state: &str,
    ) -> impl Future<Output = Result<String, LookupFailure>> + Send;
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(rename = "post code")]
    post_code: Option<String>,
}

/// Client for the Zippopotam-style `/us/{ST}/{City}` endpoint.
#[derive(Debug, Clone)]
pub struct ZippopotamClient {
    base_url: String,
    client: reqwest::Client,
}

impl ZippopotamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn lookup_url(&self, abbreviation: &str, city: &str) -> Result<Url, LookupFailure> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| LookupFailure::Transport(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| LookupFailure::Transport("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["us", abbreviation, city]);
        Ok(url)
    }
}

impl PostalLookup for ZippopotamClient {
    async fn lookup_zip(&self, city: &str, state: &str) -> Result<String, LookupFailure> {
        let abbreviation = state_abbreviation(state).ok_or_else(|| LookupFailure::UnmappedState {
            state: state.to_string(),
        })?;
        let url = self.lookup_url(abbreviation, city)?;
        debug!(%url, "requesting postal code");

        let response = self.client.get(url).send().await.map_err(|err| {
            let failure = classify_transport_error(&err);
            warn!(city, state, error = %err, "zip fetch failed");
            failure
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupFailure::NotFound {
                city: city.to_string(),
                state: state.to_string(),
            });
        }
        if status != StatusCode::OK {
            warn!(city, state, %status, "zip fetch rejected");
            return Err(LookupFailure::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| classify_transport_error(&err))?;
        first_post_code(&body)?.ok_or_else(|| LookupFailure::NotFound {
            city: city.to_string(),
            state: state.to_string(),
        })
    }
}

fn classify_transport_error(err: &reqwest::Error) -> LookupFailure {
    if err.is_timeout() {
        LookupFailure::Timeout
    } else {
        LookupFailure::Transport(err.to_string())
    }
}

fn first_post_code(body: &str) -> Result<Option<String>, LookupFailure> {
    let parsed: PlacesResponse = serde_json::from_str(body)
        .map_err(|err| LookupFailure::MalformedBody(err.to_string()))?;
    Ok(parsed
        .places
        .into_iter()
        .next()
        .and_then(|place| place.post_code)
        .filter(|code| !code.trim().is_empty()))
}
