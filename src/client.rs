use crate::metrics_defs;
use crate::types::ClanRecord;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome taxonomy for a single lookup. `Transport` and `MalformedPayload`
/// are kept apart for diagnosability but both surface as HTTP 400.
///
/// Display strings are load-bearing: callers serialize them verbatim into
/// error bodies, including the historical "this id" wording on tag lookups.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LookupError {
    #[error("No clan was found for this id: {0}")]
    NotFound(String),

    #[error("API Request responded with an error: {0}")]
    UpstreamRejected(String),

    #[error("An Exception was raised during the api request. RequestError: {0}.")]
    Transport(String),

    #[error("An Exception was raised during the api request. MissingKey: {0}.")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the application_id query param; keep it out of
        // error bodies.
        LookupError::Transport(err.without_url().to_string())
    }
}

fn missing(key: impl Into<String>) -> LookupError {
    LookupError::MalformedPayload(key.into())
}

/// Client for the upstream clan API. Stateless apart from the connection
/// pool; safe to clone and share across request handlers.
#[derive(Clone)]
pub struct ClanApi {
    client: reqwest::Client,
    list_url: Url,
    info_url: Url,
    application_id: String,
    timeout: Duration,
}

impl ClanApi {
    pub fn new(
        base_url: &str,
        application_id: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let base = base_url.trim_end_matches('/');
        Ok(ClanApi {
            client: reqwest::Client::new(),
            list_url: Url::parse(&format!("{base}/clans/list/"))?,
            info_url: Url::parse(&format!("{base}/clans/info/"))?,
            application_id: application_id.into(),
            timeout: UPSTREAM_TIMEOUT,
        })
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search the upstream clan list for an exact tag match. The input tag is
    /// uppercased first; upstream search is fuzzy, so candidates are filtered
    /// down to exact matches and the first one wins.
    pub async fn lookup_by_tag(&self, tag: &str) -> Result<ClanRecord, LookupError> {
        let tag = tag.to_uppercase();

        let mut url = self.list_url.clone();
        url.query_pairs_mut()
            .append_pair("application_id", &self.application_id)
            .append_pair("search", &tag)
            .append_pair("fields", "clan_id, tag");

        let body = self.fetch(url).await?;
        let candidates = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| missing("data"))?;

        // Every candidate must carry a tag, even the ones after a match.
        let mut matched = None;
        for candidate in candidates {
            let candidate_tag = candidate.get("tag").ok_or_else(|| missing("tag"))?;
            if matched.is_none() && candidate_tag.as_str() == Some(tag.as_str()) {
                matched = Some(candidate);
            }
        }

        match matched {
            Some(candidate) => {
                let clan_id = candidate
                    .get("clan_id")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| missing("clan_id"))?;
                Ok(ClanRecord::new(clan_id, tag))
            }
            None => Err(LookupError::NotFound(tag)),
        }
    }

    /// Fetch clan info for a numeric id. The upstream keys its response by
    /// the decimal string of the id and reports unknown ids as a null entry
    /// or an empty tag.
    pub async fn lookup_by_id(&self, clan_id: u64) -> Result<ClanRecord, LookupError> {
        let key = clan_id.to_string();

        let mut url = self.info_url.clone();
        url.query_pairs_mut()
            .append_pair("application_id", &self.application_id)
            .append_pair("clan_id", &key)
            .append_pair("fields", "tag");

        let body = self.fetch(url).await?;
        let entry = body
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| missing("data"))?
            .get(&key)
            .ok_or_else(|| missing(key.clone()))?;

        match entry.get("tag").and_then(Value::as_str) {
            Some(tag) if !tag.is_empty() => Ok(ClanRecord::new(clan_id, tag)),
            _ => Err(LookupError::NotFound(key)),
        }
    }

    /// Issue the upstream GET and run the shared envelope checks: non-2xx and
    /// transport failures become `Transport`, a non-"ok" status discriminator
    /// becomes `UpstreamRejected` carrying the upstream's own message.
    async fn fetch(&self, url: Url) -> Result<Value, LookupError> {
        metrics::counter!(metrics_defs::UPSTREAM_REQUESTS.name).increment(1);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;

        let status = body
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("status"))?;
        if status != "ok" {
            let message = body
                .get("error")
                .ok_or_else(|| missing("error"))?
                .get("message")
                .and_then(Value::as_str)
                .ok_or_else(|| missing("message"))?;
            return Err(LookupError::UpstreamRejected(message.to_string()));
        }

        Ok(body)
    }
}
