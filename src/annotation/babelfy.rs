/*! Babelfy annotation client.

HTTP implementation of [AnnotationService] against the Babelfy
disambiguation endpoint. The service reports failures as a JSON object
with a `message` field (even with a 200 status), so classification is done
on the message content: the daily-limit message maps to quota exhaustion,
the language-refusal one to an unsupported language, anything else to a
transient failure.
!*/
use async_trait::async_trait;
use log::debug;
use oxilangtag::LanguageTag;
use serde::Deserialize;
use url::Url;

use super::service::{AnnotationService, QueryError, RawAnnotation};

const DISAMBIGUATE_ENDPOINT: &str = "https://babelfy.io/v1/disambiguate";

/// The service messages used for failure classification.
const QUOTA_MESSAGE: &str = "daily requests limit has been reached";
const KEY_MESSAGE: &str = "key is not valid";
const LANGUAGE_MESSAGE: &str = "not allowed on the requested languages";

/// Babelfy-backed annotation service.
pub struct BabelfyClient {
    client: reqwest::Client,
    endpoint: Url,
    key: String,
}

impl BabelfyClient {
    /// Client against the public Babelfy endpoint.
    pub fn new(key: impl Into<String>) -> Self {
        // the endpoint constant is a valid url
        Self::with_endpoint(key, Url::parse(DISAMBIGUATE_ENDPOINT).unwrap())
    }

    /// Client against an arbitrary endpoint, for tests and proxies.
    pub fn with_endpoint(key: impl Into<String>, endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            key: key.into(),
        }
    }
}

#[async_trait]
impl AnnotationService for BabelfyClient {
    async fn annotate(
        &self,
        text: &str,
        lang: &LanguageTag<String>,
    ) -> Result<Vec<RawAnnotation>, QueryError> {
        let lang_param = lang.primary_language().to_uppercase();
        debug!(
            "querying annotation service, lang {lang_param}, {} chars",
            text.chars().count()
        );

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("text", text),
                ("lang", lang_param.as_str()),
                ("key", self.key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_disambiguation(&body).map_err(|e| match e {
            // error bodies may ride on error statuses, keep the richer cause
            QueryError::Transient(msg) if !status.is_success() => {
                QueryError::Transient(format!("status {status}: {msg}"))
            }
            other => other,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BfyAnnotation {
    #[serde(rename = "charFragment")]
    char_fragment: BfyFragment,
    #[serde(rename = "babelSynsetID")]
    babel_synset_id: String,
    #[serde(rename = "globalScore")]
    global_score: f64,
}

#[derive(Debug, Deserialize)]
struct BfyFragment {
    start: usize,
    end: usize,
}

#[derive(Debug, Deserialize)]
struct ServiceMessage {
    message: String,
}

/// Parse a disambiguation response body into raw annotations, or classify
/// the failure it reports.
pub fn parse_disambiguation(body: &str) -> Result<Vec<RawAnnotation>, QueryError> {
    if let Ok(annotations) = serde_json::from_str::<Vec<BfyAnnotation>>(body) {
        return Ok(annotations
            .into_iter()
            .map(|a| RawAnnotation {
                start: a.char_fragment.start,
                end: a.char_fragment.end,
                score: a.global_score,
                synset_id: a.babel_synset_id,
            })
            .collect());
    }

    match serde_json::from_str::<ServiceMessage>(body) {
        Ok(ServiceMessage { message }) => Err(classify_message(&message)),
        Err(_) => Err(QueryError::Transient(format!(
            "unparseable service response: {body}"
        ))),
    }
}

fn classify_message(message: &str) -> QueryError {
    if message.contains(QUOTA_MESSAGE) || message.contains(KEY_MESSAGE) {
        QueryError::QuotaExhausted
    } else if message.contains(LANGUAGE_MESSAGE) {
        QueryError::UnsupportedLanguage(message.to_string())
    } else {
        QueryError::Transient(message.to_string())
    }
}
