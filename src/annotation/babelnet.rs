/*! BabelNet knowledge-base client.

HTTP implementation of [KnowledgeBase] against the BabelNet REST
endpoints: synset existence, lemma search and outgoing hypernym edges.
Shares the Babelfy failure-message classification, since both services
report errors the same way.
!*/
use async_trait::async_trait;
use log::{debug, error};
use oxilangtag::LanguageTag;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::service::{HypernymEdge, KnowledgeBase, QueryError};
use crate::lang;

const BASE_ENDPOINT: &str = "https://babelnet.io/v9/";

/// Relation group of every hypernym-like pointer.
const HYPERNYM_GROUP: &str = "HYPERNYM";
/// Pointer name of the plain hypernym relation.
const HYPERNYM_NAME: &str = "Hypernym";

/// BabelNet-backed knowledge base.
pub struct BabelnetClient {
    client: reqwest::Client,
    base: Url,
    key: String,
}

impl BabelnetClient {
    /// Client against the public BabelNet endpoint.
    pub fn new(key: impl Into<String>) -> Self {
        // the endpoint constant is a valid url
        Self::with_endpoint(key, Url::parse(BASE_ENDPOINT).unwrap())
    }

    /// Client against an arbitrary endpoint, for tests and proxies.
    pub fn with_endpoint(key: impl Into<String>, base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            key: key.into(),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, QueryError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| QueryError::Transient(e.to_string()))?;
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", self.key.as_str())])
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl KnowledgeBase for BabelnetClient {
    async fn resolve(&self, synset_id: &str) -> Result<bool, QueryError> {
        debug!("resolving synset {synset_id}");
        let body = self.get("getSynset", &[("id", synset_id)]).await?;
        parse_synset_exists(&body)
    }

    async fn contains_term(
        &self,
        term: &str,
        lang: &LanguageTag<String>,
    ) -> Result<bool, QueryError> {
        if lang::is_undetermined(lang) {
            error!("cannot look up term [{term}]: language is undetermined");
            return Ok(false);
        }
        let lang_param = lang.primary_language().to_uppercase();
        let body = self
            .get(
                "getSynsetIds",
                &[("lemma", term), ("searchLang", lang_param.as_str())],
            )
            .await?;
        Ok(!parse_synset_ids(&body)?.is_empty())
    }

    async fn hypernym_edges(&self, synset_id: &str) -> Result<Vec<HypernymEdge>, QueryError> {
        let body = self.get("getOutgoingEdges", &[("id", synset_id)]).await?;
        parse_hypernym_edges(&body)
    }
}

#[derive(Debug, Deserialize)]
struct BnEdge {
    pointer: BnPointer,
    target: String,
}

#[derive(Debug, Deserialize)]
struct BnPointer {
    name: String,
    #[serde(rename = "relationGroup")]
    relation_group: String,
}

#[derive(Debug, Deserialize)]
struct BnSynsetId {
    id: String,
}

/// Classify an object body carrying a service `message`, or fall back to
/// a transient failure.
fn service_failure(body: &str) -> QueryError {
    match super::babelfy::parse_disambiguation(body) {
        Err(e) => e,
        // an annotation array is not a valid knowledge-base response
        Ok(_) => QueryError::Transient(format!("unexpected response: {body}")),
    }
}

/// Whether a `getSynset` body describes an existing synset.
pub fn parse_synset_exists(body: &str) -> Result<bool, QueryError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) if obj.contains_key("message") => Err(service_failure(body)),
        Ok(Value::Object(obj)) => Ok(!obj.is_empty()),
        Ok(Value::Null) => Ok(false),
        Ok(_) | Err(_) => Err(QueryError::Transient(format!(
            "unparseable synset response: {body}"
        ))),
    }
}

/// Synset ids from a `getSynsetIds` body.
pub fn parse_synset_ids(body: &str) -> Result<Vec<String>, QueryError> {
    match serde_json::from_str::<Vec<BnSynsetId>>(body) {
        Ok(ids) => Ok(ids.into_iter().map(|s| s.id).collect()),
        Err(_) => Err(service_failure(body)),
    }
}

/// Hypernym edges from a `getOutgoingEdges` body.
///
/// Only edges of the hypernym relation group are kept; the plain
/// `Hypernym` pointer is marked direct, the rest of the group is not.
pub fn parse_hypernym_edges(body: &str) -> Result<Vec<HypernymEdge>, QueryError> {
    match serde_json::from_str::<Vec<BnEdge>>(body) {
        Ok(edges) => Ok(edges
            .into_iter()
            .filter(|e| e.pointer.relation_group == HYPERNYM_GROUP)
            .map(|e| HypernymEdge {
                direct: e.pointer.name == HYPERNYM_NAME,
                target: e.target,
            })
            .collect()),
        Err(_) => Err(service_failure(body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synset_exists() {
        let body = r#"{"id":"bn:00031027n","pos":"NOUN","senses":[{"lemma":"entity"}]}"#;
        assert!(parse_synset_exists(body).unwrap());
        assert!(!parse_synset_exists("{}").unwrap());
        assert!(!parse_synset_exists("null").unwrap());
    }

    #[test]
    fn test_synset_error_message() {
        let body = r#"{"message":"Your key is not valid or the daily requests limit has been reached. Please visit http://babelfy.org."}"#;
        assert_eq!(
            parse_synset_exists(body).unwrap_err(),
            QueryError::QuotaExhausted
        );
    }

    #[test]
    fn test_synset_ids() {
        let body = r#"[{"id":"bn:00015267n","pos":"NOUN","source":"BABELNET"},
                       {"id":"bn:00015268n","pos":"NOUN","source":"BABELNET"}]"#;
        assert_eq!(
            parse_synset_ids(body).unwrap(),
            vec!["bn:00015267n", "bn:00015268n"]
        );
        assert!(parse_synset_ids("[]").unwrap().is_empty());
    }

    #[test]
    fn test_hypernym_edges() {
        let body = r#"[
            {"language":"EN",
             "pointer":{"fSymbol":"@","name":"Hypernym","shortName":"hyper","relationGroup":"HYPERNYM","isAutomatic":false},
             "target":"bn:00015267n","weight":0.0,"normalizedWeight":0.0},
            {"language":"EN",
             "pointer":{"fSymbol":"@i","name":"Instance Hypernym","shortName":"inst-hyper","relationGroup":"HYPERNYM","isAutomatic":false},
             "target":"bn:00031027n","weight":0.0,"normalizedWeight":0.0},
            {"language":"EN",
             "pointer":{"fSymbol":"r","name":"Related","shortName":"related","relationGroup":"OTHER","isAutomatic":false},
             "target":"bn:99999999n","weight":0.0,"normalizedWeight":0.0}
        ]"#;

        let edges = parse_hypernym_edges(body).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges[0].direct);
        assert_eq!(edges[0].target, "bn:00015267n");
        assert!(!edges[1].direct);
    }

    #[test]
    fn test_edges_error_is_classified() {
        let body = r#"{"message":"Your are not allowed on the requested languages. Please visit http://babelfy.org."}"#;
        assert!(matches!(
            parse_hypernym_edges(body).unwrap_err(),
            QueryError::UnsupportedLanguage(_)
        ));
    }
}
