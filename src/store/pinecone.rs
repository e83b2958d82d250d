use super::{log_fragments, QueryMatch, RetrievedFragment, Retriever};
use crate::backend::{base_url, build_client, send_json};
use crate::config::IndexConfig;
use crate::error::{Error, Provider, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2024-07";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Clone, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Pinecone index handle bound to one data plane host
pub struct PineconeIndex {
    client: Client,
    host: Url,
    api_key: String,
    name: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Connect using config, resolving the host through the control plane
    /// unless one is configured
    pub async fn connect(config: &IndexConfig, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = build_client(timeout)?;

        let host = match &config.host {
            Some(host) => host.clone(),
            None => describe_host(&client, &config.control_url, &config.name, api_key).await?,
        };

        let index = Self::with_client(client, &host, config, api_key)?;
        info!("Connected to index {} at {}", index.name, index.host);
        Ok(index)
    }

    /// Create a handle for a known data plane host
    pub fn new(host: &str, config: &IndexConfig, api_key: &str, timeout: Duration) -> Result<Self> {
        Self::with_client(build_client(timeout)?, host, config, api_key)
    }

    fn with_client(client: Client, host: &str, config: &IndexConfig, api_key: &str) -> Result<Self> {
        Ok(Self {
            client,
            host: host_url(host)?,
            api_key: api_key.to_string(),
            name: config.name.clone(),
            namespace: config.namespace.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        authorized(request, &self.api_key)
    }
}

#[async_trait]
impl Retriever for PineconeIndex {
    async fn retrieve(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedFragment>> {
        if top_k == 0 {
            return Err(Error::Config("top_k must be >= 1".to_string()));
        }

        debug!("Querying index {} for top {} matches", self.name, top_k);

        let url = self
            .host
            .join("query")
            .map_err(|e| Error::Config(format!("Invalid index host: {}", e)))?;
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response: QueryResponse = send_json(
            Provider::Index,
            self.authorized(self.client.post(url).json(&request)),
        )
        .await?;
        debug!("Index returned {} matches", response.matches.len());

        let fragments = response
            .matches
            .into_iter()
            .take(top_k)
            .map(RetrievedFragment::try_from)
            .collect::<Result<Vec<_>>>()?;

        log_fragments(&fragments);
        Ok(fragments)
    }
}

fn authorized(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request
        .header("Api-Key", api_key)
        .header(API_VERSION_HEADER, API_VERSION)
}

/// Look up the data plane host of an index by name
async fn describe_host(
    client: &Client,
    control_url: &str,
    name: &str,
    api_key: &str,
) -> Result<String> {
    let base = base_url(control_url)
        .map_err(|e| Error::Config(format!("Invalid index control URL: {}", e)))?;
    let url = base
        .join(&format!("indexes/{}", name))
        .map_err(|e| Error::Config(format!("Invalid index name '{}': {}", name, e)))?;

    debug!("Resolving host for index {} via {}", name, url);
    let described: DescribeIndexResponse =
        send_json(Provider::Index, authorized(client.get(url), api_key)).await?;
    Ok(described.host)
}

/// Hosts are reported without a scheme; default to https
fn host_url(host: &str) -> Result<Url> {
    let host = host.trim();
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    base_url(&with_scheme).map_err(|e| Error::Config(format!("Invalid index host '{}': {}", host, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index_config() -> IndexConfig {
        IndexConfig::default()
    }

    fn index(server: &MockServer) -> PineconeIndex {
        PineconeIndex::new(&server.uri(), &index_config(), "pc-test", Duration::from_secs(5))
            .unwrap()
    }

    fn matches(texts: &[&str]) -> serde_json::Value {
        let matches: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                json!({
                    "id": format!("frag-{}", i),
                    "score": 0.9 - i as f32 * 0.1,
                    "metadata": {"text": t}
                })
            })
            .collect();
        json!({"matches": matches, "namespace": ""})
    }

    #[test]
    fn test_host_url_adds_scheme() {
        assert_eq!(
            host_url("rag-demo-abc.svc.pinecone.io").unwrap().as_str(),
            "https://rag-demo-abc.svc.pinecone.io/"
        );
        assert_eq!(
            host_url("http://127.0.0.1:9000/").unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );
        assert_eq!(
            host_url("http://127.0.0.1:9000/proxy/pinecone")
                .unwrap()
                .join("query")
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9000/proxy/pinecone/query"
        );
    }

    #[tokio::test]
    async fn test_retrieve_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("api-key", "pc-test"))
            .and(body_partial_json(json!({
                "vector": [0.5, 0.25],
                "topK": 3,
                "includeMetadata": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches(&[
                "Team A won the final match.",
                "The event was held in May.",
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let fragments = index(&server).retrieve(&[0.5, 0.25], 3).await.unwrap();
        let texts: Vec<_> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Team A won the final match.", "The event was held in May."]
        );
        assert_eq!(fragments[0].id, "frag-0");
    }

    #[tokio::test]
    async fn test_retrieve_never_exceeds_top_k() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(matches(&["a", "b", "c", "d", "e"])),
            )
            .mount(&server)
            .await;

        let index = index(&server);
        for k in 1..=3 {
            let fragments = index.retrieve(&[1.0], k).await.unwrap();
            assert_eq!(fragments.len(), k);
            assert_eq!(fragments[0].text, "a");
        }
    }

    #[tokio::test]
    async fn test_retrieve_fewer_than_k_and_namespace() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(json!({"namespace": "stories"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = index_config();
        config.namespace = Some("stories".to_string());
        let index =
            PineconeIndex::new(&server.uri(), &config, "pc-test", Duration::from_secs(5)).unwrap();

        assert!(index.retrieve(&[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_service_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"message": "unavailable"})),
            )
            .mount(&server)
            .await;

        match index(&server).retrieve(&[1.0], 3).await.unwrap_err() {
            Error::Provider { provider, message } => {
                assert_eq!(provider, Provider::Index);
                assert!(message.contains("503"));
                assert!(message.contains("unavailable"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retrieve_zero_k_rejected() {
        let server = MockServer::start().await;
        let err = index(&server).retrieve(&[1.0], 0).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_connect_resolves_host() {
        let data_plane = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches(&["resolved"])))
            .mount(&data_plane)
            .await;

        let control_plane = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/indexes/rag-demo"))
            .and(header("api-key", "pc-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "rag-demo",
                "dimension": 1536,
                "metric": "cosine",
                "host": data_plane.uri()
            })))
            .expect(1)
            .mount(&control_plane)
            .await;

        let mut config = index_config();
        config.control_url = control_plane.uri();

        let index = PineconeIndex::connect(&config, "pc-test", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(index.name(), "rag-demo");

        let fragments = index.retrieve(&[1.0], 1).await.unwrap();
        assert_eq!(fragments[0].text, "resolved");
    }

    #[tokio::test]
    async fn test_connect_unknown_index() {
        let control_plane = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/indexes/rag-demo"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "NOT_FOUND", "message": "Resource rag-demo not found"}
            })))
            .mount(&control_plane)
            .await;

        let mut config = index_config();
        config.control_url = control_plane.uri();

        let err = PineconeIndex::connect(&config, "pc-test", Duration::from_secs(5))
            .await
            .err()
            .expect("unknown index should fail");
        assert_eq!(err.provider_kind(), Some(Provider::Index));
        assert!(err.to_string().contains("not found"));
    }
}
