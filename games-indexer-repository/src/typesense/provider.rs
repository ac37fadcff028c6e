//! Typesense provider implementation.
//!
//! This module provides the concrete implementation of `SearchCollectionProvider`
//! using the Typesense HTTP API through `reqwest`.

use async_trait::async_trait;
use games_indexer_shared::GameRecord;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::TypesenseConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchCollectionProvider;
use crate::types::{CollectionInfo, CollectionSchema, ImportSummary, SynonymGroup};
use crate::utils;

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Import action; a document whose id already exists is rejected.
const IMPORT_ACTION: &str = "create";

/// Body of a request.
enum RequestBody {
    Json(Value),
    Lines(String),
}

/// Typesense provider implementation.
///
/// Requests go to the configured nodes in order. A transport error or a 5xx answer
/// moves on to the next node; any other answer is final. There is no sleeping
/// between attempts.
///
/// # Example
///
/// ```ignore
/// use games_indexer_repository::{TypesenseConfig, TypesenseProvider};
///
/// let config = TypesenseConfig::from_env();
/// let provider = TypesenseProvider::new(&config)?;
///
/// let info = provider.retrieve_collection("gog_games").await?;
/// println!("{} documents", info.num_documents);
/// ```
pub struct TypesenseProvider {
    client: Client,
    api_key: String,
    nodes: Vec<Url>,
}

impl TypesenseProvider {
    /// Create a new Typesense provider for the configured nodes.
    ///
    /// # Arguments
    ///
    /// * `config` - API key, node list and connection timeout
    ///
    /// # Returns
    ///
    /// * `Ok(TypesenseProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If no node is configured, a node URL is invalid,
    ///   or the HTTP client cannot be built
    pub fn new(config: &TypesenseConfig) -> Result<Self, SearchIndexError> {
        if config.nodes.is_empty() {
            return Err(SearchIndexError::validation(
                "At least one Typesense node must be configured",
            ));
        }

        let nodes = config
            .nodes
            .iter()
            .map(|node| node.base_url())
            .collect::<Result<Vec<_>, _>>()?;

        let client = Client::builder()
            .connect_timeout(config.connection_timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let node_urls: Vec<&str> = nodes.iter().map(Url::as_str).collect();
        info!(
            nodes = ?node_urls,
            connection_timeout_secs = config.connection_timeout.as_secs(),
            "Created Typesense provider"
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            nodes,
        })
    }

    /// Build the URL of an API path on a node, percent-encoding each segment.
    fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, SearchIndexError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| SearchIndexError::validation(format!("Node URL '{}' cannot be a base", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, trying each node in turn, and return the response body.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<String, SearchIndexError> {
        let mut last_error = None;

        for base in &self.nodes {
            let url = Self::endpoint(base, segments)?;
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(API_KEY_HEADER, &self.api_key)
                .query(query);

            request = match &body {
                Some(RequestBody::Json(value)) => request.json(value),
                Some(RequestBody::Lines(lines)) => request
                    .header(CONTENT_TYPE, "text/plain")
                    .body(lines.clone()),
                None => request,
            };

            match Self::execute(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable_on_next_node() => {
                    warn!(url = %url, error = %e, "Typesense node request failed, trying next node");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| SearchIndexError::connection("No Typesense nodes configured")))
    }

    /// Execute a single request and classify a non-success status.
    async fn execute(request: RequestBuilder) -> Result<String, SearchIndexError> {
        let response = request
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if !status.is_success() {
            debug!(status = %status, body = %body, "Typesense request returned an error");
            return Err(SearchIndexError::from_response(status.as_u16(), &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl SearchCollectionProvider for TypesenseProvider {
    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let body = self.send(Method::GET, &["health"], &[], None).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| SearchIndexError::parse(format!("Invalid health response: {}", e)))?;
        Ok(value.get("ok").and_then(Value::as_bool).unwrap_or(false))
    }

    async fn retrieve_collection(&self, name: &str) -> Result<CollectionInfo, SearchIndexError> {
        let body = self
            .send(Method::GET, &["collections", name], &[], None)
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| SearchIndexError::parse(format!("Invalid collection response: {}", e)))
    }

    async fn delete_collection(&self, name: &str) -> Result<(), SearchIndexError> {
        self.send(Method::DELETE, &["collections", name], &[], None)
            .await?;
        debug!(collection = %name, "Collection deleted");
        Ok(())
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), SearchIndexError> {
        let payload = serde_json::to_value(schema)?;
        self.send(
            Method::POST,
            &["collections"],
            &[],
            Some(RequestBody::Json(payload)),
        )
        .await?;
        debug!(collection = %schema.name, fields = schema.fields.len(), "Collection created");
        Ok(())
    }

    async fn upsert_synonym(
        &self,
        collection: &str,
        synonym: &SynonymGroup,
    ) -> Result<(), SearchIndexError> {
        let payload = serde_json::json!({ "synonyms": synonym.synonyms });
        self.send(
            Method::PUT,
            &["collections", collection, "synonyms", &synonym.id],
            &[],
            Some(RequestBody::Json(payload)),
        )
        .await?;
        debug!(collection = %collection, synonym_id = %synonym.id, "Synonym upserted");
        Ok(())
    }

    async fn import_documents(
        &self,
        collection: &str,
        documents: &[GameRecord],
    ) -> Result<ImportSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(ImportSummary::from_results(Vec::new()));
        }

        let lines = utils::to_jsonl(documents)?;
        let body = self
            .send(
                Method::POST,
                &["collections", collection, "documents", "import"],
                &[("action", IMPORT_ACTION)],
                Some(RequestBody::Lines(lines)),
            )
            .await?;

        let results = utils::parse_import_response(&body)?;
        if results.len() != documents.len() {
            return Err(SearchIndexError::parse(format!(
                "Import returned {} results for {} documents",
                results.len(),
                documents.len()
            )));
        }

        Ok(ImportSummary::from_results(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Node;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn config(nodes: Vec<Node>) -> TypesenseConfig {
        TypesenseConfig {
            api_key: "xyz".to_string(),
            nodes,
            connection_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("http://localhost:8108/").unwrap();

        let url = TypesenseProvider::endpoint(&base, &["collections", "gog games", "synonyms", "one-synonyms"])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8108/collections/gog%20games/synonyms/one-synonyms"
        );
    }

    #[test]
    fn test_endpoint_import_path() {
        let base = Url::parse("https://abc.a1.typesense.net:443/").unwrap();

        let url =
            TypesenseProvider::endpoint(&base, &["collections", "gog_games", "documents", "import"])
                .unwrap();

        assert_eq!(
            url.as_str(),
            "https://abc.a1.typesense.net/collections/gog_games/documents/import"
        );
    }

    #[test]
    fn test_new_requires_nodes() {
        let result = TypesenseProvider::new(&config(Vec::new()));
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[test]
    fn test_new_rejects_invalid_node() {
        let result = TypesenseProvider::new(&config(vec![Node::new("bad host", "8108", "http")]));
        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[test]
    fn test_new_keeps_node_order() {
        let provider = TypesenseProvider::new(&config(vec![
            Node::new("primary.example", "8108", "http"),
            Node::new("localhost", "8108", "http"),
        ]))
        .unwrap();

        assert_eq!(provider.nodes.len(), 2);
        assert_eq!(provider.nodes[0].host_str(), Some("primary.example"));
        assert_eq!(provider.nodes[1].host_str(), Some("localhost"));
    }

    #[tokio::test]
    async fn test_import_empty_batch_skips_request() {
        // Port 9 (discard) is never contacted for an empty batch.
        let provider = TypesenseProvider::new(&config(vec![Node::new("127.0.0.1", "9", "http")]))
            .unwrap();

        let summary = provider
            .import_documents("gog_games", &[])
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
    }

    /// Local HTTP node that answers one connection per scripted response and
    /// returns the raw requests it received.
    async fn stub_node(responses: Vec<(u16, &'static str)>) -> (Node, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        (Node::new("127.0.0.1", port.to_string(), "http"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    /// A node address nothing listens on.
    async fn closed_node() -> Node {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Node::new("127.0.0.1", port.to_string(), "http")
    }

    fn request_body(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }

    #[tokio::test]
    async fn test_retrieve_fails_over_on_server_error() {
        let (first, first_requests) = stub_node(vec![(503, r#"{"message": "Not Ready or Lagging"}"#)]).await;
        let (second, second_requests) =
            stub_node(vec![(200, r#"{"name": "gog_games", "num_documents": 3}"#)]).await;
        let provider = TypesenseProvider::new(&config(vec![first, second])).unwrap();

        let info = provider.retrieve_collection("gog_games").await.unwrap();

        assert_eq!(info.num_documents, 3);
        let first_requests = first_requests.await.unwrap();
        let second_requests = second_requests.await.unwrap();
        assert!(first_requests[0].starts_with("GET /collections/gog_games HTTP/1.1\r\n"));
        assert!(second_requests[0].starts_with("GET /collections/gog_games HTTP/1.1\r\n"));
        assert!(second_requests[0].to_lowercase().contains("x-typesense-api-key: xyz\r\n"));
    }

    #[tokio::test]
    async fn test_retrieve_fails_over_on_connection_error() {
        let (node, requests) = stub_node(vec![(200, r#"{"name": "gog_games"}"#)]).await;
        let provider = TypesenseProvider::new(&config(vec![closed_node().await, node])).unwrap();

        let info = provider.retrieve_collection("gog_games").await.unwrap();

        assert_eq!(info.name, "gog_games");
        assert_eq!(info.num_documents, 0);
        assert_eq!(requests.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_nodes_failing_returns_last_error() {
        let (node, _requests) = stub_node(vec![(500, "internal")]).await;
        let provider = TypesenseProvider::new(&config(vec![closed_node().await, node])).unwrap();

        let err = provider.retrieve_collection("gog_games").await.unwrap_err();

        assert!(matches!(err, SearchIndexError::RequestFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_not_found_is_final() {
        let (node, requests) = stub_node(vec![(404, r#"{"message": "Not Found"}"#)]).await;
        // A retry would hit the closed node and surface a connection error instead.
        let provider = TypesenseProvider::new(&config(vec![node, closed_node().await])).unwrap();

        let err = provider.retrieve_collection("gog_games").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(requests.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_unauthorized() {
        let (node, requests) = stub_node(vec![(
            401,
            r#"{"message": "Forbidden - a valid `x-typesense-api-key` header must be sent."}"#,
        )])
        .await;
        let provider = TypesenseProvider::new(&config(vec![node, closed_node().await])).unwrap();
        let schema = CollectionSchema {
            name: "gog_games".to_string(),
            fields: Vec::new(),
        };

        let err = provider.create_collection(&schema).await.unwrap_err();

        match err {
            SearchIndexError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("Forbidden"));
            }
            other => panic!("unexpected error: {}", other),
        }
        let request = &requests.await.unwrap()[0];
        assert!(request.starts_with("POST /collections HTTP/1.1\r\n"));
        assert_eq!(
            serde_json::from_str::<Value>(request_body(request)).unwrap(),
            serde_json::json!({"name": "gog_games", "fields": []})
        );
    }

    #[tokio::test]
    async fn test_create_conflict_is_already_exists() {
        let (node, _requests) = stub_node(vec![(
            409,
            r#"{"message": "A collection with name `gog_games` already exists."}"#,
        )])
        .await;
        let provider = TypesenseProvider::new(&config(vec![node])).unwrap();
        let schema = CollectionSchema {
            name: "gog_games".to_string(),
            fields: Vec::new(),
        };

        let err = provider.create_collection(&schema).await.unwrap_err();

        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_upsert_synonym_request() {
        let (node, requests) = stub_node(vec![(200, r#"{"id": "versus-synonyms"}"#)]).await;
        let provider = TypesenseProvider::new(&config(vec![node])).unwrap();

        provider
            .upsert_synonym("gog_games", &SynonymGroup::new("versus-synonyms", &["versus", "vs"]))
            .await
            .unwrap();

        let request = &requests.await.unwrap()[0];
        assert!(request.starts_with("PUT /collections/gog_games/synonyms/versus-synonyms HTTP/1.1\r\n"));
        assert_eq!(
            serde_json::from_str::<Value>(request_body(request)).unwrap(),
            serde_json::json!({"synonyms": ["versus", "vs"]})
        );
    }

    #[tokio::test]
    async fn test_import_sends_jsonl_with_create_action() {
        let (node, requests) = stub_node(vec![(
            200,
            "{\"success\":true}\n{\"success\":false,\"error\":\"Field `amount` has been declared in the schema, but is not found in the document.\",\"document\":\"{\\\"title\\\":\\\"Bar\\\"}\"}",
        )])
        .await;
        let provider = TypesenseProvider::new(&config(vec![node])).unwrap();
        let documents = vec![
            GameRecord {
                title: Some("Foo".to_string()),
                amount: Some(9.99),
                ..Default::default()
            },
            GameRecord {
                title: Some("Bar".to_string()),
                ..Default::default()
            },
        ];

        let summary = provider
            .import_documents("gog_games", &documents)
            .await
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.results[1].error.as_deref().unwrap().contains("amount"));
        assert_eq!(summary.results[1].document.as_deref(), Some(r#"{"title":"Bar"}"#));

        let request = &requests.await.unwrap()[0];
        assert!(request.starts_with(
            "POST /collections/gog_games/documents/import?action=create HTTP/1.1\r\n"
        ));
        assert!(request.to_lowercase().contains("content-type: text/plain\r\n"));
        let lines: Vec<Value> = request_body(request)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![
                serde_json::json!({"title": "Foo", "amount": 9.99}),
                serde_json::json!({"title": "Bar"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_import_result_count_mismatch() {
        let (node, _requests) = stub_node(vec![(200, r#"{"success":true}"#)]).await;
        let provider = TypesenseProvider::new(&config(vec![node])).unwrap();
        let documents = vec![GameRecord::default(), GameRecord::default()];

        let err = provider
            .import_documents("gog_games", &documents)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchIndexError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (node, requests) = stub_node(vec![(200, r#"{"ok": true}"#)]).await;
        let provider = TypesenseProvider::new(&config(vec![node])).unwrap();

        assert!(provider.health_check().await.unwrap());
        assert!(requests.await.unwrap()[0].starts_with("GET /health HTTP/1.1\r\n"));
    }
}
