//! Display service adapter

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::Deserialize;
use reqwest::Url;
use serde_json::{json, Value};
use todoscreens_core::{DisplayNode, DisplaySink, Layout, SourceError};
use tracing::{debug, info};

const SERVICE: &str = "syncsign";

/// Display service settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncSignConfig {
    /// API key, embedded in the request path
    pub token: String,
    /// REST API root
    pub base_url: String,
    /// Model tag of the nodes to draw on
    pub model: String,
}

impl Default for SyncSignConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: "https://api.sync-sign.com/v2".to_string(),
            model: todoscreens_core::orchestrator::DEFAULT_NODE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeListResponse {
    data: Vec<NodeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    node_id: String,
    model: String,
}

/// Check a render acknowledgement
///
/// The service answers `{"data": {<item>: {"posted": true}, ...}}`; anything
/// else, including an empty map, means the render was not queued.
pub fn check_render_ack(body: &Value) -> ClientResult<()> {
    let shape_error = |detail: String| ClientError::Shape {
        service: SERVICE,
        detail,
    };
    let entries = body
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| shape_error(format!("missing data map in {body}")))?;
    if entries.is_empty() {
        return Err(shape_error(format!("empty acknowledgement {body}")));
    }
    let posted = json!({"posted": true});
    if entries.values().all(|entry| entry == &posted) {
        Ok(())
    } else {
        Err(shape_error(format!("bad acknowledgement {body}")))
    }
}

/// Client for the display service REST API
#[derive(Debug, Clone)]
pub struct SyncSignClient {
    client: reqwest::Client,
    key_url: Url,
}

impl SyncSignClient {
    /// Build the HTTP client and the per-key API root
    pub fn new(config: &SyncSignConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?;
        let base_url = |detail: String| ClientError::BaseUrl {
            url: config.base_url.clone(),
            detail,
        };
        let base = Url::parse(&config.base_url).map_err(|e| base_url(e.to_string()))?;
        let key_url = join_segments(&base, &["key", config.token.as_str()])
            .ok_or_else(|| base_url("cannot be a base".to_string()))?;
        Ok(Self { client, key_url })
    }

    /// `segments` appended to the key URL, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        join_segments(&self.key_url, segments).ok_or_else(|| ClientError::BaseUrl {
            url: self.key_url.to_string(),
            detail: "cannot be a base".to_string(),
        })
    }

    /// All nodes registered to the key
    pub async fn node_list(&self) -> ClientResult<Vec<DisplayNode>> {
        let response = self
            .client
            .get(self.endpoint(&["nodes"])?)
            .send()
            .await?;
        let body = Self::read_ok(response).await?;
        let list: NodeListResponse = serde_json::from_value(body).map_err(|e| ClientError::Shape {
            service: SERVICE,
            detail: e.to_string(),
        })?;
        let nodes: Vec<DisplayNode> = list
            .data
            .into_iter()
            .map(|n| DisplayNode::new(n.node_id, n.model))
            .collect();
        debug!(count = nodes.len(), "Listed display nodes");
        Ok(nodes)
    }

    /// Push `layout` to the screen of `node_id`
    pub async fn node_draw(&self, node_id: &str, layout: &Layout) -> ClientResult<()> {
        let node = node_id.to_lowercase();
        let url = self.endpoint(&["nodes", node.as_str(), "renders"])?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "layout": layout.export() }))
            .send()
            .await?;
        let body = Self::read_ok(response).await?;
        check_render_ack(&body)?;
        info!(node_id, "Render accepted");
        Ok(())
    }

    async fn read_ok(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Shape {
            service: SERVICE,
            detail: e.to_string(),
        })
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

#[async_trait]
impl DisplaySink for SyncSignClient {
    async fn node_list(&self) -> Result<Vec<DisplayNode>, SourceError> {
        Ok(SyncSignClient::node_list(self).await?)
    }

    async fn node_draw(&self, node_id: &str, layout: &Layout) -> Result<(), SourceError> {
        Ok(SyncSignClient::node_draw(self, node_id, layout).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_ack_accepts_posted_items() {
        let body = json!({"data": {"a": {"posted": true}, "b": {"posted": true}}});
        assert!(check_render_ack(&body).is_ok());
    }

    #[test]
    fn test_ack_rejects_unposted_item() {
        let body = json!({"data": {"a": {"posted": true}, "b": {"posted": false}}});
        assert_matches!(check_render_ack(&body), Err(ClientError::Shape { .. }));
    }

    #[test]
    fn test_ack_rejects_empty_or_missing_data() {
        assert_matches!(
            check_render_ack(&json!({"data": {}})),
            Err(ClientError::Shape { .. })
        );
        assert_matches!(
            check_render_ack(&json!({"code": 500})),
            Err(ClientError::Shape { .. })
        );
    }

    fn client(base_url: &str, token: &str) -> SyncSignClient {
        SyncSignClient::new(&SyncSignConfig {
            token: token.to_string(),
            base_url: base_url.to_string(),
            ..SyncSignConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("https://api.sync-sign.com/v2/", "k3y");
        assert_eq!(
            client.endpoint(&["nodes"]).unwrap().as_str(),
            "https://api.sync-sign.com/v2/key/k3y/nodes"
        );
        assert_eq!(
            client
                .endpoint(&["nodes", "0bb1", "renders"])
                .unwrap()
                .as_str(),
            "https://api.sync-sign.com/v2/key/k3y/nodes/0bb1/renders"
        );
    }

    #[test]
    fn test_key_is_one_path_segment() {
        let client = client("https://api.sync-sign.com/v2", "a/b?c#d");
        let url = client.endpoint(&["nodes"]).unwrap();
        assert_eq!(url.path(), "/v2/key/a%2Fb%3Fc%23d/nodes");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let config = |base_url: &str| SyncSignConfig {
            base_url: base_url.to_string(),
            ..SyncSignConfig::default()
        };
        assert_matches!(
            SyncSignClient::new(&config("not a url")),
            Err(ClientError::BaseUrl { .. })
        );
        assert_matches!(
            SyncSignClient::new(&config("mailto:ops@example.com")),
            Err(ClientError::BaseUrl { .. })
        );
    }

    #[test]
    fn test_ack_rejects_extra_fields() {
        let body = json!({"data": {"a": {"posted": true, "queued": 2}}});
        assert_matches!(check_render_ack(&body), Err(ClientError::Shape { .. }));
    }
}
