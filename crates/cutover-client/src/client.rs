//! HTTP control-plane client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use http_body_util::{BodyExt, Full};
use serde::Serialize;
use tracing::debug;

use cutover_core::{
    Availability, ControlPlane, ControlPlaneError, PlaneResult, Release, ReleaseHistory,
    ReleaseRef, Revision, TrafficRoute, Variant,
};

#[derive(Serialize)]
struct ApplyRequest {
    revision: Revision,
}

#[derive(Serialize)]
struct RoutePatch {
    selector: Variant,
}

/// Client for the control plane's REST surface. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    /// Control-plane address (`host:port`).
    endpoint: String,
    /// Budget for a single request.
    timeout: Duration,
}

impl HttpControlPlane {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn release_path(release: &ReleaseRef) -> String {
        format!(
            "/v1/namespaces/{}/releases/{}",
            release.namespace, release.name
        )
    }

    /// One request over a fresh connection, bounded by the client timeout.
    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> PlaneResult<Bytes> {
        let uri = format!("http://{}{path}", self.endpoint);
        debug!(%method, %uri, "control-plane request");

        let request = async {
            let stream = tokio::net::TcpStream::connect(&self.endpoint)
                .await
                .map_err(|e| ControlPlaneError::Unreachable(e.to_string()))?;

            let io = hyper_util::rt::TokioIo::new(stream);
            let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
                .await
                .map_err(|e| ControlPlaneError::Unreachable(e.to_string()))?;

            // Drive the connection in the background.
            tokio::spawn(async move {
                let _ = conn.await;
            });

            let mut builder = http::Request::builder()
                .method(method)
                .uri(&uri)
                .header("host", &self.endpoint)
                .header("user-agent", "cutover/0.1")
                .header("accept", "application/json");
            if body.is_some() {
                builder = builder.header("content-type", "application/json");
            }
            let req = builder
                .body(Full::new(Bytes::from(body.unwrap_or_default())))
                .map_err(|e| ControlPlaneError::Protocol(e.to_string()))?;

            let resp = sender
                .send_request(req)
                .await
                .map_err(|e| ControlPlaneError::Unreachable(e.to_string()))?;

            let status = resp.status();
            let bytes = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| ControlPlaneError::Protocol(e.to_string()))?
                .to_bytes();

            if status.is_success() {
                Ok(bytes)
            } else if status == http::StatusCode::NOT_FOUND {
                Err(ControlPlaneError::NotFound(path.to_string()))
            } else {
                let detail = String::from_utf8_lossy(&bytes);
                Err(ControlPlaneError::Rejected(format!(
                    "{status}: {}",
                    detail.trim()
                )))
            }
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ControlPlaneError::Unreachable(format!(
                "request timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> PlaneResult<T> {
        let bytes = self.send(Method::GET, path, None).await?;
        serde_json::from_slice(&bytes).map_err(|e| ControlPlaneError::Protocol(e.to_string()))
    }

    fn encode<T: Serialize>(value: &T) -> PlaneResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| ControlPlaneError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl ReleaseHistory for HttpControlPlane {
    async fn release(&self, release: &ReleaseRef) -> PlaneResult<Release> {
        self.get_json(&Self::release_path(release)).await
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn apply_revision(&self, release: &ReleaseRef, revision: Revision) -> PlaneResult<()> {
        let path = format!("{}/apply", Self::release_path(release));
        let body = Self::encode(&ApplyRequest { revision })?;
        self.send(Method::POST, &path, Some(body)).await?;
        Ok(())
    }

    async fn availability(&self, release: &ReleaseRef) -> PlaneResult<Availability> {
        let path = format!("{}/availability", Self::release_path(release));
        self.get_json(&path).await
    }

    async fn traffic_route(&self, release: &ReleaseRef) -> PlaneResult<TrafficRoute> {
        let path = format!("{}/route", Self::release_path(release));
        self.get_json(&path).await
    }

    async fn patch_traffic_route(&self, release: &ReleaseRef, target: Variant) -> PlaneResult<()> {
        let path = format!("{}/route", Self::release_path(release));
        let body = Self::encode(&RoutePatch { selector: target })?;
        self.send(Method::PATCH, &path, Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// True once `data` holds the full request head plus declared body.
    fn request_complete(data: &[u8]) -> bool {
        let text = String::from_utf8_lossy(data);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text
            .lines()
            .take_while(|line| !line.is_empty())
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        data.len() >= head_end + 4 + content_length
    }

    /// Serve one scripted response and capture the raw request bytes.
    async fn fixture(response: &'static str) -> (String, Arc<Mutex<Vec<u8>>>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_writer = Arc::clone(&captured);
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let mut data = Vec::new();
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        data.extend_from_slice(&buf[..n]);
                        if request_complete(&data) {
                            break;
                        }
                    }
                }
            }
            captured_writer.lock().expect("capture lock").extend(data);
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        (addr.to_string(), captured)
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn fetches_and_decodes_a_release() {
        let body = r#"{
            "name": "api",
            "namespace": "staging",
            "current_revision": 5,
            "history": [{"revision": 4, "manifest_ref": "sha256:aaa"}],
            "health": {"address": "10.0.0.7:8000", "path": "/health/ready"}
        }"#;
        let response = json_response(body);
        let response: &'static str = Box::leak(response.into_boxed_str());
        let (addr, captured) = fixture(response).await;

        let plane = HttpControlPlane::new(addr);
        let release = plane
            .release(&ReleaseRef::new("staging", "api"))
            .await
            .unwrap();

        assert_eq!(release.current_revision, 5);
        assert_eq!(release.history.len(), 1);
        let request = String::from_utf8(captured.lock().unwrap().clone()).unwrap();
        assert!(request.starts_with("GET "));
        assert!(request.contains("/v1/namespaces/staging/releases/api"));
    }

    #[tokio::test]
    async fn http_404_maps_to_not_found() {
        let (addr, _) = fixture(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let plane = HttpControlPlane::new(addr);
        let err = plane
            .release(&ReleaseRef::new("staging", "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ControlPlaneError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_2xx_maps_to_rejected() {
        let (addr, _) = fixture(
            "HTTP/1.1 409 Conflict\r\ncontent-length: 6\r\nconnection: close\r\n\r\ndrift\n",
        )
        .await;

        let plane = HttpControlPlane::new(addr);
        let err = plane
            .apply_revision(&ReleaseRef::new("staging", "api"), 4)
            .await
            .unwrap_err();
        match err {
            ControlPlaneError::Rejected(detail) => assert!(detail.contains("409")),
            other => panic!("expected Rejected, got {other}"),
        }
    }

    #[tokio::test]
    async fn patch_sends_selector_body() {
        let (addr, captured) = fixture(
            "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let plane = HttpControlPlane::new(addr);
        plane
            .patch_traffic_route(&ReleaseRef::new("staging", "api"), Variant::Green)
            .await
            .unwrap();

        let request = String::from_utf8(captured.lock().unwrap().clone()).unwrap();
        assert!(request.starts_with("PATCH "));
        assert!(request.contains("/v1/namespaces/staging/releases/api/route"));
        assert!(request.contains(r#"{"selector":"green"}"#));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_precondition_error() {
        // Port 1 won't be listening.
        let plane = HttpControlPlane::new("127.0.0.1:1");
        let err = plane
            .release(&ReleaseRef::new("staging", "api"))
            .await
            .unwrap_err();
        assert!(matches!(err, ControlPlaneError::Unreachable(_)));
    }
}
