use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Query parameters as sent on the wire
pub type Query = Vec<(&'static str, String)>;

/// The seam between the API client and the network.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (relative to the base URL) and return the JSON body.
    async fn get(&self, path: &str, query: &Query) -> Result<Value>;

    /// One lightweight request to the backend root; `true` only on 200.
    async fn probe(&self) -> bool;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str, request_timeout: Duration, probe_timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent("animestream/0.1")
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn probe(&self) -> bool {
        let url = self.url("/");
        match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                debug!(status = %response.status(), "Backend probe answered");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                debug!(error = %e, "Backend probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response per connection and return the base URL.
    async fn serve_canned(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn transport(base_url: &str) -> HttpTransport {
        HttpTransport::new(base_url, Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_decodes_json_body() {
        let base = serve_canned("200 OK", r#"{"success":true,"data":["Action"]}"#).await;
        let value = transport(&base).get("/genres/", &Vec::new()).await.unwrap();
        assert_eq!(value["data"][0], "Action");
    }

    #[tokio::test]
    async fn test_get_rejects_non_success_status() {
        let base = serve_canned("503 Service Unavailable", "{}").await;
        let err = transport(&base).get("/home/", &Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus(s) if s == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_get_reports_decode_failure() {
        let base = serve_canned("200 OK", "<html>not json</html>").await;
        let err = transport(&base).get("/home/", &Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_probe_requires_200() {
        let up = serve_canned("200 OK", "{}").await;
        assert!(transport(&up).probe().await);

        let missing = serve_canned("404 Not Found", "{}").await;
        assert!(!transport(&missing).probe().await);

        let down = unreachable_base_url().await;
        assert!(!transport(&down).probe().await);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let t = transport("http://localhost:8000/api/v1/");
        assert_eq!(t.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(t.url("/home/"), "http://localhost:8000/api/v1/home/");
    }
}
