use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::RequestError;

/// A mailbox label exactly as the endpoint returned it.
pub type Label = Value;

pub type LabelsResult = Result<Vec<Label>, RequestError>;

/// Human-readable name for a label of unknown shape.
///
/// Strings are shown as-is, objects by their `name` field when it is a
/// string, anything else as compact JSON.
pub fn display_name(label: &Label) -> String {
    match label {
        Value::String(name) => name.clone(),
        Value::Object(fields) => match fields.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => label.to_string(),
        },
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct LabelsClient {
    client: Client,
    url: String,
}

impl LabelsClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the labels endpoint and decode its JSON array body.
    ///
    /// Non-2xx responses fail with the status reason phrase as the message.
    pub async fn fetch_labels(&self) -> LabelsResult {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(status_text(status)));
        }

        let labels: Vec<Label> = response.json().await?;
        Ok(labels)
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

/// Spawn the one-shot label fetch.
///
/// The result arrives on the returned receiver. Once `cancel` fires the
/// in-flight request is dropped and nothing is ever sent, so the receiver
/// reports a closed channel instead.
pub fn spawn_loader(
    client: LabelsClient,
    cancel: CancellationToken,
) -> oneshot::Receiver<LabelsResult> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        info!(url = %client.url(), "fetching labels");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("label fetch cancelled");
                return;
            }
            result = client.fetch_labels() => result,
        };

        match &result {
            Ok(labels) => info!(count = labels.len(), "labels fetched"),
            Err(err) => warn!(error = %err, "label fetch failed"),
        }

        if cancel.is_cancelled() {
            debug!("label fetch cancelled after completion, dropping result");
            return;
        }
        let _ = tx.send(result);
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_labels_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/gmail")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["INBOX","SENT"]"#)
            .create_async()
            .await;

        let client = LabelsClient::new(&format!("{}/api/gmail", server.url()));
        let labels = client.fetch_labels().await.unwrap();

        assert_eq!(labels, vec![json!("INBOX"), json!("SENT")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_labels_server_error_uses_status_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/gmail")
            .with_status(500)
            .create_async()
            .await;

        let client = LabelsClient::new(&format!("{}/api/gmail", server.url()));
        let err = client.fetch_labels().await.unwrap_err();

        assert_eq!(err.message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_fetch_labels_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/gmail")
            .with_status(404)
            .create_async()
            .await;

        let client = LabelsClient::new(&format!("{}/api/gmail", server.url()));
        let err = client.fetch_labels().await.unwrap_err();

        assert_eq!(err.message(), "Not Found");
    }

    #[tokio::test]
    async fn test_fetch_labels_rejects_non_array_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/gmail")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"labels":["INBOX"]}"#)
            .create_async()
            .await;

        let client = LabelsClient::new(&format!("{}/api/gmail", server.url()));
        let err = client.fetch_labels().await.unwrap_err();

        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_labels_connection_refused() {
        // Grab a free port, then close it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = LabelsClient::new(&format!("http://{}/api/gmail", addr));
        let err = client.fetch_labels().await.unwrap_err();

        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn test_with_timeout_gives_up_on_silent_server() {
        // Accepts connections at the OS level but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let url = format!("http://{}/labels", addr);
        let client = LabelsClient::with_timeout(&url, Duration::from_millis(100)).unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(5), client.fetch_labels()).await;

        let err = outcome.expect("configured timeout was not applied").unwrap_err();
        assert!(!err.message().is_empty());
        drop(listener);
    }

    #[tokio::test]
    async fn test_spawn_loader_delivers_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/labels")
            .with_status(200)
            .with_body(r#"[{"id":"Label_1","name":"Work"}]"#)
            .create_async()
            .await;

        let client = LabelsClient::new(&format!("{}/labels", server.url()));
        let rx = spawn_loader(client, CancellationToken::new());

        let labels = rx.await.unwrap().unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(display_name(&labels[0]), "Work");
    }

    #[tokio::test]
    async fn test_spawn_loader_cancelled_before_start_sends_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = LabelsClient::new("http://127.0.0.1:1/labels");
        let rx = spawn_loader(client, cancel);

        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn test_spawn_loader_cancelled_in_flight_sends_nothing() {
        // Accepts connections at the OS level but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let cancel = CancellationToken::new();
        let client = LabelsClient::new(&format!("http://{}/labels", addr));
        let rx = spawn_loader(client, cancel.clone());

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx).await.unwrap();
        assert!(outcome.is_err());
        drop(listener);
    }

    #[test]
    fn test_display_name_shapes() {
        assert_eq!(display_name(&json!("INBOX")), "INBOX");
        assert_eq!(display_name(&json!({"id": "L1", "name": "Work"})), "Work");
        assert_eq!(display_name(&json!({"id": "L1"})), r#"{"id":"L1"}"#);
        assert_eq!(display_name(&json!(42)), "42");
    }
}
