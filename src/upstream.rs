//! Outbound HTTP fetch.
//!
//! Exactly one attempt per call. Non-2xx responses come back as `Ok` so the
//! caller can report the upstream status itself.

use reqwest::{Client, Response, header};
use tracing::{debug, warn};

/// Fetch a URL via HTTP GET, optionally sending a `Referer`.
///
/// # Errors
///
/// Returns the [`reqwest::Error`] for network, DNS or URL failures.
pub async fn fetch(
    client: &Client,
    url: &str,
    referer: Option<&str>,
) -> Result<Response, reqwest::Error> {
    let mut request = client.get(url);
    if let Some(referer) = referer {
        request = request.header(header::REFERER, referer);
    }

    let response = request.send().await.map_err(|e| {
        warn!("HTTP fetch failed for {}: {}", url, e);
        e
    })?;

    if response.status().is_success() {
        debug!("HTTP fetch returned {} for {}", response.status(), url);
    } else {
        warn!("HTTP fetch returned {} for {}", response.status(), url);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_success_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = Client::new();
        let response = fetch(&client, &server.uri(), None).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn sends_referer_when_given() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/seg1.ts"))
            .and(header_eq("referer", "https://origin.example.dev/checklist/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let response = fetch(
            &client,
            &format!("{}/seg1.ts", server.uri()),
            Some("https://origin.example.dev/checklist/"),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn non_success_status_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let response = fetch(&client, &server.uri(), None).await.unwrap();
        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        // Bind then drop to get a loopback port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new();
        let result = fetch(&client, &format!("http://{addr}/"), None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_url_is_an_error() {
        let client = Client::new();
        assert!(fetch(&client, "", None).await.is_err());
        assert!(fetch(&client, "not a url", None).await.is_err());
    }
}
