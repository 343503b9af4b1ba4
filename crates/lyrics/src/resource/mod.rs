// ABOUTME: Resource handling module for fetching lyrics pages and search API responses.
// ABOUTME: Handles HTTP fetching with SSRF protection, content-length limits, refusal detection and charset decoding.

pub mod request;

use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};

use crate::error::LyricsError;

pub use request::Request;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Options for fetching a resource.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub allow_private_networks: bool,
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as UTF-8 text, using the charset from the content-type header.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            const RANGES: &[&str] = &[
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "127.0.0.0/8",
                "169.254.0.0/16",
            ];
            RANGES
                .iter()
                .filter_map(|r| r.parse::<Ipv4Net>().ok())
                .any(|net| net.contains(ip))
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() {
                return true;
            }
            // Unique local fc00::/7, link-local fe80::/10
            ["fc00::/7", "fe80::/10"]
                .iter()
                .filter_map(|r| r.parse::<Ipv6Net>().ok())
                .any(|net| net.contains(ip))
        }
    }
}

/// Reject URLs whose host is, or resolves to, a private address.
async fn check_public_host(url: &str, target: &url::Url, what: &str) -> Result<(), LyricsError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(LyricsError::ssrf(
                url,
                "Fetch",
                Some(anyhow::anyhow!("{} private IP addresses is not allowed", what)),
            ));
        }
        return Ok(());
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        LyricsError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed: {}", e)),
        )
    })?;

    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(LyricsError::ssrf(
                url,
                "Fetch",
                Some(anyhow::anyhow!("{} private IP addresses is not allowed", what)),
            ));
        }
    }
    Ok(())
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Fetch a resource from the given URL.
///
/// 403 and 429 responses are reported as `NotAllowed`: the site refused us
/// rather than failing.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, LyricsError> {
    if url.is_empty() {
        return Err(LyricsError::invalid_url(url, "Fetch", None));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        LyricsError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(LyricsError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        check_public_host(url, &parsed_url, "requests to").await?;
    }

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            LyricsError::timeout(url, "Fetch", Some(anyhow::anyhow!("request timed out: {}", e)))
        } else {
            LyricsError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
        }
    })?;

    if !opts.allow_private_networks {
        let final_url = response.url().clone();
        check_public_host(url, &final_url, "redirect to").await?;
    }

    let content_length = response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    });

    if let Some(len) = content_length {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(LyricsError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    if status == 403 || status == 429 {
        return Err(LyricsError::not_allowed(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    let body = response.bytes().await.map_err(|e| {
        LyricsError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(LyricsError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        return Err(LyricsError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    Ok(FetchResult {
        status,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn create_test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    fn local_opts() -> FetchOptions {
        FetchOptions {
            allow_private_networks: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/test");
            then.status(200)
                .header("content-type", "text/plain; charset=utf-8")
                .body("hello");
        });

        let client = create_test_client();
        let result = fetch(&client, &server.url("/test"), &local_opts()).await;
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.status, 200);
        assert_eq!(result.text_utf8(), "hello");
    }

    #[tokio::test]
    async fn test_fetch_sends_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/h").header("x-token", "abc");
            then.status(200).body("ok");
        });

        let client = create_test_client();
        let mut opts = local_opts();
        opts.headers.insert("x-token".to_string(), "abc".to_string());

        let result = fetch(&client, &server.url("/h"), &opts).await;
        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_non_200_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/notfound");
            then.status(404).body("not found");
        });

        let client = create_test_client();
        let result = fetch(&client, &server.url("/notfound"), &local_opts()).await;
        mock.assert();

        let err = result.expect_err("should fail on 404");
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_forbidden_is_not_allowed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/blocked");
            then.status(403).body("go away");
        });

        let client = create_test_client();
        let err = fetch(&client, &server.url("/blocked"), &local_opts())
            .await
            .expect_err("403 should be refused");
        mock.assert();
        assert!(err.is_not_allowed());
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_is_not_allowed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow-down");
            then.status(429);
        });

        let client = create_test_client();
        let err = fetch(&client, &server.url("/slow-down"), &local_opts())
            .await
            .expect_err("429 should be refused");
        assert!(err.is_not_allowed());
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_scheme() {
        let client = create_test_client();
        let err = fetch(&client, "ftp://example.com/file", &local_opts())
            .await
            .expect_err("ftp is not fetched");
        assert!(err.is_invalid_url());

        let err = fetch(&client, "", &local_opts())
            .await
            .expect_err("empty url");
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn test_private_ip_block() {
        let server = MockServer::start();

        let client = create_test_client();
        let opts = FetchOptions::default();

        let url = format!("http://127.0.0.1:{}/test", server.port());
        let err = fetch(&client, &url, &opts)
            .await
            .expect_err("should fail on private IP");
        assert!(err.is_ssrf());
    }

    #[test]
    fn test_max_content_length_constant() {
        assert_eq!(MAX_CONTENT_LENGTH, 10 * 1024 * 1024);
    }

    #[test]
    fn test_decode_iso_8859_1_with_chardetng() {
        let iso_bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_body(iso_bytes, None);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_is_private_ip_v4() {
        assert!(is_private_ip(&"10.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"172.16.0.1".parse().unwrap()));
        assert!(is_private_ip(&"192.168.255.255".parse().unwrap()));
        assert!(is_private_ip(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"169.254.0.1".parse().unwrap()));

        assert!(!is_private_ip(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_ip(&"172.32.0.1".parse().unwrap()));
    }

    #[test]
    fn test_is_private_ip_v6() {
        assert!(is_private_ip(&"::1".parse().unwrap()));
        assert!(is_private_ip(&"fd00::1".parse().unwrap()));
        assert!(is_private_ip(&"fe80::1".parse().unwrap()));
        assert!(!is_private_ip(&"2001:4860:4860::8888".parse().unwrap()));
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_decode_body_with_charset() {
        let decoded = decode_body("hello world".as_bytes(), Some("text/plain; charset=utf-8"));
        assert_eq!(decoded, "hello world");
    }
}
