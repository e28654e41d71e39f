//! Request forwarding over a pooled hyper client.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use http::{
    HeaderMap, HeaderName, HeaderValue, Request, Response, Uri, header, request::Parts,
};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use crate::error::GatewayError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Connection-scoped headers that must not cross the proxy (RFC 9110 7.6.1).
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, timeout }
    }

    /// Send the request to `base_url` keeping method, path and query.
    ///
    /// # Errors
    /// [`GatewayError::Upstream`] on connect or protocol failure,
    /// [`GatewayError::UpstreamTimeout`] when no response head arrives in time.
    pub async fn forward(
        &self,
        parts: Parts,
        body: Body,
        base_url: &str,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, GatewayError> {
        let uri = upstream_uri(base_url, &parts.uri)?;
        let method = parts.method.clone();

        let mut upstream = Request::from_parts(parts, body);
        *upstream.uri_mut() = uri;
        prepare_request_headers(upstream.headers_mut(), client_addr);

        tracing::debug!(%method, uri = %upstream.uri(), "forwarding request");

        let response = tokio::time::timeout(self.timeout, self.client.request(upstream))
            .await
            .map_err(|_| GatewayError::UpstreamTimeout {
                timeout_ms: self.timeout.as_millis(),
            })?
            .map_err(|e| GatewayError::Upstream {
                message: e.to_string(),
            })?;

        let mut response = response.map(Body::new);
        strip_hop_by_hop(response.headers_mut());
        Ok(response)
    }
}

fn upstream_uri(base_url: &str, original: &Uri) -> Result<Uri, GatewayError> {
    let path_and_query = original
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);
    format!("{}{path_and_query}", base_url.trim_end_matches('/'))
        .parse::<Uri>()
        .map_err(|e| GatewayError::Upstream {
            message: format!("invalid upstream address '{base_url}': {e}"),
        })
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::try_from(name.trim()).ok())
        .collect();

    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    for name in &listed {
        headers.remove(name);
    }
}

/// Drop hop-by-hop headers, move `Host` to `x-forwarded-host` and record
/// the client address. `Authorization` passes through untouched.
fn prepare_request_headers(headers: &mut HeaderMap, client_addr: Option<SocketAddr>) {
    strip_hop_by_hop(headers);

    let host = headers.remove(header::HOST);
    if let Some(host) = host.filter(|_| !headers.contains_key(X_FORWARDED_HOST)) {
        headers.insert(X_FORWARDED_HOST, host);
    }

    if let Some(addr) = client_addr {
        let ip = addr.ip().to_string();
        let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{existing}, {ip}"),
            None => ip,
        };
        if let Ok(v) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, v);
        }
    }

    if !headers.contains_key(X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }
}
