use axum::{
    body::Bytes,
    extract::{Query, State},
    http::Uri,
    response::{IntoResponse, Response},
    Extension, Json,
};
use lincsfsd_scraper::ScraperError;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

pub(super) const USAGE_MESSAGE: &str = "This HTTP triggered function executed successfully. Pass a url in the query string or in the request body.";

#[derive(Debug, Deserialize)]
struct SearchParams {
    url: Option<String>,
}

/// `GET|POST /lincolnfsd`: runs one directory search for the `url` given in
/// the query string or a JSON body.
///
/// A missing, empty or unusable `url` answers `200` with [`USAGE_MESSAGE`]
/// rather than an error status.
pub(super) async fn search_directory(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    uri: Uri,
    body: Bytes,
) -> Response {
    let Some(search_url) = requested_url(&uri, &body) else {
        tracing::debug!("no url supplied; returning usage message");
        return USAGE_MESSAGE.into_response();
    };

    match state.client.search(&search_url).await {
        Ok(records) => {
            tracing::info!(records = records.len(), "directory search complete");
            Json(records).into_response()
        }
        Err(ScraperError::InvalidUrl { url, reason }) => {
            tracing::warn!(url = %url, reason = %reason, "unusable search url; returning usage message");
            USAGE_MESSAGE.into_response()
        }
        Err(e) => {
            tracing::error!(url = %search_url, error = %e, "directory search failed");
            ApiError::new(
                req_id.0,
                "upstream_error",
                format!("directory search failed: {e}"),
            )
            .into_response()
        }
    }
}

/// The query string wins; the JSON body is only consulted when the query
/// has no usable `url`.
fn requested_url(uri: &Uri, body: &[u8]) -> Option<String> {
    Query::<SearchParams>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| non_empty(params.url))
        .or_else(|| {
            serde_json::from_slice::<SearchParams>(body)
                .ok()
                .and_then(|params| non_empty(params.url))
        })
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use lincsfsd_scraper::DirectoryClient;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::build_app;

    const LISTING_PATH: &str = "/kb5/lincs/fsd/results.action";

    fn app_for(server: &MockServer) -> Router {
        let client = DirectoryClient::new(
            5,
            "lincsfsd-test/0.1",
            &format!("{}/kb5/lincs/fsd/", server.uri()),
        )
        .expect("client");
        build_app(AppState {
            client: Arc::new(client),
        })
    }

    fn search_target(server: &MockServer) -> String {
        format!("{}{LISTING_PATH}?qt=toddler", server.uri())
    }

    /// Request path with `target` percent-encoded into the `url` parameter.
    fn request_path(route: &str, target: &str) -> String {
        let url = reqwest::Url::parse_with_params(&format!("http://localhost{route}"), [("url", target)])
            .expect("request url");
        format!("{}?{}", url.path(), url.query().unwrap_or_default())
    }

    async fn mount_single_hit(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("nh", "10000"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><body>
                     <div class="result_hit">
                       <header><a href="service.page?id=1">Café Stay &amp; Play</a></header>
                       <span class="comma_split_line">01522 111111</span>
                     </div>
                   </body></html>"#,
                "text/html; charset=utf-8",
            ))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/kb5/lincs/fsd/service.page"))
            .and(query_param("id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><body><div id="main_content"><h1>Café Stay &amp; Play</h1></div></body></html>"#,
                "text/html; charset=utf-8",
            ))
            .mount(server)
            .await;
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[test]
    fn requested_url_prefers_query_over_body() {
        let uri: Uri = "/lincolnfsd?url=https%3A%2F%2Fa.example%2Fr%3Fq%3D1".parse().unwrap();
        let body = br#"{"url":"https://b.example/r?q=2"}"#;
        assert_eq!(
            requested_url(&uri, body).as_deref(),
            Some("https://a.example/r?q=1")
        );
    }

    #[test]
    fn requested_url_falls_back_to_body_when_query_empty() {
        let uri: Uri = "/lincolnfsd?url=".parse().unwrap();
        let body = br#"{"url":" https://b.example/r?q=2 "}"#;
        assert_eq!(
            requested_url(&uri, body).as_deref(),
            Some("https://b.example/r?q=2")
        );
    }

    #[test]
    fn requested_url_ignores_unparseable_body() {
        let uri: Uri = "/lincolnfsd".parse().unwrap();
        assert!(requested_url(&uri, b"url=https://x").is_none());
        assert!(requested_url(&uri, br#"["https://x"]"#).is_none());
        assert!(requested_url(&uri, b"").is_none());
    }

    #[tokio::test]
    async fn missing_url_returns_usage_message() {
        let server = MockServer::start().await;
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri("/lincolnfsd")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, USAGE_MESSAGE);
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn post_without_url_in_body_returns_usage_message() {
        let server = MockServer::start().await;
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/lincolnfsd")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Fred"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, USAGE_MESSAGE);
    }

    #[tokio::test]
    async fn unusable_url_returns_usage_message() {
        let server = MockServer::start().await;
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri(request_path("/lincolnfsd", "not a url"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, USAGE_MESSAGE);
    }

    #[tokio::test]
    async fn get_with_query_url_returns_json_records() {
        let server = MockServer::start().await;
        mount_single_hit(&server).await;

        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri(request_path("/lincolnfsd", &search_target(&server)))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let body = body_string(response).await;
        assert!(body.contains("Café"), "non-ASCII should not be escaped: {body}");

        let json: serde_json::Value = serde_json::from_str(&body).expect("json parse");
        let records = json.as_array().expect("array body");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Service Name"], "Café Stay & Play");
        assert_eq!(records[0]["Telephone"], "01522 111111");
        assert!(records[0]["Email"].is_null());
        assert_eq!(records[0]["Details"]["Title"], "Café Stay & Play");
    }

    #[tokio::test]
    async fn post_with_json_body_url_returns_json_records() {
        let server = MockServer::start().await;
        mount_single_hit(&server).await;

        let body = serde_json::json!({ "url": search_target(&server) }).to_string();
        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/lincolnfsd")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json parse");
        assert_eq!(json.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn empty_listing_returns_empty_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri(request_path("/lincolnfsd", &search_target(&server)))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn upstream_failure_returns_bad_gateway_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = app_for(&server)
            .oneshot(
                Request::builder()
                    .uri(request_path("/lincolnfsd", &search_target(&server)))
                    .header("x-request-id", "search-err-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).expect("json parse");
        assert_eq!(json["error"]["code"], "upstream_error");
        assert_eq!(json["meta"]["request_id"], "search-err-1");
    }
}
