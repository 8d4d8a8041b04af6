#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tefi_api_rust::tefi::{TefiConfig, TefiService};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const REST_PATH: &str = "/service/v4_1/rest.php";
pub const PDF_PATH: &str = "/index.php";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n%%EOF";
pub const EXPIRED_COOKIE: &str = "loginErrorMessage=LBL_SESSION_EXPIRED; path=/";

/// Client for user `svc` / password `secret` pointed at the mock server
pub fn tefi_service(server: &MockServer) -> Result<TefiService> {
    let config = TefiConfig::new(server.uri(), "svc", "secret")?;
    Ok(TefiService::new(config)?)
}

pub fn login_call() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(REST_PATH))
        .and(body_string_contains("method=login"))
}

pub fn logout_call() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(REST_PATH))
        .and(body_string_contains("method=logout"))
}

pub fn pdf_call() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(PDF_PATH))
        .and(query_param("entryPoint", "generatePdf"))
}

pub fn login_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": token,
        "module_name": "Users",
        "name_value_list": {}
    }))
}

pub fn pdf_ok() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/pdf")
        .set_body_bytes(PDF_BYTES)
}

/// What SuiteCRM sends back when the PHP session is gone: a login page plus the error cookie
pub fn pdf_session_expired() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", EXPIRED_COOKIE)
        .insert_header("content-type", "text/html")
        .set_body_string("<html><body>Login</body></html>")
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Result<Vec<Request>> {
    let requests = server
        .received_requests()
        .await
        .context("request recording is disabled")?;
    Ok(requests
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect())
}

pub fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body).into_owned().collect()
}

/// Decoded `rest_data` of an RPC call
pub fn rest_data(request: &Request) -> Result<Value> {
    let fields = form_fields(request);
    let raw = fields.get("rest_data").context("rest_data missing")?;
    Ok(serde_json::from_str(raw)?)
}

pub fn rpc_method(request: &Request) -> Option<String> {
    form_fields(request).get("method").cloned()
}

pub fn cookie_header(request: &Request) -> Option<String> {
    request
        .headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
