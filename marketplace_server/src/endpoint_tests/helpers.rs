use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use apm_common::Secret;
use log::debug;

use crate::{
    auth::{Role, TokenIssuer},
    config::AuthConfig,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret-do-not-reuse".to_string()) }
}

pub fn issue_token(user_id: i64, roles: Vec<Role>) -> String {
    TokenIssuer::new(&get_auth_config()).issue(user_id, roles).expect("Failed to sign token")
}

/// Runs one request against a service built from `configure`, with the test token issuer installed. A handler
/// error comes back as `Err` with the error's display string, matching what the JSON error body carries.
pub async fn send_request(
    req: TestRequest,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let issuer = TokenIssuer::new(&get_auth_config());
    let app = App::new().app_data(web::Data::new(issuer)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    if let Some(err) = res.error() {
        return Err(err.to_string());
    }
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn get_request(
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    send_request(req, configure).await
}

pub async fn post_request(
    auth_header: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::post().uri(path).set_json(body);
    if !auth_header.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {auth_header}")));
    }
    send_request(req, configure).await
}

/// Serves canned provider responses on a local port, one connection per request. Requests are matched on their
/// request-line prefix (e.g. `"POST /transactions"`) and answered with a 200 carrying the canned body; anything
/// unmatched gets a 503, which is how tests simulate one provider endpoint being down while others work.
pub fn serve_canned_responses(routes: Vec<(&'static str, String)>) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Could not bind a canned-response server");
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        use std::io::Write;
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { return };
            let Some(request) = read_http_request(&mut stream) else { return };
            let (status, body) = match routes.iter().find(|(prefix, _)| request.starts_with(prefix)) {
                Some((_, body)) => ("200 OK", body.as_str()),
                None => ("503 Service Unavailable", r#"{"error":"unavailable"}"#),
            };
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: \
                 close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

// Reads one HTTP/1.1 request off the socket: headers, then exactly content-length bytes of body.
fn read_http_request(stream: &mut std::net::TcpStream) -> Option<String> {
    use std::io::Read;
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    let (head_end, content_length) = loop {
        let n = stream.read(&mut buf).ok().filter(|n| *n > 0)?;
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&raw[..pos]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            break (pos + 4, len);
        }
    };
    while raw.len() < head_end + content_length {
        let n = stream.read(&mut buf).ok().filter(|n| *n > 0)?;
        raw.extend_from_slice(&buf[..n]);
    }
    Some(String::from_utf8_lossy(&raw).into_owned())
}
