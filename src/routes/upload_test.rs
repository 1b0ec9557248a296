use super::*;
use crate::state::test_helpers;
use reqwest::multipart::{Form, Part};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nframe";

/// Serve the full router on an ephemeral port and return its base URL.
async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral bind should succeed");
    let addr = listener.local_addr().expect("listener should have an address");
    let app = crate::routes::app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    format!("http://{addr}")
}

fn frame_form(account: &str, index: &str, bytes: &[u8], mime: &str) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name("frame.png")
        .mime_str(mime)
        .expect("mime should parse");
    Form::new()
        .text("accountName", account.to_owned())
        .text("index", index.to_owned())
        .part("file", part)
}

async fn post_form(base: &str, form: Form) -> (reqwest::StatusCode, String) {
    let res = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .expect("request should complete");
    let status = res.status();
    (status, res.text().await.expect("body should be text"))
}

#[test]
fn error_statuses() {
    assert_eq!(upload_error_to_status(&UploadError::NotPng("image/gif".into())), StatusCode::FORBIDDEN);
    assert_eq!(upload_error_to_status(&UploadError::InvalidIndex("12".into())), StatusCode::BAD_REQUEST);
    assert_eq!(upload_error_to_status(&UploadError::MissingField("file")), StatusCode::BAD_REQUEST);
    assert_eq!(
        upload_error_to_status(&UploadError::TooLarge("limit".into())),
        StatusCode::PAYLOAD_TOO_LARGE
    );
    let io = UploadError::Io(std::io::Error::other("disk full"));
    assert_eq!(upload_error_to_status(&io), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upload_error_body(&io), UPLOAD_FAILED);
}

#[tokio::test]
async fn png_upload_is_stored_and_indexed() {
    let (state, _root) = test_helpers::test_app_state();
    let public = state.config.public_dir.clone();
    let base = spawn_app(state).await;

    let (status, body) = post_form(&base, frame_form("alice", "4", PNG_BYTES, "image/png")).await;

    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, UPLOAD_OK);
    assert_eq!(std::fs::read(public.join("alice/f4.png")).unwrap(), PNG_BYTES);

    let raw = std::fs::read_to_string(public.join("accounts.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["accounts"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn non_png_upload_is_forbidden() {
    let (state, _root) = test_helpers::test_app_state();
    let public = state.config.public_dir.clone();
    let temp = state.config.upload_temp_dir.clone();
    let base = spawn_app(state).await;

    let (status, body) = post_form(&base, frame_form("alice", "0", b"GIF89a", "image/gif")).await;

    assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
    assert_eq!(body, UPLOAD_NOT_PNG);
    assert!(!public.join("alice").exists());
    assert!(!public.join("accounts.json").exists());
    assert_eq!(std::fs::read_dir(temp).unwrap().count(), 0);
}

#[tokio::test]
async fn out_of_range_index_is_bad_request() {
    let (state, _root) = test_helpers::test_app_state();
    let public = state.config.public_dir.clone();
    let base = spawn_app(state).await;

    let (status, _) = post_form(&base, frame_form("alice", "12", PNG_BYTES, "image/png")).await;

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert!(!public.join("alice").exists());
}

#[tokio::test]
async fn missing_file_is_bad_request() {
    let (state, _root) = test_helpers::test_app_state();
    let base = spawn_app(state).await;

    let form = Form::new().text("accountName", "alice").text("index", "0");
    let (status, body) = post_form(&base, form).await;

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert!(body.contains("file"));
}

#[tokio::test]
async fn uploaded_frames_are_served_statically() {
    let (state, _root) = test_helpers::test_app_state();
    let base = spawn_app(state).await;

    post_form(&base, frame_form("bob", "7", PNG_BYTES, "image/png")).await;
    post_form(&base, frame_form("carol", "0", PNG_BYTES, "image/png")).await;

    let index: serde_json::Value = reqwest::get(format!("{base}/accounts.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(index["accounts"], serde_json::json!(["bob", "carol"]));

    let frame = reqwest::get(format!("{base}/bob/f7.png")).await.unwrap();
    assert_eq!(frame.status(), reqwest::StatusCode::OK);
    assert_eq!(frame.bytes().await.unwrap().as_ref(), PNG_BYTES);

    let missing = reqwest::get(format!("{base}/bob/f8.png")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn healthz_is_ok() {
    let (state, _root) = test_helpers::test_app_state();
    let base = spawn_app(state).await;

    let res = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn oversized_upload_is_payload_too_large() {
    let (state, _root) = test_helpers::test_app_state();
    let limit = state.config.upload_max_bytes;
    let public = state.config.public_dir.clone();
    let temp = state.config.upload_temp_dir.clone();
    let base = spawn_app(state).await;

    let oversized = vec![0_u8; limit * 2];
    let (status, _) = post_form(&base, frame_form("alice", "0", &oversized, "image/png")).await;

    assert_eq!(status, reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!public.join("alice").exists());
    assert!(std::fs::read_dir(temp).map_or(true, |mut entries| entries.next().is_none()));
}
