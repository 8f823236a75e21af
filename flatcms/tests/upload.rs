// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::cookie::Cookie;
use actix_web::{http::StatusCode, test};
use common::{body_text, location};
use flatcms::util::TestConfigBuilder;

const BOUNDARY: &str = "----flatcms-test-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(cookie: Cookie<'static>, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload")
        .cookie(cookie)
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

fn image_names(harness: &common::TestHarness) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(&harness.app_state.runtime_paths.images_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[actix_web::test]
async fn upload_form_lists_allowed_types() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/upload")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("name=\"image\""));
    assert!(html.contains("multipart/form-data"));
}

#[actix_web::test]
async fn upload_stores_png() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(cookie.clone(), multipart_body("image", "cat.png", PNG_BYTES));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(std::fs::read(harness.image_path("cat.png")).unwrap(), PNG_BYTES);
    assert_eq!(image_names(&harness), vec!["cat.png".to_string()]);

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("cat.png has been uploaded."));
    assert!(html.contains("href=\"/cat.png\""));
}

#[actix_web::test]
async fn upload_strips_client_directories() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(
        cookie.clone(),
        multipart_body("image", "/home/me/dog.jpg", b"jpeg-ish"),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(image_names(&harness), vec!["dog.jpg".to_string()]);

    // Quoted header values escape backslashes, so a Windows path arrives as `\\`.
    let req = upload_request(
        cookie,
        multipart_body("image", r"C:\\Users\\me\\cat.png", b"png-ish"),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        image_names(&harness),
        vec!["cat.png".to_string(), "dog.jpg".to_string()]
    );
}

#[actix_web::test]
async fn upload_rejects_disallowed_extension() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(cookie, multipart_body("image", "evil.exe", b"MZ\x90\x00"));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("Only .jpeg, .png, .gif, .jpg files can be uploaded."));
    assert!(image_names(&harness).is_empty());
}

#[actix_web::test]
async fn upload_without_file_is_rejected() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(cookie, multipart_body("other", "cat.png", PNG_BYTES));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("Choose an image to upload."));
    assert!(image_names(&harness).is_empty());
}

#[actix_web::test]
async fn upload_over_limit_is_rejected() {
    let config = TestConfigBuilder::new().with_upload_limit_mb(1).build();
    let harness = common::TestHarness::with_config(config).await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let oversized = vec![0u8; 1024 * 1024 + 1];
    let req = upload_request(cookie, multipart_body("image", "huge.png", &oversized));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("huge.png is larger than the 1 MB upload limit."));
    assert!(image_names(&harness).is_empty());
}

#[actix_web::test]
async fn upload_keeps_existing_image_when_overwrite_disabled() {
    let config = TestConfigBuilder::new().with_upload_overwrite(false).build();
    let harness = common::TestHarness::with_config(config).await;
    harness.fixture.write_image("cat.png", b"original").unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(cookie, multipart_body("image", "cat.png", PNG_BYTES));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("cat.png already exists."));
    assert_eq!(std::fs::read(harness.image_path("cat.png")).unwrap(), b"original");
}

#[actix_web::test]
async fn upload_replaces_existing_image_by_default() {
    let harness = common::TestHarness::new().await;
    harness.fixture.write_image("cat.png", b"original").unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = upload_request(cookie, multipart_body("image", "cat.png", PNG_BYTES));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(std::fs::read(harness.image_path("cat.png")).unwrap(), PNG_BYTES);
}
