// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use common::{body_text, location, session_cookie};

#[actix_web::test]
async fn index_lists_documents_and_images() {
    let harness = common::TestHarness::new().await;
    harness.write_document("about.md", "# About");
    harness.write_document("history.txt", "1993");
    harness.fixture.write_image("logo.png", b"png").unwrap();
    std::fs::create_dir_all(harness.document_path("drafts")).unwrap();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("about.md"));
    assert!(html.contains("history.txt"));
    assert!(html.contains("logo.png"));
    assert!(!html.contains("drafts"));
    assert!(!html.contains("/about.md/edit"));
}

#[actix_web::test]
async fn index_shows_controls_when_signed_in() {
    let harness = common::TestHarness::new().await;
    harness.write_document("about.md", "# About");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("Signed in as admin."));
    assert!(html.contains("/about.md/edit"));
    assert!(html.contains("/about.md/delete"));
    assert!(html.contains("href=\"/new\""));
}

#[actix_web::test]
async fn markdown_document_renders_as_html() {
    let harness = common::TestHarness::new().await;
    harness.write_document("about.md", "# Hi\n\nSome *text*.");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/about.md").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<h1>Hi</h1>"));
    assert!(html.contains("<em>text</em>"));
}

#[actix_web::test]
async fn plain_text_document_is_escaped() {
    let harness = common::TestHarness::new().await;
    harness.write_document("notes.txt", "<b>bold</b> & more");
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/notes.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("&lt;b&gt;bold&lt;&#x2f;b&gt;") || html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!html.contains("<b>bold</b>"));
}

#[actix_web::test]
async fn html_document_is_sanitized() {
    let harness = common::TestHarness::new().await;
    harness.write_document(
        "page.html",
        "<p>Safe</p><script>alert('x')</script>",
    );
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/page.html").to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("<p>Safe</p>"));
    assert!(!html.contains("alert('x')"));
}

#[actix_web::test]
async fn missing_document_redirects_with_flash_once() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/nope.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp, &harness).expect("flash session cookie");

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(cookie.clone())
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("nope.txt does not exist."));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(!html.contains("nope.txt does not exist."));
}

#[actix_web::test]
async fn subdirectories_are_reported_missing() {
    let harness = common::TestHarness::new().await;
    std::fs::create_dir(harness.document_path("nested")).unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    for (method, uri) in [
        (test::TestRequest::get(), "/nested"),
        (test::TestRequest::post(), "/nested/duplicate"),
    ] {
        let req = method.uri(uri).cookie(cookie.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&resp), "/", "{uri}");

        let req = test::TestRequest::get()
            .uri("/")
            .cookie(cookie.clone())
            .to_request();
        let html = body_text(test::call_service(&app, req).await).await;
        assert!(html.contains("nested does not exist."), "{uri}");
    }
    assert!(!harness.document_path("copy_nested").exists());
}

#[actix_web::test]
async fn insert_image_into_missing_document_is_not_found() {
    let harness = common::TestHarness::new().await;
    harness.fixture.write_image("cat.png", b"png").unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/missing.txt/insert-image")
        .cookie(cookie.clone())
        .set_form([("image", "cat.png")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("missing.txt does not exist."));
    assert!(!html.contains("Images can only be inserted"));
}

#[actix_web::test]
async fn edit_form_shows_contents() {
    let harness = common::TestHarness::new().await;
    harness.write_document("changes.txt", "original");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/changes.txt/edit")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Edit the contents of changes.txt:"));
    assert!(html.contains("original"));
    assert!(!html.contains("Insert an image"));
}

#[actix_web::test]
async fn saving_changes_updates_document() {
    let harness = common::TestHarness::new().await;
    harness.write_document("changes.txt", "original");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/changes.txt/edit")
        .cookie(cookie.clone())
        .set_form([("file_contents", "new content")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(cookie.clone())
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("changes.txt has been updated."));

    let req = test::TestRequest::get().uri("/changes.txt").to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("new content"));
    assert_eq!(harness.read_document("changes.txt").as_deref(), Some("new content"));
}

#[actix_web::test]
async fn saving_missing_document_does_not_create_it() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/ghost.txt/edit")
        .cookie(cookie)
        .set_form([("file_contents", "boo")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(harness.read_document("ghost.txt").is_none());
}

#[actix_web::test]
async fn create_adds_default_extension() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie.clone())
        .set_form([("new_document", "todo")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(harness.read_document("todo.txt").as_deref(), Some(""));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("todo.txt has been created."));
}

#[actix_web::test]
async fn create_then_view_markdown() {
    let harness = common::TestHarness::new().await;
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie.clone())
        .set_form([("new_document", "about.md")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let req = test::TestRequest::post()
        .uri("/about.md/edit")
        .cookie(cookie)
        .set_form([("file_contents", "# Hi")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let req = test::TestRequest::get().uri("/about.md").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<h1>Hi</h1>"));
}

#[actix_web::test]
async fn create_rejects_blank_and_duplicate_names() {
    let harness = common::TestHarness::new().await;
    harness.write_document("taken.txt", "mine");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie.clone())
        .set_form([("new_document", "   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("A name is required."));

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie.clone())
        .set_form([("new_document", "taken.txt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("taken.txt already exists."));
    assert_eq!(harness.read_document("taken.txt").as_deref(), Some("mine"));

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie)
        .set_form([("new_document", "../escape.txt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!harness.app_state.runtime_paths.root.join("escape.txt").exists());
}

#[actix_web::test]
async fn image_names_cannot_become_documents() {
    let harness = common::TestHarness::new().await;
    harness.write_document("notes.txt", "text");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/create")
        .cookie(cookie.clone())
        .set_form([("new_document", "pic.png")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("pic.png is an image name."));
    assert!(!harness.document_path("pic.png").exists());

    let req = test::TestRequest::post()
        .uri("/notes.txt/rename")
        .cookie(cookie)
        .set_form([("new_name", "notes.jpg")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("notes.jpg is an image name."));
    assert_eq!(harness.read_document("notes.txt").as_deref(), Some("text"));
    assert!(!harness.document_path("notes.jpg").exists());
}

#[actix_web::test]
async fn delete_removes_document() {
    let harness = common::TestHarness::new().await;
    harness.write_document("test.txt", "bye");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/test.txt/delete")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!harness.document_path("test.txt").exists());

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("test.txt has been deleted."));
    assert!(!html.contains("href=\"/test.txt\""));

    let req = test::TestRequest::get().uri("/test.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn mutating_routes_require_sign_in() {
    let harness = common::TestHarness::new().await;
    harness.write_document("test.txt", "keep me");
    harness.fixture.write_image("cat.png", b"png").unwrap();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post().uri("/test.txt/delete").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(harness.read_document("test.txt").as_deref(), Some("keep me"));

    let cookie = session_cookie(&resp, &harness).expect("flash session cookie");
    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("You must be signed in to do that."));

    let post_routes = [
        "/test.txt/edit",
        "/test.txt/duplicate",
        "/test.txt/rename",
        "/test.txt/insert-image",
        "/create",
        "/upload",
    ];
    for uri in post_routes {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_form([
                ("file_contents", "overwritten"),
                ("new_name", "other.txt"),
                ("new_document", "other.txt"),
                ("image", "cat.png"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&resp), "/", "{uri}");
    }
    for uri in ["/new", "/upload", "/test.txt/edit", "/test.txt/rename"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(location(&resp), "/", "{uri}");
    }

    assert_eq!(
        dir_names(&harness.app_state.runtime_paths.data_dir),
        vec!["test.txt".to_string()]
    );
    assert_eq!(harness.read_document("test.txt").as_deref(), Some("keep me"));
    assert_eq!(
        dir_names(&harness.app_state.runtime_paths.images_dir),
        vec!["cat.png".to_string()]
    );
}

fn dir_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[actix_web::test]
async fn duplicate_copies_content() {
    let harness = common::TestHarness::new().await;
    harness.write_document("about.md", "# Same");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/about.md/duplicate")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(harness.read_document("copy_about.md").as_deref(), Some("# Same"));
    assert_eq!(harness.read_document("about.md").as_deref(), Some("# Same"));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("about.md has been duplicated as copy_about.md."));
}

#[actix_web::test]
async fn rename_moves_document() {
    let harness = common::TestHarness::new().await;
    harness.write_document("old.txt", "moving");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/old.txt/rename")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("value=\"old.txt\""));

    let req = test::TestRequest::post()
        .uri("/old.txt/rename")
        .cookie(cookie.clone())
        .set_form([("new_name", "new.txt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(harness.read_document("old.txt").is_none());
    assert_eq!(harness.read_document("new.txt").as_deref(), Some("moving"));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("old.txt has been renamed to new.txt."));
}

#[actix_web::test]
async fn rename_onto_existing_document_is_rejected() {
    let harness = common::TestHarness::new().await;
    harness.write_document("a.txt", "a");
    harness.write_document("b.txt", "b");
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/a.txt/rename")
        .cookie(cookie)
        .set_form([("new_name", "b.txt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("b.txt already exists."));
    assert_eq!(harness.read_document("a.txt").as_deref(), Some("a"));
    assert_eq!(harness.read_document("b.txt").as_deref(), Some("b"));
}

#[actix_web::test]
async fn insert_image_appends_markdown_reference() {
    let harness = common::TestHarness::new().await;
    harness.write_document("post.md", "# Post");
    harness.fixture.write_image("cat.png", b"png").unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/post.md/edit")
        .cookie(cookie.clone())
        .to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("Insert an image"));
    assert!(html.contains("<option value=\"cat.png\">"));

    let req = test::TestRequest::post()
        .uri("/post.md/insert-image")
        .cookie(cookie.clone())
        .set_form([("image", "cat.png")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(
        harness.read_document("post.md").as_deref(),
        Some("# Post\n![cat.png](/images/cat.png)\n")
    );

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("cat.png has been inserted into post.md."));
}

#[actix_web::test]
async fn insert_image_into_plain_text_is_rejected() {
    let harness = common::TestHarness::new().await;
    harness.write_document("notes.txt", "plain");
    harness.fixture.write_image("cat.png", b"png").unwrap();
    let cookie = harness.signed_in_cookie().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::post()
        .uri("/notes.txt/insert-image")
        .cookie(cookie.clone())
        .set_form([("image", "cat.png")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(harness.read_document("notes.txt").as_deref(), Some("plain"));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let html = body_text(test::call_service(&app, req).await).await;
    assert!(html.contains("Images can only be inserted into Markdown or HTML documents."));
}

#[actix_web::test]
async fn image_page_and_asset_are_served() {
    let harness = common::TestHarness::new().await;
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    harness.fixture.write_image("cat.png", &png).unwrap();
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/cat.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("src=\"/images/cat.png\""));

    let req = test::TestRequest::get().uri("/images/cat.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "image/png"
    );

    let req = test::TestRequest::get().uri("/images/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_route_is_not_found() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get().uri("/a/b/c/d").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
