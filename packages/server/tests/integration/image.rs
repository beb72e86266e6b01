use serde_json::Value;

use crate::common::{TestApp, routes};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfakepngpayload";
const JPEG_BYTES: &[u8] = b"\xff\xd8\xfffakejpegpayload";

mod image_upload {
    use super::*;

    #[tokio::test]
    async fn upload_stores_record_and_binary() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("lens-test.jpg", "image/jpeg", JPEG_BYTES.to_vec(), None, None)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["original_name"], "lens-test.jpg");
        assert_eq!(res.body["mime_type"], "image/jpeg");
        assert_eq!(res.body["size"].as_i64().unwrap(), JPEG_BYTES.len() as i64);
        assert_eq!(res.body["caption"], Value::Null);
        assert_eq!(res.body["post_id"], Value::Null);

        // The stored name is server-generated, keeps the extension, and
        // is what the url points at.
        let filename = res.body["filename"].as_str().unwrap();
        assert_ne!(filename, "lens-test.jpg");
        assert!(filename.ends_with(".jpg"));
        assert_eq!(res.body["url"], format!("/uploads/{filename}"));

        let (status, bytes) = app.get_bytes(&routes::upload(filename)).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, JPEG_BYTES);

        let id = res.body["id"].as_i64().unwrap();
        let fetched = app.get(&routes::image(id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["filename"], filename);
    }

    #[tokio::test]
    async fn upload_records_caption_and_post_reference() {
        let app = TestApp::spawn().await;
        let post_id = app.create_post("Bokeh Shapes", "optics").await;

        let res = app
            .upload_image(
                "bokeh.png",
                "image/png",
                PNG_BYTES.to_vec(),
                Some("  Aperture blades at f/1.4  "),
                Some(post_id),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["caption"], "Aperture blades at f/1.4");
        assert_eq!(res.body["post_id"].as_i64().unwrap(), post_id);
    }

    #[tokio::test]
    async fn blank_caption_is_stored_as_null() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("plain.png", "image/png", PNG_BYTES.to_vec(), Some("   "), None)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["caption"], Value::Null);
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new().text("caption", "no file here");
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::IMAGES))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart POST request");

        assert_eq!(res.status().as_u16(), 400);
        let body: Value = res.json().await.expect("expected a JSON error body");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_disallowed_mime_type_without_side_effects() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("notes.txt", "text/plain", b"not an image".to_vec(), None, None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        // No record was created.
        let list = app.get(routes::IMAGES).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn rejects_disallowed_extension_even_with_image_mime() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("photo.svg", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn rejects_upload_over_the_size_limit() {
        let app = TestApp::spawn().await;

        let oversized = vec![0u8; 6 * 1024 * 1024];
        let res = app
            .upload_image("huge.jpg", "image/jpeg", oversized, None, None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get(routes::IMAGES).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn accepts_upload_under_the_size_limit() {
        let app = TestApp::spawn().await;

        let large = vec![0u8; 4 * 1024 * 1024];
        let res = app
            .upload_image("large.jpg", "image/jpeg", large, None, None)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["size"].as_i64().unwrap(), 4 * 1024 * 1024);
    }

    #[tokio::test]
    async fn rejects_reference_to_unknown_post() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_image("orphan.png", "image/png", PNG_BYTES.to_vec(), None, Some(777_777))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get(routes::IMAGES).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }
}

mod image_listing {
    use super::*;

    #[tokio::test]
    async fn lists_newest_first() {
        let app = TestApp::spawn().await;
        let first = app
            .upload_image("a.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;
        let second = app
            .upload_image("b.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;

        let res = app.get(routes::IMAGES).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_i64().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![
                second.body["id"].as_i64().unwrap(),
                first.body["id"].as_i64().unwrap()
            ]
        );
    }

    #[tokio::test]
    async fn filters_by_post_reference() {
        let app = TestApp::spawn().await;
        let post_id = app.create_post("Gallery Post", "digital").await;

        let attached = app
            .upload_image("attached.png", "image/png", PNG_BYTES.to_vec(), None, Some(post_id))
            .await;
        app.upload_image("loose.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;

        let res = app
            .get(&format!("{}?postId={post_id}", routes::IMAGES))
            .await;

        assert_eq!(res.status, 200);
        let images = res.body.as_array().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["id"], attached.body["id"]);
    }

    #[tokio::test]
    async fn unknown_post_reference_yields_empty() {
        let app = TestApp::spawn().await;
        app.upload_image("loose.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;

        let res = app.get(&format!("{}?postId=999999", routes::IMAGES)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 0);
    }
}

mod image_retrieval {
    use super::*;

    #[tokio::test]
    async fn get_unknown_id_returns_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image(55_555)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn served_upload_carries_content_type() {
        let app = TestApp::spawn().await;
        let uploaded = app
            .upload_image("headers.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;
        let filename = uploaded.body["filename"].as_str().unwrap();

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::upload(filename)))
            .send()
            .await
            .expect("Failed to send GET request");

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(
            res.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
    }

    #[tokio::test]
    async fn unknown_upload_filename_returns_not_found() {
        let app = TestApp::spawn().await;

        let (status, _) = app.get_bytes(&routes::upload("nope.png")).await;

        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn traversal_style_upload_paths_are_not_served() {
        let app = TestApp::spawn().await;

        let (status, _) = app
            .get_bytes(&routes::upload("..%2F..%2Fetc%2Fpasswd"))
            .await;

        assert_eq!(status, 404);
    }
}

mod image_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_record_and_binary() {
        let app = TestApp::spawn().await;
        let uploaded = app
            .upload_image("gone.png", "image/png", PNG_BYTES.to_vec(), None, None)
            .await;
        let id = uploaded.body["id"].as_i64().unwrap();
        let filename = uploaded.body["filename"].as_str().unwrap().to_string();

        let res = app.delete(&routes::image(id)).await;
        assert_eq!(res.status, 204);
        assert!(res.text.is_empty());

        assert_eq!(app.get(&routes::image(id)).await.status, 404);
        let (status, _) = app.get_bytes(&routes::upload(&filename)).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::image(808_808)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
