use assert_cmd::Command;
use httpmock::MockServer;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const AUTHOR: &str = "0d7e6a55-2b9e-4d2c-8a8f-3f1f8c2f4b11";
const POST: &str = "6f1c1a0e-8a39-4f43-9e55-0b1c4e6b7a10";

fn session_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    let session = json!({
        "access_token": "user-token",
        "refresh_token": "refresh-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 4_102_444_800_i64,
        "user": {
            "id": AUTHOR,
            "email": "ann@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }
    });
    file.write_all(session.to_string().as_bytes())
        .expect("write session");
    file
}

fn blog_cli(url: &str) -> Command {
    let mut cmd = Command::cargo_bin("blog-cli").expect("binary");
    cmd.env("SUPABASE_URL", url)
        .env("SUPABASE_ANON_KEY", "anon-key")
        .env_remove("RUST_LOG");
    cmd
}

fn row(id: String, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": "Body text",
        "created_at": "2024-03-01T10:00:00+00:00",
        "updated_at": null,
        "author_id": AUTHOR,
        "profiles": { "email": "ann@example.com" }
    })
}

#[test]
fn missing_backend_url_fails_fast() {
    let mut cmd = Command::cargo_bin("blog-cli").expect("binary");
    cmd.env_remove("SUPABASE_URL")
        .env("SUPABASE_ANON_KEY", "anon-key")
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("SUPABASE_URL"));
}

#[test]
fn empty_title_is_rejected_without_network() {
    let session = session_file();
    // Ничего не слушает на этом порту: любой запрос завершился бы другой ошибкой
    blog_cli("http://127.0.0.1:9")
        .arg("--session-file")
        .arg(session.path())
        .args(["create", "--title", "", "--content", "Body"])
        .assert()
        .failure()
        .stderr(contains("Title is required"));
}

#[test]
fn list_prints_posts_and_page_window() {
    let server = MockServer::start();
    let rows: Vec<_> = (0..6)
        .map(|i| row(uuid::Uuid::new_v4().to_string(), &format!("Post {}", i)))
        .collect();
    let list = server.mock(|when, then| {
        when.method("GET")
            .path("/rest/v1/blogs")
            .header("range", "0-5");
        then.status(206)
            .header("content-range", "0-5/120")
            .json_body(json!(rows));
    });

    let missing = NamedTempFile::new().expect("tmp");
    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(missing.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Post 0"))
        .stdout(contains("By ann@example.com"))
        .stdout(contains("Page 1 of 20 (120 posts): [1] 2 3 4 5 ... 20"));
    list.assert();
}

#[test]
fn page_past_the_end_names_the_last_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET")
            .path("/rest/v1/blogs")
            .header("range", "144-149");
        then.status(416).header("content-range", "*/120");
    });

    let missing = NamedTempFile::new().expect("tmp");
    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(missing.path())
        .args(["list", "--page", "25"])
        .assert()
        .success()
        .stdout(contains("Page 25 is past the last page (20)"))
        .stdout(contains("No blogs yet").not());
}

#[test]
fn login_writes_session_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST")
            .path("/auth/v1/token")
            .query_param("grant_type", "password");
        then.status(200).json_body(json!({
            "access_token": "fresh-token",
            "refresh_token": "refresh-2",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": AUTHOR,
                "email": "ann@example.com",
                "created_at": "2024-01-01T00:00:00Z"
            }
        }));
    });

    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("session.json");

    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(&path)
        .args(["login", "--email", "ann@example.com", "--password", "secret"])
        .assert()
        .success()
        .stdout(contains("Login successful"));

    let saved = std::fs::read_to_string(&path).expect("session file");
    assert!(saved.contains("fresh-token"));
    assert!(saved.contains("expires_at"));
}

#[test]
fn declined_delete_sends_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/blogs");
        then.status(200).json_body(json!([row(POST.to_string(), "Doomed")]));
    });
    // DELETE не замокан: если бы он ушёл, команда завершилась бы ошибкой

    let session = session_file();
    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(session.path())
        .args(["delete", "--id", POST])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Delete \"Doomed\"?"))
        .stdout(contains("Cancelled"));
}

#[test]
fn confirmed_delete_hits_backend() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/blogs");
        then.status(200).json_body(json!([row(POST.to_string(), "Doomed")]));
    });
    let delete = server.mock(|when, then| {
        when.method("DELETE")
            .path("/rest/v1/blogs")
            .query_param("id", format!("eq.{}", POST))
            .header("authorization", "Bearer user-token");
        then.status(204);
    });

    let session = session_file();
    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(session.path())
        .args(["delete", "--id", POST, "--yes"])
        .assert()
        .success()
        .stdout(contains("Post deleted successfully"));
    delete.assert();
}

#[test]
fn non_author_cannot_update() {
    let server = MockServer::start();
    let mut foreign = row(POST.to_string(), "Not yours");
    foreign["author_id"] = json!("11111111-2222-3333-4444-555555555555");
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/blogs");
        then.status(200).json_body(json!([foreign]));
    });

    let session = session_file();
    blog_cli(&server.base_url())
        .arg("--session-file")
        .arg(session.path())
        .args(["update", "--id", POST, "--title", "Mine now"])
        .assert()
        .failure()
        .stderr(contains("You can only edit your own posts"));
}
