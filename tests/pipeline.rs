//! End-to-end checks over a site directory and a mocked Beehiiv API

use devblog_rs::config::{NewsletterConfig, NewsletterCredentials, SiteConfig};
use devblog_rs::content::{FrontMatter, FrontMatterKey};
use devblog_rs::newsletter::{
    BeehiivClient, SignupForm, SignupState, SubscribeOutcome, SubscriptionGateway,
};
use devblog_rs::Site;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site_with_posts(files: &[(&str, &str)]) -> (TempDir, Site) {
    let dir = TempDir::new().unwrap();
    let posts_dir = dir.path().join("public/blog-posts");
    fs::create_dir_all(&posts_dir).unwrap();
    for (name, text) in files {
        fs::write(posts_dir.join(name), text).unwrap();
    }
    let site = Site::new(dir.path()).unwrap();
    (dir, site)
}

#[tokio::test]
async fn test_posts_sorted_by_date() {
    let (_dir, site) = site_with_posts(&[
        ("older.md", "---\ntitle: Older\ndate: 2025-01-10\n---\nBody"),
        ("newer.md", "---\ntitle: Newer\ndate: 2025-01-15\n---\nBody"),
    ]);

    let posts = site.content_loader().unwrap().load_posts().await;
    let dates: Vec<_> = posts.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-01-15", "2025-01-10"]);
}

#[tokio::test]
async fn test_post_without_frontmatter_is_complete() {
    let (_dir, site) = site_with_posts(&[(
        "docker-networking.md",
        "Containers talk to each other over bridge networks.\n\nMore text here.",
    )]);

    let posts = site.content_loader().unwrap().load_posts().await;
    assert_eq!(posts.len(), 1);

    let post = &posts[0];
    assert_eq!(post.id, "docker-networking");
    assert!(!post.title.is_empty());
    assert!(!post.excerpt.is_empty());
    assert!(!post.date.is_empty());
    assert_eq!(post.read_time, "1 min read");
    assert!(post.tags.contains(&"Docker".to_string()));
}

#[tokio::test]
async fn test_missing_manifest_entry_is_skipped() {
    let dir = TempDir::new().unwrap();
    let posts_dir = dir.path().join("posts");
    fs::create_dir_all(&posts_dir).unwrap();
    fs::write(posts_dir.join("a.md"), "# A\n\nFirst.").unwrap();
    fs::write(posts_dir.join("c.md"), "# C\n\nThird.").unwrap();

    let mut config = SiteConfig::default();
    config.content.posts_dir = "posts".to_string();
    config.content.manifest = Some(vec!["a.md".into(), "b.md".into(), "c.md".into()]);
    let site = Site::with_config(dir.path().to_path_buf(), config);

    let posts = site.content_loader().unwrap().load_posts().await;
    assert_eq!(posts.len(), 2);
}

#[tokio::test]
async fn test_load_by_id_falls_back_to_filename_variants() {
    let dir = TempDir::new().unwrap();
    let posts_dir = dir.path().join("public/blog-posts");
    fs::create_dir_all(&posts_dir).unwrap();
    fs::write(posts_dir.join("my_post.md"), "# My Post\n\nHello.").unwrap();

    // The listing knows nothing about the file
    let mut config = SiteConfig::default();
    config.content.manifest = Some(Vec::new());
    let site = Site::with_config(dir.path().to_path_buf(), config);

    let post = site.content_loader().unwrap().load_post("my-post").await.unwrap();
    assert_eq!(post.title, "My Post");
    assert!(site.content_loader().unwrap().load_post("nope").await.is_none());
}

#[test]
fn test_frontmatter_block_reparses() {
    let mut fm = FrontMatter::default();
    fm.set(FrontMatterKey::Title, "Load Balancers: a primer");
    fm.set(FrontMatterKey::Excerpt, "How traffic gets spread");
    fm.set(FrontMatterKey::Date, "2025-02-01");
    fm.set(FrontMatterKey::ReadTime, "7 min read");
    fm.set(FrontMatterKey::Tags, "[Networking, Load Balancer]");

    let text = format!("{}\nBody", fm.to_block());
    let (parsed, body) = FrontMatter::parse(&text);
    assert_eq!(parsed, fm);
    assert_eq!(body, "Body");
}

fn beehiiv_gateway(server: &MockServer) -> SubscriptionGateway {
    let config = NewsletterConfig {
        api_base: server.uri(),
        ..Default::default()
    };
    let client =
        BeehiivClient::new(NewsletterCredentials::new("key", "pub"), &config).unwrap();
    SubscriptionGateway::new(Arc::new(client), &config)
}

#[tokio::test]
async fn test_signup_success_clears_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/publications/pub/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = beehiiv_gateway(&server);
    let mut form = SignupForm::new();
    form.set_email("user@example.com");

    let state = form.submit(&gateway).await.clone();
    assert!(matches!(state, SignupState::Success(_)));
    assert_eq!(form.email(), "");
}

#[tokio::test]
async fn test_signup_already_subscribed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "detail": "Email already exists" }]
        })))
        .mount(&server)
        .await;

    let outcome = beehiiv_gateway(&server).subscribe("user@example.com").await;
    assert!(matches!(outcome, SubscribeOutcome::AlreadySubscribed { .. }));
}

#[tokio::test]
async fn test_empty_email_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = SignupForm::new();
    let state = form.submit(&beehiiv_gateway(&server)).await;
    assert!(matches!(state, SignupState::Error(_)));
}
