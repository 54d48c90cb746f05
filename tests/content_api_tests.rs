mod test_utils;

use portfolio_content::entities::{
    option_fields::OptionField,
    post::UpdatePostRequest,
    skill::SkillCategory,
    translations::Translations,
};
use portfolio_content::repositories::comment::CommentRepository;
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

// ───── Skills ─────

#[actix_rt::test]
async fn skills_are_listed_in_insertion_order_with_logo_urls() {
    let app = TestApp::spawn().await;
    app.create_skill("Rust", "skills/rust.svg", SkillCategory::Web, true).await;
    app.create_skill("Pandas", "skills/pandas.png", SkillCategory::Data, false).await;

    let response = app.get("/api/skills").await;
    assert_eq!(response.status(), StatusCode::OK);

    let skills: Vec<Value> = response.json().await.unwrap();
    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0]["name"], "Rust");
    assert_eq!(skills[0]["logo"], format!("{MEDIA_BASE}skills/rust.svg"));
    assert_eq!(skills[0]["is_key_skill"], true);
    assert_eq!(skills[0]["category"], "WEB");
    assert_eq!(skills[1]["name"], "Pandas");
}

#[actix_rt::test]
async fn skills_can_be_filtered_by_category_and_key_flag() {
    let app = TestApp::spawn().await;
    app.create_skill("Rust", "skills/rust.svg", SkillCategory::Web, true).await;
    app.create_skill("CSS", "skills/css.svg", SkillCategory::Web, false).await;
    app.create_skill("Docker", "skills/docker.svg", SkillCategory::Tools, true).await;

    let web: Vec<Value> = app.get("/api/skills?category=WEB").await.json().await.unwrap();
    assert_eq!(web.len(), 2);

    let key_web: Vec<Value> = app
        .get("/api/skills?category=WEB&key_skill=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(key_web.len(), 1);
    assert_eq!(key_web[0]["name"], "Rust");
}

#[actix_rt::test]
async fn unknown_skill_category_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/skills?category=COOKING").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

// ───── Projects ─────

#[actix_rt::test]
async fn projects_are_listed_newest_first_with_tags() {
    let app = TestApp::spawn().await;
    let rust = app.create_tag("Rust").await;
    app.create_project("First Project", vec![]).await;
    app.create_project("Second Project", vec![rust.id]).await;

    let projects: Vec<Value> = app.get_json("/api/projects").await.as_array().cloned().unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["slug"], "second-project");
    assert_eq!(projects[0]["tags"], json!([{"id": rust.id, "name": "Rust", "slug": "rust"}]));
    assert_eq!(projects[0]["thumbnail"], format!("{MEDIA_BASE}projects/thumb.png"));
    assert_eq!(projects[0]["repo_link"], "https://github.com/me/project");
    assert!(projects[0]["demo_link"].is_null());
    assert_eq!(projects[1]["slug"], "first-project");
    assert_eq!(projects[1]["tags"], json!([]));
}

#[actix_rt::test]
async fn project_detail_by_slug_and_missing_slug() {
    let app = TestApp::spawn().await;
    app.create_project("Data Pipeline", vec![]).await;

    let response = app.get("/api/projects/data-pipeline").await;
    assert_eq!(response.status(), StatusCode::OK);
    let project: Value = response.json().await.unwrap();
    assert_eq!(project["title"], "Data Pipeline");
    assert_eq!(project["category"], "FULL_STACK");
    assert!(project["created_at"].is_string());

    let missing = app.get("/api/projects/nope").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({"error": "Not found"}));
}

#[actix_rt::test]
async fn projects_can_be_filtered_by_tag() {
    let app = TestApp::spawn().await;
    let ml = app.create_tag("Machine Learning").await;
    app.create_project("Classifier", vec![ml.id]).await;
    app.create_project("Website", vec![]).await;

    let tagged: Vec<Value> = app
        .get("/api/projects?tag=machine-learning")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0]["slug"], "classifier");
}

#[actix_rt::test]
async fn same_project_title_twice_conflicts() {
    let app = TestApp::spawn().await;
    app.create_project("Portfolio", vec![]).await;

    let err = app
        .state
        .project_handler
        .create_project(project_request("Portfolio", vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, portfolio_content::errors::AppError::Conflict(_)));
    let listed: Vec<Value> = app.get("/api/projects").await.json().await.unwrap();
    assert_eq!(listed.len(), 1);
}

// ───── Posts & comments ─────

#[actix_rt::test]
async fn hello_world_post_comment_flow() {
    let app = TestApp::spawn().await;
    let post = app.create_post("Hello World", true).await;
    assert_eq!(post.post.slug, "hello-world");

    let response = app
        .post_json(
            "/api/comments",
            &json!({"post": post.post.id, "author_name": "Ana", "body": "Great post!"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let comment: Value = response.json().await.unwrap();
    assert!(comment.get("is_approved").is_none());
    assert!(comment["created_at"].is_string());
    assert_eq!(comment["post"], post.post.id);
    assert_eq!(comment["author_name"], "Ana");

    let detail = app.get_json("/api/posts/hello-world").await;
    assert_eq!(detail["comment_count"], 0);

    let comment_id = comment["id"].as_i64().unwrap();
    app.state.comment_handler.approve_comment(comment_id).await.unwrap();

    let detail = app.get_json("/api/posts/hello-world").await;
    assert_eq!(detail["comment_count"], 1);

    let listed = app.get_json("/api/posts").await;
    assert_eq!(listed[0]["comment_count"], 1);
}

#[actix_rt::test]
async fn comment_count_only_counts_approved_comments() {
    let app = TestApp::spawn().await;
    let post = app.create_post("Counting", true).await;

    let mut ids = Vec::new();
    for author in ["Ana", "Ben", "Cleo"] {
        let comment: Value = app
            .post_json(
                "/api/comments",
                &json!({"post": post.post.id, "author_name": author, "body": "Hi"}),
            )
            .await
            .json()
            .await
            .unwrap();
        ids.push(comment["id"].as_i64().unwrap());
    }
    app.state.comment_handler.approve_comment(ids[0]).await.unwrap();
    app.state.comment_handler.approve_comment(ids[2]).await.unwrap();

    assert_eq!(app.get_json("/api/posts/counting").await["comment_count"], 2);

    app.state.comment_handler.unapprove_comment(ids[0]).await.unwrap();
    assert_eq!(app.get_json("/api/posts/counting").await["comment_count"], 1);
}

#[actix_rt::test]
async fn inactive_posts_are_never_exposed() {
    let app = TestApp::spawn().await;
    app.create_post("Published", true).await;
    app.create_post("Draft", false).await;

    let posts: Vec<Value> = app.get("/api/posts").await.json().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["slug"], "published");

    let draft = app.get("/api/posts/draft").await;
    assert_eq!(draft.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn activating_a_post_makes_it_visible() {
    let app = TestApp::spawn().await;
    let draft = app.create_post("Soon", false).await;
    assert_eq!(app.get("/api/posts/soon").await.status(), StatusCode::NOT_FOUND);

    app.state
        .post_handler
        .update_post(
            draft.post.id,
            UpdatePostRequest { is_active: OptionField::SetToValue(true), ..Default::default() },
        )
        .await
        .unwrap();

    assert_eq!(app.get("/api/posts/soon").await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn posts_are_listed_newest_first_and_filterable_by_tag() {
    let app = TestApp::spawn().await;
    let rust = app.create_tag("Rust").await;
    app.create_post("Older", true).await;
    let mut tagged = post_request("Newer", true);
    tagged.tags = vec![rust.id];
    app.create_post_with(tagged).await;

    let posts: Vec<Value> = app.get("/api/posts").await.json().await.unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
    assert_eq!(posts[0]["tags"][0]["slug"], "rust");

    let filtered: Vec<Value> = app.get("/api/posts?tag=rust").await.json().await.unwrap();
    assert_eq!(filtered.len(), 1);
}

#[actix_rt::test]
async fn deleting_a_post_removes_its_comments() {
    let app = TestApp::spawn().await;
    let post = app.create_post("Short Lived", true).await;
    for author in ["Ana", "Ben"] {
        let response = app
            .post_json(
                "/api/comments",
                &json!({"post": post.post.id, "author_name": author, "body": "Bye"}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    assert_eq!(
        app.state.comment_handler.list_comments(post.post.id, false).await.unwrap().len(),
        2
    );

    app.state.post_handler.delete_post(post.post.id).await.unwrap();

    let remaining = app
        .state
        .comment_handler
        .comment_repo
        .list_comments_for_post(post.post.id, false)
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert_eq!(app.get("/api/posts/short-lived").await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn comment_on_unknown_post_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/comments", &json!({"post": 999, "author_name": "Ana", "body": "Hi"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(error_fields(&body), vec!["post"]);
}

#[actix_rt::test]
async fn comment_with_missing_fields_reports_each_field() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/api/comments", &json!({"body": "  "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_fields(&body), vec!["author_name", "body", "post"]);
}

// ───── Contact ─────

#[actix_rt::test]
async fn contact_message_is_stored_and_echoed() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/contact",
            &json!({"name": "Bob", "email": "bob@example.com", "message": "hi"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Bob");
    assert_eq!(body["email"], "bob@example.com");
    assert_eq!(body["message"], "hi");
    assert!(body["id"].is_i64());
    assert!(body["timestamp"].is_string());

    let stored = app.state.contact_handler.list_contact_messages().await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[actix_rt::test]
async fn contact_with_malformed_email_flags_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/contact",
            &json!({"name": "Bob", "email": "not-an-email", "message": "hi"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_fields(&body), vec!["email"]);
    assert!(app.state.contact_handler.list_contact_messages().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.post_raw("/api/contact", "{\"name\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("JSON"));
}

#[actix_rt::test]
async fn contact_input_is_trimmed_before_validation() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/contact",
            &json!({"name": " Bob ", "email": " bob@example.com ", "message": " hi "}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Bob");
    assert_eq!(body["email"], "bob@example.com");
    assert_eq!(body["message"], "hi");
}

// ───── Timeline & localization ─────

#[actix_rt::test]
async fn timeline_is_ordered_by_order_field() {
    let app = TestApp::spawn().await;
    app.create_event("2021", "Senior", 3, Translations::new()).await;
    app.create_event("2015", "Intern", 1, Translations::new()).await;
    app.create_event("2018-2021", "Developer", 2, Translations::new()).await;

    let events: Vec<Value> = app.get("/api/timeline").await.json().await.unwrap();

    let titles: Vec<_> = events.iter().map(|e| e["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Intern", "Developer", "Senior"]);
    assert_eq!(events[1]["year"], "2018-2021");
    assert_eq!(events[1]["order"], 2);
}

#[actix_rt::test]
async fn translated_fields_follow_the_requested_language() {
    let app = TestApp::spawn().await;
    let overlay = Translations::new().with("es", "title", "Becario");
    app.create_event("2015", "Intern", 1, overlay).await;

    let by_query = app.get_json("/api/timeline?lang=es").await;
    assert_eq!(by_query[0]["title"], "Becario");
    assert_eq!(by_query[0]["description"], "Intern description");

    let by_header: Vec<Value> = app
        .get_with_language("/api/timeline", "es-ES,es;q=0.9,en;q=0.8")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(by_header[0]["title"], "Becario");

    let unsupported = app.get_json("/api/timeline?lang=fr").await;
    assert_eq!(unsupported[0]["title"], "Intern");
}

// ───── Plumbing ─────

#[actix_rt::test]
async fn trailing_slashes_are_accepted() {
    let app = TestApp::spawn().await;
    app.create_post("Slash", true).await;

    assert_eq!(app.get("/api/posts/").await.status(), StatusCode::OK);
    assert_eq!(app.get("/api/posts/slash/").await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn health_reports_store_status() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["version"].is_string());
    assert!(body["uptime"].is_string());
}

#[actix_rt::test]
async fn home_lists_the_public_endpoints() {
    let app = TestApp::spawn().await;

    let body = app.get_json("/").await;

    assert_eq!(body["status"], "Ok");
    assert!(body["endpoints"].as_array().unwrap().iter().any(|e| e == "/api/posts"));
}

#[actix_rt::test]
async fn overlay_with_uppercase_or_regional_keys_is_served() {
    let app = TestApp::spawn().await;
    let mut request = project_request("Hello", vec![]);
    request.translations =
        serde_json::from_value(json!({"ES": {"title": "Hola"}, "pt-BR": {"title": "Olá"}})).unwrap();
    app.state.project_handler.create_project(request).await.unwrap();

    assert_eq!(app.get_json("/api/projects/hello?lang=es").await["title"], "Hola");
    assert_eq!(
        app.get_with_language("/api/projects/hello", "es-MX")
            .await
            .json::<Value>()
            .await
            .unwrap()["title"],
        "Hola"
    );
}
