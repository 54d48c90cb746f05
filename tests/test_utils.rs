#![allow(dead_code)]

use std::net::TcpListener;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_content::{
    entities::{
        post::{NewPostRequest, PostView},
        project::{NewProjectRequest, ProjectView},
        skill::{NewSkillRequest, Skill, SkillCategory},
        tag::{NewTagRequest, Tag},
        timeline::{NewTimelineEventRequest, TimelineEvent},
        translations::Translations,
    },
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, StoreKind},
    shared_repos::SharedRepositories,
    AppState,
};
use reqwest::{Client, Response};
use serde_json::Value;

pub const MEDIA_BASE: &str = "https://cdn.example.com/media/";

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        store: StoreKind::Memory,
        worker_count: 1,
        media_base_url: MEDIA_BASE.into(),
        default_language: "en".into(),
        languages: vec!["en".into(), "es".into()],
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub address: String,
    pub state: web::Data<AppState>,
    pub client: Client,
}

impl TestApp {
    /// Serves the full route table on a random port over a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(), SharedRepositories::in_memory()).await
    }

    pub async fn spawn_with(config: AppConfig, repos: SharedRepositories) -> Self {
        let state = web::Data::new(AppState::new(&config, repos).expect("Failed to build app state"));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .workers(1)
        .listen(listener)
        .expect("Failed to listen")
        .run();

        actix_rt::spawn(server);

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            state,
            client: Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_with_language(&self, path: &str, accept_language: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .header("Accept-Language", accept_language)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        self.get(path).await.json().await.expect("Response was not JSON")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    // ───── Seeding through the administrative use cases ─────

    pub async fn create_tag(&self, name: &str) -> Tag {
        self.state
            .tag_handler
            .create_tag(NewTagRequest::named(name))
            .await
            .expect("Failed to create tag")
    }

    pub async fn create_skill(&self, name: &str, logo: &str, category: SkillCategory, key: bool) -> Skill {
        self.state
            .skill_handler
            .create_skill(NewSkillRequest {
                name: Some(name.into()),
                logo: Some(logo.into()),
                is_key_skill: key,
                category,
            })
            .await
            .expect("Failed to create skill")
    }

    pub async fn create_project(&self, title: &str, tags: Vec<i64>) -> ProjectView {
        self.state
            .project_handler
            .create_project(project_request(title, tags))
            .await
            .expect("Failed to create project")
    }

    pub async fn create_post(&self, title: &str, active: bool) -> PostView {
        self.create_post_with(post_request(title, active)).await
    }

    pub async fn create_post_with(&self, request: NewPostRequest) -> PostView {
        self.state
            .post_handler
            .create_post(request)
            .await
            .expect("Failed to create post")
    }

    pub async fn create_event(&self, year: &str, title: &str, order: i32, translations: Translations) -> TimelineEvent {
        self.state
            .timeline_handler
            .create_event(NewTimelineEventRequest {
                year: Some(year.into()),
                title: Some(title.into()),
                description: Some(format!("{title} description")),
                order,
                translations,
            })
            .await
            .expect("Failed to create timeline event")
    }
}

pub fn project_request(title: &str, tags: Vec<i64>) -> NewProjectRequest {
    NewProjectRequest {
        title: Some(title.into()),
        short_description: Some(format!("{title} in short")),
        full_description: Some(format!("# {title}\n\nThe long story.")),
        thumbnail: Some("projects/thumb.png".into()),
        repo_link: Some("https://github.com/me/project".into()),
        tags,
        ..Default::default()
    }
}

pub fn post_request(title: &str, active: bool) -> NewPostRequest {
    NewPostRequest {
        title: Some(title.into()),
        content: Some(format!("{title} content")),
        is_active: active,
        ..Default::default()
    }
}

pub fn error_fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
