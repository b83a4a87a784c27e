#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_extra::extract::cookie::Key;
use bytes::Bytes;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;
use openidconnect::CsrfToken;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use folio::app::AppState;
use folio::auth::models::GoogleUserInfo;
use folio::auth::IdentityProvider;
use folio::config::Settings;
use folio::db::admin_repository::{AdminRepository, MongoAdminRepository};
use folio::db::models::{Admin, Project};
use folio::db::repository::{MongoProjectRepository, ProjectRepository};
use folio::error::AppError;
use folio::fetch::client::Fetcher;
use folio::fetch::endpoints::BlogApi;
use folio::rendering::templates::Templates;

pub const API: &str = "http://api.test";
pub const ADMIN_EMAIL: &str = "me@example.com";
pub const GOOD_CODE: &str = "good-code";

// --- Fetcher ---

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: Mutex<HashMap<String, Bytes>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn with(self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.bodies.lock().unwrap().insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_sync(&self, url: &str) -> Result<Bytes, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Fetch(format!("connection refused: {url}")))
    }
}

// --- Identity provider ---

/// Accepts only `GOOD_CODE` and reports `user` as the signed-in profile.
pub struct MockIdentity {
    pub user: GoogleUserInfo,
}

impl MockIdentity {
    pub fn admin() -> Self {
        Self {
            user: GoogleUserInfo {
                id: "google-1098".into(),
                email: ADMIN_EMAIL.into(),
                verified_email: true,
                picture: None,
            },
        }
    }

    pub fn stranger() -> Self {
        Self {
            user: GoogleUserInfo {
                id: "google-42".into(),
                email: "stranger@example.com".into(),
                verified_email: true,
                picture: None,
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    fn authorize_url(&self, state: &CsrfToken) -> String {
        format!("https://accounts.example.com/o/oauth2/auth?state={}", state.secret())
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        if code == GOOD_CODE {
            Ok("access-token".into())
        } else {
            Err(AppError::Auth("invalid_grant".into()))
        }
    }

    async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        assert_eq!(access_token, "access-token");
        Ok(self.user.clone())
    }
}

// --- In-memory repositories ---

#[derive(Default)]
pub struct MemoryAdmins {
    pub admins: Mutex<Vec<Admin>>,
}

#[async_trait]
impl AdminRepository for MemoryAdmins {
    async fn create(&self, admin: Admin) -> Result<(), AppError> {
        self.admins.lock().unwrap().push(admin);
        Ok(())
    }

    async fn get(&self, email: &str, google_id: &str) -> Result<Option<Admin>, AppError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email && a.google_id == google_id)
            .cloned())
    }
}

/// Only understands `_id` filters; page tests never query it.
#[derive(Default)]
pub struct MemoryProjects {
    pub projects: Mutex<Vec<Project>>,
}

fn id_filter(filter: &Document) -> Option<ObjectId> {
    filter.get_object_id("_id").ok()
}

#[async_trait]
impl ProjectRepository for MemoryProjects {
    async fn create(&self, project: Project) -> Result<(), AppError> {
        self.projects.lock().unwrap().push(project);
        Ok(())
    }

    async fn read_all(&self, _: Document, _: Option<Document>) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn read_one(&self, filter: Document, _: Option<Document>) -> Result<Option<Project>, AppError> {
        let id = id_filter(&filter);
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| id.is_none() || p.id == id)
            .cloned())
    }

    async fn update(&self, filter: Document, _: Document) -> Result<Option<Project>, AppError> {
        self.read_one(filter, None).await
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Project>, AppError> {
        let mut projects = self.projects.lock().unwrap();
        Ok(projects.iter_mut().find(|p| p.id == Some(id)).map(|p| {
            p.is_deleted = true;
            p.clone()
        }))
    }

    async fn delete_permanent(&self, id: ObjectId) -> Result<(), AppError> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != Some(id));
        if projects.len() == before {
            return Err(AppError::NotFound(format!("Project {id} not found")));
        }
        Ok(())
    }
}

// --- Environment ---

pub fn test_settings() -> Settings {
    serde_json::from_value(serde_json::json!({
        "GOOGLE_CLIENT_ID": "client-id",
        "GOOGLE_CLIENT_SECRET": "client-secret",
        "SESSION_KEY": "integration-test-session-key",
        "MONGO_URI": "mongodb://unused",
        "DATABASE_NAME": "website_test",
        "ADMIN_EMAILS": [ADMIN_EMAIL],
        "API_URL": API,
        "FETCH_TIMEOUT_SECS": 5
    }))
    .expect("test settings should deserialize")
}

/// Holds the router plus handles to its collaborators.
///
/// When backed by MongoDB, the container lives as long as this struct.
pub struct TestEnv {
    _mongo: Option<ContainerAsync<Mongo>>,
    pub router: Router,
    pub fetcher: Arc<StaticFetcher>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
}

impl TestEnv {
    /// Everything in memory: for page and login tests.
    pub fn in_memory(fetcher: StaticFetcher, identity: MockIdentity) -> Self {
        Self::build(
            None,
            fetcher,
            identity,
            Arc::new(MemoryProjects::default()),
            Arc::new(MemoryAdmins::default()),
        )
    }

    /// Repositories backed by a throwaway MongoDB container.
    pub async fn with_mongo() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("website_test");

        Self::build(
            Some(mongo_container),
            StaticFetcher::default(),
            MockIdentity::admin(),
            Arc::new(MongoProjectRepository::new(&mongo_db)),
            Arc::new(MongoAdminRepository::new(&mongo_db)),
        )
    }

    fn build(
        mongo: Option<ContainerAsync<Mongo>>,
        fetcher: StaticFetcher,
        identity: MockIdentity,
        project_repo: Arc<dyn ProjectRepository>,
        admin_repo: Arc<dyn AdminRepository>,
    ) -> Self {
        let settings = test_settings();
        let fetcher = Arc::new(fetcher);

        let app_state = AppState {
            fetcher: fetcher.clone(),
            blog_api: BlogApi::new(API).expect("valid API url"),
            templates: Arc::new(Templates::embedded().expect("templates compile")),
            project_repo: project_repo.clone(),
            admin_repo: admin_repo.clone(),
            identity: Arc::new(identity),
            cookie_key: Key::from(&[7u8; 64][..]),
            settings: Arc::new(settings),
        };

        Self {
            _mongo: mongo,
            router: folio::app::router(app_state),
            fetcher,
            project_repo,
            admin_repo,
        }
    }

    /// Build an `axum_test::TestServer` that fails on non-2xx responses.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }
}

/// Run the OAuth dance against `MockIdentity` so the server holds a session cookie.
///
/// Both legs answer with redirects, so pass a permissive server.
pub async fn login(server: &axum_test::TestServer) -> axum_test::TestResponse {
    let start = server.get("/auth/google").await;
    let location = start.header("location");
    let location = location.to_str().expect("ascii location");
    let state = location
        .split("state=")
        .nth(1)
        .expect("authorize url carries state")
        .to_string();

    server
        .get("/auth/google/callback")
        .add_query_param("code", GOOD_CODE)
        .add_query_param("state", state)
        .await
}

/// A blog entry as the backend API serves it.
pub fn blog_json(id: &str, doc_type: &str) -> String {
    serde_json::json!({
        "_id": id,
        "title": "Fetching in parallel",
        "description": "Two requests, one page",
        "author": "Ritwik",
        "formatted_date": "Jan 5, 2020",
        "doc_type": doc_type,
        "is_public": true
    })
    .to_string()
}

/// A thread with `parts` sub-documents, alternating Markdown and HTML.
pub fn thread_json(id: &str, parts: usize) -> String {
    let sub_blogs: Vec<_> = (0..parts)
        .map(|i| {
            serde_json::json!({
                "title": format!("Part {i}"),
                "formatted_date": "Feb 1, 2020",
                "doc_type": if i % 2 == 0 { "markdown" } else { "html" },
                "markdown": format!("https://docs.test/{id}/{i}.md"),
                "html": format!("https://docs.test/{id}/{i}.html"),
            })
        })
        .collect();
    serde_json::json!({
        "_id": id,
        "title": "A long story",
        "author": "Ritwik",
        "is_series": true,
        "sub_blogs": sub_blogs
    })
    .to_string()
}
