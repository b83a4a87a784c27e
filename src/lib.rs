pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models {
    pub mod blog;
}
pub mod fetch {
    pub mod client;
    pub mod endpoints;
}
pub mod rendering {
    pub mod document;
    pub mod markdown;
    pub mod sanitize;
    pub mod templates;
}
pub mod pages {
    pub mod blog;
    pub mod blogs;
    pub mod errors;
    pub mod thread;
}
pub mod db {
    pub mod admin_repository;
    pub mod models;
    pub mod repository;
}
pub mod api {
    pub mod errors;
    pub mod projects;
}
