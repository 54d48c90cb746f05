use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod comments;
mod contact;
mod json_error;
mod posts;
mod projects;
mod skills;
mod timeline;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(skills::config_routes)
            .configure(projects::config_routes)
            .configure(posts::config_routes)
            .configure(timeline::config_routes)
            .configure(contact::config_routes)
            .configure(comments::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
