use actix_web::web;

use crate::handlers::skills;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/skills")
            .route(web::get().to(skills::list_skills))
    );
}
