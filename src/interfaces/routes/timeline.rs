use actix_web::web;

use crate::handlers::timeline;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/timeline")
            .route(web::get().to(timeline::list_timeline))
    );
}
