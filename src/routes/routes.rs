use actix_web::web;

use super::login::login_handlers;
use super::operators::operator_handlers;
use super::products::product_handlers;
use crate::auth::{Role, RoleGuard};

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ANY_STAFF: &[Role] = &[Role::Admin, Role::Operator];

pub fn operators_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/operators")
            .route("/login-users", web::post().to(login_handlers::login))
            .service(
                web::resource("/change-password")
                    .wrap(RoleGuard::allow(ANY_STAFF))
                    .route(web::post().to(login_handlers::change_password)),
            )
            // Everything else under /api/operators is admin territory
            .service(
                web::scope("")
                    .wrap(RoleGuard::allow(ADMIN_ONLY))
                    .route(
                        "/create-operator",
                        web::post().to(operator_handlers::create_operator),
                    )
                    .route(
                        "/getalloperator",
                        web::get().to(operator_handlers::get_all_operators),
                    ),
            ),
    );
}

pub fn products_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .wrap(RoleGuard::allow(ADMIN_ONLY))
            .route("", web::get().to(product_handlers::get_all_products))
            .route("/", web::get().to(product_handlers::get_all_products))
            .route("/search", web::get().to(product_handlers::search_products))
            .route("/create", web::post().to(product_handlers::create_product))
            .route(
                "/update/{name}",
                web::put().to(product_handlers::update_product),
            )
            .route(
                "/delete/{name}",
                web::delete().to(product_handlers::delete_product),
            )
            // Keep the catch-all name lookup last
            .route("/{name}", web::get().to(product_handlers::get_product_by_name)),
    );
}
