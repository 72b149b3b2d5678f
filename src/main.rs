use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use std::env;

mod auth;
mod db;
mod models;
mod routes;

use auth::TokenKeys;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let token_keys = TokenKeys::from_env();

    let pool = db::connect(&database_url)
        .await
        .expect("Failed to create pool");
    db::ensure_admin(&pool)
        .await
        .expect("Failed to seed admin account");

    let server_address = "0.0.0.0:8080";
    println!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_keys.clone()))
            .route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().body("Store House inventory API") }),
            )
            .configure(routes::routes::operators_configure)
            .configure(routes::routes::products_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
