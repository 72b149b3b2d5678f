use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use sqlx::MySqlPool;

use super::product_models::{ProductPayload, SearchQuery};
use crate::models::product::Product;
use crate::models::response::{ApiMessage, ApiResponse};

const SELECT_PRODUCT: &str =
    "SELECT product_id, name, description, price, quantity, image_url, created_at FROM products";

pub async fn get_all_products(pool: web::Data<MySqlPool>) -> impl Responder {
    let result = sqlx::query_as::<_, Product>(&format!("{} ORDER BY product_id", SELECT_PRODUCT))
        .fetch_all(pool.get_ref())
        .await;

    match result {
        Ok(products) => HttpResponse::Ok().json(ApiResponse::ok(products)),
        Err(e) => {
            error!("Failed to fetch products: {}", e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to fetch products"))
        }
    }
}

// Search stays a linear substring scan over the full listing; the catalog is
// small and nothing here needs an indexed query.
pub async fn search_products(
    pool: web::Data<MySqlPool>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let result = sqlx::query_as::<_, Product>(SELECT_PRODUCT)
        .fetch_all(pool.get_ref())
        .await;

    match result {
        Ok(products) => {
            let matches = filter_by_name(&products, &query.q);
            info!("Search '{}' matched {} products", query.q, matches.len());
            HttpResponse::Ok().json(ApiResponse::ok(matches))
        }
        Err(e) => {
            error!("Failed to fetch products for search: {}", e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to search products"))
        }
    }
}

pub async fn get_product_by_name(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> impl Responder {
    let name = path.into_inner();
    let result = sqlx::query_as::<_, Product>(&format!("{} WHERE name = ?", SELECT_PRODUCT))
        .bind(&name)
        .fetch_optional(pool.get_ref())
        .await;

    match result {
        Ok(Some(product)) => HttpResponse::Ok().json(ApiResponse::ok(product)),
        Ok(None) => {
            info!("Product not found: {}", name);
            HttpResponse::NotFound().json(ApiMessage::err("Product not found"))
        }
        Err(e) => {
            error!("Failed to fetch product {}: {}", name, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to fetch product"))
        }
    }
}

pub async fn create_product(
    pool: web::Data<MySqlPool>,
    req: web::Json<ProductPayload>,
) -> impl Responder {
    info!("Received request to create product {}", req.name);

    if let Err(message) = validate_product(&req) {
        info!("Rejected product {}: {}", req.name, message);
        return HttpResponse::BadRequest().json(ApiMessage::err(message));
    }

    // Name is the lookup key in the catalog views, keep it unique
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE name = ?")
        .bind(&req.name)
        .fetch_one(pool.get_ref())
        .await;

    match count {
        Ok(0) => {}
        Ok(_) => {
            info!("Product name already exists: {}", req.name);
            return HttpResponse::BadRequest()
                .json(ApiMessage::err("A product with this name already exists"));
        }
        Err(e) => {
            error!("Failed to check product name {}: {}", req.name, e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to create product"));
        }
    }

    let result = sqlx::query(
        "INSERT INTO products (name, description, price, quantity, image_url)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.quantity)
    .bind(&req.image_url)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!("Product {} created", req.name);
            HttpResponse::Created().json(ApiMessage::ok("Product created successfully"))
        }
        Err(e) => {
            error!("Failed to insert product {}: {}", req.name, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to create product"))
        }
    }
}

pub async fn update_product(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    req: web::Json<ProductPayload>,
) -> impl Responder {
    let name = path.into_inner();
    info!("Received request to update product {}", name);

    if let Err(message) = validate_product(&req) {
        info!("Rejected update for {}: {}", name, message);
        return HttpResponse::BadRequest().json(ApiMessage::err(message));
    }

    let result = sqlx::query(
        "UPDATE products SET name = ?, description = ?, price = ?, quantity = ?, image_url = ?
         WHERE name = ?",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.quantity)
    .bind(&req.image_url)
    .bind(&name)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            info!("Product not found for update: {}", name);
            HttpResponse::NotFound().json(ApiMessage::err("Product not found"))
        }
        Ok(_) => {
            info!("Product {} updated", name);
            HttpResponse::Ok().json(ApiMessage::ok("Product updated successfully"))
        }
        Err(e) => {
            error!("Failed to update product {}: {}", name, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to update product"))
        }
    }
}

pub async fn delete_product(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> impl Responder {
    let name = path.into_inner();
    info!("Received request to delete product {}", name);

    let result = sqlx::query("DELETE FROM products WHERE name = ?")
        .bind(&name)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            info!("Product not found for delete: {}", name);
            HttpResponse::NotFound().json(ApiMessage::err("Product not found"))
        }
        Ok(_) => {
            info!("Product {} deleted", name);
            HttpResponse::Ok().json(ApiMessage::ok("Product deleted successfully"))
        }
        Err(e) => {
            error!("Failed to delete product {}: {}", name, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to delete product"))
        }
    }
}

fn filter_by_name(products: &[Product], term: &str) -> Vec<Product> {
    let term = term.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

fn validate_product(req: &ProductPayload) -> Result<(), String> {
    if req.name.trim().is_empty() {
        return Err("Product name must not be empty".to_string());
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err("Price must be a non-negative number".to_string());
    }
    if req.quantity < 0 {
        return Err("Quantity must be a non-negative integer".to_string());
    }
    Ok(())
}
