use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, DEFAULT_COST};
use log::{error, info};
use sqlx::MySqlPool;

use super::operator_models::CreateOperatorRequest;
use crate::models::operator::Operator;
use crate::models::response::{ApiMessage, ApiResponse};

// Create an operator account. The initial password comes from
// OPERATOR_DEFAULT_PASSWORD; operators change it after first login.
pub async fn create_operator(
    pool: web::Data<MySqlPool>,
    req: web::Json<CreateOperatorRequest>,
) -> impl Responder {
    info!("Received request to create operator {}", req.email);

    if let Err(message) = validate_new_operator(&req) {
        info!("Rejected operator {}: {}", req.email, message);
        return HttpResponse::BadRequest().json(ApiMessage::err(message));
    }

    // Email is the login key, keep it unique
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM operators WHERE email = ?")
        .bind(&req.email)
        .fetch_one(pool.get_ref())
        .await;

    match count {
        Ok(0) => {}
        Ok(_) => {
            info!("Operator email already in use: {}", req.email);
            return HttpResponse::BadRequest().json(ApiMessage::err("Email is already in use"));
        }
        Err(e) => {
            error!("Failed to check email {}: {}", req.email, e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to create operator"));
        }
    }

    let default_password = std::env::var("OPERATOR_DEFAULT_PASSWORD")
        .unwrap_or_else(|_| "changeme123".to_string());
    let password_hash = match hash(&default_password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to hash default password: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to create operator"));
        }
    };

    let result = sqlx::query(
        "INSERT INTO operators (name, email, phone, role, status, password_hash)
         VALUES (?, ?, ?, 'operator', 'active', ?)",
    )
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone_num)
    .bind(&password_hash)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!("Operator {} created", req.email);
            HttpResponse::Created().json(ApiMessage::ok("Operator created successfully"))
        }
        Err(e) => {
            error!("Failed to insert operator {}: {}", req.email, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to create operator"))
        }
    }
}

pub async fn get_all_operators(pool: web::Data<MySqlPool>) -> impl Responder {
    let result = sqlx::query_as::<_, Operator>(
        "SELECT operator_id, name, email, phone, role, status, password_hash, created_at
         FROM operators ORDER BY operator_id",
    )
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(operators) => HttpResponse::Ok().json(ApiResponse::ok(operators)),
        Err(e) => {
            error!("Failed to fetch operators: {}", e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to fetch operators"))
        }
    }
}

// Same rules the operator-creation form enforces.
fn validate_new_operator(req: &CreateOperatorRequest) -> Result<(), String> {
    if !valid_name(&req.name) {
        return Err("Name must have at least two words, each 3+ letters".to_string());
    }
    if !valid_email(&req.email) {
        return Err("Invalid email format".to_string());
    }
    if !valid_phone(&req.phone_num) {
        return Err("Phone number must be 10-15 digits".to_string());
    }
    Ok(())
}

fn valid_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    words.len() >= 2
        && words
            .iter()
            .all(|w| w.len() >= 3 && w.chars().all(|c| c.is_ascii_alphabetic()))
}

fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn valid_phone(phone: &str) -> bool {
    (10..=15).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_needs_two_words_of_three_letters() {
        assert!(valid_name("Ada Lovelace"));
        assert!(valid_name("Grace Brewster Hopper"));
        assert!(!valid_name("Ada"));
        assert!(!valid_name("Al Go"));
        assert!(!valid_name("Ada L0velace"));
        assert!(!valid_name(""));
    }

    #[test]
    fn email_shape_checks() {
        assert!(valid_email("ops@store.example"));
        assert!(!valid_email("no-at-sign"));
        assert!(!valid_email("@store.example"));
        assert!(!valid_email("ops@storeexample"));
        assert!(!valid_email("ops@store.example "));
        assert!(!valid_email("ops@.example"));
    }

    #[test]
    fn phone_is_ten_to_fifteen_digits() {
        assert!(valid_phone("0801234567"));
        assert!(valid_phone("234801234567890"));
        assert!(!valid_phone("080123456"));
        assert!(!valid_phone("2348012345678901"));
        assert!(!valid_phone("0801 234567"));
        assert!(!valid_phone("08o1234567"));
    }

    #[test]
    fn validate_reports_first_bad_field() {
        let req = CreateOperatorRequest {
            name: "Ada".to_string(),
            email: "ada@store.example".to_string(),
            phone_num: "0801234567".to_string(),
        };
        assert!(validate_new_operator(&req).unwrap_err().contains("Name"));

        let req = CreateOperatorRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada-store.example".to_string(),
            phone_num: "0801234567".to_string(),
        };
        assert!(validate_new_operator(&req).unwrap_err().contains("email"));
    }
}
