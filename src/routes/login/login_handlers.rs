use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};
use log::{error, info};
use sqlx::MySqlPool;

use super::login_models::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::auth::{Claims, Role, TokenKeys};
use crate::models::operator::Operator;
use crate::models::response::ApiMessage;

// login logic
pub async fn login(
    pool: web::Data<MySqlPool>,
    keys: web::Data<TokenKeys>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let email = &req.email;
    info!("Received login request for {}", email);

    // 1. Look the account up by email
    let result = sqlx::query_as::<_, Operator>(
        "SELECT operator_id, name, email, phone, role, status, password_hash, created_at
         FROM operators WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool.get_ref())
    .await;

    let operator = match result {
        Ok(Some(operator)) => operator,
        Ok(None) => {
            info!("Login failed, unknown email: {}", email);
            return HttpResponse::Unauthorized().json(ApiMessage::err("Incorrect credentials"));
        }
        Err(e) => {
            error!("Failed to query account {}: {}", email, e);
            return HttpResponse::InternalServerError().json(ApiMessage::err("Failed to log in"));
        }
    };

    // 2. Validate the password against the stored bcrypt hash
    let valid = match verify(&req.password, &operator.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!("Password check failed for {}: {}", email, e);
            return HttpResponse::InternalServerError().json(ApiMessage::err("Failed to log in"));
        }
    };
    if !valid {
        info!("Login failed, wrong password for {}", email);
        return HttpResponse::Unauthorized().json(ApiMessage::err("Incorrect credentials"));
    }

    // 3. Inactive accounts cannot log in
    if operator.status != "active" {
        info!("Login refused, inactive account: {}", email);
        return HttpResponse::Unauthorized().json(ApiMessage::err("Account is inactive"));
    }

    let role = match Role::parse(&operator.role) {
        Some(role) => role,
        None => {
            error!("Account {} has unknown role '{}'", email, operator.role);
            return HttpResponse::InternalServerError().json(ApiMessage::err("Failed to log in"));
        }
    };

    // 4. Issue a signed token carrying identity, role and expiry
    match keys.issue(&operator, role) {
        Ok(token) => {
            info!("{} logged in as {}", email, role.as_str());
            HttpResponse::Ok().json(LoginResponse {
                success: true,
                token,
                role: role.as_str().to_string(),
            })
        }
        Err(e) => {
            error!("Failed to issue token for {}: {}", email, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to log in"))
        }
    }
}

// change-password logic; runs behind the role guard, so the claims here are
// already verified
pub async fn change_password(
    pool: web::Data<MySqlPool>,
    claims: web::ReqData<Claims>,
    req: web::Json<ChangePasswordRequest>,
) -> impl Responder {
    let operator_id: i64 = match claims.user_id.parse() {
        Ok(id) => id,
        Err(_) => {
            error!("Token for {} carries a non-numeric userId", claims.email);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to change password"));
        }
    };
    info!("Password change request for account {}", operator_id);

    let stored = sqlx::query_scalar::<_, String>(
        "SELECT password_hash FROM operators WHERE operator_id = ?",
    )
    .bind(operator_id)
    .fetch_optional(pool.get_ref())
    .await;

    let stored_hash = match stored {
        Ok(Some(hash)) => hash,
        Ok(None) => {
            info!("Password change for missing account {}", operator_id);
            return HttpResponse::NotFound().json(ApiMessage::err("Account not found"));
        }
        Err(e) => {
            error!("Failed to fetch account {}: {}", operator_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to change password"));
        }
    };

    match verify(&req.old_password, &stored_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!("Wrong old password for account {}", operator_id);
            return HttpResponse::Unauthorized().json(ApiMessage::err("Old password is incorrect"));
        }
        Err(e) => {
            error!("Password check failed for account {}: {}", operator_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to change password"));
        }
    }

    let new_hash = match hash(&req.new_password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to hash new password for account {}: {}", operator_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiMessage::err("Failed to change password"));
        }
    };

    let result = sqlx::query("UPDATE operators SET password_hash = ? WHERE operator_id = ?")
        .bind(&new_hash)
        .bind(operator_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            info!("Password changed for account {}", operator_id);
            HttpResponse::Ok().json(ApiMessage::ok("Password changed successfully"))
        }
        Err(e) => {
            error!("Failed to update password for account {}: {}", operator_id, e);
            HttpResponse::InternalServerError().json(ApiMessage::err("Failed to change password"))
        }
    }
}
