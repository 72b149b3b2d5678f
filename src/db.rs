use bcrypt::{hash, DEFAULT_COST};
use log::{error, info, warn};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::env;

pub async fn connect(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Seeds the admin account from ADMIN_EMAIL/ADMIN_PASSWORD at startup.
/// Without both variables there is nothing to seed and the server starts
/// anyway (an admin may already exist in the database).
pub async fn ensure_admin(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let (email, password) = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        (Ok(email), Ok(password)) => (email, password),
        _ => {
            warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seeding");
            return Ok(());
        }
    };

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM operators WHERE email = ?")
        .bind(&email)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let password_hash = match hash(&password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to hash admin password, seeding skipped: {}", e);
            return Ok(());
        }
    };

    sqlx::query(
        "INSERT INTO operators (name, email, phone, role, status, password_hash)
         VALUES ('Administrator', ?, '', 'admin', 'active', ?)",
    )
    .bind(&email)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    info!("Seeded admin account {}", email);
    Ok(())
}
