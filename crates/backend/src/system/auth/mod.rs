pub mod jwt;
pub mod middleware;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;

/// Create the default admin account on a fresh database
pub async fn bootstrap_admin() -> anyhow::Result<()> {
    let conn = get_connection();

    let existing = conn
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_users".to_string(),
        ))
        .await?;
    let count: i64 = existing
        .map(|row| row.try_get("", "cnt").unwrap_or(0))
        .unwrap_or(0);
    if count > 0 {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(b"admin", &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash default password: {}", e))?
        .to_string();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, username, password_hash, is_admin, created_at) VALUES (?, ?, ?, 1, ?)",
        [
            uuid::Uuid::new_v4().to_string().into(),
            "admin".into(),
            hash.into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;

    tracing::warn!("created default admin user (admin/admin), change the password");
    Ok(())
}
