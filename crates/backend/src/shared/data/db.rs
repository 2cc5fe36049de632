use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    create_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("database already initialized"))?;
    tracing::info!("database ready at {}", db_file);
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN.get().expect("database not initialized")
}

async fn create_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let statements = [
        // Настройки колонок: один JSON blob на (page_name, config_type)
        r#"
        CREATE TABLE IF NOT EXISTS sys_column_config (
            page_name TEXT NOT NULL,
            config_type TEXT NOT NULL,
            settings_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (page_name, config_type)
        )
        "#,
        // Динамические поля, заданные администратором
        r#"
        CREATE TABLE IF NOT EXISTS sys_dynamic_field (
            id TEXT PRIMARY KEY NOT NULL,
            entity TEXT NOT NULL,
            page_name TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL,
            label TEXT NOT NULL,
            kind TEXT NOT NULL,
            required INTEGER NOT NULL DEFAULT 0,
            readonly INTEGER NOT NULL DEFAULT 0,
            width INTEGER,
            display_order INTEGER NOT NULL DEFAULT 0,
            options_json TEXT NOT NULL DEFAULT '[]',
            calculation_formula TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (entity, name)
        )
        "#,
        // Значения динамических полей записи на странице
        r#"
        CREATE TABLE IF NOT EXISTS sys_dynamic_field_value (
            entity TEXT NOT NULL,
            page_name TEXT NOT NULL DEFAULT '',
            record_id TEXT NOT NULL,
            values_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (entity, page_name, record_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
        // Демонстрационный бизнес-справочник
        r#"
        CREATE TABLE IF NOT EXISTS a005_bag_type (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            bag_kind TEXT NOT NULL DEFAULT '',
            material_category TEXT NOT NULL DEFAULT '',
            width_mm INTEGER NOT NULL DEFAULT 0,
            height_mm INTEGER NOT NULL DEFAULT 0,
            gusset_mm INTEGER NOT NULL DEFAULT 0,
            film_thickness_um REAL NOT NULL DEFAULT 0,
            print_colors INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            comment TEXT,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    ];

    for sql in statements {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}
