//! _sys_* table DDL. All _sys_* tables live in a schema named from `FORMS_SCHEMA` env (default `forms`).

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Schema name for _sys_* tables. From env `FORMS_SCHEMA`, default `forms`. Must be a valid PostgreSQL identifier.
pub fn forms_schema() -> String {
    std::env::var("FORMS_SCHEMA").unwrap_or_else(|_| "forms".into())
}

/// Returns schema-qualified table name for _sys_* tables (e.g. "forms._sys_layouts").
pub fn qualified_sys_table(table: &str) -> String {
    format!("{}.{}", forms_schema(), table)
}

/// Metadata config tables; each row is one JSON payload keyed by id.
const CONFIG_TABLES: &[&str] = &[
    "_sys_entities",
    "_sys_fields",
    "_sys_picklists",
    "_sys_classifications",
    "_sys_classification_items",
    "_sys_layouts",
];

/// Create schema from `FORMS_SCHEMA` env if not exists, then the config, user and department tables.
pub async fn ensure_sys_tables(pool: &PgPool) -> Result<(), AppError> {
    let schema = forms_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    for table in CONFIG_TABLES {
        let q_table = qualified_sys_table(table);
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                payload JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            q_table
        );
        sqlx::query(&ddl).execute(pool).await?;
    }

    let q_departments = qualified_sys_table("_sys_departments");
    let departments_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
        q_departments
    );
    sqlx::query(&departments_ddl).execute(pool).await?;

    let q_users = qualified_sys_table("_sys_users");
    let users_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            dept_id TEXT REFERENCES {}(id),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        q_users, q_departments
    );
    sqlx::query(&users_ddl).execute(pool).await?;

    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::InvalidInvocation(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::InvalidInvocation("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
