//! Schema setup and teardown from the SQL files shipped with this crate.

use sqlx::PgPool;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Applies `migrations/*.sql` in file-name order. The scripts are idempotent.
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let scripts = sql_scripts(&script_dir("migrations"))?;
    run_scripts(pool, scripts.iter()).await
}

/// Applies `cleanup/*.sql` newest first, dropping the custody schema.
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let scripts = sql_scripts(&script_dir("cleanup"))?;
    run_scripts(pool, scripts.iter().rev()).await
}

fn script_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn sql_scripts(dir: &Path) -> Result<Vec<PathBuf>, sqlx::Error> {
    let mut scripts: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
        .collect();
    scripts.sort();
    Ok(scripts)
}

async fn run_scripts<'a>(
    pool: &PgPool,
    scripts: impl Iterator<Item = &'a PathBuf>,
) -> Result<(), sqlx::Error> {
    for path in scripts {
        let sql = fs::read_to_string(path)?;
        sqlx::raw_sql(&sql).execute(pool).await?;
        info!(script = %path.display(), "executed schema script");
    }
    Ok(())
}
