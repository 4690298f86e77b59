//! Import JSON exports of the legacy document store.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin import-legacy -- \
//!     --students students.json --attendance attendances.json \
//!     --courses courses.json --dry-run
//! ```

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use scholar_portal::legacy_import::{ImportReport, LegacyBatch, LegacyImporter, read_json_file};
use scholar_portal::outbound::persistence::{
    DbPool, DieselAttendanceRepository, DieselCourseCatalogueRepository, DieselStudentRepository,
    PoolConfig, run_pending_migrations,
};

/// `import-legacy` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-legacy",
    about = "Normalise legacy student, attendance and course exports and write them to PostgreSQL",
    version
)]
struct CliArgs {
    /// JSON array exported from the `students` collection.
    #[arg(long, value_name = "path")]
    students: Option<PathBuf>,
    /// JSON array exported from the `attendances` collection.
    #[arg(long, value_name = "path")]
    attendance: Option<PathBuf>,
    /// JSON array exported from the `courses` collection.
    #[arg(long, value_name = "path")]
    courses: Option<PathBuf>,
    /// Report what would be imported without touching the database.
    #[arg(long)]
    dry_run: bool,
    /// Apply embedded migrations before writing.
    #[arg(long)]
    run_migrations: bool,
    /// Database connection URL. Falls back to `PORTAL_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let batch = read_batch(&args)?;
    let mut out = io::stdout().lock();
    write_batch_summary(&mut out, &batch)?;
    if args.dry_run {
        writeln!(out, "dry run: nothing written")?;
        return Ok(());
    }

    let database_url = resolve_database_url(args.database_url)?;
    if args.run_migrations {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    let importer = LegacyImporter::new(
        Arc::new(DieselStudentRepository::new(pool.clone())),
        Arc::new(DieselAttendanceRepository::new(pool.clone())),
        Arc::new(DieselCourseCatalogueRepository::new(pool)),
    );
    let report = importer.apply(&batch).await.wrap_err("write import")?;
    write_report(&mut out, &report)?;
    Ok(())
}

fn read_batch(args: &CliArgs) -> Result<LegacyBatch> {
    if args.students.is_none() && args.attendance.is_none() && args.courses.is_none() {
        return Err(eyre!(
            "nothing to import: pass --students, --attendance or --courses"
        ));
    }
    let mut batch = LegacyBatch::new();
    if let Some(path) = &args.students {
        batch.add_students(&read(path)?)?;
    }
    if let Some(path) = &args.attendance {
        batch.add_attendance(&read(path)?)?;
    }
    if let Some(path) = &args.courses {
        batch.add_courses(&read(path)?)?;
    }
    Ok(batch)
}

fn read(path: &Path) -> Result<String> {
    read_json_file(path).wrap_err_with(|| format!("read export {}", path.display()))
}

fn write_batch_summary(out: &mut impl Write, batch: &LegacyBatch) -> io::Result<()> {
    writeln!(out, "students={}", batch.students.len())?;
    writeln!(out, "attendance_records={}", batch.attendance.len())?;
    writeln!(out, "catalogue_entries={}", batch.courses.len())?;
    for duplicate in &batch.duplicates {
        writeln!(
            out,
            "duplicate collection={} index={} scholar_id={}",
            duplicate.collection.name(),
            duplicate.index,
            duplicate.scholar_id
        )?;
    }
    for rejection in &batch.rejections {
        writeln!(
            out,
            "rejected collection={} index={} reason={}",
            rejection.collection.name(),
            rejection.index,
            rejection.reason
        )?;
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &ImportReport) -> io::Result<()> {
    writeln!(out, "written_students={}", report.students)?;
    writeln!(out, "written_attendance_entries={}", report.attendance_entries)?;
    writeln!(out, "written_catalogue_entries={}", report.catalogue_entries)
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    let candidates = [
        explicit,
        env::var("PORTAL_DATABASE_URL").ok(),
        env::var("DATABASE_URL").ok(),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            eyre!("database URL missing: set --database-url, PORTAL_DATABASE_URL or DATABASE_URL")
        })
}
