//! End-to-end `update()` behaviour against DuckDB.

use dm_core::Version;
use dm_db::test_utils::FaultyDb;
use dm_db::{Database, DuckDbBackend};
use dm_meta::MetaStore;
use dm_migrate::{ErrorKind, Migrator};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

type Recorded = Arc<FaultyDb<DuckDbBackend>>;

// ── Helpers ─────────────────────────────────────────────────────────

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn db_path(&self) -> String {
        self.dir
            .path()
            .join("app.duckdb")
            .to_string_lossy()
            .into_owned()
    }
}

fn recorded_db() -> Recorded {
    Arc::new(FaultyDb::new(DuckDbBackend::in_memory().unwrap()))
}

fn migrator_over(db: &Recorded) -> Migrator {
    Migrator::new(Box::new(Arc::clone(db)))
}

fn stored_version(db: &dyn Database) -> Version {
    MetaStore::new(db).read_version().unwrap()
}

fn count(db: &dyn Database, sql: &str) -> i64 {
    db.query_optional_string(sql, &[])
        .unwrap()
        .unwrap()
        .parse()
        .unwrap()
}

fn position(statements: &[String], needle: &str) -> usize {
    statements
        .iter()
        .position(|s| s.contains(needle))
        .unwrap_or_else(|| panic!("statement containing {needle:?} not executed"))
}

// ── Fresh database ─────────────────────────────────────────────────

#[test]
fn test_empty_database_bootstraps_and_applies_everything() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script(
            "baseline.sql",
            "CREATE TABLE users (id INTEGER);\nINSERT INTO users VALUES (1);",
        ))
        .unwrap();
    migrator
        .add_migration(
            fx.script("v1.sql", "ALTER TABLE users ADD COLUMN email VARCHAR;"),
            1,
            0,
            0,
        )
        .unwrap();
    migrator
        .add_migration(
            fx.script("v1_2.sql", "CREATE TABLE orders (id INTEGER, user_id INTEGER);"),
            1,
            2,
            0,
        )
        .unwrap();

    let report = migrator.update().unwrap();

    assert!(report.bootstrapped);
    assert!(report.baseline_applied);
    assert_eq!(
        report.applied,
        vec![Version::new(1, 0, 0), Version::new(1, 2, 0)]
    );
    assert_eq!(report.final_version, Version::new(1, 2, 0));
    assert_eq!(stored_version(&*db), Version::new(1, 2, 0));
    assert_eq!(
        db.list_tables().unwrap(),
        vec!["dbMetaInfo", "orders", "users"]
    );
    assert_eq!(count(&*db, "SELECT COUNT(email) FROM users"), 0);
}

#[test]
fn test_empty_database_without_baseline() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE t (id INTEGER);"), 1, 0, 0)
        .unwrap();

    let report = migrator.update().unwrap();

    assert!(report.bootstrapped);
    assert!(!report.baseline_applied);
    assert_eq!(report.final_version, Version::new(1, 0, 0));
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo", "t"]);
}

#[test]
fn test_empty_registry_only_bootstraps() {
    let db = recorded_db();
    let mut migrator = migrator_over(&db);

    let report = migrator.update().unwrap();

    assert!(report.bootstrapped);
    assert!(report.applied.is_empty());
    assert_eq!(report.final_version, Version::default());
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo"]);
}

// ── Ordering and atomicity ─────────────────────────────────────────

#[test]
fn test_deltas_apply_in_version_order_regardless_of_registration() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script("baseline.sql", "CREATE TABLE applied (v VARCHAR);"))
        .unwrap();
    for (major, minor) in [(2, 0), (1, 0), (1, 10), (1, 2)] {
        let body = format!("INSERT INTO applied VALUES ('{major}.{minor}')");
        let file = fx.script(&format!("{major}_{minor}.sql"), &body);
        migrator.add_migration(file, major, minor, 0).unwrap();
    }

    migrator.update().unwrap();

    let statements = db.statements();
    let order: Vec<usize> = ["'1.0'", "'1.2'", "'1.10'", "'2.0'"]
        .iter()
        .map(|needle| position(&statements, needle))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "order was {order:?}");
    assert_eq!(stored_version(&*db), Version::new(2, 0, 0));
}

#[test]
fn test_failing_statement_rolls_back_the_whole_delta() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    migrator
        .add_migration(
            fx.script(
                "v1_1.sql",
                "CREATE TABLE two (id INTEGER);\nINSERT INTO no_such_table VALUES (1);",
            ),
            1,
            1,
            0,
        )
        .unwrap();
    migrator
        .add_migration(fx.script("v2.sql", "CREATE TABLE three (id INTEGER);"), 2, 0, 0)
        .unwrap();

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
    assert!(err.to_string().contains("1.1.0"), "{err}");
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo", "one"]);
    assert_eq!(stored_version(&*db), Version::new(1, 0, 0));
}

#[test]
fn test_version_write_failure_rolls_back_delta_statements() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    migrator
        .add_migration(fx.script("v2.sql", "CREATE TABLE two (id INTEGER);"), 2, 3, 0)
        .unwrap();
    db.fail_on(r#"["3", "v_minor"]"#);

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
    assert!(!db.list_tables().unwrap().contains(&"two".to_string()));
    assert_eq!(stored_version(&*db), Version::new(1, 0, 0));

    // Once the fault clears, the same migrator resumes where it stopped.
    db.clear_failures();
    let report = migrator.update().unwrap();
    assert_eq!(report.applied, vec![Version::new(2, 3, 0)]);
    assert_eq!(stored_version(&*db), Version::new(2, 3, 0));
}

#[test]
fn test_failing_baseline_is_rolled_back() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script(
            "baseline.sql",
            "CREATE TABLE users (id INTEGER);\nSELECT * FROM missing_table;",
        ))
        .unwrap();
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExecutionFailed);
    // Metadata bootstrap committed before the baseline started.
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo"]);
    assert_eq!(stored_version(&*db), Version::default());
}

// ── Idempotence and resume ─────────────────────────────────────────

#[test]
fn test_second_update_performs_no_writes() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script("baseline.sql", "CREATE TABLE users (id INTEGER);"))
        .unwrap();
    migrator
        .add_migration(
            fx.script("v1.sql", "ALTER TABLE users ADD COLUMN name VARCHAR;"),
            1,
            0,
            0,
        )
        .unwrap();
    migrator.update().unwrap();
    db.clear_log();

    let report = migrator.update().unwrap();

    assert!(report.is_noop());
    assert_eq!(report.final_version, Version::new(1, 0, 0));
    assert!(db.writes().is_empty(), "unexpected writes: {:?}", db.writes());
}

#[test]
fn test_resume_applies_only_newer_deltas() {
    let fx = Fixture::new();
    let db = recorded_db();
    let v1 = fx.script("v1.sql", "CREATE TABLE one (id INTEGER);");

    let mut first = migrator_over(&db);
    first.add_migration(&v1, 1, 0, 0).unwrap();
    first.update().unwrap();
    first.close();
    db.clear_log();

    let mut second = migrator_over(&db);
    second.add_migration(&v1, 1, 0, 0).unwrap();
    second
        .add_migration(fx.script("v1_1.sql", "CREATE TABLE two (id INTEGER);"), 1, 1, 0)
        .unwrap();
    second
        .add_migration(fx.script("v2.sql", "CREATE TABLE three (id INTEGER);"), 2, 0, 0)
        .unwrap();

    let report = second.update().unwrap();

    assert!(!report.bootstrapped);
    assert_eq!(
        report.applied,
        vec![Version::new(1, 1, 0), Version::new(2, 0, 0)]
    );
    assert!(!db
        .statements()
        .iter()
        .any(|s| s.contains("CREATE TABLE one")));
    assert_eq!(stored_version(&*db), Version::new(2, 0, 0));
}

#[test]
fn test_unregistered_stored_version_applies_nothing() {
    let fx = Fixture::new();
    let db = recorded_db();
    MetaStore::new(&*db).bootstrap().unwrap();
    MetaStore::new(&*db)
        .write_version(Version::new(1, 5, 0))
        .unwrap();
    db.clear_log();

    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    migrator
        .add_migration(fx.script("v2.sql", "CREATE TABLE two (id INTEGER);"), 2, 0, 0)
        .unwrap();

    let report = migrator.update().unwrap();

    assert!(report.applied.is_empty());
    assert_eq!(report.final_version, Version::new(1, 5, 0));
    assert!(db.writes().is_empty());
}

#[test]
fn test_zero_version_with_existing_metadata_starts_from_first_delta() {
    let fx = Fixture::new();
    let db = recorded_db();
    MetaStore::new(&*db).bootstrap().unwrap();

    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script("baseline.sql", "CREATE TABLE skipped (id INTEGER);"))
        .unwrap();
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();

    let report = migrator.update().unwrap();

    assert!(!report.baseline_applied);
    assert_eq!(report.applied, vec![Version::new(1, 0, 0)]);
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo", "one"]);
}

// ── Refusals ───────────────────────────────────────────────────────

#[test]
fn test_tables_without_metadata_are_refused_without_writes() {
    let fx = Fixture::new();
    let db = recorded_db();
    db.inner().execute("CREATE TABLE legacy (id INTEGER)").unwrap();

    let mut migrator = migrator_over(&db);
    migrator
        .set_baseline(fx.script("baseline.sql", "CREATE TABLE users (id INTEGER);"))
        .unwrap();
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MetadataTableMissing);
    assert!(db.statements().is_empty());
    assert_eq!(db.list_tables().unwrap(), vec!["legacy"]);
}

#[test]
fn test_corrupt_metadata_is_reported() {
    let db = recorded_db();
    MetaStore::new(&*db).bootstrap().unwrap();
    db.inner()
        .execute("DELETE FROM dbMetaInfo WHERE info = 'v_update'")
        .unwrap();

    let mut migrator = migrator_over(&db);
    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MetadataCorrupt);
    assert!(err.to_string().contains("v_update"), "{err}");
}

#[test]
fn test_wrong_shape_metadata_table_is_corrupt() {
    let fx = Fixture::new();
    let db = recorded_db();
    db.inner()
        .execute("CREATE TABLE dbMetaInfo (id INTEGER)")
        .unwrap();

    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MetadataCorrupt);
    assert!(err.to_string().contains("\"info\""), "{err}");
    assert!(db.writes().is_empty());
    assert_eq!(db.list_tables().unwrap(), vec!["dbMetaInfo"]);
}

#[test]
fn test_view_only_database_counts_as_empty() {
    let fx = Fixture::new();
    let db = recorded_db();
    db.inner()
        .execute("CREATE VIEW answer AS SELECT 42 AS value")
        .unwrap();

    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    let report = migrator.update().unwrap();

    assert!(report.bootstrapped);
    assert_eq!(report.final_version, Version::new(1, 0, 0));
}

#[test]
fn test_unreadable_baseline_fails_before_any_write() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    let baseline = fx.script("baseline.sql", "CREATE TABLE users (id INTEGER);");
    migrator.set_baseline(&baseline).unwrap();
    std::fs::remove_file(&baseline).unwrap();

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    assert!(db.statements().is_empty());
    assert!(db.list_tables().unwrap().is_empty());
}

#[test]
fn test_vanished_delta_stops_after_committed_predecessors() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    let v2 = fx.script("v2.sql", "CREATE TABLE two (id INTEGER);");
    migrator.add_migration(&v2, 2, 0, 0).unwrap();
    std::fs::remove_file(&v2).unwrap();

    let err = migrator.update().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    assert_eq!(stored_version(&*db), Version::new(1, 0, 0));
}

// ── Status ─────────────────────────────────────────────────────────

#[test]
fn test_status_tracks_progress_without_writing() {
    let fx = Fixture::new();
    let db = recorded_db();
    let mut migrator = migrator_over(&db);
    migrator
        .add_migration(fx.script("v1.sql", "CREATE TABLE one (id INTEGER);"), 1, 0, 0)
        .unwrap();
    migrator
        .add_migration(fx.script("v2.sql", "CREATE TABLE two (id INTEGER);"), 2, 0, 0)
        .unwrap();

    let before = migrator.status().unwrap();
    assert!(!before.initialized);
    assert_eq!(before.stored_version, None);
    assert_eq!(before.pending.len(), 2);
    assert_eq!(before.latest, Some(Version::new(2, 0, 0)));
    assert!(db.statements().is_empty());

    migrator.update().unwrap();

    let after = migrator.status().unwrap();
    assert!(after.is_up_to_date());
    assert_eq!(after.stored_version, Some(Version::new(2, 0, 0)));
}

// ── Persistence ────────────────────────────────────────────────────

#[test]
fn test_file_database_keeps_version_across_connections() {
    let fx = Fixture::new();
    let config = dm_core::DatabaseConfig::duckdb(fx.db_path());
    let v1 = fx.script("v1.sql", "CREATE TABLE one (id INTEGER);");
    let v2 = fx.script("v2.sql", "CREATE TABLE two (id INTEGER);");

    let mut first = Migrator::open(&config).unwrap();
    first.add_migration(&v1, 1, 0, 0).unwrap();
    first.update().unwrap();
    first.close();

    let mut second = Migrator::open(&config).unwrap();
    second.add_migration(&v1, 1, 0, 0).unwrap();
    second.add_migration(&v2, 2, 0, 0).unwrap();
    let report = second.update().unwrap();
    assert_eq!(report.applied, vec![Version::new(2, 0, 0)]);
    second.close();

    let reopened = Migrator::open(&config).unwrap();
    assert_eq!(stored_version(reopened.database()), Version::new(2, 0, 0));
}
