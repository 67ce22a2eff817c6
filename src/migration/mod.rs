//! SeaORM database migrations.
//!
//! Tables are built with the schema builder so the same migrations run on
//! PostgreSQL and on the SQLite databases used by the test suite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_cases;
mod m20260301_000002_create_audits;
mod m20260301_000003_create_pages;
mod m20260301_000004_create_wcag_definitions;
mod m20260301_000005_create_check_results;
mod m20260301_000006_create_statement_checks;
mod m20260301_000007_create_statement_check_results;
mod m20260301_000008_create_retests;
mod m20260301_000009_create_retest_pages;
mod m20260301_000010_create_retest_check_results;
mod m20260301_000011_create_retest_statement_check_results;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_cases::Migration),
            Box::new(m20260301_000002_create_audits::Migration),
            Box::new(m20260301_000003_create_pages::Migration),
            Box::new(m20260301_000004_create_wcag_definitions::Migration),
            Box::new(m20260301_000005_create_check_results::Migration),
            Box::new(m20260301_000006_create_statement_checks::Migration),
            Box::new(m20260301_000007_create_statement_check_results::Migration),
            Box::new(m20260301_000008_create_retests::Migration),
            Box::new(m20260301_000009_create_retest_pages::Migration),
            Box::new(m20260301_000010_create_retest_check_results::Migration),
            Box::new(m20260301_000011_create_retest_statement_check_results::Migration),
        ]
    }
}
