// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Developer tasks for the workspace: linting, building, testing, coverage,
//! dependency checks and migration verification.
//!
//! - `cargo xtask ci` runs the full pipeline
//! - `cargo xtask verify-migrations` applies the embedded `SQLite` migrations
//!   to a scratch database, checks the resulting schema and reverts them
//!
//! Nothing here needs external infrastructure; the database is in-memory.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run every check CI runs
    CI,

    #[command(visible_alias = "b")]
    Build,

    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov report to `target/lcov.info`
    #[command(visible_alias = "cov")]
    Coverage,

    /// Audit dependencies with cargo-deny
    #[command(visible_alias = "cd")]
    Deny,

    /// Find unused dependencies with cargo-machete
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy, rustdoc, rustfmt and typos checks
    #[command(visible_alias = "l")]
    Lint,

    /// Run the workspace tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply, check and revert the embedded `SQLite` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(vec!["build", "--workspace", "--all-targets"]),
            Self::Check => run_cargo(vec!["check", "--workspace", "--all-targets"]),
            Self::Coverage => run_cargo(vec![
                "llvm-cov",
                "--workspace",
                "--lcov",
                "--output-path",
                "target/lcov.info",
            ]),
            Self::Deny => run_cargo(vec!["deny", "check"]),
            Self::Machete => {
                cmd!("cargo-machete").run_with_trace()?;
                Ok(())
            }
            Self::Lint => lint(),
            Self::Test => run_cargo(vec!["test", "--workspace", "--all-targets"]),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    for step in [
        Command::Lint,
        Command::Deny,
        Command::Machete,
        Command::Build,
        Command::Test,
        Command::VerifyMigrations,
    ] {
        tracing::info!(?step, "CI step");
        step.run()?;
    }
    Ok(())
}

/// Clippy with warnings denied, rustdoc on nightly, rustfmt check and typos
fn lint() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ])?;

    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;
    for package in meta.workspace_default_packages() {
        cmd("cargo", ["doc", "--no-deps", "--package", &package.name])
            .env_remove("CARGO")
            .env("RUSTUP_TOOLCHAIN", "nightly")
            .env("RUSTDOCFLAGS", "-D warnings")
            .run_with_trace()?;
    }

    cmd("cargo", ["fmt", "--all", "--check"])
        // set by the outer `cargo xtask` invocation
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;

    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Verify the embedded `SQLite` migrations
///
/// 1. Applies every migration to an in-memory database with foreign keys on
/// 2. Introspects tables, columns, foreign keys and unique constraints
/// 3. Checks them against the tables the persistence layer maps
/// 4. Reverts every migration and checks that no table is left behind
/// 5. Re-applies the migrations to prove the round trip is repeatable
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    tracing::info!("Applying migrations");
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Applied {} migration(s)", applied.len());

    tracing::info!("Introspecting schema");
    let schema = introspect_sqlite_schema(&mut conn)?;
    check_schema(&schema)?;

    tracing::info!("Reverting migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;

    let leftover = introspect_sqlite_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: tables left after revert: {:?}",
            leftover.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("Re-applying migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to re-apply migrations: {}", e))?;
    if introspect_sqlite_schema(&mut conn)? != schema {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: re-applied schema differs from the first run"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Tables mapped by the persistence layer, with the columns it reads.
const EXPECTED_TABLES: &[(&str, &[&str])] = &[
    (
        "users",
        &[
            "user_id",
            "auth_id",
            "role",
            "name",
            "birth_date",
            "is_verified",
            "created_at",
        ],
    ),
    ("admins", &["admin_id", "auth_id", "permissions_json"]),
    (
        "model_services",
        &[
            "service_id",
            "model_id",
            "title",
            "description",
            "price",
            "is_active",
            "created_at",
        ],
    ),
    (
        "slots",
        &[
            "slot_id",
            "model_id",
            "start_time",
            "end_time",
            "status",
            "created_at",
        ],
    ),
    (
        "bookings",
        &[
            "booking_id",
            "client_id",
            "service_id",
            "slot_id",
            "street",
            "house",
            "apartment",
            "entrance",
            "floor",
            "comment",
            "status",
            "expires_at",
            "created_at",
        ],
    ),
    ("orders", &["order_id", "booking_id", "status", "created_at"]),
];

/// `(table, column, referenced table)` for every required foreign key.
const EXPECTED_FOREIGN_KEYS: &[(&str, &str, &str)] = &[
    ("model_services", "model_id", "users"),
    ("slots", "model_id", "users"),
    ("bookings", "client_id", "users"),
    ("bookings", "service_id", "model_services"),
    ("bookings", "slot_id", "slots"),
    ("orders", "booking_id", "bookings"),
];

/// Single-column uniqueness the services rely on.
const EXPECTED_UNIQUE: &[(&str, &str)] = &[
    ("users", "auth_id"),
    ("admins", "auth_id"),
    ("orders", "booking_id"),
];

/// Compare an introspected schema against the expected tables and constraints
fn check_schema(schema: &Schema) -> Result<()> {
    let expected: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|(name, _)| *name).collect();
    let actual: BTreeSet<&str> = schema.tables.keys().map(String::as_str).collect();
    if expected != actual {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: table set mismatch\n  Expected: {:?}\n  Actual: {:?}",
            expected,
            actual
        ));
    }

    for (table_name, columns) in EXPECTED_TABLES {
        let table = &schema.tables[*table_name];
        for column in *columns {
            if !table.columns.contains_key(*column) {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Migration verification FAILED: column '{}.{}' is missing",
                    table_name,
                    column
                ));
            }
        }
        if table.primary_keys.len() != 1 {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: table '{}' must have a single-column primary key, found {:?}",
                table_name,
                table.primary_keys
            ));
        }
    }

    for (table_name, column, to_table) in EXPECTED_FOREIGN_KEYS {
        let found = schema.tables[*table_name]
            .foreign_keys
            .iter()
            .any(|fk| fk.from_column == *column && fk.to_table == *to_table);
        if !found {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: missing foreign key {}.{} -> {}",
                table_name,
                column,
                to_table
            ));
        }
    }

    for (table_name, column) in EXPECTED_UNIQUE {
        let found = schema.tables[*table_name]
            .unique_constraints
            .iter()
            .any(|unique| unique.columns.len() == 1 && unique.columns[0] == *column);
        if !found {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: '{}.{}' is not unique",
                table_name,
                column
            ));
        }
    }

    tracing::info!(
        "Schema has {} tables, {} foreign keys checked",
        schema.tables.len(),
        EXPECTED_FOREIGN_KEYS.len()
    );
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    declared_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            if col.pk > 0 {
                table_info.primary_keys.insert(col.name.clone());
            }
            table_info.columns.insert(
                col.name,
                Column {
                    declared_type: col.r#type.to_uppercase(),
                    nullable: col.notnull == 0,
                },
            );
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // origin 'u' covers UNIQUE column constraints, including sqlite_autoindex_*
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
