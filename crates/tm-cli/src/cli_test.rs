use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_migrate_with_globals() {
    let cli = Cli::try_parse_from([
        "tm",
        "--dir",
        "db/migrations",
        "--table",
        "schema_history",
        "--backend",
        "duckdb",
        "--database-path",
        "app.duckdb",
        "migrate",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Migrate));
    assert_eq!(cli.global.dir.as_deref(), Some("db/migrations"));
    assert_eq!(cli.global.table.as_deref(), Some("schema_history"));
    assert_eq!(cli.global.backend, Some(BackendArg::Duckdb));
    assert_eq!(cli.global.database_path.as_deref(), Some("app.duckdb"));
}

#[test]
fn test_parse_status_pending_only() {
    let cli = Cli::try_parse_from(["tm", "status", "--pending-only", "-v"]).unwrap();

    match cli.command {
        Commands::Status(args) => assert!(args.pending_only),
        other => panic!("expected status, got {other:?}"),
    }
    assert!(cli.global.verbose);
}

#[test]
fn test_rejects_unknown_backend() {
    assert!(Cli::try_parse_from(["tm", "--backend", "oracle", "migrate"]).is_err());
}

#[test]
fn test_backend_maps_to_db_type() {
    assert_eq!(DbType::from(BackendArg::Duckdb), DbType::DuckDb);
    assert_eq!(DbType::from(BackendArg::Mysql), DbType::MySql);
}
