// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use cinelog_db::{Executor, loader};
use cinelog_view::WatchlistController;
use config::Config;
use runtime::DbRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cinelog --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    init_logging(config.log_level());

    let db_path = config.db_path()?;
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let executor = Executor::new(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or CINELOG_DB_PATH",
            db_path.display()
        )
    })?;
    executor.bootstrap()?;

    if let Some(import_dir) = resolve_import_dir(&options, &config, &executor)? {
        let report = loader::import_dir(&executor, &import_dir)?;
        tracing::info!(
            files = report.files,
            inserted = report.inserted,
            skipped = report.skipped,
            "catalog import finished"
        );
    }

    if options.check_only {
        return Ok(());
    }

    print_summary(&executor)
}

/// An explicit `--import` always runs; the configured data_dir only feeds an
/// empty catalog (first run).
fn resolve_import_dir(
    options: &CliOptions,
    config: &Config,
    executor: &Executor,
) -> Result<Option<PathBuf>> {
    if let Some(dir) = &options.import_dir {
        return Ok(Some(dir.clone()));
    }
    let Some(dir) = config.data_dir() else {
        return Ok(None);
    };
    let output = executor
        .execute("SELECT COUNT(*) FROM movie", &[], false)
        .context("count movies for first-run import")?;
    let movie_count = output
        .values()
        .and_then(|values| values.first().and_then(cinelog_app::Value::as_integer))
        .unwrap_or(0);
    Ok((movie_count == 0).then_some(dir))
}

fn print_summary(executor: &Executor) -> Result<()> {
    let mut runtime = DbRuntime::new(executor);
    let tabs = runtime.load_tabs()?;

    println!("catalog");
    for tab in tabs.tabs() {
        println!(
            "  {:<10} {:>6} rows",
            tab.kind.label(),
            tab.view.model().row_count()
        );
    }

    let controller = WatchlistController::load(&mut runtime)?;
    println!("watchlists");
    if controller.panes().is_empty() {
        println!("  (none)");
    }
    for pane in controller.panes() {
        println!(
            "  {:<20} {:>4} entries  {}",
            pane.watchlist.name,
            pane.view.model().row_count(),
            pane.watchlist.description
        );
    }
    Ok(())
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    import_dir: Option<PathBuf>,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        import_dir: None,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--import" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--import requires a CSV directory"))?;
                options.import_dir = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("cinelog");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --import <dir>           Import <table>.csv files from a directory");
    println!("  --check                  Validate config + DB + startup dependencies");
    println!("  --help                   Show this help");
}
