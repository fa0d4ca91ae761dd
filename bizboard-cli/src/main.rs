mod browse;
mod demo;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use bizboard_lib::DashboardClient;
use bizboard_lib::api::query::{Column, Direction, PageRequest, SortKey};

#[derive(Parser)]
#[command(name = "bizboard")]
#[command(about = "Business records dashboard in the terminal")]
struct Cli {
    /// Dashboard API base URL.
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    url: String,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the summary counters.
    Summary,
    /// Show the top states by record count.
    TopStates {
        #[arg(long, default_value_t = 12)]
        limit: usize,
    },
    /// Show the top cities by record count.
    TopCities {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Fetch one page of the record table.
    Table {
        #[arg(long, default_value_t = 25)]
        page_size: u64,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        search: Option<String>,
        /// Sort directive, e.g. `State` or `State:desc`.
        #[arg(long)]
        sort: Option<String>,
    },
    /// Browse the record table interactively.
    Browse {
        /// Run against a seeded in-memory store instead of the API.
        #[arg(long, default_value_t = false)]
        demo: bool,
    },
    /// Download the full record set as CSV.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("API error: {0}")]
    Api(#[from] bizboard_lib::error::Error),

    #[error("unknown sort field `{0}`")]
    UnknownSortField(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The dashboard's column list, in display order.
fn dashboard_columns() -> Vec<Column> {
    vec![
        Column::new("Business Name"),
        Column::new("Owner Name"),
        Column::new("City"),
        Column::new("State"),
        Column::new("Mobile Number"),
    ]
}

/// Finds a column by field name, case-insensitively.
fn column_index(columns: &[Column], field: &str) -> Option<usize> {
    columns
        .iter()
        .position(|column| column.field().eq_ignore_ascii_case(field))
}

/// Parses a `FIELD` or `FIELD:dir` sort directive.
fn parse_sort(directive: &str, columns: &[Column]) -> Result<SortKey, CliError> {
    let (field, direction) = match directive.rsplit_once(':') {
        Some((field, "desc")) => (field, Direction::Desc),
        Some((field, "asc")) => (field, Direction::Asc),
        _ => (directive, Direction::Asc),
    };
    let column = column_index(columns, field)
        .ok_or_else(|| CliError::UnknownSortField(field.to_string()))?;
    Ok(SortKey { column, direction })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .expect("Failed to initialize logger");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = DashboardClient::builder().url(&cli.url).build()?;
    debug!("dashboard API at {}", client.base_url());

    match cli.command {
        Commands::Summary => {
            let summary = client.summary().await?;
            print!("{}", render::summary(&summary));
        }
        Commands::TopStates { limit } => {
            let states = client.top_states(limit).await?;
            let rows: Vec<(String, u64)> = states
                .into_iter()
                .map(|entry| (entry.state, entry.count))
                .collect();
            print!("{}", render::bar_chart(&rows, 40));
        }
        Commands::TopCities { limit } => {
            let cities = client.top_cities(limit).await?;
            let rows: Vec<(String, u64)> = cities
                .iter()
                .map(|entry| (entry.label(), entry.count))
                .collect();
            print!("{}", render::bar_chart(&rows, 40));
        }
        Commands::Table {
            page_size,
            page,
            search,
            sort,
        } => {
            let columns = dashboard_columns();
            let order = match sort {
                Some(directive) => vec![parse_sort(&directive, &columns)?],
                None => Vec::new(),
            };
            let request = PageRequest::new(1)
                .with_offset(page.saturating_sub(1) * page_size)
                .with_page_size(page_size)
                .with_search(search.unwrap_or_default())
                .with_order(order);

            let response = client.table_page(&request, &columns).await?;
            print!(
                "{}",
                render::table(
                    &columns,
                    response.rows(),
                    request.offset,
                    response.records_filtered(),
                    response.records_total(),
                )
            );
        }
        Commands::Browse { demo } => {
            if demo {
                browse::run(demo::store(), dashboard_columns()).await?;
            } else {
                browse::run(client, dashboard_columns()).await?;
            }
        }
        Commands::Export { out } => {
            let csv = client.export_csv().await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    println!("Wrote {} bytes to {}", csv.len(), path.display());
                }
                None => print!("{csv}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_directive_parses_field_and_direction() {
        let columns = dashboard_columns();

        let key = parse_sort("State", &columns).unwrap();
        assert_eq!(key, SortKey::asc(3));

        let key = parse_sort("state:desc", &columns).unwrap();
        assert_eq!(key, SortKey::desc(3));

        assert!(matches!(
            parse_sort("Revenue", &columns),
            Err(CliError::UnknownSortField(_))
        ));
    }
}
