//! Interactive table pager.

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use bizboard_lib::api::query::Column;
use bizboard_lib::api::query::Direction;
use bizboard_lib::controller::ErrorKind;
use bizboard_lib::controller::Phase;
use bizboard_lib::controller::TableController;
use bizboard_lib::store::RecordStore;

use crate::CliError;
use crate::column_index;
use crate::render;

const HELP: &str = "\
Commands:
  n            next page
  p            previous page
  g PAGE       go to page
  l SIZE       set page size (10, 25, 50 or 100)
  s [TEXT]     search (empty clears)
  o FIELD      toggle sort on a column
  r            retry after an error
  h            this help
  q            quit";

/// Runs the pager loop over stdin commands until `q` or end of input.
pub async fn run<S: RecordStore + 'static>(store: S, columns: Vec<Column>) -> Result<(), CliError> {
    let mut controller = TableController::new(store, columns);
    controller.mount();
    controller.settle().await;
    print_page(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "q" => break,
            "h" | "?" | "help" => {
                println!("{HELP}");
                continue;
            }
            "n" => {
                if !controller.next_page() {
                    println!("Already on the last page");
                }
            }
            "p" => {
                if !controller.prev_page() {
                    println!("Already on the first page");
                }
            }
            "g" => match argument.parse::<u64>() {
                Ok(page) if page > 0 => {
                    let offset = (page - 1) * controller.state().page_size();
                    controller.goto_offset(offset);
                }
                _ => println!("Usage: g PAGE"),
            },
            "l" => match argument.parse::<u64>() {
                Ok(size) => {
                    if let Err(error) = controller.set_page_size(size) {
                        println!("{error}");
                    }
                }
                Err(_) => println!("Usage: l SIZE"),
            },
            "s" => controller.search(argument),
            "o" => match column_index(controller.state().columns(), argument) {
                Some(column) => {
                    if let Err(error) = controller.toggle_sort(column) {
                        println!("{error}");
                    }
                }
                None => println!("Unknown column: {argument}"),
            },
            "r" => controller.retry(),
            "" => {}
            other => {
                println!("Unknown command `{other}` (h for help)");
                continue;
            }
        }

        controller.settle().await;
        print_page(&controller);
    }

    Ok(())
}

fn print_page<S: RecordStore + 'static>(controller: &TableController<S>) {
    let snapshot = controller.snapshot();

    println!();
    print!(
        "{}",
        render::table(
            snapshot.columns,
            snapshot.rows,
            snapshot.offset,
            snapshot.records_filtered.unwrap_or(0),
            snapshot.records_total.unwrap_or(0),
        )
    );

    let mut status = format!(
        "Page {} of {}",
        snapshot.page(),
        snapshot
            .page_count()
            .map_or_else(|| "?".to_string(), |count| count.to_string())
    );
    if !snapshot.search.is_empty() {
        status.push_str(&format!("  search: {:?}", snapshot.search));
    }
    if let Some(key) = snapshot.order.first() {
        let field = snapshot.columns[key.column].field();
        let direction = match key.direction {
            Direction::Asc => "ascending",
            Direction::Desc => "descending",
        };
        status.push_str(&format!("  sort: {field} {direction}"));
    }
    println!("{status}");

    if let Phase::Error(kind) = snapshot.phase {
        let label = match kind {
            ErrorKind::Transport => "transport failure",
            ErrorKind::Protocol => "protocol violation",
            ErrorKind::Timeout => "timeout",
        };
        println!("Request failed ({label}); previous results shown. `r` to retry.");
    }
}
