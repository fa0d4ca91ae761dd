//! Text rendering for dashboard payloads.

use bizboard_lib::api::query::Column;
use bizboard_lib::model::Record;
use bizboard_lib::model::Summary;

/// Renders the summary counters as a KPI block.
pub fn summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total records         {}\n",
        thousands(summary.total_records)
    ));
    out.push_str(&format!(
        "Unique states         {}\n",
        thousands(summary.unique_states)
    ));
    out.push_str(&format!(
        "Unique cities         {}\n",
        thousands(summary.unique_cities)
    ));
    out.push_str(&format!(
        "Unique owners         {}\n",
        thousands(summary.unique_owners)
    ));
    out.push_str(&format!(
        "Phones present        {} ({}%)\n",
        thousands(summary.phones_present),
        summary.phones_present_percent()
    ));
    out.push_str(&format!(
        "Phones missing        {}\n",
        thousands(summary.phones_missing)
    ));
    out.push_str(&format!(
        "Potential duplicates  {}\n",
        thousands(summary.potential_duplicates)
    ));
    out
}

/// Renders labeled counts as a horizontal text bar chart.
///
/// Bars scale to the largest count; zero-count rows still get a label.
pub fn bar_chart(rows: &[(String, u64)], width: usize) -> String {
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut out = String::new();
    for (label, count) in rows {
        let bar_len = if max == 0 {
            0
        } else {
            (*count as usize * width).div_ceil(max as usize)
        };
        out.push_str(&format!(
            "{label:<label_width$}  {:<width$}  {}\n",
            "#".repeat(bar_len),
            thousands(*count)
        ));
    }
    out
}

/// Renders one page of the record table with a DataTables-style footer.
pub fn table(columns: &[Column], rows: &[Record], offset: u64, filtered: u64, total: u64) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.field().len()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            widths[i] = widths[i].max(row.display(column.field()).len());
        }
    }

    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", column.field(), width = widths[i]));
    }
    out.push('\n');
    for width in &widths {
        out.push_str(&format!("{:-<width$}  ", "", width = *width));
    }
    out.push('\n');
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            out.push_str(&format!(
                "{:<width$}  ",
                row.display(column.field()),
                width = widths[i]
            ));
        }
        out.push('\n');
    }

    if rows.is_empty() {
        out.push_str("No matching records\n");
    } else {
        let from = offset + 1;
        let to = offset + rows.len() as u64;
        out.push_str(&format!(
            "Showing {from} to {to} of {} entries",
            thousands(filtered)
        ));
        if filtered != total {
            out.push_str(&format!(" (filtered from {} total)", thousands(total)));
        }
        out.push('\n');
    }
    out
}

/// Formats a count with thousands separators, the way the web dashboard
/// renders its counters.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
