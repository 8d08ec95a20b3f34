//! Output formatting: table, JSON, YAML, plain.
//!
//! Single records render as a two-column label/value table; structured
//! formats serialize the record itself with serde.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// One line of a detail view.
#[derive(Tabled)]
pub struct DetailRow {
    #[tabled(rename = "Field")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Render a single serde-serializable item in the chosen format.
///
/// `detail_fn` produces the label/value rows of the table view and
/// `id_fn` the one line printed in plain mode.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Vec<DetailRow>,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => render_table(&detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Pair up an alternating label, value, label, value... sequence.
pub fn pairs_to_rows(cells: &[String]) -> Vec<DetailRow> {
    cells
        .chunks_exact(2)
        .map(|pair| DetailRow {
            label: pair[0].clone(),
            value: pair[1].clone(),
        })
        .collect()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
