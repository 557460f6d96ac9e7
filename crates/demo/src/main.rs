// File: crates/demo/src/main.rs
// Summary: Demo loads a CSV category table into a 2D store, stacks it, and pivots two columns to XY.
// Usage: chart-data-demo [table.csv] [baseline]

use anyhow::{Context, Result};
use chart_data::{
    extract_column_values, extract_stack_base_values, extract_xy_from_columns_2d, ExtractOptions,
    KeyedValues2D,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept path from CLI or fall back to the bundled sample (supports .csv/.cvs swap)
    let raw = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/data/quarterly_sales.csv").to_string());
    let baseline = match std::env::args().nth(2) {
        Some(s) => s.parse::<f64>().with_context(|| format!("baseline '{s}' is not a number"))?,
        None => 0.0,
    };

    let (path, used_alt) = resolve_path(&raw)?;
    tracing::info!(path = %path.display(), used_alt, "using input file");

    let mut table = load_table_csv(&path)
        .with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    if table.is_empty() {
        anyhow::bail!("no cells loaded; check headers/delimiter.");
    }
    table.add_listener(|t: &KeyedValues2D| {
        tracing::info!(rows = t.row_count(), columns = t.column_count(), "table changed");
    });
    if let Some(first) = table.column_key(0).map(str::to_string) {
        table.set_column_property(&first, "symbols", serde_json::json!(["low", "mid", "high"]), true)?;
    }
    tracing::info!(rows = table.row_count(), columns = table.column_count(), "loaded table");

    // 1) Stacked baselines, one per cell
    let stacked = extract_stack_base_values(&table, baseline);
    for (r, row_key) in stacked.row_keys().iter().enumerate() {
        let bases: Vec<String> = (0..stacked.column_count())
            .map(|c| stacked.value(r, c).map_or("-".to_string(), |v| format!("{v:.2}")))
            .collect();
        println!("{row_key:>8}: {}", bases.join("  "));
    }
    let out_stack = out_name_with(&path, "stack");
    std::fs::write(&out_stack, stacked.to_json()?)?;
    println!("Wrote {}", out_stack.display());

    // 2) Column totals for the first quarter
    if let Some(first) = table.column_key(0) {
        let column = extract_column_values(&table, first)?;
        println!(
            "{first}: total {:.2}, min {:?}, max {:?}",
            column.total(),
            column.min(),
            column.max()
        );
    }

    // 3) XY pivot of the first two columns
    if let (Some(x), Some(y)) = (table.column_key(0), table.column_key(1)) {
        let xy = extract_xy_from_columns_2d(&table, x, y, &ExtractOptions::with_series_key("regions"))?;
        let [xmin, xmax, ymin, ymax] = xy.bounds();
        println!("XY {x} vs {y}: {} items, x [{xmin}, {xmax}], y [{ymin}, {ymax}]", xy.item_count(0));
        let out_xy = out_name_with(&path, "xy");
        std::fs::write(&out_xy, xy.to_json()?)?;
        println!("Wrote {}", out_xy.display());
    }

    Ok(())
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Produce output file name like target/out/table_<stem>_<suffix>.json
fn out_name_with(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("table");
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("table_{stem}_{suffix}.json"));
    out
}

/// Load a category table: first header names the row-key column, the rest are column keys.
/// Blank or non-numeric cells load as absent.
fn load_table_csv(path: &Path) -> Result<KeyedValues2D> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let columns = rdr.headers()?.iter().skip(1).map(str::to_string).collect::<Vec<_>>();
    tracing::debug!(?columns, "headers");

    let mut table = KeyedValues2D::new();
    for rec in rdr.records() {
        let rec = rec?;
        let Some(row_key) = rec.get(0).filter(|k| !k.is_empty()) else {
            tracing::warn!(line = ?rec.position().map(|p| p.line()), "skipping record without a row key");
            continue;
        };
        for (column_key, cell) in columns.iter().zip(rec.iter().skip(1)) {
            table.add(row_key, column_key, cell.parse::<f64>().ok(), false);
        }
    }
    Ok(table)
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
