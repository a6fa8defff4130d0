//! xlsx2woo CLI
//!
//! 在庫ワークブックをWooCommerceのインポートCSVに変換する。

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xlsx2woo::{
    check_structure, default_output_name, export_catalog, load_inventory, CatalogBuilder,
    CatalogError, CatalogSummary, ImageConfig, ImageResolver, StructureReport,
};

/// Convert a product inventory workbook into a WooCommerce import CSV
#[derive(Debug, Parser)]
#[command(name = "xlsx2woo", version, about)]
struct Cli {
    /// Inventory workbook (.xlsx, .xls, .ods) or CSV file
    #[arg(default_value = "Productos.xlsx")]
    input: PathBuf,

    /// Sample mode: at most 4 products per category and 100 in total
    #[arg(short = 'e', long = "ejemplo", visible_alias = "sample")]
    sample: bool,

    /// Attach a cached placeholder image to every product
    #[arg(short = 'i', long = "imagenes", visible_alias = "images")]
    images: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(&cli) {
        Ok(path) => {
            println!();
            println!("Conversion completed: {}", path.display());
            println!("The file is ready to import in WooCommerce.");
        }
        Err(e) => {
            handle_error(&e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, CatalogError> {
    println!("=== xlsx2woo: inventory -> WooCommerce ===");
    println!(
        "Mode: {}{}",
        if cli.sample { "sample" } else { "full" },
        if cli.images { " + images" } else { "" }
    );

    // 1. 読み込みと構造チェック
    let tables = load_inventory(&cli.input)?;
    let assembler = CatalogBuilder::new().with_sample_mode(cli.sample).build()?;
    let reports = check_structure(&tables, &assembler.config().expected_columns);
    print_structure(&reports);

    // 2. 組み立て（画像リゾルバーは実行全体で1つ）
    let mut resolver = if cli.images {
        Some(ImageResolver::local_download(&ImageConfig::default())?)
    } else {
        None
    };
    let catalog = assembler.assemble(&tables, resolver.as_mut());

    if let Some(resolver) = &resolver {
        if let Err(e) = resolver.persist() {
            tracing::warn!(error = %e, "Could not save image cache");
        }
        let stats = resolver.stats();
        println!(
            "Images: {} from cache, {} resolved, {} without image",
            stats.cache_hits, stats.resolved, stats.failed
        );
    }

    if catalog.records.is_empty() {
        return Err(CatalogError::Config(
            "No products could be converted from the input".to_string(),
        ));
    }

    // 3. サマリー
    print_summary(&CatalogSummary::from_records(&catalog.records));
    if !catalog.skipped.is_empty() {
        println!("Skipped rows: {}", catalog.skipped.len());
    }

    // 4. 書き出し
    let output = PathBuf::from(default_output_name(chrono::Local::now().naive_local()));
    export_catalog(&catalog.records, &assembler.config().schema, output)
}

fn print_structure(reports: &[StructureReport]) {
    println!();
    println!("Found {} category(ies):", reports.len());
    for report in reports {
        println!("  {} ({} rows)", report.category, report.row_count);
        if !report.is_complete() {
            println!("    missing columns: {}", report.missing.join(", "));
        }
    }
}

fn print_summary(summary: &CatalogSummary) {
    println!();
    println!("=== CONVERSION SUMMARY ===");
    println!("Products converted: {}", summary.total);

    println!("Products per category:");
    for (category, count) in &summary.per_category {
        println!("  {}: {}", category, count);
    }

    if let Some(prices) = summary.prices {
        println!("Average price: {:.2}€", prices.mean);
        println!("Minimum price: {:.2}€", prices.min);
        println!("Maximum price: {:.2}€", prices.max);
    }
    if summary.with_images > 0 {
        println!("Products with image: {}", summary.with_images);
    }

    println!("First products:");
    for product in &summary.preview {
        println!(
            "  {} | {:.2} | {} | {}",
            product.name, product.price, product.category, product.sku
        );
    }
}

fn handle_error(error: &CatalogError) {
    match error {
        CatalogError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        CatalogError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid spreadsheet or may be corrupted.");
        }
        CatalogError::Csv(csv_err) => {
            eprintln!("CSV Error: {}", csv_err);
        }
        CatalogError::Config(msg) => {
            eprintln!("Error: {}", msg);
        }
        other => {
            eprintln!("Error: {}", other);
        }
    }
}
