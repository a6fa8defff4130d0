//! verify-catalog
//!
//! 書き出したカタログCSVの画像ロケータを確認する。

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xlsx2woo::verify_catalog;

/// Check image locators of an exported WooCommerce catalog
#[derive(Debug, Parser)]
#[command(name = "verify-catalog", version, about)]
struct Cli {
    /// Exported catalog CSV
    catalog: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let report = match verify_catalog(&cli.catalog) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Verified: {}", cli.catalog.display());
    println!("Total products: {}", report.total);
    println!("Products with image: {}", report.with_images);
    println!("With image: {:.1}%", report.image_percentage());

    println!();
    println!("Examples:");
    for sample in &report.samples {
        let status = if sample.exists { "ok     " } else { "missing" };
        println!("  [{}] {}: {}", status, truncate(&sample.name, 25), sample.locator);
    }

    println!();
    println!(
        "Local files found: {} of {}",
        report.existing_files, report.with_images
    );
    if report.with_images > 0 && report.existing_files == 0 {
        eprintln!("No image files were found locally");
        process::exit(1);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
