//! package-images
//!
//! 画像ディレクトリをWordPressアップロード用のZIPにまとめる。

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xlsx2woo::{package_images, ImageConfig};

/// Bundle downloaded product images into a timestamped ZIP archive
#[derive(Debug, Parser)]
#[command(name = "package-images", version, about)]
struct Cli {
    /// Print the complete upload guide and exit
    #[arg(short = 'g', long = "guia", visible_alias = "guide")]
    guide: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if cli.guide {
        print_guide();
        return;
    }

    let images_dir = ImageConfig::default().image_dir;
    let timestamp = chrono::Local::now().naive_local();

    match package_images(&images_dir, &PathBuf::from("."), timestamp) {
        Ok(summary) => {
            println!("Package created: {}", summary.path.display());
            println!("Contains {} images", summary.file_count);
            println!();
            println!("Upload instructions:");
            println!("1. Connect to your WordPress server (FTP/cPanel)");
            println!("2. Open /wp-content/uploads/");
            println!("3. Upload {}", summary.path.display());
            println!("4. Extract the archive there");
            println!("5. Import the CSV in WooCommerce");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run first: xlsx2woo --ejemplo --imagenes");
            process::exit(1);
        }
    }
}

fn print_guide() {
    println!("=== WOOCOMMERCE IMAGE GUIDE ===");
    println!();
    println!("Complete process:");
    println!("1. xlsx2woo --ejemplo --imagenes");
    println!("2. package-images");
    println!("3. Upload the ZIP to WordPress");
    println!("4. Import the CSV in WooCommerce");
    println!();
    println!("Generated layout:");
    println!("  productos_woocommerce_YYYYMMDD_HHMMSS.csv");
    println!("  product_images/");
    println!("    producto-0001-chesterfield-24.jpg");
    println!("    producto-0002-carton-chesterfield.jpg");
    println!("  woocommerce_images_YYYYMMDD_HHMMSS.zip");
    println!("  image_cache.json");
    println!();
    println!("WordPress path: /wp-content/uploads/producto-XXXX-nombre.jpg");
}
