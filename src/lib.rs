//! xlsx2woo - Convert spreadsheet inventories into WooCommerce import files
//!
//! This crate reads a product inventory (a multi-sheet workbook, or a single
//! delimited file) and produces a flat CSV that WooCommerce's product importer
//! accepts. Each sheet name becomes the product category, tax-inclusive totals
//! are converted to base prices, and optionally every product gets a cached
//! placeholder image.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsx2woo::{export_catalog, load_inventory, CatalogBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Read every sheet of the workbook
//!     let tables = load_inventory("Productos.xlsx")?;
//!
//!     // Map rows into import records
//!     let assembler = CatalogBuilder::new().build()?;
//!     let catalog = assembler.assemble(&tables, None);
//!
//!     // Write the WooCommerce CSV (UTF-8 with BOM)
//!     export_catalog(&catalog.records, &assembler.config().schema, "productos.csv")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Sample Mode and Images
//!
//! ```rust,no_run
//! use xlsx2woo::{load_inventory, CatalogBuilder, ImageConfig, ImageResolver};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tables = load_inventory("Productos.xlsx")?;
//!
//!     // At most 4 products per category, 100 in total
//!     let assembler = CatalogBuilder::new().with_sample_mode(true).build()?;
//!
//!     // One resolver for the whole run, so the cache is shared by every row
//!     let mut images = ImageResolver::local_download(&ImageConfig::default())?;
//!     let catalog = assembler.assemble(&tables, Some(&mut images));
//!
//!     // The cache is written once, after all rows are processed
//!     if let Err(e) = images.persist() {
//!         eprintln!("warning: could not save image cache: {}", e);
//!     }
//!
//!     println!("{} products", catalog.records.len());
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
pub mod image;
mod mapper;
mod output;
mod package;
mod parser;
mod price;
mod report;
pub mod schema;
mod types;
mod verify;

// 公開API
pub use builder::{
    AssembledCatalog, CatalogAssembler, CatalogBuilder, CatalogConfig, ProductDefaults,
    SampleLimits, SkippedRow,
};
pub use error::CatalogError;
pub use image::{ImageConfig, ImageProvider, ImageRequest, ImageResolver};
pub use mapper::{category_tag, RecordMapper};
pub use output::{default_output_name, export_catalog, write_catalog};
pub use package::{archive_name, list_images, package_images, PackageSummary};
pub use parser::{check_structure, load_inventory, StructureReport};
pub use price::{PriceNormalizer, DEFAULT_TAX_MULTIPLIER};
pub use report::{CatalogSummary, PriceStats, ProductPreview};
pub use schema::{OutputRecord, Schema};
pub use types::{InputRow, RawValue, SourceTable};
pub use verify::{verify_catalog, ImageSample, VerificationReport};
