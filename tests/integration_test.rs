//! Integration Tests for xlsx2woo
//!
//! 実際のワークブックを生成し、読み込みから書き出しまでの流れを検証します。

use rust_xlsxwriter::*;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use xlsx2woo::image::{CacheKeyMode, ImageCache};
use xlsx2woo::{
    check_structure, export_catalog, load_inventory, verify_catalog, CatalogBuilder,
    CatalogError, ImageProvider, ImageRequest, ImageResolver, Schema,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// 2シートの在庫ワークブック
    ///
    /// - Tabaco: 3商品 + 空行1つ
    /// - Papel de liar: 2商品（片方は合計金額がエラー値）、PRECIO列なし
    pub fn generate_inventory(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();

        let tabaco = workbook.add_worksheet();
        tabaco.set_name("Tabaco")?;
        tabaco.write_string(0, 0, "PRODUCTO")?;
        tabaco.write_string(0, 1, "PRECIO")?;
        tabaco.write_string(0, 2, "0,3")?;
        tabaco.write_string(0, 3, "TOTAL")?;

        tabaco.write_string(1, 0, "Chesterfield 24")?;
        tabaco.write_number(1, 1, 5.0)?;
        tabaco.write_number(1, 2, 0.15)?;
        tabaco.write_string(1, 3, "5,15 €")?;

        // 行2は空行（商品名なし）
        tabaco.write_number(2, 1, 1.0)?;

        tabaco.write_string(3, 0, "Cartón Chesterfield")?;
        tabaco.write_number(3, 3, 51.5)?;

        tabaco.write_string(4, 0, "Marlboro")?;
        tabaco.write_string(4, 3, "103,00 €")?;

        let papel = workbook.add_worksheet();
        papel.set_name("Papel de liar")?;
        papel.write_string(0, 0, "PRODUCTO")?;
        papel.write_string(0, 1, "0,3")?;
        papel.write_string(0, 2, "TOTAL")?;
        papel.write_string(1, 0, "Smoking")?;
        papel.write_string(1, 2, "#VALUE!")?;
        papel.write_string(2, 0, "OCB")?;
        papel.write_string(2, 2, "2,06")?;

        workbook.save(path)?;
        Ok(())
    }

    /// カテゴリごとに`rows`商品を持つワークブック
    pub fn generate_categories(path: &Path, categories: usize, rows: u32) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        for c in 0..categories {
            let sheet = workbook.add_worksheet();
            sheet.set_name(format!("Categoria {}", c + 1))?;
            sheet.write_string(0, 0, "PRODUCTO")?;
            sheet.write_string(0, 1, "TOTAL")?;
            for r in 1..=rows {
                sheet.write_string(r, 0, format!("Producto {}-{}", c + 1, r))?;
                sheet.write_number(r, 1, 10.3)?;
            }
        }
        workbook.save(path)?;
        Ok(())
    }
}

fn read_exported(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "missing UTF-8 BOM");

    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_full_conversion() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Productos.xlsx");
    fixtures::generate_inventory(&input).unwrap();

    let tables = load_inventory(&input).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].category, "Tabaco");
    assert_eq!(tables[1].category, "Papel de liar");

    let assembler = CatalogBuilder::new().build().unwrap();
    let reports = check_structure(&tables, &assembler.config().expected_columns);
    assert!(reports[0].is_complete());
    assert_eq!(reports[1].missing, vec!["PRECIO"]);

    let catalog = assembler.assemble(&tables, None);
    assert_eq!(catalog.records.len(), 5);

    let output = dir.path().join("productos.csv");
    export_catalog(&catalog.records, &assembler.config().schema, &output).unwrap();

    let (headers, rows) = read_exported(&output);
    assert_eq!(headers.len(), 40);
    assert_eq!(headers, Schema::woocommerce().columns());
    assert_eq!(rows.len(), 5);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r[col("ID")].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

    let names: Vec<&str> = rows.iter().map(|r| r[col("Nombre")].as_str()).collect();
    assert_eq!(
        names,
        vec!["Chesterfield 24", "Cartón Chesterfield", "Marlboro", "Smoking", "OCB"]
    );

    let prices: Vec<&str> = rows.iter().map(|r| r[col("Precio normal")].as_str()).collect();
    assert_eq!(prices, vec!["5.00", "50.00", "100.00", "0.00", "2.00"]);

    assert_eq!(rows[3][col("SKU")], "SKU-0004");
    assert_eq!(rows[3][col("Categorías")], "Papel de liar");
    assert_eq!(rows[3][col("Etiquetas")], "papel-de-liar");
    assert_eq!(rows[4][col("Posición")], "5");
    assert!(rows.iter().all(|r| r.len() == 40));
}

#[test]
fn test_sample_mode_three_categories() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Productos.xlsx");
    fixtures::generate_categories(&input, 3, 10).unwrap();

    let tables = load_inventory(&input).unwrap();
    let assembler = CatalogBuilder::new().with_sample_mode(true).build().unwrap();
    let catalog = assembler.assemble(&tables, None);

    assert_eq!(catalog.records.len(), 12);
    let ids: Vec<u32> = catalog.records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<u32>>());
}

#[test]
fn test_csv_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Mecheros.csv");
    std::fs::write(
        &input,
        "PRODUCTO,PRECIO,\"0,3\",TOTAL\nClipper,\"1,00\",\"0,03\",\"1,03 €\"\n,,,\nBic,,,nan\n",
    )
    .unwrap();

    let tables = load_inventory(&input).unwrap();
    let catalog = CatalogBuilder::new().build().unwrap().assemble(&tables, None);

    assert_eq!(catalog.records.len(), 2);
    assert_eq!(catalog.records[0].category(), "Mecheros");
    assert_eq!(catalog.records[0].regular_price(), 1.0);
    assert_eq!(catalog.records[1].regular_price(), 0.0);
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = load_inventory(dir.path().join("Productos.xlsx"));
    assert!(matches!(result, Err(CatalogError::Io(_))));
}

#[test]
fn test_repeated_export_is_identical() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Productos.xlsx");
    fixtures::generate_inventory(&input).unwrap();

    let tables = load_inventory(&input).unwrap();
    let assembler = CatalogBuilder::new().build().unwrap();
    let catalog = assembler.assemble(&tables, None);
    let schema = &assembler.config().schema;

    let a = export_catalog(&catalog.records, schema, dir.path().join("a.csv")).unwrap();
    let b = export_catalog(&catalog.records, schema, dir.path().join("b.csv")).unwrap();
    assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
}

struct FileProvider {
    dir: std::path::PathBuf,
    calls: Rc<Cell<usize>>,
}

impl ImageProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn resolve(&mut self, request: &ImageRequest<'_>) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        let path = self.dir.join(format!("producto-{:04}.jpg", request.id));
        std::fs::write(&path, b"jpg").ok()?;
        Some(path.to_string_lossy().into_owned())
    }
}

#[test]
fn test_images_second_run_hits_cache() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Productos.xlsx");
    fixtures::generate_inventory(&input).unwrap();
    let cache_file = dir.path().join("image_cache.json");

    let tables = load_inventory(&input).unwrap();
    let assembler = CatalogBuilder::new().build().unwrap();

    let run = |calls: Rc<Cell<usize>>| {
        let mut resolver =
            ImageResolver::new(ImageCache::load(&cache_file), CacheKeyMode::NameWithId)
                .with_provider(FileProvider {
                    dir: dir.path().to_path_buf(),
                    calls,
                });
        let catalog = assembler.assemble(&tables, Some(&mut resolver));
        resolver.persist().unwrap();
        catalog
    };

    let first_calls = Rc::new(Cell::new(0));
    let first = run(first_calls.clone());
    assert_eq!(first_calls.get(), 5);
    assert!(first.records.iter().all(|r| !r.image().is_empty()));

    let second_calls = Rc::new(Cell::new(0));
    let second = run(second_calls.clone());
    assert_eq!(second_calls.get(), 0);
    assert_eq!(
        first.records.iter().map(|r| r.image()).collect::<Vec<_>>(),
        second.records.iter().map(|r| r.image()).collect::<Vec<_>>()
    );

    let output = dir.path().join("productos.csv");
    export_catalog(&second.records, &assembler.config().schema, &output).unwrap();
    let report = verify_catalog(&output).unwrap();
    assert_eq!(report.total, 5);
    assert_eq!(report.with_images, 5);
    assert_eq!(report.existing_files, 5);
}
