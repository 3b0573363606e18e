use adscout_core::ProductFields;
use chrono::{TimeZone, Utc};

use super::*;

/// Fresh scratch directory under the system temp dir, unique per test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "adscout-export-{name}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn local_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 1, 9, 5, 7).unwrap()
}

fn record(id: &str, brand: &str, price: f64, tags: &[&str]) -> ProductRecord {
    ProductRecord::new(
        ProductFields {
            product_id: id.to_owned(),
            name: format!("Laptop, model {id}"),
            brand: brand.to_owned(),
            price,
            original_price: price + 500.0,
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            ..ProductFields::default()
        },
        1,
        Utc.with_ymd_and_hms(2026, 6, 1, 6, 5, 7).unwrap(),
    )
}

#[test]
fn base_filename_uses_keyword_and_timestamp() {
    assert_eq!(
        base_filename("laptop", local_time()),
        "ecommerce_laptop_20260601_090507"
    );
}

#[test]
fn base_filename_replaces_path_unsafe_characters() {
    assert_eq!(
        base_filename("usb/c", local_time()),
        "ecommerce_usb_c_20260601_090507"
    );
    assert_eq!(
        base_filename(" oyuncu ..\\kulaklık? ", local_time()),
        "ecommerce_oyuncu____kulaklık__20260601_090507"
    );
}

#[test]
fn export_all_accepts_keyword_with_slash() {
    let dir = scratch_dir("slash");
    let paths = export_all(&[record("1", "Anker", 300.0, &[])], "usb/c", &dir, local_time()).unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.exists(), "{} missing", path.display());
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn export_all_with_no_records_writes_nothing() {
    let dir = scratch_dir("empty");
    let paths = export_all(&[], "laptop", &dir, local_time()).unwrap();
    assert!(paths.is_empty());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn export_all_writes_three_files() {
    let dir = scratch_dir("all");
    let records = vec![record("1", "Asus", 1_000.0, &[]), record("2", "HP", 2_000.0, &[])];
    let paths = export_all(&records, "laptop", &dir, local_time()).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "ecommerce_laptop_20260601_090507.csv",
            "ecommerce_laptop_20260601_090507.json",
            "ecommerce_laptop_20260601_090507_summary.txt",
        ]
    );
    for path in &paths {
        assert!(path.exists(), "{} missing", path.display());
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn csv_starts_with_bom_and_header() {
    let dir = scratch_dir("csv");
    let path = dir.join("out.csv");
    write_csv(&[record("7", "Asus", 10.0, &["a", "b"])], &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));

    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("product_id,name,brand,price,original_price"));
    assert!(header.ends_with("savings,scraped_page,scraped_at"));

    let row = lines.next().unwrap();
    assert!(row.starts_with("7,\"Laptop, model 7\",Asus,10.0,510.0"));
    assert!(row.contains(",a;b,"));
    assert!(row.ends_with("2026-06-01T06:05:07Z"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn json_export_reads_back_identically() {
    let dir = scratch_dir("json");
    let path = dir.join("out.json");
    let records = vec![
        record("1", "Asus", 1_250.5, &["x"]),
        record("2", "HP", 999.0, &[]),
        ProductRecord::new(
            ProductFields {
                product_id: "3".to_owned(),
                price: 83_084.37,
                original_price: 83_468.32,
                ..ProductFields::default()
            },
            2,
            Utc.with_ymd_and_hms(2026, 6, 1, 6, 5, 7).unwrap(),
        ),
    ];
    write_json(&records, &path).unwrap();
    assert_eq!(read_json(&path).unwrap(), records);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn read_json_rejects_non_array() {
    let dir = scratch_dir("bad-json");
    let path = dir.join("bad.json");
    std::fs::write(&path, r#"{"not":"records"}"#).unwrap();
    assert!(matches!(
        read_json(&path),
        Err(ScraperError::Deserialize { .. })
    ));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn read_json_missing_file_is_export_error() {
    let dir = scratch_dir("missing");
    assert!(matches!(
        read_json(&dir.join("nope.json")),
        Err(ScraperError::Export { .. })
    ));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn summary_lists_keyword_counts_and_range() {
    let records = vec![
        record("1", "Asus", 1_000.0, &[]),
        record("2", "Asus", 3_000.0, &[]),
        record("3", "HP", 2_000.0, &[]),
    ];
    let text = render_summary(&records, "laptop", local_time());
    assert!(text.starts_with("E-commerce Scraping Summary\n"));
    assert!(text.contains("Keyword: laptop\n"));
    assert!(text.contains("Products: 3\n"));
    assert!(text.contains("Scraped: 2026-06-01 09:05:07\n"));
    assert!(text.contains("Brands: 2\n"));
    assert!(text.contains("Price Range: 1000 - 3000 TRY\n"));
}
