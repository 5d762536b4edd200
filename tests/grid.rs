use std::path::{Path, PathBuf};

use csvgrid::domain::{GridConfig, GridError, Message, PAGE_SIZE};
use csvgrid::model::{Model, SortDirection, SortSpec, visible_page};
use csvgrid::store::RowStore;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_a_csv_with_header_row() {
    let store = RowStore::load(&fixture("supermarket_a.csv")).unwrap();
    assert_eq!(store.columns(), ["Invoice ID", "Branch", "City", "Total"]);
    assert_eq!(store.len(), 10);
    assert_eq!(store.records()[0]["Branch"], "A");
    assert_eq!(store.records()[1]["Total"], "80.22");
}

#[test]
fn default_sort_is_the_first_column_ascending() {
    let mut model = Model::init(&GridConfig::default());
    model.load_file(&fixture("supermarket_a.csv")).unwrap();

    let uidata = model.get_uidata();
    assert_eq!(
        uidata.sort,
        SortSpec {
            column: "Invoice ID".to_string(),
            direction: SortDirection::Ascending,
        }
    );
    assert_eq!(uidata.nrows, 10);
    assert_eq!(uidata.total_pages, 2);
    assert_eq!(uidata.rows.len(), PAGE_SIZE);
    assert_eq!(uidata.rows[0][0], "101");
    assert_eq!(uidata.rows[PAGE_SIZE - 1][0], "107");
}

#[test]
fn loading_a_new_file_replaces_all_records() {
    let mut model = Model::init(&GridConfig::default());
    model.load_file(&fixture("supermarket_a.csv")).unwrap();
    model.load_file(&fixture("supermarket_b.csv")).unwrap();

    let uidata = model.get_uidata();
    assert_eq!(uidata.columns, ["Invoice ID", "Branch", "Total"]);
    assert_eq!(uidata.nrows, 3);
    assert_eq!(uidata.rows.len(), 3);
    for row in &uidata.rows {
        assert_eq!(row[1], "Z");
    }
}

#[test]
fn page_index_survives_a_reload() {
    let mut model = Model::init(&GridConfig::default());
    model.load_file(&fixture("supermarket_a.csv")).unwrap();
    model.update(Message::NextPage).unwrap();
    assert_eq!(model.get_uidata().rows.len(), 10 - PAGE_SIZE);

    // The smaller file has no second page, so the grid ends up empty.
    model.load_file(&fixture("supermarket_b.csv")).unwrap();
    let uidata = model.get_uidata();
    assert_eq!(uidata.page, 2);
    assert_eq!(uidata.nrows, 3);
    assert!(uidata.rows.is_empty());
}

#[test]
fn null_cells_are_absent_from_the_record() {
    let store = RowStore::load(&fixture("gaps.csv")).unwrap();
    assert!(!store.records()[1].contains_key("City"));
    assert!(!store.records()[2].contains_key("Total"));

    // Absent cells order before present ones
    let sort = SortSpec {
        column: "Total".to_string(),
        direction: SortDirection::Ascending,
    };
    let page = visible_page(store.records(), &sort, 1);
    let branches: Vec<&str> = page.iter().map(|r| r["Branch"].as_str()).collect();
    assert_eq!(branches, ["C", "B", "A"]);
}

#[test]
fn missing_file_is_an_error() {
    let result = RowStore::load(&fixture("no_such_file.csv"));
    assert!(matches!(result, Err(GridError::FileNotFound)));
}
