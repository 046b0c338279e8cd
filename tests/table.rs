use chrono::NaiveDate;
use serde_json::Value;

use datatable::aggregate::keys;
use datatable::output::{to_csv, to_json, to_json_collection};
use datatable::{Aggregator, CellValue, CsvOptions, Record, Table, TableError};

struct OrderPosition {
    articlenum: &'static str,
    name: &'static str,
    group: &'static str,
    ordered: NaiveDate,
    quantity: i64,
    price: f64,
}

impl Record for OrderPosition {
    fn field(&self, key: &str) -> Option<CellValue> {
        Some(match key {
            "articlenum" => self.articlenum.into(),
            "name" => self.name.into(),
            "group" => self.group.into(),
            "ordered" => self.ordered.into(),
            "quantity" => self.quantity.into(),
            "price" => self.price.into(),
            _ => return None,
        })
    }
}

fn position(
    articlenum: &'static str,
    name: &'static str,
    group: &'static str,
    (y, m, d): (i32, u32, u32),
    quantity: i64,
    price: f64,
) -> OrderPosition {
    OrderPosition {
        articlenum,
        name,
        group,
        ordered: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        quantity,
        price,
    }
}

fn order_positions() -> Vec<OrderPosition> {
    vec![
        position("AB36KAAA", "Laser Sword", "AA", (2009, 10, 4), 1, 1000.0),
        position("D81ADG7A", "R2DX", "AA", (2009, 9, 4), 1, 100.0),
        position("D81ADG7A", "R2DX", "AA", (2009, 9, 4), 1, 10.0),
        position("DTJA6181", "R2DX", "BB", (2009, 10, 4), 1, 200.0),
        position("DTJA6181", "R2DX", "BB", (2009, 10, 4), 1, 20.0),
    ]
}

fn define_columns(table: &mut Table<OrderPosition>) {
    table.add_column("articlenum", "Articlenum").unwrap();
    table.add_column("name", "Product Name").unwrap();
    table.add_column("ordered", "Datum").unwrap();
    table.add_column("group", "Product Group").unwrap();
    table
        .add_computed_column("amount", "Amount", |p: &OrderPosition| {
            CellValue::Float(p.quantity as f64 * p.price)
        })
        .unwrap();
    table.add_column("doubled_price", "Doubled Price").unwrap();
}

fn group_by_month(table: &Table<OrderPosition>) -> Table<OrderPosition> {
    table
        .group_by_with(
            "ordered",
            &[("amount", Aggregator::Sum), ("doubled_price", Aggregator::Sum)],
            keys::year_month,
        )
        .unwrap()
}

const GROUPED_CSV: &str = "Datum,Amount,Doubled Price\n2009-10,1220.00,2440.00\n2009-9,110.00,220.00\n";

#[test]
fn test_method_api_builds_groups_and_exports() {
    let positions = order_positions();
    let mut table = Table::new();
    define_columns(&mut table);
    table
        .build_rows_with(&positions, |row, p| row.set("doubled_price", p.price * 2.0))
        .unwrap();

    assert_eq!(table.row_count(), 5);
    assert_eq!(table.rows()[0]["articlenum"], CellValue::from("AB36KAAA"));
    assert_eq!(table.rows()[4]["amount"], CellValue::Float(20.0));

    let grouped = group_by_month(&table);
    assert_eq!(to_csv(&grouped, &CsvOptions::default()).unwrap(), GROUPED_CSV);
}

#[test]
fn test_source_api_matches_method_api() {
    let mut table = Table::with_source(order_positions());
    define_columns(&mut table);
    table
        .build_rows_from_source(|row, p| row.set("doubled_price", p.price * 2.0))
        .unwrap();

    let grouped = group_by_month(&table);
    assert_eq!(to_csv(&grouped, &CsvOptions::default()).unwrap(), GROUPED_CSV);
}

#[test]
fn test_quantity_times_price_export() {
    let items = vec![
        position("A1", "A", "AA", (2009, 1, 1), 2, 5.0),
        position("B1", "B", "AA", (2009, 1, 1), 1, 3.0),
    ];
    let mut table = Table::new();
    table.add_column("name", "name").unwrap();
    table
        .add_computed_column("amount", "amount", |p: &OrderPosition| {
            CellValue::Float(p.quantity as f64 * p.price)
        })
        .unwrap();
    table.build_rows(&items).unwrap();

    assert_eq!(
        to_csv(&table, &CsvOptions::default()).unwrap(),
        "name,amount\nA,10.00\nB,3.00\n"
    );
}

#[test]
fn test_row_order_follows_input_order() {
    let positions = order_positions();
    let mut table = Table::new();
    table.add_column("price", "Price").unwrap();
    table.build_rows(&positions).unwrap();

    let prices: Vec<_> = table.rows().iter().map(|r| r["price"].clone()).collect();
    let expected: Vec<CellValue> = positions.iter().map(|p| p.price.into()).collect();
    assert_eq!(prices, expected);
}

#[test]
fn test_flat_json_round_trip() {
    let positions = order_positions();
    let mut table = Table::new();
    define_columns(&mut table);
    table.build_rows(&positions).unwrap();

    let document: Value = serde_json::from_str(&to_json(&table).unwrap()).unwrap();
    let items = document["items"].as_array().unwrap();
    assert_eq!(items.len(), positions.len());

    for (item, position) in items.iter().zip(&positions) {
        assert_eq!(item["articlenum"], position.articlenum);
        assert_eq!(item["ordered"], position.ordered.to_string());
        assert_eq!(item["amount"], position.quantity as f64 * position.price);
        // never written: no transformer, no attribute, no callback
        assert!(item.get("doubled_price").is_none());
    }
}

#[test]
fn test_collection_json_of_grouped_table() {
    let positions = order_positions();
    let mut table = Table::new();
    define_columns(&mut table);
    table
        .build_rows_with(&positions, |row, p| row.set("doubled_price", p.price * 2.0))
        .unwrap();
    let grouped = group_by_month(&table);

    let document: Value = serde_json::from_str(&to_json_collection(&grouped).unwrap()).unwrap();
    assert_eq!(document["properties"]["ordered"]["name"], "Datum");
    assert_eq!(document["properties"]["ordered"]["type"], "string");
    assert_eq!(document["properties"]["amount"]["type"], "number");
    assert_eq!(document["items"]["1"]["ordered"], "2009-10");
    assert_eq!(document["items"]["2"]["amount"], 110.0);
}

#[test]
fn test_structural_errors_leave_table_usable() {
    let positions = order_positions();
    let mut table = Table::new();
    define_columns(&mut table);

    assert!(matches!(
        table.add_column("name", "Name again"),
        Err(TableError::ColumnAlreadyExists(_))
    ));
    assert!(matches!(
        table.build_rows_with(&positions, |row, _| row.set("discount", 0.1)),
        Err(TableError::ColumnNotFound(_))
    ));

    table.build_rows(&positions).unwrap();
    assert_eq!(table.row_count(), 5);
    assert!(matches!(
        table.group_by("ordered", &[("doubled_price", Aggregator::Sum)]),
        Err(TableError::MissingCell { .. })
    ));
}
