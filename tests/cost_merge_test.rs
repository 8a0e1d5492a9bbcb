//! Price index merge into cost baskets

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use travel_ppi::config::Config;
use travel_ppi::data::{
    load_cost_file, merge_price_indices, write_cost_file, PriceIndexPaths,
};
use travel_ppi::types::CostBasket;

fn write_indices(dir: &Path) {
    fs::write(
        dir.join("hotel_price_index.csv"),
        "Country,Avg_price\n\
         Japan,\"150,000\"\n\
         Japan,\"170,000\"\n\
         Italy ,\"180,000\"\n\
         UK,\"250,000\"\n\
         Narnia,\"90,000\"\n\
         Spain,n/a\n",
    )
    .unwrap();
    fs::write(
        dir.join("starbucks_drink_index.csv"),
        "Country,Avg_price\n\
         Japan,500\n\
         Italy,4.5\n\
         United Kingdom, 4.2 \n\
         Narnia,3\n\
         Spain,4\n",
    )
    .unwrap();
    fs::write(
        dir.join("big_mac_index.csv"),
        "Country,local_price\n\
         Japan,480\n\
         Euro area,5.79\n\
         Britain,4.89\n\
         Narnia,2\n",
    )
    .unwrap();
}

#[test]
fn test_merge_price_indices() {
    let dir = TempDir::new().unwrap();
    write_indices(dir.path());

    let merged =
        merge_price_indices(&PriceIndexPaths::in_dir(dir.path()), &Config::default()).unwrap();

    let names: Vec<_> = merged.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Italy", "Japan", "Spain", "United Kingdom"]);

    let japan = &merged["Japan"];
    assert_eq!(japan.currency.as_deref(), Some("JPY(100)"));
    assert_eq!(japan.avg_hotel_krw, 160_000.0);
    assert_eq!(japan.big_mac, 480.0);
    assert_eq!(japan.starbucks, 500.0);

    let italy = &merged["Italy"];
    assert_eq!(italy.currency.as_deref(), Some("EUR"));
    assert_eq!(italy.big_mac, 5.79);

    // unparseable hotel price becomes zero rather than dropping the row
    assert_eq!(merged["Spain"].avg_hotel_krw, 0.0);

    let uk = &merged["United Kingdom"];
    assert_eq!(uk.currency.as_deref(), Some("GBP"));
    assert_eq!(uk.starbucks, 4.2);
    assert_eq!(uk.big_mac, 4.89);
}

#[test]
fn test_merged_file_loads_in_destination_order() {
    let dir = TempDir::new().unwrap();
    write_indices(dir.path());
    let config = Config::default();

    let merged = merge_price_indices(&PriceIndexPaths::in_dir(dir.path()), &config).unwrap();
    let cost_file = dir.path().join("out").join("result.json");
    write_cost_file(&cost_file, &merged).unwrap();

    let baskets = load_cost_file(&cost_file, &config).unwrap();
    let countries: Vec<_> = baskets.iter().map(|b| b.country_code.as_str()).collect();
    assert_eq!(countries, vec!["Japan", "Italy", "Spain", "United Kingdom"]);
    assert_eq!(
        baskets[0],
        CostBasket::new("Japan", "JPY", 480.0, 500.0, 160_000.0)
    );
}

#[test]
fn test_missing_index_file_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(
        merge_price_indices(&PriceIndexPaths::in_dir(dir.path()), &Config::default()).is_err()
    );
}
