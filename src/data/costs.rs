//! Destination cost baskets
//!
//! Cost baskets come from three price indices:
//!
//! - hotel index (`Country`, `Avg_price`): one night, home currency
//! - coffee index (`Country`, `Avg_price`): one drink, local currency
//! - Big Mac index (`Country`, `local_price`): one meal, local currency
//!
//! [`merge_price_indices`] joins them into one [`CostEntry`] per destination.
//! [`write_cost_file`] and [`load_cost_file`] persist that merged table as JSON.

use crate::config::{Config, Destination};
use crate::currency::CurrencyUnit;
use crate::error::{PpiError, Result};
use crate::types::CostBasket;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default hotel index file name
pub const HOTEL_INDEX_FILE: &str = "hotel_price_index.csv";
/// Default coffee index file name
pub const DRINK_INDEX_FILE: &str = "starbucks_drink_index.csv";
/// Default Big Mac index file name
pub const MEAL_INDEX_FILE: &str = "big_mac_index.csv";

/// Big Mac index row covering every eurozone country
pub const EURO_AREA: &str = "Euro area";

/// Merged per-destination costs, as stored in the cost file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Provider currency unit (e.g. `JPY(100)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// One meal, local currency
    pub big_mac: f64,
    /// One drink, local currency
    pub starbucks: f64,
    /// One night, home currency
    pub avg_hotel_krw: f64,
}

/// Locations of the three price index CSVs
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIndexPaths {
    pub hotel: PathBuf,
    pub drink: PathBuf,
    pub meal: PathBuf,
}

impl PriceIndexPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            hotel: dir.join(HOTEL_INDEX_FILE),
            drink: dir.join(DRINK_INDEX_FILE),
            meal: dir.join(MEAL_INDEX_FILE),
        }
    }
}

/// Parse a loosely formatted number; anything unparseable counts as zero
pub fn clean_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Averaged values per canonical country name
type IndexTable = BTreeMap<String, f64>;

fn read_index(path: &Path, value_column: &str, config: &Config) -> Result<IndexTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                PpiError::DataError(format!("{}: missing column '{}'", path.display(), name))
            })
    };
    let country_idx = find("Country")?;
    let value_idx = find(value_column)?;

    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in reader.records() {
        let row = row?;
        let raw_country = row.get(country_idx).unwrap_or("").trim();
        if raw_country.is_empty() {
            continue;
        }
        let country = config
            .destination_for(raw_country)
            .map(|d| d.country.clone())
            .unwrap_or_else(|| raw_country.to_string());
        let value = clean_number(row.get(value_idx).unwrap_or(""));

        let entry = sums.entry(country).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(country, (sum, count))| (country, sum / count as f64))
        .collect())
}

/// Join the three price indices into a cost table keyed by destination name.
///
/// Country names are trimmed and resolved through destination aliases.
/// Duplicate rows are averaged. The Big Mac "Euro area" price fills in for
/// euro destinations without their own row. Only countries present in all
/// three indices and configured as destinations are kept.
pub fn merge_price_indices(
    paths: &PriceIndexPaths,
    config: &Config,
) -> Result<BTreeMap<String, CostEntry>> {
    let hotel = read_index(&paths.hotel, "Avg_price", config)?;
    let drink = read_index(&paths.drink, "Avg_price", config)?;
    let mut meal = read_index(&paths.meal, "local_price", config)?;

    if let Some(euro_price) = meal.get(EURO_AREA).copied() {
        for dest in config
            .destinations
            .iter()
            .filter(|d| d.currency.eq_ignore_ascii_case("EUR"))
        {
            meal.entry(dest.country.clone()).or_insert(euro_price);
        }
    }

    let mut merged = BTreeMap::new();
    for (country, meal_price) in &meal {
        let (Some(drink_price), Some(hotel_price)) = (drink.get(country), hotel.get(country))
        else {
            continue;
        };
        let Some(dest) = config.destination_for(country) else {
            log::debug!("Skipping {}: not a configured destination", country);
            continue;
        };

        merged.insert(
            dest.country.clone(),
            CostEntry {
                currency: Some(dest.unit().provider_code()),
                big_mac: *meal_price,
                starbucks: *drink_price,
                avg_hotel_krw: *hotel_price,
            },
        );
    }

    log::info!("Merged price indices: {} destinations", merged.len());
    Ok(merged)
}

/// Write a merged cost table as pretty JSON
pub fn write_cost_file(path: &Path, entries: &BTreeMap<String, CostEntry>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a cost table from JSON
pub fn read_cost_file(path: &Path) -> Result<BTreeMap<String, CostEntry>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Convert a cost table into baskets.
///
/// Countries are emitted in destination order first, then any remaining
/// countries alphabetically. An entry's own currency wins over the
/// destination's; entries with neither are skipped.
pub fn baskets_from_entries(
    entries: &BTreeMap<String, CostEntry>,
    config: &Config,
) -> Result<Vec<CostBasket>> {
    let mut ordered: Vec<(&String, &CostEntry)> = Vec::with_capacity(entries.len());
    for dest in &config.destinations {
        if let Some((name, entry)) = entries.iter().find(|(name, _)| dest.matches(name)) {
            if !ordered.iter().any(|(n, _)| *n == name) {
                ordered.push((name, entry));
            }
        }
    }
    for (name, entry) in entries {
        if !ordered.iter().any(|(n, _)| *n == name) {
            ordered.push((name, entry));
        }
    }

    let mut baskets = Vec::with_capacity(ordered.len());
    for (name, entry) in ordered {
        let currency = match (&entry.currency, config.destination_for(name)) {
            (Some(raw), _) => CurrencyUnit::parse(raw)?.code,
            (None, Some(dest)) => dest.unit().code,
            (None, None) => {
                log::warn!("Skipping {}: no currency configured", name);
                continue;
            }
        };
        let country = config
            .destination_for(name)
            .map(|d: &Destination| d.country.clone())
            .unwrap_or_else(|| name.clone());

        baskets.push(CostBasket::new(
            country,
            currency,
            entry.big_mac,
            entry.starbucks,
            entry.avg_hotel_krw,
        ));
    }
    Ok(baskets)
}

/// Load cost baskets from a merged JSON cost file
pub fn load_cost_file(path: &Path, config: &Config) -> Result<Vec<CostBasket>> {
    let entries = read_cost_file(path).map_err(|e| {
        PpiError::DataError(format!("Cost data load failed ({}): {}", path.display(), e))
    })?;
    baskets_from_entries(&entries, config)
}
