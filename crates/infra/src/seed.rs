//! Inventory seed loading.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use quayside_inventory::InventoryItem;

#[derive(Debug, Deserialize)]
struct InventorySeed {
    items: Vec<InventoryItem>,
}

/// Load starting stock levels from a JSON file of the form
/// `{"items": [{"sku": "...", "available": 0}]}`.
pub fn load_inventory_seed(path: &Path) -> anyhow::Result<Vec<InventoryItem>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading inventory seed {}", path.display()))?;
    let seed: InventorySeed = serde_json::from_str(&raw)
        .with_context(|| format!("parsing inventory seed {}", path.display()))?;
    Ok(seed.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_items_from_json() {
        let mut file = tempfile();
        write!(
            file.1,
            r#"{{"items": [{{"sku": "sku-a", "available": 12}}, {{"sku": "sku-b", "available": 0}}]}}"#
        )
        .unwrap();

        let items = load_inventory_seed(&file.0).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "sku-a");
        assert_eq!(items[0].available, 12);
    }

    #[test]
    fn malformed_seed_is_an_error() {
        let mut file = tempfile();
        write!(file.1, "not json").unwrap();
        assert!(load_inventory_seed(&file.0).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_inventory_seed(Path::new("/nonexistent/seed.json")).is_err());
    }

    fn tempfile() -> (std::path::PathBuf, fs::File) {
        let path = std::env::temp_dir().join(format!(
            "quayside-seed-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let file = fs::File::create(&path).unwrap();
        (path, file)
    }
}
