//! Product catalog: the records BOM nodes are labelled with.
//!
//! The engine only needs [`ProductCatalog::product_by_sku`]. [`Catalog`] is
//! the in-memory implementation used by the host, generated from the fabric
//! list the same way the product line is numbered (seating type × set type ×
//! fabric for finished goods, component × fabric for cushions and shells),
//! plus the fixed records listed in the reference data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category::ProductCategory;
use crate::color::Fabrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SellableStatus {
    Sellable,
    InternalOnly,
    KitComponent,
}

/// How the item is sourced in the MRP system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    MakeToOrder,
    Subassembly,
    ContractManufactured,
    Kit,
    ProductForResale,
    RawMaterial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<u32>,
    pub sellable: SellableStatus,
    pub item_type: ItemType,
    #[serde(default)]
    pub has_bom: bool,
    #[serde(default)]
    pub is_subassembly: bool,
    /// Fabric color code for fabric-bearing products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_color: Option<String>,
}

/// Catalog lookup used while building trees. A miss is not an error.
pub trait ProductCatalog: Send + Sync {
    fn product_by_sku(&self, sku: &str) -> Option<&ProductRecord>;
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    index: HashMap<String, usize>,
}

/// Heated seating types: (code, name, part-number offset).
const SEATING_TYPES: &[(&str, &str, u32)] = &[
    ("LCH", "Lounge Chair", 0),
    ("LOV", "Loveseat", 32),
    ("SOF", "Sofa", 64),
    ("HOT", "Heated Ottoman", 96),
    ("CHS", "Chaise Lounge", 128),
    ("SVL", "Swivel Chair", 160),
    ("DAC", "Dining Arm Chair", 192),
    ("DCH", "Dining Side Chair", 224),
];

/// Set types: (code, label, part-number offset).
const SET_TYPES: &[(&str, &str, u32)] = &[("ST1", "Standard", 0), ("ST2", "Pillow Back", 16)];

/// Lounge seating cushion positions: (code, name, part-number offset).
const CUSHION_COMPONENTS: &[(&str, &str, u32)] = &[
    ("SEAT", "Seat", 0),
    ("BACK", "Back", 16),
    ("PILB", "Pillow Back", 32),
];

const FINISH: &str = "NTK";

impl Catalog {
    /// Build a catalog from explicit records. Later duplicates are ignored.
    pub fn from_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut catalog = Catalog::default();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Generated product families for `fabrics`, followed by `extra` records.
    pub fn generate(fabrics: &Fabrics, extra: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut catalog = Catalog::default();

        for (code, name, offset) in SEATING_TYPES {
            for (set, label, set_offset) in SET_TYPES {
                for (i, fabric) in fabrics.iter().enumerate() {
                    catalog.insert(ProductRecord {
                        sku: format!("SOL-{code}-{FINISH}-{}-{set}", fabric.code),
                        name: format!("Solerno {name}, {}, {label}", fabric.name),
                        description: format!(
                            "{name} from the Solerno collection in {}",
                            fabric.full_name
                        ),
                        category: ProductCategory::FinishedGood,
                        part_number: Some(10001 + offset + set_offset + i as u32),
                        sellable: SellableStatus::Sellable,
                        item_type: ItemType::MakeToOrder,
                        has_bom: true,
                        is_subassembly: false,
                        fabric_color: Some(fabric.code.clone()),
                    });
                }
            }
        }

        for (i, (code, name, _)) in SEATING_TYPES.iter().enumerate() {
            catalog.insert(ProductRecord {
                sku: format!("FR-SOL-{code}-{FINISH}"),
                name: format!("Frame, Solerno {name}"),
                description: format!("Natural teak frame for the Solerno {name}"),
                category: ProductCategory::Frame,
                part_number: Some(30001 + i as u32),
                sellable: SellableStatus::InternalOnly,
                item_type: ItemType::Subassembly,
                has_bom: false,
                is_subassembly: true,
                fabric_color: None,
            });
        }

        for (code, name, offset) in CUSHION_COMPONENTS {
            for (i, fabric) in fabrics.iter().enumerate() {
                catalog.insert(ProductRecord {
                    sku: format!("CSH-LS-{code}-{}", fabric.code),
                    name: format!("Cushion, Lounge Seating {name}, {}", fabric.name),
                    description: format!(
                        "Cushion assembly for lounge seating {} in {}",
                        name.to_lowercase(),
                        fabric.full_name
                    ),
                    category: ProductCategory::Cushion,
                    part_number: Some(40001 + offset + i as u32),
                    sellable: SellableStatus::Sellable,
                    item_type: ItemType::Subassembly,
                    has_bom: true,
                    is_subassembly: true,
                    fabric_color: Some(fabric.code.clone()),
                });
            }
        }

        for (code, name, offset) in CUSHION_COMPONENTS {
            for (i, fabric) in fabrics.iter().enumerate() {
                catalog.insert(ProductRecord {
                    sku: format!("SHL-LS-{code}-{}", fabric.code),
                    name: format!("Shell, Lounge Seating {name}, {}", fabric.name),
                    description: format!(
                        "Fabric shell for lounge seating {} cushion in {}",
                        name.to_lowercase(),
                        fabric.full_name
                    ),
                    category: ProductCategory::Shell,
                    part_number: Some(50001 + offset + i as u32),
                    sellable: SellableStatus::Sellable,
                    item_type: ItemType::ContractManufactured,
                    has_bom: true,
                    is_subassembly: true,
                    fabric_color: Some(fabric.code.clone()),
                });
            }
        }

        for fabric in fabrics {
            catalog.insert(ProductRecord {
                sku: fabric.material_sku(),
                name: fabric.full_name.clone(),
                description: format!("Outdoor performance fabric, {}", fabric.full_name),
                category: ProductCategory::Material,
                part_number: None,
                sellable: SellableStatus::InternalOnly,
                item_type: ItemType::RawMaterial,
                has_bom: false,
                is_subassembly: true,
                fabric_color: Some(fabric.code.clone()),
            });
        }

        for product in extra {
            catalog.insert(product);
        }

        log::debug!("Generated catalog with {} products", catalog.len());
        catalog
    }

    fn insert(&mut self, product: ProductRecord) {
        if self.index.contains_key(&product.sku) {
            log::warn!("Duplicate catalog entry for {}, keeping the first", product.sku);
            return;
        }
        self.index.insert(product.sku.clone(), self.products.len());
        self.products.push(product);
    }

    pub fn get(&self, sku: &str) -> Option<&ProductRecord> {
        self.index.get(sku).map(|&i| &self.products[i])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter()
    }

    pub fn in_category(&self, category: ProductCategory) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn with_bom(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter().filter(|p| p.has_bom)
    }

    /// Case-insensitive substring search over SKU, name and description.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a ProductRecord> + 'a {
        let query = query.to_lowercase();
        self.products.iter().filter(move |p| {
            p.sku.to_lowercase().contains(&query)
                || p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
        })
    }
}

impl ProductCatalog for Catalog {
    fn product_by_sku(&self, sku: &str) -> Option<&ProductRecord> {
        self.get(sku)
    }
}
