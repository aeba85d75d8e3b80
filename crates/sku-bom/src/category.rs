//! Product categories and the ordered chain that assigns one to a BOM node.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRecord;
use crate::sku;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    FinishedGood,
    Frame,
    Cushion,
    CoreInsert,
    Shell,
    HeatTech,
    ProtectiveCover,
    Accessory,
    Material,
    Marketing,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 10] = [
        ProductCategory::FinishedGood,
        ProductCategory::Frame,
        ProductCategory::Cushion,
        ProductCategory::CoreInsert,
        ProductCategory::Shell,
        ProductCategory::HeatTech,
        ProductCategory::ProtectiveCover,
        ProductCategory::Accessory,
        ProductCategory::Material,
        ProductCategory::Marketing,
    ];

    /// Plural heading used in listings.
    pub fn display_name(self) -> &'static str {
        match self {
            ProductCategory::FinishedGood => "Finished Goods",
            ProductCategory::Frame => "Frames",
            ProductCategory::Cushion => "Cushions",
            ProductCategory::CoreInsert => "Core Inserts",
            ProductCategory::Shell => "Shells",
            ProductCategory::HeatTech => "Heat Tech",
            ProductCategory::ProtectiveCover => "Protective Covers",
            ProductCategory::Accessory => "Accessories",
            ProductCategory::Material => "Materials",
            ProductCategory::Marketing => "Marketing",
        }
    }

    /// Part numbers reserved for the category. Raw materials carry none.
    pub fn part_number_range(self) -> Option<RangeInclusive<u32>> {
        match self {
            ProductCategory::FinishedGood => Some(10000..=19999),
            ProductCategory::Frame => Some(30000..=39999),
            ProductCategory::Cushion => Some(40000..=40499),
            ProductCategory::CoreInsert => Some(40500..=49999),
            ProductCategory::Shell => Some(50000..=59999),
            ProductCategory::ProtectiveCover => Some(60000..=69999),
            ProductCategory::HeatTech => Some(70000..=79999),
            ProductCategory::Accessory => Some(80000..=89999),
            ProductCategory::Marketing => Some(90000..=99999),
            ProductCategory::Material => None,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ProductCategory::FinishedGood => "finished-good",
            ProductCategory::Frame => "frame",
            ProductCategory::Cushion => "cushion",
            ProductCategory::CoreInsert => "core-insert",
            ProductCategory::Shell => "shell",
            ProductCategory::HeatTech => "heat-tech",
            ProductCategory::ProtectiveCover => "protective-cover",
            ProductCategory::Accessory => "accessory",
            ProductCategory::Material => "material",
            ProductCategory::Marketing => "marketing",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

pub fn category_for_part_number(part_number: u32) -> Option<ProductCategory> {
    ProductCategory::ALL.into_iter().find(|category| {
        category
            .part_number_range()
            .is_some_and(|range| range.contains(&part_number))
    })
}

/// One step of category inference. Returns `None` to defer to the next step.
pub trait CategoryResolver: Send + Sync {
    fn try_resolve(&self, sku: &str, product: Option<&ProductRecord>) -> Option<ProductCategory>;
}

/// Uses the category recorded in the catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogCategory;

impl CategoryResolver for CatalogCategory {
    fn try_resolve(&self, _sku: &str, product: Option<&ProductRecord>) -> Option<ProductCategory> {
        product.map(|p| p.category)
    }
}

/// Infers the category from the leading SKU segment.
#[derive(Debug, Clone)]
pub struct PrefixCategory {
    prefixes: Vec<(String, ProductCategory)>,
}

/// Prefix table for the Solerno product line.
pub const DEFAULT_PREFIXES: &[(&str, ProductCategory)] = &[
    ("SOL", ProductCategory::FinishedGood),
    ("FR", ProductCategory::Frame),
    ("CSH", ProductCategory::Cushion),
    ("COR", ProductCategory::CoreInsert),
    ("SHL", ProductCategory::Shell),
    ("HT", ProductCategory::HeatTech),
    ("PRO", ProductCategory::ProtectiveCover),
    ("ACC", ProductCategory::Accessory),
    ("FAB", ProductCategory::Material),
    ("FOM", ProductCategory::Material),
    ("FIL", ProductCategory::Material),
    ("HW", ProductCategory::Material),
    ("LBL", ProductCategory::Material),
];

impl PrefixCategory {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = (S, ProductCategory)>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|(prefix, category)| (prefix.into(), category))
                .collect(),
        }
    }
}

impl Default for PrefixCategory {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES.iter().copied())
    }
}

impl CategoryResolver for PrefixCategory {
    fn try_resolve(&self, sku: &str, _product: Option<&ProductRecord>) -> Option<ProductCategory> {
        let prefix = sku::prefix(sku);
        self.prefixes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, category)| *category)
    }
}

/// Resolvers tried in order; the first answer wins, and `fallback` applies
/// when none answers.
pub struct CategoryChain {
    resolvers: Vec<Box<dyn CategoryResolver>>,
    fallback: ProductCategory,
}

impl CategoryChain {
    /// An empty chain that answers `fallback` for everything.
    pub fn new(fallback: ProductCategory) -> Self {
        Self {
            resolvers: Vec::new(),
            fallback,
        }
    }

    pub fn with(mut self, resolver: impl CategoryResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn resolve(&self, sku: &str, product: Option<&ProductRecord>) -> ProductCategory {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.try_resolve(sku, product))
            .unwrap_or(self.fallback)
    }
}

impl Default for CategoryChain {
    /// Catalog record, then SKU prefix, then `material`.
    fn default() -> Self {
        CategoryChain::new(ProductCategory::Material)
            .with(CatalogCategory)
            .with(PrefixCategory::default())
    }
}

impl fmt::Debug for CategoryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryChain")
            .field("resolvers", &self.resolvers.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemType, SellableStatus};

    fn record(sku: &str, category: ProductCategory) -> ProductRecord {
        ProductRecord {
            sku: sku.to_string(),
            name: "Power Bar Unit (internal)".to_string(),
            description: String::new(),
            category,
            part_number: None,
            sellable: SellableStatus::InternalOnly,
            item_type: ItemType::RawMaterial,
            has_bom: false,
            is_subassembly: true,
            fabric_color: None,
        }
    }

    #[test]
    fn test_catalog_category_wins_over_prefix() {
        let chain = CategoryChain::default();
        let unit = record("HT-PB-G1R-151-UNIT", ProductCategory::Material);
        assert_eq!(
            chain.resolve("HT-PB-G1R-151-UNIT", Some(&unit)),
            ProductCategory::Material
        );
        assert_eq!(
            chain.resolve("HT-PB-G1R-151-UNIT", None),
            ProductCategory::HeatTech
        );
    }

    #[test]
    fn test_prefix_table() {
        let chain = CategoryChain::default();
        assert_eq!(chain.resolve("SOL-LCH-NTK-CBN-ST1", None), ProductCategory::FinishedGood);
        assert_eq!(chain.resolve("FR-SOL-LCH-NTK", None), ProductCategory::Frame);
        assert_eq!(chain.resolve("COR-LS-SEAT", None), ProductCategory::CoreInsert);
        assert_eq!(chain.resolve("LBL-WVN-OM", None), ProductCategory::Material);
        // "SOLX" is not "SOL"
        assert_eq!(chain.resolve("SOLX-1", None), ProductCategory::Material);
    }

    #[test]
    fn test_fallback_applies_when_nothing_answers() {
        let chain = CategoryChain::default();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve("ZZ-TOP", None), ProductCategory::Material);

        let marketing = CategoryChain::new(ProductCategory::Marketing)
            .with(CatalogCategory)
            .with(PrefixCategory::default());
        assert_eq!(marketing.resolve("ZZ-TOP", None), ProductCategory::Marketing);
        assert_eq!(marketing.resolve("FR-SOL-LCH-NTK", None), ProductCategory::Frame);

        let bare = CategoryChain::new(ProductCategory::Marketing);
        assert!(bare.is_empty());
        assert_eq!(bare.resolve("SOL-X", None), ProductCategory::Marketing);
    }

    #[test]
    fn test_part_number_ranges() {
        assert_eq!(category_for_part_number(10001), Some(ProductCategory::FinishedGood));
        assert_eq!(category_for_part_number(40499), Some(ProductCategory::Cushion));
        assert_eq!(category_for_part_number(40501), Some(ProductCategory::CoreInsert));
        assert_eq!(category_for_part_number(70009), Some(ProductCategory::HeatTech));
        assert_eq!(category_for_part_number(20000), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProductCategory::CoreInsert).unwrap(),
            r#""core-insert""#
        );
        assert_eq!(ProductCategory::ProtectiveCover.to_string(), "protective-cover");
    }
}
