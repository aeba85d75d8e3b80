//! SKU syntax checks and per-family decoding.
//!
//! A SKU is a sequence of uppercase alphanumeric segments joined by `-`, such
//! as `SOL-LCH-NTK-CBN-ST1` or `HW-GRM-4`. The engine only needs a plausibility
//! check at its entry point; everything past that is handled leniently.
//! [`decode_sku`] goes further and checks a SKU against the shape of its
//! product family, naming the role of every segment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::category::ProductCategory;

/// Segment separator used by every SKU family in the catalog.
pub const SEGMENT_SEPARATOR: char = '-';

static SKU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]+(-[A-Z0-9]+)+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSkuError {
    #[error("SKU is empty")]
    Empty,

    #[error("'{0}' is not a SKU (expected uppercase segments separated by '-', e.g. SOL-LCH-NTK-CBN-ST1)")]
    Malformed(String),
}

/// Validate `input` as a SKU and return it without surrounding whitespace.
pub fn parse_sku(input: &str) -> Result<&str, InvalidSkuError> {
    let sku = input.trim();
    if sku.is_empty() {
        return Err(InvalidSkuError::Empty);
    }
    if !SKU_RE.is_match(sku) {
        return Err(InvalidSkuError::Malformed(sku.to_string()));
    }
    Ok(sku)
}

pub fn is_valid_sku(input: &str) -> bool {
    SKU_RE.is_match(input)
}

/// Split a SKU into its segments. Empty segments are preserved so callers can
/// count positions exactly as written.
pub fn segments(sku: &str) -> Vec<&str> {
    sku.split(SEGMENT_SEPARATOR).collect()
}

/// Leading segment of a SKU (`SOL` for `SOL-LCH-NTK-CBN-ST1`).
pub fn prefix(sku: &str) -> &str {
    sku.split(SEGMENT_SEPARATOR).next().unwrap_or_default()
}

type FamilyShape = (Regex, ProductCategory, &'static [&'static str]);

static FAMILY_SHAPES: Lazy<Vec<FamilyShape>> = Lazy::new(|| {
    fn shape(re: &str, category: ProductCategory, roles: &'static [&'static str]) -> FamilyShape {
        (Regex::new(re).unwrap(), category, roles)
    }
    vec![
        shape(
            r"^SOL-[A-Z]{3}-[A-Z]{2,3}-[A-Z]{3}-ST[12]$",
            ProductCategory::FinishedGood,
            &["Collection", "Product Type", "Finish", "Fabric", "Set Type"],
        ),
        shape(
            r"^FR-[A-Z]{3}-[A-Z]{3}-[A-Z]{2,3}$",
            ProductCategory::Frame,
            &["Prefix", "Collection", "Product Type", "Finish"],
        ),
        shape(
            r"^CSH-[A-Z]{2}-[A-Z]{4}-[A-Z]{3}$",
            ProductCategory::Cushion,
            &["Prefix", "Seating Type", "Component", "Fabric"],
        ),
        shape(
            r"^SHL-[A-Z]{2}-[A-Z]{4}-[A-Z]{3}$",
            ProductCategory::Shell,
            &["Prefix", "Seating Type", "Component", "Fabric"],
        ),
        shape(
            r"^COR-[A-Z]{2}-[A-Z]{4}$",
            ProductCategory::CoreInsert,
            &["Prefix", "Seating Type", "Component"],
        ),
        shape(
            r"^HT-[A-Z]{2,3}-.+$",
            ProductCategory::HeatTech,
            &["Prefix", "Type", "Details"],
        ),
        shape(
            r"^PRO-[A-Z]{3}-[A-Z]{3}$",
            ProductCategory::ProtectiveCover,
            &["Prefix", "Collection", "Product Type"],
        ),
        shape(
            r"^ACC-[A-Z]{4}-[A-Z]{3,4}$",
            ProductCategory::Accessory,
            &["Prefix", "Type", "Variant"],
        ),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedSegment {
    pub code: String,
    /// `None` when the SKU fits no family or the family names fewer segments.
    pub role: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedSku {
    pub sku: String,
    /// Family whose shape the SKU matches.
    pub category: Option<ProductCategory>,
    pub segments: Vec<DecodedSegment>,
}

impl DecodedSku {
    pub fn is_valid(&self) -> bool {
        self.category.is_some()
    }
}

/// Match `input` against the known family shapes, first match wins.
///
/// Raw materials (`FAB`, `FOM`, `FIL`, `HW`, `LBL`) have no family shape and
/// decode as invalid with their segments still listed.
pub fn decode_sku(input: &str) -> DecodedSku {
    let sku = input.trim();
    let shape = FAMILY_SHAPES.iter().find(|(re, _, _)| re.is_match(sku));
    let roles = shape.map(|(_, _, roles)| *roles).unwrap_or_default();
    DecodedSku {
        sku: sku.to_string(),
        category: shape.map(|(_, category, _)| *category),
        segments: segments(sku)
            .into_iter()
            .enumerate()
            .map(|(i, code)| DecodedSegment {
                code: code.to_string(),
                role: roles.get(i).copied(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sku_accepts_catalog_skus() {
        for sku in [
            "SOL-LCH-NTK-CBN-ST1",
            "CSH-LS-SEAT-CBN",
            "HW-GRM-4",
            "FIL-POLY",
            "HT-PB-G1R-151-UNIT",
        ] {
            assert_eq!(parse_sku(sku), Ok(sku));
        }
    }

    #[test]
    fn test_parse_sku_trims_whitespace() {
        assert_eq!(parse_sku("  COR-LS-SEAT\n"), Ok("COR-LS-SEAT"));
    }

    #[test]
    fn test_parse_sku_rejects_garbage() {
        assert_eq!(parse_sku(""), Err(InvalidSkuError::Empty));
        assert_eq!(parse_sku("   "), Err(InvalidSkuError::Empty));
        assert!(matches!(
            parse_sku("sol-lch-ntk"),
            Err(InvalidSkuError::Malformed(_))
        ));
        assert!(matches!(parse_sku("SOFA"), Err(InvalidSkuError::Malformed(_))));
        assert!(matches!(
            parse_sku("SOL--LCH"),
            Err(InvalidSkuError::Malformed(_))
        ));
        assert!(matches!(
            parse_sku("SOL-{COLOR}"),
            Err(InvalidSkuError::Malformed(_))
        ));
    }

    #[test]
    fn test_prefix_and_segments() {
        assert_eq!(prefix("SHL-LS-BACK-IND"), "SHL");
        assert_eq!(prefix("NOHYPHEN"), "NOHYPHEN");
        assert_eq!(segments("A--B"), vec!["A", "", "B"]);
    }

    fn roles(decoded: &DecodedSku) -> Vec<Option<&'static str>> {
        decoded.segments.iter().map(|s| s.role).collect()
    }

    #[test]
    fn test_decode_one_sku_per_family() {
        for (sku, category) in [
            ("SOL-LCH-NTK-CBN-ST1", ProductCategory::FinishedGood),
            ("FR-SOL-LCH-NTK", ProductCategory::Frame),
            ("CSH-LS-SEAT-CBN", ProductCategory::Cushion),
            ("SHL-LS-PILB-IND", ProductCategory::Shell),
            ("COR-LS-SEAT", ProductCategory::CoreInsert),
            ("HT-PB-G1R-151", ProductCategory::HeatTech),
            ("PRO-SOL-LCH", ProductCategory::ProtectiveCover),
            ("ACC-THRW-ALO", ProductCategory::Accessory),
        ] {
            let decoded = decode_sku(sku);
            assert!(decoded.is_valid(), "{sku}");
            assert_eq!(decoded.category, Some(category), "{sku}");
            assert_eq!(decoded.segments[0].code, prefix(sku));
        }
    }

    #[test]
    fn test_decode_assigns_segment_roles() {
        let decoded = decode_sku(" SOL-LCH-NTK-CBN-ST1 ");
        assert_eq!(decoded.sku, "SOL-LCH-NTK-CBN-ST1");
        assert_eq!(
            roles(&decoded),
            vec![
                Some("Collection"),
                Some("Product Type"),
                Some("Finish"),
                Some("Fabric"),
                Some("Set Type"),
            ]
        );
        assert_eq!(decoded.segments[3].code, "CBN");

        // Heat tech details may span several segments; only the first is named.
        let decoded = decode_sku("HT-PB-G1R-151-UNIT");
        assert_eq!(decoded.category, Some(ProductCategory::HeatTech));
        assert_eq!(
            roles(&decoded),
            vec![Some("Prefix"), Some("Type"), Some("Details"), None, None]
        );
    }

    #[test]
    fn test_decode_rejects_unknown_shapes() {
        let decoded = decode_sku("FAB-SUN-SPTM-CBN");
        assert!(!decoded.is_valid());
        assert_eq!(decoded.segments.len(), 4);
        assert!(decoded.segments.iter().all(|s| s.role.is_none()));

        for sku in ["SOL-LCH-NTK-CBN-ST3", "CSH-LS-SEAT-CBNX", "COR-LS-SEAT-CBN", ""] {
            assert!(!decode_sku(sku).is_valid(), "{sku}");
        }
    }
}
