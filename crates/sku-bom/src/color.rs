//! Fabric color extraction and pattern-family lookup.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::sku;

/// A Sunbrella fabric color offered on the product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricColor {
    /// Three-letter color code used inside SKUs, e.g. `CBN`.
    pub code: String,
    pub name: String,
    pub full_name: String,
    /// Pattern family, e.g. `SPTM` for Spectrum.
    pub pattern: String,
    /// Raw-material SKU of the fabric roll. Defaults to
    /// `FAB-SUN-{pattern}-{code}` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl FabricColor {
    pub fn material_sku(&self) -> String {
        self.sku
            .clone()
            .unwrap_or_else(|| format!("FAB-SUN-{}-{}", self.pattern, self.code))
    }
}

/// Source of fabric pattern families, keyed by color code.
pub trait FabricLookup: Send + Sync {
    fn fabric_pattern(&self, color: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fabrics(Vec<FabricColor>);

impl Fabrics {
    pub fn new(colors: Vec<FabricColor>) -> Self {
        Self(colors)
    }

    /// Case-insensitive lookup by color code.
    pub fn by_code(&self, code: &str) -> Option<&FabricColor> {
        self.0.iter().find(|f| f.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FabricColor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.code.as_str()).collect()
    }
}

impl FabricLookup for Fabrics {
    fn fabric_pattern(&self, color: &str) -> Option<&str> {
        self.by_code(color).map(|f| f.pattern.as_str())
    }
}

impl<'a> IntoIterator for &'a Fabrics {
    type Item = &'a FabricColor;
    type IntoIter = std::slice::Iter<'a, FabricColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where the color code sits in a SKU, and what to assume for unknown colors.
///
/// The color position depends only on segment count and prefix. A future
/// family sharing a prefix with a different segment count would not be
/// recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRules {
    /// Prefixes of 5-segment finished goods (`SOL-LCH-NTK-CBN-ST1`).
    pub finished_good_prefixes: Vec<String>,
    /// Prefixes of 4-segment fabric-bearing subassemblies (`CSH-LS-SEAT-CBN`).
    pub subassembly_prefixes: Vec<String>,
    pub default_pattern: String,
}

pub const DEFAULT_PATTERN: &str = "SPTM";

const COLOR_SEGMENT: usize = 3;

impl Default for ColorRules {
    fn default() -> Self {
        Self {
            finished_good_prefixes: vec!["SOL".to_string()],
            subassembly_prefixes: vec!["CSH".to_string(), "SHL".to_string()],
            default_pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl ColorRules {
    pub fn extract_color<'s>(&self, sku: &'s str) -> Option<&'s str> {
        let segments = sku::segments(sku);
        let known = |prefixes: &[String]| prefixes.iter().any(|p| p == segments[0]);

        match segments.len() {
            5 if known(&self.finished_good_prefixes) => Some(segments[COLOR_SEGMENT]),
            4 if known(&self.subassembly_prefixes) => Some(segments[COLOR_SEGMENT]),
            _ => None,
        }
    }

    /// Pattern family for `color`, or the default pattern if the color is
    /// not in `fabrics`.
    pub fn resolve_pattern<'a>(&'a self, fabrics: &'a dyn FabricLookup, color: &str) -> &'a str {
        match fabrics.fabric_pattern(color) {
            Some(pattern) => pattern,
            None => {
                log::warn!(
                    "Unknown fabric color '{}', assuming pattern {}",
                    color,
                    self.default_pattern
                );
                &self.default_pattern
            }
        }
    }
}

static DEFAULT_RULES: Lazy<ColorRules> = Lazy::new(ColorRules::default);

/// [`ColorRules::extract_color`] with the Solerno defaults.
pub fn extract_color(sku: &str) -> Option<&str> {
    DEFAULT_RULES.extract_color(sku)
}

/// [`ColorRules::resolve_pattern`] with the Solerno defaults.
pub fn resolve_pattern<'a>(fabrics: &'a dyn FabricLookup, color: &str) -> &'a str {
    DEFAULT_RULES.resolve_pattern(fabrics, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fabrics() -> Fabrics {
        Fabrics::new(vec![
            FabricColor {
                code: "CBN".to_string(),
                name: "Carbon".to_string(),
                full_name: "Sunbrella Spectrum Carbon".to_string(),
                pattern: "SPTM".to_string(),
                sku: None,
            },
            FabricColor {
                code: "CHR".to_string(),
                name: "Charcoal".to_string(),
                full_name: "Sunbrella Heritage Charcoal".to_string(),
                pattern: "HRTG".to_string(),
                sku: Some("FAB-SUN-HRTG-CHR".to_string()),
            },
        ])
    }

    #[test]
    fn test_extract_color() {
        assert_eq!(extract_color("SOL-LCH-NTK-CBN-ST1"), Some("CBN"));
        assert_eq!(extract_color("CSH-LS-SEAT-CBN"), Some("CBN"));
        assert_eq!(extract_color("SHL-LS-PILB-SEA"), Some("SEA"));
        assert_eq!(extract_color("COR-LS-SEAT"), None);
        assert_eq!(extract_color("HT-PB-G1R-151"), None);
        assert_eq!(extract_color("FAB-SUN-SPTM-CBN"), None);
        assert_eq!(extract_color("SOL-LCH-CBN"), None);
        assert_eq!(extract_color(""), None);
        assert_eq!(extract_color("----"), None);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ColorRules {
            finished_good_prefixes: vec!["ALT".to_string()],
            subassembly_prefixes: vec![],
            default_pattern: "CAST".to_string(),
        };
        assert_eq!(rules.extract_color("ALT-LCH-NTK-SND-ST1"), Some("SND"));
        assert_eq!(rules.extract_color("SOL-LCH-NTK-SND-ST1"), None);
        assert_eq!(rules.extract_color("CSH-LS-SEAT-SND"), None);
        assert_eq!(rules.resolve_pattern(&fabrics(), "SND"), "CAST");
    }

    #[test]
    fn test_resolve_pattern_falls_back() {
        let fabrics = fabrics();
        assert_eq!(resolve_pattern(&fabrics, "CHR"), "HRTG");
        assert_eq!(resolve_pattern(&fabrics, "chr"), "HRTG");
        assert_eq!(resolve_pattern(&fabrics, "ZZZ"), DEFAULT_PATTERN);
    }

    #[test]
    fn test_material_sku() {
        let fabrics = fabrics();
        assert_eq!(fabrics.by_code("CBN").unwrap().material_sku(), "FAB-SUN-SPTM-CBN");
        assert_eq!(fabrics.by_code("CHR").unwrap().material_sku(), "FAB-SUN-HRTG-CHR");
        assert_eq!(fabrics.codes(), vec!["CBN", "CHR"]);
    }
}
