//! BOM relation templates and the store that holds them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pattern::{Bindings, PatternError, SkuPattern};
use crate::sku;

/// Unit of measure of a component quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "ea")]
    Each,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "sqft")]
    SquareFoot,
    #[serde(rename = "ft")]
    Foot,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Each => "ea",
            Unit::Pound => "lb",
            Unit::SquareFoot => "sqft",
            Unit::Foot => "ft",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ea" => Ok(Unit::Each),
            "lb" => Ok(Unit::Pound),
            "sqft" => Ok(Unit::SquareFoot),
            "ft" => Ok(Unit::Foot),
            _ => Err(format!("unknown unit '{s}' (expected ea, lb, sqft or ft)")),
        }
    }
}

/// One parent → component rule, parameterized by fabric color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BomRelationTemplate {
    pub parent: SkuPattern,
    pub component: SkuPattern,
    pub component_name: String,
    pub quantity: Decimal,
    pub unit: Unit,
}

impl BomRelationTemplate {
    pub fn new(
        parent: &str,
        component: &str,
        component_name: impl Into<String>,
        quantity: Decimal,
        unit: Unit,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            parent: SkuPattern::parse(parent)?,
            component: SkuPattern::parse(component)?,
            component_name: component_name.into(),
            quantity,
            unit,
        })
    }

    pub fn instantiate(&self, bindings: Option<&Bindings<'_>>) -> ResolvedRelation {
        let fill = |pattern: &SkuPattern| match bindings {
            Some(b) => pattern.fill(b),
            None => pattern.as_str().to_string(),
        };
        ResolvedRelation {
            parent_sku: fill(&self.parent),
            component_sku: fill(&self.component),
            component_name: self.component_name.clone(),
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

/// A template instantiated for one concrete SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRelation {
    pub parent_sku: String,
    pub component_sku: String,
    pub component_name: String,
    pub quantity: Decimal,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template #{index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    #[error("template #{index}: '{pattern}' does not fill to a valid SKU")]
    InvalidSku { index: usize, pattern: String },

    #[error("template #{index} ({parent} -> {component}): quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        index: usize,
        parent: String,
        component: String,
        quantity: Decimal,
    },

    #[error("template #{index}: quantity '{value}' is not a number")]
    InvalidQuantity { index: usize, value: String },

    #[error("template #{index}: {message}")]
    InvalidUnit { index: usize, message: String },

    #[error(
        "template #{index}: component '{component}' has placeholders but parent '{parent}' has none to bind them"
    )]
    UnboundPlaceholder {
        index: usize,
        parent: String,
        component: String,
    },
}

/// Sample values used to check that a pattern fills to a well-formed SKU.
const PROBE: Bindings<'static> = Bindings {
    color: "CBN",
    pattern: "SPTM",
};

/// Ordered, validated, read-only set of templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStore {
    templates: Vec<BomRelationTemplate>,
}

impl TemplateStore {
    pub fn new(templates: Vec<BomRelationTemplate>) -> Result<Self, TemplateError> {
        for (index, template) in templates.iter().enumerate() {
            validate(index, template)?;
        }
        Ok(Self { templates })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BomRelationTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<'a> IntoIterator for &'a TemplateStore {
    type Item = &'a BomRelationTemplate;
    type IntoIter = std::slice::Iter<'a, BomRelationTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

fn validate(index: usize, template: &BomRelationTemplate) -> Result<(), TemplateError> {
    for pattern in [&template.parent, &template.component] {
        if !sku::is_valid_sku(&pattern.fill(&PROBE)) {
            return Err(TemplateError::InvalidSku {
                index,
                pattern: pattern.to_string(),
            });
        }
    }

    if template.quantity <= Decimal::ZERO {
        return Err(TemplateError::NonPositiveQuantity {
            index,
            parent: template.parent.to_string(),
            component: template.component.to_string(),
            quantity: template.quantity,
        });
    }

    if template.component.has_placeholders() && !template.parent.has_placeholders() {
        return Err(TemplateError::UnboundPlaceholder {
            index,
            parent: template.parent.to_string(),
            component: template.component.to_string(),
        });
    }

    Ok(())
}

/// Quantity as written in a data file: `1`, `0.5` or `"2.5"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawQuantity {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawQuantity {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawQuantity::Integer(n) => Some(Decimal::from(*n)),
            // Go through the shortest round-trip text so 0.4 stays 0.4.
            RawQuantity::Float(f) => Decimal::from_str(&f.to_string()).ok(),
            RawQuantity::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawQuantity::Integer(n) => n.to_string(),
            RawQuantity::Float(f) => f.to_string(),
            RawQuantity::Text(s) => s.clone(),
        }
    }
}

/// A template as it appears in a data file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawTemplate {
    pub parent: String,
    pub component: String,
    pub name: String,
    pub quantity: RawQuantity,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    Unit::Each.as_str().to_string()
}

impl RawTemplate {
    pub(crate) fn into_template(self, index: usize) -> Result<BomRelationTemplate, TemplateError> {
        let quantity = self
            .quantity
            .to_decimal()
            .ok_or_else(|| TemplateError::InvalidQuantity {
                index,
                value: self.quantity.describe(),
            })?;
        let unit = Unit::from_str(&self.unit)
            .map_err(|message| TemplateError::InvalidUnit { index, message })?;
        BomRelationTemplate::new(&self.parent, &self.component, self.name, quantity, unit)
            .map_err(|source| TemplateError::Pattern { index, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn template(parent: &str, component: &str, quantity: Decimal) -> BomRelationTemplate {
        BomRelationTemplate::new(parent, component, "Component", quantity, Unit::Each).unwrap()
    }

    #[test]
    fn test_store_accepts_valid_templates() {
        let store = TemplateStore::new(vec![
            template("CSH-LS-SEAT-{COLOR}", "SHL-LS-SEAT-{COLOR}", dec!(1)),
            template("SHL-LS-SEAT-{COLOR}", "FAB-SUN-{PATTERN}-{COLOR}", dec!(3)),
            template("COR-LS-SEAT", "FIL-POLY", dec!(0.5)),
        ])
        .unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.iter().map(|t| t.component.as_str()).collect::<Vec<_>>(),
            vec!["SHL-LS-SEAT-{COLOR}", "FAB-SUN-{PATTERN}-{COLOR}", "FIL-POLY"]
        );
    }

    #[test]
    fn test_store_rejects_non_positive_quantity() {
        let err = TemplateStore::new(vec![
            template("COR-LS-SEAT", "FIL-POLY", dec!(0.5)),
            template("COR-LS-SEAT", "HW-CRDG", dec!(0)),
        ])
        .unwrap_err();
        assert!(matches!(err, TemplateError::NonPositiveQuantity { index: 1, .. }));
    }

    #[test]
    fn test_store_rejects_malformed_patterns() {
        let err = TemplateStore::new(vec![template("cor-ls-seat", "FIL-POLY", dec!(1))]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidSku { index: 0, .. }));

        let err = TemplateStore::new(vec![template("COR-LS-SEAT", "FIL--POLY", dec!(1))]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidSku { index: 0, .. }));
    }

    #[test]
    fn test_store_rejects_unbound_component_placeholder() {
        let err = TemplateStore::new(vec![template("COR-LS-SEAT", "SHL-LS-SEAT-{COLOR}", dec!(1))])
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnboundPlaceholder { index: 0, .. }));
    }

    #[test]
    fn test_instantiate() {
        let t = template("SHL-LS-BACK-{COLOR}", "FAB-SUN-{PATTERN}-{COLOR}", dec!(2.5));
        let relation = t.instantiate(Some(&Bindings::new("LEF", "HRTG")));
        assert_eq!(relation.parent_sku, "SHL-LS-BACK-LEF");
        assert_eq!(relation.component_sku, "FAB-SUN-HRTG-LEF");
        assert_eq!(relation.quantity, dec!(2.5));

        let plain = template("COR-LS-BACK", "FOM-LS-BACK", dec!(1)).instantiate(None);
        assert_eq!(plain.component_sku, "FOM-LS-BACK");
    }

    #[test]
    fn test_raw_template_conversion() {
        let raw: RawTemplate = toml::from_str(
            r#"
            parent = "COR-LS-BACK"
            component = "FIL-POLY"
            name = "Polyester Batting"
            quantity = 0.4
            unit = "lb"
            "#,
        )
        .unwrap();
        let t = raw.into_template(7).unwrap();
        assert_eq!(t.quantity, dec!(0.4));
        assert_eq!(t.unit, Unit::Pound);

        let raw: RawTemplate = toml::from_str(
            r#"
            parent = "COR-LS-BACK"
            component = "FIL-POLY"
            name = "Polyester Batting"
            quantity = "lots"
            "#,
        )
        .unwrap();
        assert!(matches!(
            raw.into_template(7),
            Err(TemplateError::InvalidQuantity { index: 7, .. })
        ));

        let raw: RawTemplate = toml::from_str(
            r#"
            parent = "COR-LS-BACK"
            component = "FIL-POLY"
            name = "Polyester Batting"
            quantity = 1
            unit = "kg"
            "#,
        )
        .unwrap();
        assert!(matches!(
            raw.into_template(2),
            Err(TemplateError::InvalidUnit { index: 2, .. })
        ));
    }

    #[test]
    fn test_unit_round_trip_names() {
        for unit in [Unit::Each, Unit::Pound, Unit::SquareFoot, Unit::Foot] {
            assert_eq!(unit.as_str().parse::<Unit>(), Ok(unit));
        }
        assert_eq!(serde_json::to_string(&Unit::SquareFoot).unwrap(), r#""sqft""#);
    }
}
