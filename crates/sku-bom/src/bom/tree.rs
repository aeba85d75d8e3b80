use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{ProductCatalog, ProductRecord};
use crate::category::{CategoryChain, ProductCategory};
use crate::color::{ColorRules, FabricLookup};
use crate::pattern::Bindings;
use crate::sku::{parse_sku, InvalidSkuError};
use crate::template::{ResolvedRelation, TemplateStore, Unit};

/// One node of an expanded BOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomNode {
    pub sku: String,
    /// Catalog record, `None` when the SKU is not in the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRecord>,
    pub name: String,
    /// Amount required by the parent; 1 for the root.
    pub quantity: Decimal,
    pub unit: Unit,
    pub level: usize,
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BomNode>,
}

impl BomNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this SKU was found in the catalog.
    pub fn is_resolved(&self) -> bool {
        self.product.is_some()
    }
}

/// A template that can produce a given component SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhereUsed {
    /// Concrete parent SKU, or the parent pattern when it cannot be filled
    /// from the component alone.
    pub parent: String,
    pub is_pattern: bool,
    pub component_name: String,
    pub quantity: Decimal,
    pub unit: Unit,
}

/// Expands SKUs into BOM trees against injected reference data.
///
/// The resolver holds no mutable state; one instance can serve concurrent
/// callers, each of which receives its own tree.
pub struct BomResolver<'a> {
    templates: &'a TemplateStore,
    catalog: &'a dyn ProductCatalog,
    fabrics: &'a dyn FabricLookup,
    rules: ColorRules,
    categories: CategoryChain,
}

impl<'a> BomResolver<'a> {
    pub fn new(
        templates: &'a TemplateStore,
        catalog: &'a dyn ProductCatalog,
        fabrics: &'a dyn FabricLookup,
    ) -> Self {
        Self {
            templates,
            catalog,
            fabrics,
            rules: ColorRules::default(),
            categories: CategoryChain::default(),
        }
    }

    pub fn with_color_rules(mut self, rules: ColorRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_categories(mut self, categories: CategoryChain) -> Self {
        self.categories = categories;
        self
    }

    pub fn color_rules(&self) -> &ColorRules {
        &self.rules
    }

    pub fn extract_color<'s>(&self, sku: &'s str) -> Option<&'s str> {
        self.rules.extract_color(sku)
    }

    pub fn resolve_pattern(&self, color: &str) -> &str {
        self.rules.resolve_pattern(self.fabrics, color)
    }

    /// One level of expansion: every template whose parent fits `sku`,
    /// instantiated for the SKU's color, in store order.
    pub fn resolve_relations_for(&self, sku: &str) -> Vec<ResolvedRelation> {
        let color = self.rules.extract_color(sku);
        let bindings = color.map(|color| Bindings::new(color, self.resolve_pattern(color)));

        let relations: Vec<ResolvedRelation> = self
            .templates
            .iter()
            .filter(|t| t.parent.matches(sku, bindings.as_ref()))
            .map(|t| t.instantiate(bindings.as_ref()))
            .collect();

        log::trace!(
            "{} (color: {}) matched {} template(s)",
            sku,
            color.unwrap_or("-"),
            relations.len()
        );
        relations
    }

    /// Expand `sku` into a full tree. Fails only if `sku` is not a SKU.
    pub fn build_tree(&self, sku: &str) -> Result<BomNode, InvalidSkuError> {
        let sku = parse_sku(sku)?;
        let tree = self.build_node(sku, 0, Decimal::ONE, Unit::Each, &HashSet::new());
        log::debug!("Built BOM for {} with {} direct component(s)", sku, tree.children.len());
        Ok(tree)
    }

    fn build_node(
        &self,
        sku: &str,
        level: usize,
        quantity: Decimal,
        unit: Unit,
        ancestors: &HashSet<String>,
    ) -> BomNode {
        let product = self.catalog.product_by_sku(sku);
        let mut node = BomNode {
            sku: sku.to_string(),
            product: product.cloned(),
            name: product.map_or_else(|| sku.to_string(), |p| p.name.clone()),
            quantity,
            unit,
            level,
            category: self.categories.resolve(sku, product),
            children: Vec::new(),
        };

        if ancestors.contains(sku) {
            log::debug!("{} already appears above level {}, not expanding", sku, level);
            return node;
        }

        // Each branch extends its own copy so siblings never block each other.
        let mut branch = ancestors.clone();
        branch.insert(sku.to_string());

        node.children = self
            .resolve_relations_for(sku)
            .into_iter()
            .map(|rel| {
                self.build_node(&rel.component_sku, level + 1, rel.quantity, rel.unit, &branch)
            })
            .collect();
        node
    }

    /// Templates that can produce `component_sku`, with the parent filled in
    /// where the component determines the color.
    pub fn where_used(&self, component_sku: &str) -> Vec<WhereUsed> {
        self.templates
            .iter()
            .filter_map(|t| {
                let captures = t.component.capture(component_sku)?;
                let color = captures.color;
                let pattern = color.map(|c| self.resolve_pattern(c));
                if let (Some(expected), Some(written)) = (pattern, captures.pattern) {
                    if expected != written {
                        return None;
                    }
                }

                let (parent, is_pattern) = match (t.parent.as_literal(), color, pattern) {
                    (Some(literal), _, _) => (literal.to_string(), false),
                    (None, Some(color), Some(pattern)) => {
                        (t.parent.fill(&Bindings::new(color, pattern)), false)
                    }
                    (None, _, _) => (t.parent.to_string(), true),
                };

                Some(WhereUsed {
                    parent,
                    is_pattern,
                    component_name: t.component_name.clone(),
                    quantity: t.quantity,
                    unit: t.unit,
                })
            })
            .collect()
    }
}
