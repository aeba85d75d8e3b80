//! Read-only measurements over a built [`BomNode`] tree.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BomNode;
use crate::category::ProductCategory;
use crate::template::Unit;

/// One node of a tree in pre-order, with its position spelled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedBomItem {
    pub sku: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub level: usize,
    /// SKUs from the root down to this item, inclusive.
    pub path: Vec<String>,
    pub category: ProductCategory,
    pub has_children: bool,
}

/// Total amount of one leaf SKU needed to build the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub sku: String,
    pub name: String,
    pub unit: Unit,
    pub category: ProductCategory,
    pub total_quantity: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomSummary {
    pub total_items: usize,
    /// Distinct leaf SKUs.
    pub total_materials: usize,
    pub max_depth: usize,
    pub category_counts: BTreeMap<ProductCategory, usize>,
}

/// Longest edge count from `node` to a leaf.
pub fn depth(node: &BomNode) -> usize {
    node.children
        .iter()
        .map(|child| 1 + depth(child))
        .max()
        .unwrap_or(0)
}

pub fn count_nodes(node: &BomNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

pub fn flatten(node: &BomNode) -> Vec<FlattenedBomItem> {
    let mut items = Vec::with_capacity(count_nodes(node));
    let mut path = Vec::new();
    flatten_into(node, &mut path, &mut items);
    items
}

fn flatten_into(node: &BomNode, path: &mut Vec<String>, items: &mut Vec<FlattenedBomItem>) {
    path.push(node.sku.clone());
    items.push(FlattenedBomItem {
        sku: node.sku.clone(),
        name: node.name.clone(),
        quantity: node.quantity,
        unit: node.unit,
        level: node.level,
        path: path.clone(),
        category: node.category,
        has_children: !node.children.is_empty(),
    });
    for child in &node.children {
        flatten_into(child, path, items);
    }
    path.pop();
}

/// Leaf quantities needed for one unit of the root.
pub fn aggregate_material_requirements(node: &BomNode) -> BTreeMap<String, MaterialRequirement> {
    aggregate_material_requirements_scaled(node, Decimal::ONE)
}

/// Leaf quantities needed for `multiplier` units of the root.
///
/// Each leaf occurrence contributes `multiplier` times the product of the
/// quantities on its path, the root's own quantity included. Repeated SKUs
/// keep the unit and name of their first occurrence.
pub fn aggregate_material_requirements_scaled(
    node: &BomNode,
    multiplier: Decimal,
) -> BTreeMap<String, MaterialRequirement> {
    let mut totals = BTreeMap::new();
    collect_leaves(node, multiplier, &mut totals);
    totals
}

fn collect_leaves(
    node: &BomNode,
    multiplier: Decimal,
    totals: &mut BTreeMap<String, MaterialRequirement>,
) {
    let multiplier = multiplier * node.quantity;
    if node.children.is_empty() {
        accumulate(node, multiplier, totals);
        return;
    }
    for child in &node.children {
        collect_leaves(child, multiplier, totals);
    }
}

fn accumulate(node: &BomNode, amount: Decimal, totals: &mut BTreeMap<String, MaterialRequirement>) {
    totals
        .entry(node.sku.clone())
        .and_modify(|req| {
            if req.unit != node.unit {
                log::warn!(
                    "{} is used in both {} and {}, summing as {}",
                    node.sku,
                    req.unit,
                    node.unit,
                    req.unit
                );
            }
            req.total_quantity += amount;
        })
        .or_insert_with(|| MaterialRequirement {
            sku: node.sku.clone(),
            name: node.name.clone(),
            unit: node.unit,
            category: node.category,
            total_quantity: amount,
        });
}

pub fn summarize(node: &BomNode) -> BomSummary {
    let mut summary = BomSummary {
        max_depth: depth(node),
        ..Default::default()
    };
    let mut leaves = BTreeSet::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        summary.total_items += 1;
        *summary.category_counts.entry(current.category).or_default() += 1;
        if current.children.is_empty() {
            leaves.insert(current.sku.as_str());
        }
        stack.extend(current.children.iter());
    }
    summary.total_materials = leaves.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn node(sku: &str, quantity: Decimal, unit: Unit, children: Vec<BomNode>) -> BomNode {
        BomNode {
            sku: sku.to_string(),
            product: None,
            name: sku.to_string(),
            quantity,
            unit,
            level: 0,
            category: ProductCategory::Material,
            children,
        }
    }

    fn relevel(mut node: BomNode, level: usize) -> BomNode {
        node.level = level;
        node.children = node
            .children
            .into_iter()
            .map(|child| relevel(child, level + 1))
            .collect();
        node
    }

    /// SOL root → two cushions (qty 2), each with 3 sqft of fabric, plus
    /// 1 sqft of the same fabric directly on the root.
    fn sample() -> BomNode {
        relevel(
            node(
                "SOL-LOV-NTK-CBN-ST1",
                dec!(1),
                Unit::Each,
                vec![
                    node(
                        "CSH-LS-SEAT-CBN",
                        dec!(2),
                        Unit::Each,
                        vec![node("FAB-SUN-SPTM-CBN", dec!(3), Unit::SquareFoot, vec![])],
                    ),
                    node("FAB-SUN-SPTM-CBN", dec!(1), Unit::SquareFoot, vec![]),
                    node("HW-GRM-4", dec!(4), Unit::Each, vec![]),
                ],
            ),
            0,
        )
    }

    #[test]
    fn test_leaf_measurements() {
        let leaf = node("HW-CRDG", dec!(1), Unit::Each, vec![]);
        assert_eq!(depth(&leaf), 0);
        assert_eq!(count_nodes(&leaf), 1);
        let flat = flatten(&leaf);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, vec!["HW-CRDG"]);
        assert!(!flat[0].has_children);
    }

    #[test]
    fn test_depth_and_count() {
        let tree = sample();
        assert_eq!(depth(&tree), 2);
        assert_eq!(count_nodes(&tree), 5);
        assert!(depth(&tree) < count_nodes(&tree));
    }

    #[test]
    fn test_flatten_is_preorder_with_paths() {
        let flat = flatten(&sample());
        assert_eq!(
            flat.iter().map(|i| i.sku.as_str()).collect::<Vec<_>>(),
            vec![
                "SOL-LOV-NTK-CBN-ST1",
                "CSH-LS-SEAT-CBN",
                "FAB-SUN-SPTM-CBN",
                "FAB-SUN-SPTM-CBN",
                "HW-GRM-4",
            ]
        );
        assert_eq!(
            flat[2].path,
            vec!["SOL-LOV-NTK-CBN-ST1", "CSH-LS-SEAT-CBN", "FAB-SUN-SPTM-CBN"]
        );
        assert_eq!(flat[2].level, 2);
        assert!(flat[1].has_children);
        assert_eq!(flat[4].path.len(), 2);
    }

    #[test]
    fn test_aggregate_multiplies_along_path() {
        let tree = relevel(
            node(
                "CSH-LS-SEAT-CBN",
                dec!(1),
                Unit::Each,
                vec![node("FAB-SUN-SPTM-CBN", dec!(3), Unit::SquareFoot, vec![])],
            ),
            0,
        );
        let single = aggregate_material_requirements(&tree);
        assert_eq!(single["FAB-SUN-SPTM-CBN"].total_quantity, dec!(3));

        let doubled = relevel(
            node("SOL-LOV-NTK-CBN-ST1", dec!(1), Unit::Each, vec![{
                let mut cushion = tree.clone();
                cushion.quantity = dec!(2);
                cushion
            }]),
            0,
        );
        let totals = aggregate_material_requirements(&doubled);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals["FAB-SUN-SPTM-CBN"].total_quantity, dec!(6));
        assert_eq!(totals["FAB-SUN-SPTM-CBN"].unit, Unit::SquareFoot);
    }

    #[test]
    fn test_aggregate_sums_occurrences() {
        let totals = aggregate_material_requirements(&sample());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["FAB-SUN-SPTM-CBN"].total_quantity, dec!(7));
        assert_eq!(totals["HW-GRM-4"].total_quantity, dec!(4));
        // Intermediate nodes are never reported.
        assert!(!totals.contains_key("CSH-LS-SEAT-CBN"));
    }

    #[test]
    fn test_aggregate_scaled() {
        let totals = aggregate_material_requirements_scaled(&sample(), dec!(3));
        assert_eq!(totals["FAB-SUN-SPTM-CBN"].total_quantity, dec!(21));
        assert_eq!(totals["HW-GRM-4"].total_quantity, dec!(12));

        let leaf = node("FIL-POLY", dec!(0.5), Unit::Pound, vec![]);
        let totals = aggregate_material_requirements_scaled(&leaf, dec!(2));
        assert_eq!(totals["FIL-POLY"].total_quantity, dec!(1));
    }

    #[test]
    fn test_aggregate_subtree_applies_its_own_quantity() {
        let tree = sample();
        let cushion = &tree.children[0];
        assert_eq!(cushion.quantity, dec!(2));

        let totals = aggregate_material_requirements(cushion);
        assert_eq!(totals["FAB-SUN-SPTM-CBN"].total_quantity, dec!(6));

        let totals = aggregate_material_requirements(&tree.children[2]);
        assert_eq!(totals["HW-GRM-4"].total_quantity, dec!(4));
    }

    #[test]
    fn test_fractional_quantities_are_exact() {
        let tree = relevel(
            node(
                "COR-LS-SEAT",
                dec!(1),
                Unit::Each,
                vec![
                    node("FIL-POLY", dec!(0.5), Unit::Pound, vec![]),
                    node("FIL-POLY", dec!(0.4), Unit::Pound, vec![]),
                ],
            ),
            0,
        );
        let totals = aggregate_material_requirements(&tree);
        assert_eq!(totals["FIL-POLY"].total_quantity, dec!(0.9));
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.total_materials, 2);
        assert_eq!(summary.max_depth, 2);
        assert_eq!(summary.category_counts[&ProductCategory::Material], 5);
    }
}
