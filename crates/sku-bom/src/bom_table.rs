use std::collections::BTreeMap;
use std::io::{self, Write};

use comfy_table::{Cell, CellAlignment, Color, Table};

use crate::bom::{BomNode, MaterialRequirement};
use crate::category::ProductCategory;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    table
}

fn category_color(category: ProductCategory) -> Option<Color> {
    match category {
        ProductCategory::FinishedGood => Some(Color::Green),
        ProductCategory::Cushion | ProductCategory::Shell => Some(Color::Cyan),
        ProductCategory::CoreInsert | ProductCategory::HeatTech => Some(Color::Yellow),
        _ => None,
    }
}

fn quantity_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

impl BomNode {
    /// Write the tree as an indented table, one row per node in pre-order.
    /// SKUs missing from the catalog are shown in red.
    pub fn write_table<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut table = new_table();
        table.set_header(vec!["Level", "SKU", "Name", "Qty", "Unit", "Category"]);

        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let indent = "  ".repeat(node.level);
            let sku_cell = if node.is_resolved() {
                Cell::new(format!("{indent}{}", node.sku))
            } else {
                Cell::new(format!("{indent}{}", node.sku)).fg(Color::Red)
            };
            let category_cell = match category_color(node.category) {
                Some(color) => Cell::new(node.category).fg(color),
                None => Cell::new(node.category),
            };

            table.add_row(vec![
                Cell::new(node.level),
                sku_cell,
                Cell::new(&node.name),
                quantity_cell(node.quantity.normalize().to_string()),
                Cell::new(node.unit),
                category_cell,
            ]);
            stack.extend(node.children.iter().rev());
        }

        writeln!(writer, "{table}")?;
        Ok(())
    }
}

/// Write aggregated requirements, grouped by category then SKU.
pub fn write_requirements_table<W: Write>(
    requirements: &BTreeMap<String, MaterialRequirement>,
    mut writer: W,
) -> io::Result<()> {
    let mut rows: Vec<&MaterialRequirement> = requirements.values().collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.sku.cmp(&b.sku)));

    let mut table = new_table();
    table.set_header(vec!["SKU", "Name", "Total", "Unit", "Category"]);
    for req in rows {
        table.add_row(vec![
            Cell::new(&req.sku),
            Cell::new(&req.name),
            quantity_cell(req.total_quantity.normalize().to_string()),
            Cell::new(req.unit),
            Cell::new(req.category.display_name()),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}
