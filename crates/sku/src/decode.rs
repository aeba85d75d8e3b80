use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use sku_bom::sku::parse_sku;
use sku_bom::{decode_sku, DecodedSku, ProductRecord};

use crate::reference::{normalize_sku, Reference};

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// SKU to decode
    #[arg(value_name = "SKU")]
    pub sku: String,
}

pub fn execute(args: DecodeArgs, reference: &Reference) -> Result<()> {
    let input = normalize_sku(&args.sku);
    let sku = parse_sku(&input)?;
    let resolver = reference.resolver();

    let mut writer = io::stdout().lock();
    let decoded = decode_sku(sku);
    write_segments(&decoded, &mut writer)?;

    match reference.catalog.get(sku) {
        Some(product) => write_product(product, &mut writer)?,
        None => writeln!(writer, "  {}", "not in catalog".yellow())?,
    }

    match resolver.extract_color(sku) {
        Some(color) => {
            let fabric = reference.data.fabrics.by_code(color);
            let pattern = resolver.resolve_pattern(color);
            match fabric {
                Some(fabric) => writeln!(
                    writer,
                    "  color:    {color} ({})\n  pattern:  {pattern}",
                    fabric.full_name
                )?,
                None => writeln!(
                    writer,
                    "  color:    {color} {}\n  pattern:  {pattern} (default)",
                    "(unknown)".yellow()
                )?,
            }
        }
        None => writeln!(writer, "  color:    {}", "none".dimmed())?,
    }

    let relations = resolver.resolve_relations_for(sku);
    if relations.is_empty() {
        writeln!(writer, "  {}", "no components".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    for rel in &relations {
        table.add_row(vec![
            rel.component_sku.clone(),
            rel.component_name.clone(),
            rel.quantity.normalize().to_string(),
            rel.unit.to_string(),
        ]);
    }
    table.set_header(vec!["Component", "Name", "Qty", "Unit"]);
    writeln!(writer, "{table}")?;
    Ok(())
}

fn write_segments<W: Write>(decoded: &DecodedSku, mut writer: W) -> io::Result<()> {
    let verdict = match decoded.category {
        Some(category) => format!("valid {}", category.display_name().to_lowercase())
            .as_str()
            .green(),
        None => "unrecognized SKU shape".yellow(),
    };
    writeln!(writer, "{}  {verdict}", decoded.sku.bold())?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Code", "Role"]);
    for (i, segment) in decoded.segments.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            segment.code.clone(),
            segment.role.unwrap_or("Unknown").to_string(),
        ]);
    }
    writeln!(writer, "{table}")
}

fn write_product<W: Write>(product: &ProductRecord, mut writer: W) -> io::Result<()> {
    writeln!(writer, "  name:     {}", product.name)?;
    writeln!(writer, "  category: {}", product.category.display_name())?;
    if let Some(part_number) = product.part_number {
        writeln!(writer, "  part no.: {part_number}")?;
    }
    if !product.description.is_empty() {
        writeln!(writer, "  {}", product.description.dimmed())?;
    }
    Ok(())
}
