use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use sku_bom::bom::{flatten, FlattenedBomItem};

use crate::reference::{normalize_sku, ListFormat, Reference};

#[derive(Args, Debug, Clone)]
pub struct FlatArgs {
    /// SKU to expand
    #[arg(value_name = "SKU")]
    pub sku: String,

    /// Only list leaf items
    #[arg(long)]
    pub leaves: bool,

    /// Output format
    #[arg(short, long, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

pub fn execute(args: FlatArgs, reference: &Reference) -> Result<()> {
    let sku = normalize_sku(&args.sku);
    let tree = reference.resolver().build_tree(&sku)?;
    let mut items = flatten(&tree);
    if args.leaves {
        items.retain(|item| !item.has_children);
    }

    let mut writer = io::stdout().lock();
    match args.format {
        ListFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&items)?)?,
        ListFormat::Table => write_flat_table(&items, writer)?,
    }
    Ok(())
}

fn write_flat_table<W: Write>(items: &[FlattenedBomItem], mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);

    for item in items {
        table.add_row(vec![
            Cell::new(item.level),
            Cell::new(&item.sku),
            Cell::new(&item.name),
            Cell::new(item.quantity.normalize()).set_alignment(CellAlignment::Right),
            Cell::new(item.unit),
            Cell::new(item.category),
            Cell::new(item.path.join(" > ")),
        ]);
    }

    table.set_header(vec!["Level", "SKU", "Name", "Qty", "Unit", "Category", "Path"]);

    writeln!(writer, "{table}")?;
    Ok(())
}
