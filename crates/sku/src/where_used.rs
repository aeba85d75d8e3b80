use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use sku_bom::sku::parse_sku;

use crate::reference::{normalize_sku, ListFormat, Reference};

#[derive(Args, Debug, Clone)]
pub struct WhereUsedArgs {
    /// Component SKU, e.g. HW-CRDG or CSH-LS-SEAT-CBN
    #[arg(value_name = "SKU")]
    pub sku: String,

    /// Output format
    #[arg(short, long, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

pub fn execute(args: WhereUsedArgs, reference: &Reference) -> Result<()> {
    let input = normalize_sku(&args.sku);
    let sku = parse_sku(&input)?;
    let usages = reference.resolver().where_used(sku);

    let mut writer = io::stdout().lock();
    if args.format == ListFormat::Json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&usages)?)?;
        return Ok(());
    }

    if usages.is_empty() {
        writeln!(writer, "{} is not used by any template", sku.bold())?;
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
    for usage in &usages {
        let parent = if usage.is_pattern {
            usage.parent.italic().to_string()
        } else {
            usage.parent.clone()
        };
        table.add_row(vec![
            parent,
            usage.component_name.clone(),
            usage.quantity.normalize().to_string(),
            usage.unit.to_string(),
        ]);
    }
    table.set_header(vec!["Parent", "As", "Qty", "Unit"]);
    writeln!(writer, "{table}")?;
    Ok(())
}
