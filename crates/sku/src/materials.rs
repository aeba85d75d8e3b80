use std::io::{self, Write};

use anyhow::{ensure, Result};
use clap::Args;
use rust_decimal::Decimal;
use sku_bom::bom::aggregate_material_requirements_scaled;
use sku_bom::write_requirements_table;

use crate::reference::{normalize_sku, ListFormat, Reference};

#[derive(Args, Debug, Clone)]
pub struct MaterialsArgs {
    /// SKU to build
    #[arg(value_name = "SKU")]
    pub sku: String,

    /// Number of units to build
    #[arg(short = 'n', long = "quantity", default_value = "1")]
    pub quantity: Decimal,

    /// Output format
    #[arg(short, long, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

pub fn execute(args: MaterialsArgs, reference: &Reference) -> Result<()> {
    ensure!(
        args.quantity > Decimal::ZERO,
        "quantity must be positive, got {}",
        args.quantity
    );

    let sku = normalize_sku(&args.sku);
    let tree = reference.resolver().build_tree(&sku)?;
    let requirements = aggregate_material_requirements_scaled(&tree, args.quantity);
    log::debug!(
        "{} distinct material(s) for {} × {}",
        requirements.len(),
        args.quantity,
        sku
    );

    let mut writer = io::stdout().lock();
    match args.format {
        ListFormat::Json => {
            let list: Vec<_> = requirements.values().collect();
            writeln!(writer, "{}", serde_json::to_string_pretty(&list)?)?;
        }
        ListFormat::Table => write_requirements_table(&requirements, writer)?,
    }
    Ok(())
}
