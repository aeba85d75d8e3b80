use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use sku_bom::bom::{count_nodes, depth};
use sku_bom::BomNode;
use termtree::Tree;

use crate::reference::{normalize_sku, Reference};

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum TreeFormat {
    #[default]
    Tree,
    Table,
    Json,
}

impl std::fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeFormat::Tree => write!(f, "tree"),
            TreeFormat::Table => write!(f, "table"),
            TreeFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// SKU to expand, e.g. SOL-LCH-NTK-CBN-ST1
    #[arg(value_name = "SKU")]
    pub sku: String,

    /// Output format
    #[arg(short, long, default_value_t = TreeFormat::Tree)]
    pub format: TreeFormat,
}

pub fn execute(args: TreeArgs, reference: &Reference) -> Result<()> {
    let sku = normalize_sku(&args.sku);
    let tree = reference.resolver().build_tree(&sku)?;

    let mut writer = io::stdout().lock();
    match args.format {
        TreeFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&tree)?)?,
        TreeFormat::Table => tree.write_table(&mut writer)?,
        TreeFormat::Tree => {
            write!(writer, "{}", render(&tree))?;
            writeln!(
                writer,
                "{}",
                format!(
                    "depth {}, {} items",
                    depth(&tree),
                    count_nodes(&tree)
                )
                .dimmed()
            )?;
        }
    }
    Ok(())
}

fn label(node: &BomNode) -> String {
    let sku = if node.is_resolved() {
        node.sku.bold()
    } else {
        node.sku.red().bold()
    };
    let mut label = if node.level == 0 {
        sku.to_string()
    } else {
        format!(
            "{} {} {sku}",
            node.quantity.normalize(),
            node.unit.to_string().dimmed()
        )
    };
    if node.name != node.sku {
        label.push_str(&format!("  {}", node.name.dimmed()));
    }
    label
}

fn render(node: &BomNode) -> Tree<String> {
    Tree::new(label(node)).with_leaves(node.children.iter().map(render))
}
