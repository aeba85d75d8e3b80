use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use sku_bom::{BomResolver, Catalog, ReferenceData};

/// Loaded reference data and the catalog generated from it.
pub struct Reference {
    pub data: ReferenceData,
    pub catalog: Catalog,
}

impl Reference {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let data = match path {
            Some(path) => ReferenceData::from_path(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
            None => ReferenceData::builtin().context("Failed to load built-in catalog")?,
        };
        let catalog = data.catalog();
        Ok(Self { data, catalog })
    }

    pub fn resolver(&self) -> BomResolver<'_> {
        self.data.resolver(&self.catalog)
    }
}

/// SKUs typed at the prompt are matched case-insensitively.
pub fn normalize_sku(input: &str) -> String {
    input.trim().to_uppercase()
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for ListFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Table => write!(f, "table"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}
