//! Reference data: color rules, fabric list, BOM templates and fixed catalog
//! records, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bom::BomResolver;
use crate::catalog::{Catalog, ProductRecord};
use crate::color::{ColorRules, Fabrics};
use crate::template::{RawTemplate, TemplateError, TemplateStore};

const BUILTIN: &str = include_str!("../data/solerno.toml");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reference data: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReferenceData {
    #[serde(default)]
    color: ColorRules,
    #[serde(default, rename = "fabric")]
    fabrics: Fabrics,
    #[serde(default, rename = "template")]
    templates: Vec<RawTemplate>,
    #[serde(default, rename = "product")]
    products: Vec<ProductRecord>,
}

/// Everything the engine needs to expand SKUs of one product line.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub color: ColorRules,
    pub fabrics: Fabrics,
    pub templates: TemplateStore,
    /// Records added to the generated catalog.
    pub products: Vec<ProductRecord>,
}

impl ReferenceData {
    /// The embedded Solerno product line.
    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_toml_str(BUILTIN)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading reference data from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, LoadError> {
        let raw: RawReferenceData = toml::from_str(contents)?;
        let templates = raw
            .templates
            .into_iter()
            .enumerate()
            .map(|(index, t)| t.into_template(index))
            .collect::<Result<Vec<_>, _>>()?;

        let data = Self {
            color: raw.color,
            fabrics: raw.fabrics,
            templates: TemplateStore::new(templates)?,
            products: raw.products,
        };
        log::debug!(
            "Loaded {} fabric(s), {} template(s), {} fixed product(s)",
            data.fabrics.len(),
            data.templates.len(),
            data.products.len()
        );
        Ok(data)
    }

    /// Generated product catalog followed by the fixed records.
    pub fn catalog(&self) -> Catalog {
        Catalog::generate(&self.fabrics, self.products.iter().cloned())
    }

    /// A resolver over this data and `catalog`, using these color rules.
    pub fn resolver<'a>(&'a self, catalog: &'a Catalog) -> BomResolver<'a> {
        BomResolver::new(&self.templates, catalog, &self.fabrics).with_color_rules(self.color.clone())
    }
}
