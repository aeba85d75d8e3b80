//! BOM template resolution and tree expansion for configurable product lines.
//!
//! A product line is described by a set of [`template::BomRelationTemplate`]s:
//! parent → component rules whose SKUs may contain `{COLOR}` and `{PATTERN}`
//! placeholders. Given a concrete SKU, [`bom::BomResolver`] finds the fabric
//! color inside it, instantiates every template that applies and recurses
//! until it reaches raw materials, producing a [`bom::BomNode`] tree.
//!
//! * [`sku`]: SKU syntax and per-family segment decoding.
//! * [`color`]: color extraction and fabric pattern lookup.
//! * [`pattern`]: placeholder-aware SKU patterns.
//! * [`template`]: templates and the validated [`template::TemplateStore`].
//! * [`bom`]: the tree builder, reverse lookup and the [`bom::analytics`]
//!   over built trees (depth, flattening, material roll-up).
//! * [`catalog`] / [`category`]: catalog records and category inference.
//! * [`reference`]: TOML reference data, including the embedded Solerno line.
//!
//! All reference data is passed in explicitly; the crate has no global state
//! beyond compiled regexes, and everything built from it is `Send + Sync`.

pub mod bom;
#[cfg(feature = "table")]
mod bom_table;
pub mod catalog;
pub mod category;
pub mod color;
pub mod pattern;
pub mod reference;
pub mod sku;
pub mod template;

pub use bom::{BomNode, BomResolver, WhereUsed};
#[cfg(feature = "table")]
pub use bom_table::write_requirements_table;
pub use catalog::{Catalog, ProductCatalog, ProductRecord};
pub use category::{CategoryChain, CategoryResolver, ProductCategory};
pub use color::{extract_color, resolve_pattern, ColorRules, FabricLookup, Fabrics};
pub use pattern::{PatternError, SkuPattern};
pub use reference::{LoadError, ReferenceData};
pub use sku::{decode_sku, DecodedSku, InvalidSkuError};
pub use template::{BomRelationTemplate, ResolvedRelation, TemplateError, TemplateStore, Unit};
