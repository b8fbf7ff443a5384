//! Validation command handler

use super::utils::load_catalog;
use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde::Serialize;
use sttm_core::{
    CatalogSummary, EngineOptions, LinkValidation, MappingCatalog, TransformRegistry,
    TransformationEngine,
};
use tracing::{info, instrument};

/// Machine-readable validation result
#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    catalog: String,
    summary: CatalogSummary,
    output_fields: Vec<String>,
}

/// Handle the validate command
///
/// Links and masks are always checked eagerly here, whatever the configured
/// validation mode.
#[instrument(skip(_config, output), fields(catalog = %args.catalog.display()))]
pub async fn handle_validate(
    args: ValidateArgs,
    _config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.catalog.display().to_string());
    output.info(&format!("Validating catalog: {}", args.catalog.display()))?;

    let catalog = load_catalog(&args.catalog)?;
    let engine = TransformationEngine::with_options(
        catalog,
        TransformRegistry::builtin(),
        EngineOptions {
            link_validation: LinkValidation::Eager,
        },
    )?;
    info!(links = engine.catalog().links().len(), "Catalog validated");

    let summary = engine.catalog().summary();
    if output.format() == OutputFormat::Human {
        output.success("✓ Catalog is valid")?;
        output.section("Tables")?;
        output.catalog_summary(&summary)?;
        output.section("Mapping Links")?;
        output.table(
            &["Link", "Source", "Destination", "Type", "Mask"],
            link_rows(engine.catalog()),
        )?;
    } else {
        output.data(&ValidationReport {
            valid: true,
            catalog: args.catalog.display().to_string(),
            summary,
            output_fields: engine.output_fields().into_iter().map(String::from).collect(),
        })?;
    }

    Ok(())
}

/// One table row per mapping link; the catalog has already been validated
fn link_rows(catalog: &MappingCatalog) -> Vec<Vec<String>> {
    catalog
        .links()
        .iter()
        .map(|link| {
            let source = catalog
                .link_source(link)
                .map(|s| format!("{} ({})", s.name, s.path))
                .unwrap_or_else(|_| format!("#{}", link.source));
            let (destination, kind) = catalog
                .link_destination(link)
                .map(|d| (d.name.clone(), d.kind.to_string()))
                .unwrap_or_else(|_| (format!("#{}", link.destination), "?".to_string()));
            let mask = match catalog.link_transform(link) {
                Ok(Some(transform)) => transform.mask.clone(),
                Ok(None) => "-".to_string(),
                Err(_) => "?".to_string(),
            };
            vec![link.id.to_string(), source, destination, kind, mask]
        })
        .collect()
}
