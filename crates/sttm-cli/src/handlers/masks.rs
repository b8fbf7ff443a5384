//! Masks command handler

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;
use sttm_core::TransformRegistry;

/// Sample input shown next to each mask
const SAMPLE: &str = "  new YORK city ";

#[derive(Debug, Serialize)]
struct MaskEntry {
    name: String,
    sample_input: &'static str,
    sample_output: String,
}

fn mask_entries(registry: &TransformRegistry) -> Vec<MaskEntry> {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let sample_output = registry.apply(&name, SAMPLE).unwrap_or_default();
            MaskEntry {
                name,
                sample_input: SAMPLE,
                sample_output,
            }
        })
        .collect()
}

/// Handle the masks command
pub async fn handle_masks(output: &mut OutputWriter) -> Result<()> {
    let entries = mask_entries(&TransformRegistry::builtin());

    if output.format() == OutputFormat::Human {
        output.section("Transform Masks")?;
        let rows = entries
            .iter()
            .map(|entry| {
                vec![
                    entry.name.clone(),
                    format!("{:?} -> {:?}", entry.sample_input, entry.sample_output),
                ]
            })
            .collect();
        output.table(&["Mask", "Example"], rows)
    } else {
        output.data(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_entries_are_sorted_with_samples() {
        let entries = mask_entries(&TransformRegistry::builtin());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CAPITAL_LETTER", "CLEAN_STRING", "TRIM", "UPPER_CASE"]);
        assert_eq!(entries[0].sample_output, "New York City");
        assert_eq!(entries[1].sample_output, "new york city");
        assert_eq!(entries[2].sample_output, "new YORK city");
    }
}
