use super::*;
use crate::types::FieldKind;
use serde_json::json;
use std::io::Write;

fn small_catalog() -> MappingCatalog {
    MappingCatalog::new(
        vec![
            SourceFieldDef::new(1, "Married", FieldKind::String, true),
            SourceFieldDef::new(2, "Dependents", FieldKind::String, false),
        ],
        vec![
            DestinationFieldDef::new(10, "Married", FieldKind::String, json!("n/a")),
            DestinationFieldDef::new(20, "Dependents", FieldKind::Float, json!(0)),
        ],
        vec![
            TransformDef::new(100, "CAPITAL_LETTER"),
            TransformDef::new(101, "CAPITAL_LETTER"),
        ],
        vec![
            MappingLink::new(1, 1, 10).with_transform(100),
            MappingLink::new(2, 2, 20),
        ],
    )
    .expect("catalog should be valid")
}

#[test]
fn test_lookup_by_id_and_name() {
    let catalog = small_catalog();

    assert_eq!(catalog.source_by_id(2).map(|s| s.name.as_str()), Some("Dependents"));
    assert!(catalog.source_by_id(3).is_none());
    assert_eq!(catalog.destination_by_name("Dependents").map(|d| d.id), Some(20));
    assert_eq!(catalog.source_by_name("Married").map(|s| s.required), Some(true));
    assert_eq!(catalog.transform_by_id(101).map(|t| t.mask.as_str()), Some("CAPITAL_LETTER"));
    assert_eq!(catalog.link_by_id(2).map(|l| l.destination), Some(20));
}

#[test]
fn test_transforms_by_mask_returns_all_entries() {
    let catalog = small_catalog();
    let ids: Vec<_> = catalog
        .transforms_by_mask("CAPITAL_LETTER")
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![100, 101]);
    assert!(catalog.transforms_by_mask("CLEAN_STRING").is_empty());
}

#[test]
fn test_links_keep_insertion_order() {
    let catalog = MappingCatalog::new(
        vec![
            SourceFieldDef::new(1, "a", FieldKind::String, false),
            SourceFieldDef::new(2, "b", FieldKind::String, false),
        ],
        vec![
            DestinationFieldDef::new(1, "A", FieldKind::String, json!("")),
            DestinationFieldDef::new(2, "B", FieldKind::String, json!("")),
        ],
        vec![],
        vec![MappingLink::new(9, 2, 2), MappingLink::new(3, 1, 1)],
    )
    .unwrap();

    let ids: Vec<_> = catalog.links().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![9, 3]);
}

#[test]
fn test_duplicate_field_name_is_rejected() {
    let err = MappingCatalog::new(
        vec![
            SourceFieldDef::new(1, "Gender", FieldKind::String, true),
            SourceFieldDef::new(2, "Gender", FieldKind::String, true),
        ],
        vec![],
        vec![],
        vec![],
    )
    .unwrap_err();

    match err {
        Error::Catalog { message, entity } => {
            assert!(message.contains("duplicate field name 'Gender'"));
            assert_eq!(entity.as_deref(), Some("source#2"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_duplicate_id_is_rejected() {
    let err = MappingCatalog::new(
        vec![],
        vec![
            DestinationFieldDef::new(1, "A", FieldKind::String, json!("")),
            DestinationFieldDef::new(1, "B", FieldKind::String, json!("")),
        ],
        vec![],
        vec![],
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate id 1 in destination table"));
}

#[test]
fn test_unconvertible_default_is_rejected_at_load() {
    let err = MappingCatalog::new(
        vec![],
        vec![DestinationFieldDef::new(3, "Age", FieldKind::Float, json!("n/a"))],
        vec![],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, Error::Catalog { .. }));
}

#[test]
fn test_bad_path_is_rejected_at_load() {
    let err = MappingCatalog::new(
        vec![SourceFieldDef::new(1, "Gender", FieldKind::String, true).with_path("Gender")],
        vec![],
        vec![],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[test]
fn test_validate_links_accepts_consistent_catalog() {
    let catalog = small_catalog();
    catalog.validate_links(&TransformRegistry::builtin()).unwrap();
}

#[test]
fn test_validate_links_reports_dangling_ids() {
    let catalog = MappingCatalog::new(
        vec![SourceFieldDef::new(1, "a", FieldKind::String, false)],
        vec![DestinationFieldDef::new(1, "A", FieldKind::String, json!(""))],
        vec![],
        vec![MappingLink::new(7, 1, 99)],
    )
    .unwrap();

    let err = catalog.validate_links(&TransformRegistry::builtin()).unwrap_err();
    match err {
        Error::Catalog { message, entity } => {
            assert!(message.contains("unknown destination field id 99"));
            assert_eq!(entity.as_deref(), Some("mapping#7"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validate_links_reports_unknown_mask() {
    let catalog = MappingCatalog::new(
        vec![SourceFieldDef::new(1, "a", FieldKind::String, false)],
        vec![DestinationFieldDef::new(1, "A", FieldKind::String, json!(""))],
        vec![TransformDef::new(1, "SHOUT")],
        vec![MappingLink::new(1, 1, 1).with_transform(1)],
    )
    .unwrap();

    let err = catalog.validate_links(&TransformRegistry::builtin()).unwrap_err();
    assert!(matches!(err, Error::UnknownTransform { ref mask, .. } if mask == "SHOUT"));
}

#[test]
fn test_from_json_document() {
    let catalog = MappingCatalog::from_json_str(
        r#"{
            "source": [{"id": 1, "source_field_name": "Gender", "source_field_mapping": "$.Gender",
                        "source_field_type": "str", "is_required": true}],
            "destination": [{"id": 1, "destination_field_name": "Gender",
                             "destination_field_mapping": "$.Gender",
                             "destination_field_type": "str", "default_value": "n/a"}],
            "mapping": [{"id": 1, "mapping_source": 1, "mapping_destination": 1}]
        }"#,
    )
    .unwrap();

    assert!(catalog.transforms().is_empty());
    assert_eq!(catalog.summary().links, 1);
    assert_eq!(catalog.summary().required_sources, 1);
}

#[test]
fn test_unknown_type_keyword_is_catalog_error() {
    let err = MappingCatalog::from_json_str(
        r#"{
            "source": [{"id": 1, "source_field_name": "Gender", "source_field_mapping": "$.Gender",
                        "source_field_type": "set"}],
            "destination": [],
            "mapping": []
        }"#,
    )
    .unwrap_err();

    match err {
        Error::Catalog { message, .. } => assert!(message.contains("unknown type keyword 'set'")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_type_is_catalog_error() {
    let err = MappingCatalog::from_json_str(
        r#"{
            "source": [{"id": 1, "source_field_name": "Gender", "source_field_mapping": "$.Gender"}],
            "destination": [],
            "mapping": []
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Catalog { .. }));
}

#[test]
fn test_from_yaml_document() {
    let catalog = MappingCatalog::from_yaml_str(
        r#"
source:
  - id: 1
    source_field_name: Area
    source_field_mapping: $.Area
    source_field_type: str
destination:
  - id: 1
    destination_field_name: Area
    destination_field_mapping: $.Area
    destination_field_type: str
    default_value: n/a
transform:
  - id: 1
    transform_mask: CAPITAL_LETTER
mapping:
  - id: 1
    mapping_source: 1
    mapping_destination: 1
    mapping_transform: 1
"#,
    )
    .unwrap();

    assert_eq!(catalog.links()[0].transform, Some(1));
    assert_eq!(catalog.source_by_name("Area").map(|s| s.required), Some(false));
}

#[test]
fn test_document_round_trip_preserves_tables() {
    let catalog = small_catalog();
    let rebuilt = MappingCatalog::from_document(catalog.to_document()).unwrap();
    assert_eq!(rebuilt.to_document(), catalog.to_document());
}

#[test]
fn test_from_path_selects_format_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(
        file,
        "source: []\ndestination: []\nmapping: []\ntransform:\n  - id: 4\n    transform_mask: TRIM"
    )
    .unwrap();

    let catalog = MappingCatalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.transform_by_id(4).map(|t| t.mask.as_str()), Some("TRIM"));
}

#[test]
fn test_from_path_missing_file() {
    let err = MappingCatalog::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
