//! Directory parsing across serialized-file formats.

mod common;

use common::{ContainerBuilder, CLASS_BEHAVIOUR};
use dysonscope::container::ContainerFile;
use dysonscope::diagnostics::{DiagnosticCategory, DiagnosticSeverity};
use dysonscope::file::cursor::Endian;
use dysonscope::Error;

fn item_table() -> Vec<u8> {
    common::table_payload(
        "ItemProtoSet",
        "物品",
        "0.9.27",
        &[common::item_record(1101, "Iron Ingot", 0)],
    )
}

#[test]
fn format_22_directory_parses() {
    let mut builder = ContainerBuilder::new(22);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, item_table());

    let container = ContainerFile::from_memory(builder.build()).unwrap();

    assert_eq!(container.format(), 22);
    assert_eq!(container.endian(), Endian::Little);
    assert_eq!(container.engine_version(), "2018.4.12f1");
    assert!(container.platform().is_some());
    assert_eq!(container.types().len(), 1);
    assert_eq!(container.records().len(), 1);

    let record = &container.records()[0];
    assert_eq!(record.path_id, 100);
    assert_eq!(record.class_id, CLASS_BEHAVIOUR);
    assert_eq!(record.offset, container.offset_first_payload());
    assert_eq!(record.name.as_deref(), Some("ItemProtoSet"));
}

#[test]
fn format_17_offsets_are_payload_relative() {
    let mut builder = ContainerBuilder::new(17);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, item_table());
    builder.add_asset(101, behaviour, vec![0xAB; 24]);

    let container = ContainerFile::from_memory(builder.build()).unwrap();

    assert_eq!(container.format(), 17);
    let first = container.record_by_path(100).unwrap();
    let second = container.record_by_path(101).unwrap();
    assert_eq!(first.offset, container.offset_first_payload());
    assert!(second.offset >= first.offset + u64::from(first.size));

    // Payload cursors cover exactly the declared span.
    let cursor = container.payload_cursor(second).unwrap();
    assert_eq!(cursor.len(), 24);
}

#[test]
fn big_endian_directory_parses() {
    let mut builder = ContainerBuilder::new(22).big_directory();
    let text = builder.add_type(49);
    builder.add_asset(7, text, vec![0xFF; 8]);

    let container = ContainerFile::from_memory(builder.build()).unwrap();

    assert_eq!(container.endian(), Endian::Big);
    let record = container.record_by_path(7).unwrap();
    assert_eq!(record.size, 8);
    assert_eq!(record.name, None);
}

#[test]
fn embedded_type_trees_are_refused() {
    let mut builder = ContainerBuilder::new(22).with_type_trees();
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, item_table());

    let result = ContainerFile::from_memory(builder.build());
    assert!(matches!(result, Err(Error::NotSupported)));
}

#[test]
fn implausible_preload_count_is_refused() {
    let builder = ContainerBuilder::new(22).preload_count(2001);
    let result = ContainerFile::from_memory(builder.build());
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn declared_size_mismatch_is_a_warning_only() {
    let mut builder = ContainerBuilder::new(22);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, item_table());

    let mut image = builder.build();
    image.push(0);

    let container = ContainerFile::from_memory(image).unwrap();
    let mismatch = container.diagnostics().iter().any(|diagnostic| {
        diagnostic.severity == DiagnosticSeverity::Warning
            && diagnostic.category == DiagnosticCategory::General
    });
    assert!(mismatch);
}

#[test]
fn empty_input_is_refused() {
    assert!(matches!(
        ContainerFile::from_memory(Vec::new()),
        Err(Error::Empty)
    ));
}

#[test]
fn table_cursor_validates_the_marker() {
    let mut builder = ContainerBuilder::new(22);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, item_table());

    let container = ContainerFile::from_memory(builder.build()).unwrap();
    assert!(container.table_cursor("ItemProtoSet").is_ok());
    assert!(matches!(
        container.table_cursor("RecipeProtoSet"),
        Err(Error::AssetNotFound(_))
    ));
}
