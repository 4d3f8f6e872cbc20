//! Calibration of descriptor layouts against synthetic prefab graphs.

mod common;

use common::{ContainerBuilder, CLASS_BEHAVIOUR, CLASS_GAME_OBJECT};
use dysonscope::container::ContainerFile;
use dysonscope::diagnostics::{DiagnosticCategory, DiagnosticSeverity};
use dysonscope::proto::{ItemProto, ModelProto, ProtoSet};
use dysonscope::resolve::Resolver;
use dysonscope::schema::Value;

/// Belt descriptor bytes: prototype id followed by speed.
fn belt_descriptor(prototype: i32, speed: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    common::push_i32(&mut buf, prototype);
    common::push_i32(&mut buf, speed);
    buf
}

fn belt_container(descriptor: &[u8]) -> ContainerFile {
    let items = common::table_payload(
        "ItemProtoSet",
        "物品",
        "0.9.27",
        &[common::item_record(2001, "belt-1", 38)],
    );
    let models = common::table_payload(
        "ModelProtoSet",
        "模型",
        "0.9.27",
        &[common::model_record(38, "Entities/Prefabs/belt-1")],
    );

    let mut builder = ContainerBuilder::new(22);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    let game_object = builder.add_type(CLASS_GAME_OBJECT);
    builder.add_asset(100, behaviour, items);
    builder.add_asset(101, behaviour, models);
    builder.add_asset(200, game_object, common::game_object_payload("belt-1", &[300]));
    builder.add_asset(300, behaviour, common::behaviour_payload(200, 900, descriptor));

    ContainerFile::from_memory(builder.build()).unwrap()
}

#[test]
fn matching_descriptor_calibrates_and_attaches() {
    let container = belt_container(&belt_descriptor(2001, 2));
    let mut items = ProtoSet::<ItemProto>::load(&container).unwrap().entries;
    let models = ProtoSet::<ModelProto>::load(&container).unwrap();

    let mut resolver = Resolver::new(&container).unwrap();
    resolver.calibrate(&items, &models);

    assert!(resolver.is_calibrated("BeltDesc"));
    assert_eq!(resolver.script_map().len(), 1);
    assert_eq!(resolver.decode_count(), 1);

    resolver.attach(&mut items, &models);

    let Some(Value::Object(desc)) = items[0].prefab_desc.get("belt") else {
        panic!("belt descriptor not attached");
    };
    assert_eq!(desc.get_i64("speed").unwrap(), 2);
    assert_eq!(desc.get_i64("beltPrototype").unwrap(), 2001);

    // Attachment reuses the payload decoded during calibration.
    assert_eq!(resolver.decode_count(), 1);
}

#[test]
fn wrong_span_length_is_rejected() {
    let mut descriptor = belt_descriptor(2001, 2);
    common::push_i32(&mut descriptor, 0); // 12 bytes, layout wants 8
    let container = belt_container(&descriptor);
    let items = ProtoSet::<ItemProto>::load(&container).unwrap().entries;
    let models = ProtoSet::<ModelProto>::load(&container).unwrap();

    let mut resolver = Resolver::new(&container).unwrap();
    resolver.calibrate(&items, &models);

    assert!(!resolver.is_calibrated("BeltDesc"));
    assert!(container.diagnostics().iter().any(|diag| {
        diag.severity == DiagnosticSeverity::Warning
            && diag.category == DiagnosticCategory::Calibration
            && diag.message.contains("BeltDesc")
    }));
}

#[test]
fn implausible_values_are_rejected() {
    // Right span, but no belt moves at speed 999.
    let container = belt_container(&belt_descriptor(2001, 999));
    let items = ProtoSet::<ItemProto>::load(&container).unwrap().entries;
    let models = ProtoSet::<ModelProto>::load(&container).unwrap();

    let mut resolver = Resolver::new(&container).unwrap();
    resolver.calibrate(&items, &models);

    assert!(!resolver.is_calibrated("BeltDesc"));
    assert_eq!(resolver.decode_count(), 0);
}
