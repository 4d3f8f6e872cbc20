//! Calibration of opaque behaviour payloads against known descriptor layouts.
//!
//! Serialized behaviours carry no layout name, only a script reference and an
//! undecoded byte span. Calibration recovers the mapping from script
//! reference to layout by hypothesis and validation: for each registry entry
//! an anchor item known to carry the descriptor is located, the behaviours of
//! its model prefab are collected, and candidates whose span length matches
//! the layout's fixed size are trial-decoded. A trial is accepted only when
//! it consumes the span exactly and its fields pass the layout's plausibility
//! predicate. An accepted mapping applies globally to every behaviour sharing
//! the script reference.
//!
//! Rejected trials are never errors. A layout that exhausts its candidates is
//! reported through a calibration diagnostic and stays absent from all items.

pub mod registry;

use std::collections::HashMap;
use std::rc::Rc;

use crate::container::record::CLASS_GAME_OBJECT;
use crate::container::{BehaviourInfo, ContainerFile, ObjectMemo, ResolvedObject};
use crate::diagnostics::DiagnosticCategory;
use crate::proto::{ItemProto, ModelProto, ProtoSet};
use crate::schema::{decode_object, Object, Value};
use crate::{Error, Result};

use registry::{DescriptorSpec, SizeHint, REGISTRY};

/// Calibrates descriptor layouts against one container and attaches the
/// decoded descriptors to item records.
///
/// A resolver is local to one resolution pass. Its memo tables must not be
/// shared across containers; independent containers get independent
/// resolvers.
pub struct Resolver<'data> {
    container: &'data ContainerFile,
    memo: ObjectMemo,
    prefab_index: HashMap<String, Vec<i64>>,
    script_map: HashMap<i64, &'static DescriptorSpec>,
    decode_cache: HashMap<i64, Rc<Object>>,
    decode_count: usize,
}

impl<'data> Resolver<'data> {
    /// Builds a resolver over a container, indexing its game objects by name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when a game object header fails to
    /// decode.
    pub fn new(container: &'data ContainerFile) -> Result<Resolver<'data>> {
        let mut memo = ObjectMemo::new();
        let mut prefab_index: HashMap<String, Vec<i64>> = HashMap::new();

        let game_objects: Vec<i64> = container
            .records()
            .iter()
            .filter(|record| record.class_id == CLASS_GAME_OBJECT)
            .map(|record| record.path_id)
            .collect();
        for path_id in game_objects {
            let resolved = container.resolve_object(path_id, &mut memo)?;
            if let ResolvedObject::GameObject(info) = resolved.as_ref() {
                prefab_index.entry(info.name.clone()).or_default().push(path_id);
            }
        }

        Ok(Resolver {
            container,
            memo,
            prefab_index,
            script_map: HashMap::new(),
            decode_cache: HashMap::new(),
            decode_count: 0,
        })
    }

    /// Establishes the script-to-layout map from the registry's anchor items.
    ///
    /// Failures are reported as calibration diagnostics on the container;
    /// every layout is attempted regardless of earlier outcomes.
    pub fn calibrate(&mut self, items: &[ItemProto], models: &ProtoSet<ModelProto>) {
        for spec in REGISTRY {
            match self.calibrate_spec(spec, items, models) {
                Ok(true) => {}
                Ok(false) => {
                    self.container.diagnostics().warning(
                        DiagnosticCategory::Calibration,
                        format!("Cross-check failed for {}", spec.name),
                    );
                }
                Err(err) => {
                    self.container.diagnostics().warning(
                        DiagnosticCategory::Calibration,
                        format!("Cross-check failed for {}: {}", spec.name, err),
                    );
                }
            }
        }
    }

    fn calibrate_spec(
        &mut self,
        spec: &'static DescriptorSpec,
        items: &[ItemProto],
        models: &ProtoSet<ModelProto>,
    ) -> Result<bool> {
        let Some(item) = items.iter().find(|item| item.id == spec.anchor_item) else {
            return Ok(false);
        };

        for behaviour in self.prefab_behaviours(item, models)? {
            if self.script_map.contains_key(&behaviour.script.path_id) {
                continue;
            }
            let Some(record) = self.container.record_by_path(behaviour.path_id) else {
                continue;
            };
            let Some(span) = (record.size as usize).checked_sub(behaviour.data_start) else {
                continue;
            };
            if let SizeHint::Fixed(expected) = spec.size {
                if span != expected {
                    continue;
                }
            }

            let mut cursor = self.container.payload_cursor(record)?;
            cursor.seek(behaviour.data_start)?;
            let Ok(object) = decode_object(&mut cursor, spec.fields) else {
                continue;
            };
            if cursor.remaining() != 0 || !(spec.plausible)(&object) {
                continue;
            }

            self.script_map.insert(behaviour.script.path_id, spec);
            self.decode_cache.insert(behaviour.path_id, Rc::new(object));
            self.decode_count += 1;
            return Ok(true);
        }

        Ok(false)
    }

    /// Attaches descriptors to every item with a model, keyed per layout
    /// under [`ItemProto::prefab_desc`].
    ///
    /// Items whose prefab data fails to decode get a resolution diagnostic
    /// and keep the descriptors attached so far.
    pub fn attach(&mut self, items: &mut [ItemProto], models: &ProtoSet<ModelProto>) {
        for item in items {
            if item.model_index == 0 || item.model_count == 0 {
                continue;
            }
            if let Err(err) = self.attach_item(item, models) {
                self.container.diagnostics().warning(
                    DiagnosticCategory::Resolution,
                    format!("Descriptor decode failed for item {}: {}", item.id, err),
                );
            }
        }
    }

    fn attach_item(&mut self, item: &mut ItemProto, models: &ProtoSet<ModelProto>) -> Result<()> {
        for behaviour in self.prefab_behaviours(item, models)? {
            let Some(spec) = self.script_map.get(&behaviour.script.path_id).copied() else {
                continue;
            };
            if item.prefab_desc.get(spec.key).is_some() {
                continue;
            }
            let object = self.decode_component(spec, &behaviour)?;
            item.prefab_desc
                .push(spec.key, Value::Object(object.as_ref().clone()));
        }
        Ok(())
    }

    /// Runs calibration followed by attachment.
    pub fn resolve(&mut self, items: &mut [ItemProto], models: &ProtoSet<ModelProto>) {
        self.calibrate(items, models);
        self.attach(items, models);
    }

    fn prefab_behaviours(
        &mut self,
        item: &ItemProto,
        models: &ProtoSet<ModelProto>,
    ) -> Result<Vec<BehaviourInfo>> {
        let Some(model) = models.by_id(item.model_index) else {
            return Ok(Vec::new());
        };
        let Some(prefab_name) = model.prefab_path.rsplit('/').next() else {
            return Ok(Vec::new());
        };
        let Some(path_ids) = self.prefab_index.get(prefab_name) else {
            return Ok(Vec::new());
        };

        let mut behaviours = Vec::new();
        for path_id in path_ids.clone() {
            let resolved = self.container.resolve_object(path_id, &mut self.memo)?;
            let ResolvedObject::GameObject(info) = resolved.as_ref() else {
                continue;
            };
            for component in info.components.clone() {
                let resolved = self.container.resolve_object(component.path_id, &mut self.memo)?;
                if let ResolvedObject::Behaviour(behaviour) = resolved.as_ref() {
                    behaviours.push(behaviour.clone());
                }
            }
        }
        Ok(behaviours)
    }

    fn decode_component(
        &mut self,
        spec: &'static DescriptorSpec,
        behaviour: &BehaviourInfo,
    ) -> Result<Rc<Object>> {
        if let Some(hit) = self.decode_cache.get(&behaviour.path_id) {
            return Ok(Rc::clone(hit));
        }

        let record = self
            .container
            .record_by_path(behaviour.path_id)
            .ok_or_else(|| Error::AssetNotFound(format!("behaviour path {}", behaviour.path_id)))?;
        let mut cursor = self.container.payload_cursor(record)?;
        cursor.seek(behaviour.data_start)?;
        let object = decode_object(&mut cursor, spec.fields)?;
        self.decode_count += 1;

        let object = Rc::new(object);
        self.decode_cache.insert(behaviour.path_id, Rc::clone(&object));
        Ok(object)
    }

    /// Established script-to-layout mapping.
    #[must_use]
    pub fn script_map(&self) -> &HashMap<i64, &'static DescriptorSpec> {
        &self.script_map
    }

    /// Whether the named layout has been calibrated.
    #[must_use]
    pub fn is_calibrated(&self, name: &str) -> bool {
        self.script_map.values().any(|spec| spec.name == name)
    }

    /// Number of descriptor payloads decoded so far, cache misses only.
    #[must_use]
    pub fn decode_count(&self) -> usize {
        self.decode_count
    }
}
