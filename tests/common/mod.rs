//! Shared helpers that assemble synthetic containers byte by byte.
//!
//! The builder lays out a directory the way the game's `resources.assets`
//! does: a big-endian header, a directory in the byte order the header
//! declares, and little-endian payloads behind the first-payload offset.

#![allow(dead_code)]

/// Engine class identifier of game objects.
pub const CLASS_GAME_OBJECT: i32 = 1;
/// Engine class identifier of script-backed behaviours.
pub const CLASS_BEHAVIOUR: i32 = 114;
/// Engine class identifier of 2D textures.
pub const CLASS_TEXTURE_2D: i32 = 28;

/// An asset staged for the builder: path id, type table index, payload.
pub struct StagedAsset {
    pub path_id: i64,
    pub type_index: usize,
    pub payload: Vec<u8>,
}

/// Assembles a synthetic container image.
pub struct ContainerBuilder {
    format: u32,
    engine_version: String,
    platform: u32,
    big_directory: bool,
    type_trees: bool,
    types: Vec<i32>,
    assets: Vec<StagedAsset>,
    preload_count_override: Option<u32>,
}

impl ContainerBuilder {
    pub fn new(format: u32) -> ContainerBuilder {
        ContainerBuilder {
            format,
            engine_version: "2018.4.12f1".to_string(),
            platform: 5,
            big_directory: false,
            type_trees: false,
            types: Vec::new(),
            assets: Vec::new(),
            preload_count_override: None,
        }
    }

    /// Declares the directory big-endian through the header's byte order flag.
    pub fn big_directory(mut self) -> ContainerBuilder {
        self.big_directory = true;
        self
    }

    /// Sets the embedded type tree flag, which parsing must refuse.
    pub fn with_type_trees(mut self) -> ContainerBuilder {
        self.type_trees = true;
        self
    }

    /// Writes a raw preload count without any entries behind it.
    pub fn preload_count(mut self, count: u32) -> ContainerBuilder {
        self.preload_count_override = Some(count);
        self
    }

    /// Registers a class in the type table, returning its index.
    pub fn add_type(&mut self, class_id: i32) -> usize {
        self.types.push(class_id);
        self.types.len() - 1
    }

    /// Stages an asset payload under a previously registered type.
    pub fn add_asset(&mut self, path_id: i64, type_index: usize, payload: Vec<u8>) {
        self.assets.push(StagedAsset {
            path_id,
            type_index,
            payload,
        });
    }

    fn push_u16(&self, buf: &mut Vec<u8>, value: u16) {
        if self.big_directory {
            buf.extend_from_slice(&value.to_be_bytes());
        } else {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn push_u32(&self, buf: &mut Vec<u8>, value: u32) {
        if self.big_directory {
            buf.extend_from_slice(&value.to_be_bytes());
        } else {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn push_i32(&self, buf: &mut Vec<u8>, value: i32) {
        self.push_u32(buf, value as u32);
    }

    fn push_i64(&self, buf: &mut Vec<u8>, value: i64) {
        if self.big_directory {
            buf.extend_from_slice(&value.to_be_bytes());
        } else {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Produces the full container image.
    pub fn build(&self) -> Vec<u8> {
        assert!(self.format >= 17, "builder only covers formats 17 and up");

        let header_len = if self.format >= 22 { 48 } else { 20 };
        let mut buf = vec![0u8; header_len];

        // Directory: version, platform, type tree flag
        buf.extend_from_slice(self.engine_version.as_bytes());
        buf.push(0);
        self.push_u32(&mut buf, self.platform);
        buf.push(u8::from(self.type_trees));

        // Type table
        self.push_u32(&mut buf, self.types.len() as u32);
        for &class_id in &self.types {
            self.push_i32(&mut buf, class_id);
            buf.push(0); // stripped
            if self.big_directory {
                buf.extend_from_slice(&(-1i16).to_be_bytes());
            } else {
                buf.extend_from_slice(&(-1i16).to_le_bytes());
            }
            if class_id == CLASS_BEHAVIOUR || class_id < 0 {
                buf.extend_from_slice(&[0u8; 16]); // script id
            }
            buf.extend_from_slice(&[0u8; 16]); // old type hash
        }

        // Relative payload offsets, each payload padded to 8 bytes
        let mut relative = Vec::with_capacity(self.assets.len());
        let mut running = 0u64;
        for asset in &self.assets {
            relative.push(running);
            running += asset.payload.len() as u64;
            running = (running + 7) & !7;
        }

        // Asset table
        self.push_u32(&mut buf, self.assets.len() as u32);
        if !self.assets.is_empty() {
            while buf.len() % 4 != 0 {
                buf.push(0);
            }
            for (asset, &offset) in self.assets.iter().zip(&relative) {
                self.push_i64(&mut buf, asset.path_id);
                if self.format >= 22 {
                    self.push_i64(&mut buf, offset as i64);
                } else {
                    self.push_u32(&mut buf, offset as u32);
                }
                self.push_u32(&mut buf, asset.payload.len() as u32);
                self.push_i32(&mut buf, asset.type_index as i32);
            }
        }

        // Preloads, dependencies, secondary types
        self.push_u32(&mut buf, self.preload_count_override.unwrap_or(0));
        self.push_u32(&mut buf, 0);
        if self.format >= 20 {
            self.push_u32(&mut buf, 0);
        }

        let metadata_size = (buf.len() - header_len) as u64;
        let data_start = ((buf.len() as u64 + 15) & !15).max(64);
        buf.resize(data_start as usize, 0);

        for (asset, &offset) in self.assets.iter().zip(&relative) {
            let target = (data_start + offset) as usize;
            buf.resize(target, 0);
            buf.extend_from_slice(&asset.payload);
        }

        // Header, always big-endian
        let total = buf.len() as u64;
        let endian_flag: u32 = u32::from(self.big_directory);
        if self.format >= 22 {
            buf[8..12].copy_from_slice(&self.format.to_be_bytes());
            buf[16..24].copy_from_slice(&metadata_size.to_be_bytes());
            buf[24..32].copy_from_slice(&total.to_be_bytes());
            buf[32..40].copy_from_slice(&data_start.to_be_bytes());
            buf[40..44].copy_from_slice(&endian_flag.to_be_bytes());
        } else {
            buf[0..4].copy_from_slice(&(metadata_size as u32).to_be_bytes());
            buf[4..8].copy_from_slice(&(total as u32).to_be_bytes());
            buf[8..12].copy_from_slice(&self.format.to_be_bytes());
            buf[12..16].copy_from_slice(&(data_start as u32).to_be_bytes());
            buf[16..20].copy_from_slice(&endian_flag.to_be_bytes());
        }

        buf
    }
}

// Payload encoding, always little-endian.

pub fn push_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn push_i64(buf: &mut Vec<u8>, value: i64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn push_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Length-prefixed string with trailing alignment padding.
pub fn push_aligned_str(buf: &mut Vec<u8>, value: &str) {
    push_i32(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

/// Length-prefixed string without trailing padding.
pub fn push_raw_str(buf: &mut Vec<u8>, value: &str) {
    push_i32(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

/// Empty count-prefixed array.
pub fn push_empty_array(buf: &mut Vec<u8>) {
    push_i32(buf, 0);
}

pub fn push_i32_array(buf: &mut Vec<u8>, values: &[i32]) {
    push_i32(buf, values.len() as i32);
    for &value in values {
        push_i32(buf, value);
    }
}

fn push_pptr(buf: &mut Vec<u8>, file_id: i32, path_id: i64) {
    push_i32(buf, file_id);
    push_i64(buf, path_id);
}

/// Wraps table content in the data table prologue: null object reference,
/// enabled flag, padding, script reference.
pub fn table_payload(
    file_name: &str,
    table_name: &str,
    signature: &str,
    records: &[Vec<u8>],
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]);
    buf.extend_from_slice(&[0u8; 12]);
    push_aligned_str(&mut buf, file_name);
    push_aligned_str(&mut buf, table_name);
    push_aligned_str(&mut buf, signature);
    push_i32(&mut buf, records.len() as i32);
    for record in records {
        buf.extend_from_slice(record);
    }
    buf
}

/// One item table record with everything but the given fields defaulted.
pub fn item_record(id: i32, name: &str, model_index: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    push_aligned_str(&mut buf, name); // name
    push_i32(&mut buf, id); // id
    push_aligned_str(&mut buf, ""); // sid
    push_i32(&mut buf, 1); // type
    push_i32(&mut buf, 0); // subId
    push_aligned_str(&mut buf, ""); // miningFrom
    push_aligned_str(&mut buf, ""); // produceFrom
    push_i32(&mut buf, 100); // stackSize
    push_i32(&mut buf, 0); // grade
    push_empty_array(&mut buf); // upgrades
    push_u32(&mut buf, 0); // isFluid
    push_u32(&mut buf, 1); // isEntity
    push_u32(&mut buf, 1); // canBuild
    push_u32(&mut buf, 0); // buildInGas
    push_aligned_str(&mut buf, ""); // iconPath
    push_i32(&mut buf, model_index); // modelIndex
    push_i32(&mut buf, if model_index != 0 { 1 } else { 0 }); // modelCount
    push_i32(&mut buf, 100); // hpMax
    push_i32(&mut buf, 0); // ability
    push_i64(&mut buf, 0); // heatValue
    push_i64(&mut buf, 0); // potential
    push_f32(&mut buf, 0.0); // reactorInc
    push_i32(&mut buf, 0); // fuelType
    push_i32(&mut buf, 0); // ammoType
    push_i32(&mut buf, 0); // bombType
    push_i32(&mut buf, 0); // craftType
    push_i32(&mut buf, 0); // buildIndex
    push_i32(&mut buf, 0); // buildMode
    push_i32(&mut buf, 1101); // gridIndex
    push_i32(&mut buf, 0); // unlockKey
    push_i32(&mut buf, 0); // preTechOverride
    push_u32(&mut buf, 1); // productive
    push_i32(&mut buf, 0); // mechaMaterialId
    push_f32(&mut buf, 0.0); // dropRate
    push_i32(&mut buf, 0); // enemyDropLevel
    push_f32(&mut buf, 0.0); // enemyDropRange x
    push_f32(&mut buf, 0.0); // enemyDropRange y
    push_f32(&mut buf, 0.0); // enemyDropCount
    push_i32(&mut buf, 0); // enemyDropMask
    push_empty_array(&mut buf); // descFields
    push_aligned_str(&mut buf, ""); // description
    buf
}

/// One model table record.
pub fn model_record(id: i32, prefab_path: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    push_aligned_str(&mut buf, prefab_path.rsplit('/').next().unwrap_or("")); // name
    push_i32(&mut buf, id); // id
    push_aligned_str(&mut buf, ""); // sid
    push_i32(&mut buf, 1); // type
    push_i32(&mut buf, 0); // ruin
    push_i32(&mut buf, 0); // rendererType
    push_i32(&mut buf, 100); // hpMax
    push_i32(&mut buf, 0); // hpUpgrade
    push_i32(&mut buf, 0); // hpRecover
    push_i32(&mut buf, 0); // ruinId
    push_i32(&mut buf, 0); // ruinCount
    push_i32(&mut buf, 0); // ruinLifeTime
    push_aligned_str(&mut buf, prefab_path); // prefabPath
    buf
}

/// One recipe table record.
pub fn recipe_record(id: i32, items: &[i32], results: &[i32]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_aligned_str(&mut buf, "Smelt"); // name
    push_i32(&mut buf, id); // id
    push_aligned_str(&mut buf, ""); // sid
    push_i32(&mut buf, 2); // type
    push_u32(&mut buf, 1); // handcraft
    push_u32(&mut buf, 0); // explicit
    push_i32(&mut buf, 60); // timeSpend
    push_i32_array(&mut buf, items); // items
    push_i32_array(&mut buf, &vec![1; items.len()]); // itemCounts
    push_i32_array(&mut buf, results); // results
    push_i32_array(&mut buf, &vec![1; results.len()]); // resultCounts
    push_i32(&mut buf, 1101); // gridIndex
    push_aligned_str(&mut buf, ""); // iconPath
    push_aligned_str(&mut buf, ""); // description
    push_u32(&mut buf, 0); // nonProductive
    buf
}

/// One technology table record.
pub fn tech_record(id: i32, published: bool, unlock_recipes: &[i32], items: &[i32]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_aligned_str(&mut buf, "Electromagnetism"); // name
    push_i32(&mut buf, id); // id
    push_aligned_str(&mut buf, ""); // sid
    push_aligned_str(&mut buf, ""); // description
    push_aligned_str(&mut buf, ""); // conclusion
    push_u32(&mut buf, u32::from(published)); // published
    push_u32(&mut buf, 0); // isHiddenTech
    push_empty_array(&mut buf); // preItem
    push_i32(&mut buf, 1); // level
    push_i32(&mut buf, 1); // maxLevel
    push_i32(&mut buf, 0); // levelCoef1
    push_i32(&mut buf, 0); // levelCoef2
    push_aligned_str(&mut buf, ""); // iconPath
    push_u32(&mut buf, 1); // isLabTech
    push_empty_array(&mut buf); // preTechs
    push_empty_array(&mut buf); // preTechsImplicit
    push_u32(&mut buf, 0); // preTechsMax
    push_i32_array(&mut buf, items); // items
    push_i32_array(&mut buf, &vec![10; items.len()]); // itemPoints
    push_empty_array(&mut buf); // propertyOverrideItems
    push_empty_array(&mut buf); // propertyItemCounts
    push_i64(&mut buf, 3600); // hashNeeded
    push_i32_array(&mut buf, unlock_recipes); // unlockRecipes
    push_empty_array(&mut buf); // unlockFunctions
    push_empty_array(&mut buf); // unlockValues
    push_empty_array(&mut buf); // addItems
    push_empty_array(&mut buf); // addItemCounts
    push_f32(&mut buf, 10.0); // position x
    push_f32(&mut buf, 20.0); // position y
    buf
}

/// A game object payload owning the given component references.
pub fn game_object_payload(name: &str, components: &[i64]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_i32(&mut buf, components.len() as i32);
    for &path_id in components {
        push_pptr(&mut buf, 0, path_id);
    }
    push_u32(&mut buf, 0); // layer
    push_raw_str(&mut buf, name);
    buf.extend_from_slice(&0u16.to_le_bytes()); // tag
    buf.push(1); // isActive
    buf
}

/// A behaviour payload with the descriptor bytes appended after the header.
pub fn behaviour_payload(game_object: i64, script: i64, descriptor: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    push_pptr(&mut buf, 0, game_object);
    push_u32(&mut buf, 1); // enabled
    push_pptr(&mut buf, 0, script);
    push_raw_str(&mut buf, ""); // name
    buf.extend_from_slice(descriptor);
    buf
}

/// A texture payload; a zero inline size appends a streaming location.
pub fn texture_payload(name: &str, width: i32, height: i32, format: i32, inline_size: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    push_aligned_str(&mut buf, name);
    push_i32(&mut buf, 0); // forcedFallbackFormat
    push_u32(&mut buf, 0); // downscaleFallback
    push_i32(&mut buf, width);
    push_i32(&mut buf, height);
    push_i32(&mut buf, inline_size); // completeImageSize
    push_i32(&mut buf, format);
    push_i32(&mut buf, 1); // mipCount
    push_u32(&mut buf, 0); // isReadable
    push_u32(&mut buf, 0); // streamingMipmaps
    push_i32(&mut buf, 1); // imageCount
    push_i32(&mut buf, 2); // textureDimension
    push_i32(&mut buf, 1); // filterMode
    push_i32(&mut buf, 1); // anisotropy
    push_f32(&mut buf, 0.0); // mipBias
    push_i32(&mut buf, 1); // wrapU
    push_i32(&mut buf, 1); // wrapV
    push_i32(&mut buf, 1); // wrapW
    push_i32(&mut buf, 0); // lightmapFormat
    push_i32(&mut buf, 1); // colorSpace
    push_i32(&mut buf, inline_size); // imageDataSize
    if inline_size > 0 {
        buf.extend(std::iter::repeat(0x5A).take(inline_size as usize));
    } else {
        push_u32(&mut buf, 4096); // stream offset
        push_u32(&mut buf, 25600); // stream size
        push_aligned_str(&mut buf, "archive:/streaming.resource");
    }
    buf
}
