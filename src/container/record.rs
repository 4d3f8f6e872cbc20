//! Directory entries of the container's asset table.
//!
//! Each [`AssetRecord`] locates one serialized object inside the container:
//! its path identifier, payload span, and engine class. Records also attempt
//! to recover a human-readable name, which the directory itself never stores.

use crate::file::cursor::{Cursor, Endian};
use crate::Result;

use super::typedesc::TypeDescriptor;

/// Engine class identifier of script-backed behaviour objects.
pub const CLASS_SCRIPTED_BEHAVIOUR: i32 = 114;

/// Engine class identifier of 2D texture objects.
pub const CLASS_TEXTURE_2D: i32 = 28;

/// Engine class identifier of game object containers.
pub const CLASS_GAME_OBJECT: i32 = 1;

/// Maximum plausible byte length of a recovered asset name.
const NAME_LENGTH_CEILING: u32 = 4092;

/// One entry of the container's asset directory.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Path identifier, unique within the container.
    pub path_id: i64,
    /// Absolute byte offset of the payload, already adjusted by the
    /// container's first-payload offset.
    pub offset: u64,
    /// Payload length in bytes.
    pub size: u32,
    /// Index into the type table (newer formats), or the raw type field for
    /// older formats.
    pub type_id: i32,
    /// Engine class identifier, resolved through the type table.
    pub class_id: i32,
    /// Recovered name, when one of the recovery strategies succeeded.
    pub name: Option<String>,
}

impl AssetRecord {
    /// Serialized size in bytes of one directory entry for the given format.
    #[must_use]
    pub fn entry_size(format: u32) -> usize {
        if format >= 22 {
            24
        } else if format >= 17 {
            20
        } else if format >= 16 {
            23
        } else if format >= 15 {
            25
        } else if format == 14 {
            24
        } else {
            20
        }
    }

    /// Parses one directory entry.
    ///
    /// The caller aligns the stream; the entry is read through a fixed-size
    /// sub-region so trailing fields some formats omit never bleed into the
    /// next entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the entry references an unknown
    /// type or describes a payload outside the container.
    pub fn parse(
        cursor: &mut Cursor<'_>,
        format: u32,
        offset_first_payload: u64,
        container_len: usize,
        types: &[TypeDescriptor],
    ) -> Result<AssetRecord> {
        cursor.align4();
        let entry_bytes = cursor.read_bytes(Self::entry_size(format))?;
        let mut entry = Cursor::new(entry_bytes, cursor.endian());

        let path_id = if format >= 14 {
            entry.read::<i64>()?
        } else {
            i64::from(entry.read::<i32>()?)
        };

        let relative_offset = if format >= 22 {
            let offset = entry.read::<i64>()?;
            u64::try_from(offset)
                .map_err(|_| malformed_error!("Negative payload offset for path {}", path_id))?
        } else {
            u64::from(entry.read::<u32>()?)
        };
        let offset = offset_first_payload
            .checked_add(relative_offset)
            .ok_or_else(|| malformed_error!("Payload offset overflow for path {}", path_id))?;

        let size = entry.read::<u32>()?;
        let type_id = entry.read::<i32>()?;

        let class_id = if format < 16 {
            let class_id = i32::from(entry.read::<u16>()?);
            if !types.iter().any(|t| t.class_id == class_id) && !types.is_empty() {
                return Err(malformed_error!(
                    "Directory entry for path {} names unknown class {}",
                    path_id,
                    class_id
                ));
            }
            class_id
        } else {
            let index = usize::try_from(type_id).map_err(|_| {
                malformed_error!("Negative type index {} for path {}", type_id, path_id)
            })?;
            let descriptor = types.get(index).ok_or_else(|| {
                malformed_error!("Type index {} out of range for path {}", type_id, path_id)
            })?;
            descriptor.class_id
        };

        if format < 11 {
            entry.read::<u16>()?; // destroyed flag
        }
        if (11..17).contains(&format) {
            entry.read::<i16>()?; // script index override
        }
        if format == 15 || format == 16 {
            entry.read::<u8>()?; // stripped flag
        }

        let end = offset
            .checked_add(u64::from(size))
            .ok_or_else(|| malformed_error!("Payload span overflow for path {}", path_id))?;
        if end > container_len as u64 {
            return Err(malformed_error!(
                "Payload of path {} ends at {} past container length {}",
                path_id,
                end,
                container_len
            ));
        }

        Ok(AssetRecord {
            path_id,
            offset,
            size,
            type_id,
            class_id,
            name: None,
        })
    }

    /// Engine class name of this record, if known.
    #[must_use]
    pub fn class_name(&self) -> Option<&'static str> {
        class_name(self.class_id)
    }

    /// Attempts to recover the asset's name from its payload.
    ///
    /// Two strategies are tried. For classes that serialize a leading name
    /// field the payload is probed for a length-prefixed string in the
    /// directory's byte order. Otherwise the payload is probed for the data
    /// table marker followed by a name. Both apply plausibility checks;
    /// failure yields `None` rather than an error.
    pub fn recover_name(&self, data: &[u8], directory_endian: Endian) -> Option<String> {
        self.recover_name_field(data, directory_endian)
            .or_else(|| self.recover_marked_name(data, directory_endian))
    }

    fn recover_name_field(&self, data: &[u8], directory_endian: Endian) -> Option<String> {
        if !has_serialized_name(self.class_id) {
            return None;
        }

        let mut cursor = Cursor::new(data, directory_endian);
        cursor.seek(usize::try_from(self.offset).ok()?).ok()?;

        let length = cursor.read::<u32>().ok()?;
        if length.checked_add(4)? >= self.size || length >= NAME_LENGTH_CEILING {
            return None;
        }

        let bytes = cursor.read_bytes(length as usize).ok()?;
        if bytes.iter().any(|&byte| byte < 32) {
            return None;
        }

        std::str::from_utf8(bytes).ok().map(str::to_string)
    }

    fn recover_marked_name(&self, data: &[u8], directory_endian: Endian) -> Option<String> {
        let mut cursor = Cursor::new(data, directory_endian);
        cursor.seek(usize::try_from(self.offset).ok()?).ok()?;

        if !super::consume_table_marker(&mut cursor).ok()? {
            return None;
        }

        let name = cursor.read_str(true).ok()?;
        if name.len() >= NAME_LENGTH_CEILING as usize {
            return None;
        }
        Some(name)
    }
}

/// Whether the class serializes its name as the leading payload field.
#[must_use]
pub fn has_serialized_name(class_id: i32) -> bool {
    matches!(
        class_id,
        21 | 27
            | 28
            | 43
            | 48
            | 49
            | 62
            | 72
            | 74
            | 83
            | 84
            | 86
            | 89
            | 90
            | 91
            | 93
            | 109
            | 115
            | 117
            | 121
            | 128
            | 134
            | 142
            | 150
            | 152
            | 156
            | 158
            | 171
            | 184
            | 185
            | 186
            | 187
            | 188
            | 194
            | 200
            | 207
            | 213
            | 221
            | 226
            | 228
            | 237
            | 238
            | 240
            | 258
            | 271
            | 272
            | 273
            | 290
            | 319
            | 329
            | 363
            | 687_078_895
            | 825_902_497
            | 850_595_691
            | 1_480_428_607
            | 1_953_259_897
            | 2_058_629_509
            | 2_083_778_819
    )
}

/// Engine class name for a class identifier.
///
/// Covers the identifiers observed in game containers plus the engine's
/// standard class range. Returns `None` for unknown identifiers.
#[must_use]
pub fn class_name(class_id: i32) -> Option<&'static str> {
    Some(match class_id {
        0 => "Object",
        1 => "GameObject",
        2 => "Component",
        3 => "LevelGameManager",
        4 => "Transform",
        5 => "TimeManager",
        6 => "GlobalGameManager",
        8 => "Behaviour",
        9 => "GameManager",
        11 => "AudioManager",
        13 => "InputManager",
        18 => "EditorExtension",
        19 => "Physics2DSettings",
        20 => "Camera",
        21 => "Material",
        23 => "MeshRenderer",
        25 => "Renderer",
        27 => "Texture",
        28 => "Texture2D",
        29 => "OcclusionCullingSettings",
        30 => "GraphicsSettings",
        33 => "MeshFilter",
        41 => "OcclusionPortal",
        43 => "Mesh",
        45 => "Skybox",
        47 => "QualitySettings",
        48 => "Shader",
        49 => "TextAsset",
        50 => "Rigidbody2D",
        53 => "Collider2D",
        54 => "Rigidbody",
        55 => "PhysicsManager",
        56 => "Collider",
        57 => "Joint",
        58 => "CircleCollider2D",
        59 => "HingeJoint",
        60 => "PolygonCollider2D",
        61 => "BoxCollider2D",
        62 => "PhysicsMaterial2D",
        64 => "MeshCollider",
        65 => "BoxCollider",
        66 => "CompositeCollider2D",
        68 => "EdgeCollider2D",
        70 => "CapsuleCollider2D",
        72 => "ComputeShader",
        74 => "AnimationClip",
        75 => "ConstantForce",
        78 => "TagManager",
        81 => "AudioListener",
        82 => "AudioSource",
        83 => "AudioClip",
        84 => "RenderTexture",
        86 => "CustomRenderTexture",
        89 => "Cubemap",
        90 => "Avatar",
        91 => "AnimatorController",
        93 => "RuntimeAnimatorController",
        94 => "ScriptMapper",
        95 => "Animator",
        96 => "TrailRenderer",
        98 => "DelayedCallManager",
        102 => "TextMesh",
        104 => "RenderSettings",
        108 => "Light",
        109 => "CGProgram",
        110 => "BaseAnimationTrack",
        111 => "Animation",
        114 => "MonoBehaviour",
        115 => "MonoScript",
        116 => "MonoManager",
        117 => "Texture3D",
        118 => "NewAnimationTrack",
        119 => "Projector",
        120 => "LineRenderer",
        121 => "Flare",
        122 => "Halo",
        123 => "LensFlare",
        124 => "FlareLayer",
        125 => "HaloLayer",
        126 => "NavMeshProjectSettings",
        127 => "LevelGameManager",
        128 => "Font",
        129 => "PlayerSettings",
        130 => "NamedObject",
        134 => "PhysicMaterial",
        135 => "SphereCollider",
        136 => "CapsuleCollider",
        137 => "SkinnedMeshRenderer",
        138 => "FixedJoint",
        141 => "BuildSettings",
        142 => "AssetBundle",
        143 => "CharacterController",
        144 => "CharacterJoint",
        145 => "SpringJoint",
        146 => "WheelCollider",
        147 => "ResourceManager",
        150 => "PreloadData",
        153 => "ConfigurableJoint",
        154 => "TerrainCollider",
        156 => "TerrainData",
        157 => "LightmapSettings",
        158 => "WebCamTexture",
        159 => "EditorSettings",
        162 => "EditorUserSettings",
        164 => "AudioReverbFilter",
        165 => "AudioHighPassFilter",
        166 => "AudioChorusFilter",
        167 => "AudioReverbZone",
        168 => "AudioEchoFilter",
        169 => "AudioLowPassFilter",
        170 => "AudioDistortionFilter",
        171 => "SparseTexture",
        180 => "AudioBehaviour",
        181 => "AudioFilter",
        182 => "WindZone",
        183 => "Cloth",
        184 => "SubstanceArchive",
        185 => "ProceduralMaterial",
        186 => "ProceduralTexture",
        187 => "Texture2DArray",
        188 => "CubemapArray",
        191 => "OffMeshLink",
        192 => "OcclusionArea",
        193 => "Tree",
        195 => "NavMeshAgent",
        196 => "NavMeshSettings",
        198 => "ParticleSystem",
        199 => "ParticleSystemRenderer",
        200 => "ShaderVariantCollection",
        205 => "LODGroup",
        206 => "BlendTree",
        207 => "Motion",
        208 => "NavMeshObstacle",
        210 => "SortingGroup",
        212 => "SpriteRenderer",
        213 => "Sprite",
        214 => "CachedSpriteAtlas",
        215 => "ReflectionProbe",
        218 => "Terrain",
        220 => "LightProbeGroup",
        221 => "AnimatorOverrideController",
        222 => "CanvasRenderer",
        223 => "Canvas",
        224 => "RectTransform",
        225 => "CanvasGroup",
        226 => "BillboardAsset",
        227 => "BillboardRenderer",
        228 => "SpeedTreeWindAsset",
        229 => "AnchoredJoint2D",
        230 => "Joint2D",
        231 => "SpringJoint2D",
        232 => "DistanceJoint2D",
        233 => "HingeJoint2D",
        234 => "SliderJoint2D",
        235 => "WheelJoint2D",
        236 => "ClusterInputManager",
        237 => "BaseVideoTexture",
        238 => "NavMeshData",
        240 => "AudioMixer",
        241 => "AudioMixerController",
        243 => "AudioMixerGroupController",
        244 => "AudioMixerEffectController",
        245 => "AudioMixerSnapshotController",
        246 => "PhysicsUpdateBehaviour2D",
        247 => "ConstantForce2D",
        248 => "Effector2D",
        249 => "AreaEffector2D",
        250 => "PointEffector2D",
        251 => "PlatformEffector2D",
        252 => "SurfaceEffector2D",
        253 => "BuoyancyEffector2D",
        254 => "RelativeJoint2D",
        255 => "FixedJoint2D",
        256 => "FrictionJoint2D",
        257 => "TargetJoint2D",
        258 => "LightProbes",
        259 => "LightProbeProxyVolume",
        271 => "SampleClip",
        272 => "AudioMixerSnapshot",
        273 => "AudioMixerGroup",
        290 => "AssetBundleManifest",
        300 => "RuntimeInitializeOnLoadManager",
        310 => "UnityConnectSettings",
        319 => "AvatarMask",
        320 => "PlayableDirector",
        328 => "VideoPlayer",
        329 => "VideoClip",
        330 => "ParticleSystemForceField",
        331 => "SpriteMask",
        362 => "WorldAnchor",
        363 => "OcclusionCullingData",
        1001 => "PrefabInstance",
        1002 => "EditorExtensionImpl",
        1003 => "AssetImporter",
        1004 => "AssetDatabaseV1",
        1005 => "Mesh3DSImporter",
        1006 => "TextureImporter",
        1007 => "ShaderImporter",
        1008 => "ComputeShaderImporter",
        1020 => "AudioImporter",
        1026 => "HierarchyState",
        1028 => "AssetMetaData",
        1029 => "DefaultAsset",
        1030 => "DefaultImporter",
        1031 => "TextScriptImporter",
        1032 => "SceneAsset",
        1034 => "NativeFormatImporter",
        1035 => "MonoImporter",
        1038 => "LibraryAssetImporter",
        1040 => "ModelImporter",
        1041 => "FBXImporter",
        1042 => "TrueTypeFontImporter",
        1045 => "EditorBuildSettings",
        1048 => "InspectorExpandedState",
        1049 => "AnnotationManager",
        1050 => "PluginImporter",
        1051 => "EditorUserBuildSettings",
        1055 => "IHVImageFormatImporter",
        1101 => "AnimatorStateTransition",
        1102 => "AnimatorState",
        1105 => "HumanTemplate",
        1107 => "AnimatorStateMachine",
        1108 => "PreviewAnimationClip",
        1109 => "AnimatorTransition",
        1110 => "SpeedTreeImporter",
        1111 => "AnimatorTransitionBase",
        1112 => "SubstanceImporter",
        1113 => "LightmapParameters",
        1120 => "LightingDataAsset",
        1124 => "SketchUpImporter",
        1125 => "BuildReport",
        1126 => "PackedAssets",
        1127 => "VideoClipImporter",
        100_000 => "int",
        100_001 => "bool",
        100_002 => "float",
        100_003 => "MonoObject",
        100_004 => "Collision",
        100_005 => "Vector3f",
        100_006 => "RootMotionData",
        100_007 => "Collision2D",
        100_008 => "AudioMixerLiveUpdateFloat",
        100_009 => "AudioMixerLiveUpdateBool",
        100_010 => "Polygon2D",
        100_011 => "void",
        19_719_996 => "TilemapCollider2D",
        41_386_430 => "AssetImporterLog",
        73_398_921 => "VFXRenderer",
        156_049_354 => "Grid",
        171_741_748 => "ArticulationBody",
        181_963_792 => "Preset",
        277_625_683 => "EmptyObject",
        285_090_594 => "IConstraint",
        294_290_339 => "AssemblyDefinitionReferenceImporter",
        334_799_969 => "SiblingDerived",
        367_388_927 => "SubDerived",
        369_655_926 => "AssetImportInProgressProxy",
        382_020_655 => "PluginBuildInfo",
        426_301_858 => "EditorProjectAccess",
        468_431_735 => "PrefabImporter",
        483_693_784 => "TilemapRenderer",
        488_575_907 => "ScriptableCamera",
        612_988_286 => "SpriteAtlasAsset",
        638_013_454 => "SpriteAtlasDatabase",
        641_289_076 => "AudioBuildInfo",
        644_342_135 => "CachedSpriteAtlasRuntimeData",
        646_504_946 => "RendererFake",
        662_584_278 => "AssemblyDefinitionReferenceAsset",
        668_709_126 => "BuiltAssetBundleInfoSet",
        687_078_895 => "SpriteAtlas",
        747_330_370 => "RayTracingShaderImporter",
        825_902_497 => "RayTracingShader",
        850_595_691 => "LightingSettings",
        877_146_078 => "PlatformModuleSetup",
        890_905_787 => "VersionControlSettings",
        895_512_359 => "AimConstraint",
        937_362_698 => "VFXManager",
        994_735_392 => "VisualEffectSubgraph",
        994_735_403 => "VisualEffectSubgraphOperator",
        994_735_404 => "VisualEffectSubgraphBlock",
        1_001_480_554 => "Prefab",
        1_027_052_791 => "LocalizationImporter",
        1_091_556_383 => "Derived",
        1_114_811_875 => "ReferencesArtifactGenerator",
        1_152_215_463 => "AssemblyDefinitionAsset",
        1_154_873_562 => "SceneVisibilityState",
        1_183_024_399 => "LookAtConstraint",
        1_210_832_254 => "SpriteAtlasImporter",
        1_223_240_404 => "MultiArtifactTestImporter",
        1_268_269_756 => "GameObjectRecorder",
        1_325_145_578 => "LightingDataAssetParent",
        1_386_491_679 => "PresetManager",
        1_403_656_975 => "StreamingManager",
        1_480_428_607 => "LowerResBlitTexture",
        1_542_919_678 => "StreamingController",
        1_742_807_556 => "GridLayout",
        1_766_753_193 => "AssemblyDefinitionImporter",
        1_773_428_102 => "ParentConstraint",
        1_803_986_026 => "FakeComponent",
        1_818_360_608 => "PositionConstraint",
        1_818_360_609 => "RotationConstraint",
        1_818_360_610 => "ScaleConstraint",
        1_839_735_485 => "Tilemap",
        1_896_753_125 => "PackageManifest",
        1_896_753_126 => "PackageManifestImporter",
        1_953_259_897 => "TerrainLayer",
        1_971_053_207 => "SpriteShapeRenderer",
        1_977_754_360 => "NativeObjectType",
        1_995_898_324 => "SerializableManagedHost",
        2_058_629_509 => "VisualEffectAsset",
        2_058_629_510 => "VisualEffectImporter",
        2_058_629_511 => "VisualEffectResource",
        2_059_678_085 => "VisualEffectObject",
        2_083_052_967 => "VisualEffect",
        2_083_778_819 => "LocalizationAsset",
        2_089_858_483 => "ScriptedImporter",
        _ => return None,
    })
}
