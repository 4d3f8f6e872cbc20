//! # dysonscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits from the dysonscope library. Import this module to get quick
//! access to the essential types for container and data table analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dysonscope operations
pub use crate::Error;

/// The result type used throughout dysonscope
pub use crate::Result;

/// Parse-time diagnostics attached to a container
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Main entry point for container analysis
pub use crate::container::ContainerFile;

/// Low-level storage and cursor utilities
pub use crate::file::cursor::{BoolWidth, Cursor, Endian};
pub use crate::file::File;

// ================================================================================================
// Container Directory
// ================================================================================================

/// Directory entries and object resolution
pub use crate::container::{
    AssetRecord, BehaviourInfo, GameObjectInfo, ObjectMemo, PPtr, ResolvedObject, RuntimePlatform,
    TypeDescriptor,
};

// ================================================================================================
// Data Tables
// ================================================================================================

/// Typed table records and the table decoder
pub use crate::proto::{ItemProto, ModelProto, Proto, ProtoSet, RecipeProto, TechProto};

// ================================================================================================
// Layouts and Decoded Values
// ================================================================================================

/// The layout tree and the dynamic values it decodes to
pub use crate::schema::{decode_object, Field, Object, Primitive, SchemaNode, Value};

/// Closed enumerations of the game data
pub use crate::schema::enums::{
    AddonType, AmmoType, ItemType, MinerType, ObjectType, RecipeType, RuinType, TextureFormat,
};

// ================================================================================================
// Descriptor Resolution
// ================================================================================================

/// Calibration of opaque behaviour payloads
pub use crate::resolve::registry::{DescriptorSpec, SizeHint};
pub use crate::resolve::Resolver;

// ================================================================================================
// Textures and Extraction
// ================================================================================================

/// Texture records with inline or streamed image data
pub use crate::texture::{StreamInfo, TextureData, TextureRecord, TextureSettings};

/// The gameplay-reachable data set
pub use crate::extract::{GameData, STARTING_RECIPES};
