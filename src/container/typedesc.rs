//! Serialized type descriptors from the container's type table.
//!
//! Each directory entry references one of these descriptors by index (newer
//! formats) or by class identifier (older formats). Descriptors carry the
//! engine class identifier plus script identity hashes for script-backed
//! classes.

use crate::file::cursor::Cursor;
use crate::Result;
use strum::{FromRepr, IntoStaticStr};

/// Target platform recorded in the container header.
///
/// Raw values come from the engine's platform enumeration; several identifiers
/// were reused across engine versions, in which case the newer name wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, IntoStaticStr)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum RuntimePlatform {
    OsxEditor = 0,
    OsxPlayer = 1,
    WindowsPlayer = 2,
    OsxWebPlayer = 3,
    OsxDashboardPlayer = 4,
    WindowsWebPlayer = 5,
    WindowsEditor = 7,
    IPhonePlayer = 8,
    Ps3 = 9,
    Xbox360 = 10,
    Android = 11,
    NaCl = 12,
    LinuxPlayer = 13,
    FlashPlayer = 15,
    WebGlPlayer = 17,
    WsaPlayerX86 = 18,
    WsaPlayerX64 = 19,
    WsaPlayerArm = 20,
    Wp8Player = 21,
    BlackBerryPlayer = 22,
    TizenPlayer = 23,
    Psp2 = 24,
    Ps4 = 25,
    PsmPlayer = 26,
    XboxOne = 27,
    SamsungTvPlayer = 28,
}

/// One entry of the container's serialized type table.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Engine class identifier.
    pub class_id: i32,
    /// Whether the type was stripped during the build. Formats before 16 do
    /// not record this.
    pub is_stripped: bool,
    /// Index into the script table, or -1 when the type is not script-backed.
    /// Formats before 17 do not record this and report -1.
    pub script_type_index: i16,
    /// Identity hash of the backing script, present only for script-backed
    /// types.
    pub script_id: Option<[u8; 16]>,
    /// Layout hash of the serialized type.
    pub old_type_hash: Option<[u8; 16]>,
}

impl TypeDescriptor {
    /// Parses one descriptor from the directory stream.
    ///
    /// `is_ref_type` distinguishes entries of the secondary reference type
    /// list, which carry a script identity whenever their script index is
    /// non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the stream is truncated.
    pub fn parse(cursor: &mut Cursor<'_>, format: u32, is_ref_type: bool) -> Result<TypeDescriptor> {
        let class_id = cursor.read::<i32>()?;

        let is_stripped = if format >= 16 {
            cursor.read::<u8>()? != 0
        } else {
            false
        };

        let script_type_index = if format >= 17 { cursor.read::<i16>()? } else { -1 };

        let mut script_id = None;
        let mut old_type_hash = None;
        if format >= 13 {
            let script_backed = (is_ref_type && script_type_index >= 0)
                || (format < 16 && class_id < 0)
                || (format >= 16 && class_id == super::record::CLASS_SCRIPTED_BEHAVIOUR);
            if script_backed {
                script_id = Some(cursor.read_guid_bytes()?);
            }
            old_type_hash = Some(cursor.read_guid_bytes()?);
        }

        Ok(TypeDescriptor {
            class_id,
            is_stripped,
            script_type_index,
            script_id,
            old_type_hash,
        })
    }

    /// Whether this descriptor refers to a script-backed behaviour class.
    #[must_use]
    pub fn is_scripted(&self) -> bool {
        self.class_id == super::record::CLASS_SCRIPTED_BEHAVIOUR || self.class_id < 0
    }
}
