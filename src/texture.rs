//! Decoding of serialized 2D texture records.
//!
//! Texture payloads carry image metadata followed by either inline pixel data
//! or a reference into an external streaming file. Icon extraction only needs
//! the metadata and the data location, so pixel data is captured as raw bytes
//! without decompression.

use crate::file::cursor::{BoolWidth, Cursor};
use crate::schema::enums::{TextureFormat, TEXTURE_FORMAT};
use crate::schema::{decode_object, Field, Object, Primitive, SchemaNode, Value};
use crate::Result;

/// Sampler settings of a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSettings {
    /// Filtering mode: point, bilinear or trilinear.
    pub filter_mode: i32,
    /// Anisotropic filtering level.
    pub anisotropy: i32,
    /// Mipmap level bias.
    pub mip_bias: f32,
    /// Wrap mode along U.
    pub wrap_u: i32,
    /// Wrap mode along V.
    pub wrap_v: i32,
    /// Wrap mode along W.
    pub wrap_w: i32,
}

/// Location of pixel data stored outside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Byte offset within the streaming file.
    pub offset: u32,
    /// Byte length of the pixel data.
    pub size: u32,
    /// Path of the streaming file.
    pub path: String,
}

/// Pixel data of a texture, inline or streamed.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureData {
    /// Pixel bytes embedded in the payload.
    Inline(Vec<u8>),
    /// Pixel bytes in an external streaming file.
    Streamed(StreamInfo),
}

/// A decoded 2D texture record.
#[derive(Debug, Clone)]
pub struct TextureRecord {
    /// Texture name.
    pub name: String,
    /// Fallback format forced by the importer.
    pub forced_fallback_format: i32,
    /// Whether the fallback may downscale.
    pub downscale_fallback: bool,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Total byte size of all mip levels.
    pub complete_image_size: i32,
    /// Raw pixel format discriminant.
    pub format_raw: u32,
    /// Number of mipmap levels.
    pub mip_count: i32,
    /// Whether the texture stays CPU readable.
    pub is_readable: bool,
    /// Number of images in the payload.
    pub image_count: i32,
    /// Texture dimensionality discriminant.
    pub dimension: i32,
    /// Sampler settings.
    pub settings: TextureSettings,
    /// Lightmap encoding discriminant.
    pub lightmap_format: i32,
    /// Color space discriminant.
    pub color_space: i32,
    /// Pixel data location.
    pub data: TextureData,
}

fn streaming_mipmaps(cursor: &mut Cursor<'_>, so_far: &Object) -> Result<Value> {
    let enabled = cursor.read_bool(BoolWidth::Four)?;
    if enabled {
        let name = so_far
            .get("name")
            .and_then(|value| match value {
                Value::Str(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or("<unnamed>");
        return Err(malformed_error!(
            "Texture '{}' uses streaming mipmaps, which have no payload here",
            name
        ));
    }
    Ok(Value::Bool(enabled))
}

static TEXTURE_SETTINGS_FIELDS: &[Field] = &[
    Field::new("filterMode", SchemaNode::Primitive(Primitive::I32)),
    Field::new("anisotropy", SchemaNode::Primitive(Primitive::I32)),
    Field::new("mipBias", SchemaNode::Primitive(Primitive::F32)),
    Field::new("wrapU", SchemaNode::Primitive(Primitive::I32)),
    Field::new("wrapV", SchemaNode::Primitive(Primitive::I32)),
    Field::new("wrapW", SchemaNode::Primitive(Primitive::I32)),
];

static TEXTURE_FIELDS: &[Field] = &[
    Field::new("name", SchemaNode::Primitive(Primitive::Str { align: true })),
    Field::new("forcedFallbackFormat", SchemaNode::Primitive(Primitive::I32)),
    Field::new(
        "downscaleFallback",
        SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four)),
    ),
    Field::new("_align1", SchemaNode::Align),
    Field::new("width", SchemaNode::Primitive(Primitive::I32)),
    Field::new("height", SchemaNode::Primitive(Primitive::I32)),
    Field::new("completeImageSize", SchemaNode::Primitive(Primitive::I32)),
    Field::new(
        "textureFormat",
        SchemaNode::Primitive(Primitive::Enum(&TEXTURE_FORMAT)),
    ),
    Field::new("mipCount", SchemaNode::Primitive(Primitive::I32)),
    Field::new(
        "isReadable",
        SchemaNode::Primitive(Primitive::Bool(BoolWidth::Four)),
    ),
    Field::new("streamingMipmaps", SchemaNode::Computed(streaming_mipmaps)),
    Field::new("_align2", SchemaNode::Align),
    Field::new("imageCount", SchemaNode::Primitive(Primitive::I32)),
    Field::new("textureDimension", SchemaNode::Primitive(Primitive::I32)),
    Field::new("textureSettings", SchemaNode::Object(TEXTURE_SETTINGS_FIELDS)),
    Field::new("lightmapFormat", SchemaNode::Primitive(Primitive::I32)),
    Field::new("colorSpace", SchemaNode::Primitive(Primitive::I32)),
    Field::new("imageDataSize", SchemaNode::Primitive(Primitive::I32)),
];

static STREAM_INFO_FIELDS: &[Field] = &[
    Field::new("offset", SchemaNode::Primitive(Primitive::U32)),
    Field::new("size", SchemaNode::Primitive(Primitive::U32)),
    Field::new("path", SchemaNode::Primitive(Primitive::Str { align: true })),
];

impl TextureRecord {
    /// Decodes a texture payload.
    ///
    /// A zero inline data size means the pixels live in an external
    /// streaming file, described by a trailing location record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for invalid metadata, including
    /// textures with streaming mipmaps enabled, and
    /// [`crate::Error::OutOfBounds`] for truncated payloads.
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<TextureRecord> {
        let mut object = decode_object(cursor, TEXTURE_FIELDS)?;

        let image_data_size = object.get_i32("imageDataSize")?;
        let data = if image_data_size == 0 {
            let mut stream = decode_object(cursor, STREAM_INFO_FIELDS)?;
            TextureData::Streamed(StreamInfo {
                offset: u32::try_from(stream.get_i64("offset")?)
                    .map_err(|_| malformed_error!("Stream offset out of range"))?,
                size: u32::try_from(stream.get_i64("size")?)
                    .map_err(|_| malformed_error!("Stream size out of range"))?,
                path: stream.take_str("path")?,
            })
        } else {
            let size = usize::try_from(image_data_size)
                .map_err(|_| malformed_error!("Negative inline data size {}", image_data_size))?;
            TextureData::Inline(cursor.read_bytes(size)?.to_vec())
        };

        let settings = match object.get("textureSettings") {
            Some(Value::Object(settings)) => TextureSettings {
                filter_mode: settings.get_i32("filterMode")?,
                anisotropy: settings.get_i32("anisotropy")?,
                mip_bias: settings.get_f32("mipBias")?,
                wrap_u: settings.get_i32("wrapU")?,
                wrap_v: settings.get_i32("wrapV")?,
                wrap_w: settings.get_i32("wrapW")?,
            },
            _ => return Err(malformed_error!("Texture without sampler settings")),
        };

        let format_raw = u32::try_from(object.get_i64("textureFormat")?)
            .map_err(|_| malformed_error!("Texture format discriminant out of range"))?;

        Ok(TextureRecord {
            name: object.take_str("name")?,
            forced_fallback_format: object.get_i32("forcedFallbackFormat")?,
            downscale_fallback: object.get_bool("downscaleFallback")?,
            width: object.get_i32("width")?,
            height: object.get_i32("height")?,
            complete_image_size: object.get_i32("completeImageSize")?,
            format_raw,
            mip_count: object.get_i32("mipCount")?,
            is_readable: object.get_bool("isReadable")?,
            image_count: object.get_i32("imageCount")?,
            dimension: object.get_i32("textureDimension")?,
            settings,
            lightmap_format: object.get_i32("lightmapFormat")?,
            color_space: object.get_i32("colorSpace")?,
            data,
        })
    }

    /// Pixel format, when the raw discriminant is a known identifier.
    #[must_use]
    pub fn format(&self) -> Option<TextureFormat> {
        i32::try_from(self.format_raw)
            .ok()
            .and_then(TextureFormat::from_repr)
    }
}
