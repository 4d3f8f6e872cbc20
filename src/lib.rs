// Copyright 2025 dysonscope contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dysonscope
//!
//! A binary deserialization core for Unity-style asset containers and the
//! Dyson Sphere Program data tables. Built in pure Rust, `dysonscope` parses
//! the serialized-file directory of a `resources.assets` container, decodes
//! the embedded `ProtoSet` tables into typed records, and recovers the
//! per-building descriptor data the container stores as opaque behaviour
//! payloads.
//!
//! ## Features
//!
//! - **Efficient memory access** - Memory-mapped file access with
//!   reference-based cursors over the raw buffer
//! - **Directory parsing** - Type table, asset table, preloads, dependencies
//!   and secondary types across serialized-file formats 9 through 22
//! - **Typed data tables** - `ItemProtoSet`, `RecipeProtoSet`,
//!   `TechProtoSet` and `ModelProtoSet` decoded into plain structs
//! - **Descriptor calibration** - Hypothesis-and-validate recovery of the
//!   script-to-layout mapping the container never declares
//! - **Texture records** - Inline and streamed `Texture2D` payloads with the
//!   full pixel format enumeration
//! - **Best-effort diagnostics** - Name recovery and calibration report
//!   through a diagnostics collection instead of failing the parse
//!
//! ## Quick Start
//!
//! Add `dysonscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dysonscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust,no_run
//! use dysonscope::prelude::*;
//!
//! let container = ContainerFile::open("resources.assets")?;
//! let items = ProtoSet::<ItemProto>::load(&container)?;
//! println!("Found {} items", items.entries.len());
//! # Ok::<(), dysonscope::Error>(())
//! ```
//!
//! ### Basic Usage
//!
//! ```rust,no_run
//! use dysonscope::container::ContainerFile;
//! use std::path::Path;
//!
//! let container = ContainerFile::open(Path::new("resources.assets"))?;
//!
//! println!("Serialized format {}", container.format());
//! println!("Engine version {}", container.engine_version());
//! for record in container.records() {
//!     if let Some(name) = &record.name {
//!         println!("{} ({} bytes)", name, record.size);
//!     }
//! }
//! # Ok::<(), dysonscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `dysonscope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`container`] - Serialized-file directory parsing and object resolution
//! - [`schema`] - The static layout tree and the generic decoder
//! - [`proto`] - Typed decoding of the game's data tables
//! - [`resolve`] - Descriptor calibration and attachment
//! - [`texture`] - Texture record decoding
//! - [`extract`] - Filtering to the gameplay-reachable data set
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with detailed error
//! information:
//!
//! ```rust,no_run
//! use dysonscope::{container::ContainerFile, Error};
//!
//! match ContainerFile::open(std::path::Path::new("resources.assets")) {
//!     Ok(container) => println!("Parsed format {}", container.format()),
//!     Err(Error::NotSupported) => println!("Container variant not supported"),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed file: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! Structural errors fail the parse; best-effort passes such as name
//! recovery and descriptor calibration instead leave diagnostics on the
//! container, available through
//! [`container::ContainerFile::diagnostics`].
//!
//! ## Testing
//!
//! The test suite builds containers byte by byte, covering both the current
//! and the legacy header layouts:
//!
//! ```bash
//! cargo test
//! cargo test --release  # For performance tests
//! ```

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used
/// types from across the library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust,no_run
/// use dysonscope::prelude::*;
///
/// let container = ContainerFile::open("resources.assets")?;
/// let items = ProtoSet::<ItemProto>::load(&container)?;
/// # Ok::<(), dysonscope::Error>(())
/// ```
pub mod prelude;

/// Backing storage and cursor primitives.
///
/// Provides the [`file::File`] abstraction over a memory-mapped file or an
/// owned buffer, and the endian-aware [`file::cursor::Cursor`] every decoder
/// in the crate reads through.
pub mod file;

/// Parse-time diagnostics.
///
/// Best-effort passes report through [`diagnostics::Diagnostics`] instead of
/// failing the parse; see [`diagnostics::DiagnosticCategory`] for the
/// reporting passes.
pub mod diagnostics;

/// Serialized-file container parsing.
///
/// The [`container::ContainerFile`] is the main entry point. Construction
/// parses the header, type table, asset directory, preloads, dependencies
/// and secondary types, then runs asset name recovery and texture decoding.
/// Parsed containers expose lookup by name or path id plus shallow object
/// resolution over the serialized object graph.
pub mod container;

/// Static layouts and the generic decoder.
///
/// Layouts are trees of [`schema::SchemaNode`] declared as `static` data;
/// [`schema::decode_object`] interprets a layout against a cursor and
/// produces a dynamic [`schema::Object`].
pub mod schema;

/// Typed decoding of the game's data tables.
///
/// [`proto::ProtoSet`] decodes a whole table; [`proto::ItemProto`],
/// [`proto::RecipeProto`], [`proto::TechProto`] and [`proto::ModelProto`]
/// are the typed records.
pub mod proto;

/// Descriptor calibration and attachment.
///
/// The [`resolve::Resolver`] recovers the mapping from behaviour script
/// references to descriptor layouts and attaches decoded descriptors to
/// item records. See [`resolve::registry`] for the calibratable layouts.
pub mod resolve;

/// Texture record decoding.
///
/// Decodes `Texture2D` payloads into [`texture::TextureRecord`], with
/// inline and streamed image data kept mutually exclusive.
pub mod texture;

/// Filtering to the gameplay-reachable data set.
///
/// [`extract::GameData`] keeps published technologies, unlockable recipes
/// and the items those touch.
pub mod extract;

/// `dysonscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type
/// is always [`Error`]. This is used consistently throughout the crate for
/// all fallible operations.
///
/// # Examples
///
/// ```rust,no_run
/// use dysonscope::{container::ContainerFile, Result};
///
/// fn load_container(path: &str) -> Result<ContainerFile> {
///     ContainerFile::open(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dysonscope` Error type
///
/// The main error type for all operations in this crate. Provides detailed
/// error information for container parsing, table decoding and descriptor
/// resolution.
///
/// # Examples
///
/// ```rust,no_run
/// use dysonscope::{container::ContainerFile, Error};
///
/// match ContainerFile::open(std::path::Path::new("resources.assets")) {
///     Ok(container) => println!("Loaded successfully"),
///     Err(Error::NotSupported) => println!("Container variant not supported"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;
