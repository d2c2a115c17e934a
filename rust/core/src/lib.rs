// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # meshvol Core
//!
//! STL ingestion for mesh volume estimation: format sniffing, decoding of
//! both ASCII and binary STL into a flat stream of raw vertices, and the
//! matching encoders.
//!
//! ## Overview
//!
//! - **Format Sniffer**: text-first detection (`solid` first line), falling
//!   back to the binary preamble and its declared triangle count
//! - **Decoders**: single forward pass, three [`RawVertex`] per triangle in
//!   file order; facet normals are discarded
//! - **Size check**: a binary triangle count must agree with the file
//!   length before anything is allocated from it
//! - **Encoders**: binary and ASCII writers with recomputed facet normals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use meshvol_core::{classify, read_stl, StlKind};
//!
//! match classify("part.stl")? {
//!     StlKind::Ascii => println!("ASCII STL"),
//!     StlKind::Binary { triangle_count } => println!("{} triangles", triangle_count),
//! }
//!
//! let vertices = read_stl("part.stl")?;
//! assert_eq!(vertices.len() % 3, 0);
//! ```
//!
//! ## Errors
//!
//! Every failure is a typed [`Error`]; an unreadable file never decodes to
//! an empty vertex list. [`Error::kind`] groups them into format, parse and
//! I/O failures.

pub mod ascii;
pub mod binary;
pub mod error;
pub mod load;
pub mod sniff;
pub mod vertex;
pub mod writer;

pub use ascii::decode_ascii;
pub use binary::decode_binary;
pub use error::{Error, ErrorKind, Result};
pub use load::{decode, parse_stl, read_stl, read_stl_classified};
pub use sniff::{
    binary_len, check_binary_size, classify, classify_reader, StlKind, HEADER_SIZE,
    PREAMBLE_SIZE, TRIANGLE_RECORD_SIZE,
};
pub use vertex::RawVertex;
pub use writer::{write_ascii, write_binary, write_stl, Facet, StlFormat};
