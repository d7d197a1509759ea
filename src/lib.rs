use buffer::ReaderError;
use tables::FormatError;
use thiserror::Error;

pub mod buffer;
pub mod dump;
pub mod glyph_id;
pub mod tables;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dump::{Dump, DumpDescription};
pub use glyph_id::GlyphId;
pub use tables::FontFile;
pub use tag::Tag;

#[derive(Debug, Error)]
pub enum TypecaseError {
    #[error(transparent)]
    FormatError(#[from] FormatError),

    #[error(transparent)]
    ReaderError(#[from] ReaderError),

    /// Ordinal access past the end of a collection.
    #[error("index {index} is out of range for a collection of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    /// Decoding a table failed; `source` holds the originating cause.
    #[error("failed to decode the '{tag}' table")]
    MalformedTable {
        tag: Tag,
        #[source]
        source: Box<TypecaseError>,
    },
}
