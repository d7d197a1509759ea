use std::fmt::{Debug, Display, Formatter};

use crate::tables::FormatError;

/// A four byte table identifier such as `cmap` or `OS/2`.
///
/// The default tag is unset and has no value. Tags read from a font are
/// not validated beyond their length; invalid tags exist in real fonts and
/// need to be representable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Option<[u8; 4]>);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(Some(*src))
    }

    /// Construct a `Tag` from a byte buffer that must hold exactly 4 bytes.
    pub fn from_bytes(src: &[u8]) -> Result<Tag, FormatError> {
        let bytes: [u8; 4] = src
            .try_into()
            .map_err(|_| FormatError::InvalidTagLength(src.len()))?;
        Ok(Tag(Some(bytes)))
    }

    /// The four characters of the tag, or `None` for an unset tag.
    ///
    /// Each byte is read as one ASCII character.
    pub fn value(&self) -> Option<String> {
        self.0.map(|bytes| bytes.iter().copied().map(char::from).collect())
    }

    /// The raw bytes of the tag, or `None` for an unset tag.
    pub fn to_bytes(self) -> Option<[u8; 4]> {
        self.0
    }
}

impl TryFrom<&[u8]> for Tag {
    type Error = FormatError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Tag::from_bytes(value)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(value) => f.write_str(&value),
            None => Ok(()),
        }
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(value) => write!(f, "Tag({value:?})"),
            None => f.write_str("Tag(unset)"),
        }
    }
}
