use std::fmt::{Display, Formatter};

/// An index into the glyph set of a font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(u32);

impl GlyphId {
    /// The missing glyph, drawn when a code point has no mapping.
    pub const NOTDEF: GlyphId = GlyphId(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Returns `None` for `.notdef`, which every mapping format uses to
    /// mean that a code point is not covered.
    pub(crate) fn mapped(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

impl From<u16> for GlyphId {
    fn from(value: u16) -> Self {
        Self(value.into())
    }
}

impl Display for GlyphId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GID_{}", self.0)
    }
}
