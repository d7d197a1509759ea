// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::{MappingScope, push_glyph_rows};

/// A format 0 subtable: one glyph byte for each of the 256 single byte codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainByteCharacterMapping {
    scope: MappingScope,
    glyph_ids: [u8; 256],
}

impl PlainByteCharacterMapping {
    pub fn new(glyph_ids: [u8; 256], scope: MappingScope) -> Self {
        Self { scope, glyph_ids }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn glyph_ids(&self) -> &[u8; 256] {
        &self.glyph_ids
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let index = usize::try_from(codepoint).ok()?;
        let glyph = *self.glyph_ids.get(index)?;
        GlyphId::mapped(glyph.into())
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _length = reader.read_u16()?;
        let language = reader.read_u16()?;
        let mut glyph_ids = [0u8; 256];
        reader.read_exact(&mut glyph_ids)?;

        Ok(Self::new(
            glyph_ids,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for PlainByteCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let mapped = self.glyph_ids.iter().filter(|&&glyph| glyph != 0).count();
        let mut dump =
            DumpDescription::new(self.scope.describe(0, "byte encoding", format!("{mapped} mapped codes")))
                .with_columns(&["Code", "Glyph id"]);
        push_glyph_rows(
            &mut dump,
            (0u32..).zip(self.glyph_ids.iter().map(|&glyph| u32::from(glyph))),
        );
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    fn scope() -> MappingScope {
        MappingScope::new(PlatformId::Macintosh, 0, 0)
    }

    #[test]
    fn maps_not_all_256_codepoints() {
        let mut glyph_ids = [0u8; 256];
        glyph_ids[0x40] = 100;
        glyph_ids[0xFF] = 7;
        let mapping = PlainByteCharacterMapping::new(glyph_ids, scope());

        assert_eq!(mapping.map_codepoint(0), None);
        assert_eq!(mapping.map_codepoint(0x40), Some(GlyphId::new(100)));
        assert_eq!(mapping.map_codepoint(0xFF), Some(GlyphId::new(7)));
        assert_eq!(mapping.map_codepoint(0x100), None);
        assert_eq!(mapping.map_codepoint(u32::MAX), None);
    }

    #[test]
    fn decodes_language_and_array() {
        let mut glyphs = vec![0u8; 256];
        glyphs[b'A' as usize] = 36;
        let buf = BeBuffer::new().extend([262u16, 17]).extend(glyphs);

        let mapping =
            PlainByteCharacterMapping::decode(&mut FontReader::from_slice(&buf), PlatformId::Macintosh, 0)
                .unwrap();
        assert_eq!(mapping.scope().language, 17);
        assert_eq!(mapping.map_codepoint(u32::from('A')), Some(GlyphId::new(36)));

        let dump = mapping.dump();
        assert_eq!(dump.rows(), &[vec!["0x0041".to_string(), "36".to_string()]]);
    }

    #[test]
    fn short_array_fails() {
        let buf = BeBuffer::new().extend([262u16, 0]).extend([0u8; 100]);
        assert!(
            PlainByteCharacterMapping::decode(&mut FontReader::from_slice(&buf), PlatformId::Macintosh, 0)
                .is_err()
        );
    }
}
