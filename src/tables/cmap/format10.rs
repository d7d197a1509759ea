// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-10-trimmed-array

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::{MappingScope, narrow_language, push_glyph_rows};

/// A format 10 subtable: the 32-bit counterpart of format 6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmed32BitTableCharacterMapping {
    scope: MappingScope,
    start_char_code: u32,
    glyph_ids: Vec<u32>,
}

impl Trimmed32BitTableCharacterMapping {
    pub fn new(start_char_code: u32, glyph_ids: Vec<u32>, scope: MappingScope) -> Self {
        Self {
            scope,
            start_char_code,
            glyph_ids,
        }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn start_char_code(&self) -> u32 {
        self.start_char_code
    }

    pub fn glyph_ids(&self) -> &[u32] {
        &self.glyph_ids
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let index = codepoint.checked_sub(self.start_char_code)?;
        let glyph = *self.glyph_ids.get(usize::try_from(index).ok()?)?;
        GlyphId::mapped(glyph)
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _reserved = reader.read_u16()?;
        let _length = reader.read_u32()?;
        let language = narrow_language(reader.read_u32()?)?;
        let start_char_code = reader.read_u32()?;
        let num_chars = reader.read_u32()?;
        let glyph_ids = reader
            .read_u16_array(num_chars as usize)?
            .into_iter()
            .map(u32::from)
            .collect();

        Ok(Self::new(
            start_char_code,
            glyph_ids,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for Trimmed32BitTableCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let detail = format!(
            "start code {:#06X}, {} entries",
            self.start_char_code,
            self.glyph_ids.len()
        );
        let mut dump = DumpDescription::new(self.scope.describe(10, "trimmed array", detail))
            .with_columns(&["Code", "Glyph id"]);
        push_glyph_rows(
            &mut dump,
            (self.start_char_code..).zip(self.glyph_ids.iter().copied()),
        );
        dump
    }
}
