// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage
// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings

use std::io::{Read, Seek};

use crate::{
    GlyphId, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription},
    tables::PlatformId,
};

use super::{MappingScope, narrow_language};

/// Bytes of the `is32` bitmap preceding the groups of a format 8 subtable.
const IS32_LENGTH: i64 = 8192;

/// The subtable formats sharing the sequential map group layout.
///
/// The format decides how a group's glyph ids are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segmented32BitFormat {
    /// Format 8, mixed 16-bit and 32-bit coverage; sequential glyph ids.
    Mixed32BitMapping,
    /// Format 12, segmented coverage; sequential glyph ids.
    Trimmed32BitTableMapping,
    /// Format 13; every code in a group maps to the same glyph.
    ManyToOneMapping,
}

impl Segmented32BitFormat {
    pub fn from_u16(format: u16) -> Option<Self> {
        match format {
            8 => Some(Self::Mixed32BitMapping),
            12 => Some(Self::Trimmed32BitTableMapping),
            13 => Some(Self::ManyToOneMapping),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::Mixed32BitMapping => 8,
            Self::Trimmed32BitTableMapping => 12,
            Self::ManyToOneMapping => 13,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Mixed32BitMapping => "mixed 16/32-bit coverage",
            Self::Trimmed32BitTableMapping => "segmented coverage",
            Self::ManyToOneMapping => "many-to-one range mappings",
        }
    }
}

/// A run of codes `start_char_code..=end_char_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

impl SequentialMapGroup {
    pub fn new(start_char_code: u32, end_char_code: u32, start_glyph_id: u32) -> Self {
        Self {
            start_char_code,
            end_char_code,
            start_glyph_id,
        }
    }

    fn contains(&self, code: u32) -> bool {
        self.start_char_code <= code && code <= self.end_char_code
    }
}

/// A format 8, 12 or 13 subtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmented32BitCharacterMapping {
    scope: MappingScope,
    format: Segmented32BitFormat,
    groups: Vec<SequentialMapGroup>,
}

impl Segmented32BitCharacterMapping {
    pub fn new(
        format: Segmented32BitFormat,
        groups: Vec<SequentialMapGroup>,
        scope: MappingScope,
    ) -> Self {
        Self {
            scope,
            format,
            groups,
        }
    }

    pub fn scope(&self) -> &MappingScope {
        &self.scope
    }

    pub fn format(&self) -> Segmented32BitFormat {
        self.format
    }

    pub fn groups(&self) -> &[SequentialMapGroup] {
        &self.groups
    }

    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId> {
        let group = self.groups.iter().find(|group| group.contains(codepoint))?;
        let glyph = match self.format {
            Segmented32BitFormat::ManyToOneMapping => group.start_glyph_id,
            Segmented32BitFormat::Mixed32BitMapping
            | Segmented32BitFormat::Trimmed32BitTableMapping => group
                .start_glyph_id
                .wrapping_add(codepoint - group.start_char_code),
        };
        GlyphId::mapped(glyph)
    }

    /// Reads the subtable following its format field.
    pub(crate) fn decode<B: Read + Seek>(
        reader: &mut FontReader<B>,
        format: Segmented32BitFormat,
        platform: PlatformId,
        encoding: u16,
    ) -> Result<Self, TypecaseError> {
        let _reserved = reader.read_u16()?;
        let _length = reader.read_u32()?;
        let language = narrow_language(reader.read_u32()?)?;
        if format == Segmented32BitFormat::Mixed32BitMapping {
            // Which 16-bit values start a 32-bit code; the groups alone
            // are enough to map code points.
            reader.skip(IS32_LENGTH)?;
        }

        let num_groups = reader.read_u32()?;
        let groups = (0..num_groups)
            .map(|_| {
                Ok(SequentialMapGroup::new(
                    reader.read_u32()?,
                    reader.read_u32()?,
                    reader.read_u32()?,
                ))
            })
            .collect::<Result<Vec<_>, TypecaseError>>()?;
        log::debug!(
            "format {} subtable: {} groups",
            format.to_u16(),
            groups.len()
        );

        Ok(Self::new(
            format,
            groups,
            MappingScope::new(platform, encoding, language),
        ))
    }
}

impl Dump for Segmented32BitCharacterMapping {
    fn dump(&self) -> DumpDescription {
        let info = self.scope.describe(
            self.format.to_u16(),
            self.format.name(),
            format!("{} groups", self.groups.len()),
        );
        let mut dump = DumpDescription::new(info).with_columns(&[
            "Start code",
            "End code",
            "Start glyph id",
        ]);
        for group in &self.groups {
            dump.push_row(vec![
                format!("{:#06X}", group.start_char_code),
                format!("{:#06X}", group.end_char_code),
                group.start_glyph_id.to_string(),
            ]);
        }
        dump
    }
}
