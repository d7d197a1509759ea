//! The [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table

use crate::{
    Tag, TypecaseError,
    buffer::FontReader,
    dump::{Dump, DumpDescription, FIELD_COLUMNS},
    tables::{FormatError, Table},
};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// Represents the flags field of the 'head' table.
/// Each field corresponds to a specific bit in the 16-bit flags value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadFlags {
    /// Bit 0: Baseline for font at y=0.
    pub y_value_zero_is_baseline: bool,
    /// Bit 1: Left sidebearing point at x=0.
    pub x_pos_leftmost_black_bit_lsb: bool,
    /// Bit 2: Instructions may depend on point size.
    pub instructions_depend_on_point_size: bool,
    /// Bit 3: Force ppem to integer values for all internal scaler math.
    pub use_integer_scaling: bool,
    /// Bit 4: Instructions may alter advance width.
    pub instructions_alter_advance_width: bool,
    /// Bit 11: Font data is lossless after a transform such as WOFF2.
    pub lossless: bool,
    /// Bit 12: Font converted, producing compatible metrics.
    pub converted: bool,
    /// Bit 13: Font optimized for ClearType.
    pub cleartype_optimized: bool,
    /// Bit 14: Last resort font.
    pub last_resort: bool,
    bits: u16,
}

impl HeadFlags {
    pub fn from_bits(bits: u16) -> Self {
        let bit = |n: u16| bits & (1 << n) != 0;
        HeadFlags {
            y_value_zero_is_baseline: bit(0),
            x_pos_leftmost_black_bit_lsb: bit(1),
            instructions_depend_on_point_size: bit(2),
            use_integer_scaling: bit(3),
            instructions_alter_advance_width: bit(4),
            lossless: bit(11),
            converted: bit(12),
            cleartype_optimized: bit(13),
            last_resort: bit(14),
            bits,
        }
    }

    /// The raw 16-bit value, including bits with no field above.
    pub fn bits(&self) -> u16 {
        self.bits
    }
}

/// Represents the macStyle field of the 'head' table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacStyle(u16);

impl MacStyle {
    pub fn bold(self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn italic(self) -> bool {
        self.0 & 0x02 != 0
    }

    pub fn underline(self) -> bool {
        self.0 & 0x04 != 0
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

/// A representation of the [head table](https://learn.microsoft.com/en-us/typography/opentype/spec/head)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Head {
    /// Major and minor version, 1.0 for every known font
    version: (u16, u16),

    /// Font revision set by the font author/manufacturer, 16.16 fixed point
    font_revision: u32,

    /// Checksum adjustment for the whole font
    checksum_adjustment: u32,

    /// Magic number, always 0x5F0F3CF5
    magic_number: u32,

    flags: HeadFlags,

    /// Units per em (ranges from 16 to 16384)
    units_per_em: u16,

    /// Seconds since 12:00 midnight, January 1, 1904 UTC
    created: i64,
    modified: i64,

    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,

    mac_style: MacStyle,

    /// Smallest readable size in pixels
    lowest_rec_ppem: u16,

    /// Deprecated, set to 2
    font_direction_hint: i16,

    /// 0 for short offsets and 1 for long
    index_to_loc_format: i16,

    /// 0 for the current format
    glyph_data_format: i16,
}

impl Table for Head {
    const TAG: Tag = TAG;
}

impl Head {
    pub const LENGTH: usize = 54;
    pub const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

    /// Decodes the table from its byte range, which holds at least 54 bytes.
    pub fn decode(data: &[u8]) -> Result<Self, TypecaseError> {
        if data.len() < Self::LENGTH {
            return Err(FormatError::InvalidBufferLength(Self::LENGTH, data.len()).into());
        }
        let mut reader = FontReader::from_slice(data);

        let head = Self {
            version: (reader.read_u16()?, reader.read_u16()?),
            font_revision: reader.read_u32()?,
            checksum_adjustment: reader.read_u32()?,
            magic_number: reader.read_u32()?,
            flags: HeadFlags::from_bits(reader.read_u16()?),
            units_per_em: reader.read_u16()?,
            created: reader.read_i64()?,
            modified: reader.read_i64()?,
            x_min: reader.read_i16()?,
            y_min: reader.read_i16()?,
            x_max: reader.read_i16()?,
            y_max: reader.read_i16()?,
            mac_style: MacStyle(reader.read_u16()?),
            lowest_rec_ppem: reader.read_u16()?,
            font_direction_hint: reader.read_i16()?,
            index_to_loc_format: reader.read_i16()?,
            glyph_data_format: reader.read_i16()?,
        };
        if head.magic_number != Self::MAGIC_NUMBER {
            log::warn!("unexpected head magic number {:#010X}", head.magic_number);
        }
        Ok(head)
    }

    pub fn version(&self) -> (u16, u16) {
        self.version
    }

    /// The font revision as a number, e.g. `1.5`.
    pub fn font_revision(&self) -> f64 {
        f64::from(self.font_revision as i32) / 65536.0
    }

    pub fn checksum_adjustment(&self) -> u32 {
        self.checksum_adjustment
    }

    pub fn magic_number(&self) -> u32 {
        self.magic_number
    }

    pub fn flags(&self) -> HeadFlags {
        self.flags
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn modified(&self) -> i64 {
        self.modified
    }

    /// The glyph bounding box as `(x_min, y_min, x_max, y_max)`.
    pub fn bounds(&self) -> (i16, i16, i16, i16) {
        (self.x_min, self.y_min, self.x_max, self.y_max)
    }

    pub fn mac_style(&self) -> MacStyle {
        self.mac_style
    }

    pub fn lowest_rec_ppem(&self) -> u16 {
        self.lowest_rec_ppem
    }

    pub fn font_direction_hint(&self) -> i16 {
        self.font_direction_hint
    }

    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }

    pub fn glyph_data_format(&self) -> i16 {
        self.glyph_data_format
    }
}

impl Dump for Head {
    fn dump(&self) -> DumpDescription {
        let mut dump = DumpDescription::new(format!("head: version {}.{}", self.version.0, self.version.1))
            .with_columns(&FIELD_COLUMNS);
        dump.push_field("fontRevision", self.font_revision());
        dump.push_field("checksumAdjustment", format!("{:#010X}", self.checksum_adjustment));
        dump.push_field("magicNumber", format!("{:#010X}", self.magic_number));
        dump.push_field("flags", format!("{:#06X}", self.flags.bits()));
        dump.push_field("unitsPerEm", self.units_per_em);
        dump.push_field("created", self.created);
        dump.push_field("modified", self.modified);
        dump.push_field("xMin", self.x_min);
        dump.push_field("yMin", self.y_min);
        dump.push_field("xMax", self.x_max);
        dump.push_field("yMax", self.y_max);
        dump.push_field("macStyle", format!("{:#06X}", self.mac_style.bits()));
        dump.push_field("lowestRecPPEM", self.lowest_rec_ppem);
        dump.push_field("fontDirectionHint", self.font_direction_hint);
        dump.push_field("indexToLocFormat", self.index_to_loc_format);
        dump.push_field("glyphDataFormat", self.glyph_data_format);
        dump
    }
}
