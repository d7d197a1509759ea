//! The [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2) table
//!
//! Each version appends fields to the previous one. Fields a version does not
//! carry are `None`, never zero.
//!
//! Version 0 comes in two layouts that share the version number: Apple's
//! original 68 byte record, and Microsoft's, which adds the typographic and
//! Windows metrics and, in most fonts, the code page ranges. The layout is
//! chosen when the table is built and kept in [`Os2Version`].

use std::io::{Read, Seek};

use crate::{
    Tag, TypecaseError,
    buffer::{FontReader, ReaderError},
    dump::{Dump, DumpDescription, FIELD_COLUMNS},
    tables::{FormatError, Table},
};

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// Length of a version 0 table in Apple's layout.
pub const APPLE_VERSION_0_LENGTH: usize = 68;
/// Length of a version 0 table in Microsoft's layout.
pub const MICROSOFT_VERSION_0_LENGTH: usize = 78;
/// Length of a Microsoft version 0 table that also holds the code page ranges.
pub const CODE_PAGE_VERSION_0_LENGTH: usize = 86;

/// The two layouts of a version 0 table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version0Layout {
    Apple,
    Microsoft,
}

impl Version0Layout {
    /// Guesses the layout from the table length.
    ///
    /// Anything shorter than the Microsoft layout is read as Apple's.
    pub fn detect(table_length: usize) -> Self {
        if table_length >= MICROSOFT_VERSION_0_LENGTH {
            if table_length < CODE_PAGE_VERSION_0_LENGTH {
                log::debug!("OS/2 version 0 table of {table_length} bytes has no code page ranges");
            }
            Self::Microsoft
        } else {
            if table_length > APPLE_VERSION_0_LENGTH {
                log::warn!(
                    "OS/2 version 0 table of {table_length} bytes, ignoring bytes past {APPLE_VERSION_0_LENGTH}"
                );
            }
            Self::Apple
        }
    }
}

/// The version of a table including the version 0 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os2Version {
    V0(Version0Layout),
    V1,
    V2,
    V3,
    V4,
    V5,
}

impl Os2Version {
    /// The version number stored in the table.
    pub fn number(self) -> u16 {
        match self {
            Self::V0(_) => 0,
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
        }
    }

    fn has_metrics(self) -> bool {
        self != Self::V0(Version0Layout::Apple)
    }
}

/// The fields every version carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Os2Fields {
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose: [u8; 10],
    /// `ulUnicodeRange1` through `ulUnicodeRange4`.
    pub ul_unicode_range: [u32; 4],
    pub ach_vend_id: Tag,
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
}

/// Vertical metrics, from Microsoft's version 0 layout onwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalMetrics {
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,
}

/// Fields added by version 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedMetrics {
    pub sx_height: i16,
    pub s_cap_height: i16,
    pub us_default_char: u16,
    pub us_break_char: u16,
    pub us_max_context: u16,
}

/// Fields added by version 5, in TWIPs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpticalSize {
    pub us_lower_optical_point_size: u16,
    pub us_upper_optical_point_size: u16,
}

/// The decoded OS/2 table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Os2 {
    version: Os2Version,
    fields: Os2Fields,
    metrics: Option<VerticalMetrics>,
    code_page_range: Option<[u32; 2]>,
    extended: Option<ExtendedMetrics>,
    optical_size: Option<OpticalSize>,
}

impl Table for Os2 {
    const TAG: Tag = TAG;
}

impl Os2 {
    pub fn version0_apple(fields: Os2Fields) -> Self {
        Self {
            version: Os2Version::V0(Version0Layout::Apple),
            fields,
            metrics: None,
            code_page_range: None,
            extended: None,
            optical_size: None,
        }
    }

    /// Builds a version 0 table in Microsoft's layout. Short tables end
    /// after the metrics and carry no code page ranges.
    pub fn version0_microsoft(
        fields: Os2Fields,
        metrics: VerticalMetrics,
        code_page_range: Option<[u32; 2]>,
    ) -> Self {
        Self {
            version: Os2Version::V0(Version0Layout::Microsoft),
            metrics: Some(metrics),
            code_page_range,
            ..Self::version0_apple(fields)
        }
    }

    pub fn version1(fields: Os2Fields, metrics: VerticalMetrics, code_page_range: [u32; 2]) -> Self {
        Self {
            version: Os2Version::V1,
            ..Self::version0_microsoft(fields, metrics, Some(code_page_range))
        }
    }

    /// Builds a version 2, 3 or 4 table, which share one layout.
    pub fn version2_to_4(
        version: u16,
        fields: Os2Fields,
        metrics: VerticalMetrics,
        code_page_range: [u32; 2],
        extended: ExtendedMetrics,
    ) -> Result<Self, FormatError> {
        let version = match version {
            2 => Os2Version::V2,
            3 => Os2Version::V3,
            4 => Os2Version::V4,
            other => {
                return Err(FormatError::UnsupportedVersion {
                    tag: TAG,
                    version: other.into(),
                });
            }
        };
        Ok(Self {
            version,
            extended: Some(extended),
            ..Self::version1(fields, metrics, code_page_range)
        })
    }

    pub fn version5(
        fields: Os2Fields,
        metrics: VerticalMetrics,
        code_page_range: [u32; 2],
        extended: ExtendedMetrics,
        optical_size: OpticalSize,
    ) -> Self {
        Self {
            version: Os2Version::V5,
            fields,
            metrics: Some(metrics),
            code_page_range: Some(code_page_range),
            extended: Some(extended),
            optical_size: Some(optical_size),
        }
    }

    /// Decodes the table, telling the version 0 layouts apart by length.
    pub fn decode(data: &[u8]) -> Result<Self, TypecaseError> {
        Self::decode_with_layout(data, Version0Layout::detect(data.len()))
    }

    /// Decodes the table, reading a version 0 table in the given layout.
    pub fn decode_with_layout(data: &[u8], layout: Version0Layout) -> Result<Self, TypecaseError> {
        let mut reader = FontReader::from_slice(data);
        let version = reader.read_u16()?;
        let fields = read_fields(&mut reader)?;

        let os2 = match (version, layout) {
            (0, Version0Layout::Apple) => Self::version0_apple(fields),
            (0, Version0Layout::Microsoft) => {
                let metrics = read_metrics(&mut reader)?;
                let code_pages = if data.len() >= CODE_PAGE_VERSION_0_LENGTH {
                    Some(read_code_pages(&mut reader)?)
                } else {
                    None
                };
                Self::version0_microsoft(fields, metrics, code_pages)
            }
            (1, _) => {
                let metrics = read_metrics(&mut reader)?;
                Self::version1(fields, metrics, read_code_pages(&mut reader)?)
            }
            (2..=4, _) => {
                let metrics = read_metrics(&mut reader)?;
                let code_pages = read_code_pages(&mut reader)?;
                let extended = read_extended(&mut reader)?;
                Self::version2_to_4(version, fields, metrics, code_pages, extended)?
            }
            (5, _) => {
                let metrics = read_metrics(&mut reader)?;
                let code_pages = read_code_pages(&mut reader)?;
                let extended = read_extended(&mut reader)?;
                let optical_size = OpticalSize {
                    us_lower_optical_point_size: reader.read_u16()?,
                    us_upper_optical_point_size: reader.read_u16()?,
                };
                Self::version5(fields, metrics, code_pages, extended, optical_size)
            }
            (other, _) => {
                return Err(FormatError::UnsupportedVersion {
                    tag: TAG,
                    version: other.into(),
                }
                .into());
            }
        };
        log::debug!("decoded OS/2 {:?}", os2.version);
        Ok(os2)
    }

    /// The version including the version 0 layout.
    pub fn effective_version(&self) -> Os2Version {
        self.version
    }

    /// The version number stored in the table.
    pub fn version(&self) -> u16 {
        self.version.number()
    }

    pub fn fields(&self) -> &Os2Fields {
        &self.fields
    }

    pub fn s_typo_ascender(&self) -> Option<i16> {
        self.metrics.map(|m| m.s_typo_ascender)
    }

    pub fn s_typo_descender(&self) -> Option<i16> {
        self.metrics.map(|m| m.s_typo_descender)
    }

    pub fn s_typo_line_gap(&self) -> Option<i16> {
        self.metrics.map(|m| m.s_typo_line_gap)
    }

    pub fn us_win_ascent(&self) -> Option<u16> {
        self.metrics.map(|m| m.us_win_ascent)
    }

    pub fn us_win_descent(&self) -> Option<u16> {
        self.metrics.map(|m| m.us_win_descent)
    }

    /// `ulCodePageRange1` and `ulCodePageRange2`.
    pub fn ul_code_page_range(&self) -> Option<[u32; 2]> {
        self.code_page_range
    }

    pub fn sx_height(&self) -> Option<i16> {
        self.extended.map(|e| e.sx_height)
    }

    pub fn s_cap_height(&self) -> Option<i16> {
        self.extended.map(|e| e.s_cap_height)
    }

    pub fn us_default_char(&self) -> Option<u16> {
        self.extended.map(|e| e.us_default_char)
    }

    pub fn us_break_char(&self) -> Option<u16> {
        self.extended.map(|e| e.us_break_char)
    }

    pub fn us_max_context(&self) -> Option<u16> {
        self.extended.map(|e| e.us_max_context)
    }

    pub fn us_lower_optical_point_size(&self) -> Option<u16> {
        self.optical_size.map(|o| o.us_lower_optical_point_size)
    }

    pub fn us_upper_optical_point_size(&self) -> Option<u16> {
        self.optical_size.map(|o| o.us_upper_optical_point_size)
    }
}

fn read_fields<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<Os2Fields, ReaderError> {
    let x_avg_char_width = reader.read_i16()?;
    let us_weight_class = reader.read_u16()?;
    let us_width_class = reader.read_u16()?;
    let fs_type = reader.read_u16()?;
    let subscript = reader.read_i16_array(4)?;
    let superscript = reader.read_i16_array(4)?;
    let y_strikeout_size = reader.read_i16()?;
    let y_strikeout_position = reader.read_i16()?;
    let s_family_class = reader.read_i16()?;
    let mut panose = [0u8; 10];
    reader.read_exact(&mut panose)?;
    let ul_unicode_range = [
        reader.read_u32()?,
        reader.read_u32()?,
        reader.read_u32()?,
        reader.read_u32()?,
    ];

    Ok(Os2Fields {
        x_avg_char_width,
        us_weight_class,
        us_width_class,
        fs_type,
        y_subscript_x_size: subscript[0],
        y_subscript_y_size: subscript[1],
        y_subscript_x_offset: subscript[2],
        y_subscript_y_offset: subscript[3],
        y_superscript_x_size: superscript[0],
        y_superscript_y_size: superscript[1],
        y_superscript_x_offset: superscript[2],
        y_superscript_y_offset: superscript[3],
        y_strikeout_size,
        y_strikeout_position,
        s_family_class,
        panose,
        ul_unicode_range,
        ach_vend_id: reader.read_tag()?,
        fs_selection: reader.read_u16()?,
        us_first_char_index: reader.read_u16()?,
        us_last_char_index: reader.read_u16()?,
    })
}

fn read_metrics<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<VerticalMetrics, ReaderError> {
    Ok(VerticalMetrics {
        s_typo_ascender: reader.read_i16()?,
        s_typo_descender: reader.read_i16()?,
        s_typo_line_gap: reader.read_i16()?,
        us_win_ascent: reader.read_u16()?,
        us_win_descent: reader.read_u16()?,
    })
}

fn read_code_pages<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<[u32; 2], ReaderError> {
    Ok([reader.read_u32()?, reader.read_u32()?])
}

fn read_extended<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<ExtendedMetrics, ReaderError> {
    Ok(ExtendedMetrics {
        sx_height: reader.read_i16()?,
        s_cap_height: reader.read_i16()?,
        us_default_char: reader.read_u16()?,
        us_break_char: reader.read_u16()?,
        us_max_context: reader.read_u16()?,
    })
}

fn hex_words(words: &[u32]) -> String {
    words
        .iter()
        .map(|word| format!("{word:08X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Dump for Os2 {
    fn dump(&self) -> DumpDescription {
        let info = match self.version {
            Os2Version::V0(layout) => format!("OS/2: version 0 ({layout:?} layout)"),
            version => format!("OS/2: version {}", version.number()),
        };
        let mut dump = DumpDescription::new(info).with_columns(&FIELD_COLUMNS);
        let f = &self.fields;

        dump.push_field("version", self.version());
        dump.push_field("xAvgCharWidth", f.x_avg_char_width);
        dump.push_field("usWeightClass", f.us_weight_class);
        dump.push_field("usWidthClass", f.us_width_class);
        dump.push_field("fsType", format!("{:#06X}", f.fs_type));
        dump.push_field("ySubscriptXSize", f.y_subscript_x_size);
        dump.push_field("ySubscriptYSize", f.y_subscript_y_size);
        dump.push_field("ySubscriptXOffset", f.y_subscript_x_offset);
        dump.push_field("ySubscriptYOffset", f.y_subscript_y_offset);
        dump.push_field("ySuperscriptXSize", f.y_superscript_x_size);
        dump.push_field("ySuperscriptYSize", f.y_superscript_y_size);
        dump.push_field("ySuperscriptXOffset", f.y_superscript_x_offset);
        dump.push_field("ySuperscriptYOffset", f.y_superscript_y_offset);
        dump.push_field("yStrikeoutSize", f.y_strikeout_size);
        dump.push_field("yStrikeoutPosition", f.y_strikeout_position);
        dump.push_field("sFamilyClass", f.s_family_class);
        dump.push_field(
            "panose",
            f.panose
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        );
        dump.push_field("ulUnicodeRange", hex_words(&f.ul_unicode_range));
        dump.push_field("achVendID", f.ach_vend_id);
        dump.push_field("fsSelection", format!("{:#06X}", f.fs_selection));
        dump.push_field("usFirstCharIndex", format!("{:#06X}", f.us_first_char_index));
        dump.push_field("usLastCharIndex", format!("{:#06X}", f.us_last_char_index));

        // Version 0 tables show these rows in both layouts.
        dump.push_optional_field("sTypoAscender", self.s_typo_ascender());
        dump.push_optional_field("sTypoDescender", self.s_typo_descender());
        dump.push_optional_field("sTypoLineGap", self.s_typo_line_gap());
        dump.push_optional_field("usWinAscent", self.us_win_ascent());
        dump.push_optional_field("usWinDescent", self.us_win_descent());

        if self.version.number() >= 1 {
            dump.push_optional_field("ulCodePageRange", self.code_page_range.map(|r| hex_words(&r)));
        }
        if self.version.number() >= 2 {
            dump.push_optional_field("sxHeight", self.sx_height());
            dump.push_optional_field("sCapHeight", self.s_cap_height());
            dump.push_optional_field("usDefaultChar", self.us_default_char());
            dump.push_optional_field("usBreakChar", self.us_break_char());
            dump.push_optional_field("usMaxContext", self.us_max_context());
        }
        if self.version.number() >= 5 {
            dump.push_optional_field("usLowerOpticalPointSize", self.us_lower_optical_point_size());
            dump.push_optional_field("usUpperOpticalPointSize", self.us_upper_optical_point_size());
        }
        debug_assert_eq!(self.metrics.is_some(), self.version.has_metrics());
        dump
    }
}
