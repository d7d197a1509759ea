//! The [name](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table

use std::io::{Read, Seek};

use crate::{
    Tag, TypecaseError,
    buffer::{FontReader, ReaderError},
    dump::{Dump, DumpDescription},
    tables::{FormatError, PlatformId, Table, platform::language},
};

/// 'name'
pub const TAG: Tag = Tag::new(b"name");

/// Well known name identifiers.
pub mod name_id {
    pub const COPYRIGHT_NOTICE: u16 = 0;
    pub const FAMILY_NAME: u16 = 1;
    pub const SUBFAMILY_NAME: u16 = 2;
    pub const UNIQUE_ID: u16 = 3;
    pub const FULL_NAME: u16 = 4;
    pub const VERSION_STRING: u16 = 5;
    pub const POSTSCRIPT_NAME: u16 = 6;
    pub const TRADEMARK: u16 = 7;
    pub const TYPOGRAPHIC_FAMILY_NAME: u16 = 16;
    pub const TYPOGRAPHIC_SUBFAMILY_NAME: u16 = 17;
}

/// Represents a table format
/// the name table can have 2 formats
/// 0 => platform specific language ids only
/// 1 => additionally language-tag strings for ids from 0x8000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    Format0,
    Format1,
}

/// Represents a name record with its string decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: PlatformId,
    pub encoding_id: u16,
    /// Language identifier, not enumed because there are literally DOZENS
    pub language_id: u16,
    pub name_id: u16,
    pub value: String,
}

/// The decoded naming table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    format: NameFormat,
    records: Vec<NameRecord>,
    /// BCP 47 tags for language ids 0x8000 onwards, format 1 only
    lang_tags: Vec<String>,
}

impl Table for Name {
    const TAG: Tag = TAG;
}

/// Location of a string in the storage area.
#[derive(Debug, Clone, Copy)]
struct StringSpan {
    length: u16,
    offset: u16,
}

impl StringSpan {
    fn from_reader<B: Read + Seek>(reader: &mut FontReader<B>) -> Result<Self, ReaderError> {
        Ok(Self {
            length: reader.read_u16()?,
            offset: reader.read_u16()?,
        })
    }

    fn bytes<'a>(&self, storage: &'a [u8]) -> Result<&'a [u8], FormatError> {
        let start = usize::from(self.offset);
        let end = start + usize::from(self.length);
        storage
            .get(start..end)
            .ok_or(FormatError::InvalidBufferLength(end, storage.len()))
    }
}

impl Name {
    pub fn new(format: NameFormat, records: Vec<NameRecord>, lang_tags: Vec<String>) -> Self {
        Self {
            format,
            records,
            lang_tags,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, TypecaseError> {
        let mut reader = FontReader::from_slice(data);

        let format = match reader.read_u16()? {
            0 => NameFormat::Format0,
            1 => NameFormat::Format1,
            other => {
                return Err(FormatError::UnsupportedVersion {
                    tag: TAG,
                    version: other.into(),
                }
                .into());
            }
        };
        let count = reader.read_u16()?;
        let string_offset = usize::from(reader.read_u16()?);

        let mut headers = Vec::with_capacity(count.into());
        for _ in 0..count {
            let platform_id = PlatformId::from(reader.read_u16()?);
            let encoding_id = reader.read_u16()?;
            let language_id = reader.read_u16()?;
            let name_id = reader.read_u16()?;
            let span = StringSpan::from_reader(&mut reader)?;
            headers.push((platform_id, encoding_id, language_id, name_id, span));
        }

        let lang_tag_spans = match format {
            NameFormat::Format0 => Vec::new(),
            NameFormat::Format1 => {
                let lang_tag_count = reader.read_u16()?;
                (0..lang_tag_count)
                    .map(|_| StringSpan::from_reader(&mut reader))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let storage = data
            .get(string_offset..)
            .ok_or(FormatError::InvalidBufferLength(string_offset, data.len()))?;

        let records = headers
            .into_iter()
            .map(|(platform_id, encoding_id, language_id, name_id, span)| {
                let bytes = span.bytes(storage)?;
                Ok(NameRecord {
                    platform_id,
                    encoding_id,
                    language_id,
                    name_id,
                    value: decode_string(platform_id, bytes),
                })
            })
            .collect::<Result<Vec<_>, TypecaseError>>()?;

        let lang_tags = lang_tag_spans
            .iter()
            .map(|span| Ok(decode_utf16(span.bytes(storage)?)))
            .collect::<Result<Vec<_>, TypecaseError>>()?;

        log::debug!(
            "name table: {} records, {} language tags",
            records.len(),
            lang_tags.len()
        );
        Ok(Self::new(format, records, lang_tags))
    }

    pub fn format(&self) -> NameFormat {
        self.format
    }

    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    pub fn lang_tags(&self) -> &[String] {
        &self.lang_tags
    }

    /// The language tag for a language id of 0x8000 or above.
    pub fn lang_tag(&self, language_id: u16) -> Option<&str> {
        let index = language_id.checked_sub(0x8000)?;
        self.lang_tags.get(usize::from(index)).map(String::as_str)
    }

    /// The string for `name_id`, preferring US English Windows records,
    /// then any Windows or Unicode record, then English Macintosh records,
    /// then any Macintosh one.
    pub fn name_string(&self, name_id: u16) -> Option<&str> {
        let candidates = || self.records.iter().filter(move |r| r.name_id == name_id);
        candidates()
            .find(|r| {
                r.platform_id == PlatformId::Windows
                    && r.language_id == language::WINDOWS_ENGLISH_US
            })
            .or_else(|| {
                candidates().find(|r| {
                    matches!(r.platform_id, PlatformId::Windows | PlatformId::Unicode)
                })
            })
            .or_else(|| {
                candidates().find(|r| {
                    r.platform_id == PlatformId::Macintosh
                        && r.language_id == language::MACINTOSH_ENGLISH
                })
            })
            .or_else(|| candidates().find(|r| r.platform_id == PlatformId::Macintosh))
            .map(|r| r.value.as_str())
    }
}

/// Unicode and Windows strings are UTF-16BE; other platforms are read as
/// single byte strings keeping the ASCII subset.
fn decode_string(platform_id: PlatformId, bytes: &[u8]) -> String {
    match platform_id {
        PlatformId::Unicode | PlatformId::Windows => decode_utf16(bytes),
        _ => bytes
            .iter()
            .map(|&b| {
                if b.is_ascii() {
                    char::from(b)
                } else {
                    char::REPLACEMENT_CHARACTER
                }
            })
            .collect(),
    }
}

fn decode_utf16(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

impl Dump for Name {
    fn dump(&self) -> DumpDescription {
        let info = format!(
            "name: format {}, {} records",
            match self.format {
                NameFormat::Format0 => 0,
                NameFormat::Format1 => 1,
            },
            self.records.len()
        );
        let mut dump = DumpDescription::new(info)
            .with_columns(&["Platform", "Encoding", "Language", "Name id", "Value"]);
        for record in &self.records {
            dump.push_row(vec![
                record.platform_id.to_string(),
                record.encoding_id.to_string(),
                record.language_id.to_string(),
                record.name_id.to_string(),
                record.value.clone(),
            ]);
        }
        dump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::BeBuffer;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn decodes_format_0() {
        let family = utf16("Roboto");
        let mac_family = b"RobotoMac";
        let records = 3u16;
        let string_offset = 6 + 12 * records;
        let buf = BeBuffer::new()
            .extend([0u16, records, string_offset])
            // Mac family, stored after the UTF-16 string
            .extend([1u16, 0, 0, name_id::FAMILY_NAME, mac_family.len() as u16, 12])
            .extend([3u16, 1, 0x0409, name_id::FAMILY_NAME, 12, 0])
            .extend([3u16, 1, 0x0409, name_id::FULL_NAME, 12, 0])
            .extend(family)
            .extend(mac_family.iter().copied());

        let name = Name::decode(&buf).unwrap();
        assert_eq!(name.format(), NameFormat::Format0);
        assert_eq!(name.records().len(), 3);
        assert_eq!(name.records()[0].value, "RobotoMac");
        assert_eq!(name.name_string(name_id::FAMILY_NAME), Some("Roboto"));
        assert_eq!(name.name_string(name_id::FULL_NAME), Some("Roboto"));
        assert_eq!(name.name_string(name_id::POSTSCRIPT_NAME), None);
        assert_eq!(name.dump().rows().len(), 3);
    }

    #[test]
    fn falls_back_to_macintosh_records() {
        let name = Name::new(
            NameFormat::Format0,
            vec![NameRecord {
                platform_id: PlatformId::Macintosh,
                encoding_id: 0,
                language_id: 0,
                name_id: name_id::FAMILY_NAME,
                value: "Mac Only".into(),
            }],
            Vec::new(),
        );
        assert_eq!(name.name_string(name_id::FAMILY_NAME), Some("Mac Only"));
    }

    #[test]
    fn macintosh_fallback_prefers_english() {
        let mac = |language_id, value: &str| NameRecord {
            platform_id: PlatformId::Macintosh,
            encoding_id: 0,
            language_id,
            name_id: name_id::FAMILY_NAME,
            value: value.into(),
        };
        let name = Name::new(
            NameFormat::Format0,
            vec![mac(2, "Famille"), mac(language::MACINTOSH_ENGLISH, "Family")],
            Vec::new(),
        );
        assert_eq!(name.name_string(name_id::FAMILY_NAME), Some("Family"));
    }

    #[test]
    fn decodes_format_1_language_tags() {
        let tag = utf16("en-GB");
        let value = utf16("Colour");
        let string_offset = 6 + 12 + 2 + 4;
        let buf = BeBuffer::new()
            .extend([1u16, 1, string_offset])
            .extend([0u16, 4, 0x8000, name_id::FAMILY_NAME, 12, 10])
            .push(1u16)
            .extend([10u16, 0])
            .extend(tag)
            .extend(value);

        let name = Name::decode(&buf).unwrap();
        assert_eq!(name.lang_tags(), &["en-GB".to_string()]);
        assert_eq!(name.lang_tag(0x8000), Some("en-GB"));
        assert_eq!(name.lang_tag(0x0409), None);
        assert_eq!(name.records()[0].value, "Colour");
    }

    #[test]
    fn out_of_bounds_strings_fail() {
        let buf = BeBuffer::new()
            .extend([0u16, 1, 18])
            .extend([3u16, 1, 0x0409, 1, 40, 0]);
        assert!(matches!(
            Name::decode(&buf),
            Err(TypecaseError::FormatError(FormatError::InvalidBufferLength(..)))
        ));
    }
}
