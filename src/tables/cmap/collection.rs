use std::{ops::Index, slice, sync::Arc};

use crate::TypecaseError;

use super::CharacterMapping;

/// An ordered, read-only sequence of character mappings.
///
/// Mappings are shared through [`Arc`], so the collection hands out the very
/// mappings it was built from.
#[derive(Debug, Clone, Default)]
pub struct CharacterMappingCollection {
    mappings: Vec<Arc<CharacterMapping>>,
}

impl CharacterMappingCollection {
    /// Materializes `source` in order; an absent source gives an empty
    /// collection.
    pub fn new<I>(source: Option<I>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<CharacterMapping>>,
    {
        let mappings = source
            .into_iter()
            .flatten()
            .map(Into::into)
            .collect();
        Self { mappings }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CharacterMapping>> {
        self.mappings.get(index)
    }

    /// Like [`get`](Self::get), reporting an out of range index as an error.
    pub fn mapping(&self, index: usize) -> Result<&Arc<CharacterMapping>, TypecaseError> {
        self.mappings
            .get(index)
            .ok_or(TypecaseError::IndexOutOfRange {
                index,
                len: self.mappings.len(),
            })
    }

    pub fn iter(&self) -> slice::Iter<'_, Arc<CharacterMapping>> {
        self.mappings.iter()
    }
}

impl Index<usize> for CharacterMappingCollection {
    type Output = Arc<CharacterMapping>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.mappings[index]
    }
}

impl<'a> IntoIterator for &'a CharacterMappingCollection {
    type Item = &'a Arc<CharacterMapping>;

    type IntoIter = slice::Iter<'a, Arc<CharacterMapping>>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}
