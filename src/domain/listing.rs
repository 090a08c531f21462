//! Provider listings grouped by category

/// One document reported by a provider listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Document identifier, e.g. `ls`
    pub document: String,
    /// Category key, e.g. the manual section `1`
    pub category: String,
}

impl ListingEntry {
    pub fn new(document: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            category: category.into(),
        }
    }
}

/// Documents grouped by category.
///
/// Categories keep the order in which they were first seen, and so do the
/// documents inside each category. A document listed twice under the same
/// category is kept once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    groups: Vec<(String, Vec<String>)>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ListingEntry) {
        let ListingEntry { document, category } = entry;
        match self.groups.iter_mut().find(|(key, _)| *key == category) {
            Some((_, documents)) => {
                if !documents.contains(&document) {
                    documents.push(document);
                }
            }
            None => self.groups.push((category, vec![document])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, docs)| docs.len()).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(key, docs)| (key.as_str(), docs.as_slice()))
    }
}

impl FromIterator<ListingEntry> for Listing {
    fn from_iter<I: IntoIterator<Item = ListingEntry>>(iter: I) -> Self {
        let mut listing = Self::new();
        for entry in iter {
            listing.push(entry);
        }
        listing
    }
}
