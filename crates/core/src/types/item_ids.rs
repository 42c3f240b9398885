//! Comma-separated item-id lists, as used by the point search query string.

use core::fmt;
use core::str::FromStr;
use std::collections::HashSet;

use super::ItemId;

/// Error returned when an entry of an item-id list is not an integer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid item id: {entry:?}")]
pub struct ItemIdListError {
    /// The offending entry, trimmed.
    pub entry: String,
}

/// A parsed `items=1,2,3` query parameter.
///
/// Whitespace around entries is ignored and empty entries are skipped, so
/// `"1, 2,,3"` parses to `[1, 2, 3]`. Duplicates are dropped while keeping
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIdList(Vec<ItemId>);

impl ItemIdList {
    /// Parse a comma-separated list of item ids.
    ///
    /// # Errors
    ///
    /// Returns [`ItemIdListError`] naming the first entry that is not an
    /// integer.
    pub fn parse(s: &str) -> Result<Self, ItemIdListError> {
        let mut list = Self::default();
        let mut seen = HashSet::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let id = entry.parse::<ItemId>().map_err(|_| ItemIdListError {
                entry: entry.to_owned(),
            })?;
            list.push_new(&mut seen, id);
        }

        Ok(list)
    }

    /// The parsed ids.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.0
    }

    /// Whether no ids were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn push_new(&mut self, seen: &mut HashSet<ItemId>, id: ItemId) {
        if seen.insert(id) {
            self.0.push(id);
        }
    }
}

impl FromStr for ItemIdList {
    type Err = ItemIdListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<ItemId>> for ItemIdList {
    fn from(ids: Vec<ItemId>) -> Self {
        let mut list = Self(Vec::with_capacity(ids.len()));
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            list.push_new(&mut seen, id);
        }
        list
    }
}

impl fmt::Display for ItemIdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let list = ItemIdList::parse("1,2,3").unwrap();
        assert_eq!(
            list.as_slice(),
            &[ItemId::new(1), ItemId::new(2), ItemId::new(3)]
        );
    }

    #[test]
    fn test_parse_trims_and_skips_empty_entries() {
        let list = ItemIdList::parse(" 4 , ,5,").unwrap();
        assert_eq!(list.as_slice(), &[ItemId::new(4), ItemId::new(5)]);
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(ItemIdList::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_drops_duplicates() {
        let list = ItemIdList::parse("2,1,2").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_string(), "2,1");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = ItemIdList::parse("1,paper").unwrap_err();
        assert_eq!(err.entry, "paper");
    }

    #[test]
    fn test_from_vec_dedupes() {
        let list = ItemIdList::from(vec![ItemId::new(1), ItemId::new(1)]);
        assert_eq!(list.as_slice(), &[ItemId::new(1)]);
    }

    #[test]
    fn test_dedupe_scales_to_large_lists() {
        let ids: Vec<ItemId> = (0..200_000).chain(0..200_000).map(ItemId::new).collect();

        let started = std::time::Instant::now();
        let list = ItemIdList::from(ids);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "deduplicating 400k ids took {:?}",
            started.elapsed()
        );

        assert_eq!(list.len(), 200_000);
        assert_eq!(list.as_slice().first(), Some(&ItemId::new(0)));
        assert_eq!(list.as_slice().last(), Some(&ItemId::new(199_999)));
    }

    #[test]
    fn test_parse_large_query_keeps_first_seen_order() {
        let query: String = (0..50_000)
            .rev()
            .chain(0..50_000)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let list = ItemIdList::parse(&query).unwrap();
        assert_eq!(list.len(), 50_000);
        assert_eq!(list.as_slice().first(), Some(&ItemId::new(49_999)));
        assert_eq!(list.as_slice().last(), Some(&ItemId::new(0)));
    }
}
