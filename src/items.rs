//! Items

use rustc_hash::FxHashMap;

/// Quantities of each scanned item code, in order of first scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCounts<'a> {
    counts: Vec<(&'a str, usize)>,
}

impl<'a> ItemCounts<'a> {
    /// Aggregate a scan log into per-code quantities.
    pub fn from_scans(scans: &'a [String]) -> Self {
        let mut positions: FxHashMap<&'a str, usize> = FxHashMap::default();
        let mut counts: Vec<(&'a str, usize)> = Vec::new();

        for code in scans {
            let code = code.as_str();

            if let Some(count) = positions
                .get(code)
                .and_then(|&position| counts.get_mut(position))
            {
                count.1 += 1;
            } else {
                positions.insert(code, counts.len());
                counts.push((code, 1));
            }
        }

        Self { counts }
    }

    /// Iterate over `(code, quantity)` pairs in order of first scan.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Quantity scanned for `code`, zero if it was never scanned.
    pub fn count(&self, code: &str) -> usize {
        self.counts
            .iter()
            .find(|(scanned, _)| *scanned == code)
            .map_or(0, |&(_, count)| count)
    }

    /// Number of distinct item codes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was scanned.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of units across all codes.
    pub fn total_quantity(&self) -> usize {
        self.counts.iter().map(|&(_, count)| count).sum()
    }
}
