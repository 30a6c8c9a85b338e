/*!
 * Enumeration of input/output splits over a document's section titles.
 */

use itertools::Itertools;

/// One bipartition of the section titles.
///
/// Both sides list titles in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub input_titles: Vec<String>,
    pub output_titles: Vec<String>,
}

/// Lazily enumerates every non-trivial split of an ordered title list
#[derive(Debug, Clone)]
pub struct CombinationGenerator {
    titles: Vec<String>,
}

impl CombinationGenerator {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of splits `iter` yields: `2^n - 2`, or 0 below two titles
    pub fn expected_count(&self) -> u64 {
        let n = self.titles.len();
        if n < 2 {
            return 0;
        }
        (1u64 << n) - 2
    }

    /// All splits, by input size 1..n-1 and then lexicographically by
    /// title position within each size.
    ///
    /// Each call starts a fresh sequence.
    pub fn iter(&self) -> impl Iterator<Item = Combination> + '_ {
        let n = self.titles.len();
        (1..n)
            .flat_map(move |size| (0..n).combinations(size))
            .map(move |chosen| self.split(&chosen))
    }

    fn split(&self, chosen: &[usize]) -> Combination {
        let mut input_titles = Vec::with_capacity(chosen.len());
        let mut output_titles = Vec::with_capacity(self.titles.len() - chosen.len());
        for (index, title) in self.titles.iter().enumerate() {
            if chosen.contains(&index) {
                input_titles.push(title.clone());
            } else {
                output_titles.push(title.clone());
            }
        }
        Combination {
            input_titles,
            output_titles,
        }
    }
}
