use std::collections::BTreeMap;
use crate::types::RankResult;

/// Competition rank of `target` among `counts` (author → commit count).
///
/// Authors sharing a count share the best rank of their group, and the next
/// group's rank is offset by the size of the tied group:
/// `{A:5, B:5, C:3}` ranks A and B first and C third.
///
/// `total_distinct_ranks` is the rank the lowest-count group would receive.
/// An absent target ranks 0.
pub fn rank(target: &str, counts: &BTreeMap<String, usize>) -> RankResult {
    // commit count → authors with that count, walked from the highest count
    let mut groups: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (author, &count) in counts {
        groups.entry(count).or_default().push(author.as_str());
    }

    let mut rank = 0;
    let mut running = 1;
    for members in groups.values().rev() {
        if members.contains(&target) {
            rank = running;
            break;
        }
        running += members.len();
    }

    let total_distinct_ranks = match groups.values().next() {
        None => 0,
        Some(lowest) => counts.len() - lowest.len() + 1,
    };

    RankResult { rank, total_distinct_ranks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|(a, c)| (a.to_string(), *c)).collect()
    }

    #[test]
    fn test_ties_share_rank_and_next_group_skips() {
        let c = counts(&[("A", 5), ("B", 5), ("C", 3)]);
        assert_eq!(rank("A", &c).rank, 1);
        assert_eq!(rank("B", &c).rank, 1);
        assert_eq!(rank("C", &c).rank, 3);
        assert_eq!(rank("C", &c).total_distinct_ranks, 3);
    }

    #[test]
    fn test_unranked_sentinel() {
        let r = rank("nobody", &counts(&[("A", 5)]));
        assert_eq!(r.rank, 0);
        assert_eq!(r.total_distinct_ranks, 1);
    }

    #[test]
    fn test_everyone_tied_has_single_rank() {
        let c = counts(&[("A", 2), ("B", 2), ("C", 2), ("D", 2)]);
        let r = rank("D", &c);
        assert_eq!(r, RankResult { rank: 1, total_distinct_ranks: 1 });
    }

    #[test]
    fn test_tied_bottom_group_counts_once() {
        // 10 > 7 > {4, 4, 4}: bottom tier sits at rank 3, not 5
        let c = counts(&[("A", 10), ("B", 7), ("C", 4), ("D", 4), ("E", 4)]);
        assert_eq!(rank("E", &c), RankResult { rank: 3, total_distinct_ranks: 3 });
        assert_eq!(rank("B", &c).rank, 2);
    }

    #[test]
    fn test_tie_above_offsets_rank() {
        let c = counts(&[("A", 9), ("B", 9), ("C", 9), ("D", 1), ("E", 0)]);
        assert_eq!(rank("D", &c).rank, 4);
        assert_eq!(rank("E", &c).rank, 5);
        assert_eq!(rank("E", &c).total_distinct_ranks, 5);
    }

    #[test]
    fn test_empty_counts() {
        let r = rank("A", &BTreeMap::new());
        assert_eq!(r, RankResult { rank: 0, total_distinct_ranks: 0 });
    }

    #[test]
    fn test_rank_independent_of_author_names() {
        // reversing alphabetical order of tied authors must not move anyone
        let a = counts(&[("aa", 3), ("zz", 3), ("mm", 1)]);
        let b = counts(&[("zz", 3), ("aa", 3), ("mm", 1)]);
        for who in ["aa", "zz", "mm"] {
            assert_eq!(rank(who, &a), rank(who, &b));
        }
    }
}
