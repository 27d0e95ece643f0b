//! Title matching: rank source candidates against a query.
//!
//! A source adapter turns its raw result array into lightweight
//! [`Candidate`] entries (title plus the array index), asks
//! [`best_matches`] for the top scoring entries, and uses the surviving
//! indices to look back into the raw records it actually resolves.

pub mod score;

pub use score::similarity;

/// Default number of matches returned when a caller has no better idea.
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// A source-local candidate considered during matching.
///
/// `index` is a stable handle into the adapter's raw result array for the
/// current query, not a persistent identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Candidate title as the source reported it.
    pub title: String,
    /// Position of the backing record in the adapter's raw result array.
    pub index: usize,
}

/// A scored candidate produced by [`best_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    /// The matched candidate's title.
    pub title: String,
    /// Token-sort similarity to the query, 0..=100.
    pub score: u8,
    /// The original candidate index, preserved through reordering.
    pub index: usize,
}

/// Return the top `limit` candidates by similarity to `query`.
///
/// Every candidate is scored with [`similarity`], sorted by descending
/// score with a stable sort (ties keep their original input order), and
/// truncated to `limit`. An empty candidate list yields an empty vec —
/// never an error.
pub fn best_matches(query: &str, candidates: &[Candidate], limit: usize) -> Vec<TitleMatch> {
    let mut matches: Vec<TitleMatch> = candidates
        .iter()
        .map(|candidate| TitleMatch {
            title: candidate.title.clone(),
            score: similarity(query, &candidate.title),
            index: candidate.index,
        })
        .collect();

    // Stable sort: equal scores keep candidate order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(titles: &[&str]) -> Vec<Candidate> {
        titles
            .iter()
            .enumerate()
            .map(|(index, title)| Candidate {
                title: (*title).to_string(),
                index,
            })
            .collect()
    }

    #[test]
    fn empty_candidates_return_empty() {
        assert!(best_matches("anything", &[], 5).is_empty());
        assert!(best_matches("", &[], 1).is_empty());
    }

    #[test]
    fn zero_limit_returns_empty() {
        let list = candidates(&["a", "b"]);
        assert!(best_matches("a", &list, 0).is_empty());
    }

    #[test]
    fn returns_min_of_limit_and_candidate_count() {
        let list = candidates(&["one", "two", "three"]);
        assert_eq!(best_matches("one", &list, 5).len(), 3);
        assert_eq!(best_matches("one", &list, 2).len(), 2);
    }

    #[test]
    fn sorted_by_non_increasing_score() {
        let list = candidates(&[
            "Unrelated Takedown Series",
            "Leg Lock Fundamentals",
            "Leg Lock Lachlan Giles",
        ]);
        let matches = best_matches("Leg Lock Lachlan Giles", &list, 5);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(matches[0].index, 2);
        assert_eq!(matches[0].score, 100);
    }

    #[test]
    fn indices_survive_reordering() {
        let list = candidates(&["zzz completely different", "exact match title"]);
        let matches = best_matches("exact match title", &list, 5);
        assert_eq!(matches[0].index, 1);
        assert_eq!(matches[0].title, "exact match title");
        assert_eq!(matches[1].index, 0);
    }

    #[test]
    fn ties_keep_input_order() {
        // Permutations of the same tokens all score 100 against the query.
        let list = candidates(&["lock leg giles", "giles leg lock", "leg lock giles"]);
        let matches = best_matches("leg lock giles", &list, 5);
        assert!(matches.iter().all(|m| m.score == 100));
        let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn input_order_does_not_change_returned_set() {
        let forward = candidates(&[
            "Leg Lock Lachlan Giles",
            "Half Guard Passing",
            "Back Attacks",
        ]);
        let reversed = vec![
            Candidate {
                title: "Back Attacks".into(),
                index: 2,
            },
            Candidate {
                title: "Half Guard Passing".into(),
                index: 1,
            },
            Candidate {
                title: "Leg Lock Lachlan Giles".into(),
                index: 0,
            },
        ];

        let a = best_matches("Leg Lock Lachlan Giles", &forward, 5);
        let b = best_matches("Leg Lock Lachlan Giles", &reversed, 5);

        let mut set_a: Vec<(String, usize)> =
            a.iter().map(|m| (m.title.clone(), m.index)).collect();
        let mut set_b: Vec<(String, usize)> =
            b.iter().map(|m| (m.title.clone(), m.index)).collect();
        set_a.sort();
        set_b.sort();
        assert_eq!(set_a, set_b);
    }

    #[test]
    fn lachlan_giles_scenario() {
        let list = candidates(&[
            "Lachlan Giles Leg Lock Masterclass",
            "Unrelated Takedown Series",
        ]);
        let matches = best_matches("Leg Lock Lachlan Giles", &list, 5);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 0);
        assert!(matches[0].score >= 75, "score was {}", matches[0].score);
        assert_eq!(matches[1].index, 1);
        assert!(matches[1].score < matches[0].score);
    }

    #[test]
    fn limit_one_picks_single_clear_winner_from_five() {
        let list = candidates(&[
            "Wrestling For BJJ",
            "Lachlan Giles Leg Lock Masterclass",
            "Judo Throws Explained",
            "Gi Chokes From Closed Guard",
            "Pressure Passing Blueprint",
        ]);
        let matches = best_matches("Leg Lock Lachlan Giles", &list, 1);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 1);
        assert!(matches[0].score >= 75, "score was {}", matches[0].score);
    }

    #[test]
    fn default_match_limit_is_five() {
        let list = candidates(&["a", "b", "c", "d", "e", "f", "g"]);
        let matches = best_matches("a", &list, DEFAULT_MATCH_LIMIT);
        assert_eq!(matches.len(), 5);
    }
}
