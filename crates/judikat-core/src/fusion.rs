//! Rank Fusion Merger - Reciprocal Rank Fusion over ranked result lists
//!
//! Combines the ranked lists produced for every (query variant, collection)
//! pair into one final ordered, deduplicated evidence set. A case at
//! 1-based rank `r` in a list contributes `1 / (k + r)` to its running
//! fusion score, keyed by case number. Cases retrieved by several variants
//! or collections accumulate across lists - a consensus signal that
//! outweighs a single lucky high-similarity hit.
//!
//! The semantic `relevance_score` of a merged case is the maximum observed
//! across contributing lists, never an average: consumers rely on it being
//! a genuine similarity value, not a fusion statistic.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::record::CaseRecord;

/// Fixed RRF constant. 60 flattens the influence of rank differences
/// beyond the first few positions; a documented standard value, not a
/// per-call tunable.
pub const RRF_K: f64 = 60.0;

/// Fuse ranked lists into one deduplicated, ordered list of at most
/// `final_limit` records.
///
/// Deterministic given identical inputs and commutative over the set of
/// contributing lists. Ordering: fusion score descending, ties broken by
/// relevance score descending, then case number ascending.
pub fn fuse(ranked_lists: Vec<Vec<CaseRecord>>, final_limit: usize) -> Vec<CaseRecord> {
    let mut merged: HashMap<String, CaseRecord> = HashMap::new();

    for list in ranked_lists {
        for (index, record) in list.into_iter().enumerate() {
            let rank = index + 1;
            let increment = 1.0 / (RRF_K + rank as f64);

            match merged.entry(record.case_number.clone()) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.fusion_score += increment;
                    existing.occurrence_count += 1;
                    existing.ranks.push(rank);
                    if record.relevance_score > existing.relevance_score {
                        existing.relevance_score = record.relevance_score;
                    }
                }
                Entry::Vacant(entry) => {
                    let mut record = record;
                    record.fusion_score = increment;
                    record.occurrence_count = 1;
                    record.ranks = vec![rank];
                    entry.insert(record);
                }
            }
        }
    }

    let mut fused: Vec<CaseRecord> = merged.into_values().collect();
    fused.sort_by(compare);
    fused.truncate(final_limit);
    fused
}

fn compare(a: &CaseRecord, b: &CaseRecord) -> Ordering {
    b.fusion_score
        .partial_cmp(&a.fusion_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.case_number.cmp(&b.case_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(case_number: &str, score: f32) -> CaseRecord {
        CaseRecord {
            case_number: case_number.to_string(),
            court: "Nejvyšší soud".to_string(),
            judge: None,
            subject: String::new(),
            date_issued: None,
            date_published: None,
            ecli: None,
            keywords: vec![],
            legal_references: vec![],
            source_url: None,
            relevance_score: score,
            data_source: None,
            fusion_score: 0.0,
            occurrence_count: 0,
            ranks: vec![],
        }
    }

    #[test]
    fn test_fusion_score_is_sum_of_reciprocal_ranks() {
        // Case A at rank 1 in list one and rank 3 in list two
        let lists = vec![
            vec![record("A", 0.9), record("B", 0.8)],
            vec![record("C", 0.7), record("B", 0.6), record("A", 0.5)],
        ];
        let fused = fuse(lists, 10);

        let a = fused.iter().find(|r| r.case_number == "A").unwrap();
        let expected = 1.0 / (60.0 + 1.0) + 1.0 / (60.0 + 3.0);
        assert!((a.fusion_score - expected).abs() < 1e-12);
        assert_eq!(a.occurrence_count, 2);
        assert_eq!(a.ranks, vec![1, 3]);
    }

    #[test]
    fn test_relevance_is_max_never_mean() {
        let lists = vec![
            vec![record("A", 0.9)],
            vec![record("A", 0.3)],
            vec![record("A", 0.6)],
        ];
        let fused = fuse(lists, 10);

        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].relevance_score, 0.9);
        assert_eq!(fused[0].occurrence_count, 3);
    }

    #[test]
    fn test_deduplication_by_case_number() {
        let lists = vec![
            vec![record("22 Cdo 1/2020", 0.9)],
            vec![record("22 Cdo 1/2020", 0.8)],
        ];
        let fused = fuse(lists, 10);
        assert_eq!(fused.len(), 1);
    }

    #[test]
    fn test_commutative_over_list_order() {
        let one = vec![record("A", 0.9), record("B", 0.8), record("C", 0.7)];
        let two = vec![record("B", 0.85), record("D", 0.6)];

        let forward = fuse(vec![one.clone(), two.clone()], 10);
        let reversed = fuse(vec![two, one], 10);

        let forward_order: Vec<&str> =
            forward.iter().map(|r| r.case_number.as_str()).collect();
        let reversed_order: Vec<&str> =
            reversed.iter().map(|r| r.case_number.as_str()).collect();
        assert_eq!(forward_order, reversed_order);

        for (f, r) in forward.iter().zip(reversed.iter()) {
            assert!((f.fusion_score - r.fusion_score).abs() < 1e-12);
            assert_eq!(f.relevance_score, r.relevance_score);
        }
    }

    #[test]
    fn test_consensus_outranks_single_hit_at_same_rank() {
        // X appears at rank 3 in two lists, Y at rank 3 in one list
        let lists = vec![
            vec![record("A", 0.9), record("B", 0.8), record("X", 0.7)],
            vec![record("C", 0.9), record("D", 0.8), record("X", 0.7)],
            vec![record("E", 0.9), record("F", 0.8), record("Y", 0.7)],
        ];
        let fused = fuse(lists, 10);

        let x_pos = fused.iter().position(|r| r.case_number == "X").unwrap();
        let y_pos = fused.iter().position(|r| r.case_number == "Y").unwrap();
        assert!(x_pos < y_pos);
    }

    #[test]
    fn test_tie_break_by_relevance_then_case_number() {
        // Same rank in one list each: identical fusion scores
        let lists = vec![
            vec![record("B", 0.8)],
            vec![record("A", 0.8)],
            vec![record("C", 0.9)],
        ];
        let fused = fuse(lists, 10);

        // C wins on relevance; A and B tie fully except case number
        let order: Vec<&str> = fused.iter().map(|r| r.case_number.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_truncation_to_final_limit() {
        let list: Vec<CaseRecord> = (0..20)
            .map(|i| record(&format!("case-{:02}", i), 1.0 - i as f32 * 0.01))
            .collect();
        let fused = fuse(vec![list], 5);
        assert_eq!(fused.len(), 5);
    }

    #[test]
    fn test_empty_input_lists_are_harmless() {
        let fused = fuse(vec![vec![], vec![record("A", 0.5)], vec![]], 10);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].occurrence_count, 1);
    }
}
