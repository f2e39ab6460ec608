//! Region/entity matching.
//!
//! Decides which text regions get obscured. Matching operates at line
//! granularity: if any part of a line matches an entity, the entire
//! line's bounding box is redacted. This trades precision for recall:
//! extra blacked text is acceptable, leaked sensitive text is not.

use crate::model::{Entity, RedactionMark, TextRegion};
use std::collections::HashSet;

/// Tunable matching policy.
///
/// The defaults reproduce the engine's reference behavior: exact
/// case-folded matching plus unbounded bidirectional containment. Very
/// short entities (one or two characters) will containment-match inside
/// many unrelated regions; `min_containment_len` can bound that, at the
/// cost of letting short sensitive spans through. Exact matches are
/// never length-gated.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// Minimum case-folded length for a string to participate in
    /// containment matching. `0` disables the bound.
    pub min_containment_len: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_containment_len: 0,
        }
    }
}

/// Compute the set of redaction marks for the given regions and entities.
///
/// Deterministic: order-preserving on regions, order-independent on the
/// entity list for exact matches. For containment matches the first
/// matching entity in list order wins, which only affects which entity
/// "claimed" the region, never whether it is marked.
///
/// Each region is visited at most once and maps to at most one mark.
/// An empty result is a valid, common outcome.
pub fn match_regions(regions: &[TextRegion], entities: &[Entity]) -> Vec<RedactionMark> {
    match_regions_with_policy(regions, entities, &MatchPolicy::default())
}

/// [`match_regions`] with an explicit policy.
pub fn match_regions_with_policy(
    regions: &[TextRegion],
    entities: &[Entity],
    policy: &MatchPolicy,
) -> Vec<RedactionMark> {
    // Case-folded entity set for O(1) exact lookup.
    let entity_set: HashSet<String> = entities.iter().map(|e| e.text.to_lowercase()).collect();
    let entity_folded: Vec<String> = entities.iter().map(|e| e.text.to_lowercase()).collect();

    let mut marks = Vec::new();
    let mut processed: HashSet<usize> = HashSet::new();

    for (idx, region) in regions.iter().enumerate() {
        if processed.contains(&idx) {
            continue;
        }

        let region_folded = region.text.to_lowercase();

        // Case 1: exact match.
        if entity_set.contains(&region_folded) {
            marks.push(RedactionMark::covering(region));
            processed.insert(idx);
            continue;
        }

        // Cases 2 and 3: bidirectional containment. "John" in
        // "John Smith DOB 01/02/1980", or "Jane" in "Jane Doe MD".
        for entity in &entity_folded {
            if policy.min_containment_len > 0
                && (entity.len() < policy.min_containment_len
                    || region_folded.len() < policy.min_containment_len)
            {
                continue;
            }
            if entity.contains(&region_folded) || region_folded.contains(entity) {
                marks.push(RedactionMark::covering(region));
                processed.insert(idx);
                break;
            }
        }
    }

    log::debug!(
        "Matched {} of {} regions against {} entities",
        marks.len(),
        regions.len(),
        entities.len()
    );
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn region(page: u32, text: &str) -> TextRegion {
        TextRegion::new(page, text, BoundingBox::new(0, 0, 100, 20))
    }

    fn entities(texts: &[&str]) -> Vec<Entity> {
        texts.iter().map(|t| Entity::new(*t)).collect()
    }

    #[test]
    fn test_exact_match() {
        let regions = vec![region(1, "John Smith")];
        let marks = match_regions(&regions, &entities(&["john smith"]));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].page_number, 1);
    }

    #[test]
    fn test_entity_contained_in_region() {
        // Whole line redacted, not just the matching sub-span.
        let regions = vec![region(1, "John Smith DOB 01/02/1980")];
        let marks = match_regions(&regions, &entities(&["John Smith"]));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].bbox, regions[0].bbox);
    }

    #[test]
    fn test_region_contained_in_entity() {
        let regions = vec![region(1, "Jane Doe")];
        let marks = match_regions(&regions, &entities(&["Jane Doe MD"]));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_case_folded_containment() {
        let regions = vec![region(1, "Patient: Jane Doe")];
        let marks = match_regions(&regions, &entities(&["doe"]));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_no_match_leaves_region_visible() {
        let regions = vec![region(1, "Follow-up in 2 weeks")];
        let marks = match_regions(&regions, &entities(&["John Smith", "555-0100"]));
        assert!(marks.is_empty());
    }

    #[test]
    fn test_no_duplicate_marks() {
        // Both entities independently match; the region must yield one mark.
        let regions = vec![region(1, "John Smith")];
        let marks = match_regions(&regions, &entities(&["John", "Smith", "john smith"]));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_entity_order_does_not_change_marks() {
        let regions = vec![
            region(1, "John Smith"),
            region(1, "Account 12345"),
            region(2, "nothing here"),
        ];
        let forward = match_regions(&regions, &entities(&["smith", "12345"]));
        let reverse = match_regions(&regions, &entities(&["12345", "smith"]));
        assert_eq!(forward, reverse);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_output_preserves_region_order() {
        let mut r1 = region(1, "alpha secret");
        r1.bbox = BoundingBox::new(0, 0, 10, 10);
        let mut r2 = region(1, "beta secret");
        r2.bbox = BoundingBox::new(0, 20, 10, 30);
        let marks = match_regions(&[r1.clone(), r2.clone()], &entities(&["secret"]));
        assert_eq!(marks[0].bbox, r1.bbox);
        assert_eq!(marks[1].bbox, r2.bbox);
    }

    #[test]
    fn test_short_entity_over_triggers_by_default() {
        // Known precision/recall trade-off: a 1-character entity matches
        // inside any region containing it.
        let regions = vec![region(1, "Follow-up in 2 weeks")];
        let marks = match_regions(&regions, &entities(&["2"]));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_min_containment_len_bounds_short_matches() {
        let regions = vec![region(1, "Follow-up in 2 weeks"), region(1, "ok")];
        let policy = MatchPolicy {
            min_containment_len: 3,
        };
        let marks = match_regions_with_policy(&regions, &entities(&["2"]), &policy);
        assert!(marks.is_empty());

        // Exact matches are not length-gated.
        let marks = match_regions_with_policy(&regions, &entities(&["OK"]), &policy);
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_regions(&[], &entities(&["x"])).is_empty());
        assert!(match_regions(&[region(1, "text")], &[]).is_empty());
    }
}
