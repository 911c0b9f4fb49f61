//! Splits detected stickers into expired and not-expired buckets.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::decision::types::{
    Color, DetectedStickerCount, ExpiryBucket, ExpiryReport, Shape, StickerReference,
};

/// Classifies every detected sticker instance against the reference set and
/// folds the results into expired / not-expired buckets.
///
/// The first reference row matching a detected group's shape+color (in
/// repository order) decides the whole group: `expires_on < as_of` is
/// expired, anything else — a reference that has not yet lapsed, or no
/// reference row at all — counts as not expired. A group with no reference
/// row therefore always lands in `not_expired` whole.
///
/// Within each bucket the instances are re-grouped by shape+color with
/// summed counts; `total` is the instance count of the bucket. Detail rows
/// come out sorted by (shape, color) so the report is deterministic.
/// Zero-count detections contribute nothing.
pub fn split_by_expiry(
    detections: &[DetectedStickerCount],
    references: &[StickerReference],
    as_of: NaiveDate,
) -> ExpiryReport {
    let mut expired: HashMap<(Shape, Color), u64> = HashMap::new();
    let mut fresh: HashMap<(Shape, Color), u64> = HashMap::new();

    for detection in detections {
        if detection.count == 0 {
            continue;
        }

        // First match wins when storage holds duplicate shape+color rows.
        let reference = references
            .iter()
            .find(|r| r.shape == detection.shape && r.color == detection.color);

        let bucket = match reference {
            Some(r) if r.expires_on < as_of => &mut expired,
            _ => &mut fresh,
        };
        *bucket.entry((detection.shape, detection.color)).or_default() += detection.count;
    }

    ExpiryReport {
        expired: into_bucket(expired),
        not_expired: into_bucket(fresh),
    }
}

fn into_bucket(groups: HashMap<(Shape, Color), u64>) -> ExpiryBucket {
    let total = groups.values().sum();
    let mut details: Vec<DetectedStickerCount> = groups
        .into_iter()
        .map(|((shape, color), count)| DetectedStickerCount { shape, color, count })
        .collect();
    details.sort_by_key(|d| (d.shape, d.color));

    ExpiryBucket { total, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn detected(shape: Shape, color: Color, count: u64) -> DetectedStickerCount {
        DetectedStickerCount { shape, color, count }
    }

    fn reference(shape: Shape, color: Color, expires_on: NaiveDate) -> StickerReference {
        StickerReference { shape, color, expires_on }
    }

    #[test]
    fn test_lapsed_reference_expires_whole_group() {
        let report = split_by_expiry(
            &[detected(Shape::Circle, Color::Red, 3)],
            &[reference(Shape::Circle, Color::Red, date(2020, 1, 1))],
            date(2025, 1, 1),
        );

        assert_eq!(report.expired.total, 3);
        assert_eq!(report.expired.details, vec![detected(Shape::Circle, Color::Red, 3)]);
        assert_eq!(report.not_expired.total, 0);
        assert!(report.not_expired.details.is_empty());
    }

    #[test]
    fn test_unmatched_group_assumed_fresh() {
        let report = split_by_expiry(
            &[detected(Shape::Square, Color::Blue, 2)],
            &[],
            date(2025, 1, 1),
        );

        assert_eq!(report.expired.total, 0);
        assert_eq!(report.not_expired.total, 2);
        assert_eq!(
            report.not_expired.details,
            vec![detected(Shape::Square, Color::Blue, 2)]
        );
    }

    #[test]
    fn test_expiry_on_the_audit_date_is_not_expired() {
        let refs = [reference(Shape::Triangle, Color::Green, date(2025, 6, 1))];

        let on_the_day = split_by_expiry(
            &[detected(Shape::Triangle, Color::Green, 1)],
            &refs,
            date(2025, 6, 1),
        );
        assert_eq!(on_the_day.not_expired.total, 1);
        assert_eq!(on_the_day.expired.total, 0);

        let day_after = split_by_expiry(
            &[detected(Shape::Triangle, Color::Green, 1)],
            &refs,
            date(2025, 6, 2),
        );
        assert_eq!(day_after.expired.total, 1);
        assert_eq!(day_after.not_expired.total, 0);
    }

    #[test]
    fn test_first_matching_reference_wins() {
        // Duplicate shape+color rows: only the first decides.
        let refs = [
            reference(Shape::Hexagon, Color::Yellow, date(2030, 1, 1)),
            reference(Shape::Hexagon, Color::Yellow, date(2000, 1, 1)),
        ];

        let report = split_by_expiry(
            &[detected(Shape::Hexagon, Color::Yellow, 5)],
            &refs,
            date(2025, 1, 1),
        );

        assert_eq!(report.not_expired.total, 5);
        assert_eq!(report.expired.total, 0);
    }

    #[test]
    fn test_zero_count_groups_contribute_nothing() {
        let report = split_by_expiry(
            &[detected(Shape::Circle, Color::Green, 0)],
            &[reference(Shape::Circle, Color::Green, date(2000, 1, 1))],
            date(2025, 1, 1),
        );

        assert_eq!(report.expired.total, 0);
        assert_eq!(report.not_expired.total, 0);
        assert!(report.expired.details.is_empty());
        assert!(report.not_expired.details.is_empty());
    }

    #[test]
    fn test_bucket_totals_cover_every_input_instance() {
        let detections = [
            detected(Shape::Circle, Color::Red, 3),
            detected(Shape::Square, Color::Blue, 2),
            detected(Shape::Triangle, Color::Green, 4),
            detected(Shape::Circle, Color::Red, 1),
        ];
        let refs = [
            reference(Shape::Circle, Color::Red, date(2020, 1, 1)),
            reference(Shape::Triangle, Color::Green, date(2030, 1, 1)),
        ];

        let report = split_by_expiry(&detections, &refs, date(2025, 1, 1));
        let input_total: u64 = detections.iter().map(|d| d.count).sum();

        assert_eq!(report.expired.total + report.not_expired.total, input_total);
    }

    #[test]
    fn test_details_group_by_shape_and_color_once() {
        // The same combination detected twice merges into one detail row.
        let detections = [
            detected(Shape::Circle, Color::Red, 2),
            detected(Shape::Circle, Color::Red, 3),
            detected(Shape::Square, Color::Red, 1),
        ];
        let refs = [
            reference(Shape::Circle, Color::Red, date(2020, 1, 1)),
            reference(Shape::Square, Color::Red, date(2020, 1, 1)),
        ];

        let report = split_by_expiry(&detections, &refs, date(2025, 1, 1));

        assert_eq!(report.expired.total, 6);
        assert_eq!(
            report.expired.details,
            vec![
                detected(Shape::Circle, Color::Red, 5),
                detected(Shape::Square, Color::Red, 1),
            ]
        );

        let mut seen = std::collections::HashSet::new();
        for d in &report.expired.details {
            assert!(seen.insert((d.shape, d.color)), "duplicate detail group");
        }
    }

    #[test]
    fn test_mixed_buckets_split_cleanly() {
        let detections = [
            detected(Shape::Circle, Color::Red, 3),
            detected(Shape::Square, Color::Blue, 2),
        ];
        let refs = [
            reference(Shape::Circle, Color::Red, date(2020, 1, 1)),
            reference(Shape::Square, Color::Blue, date(2030, 1, 1)),
        ];

        let report = split_by_expiry(&detections, &refs, date(2025, 1, 1));

        assert_eq!(report.expired.details, vec![detected(Shape::Circle, Color::Red, 3)]);
        assert_eq!(
            report.not_expired.details,
            vec![detected(Shape::Square, Color::Blue, 2)]
        );
    }
}
