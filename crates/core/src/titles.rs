//! Progress titles unlocked by lifetime accuracy.

/// A named milestone unlocked at a minimum lifetime accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTier {
    pub name: &'static str,
    pub min_accuracy: u8,
}

/// Fixed tiers, strictly ascending by `min_accuracy`.
pub static TITLE_TIERS: [TitleTier; 6] = [
    TitleTier {
        name: "啊？这对吗",
        min_accuracy: 60,
    },
    TitleTier {
        name: "新来的？",
        min_accuracy: 70,
    },
    TitleTier {
        name: "行吧，算你是海狮了",
        min_accuracy: 80,
    },
    TitleTier {
        name: "老海狮了",
        min_accuracy: 90,
    },
    TitleTier {
        name: "我单方面宣布你就是局长",
        min_accuracy: 96,
    },
    TitleTier {
        name: "隐藏称号：算你厉害！",
        min_accuracy: 100,
    },
];

/// What lies above the current title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTitle {
    Tier(&'static TitleTier),
    MaxReached,
}

fn current_index(accuracy: u8) -> Option<usize> {
    TITLE_TIERS
        .iter()
        .rposition(|tier| tier.min_accuracy <= accuracy)
}

/// Highest tier whose threshold is met, or `None` below the lowest threshold.
#[must_use]
pub fn current_title(accuracy: u8) -> Option<&'static TitleTier> {
    current_index(accuracy).map(|idx| &TITLE_TIERS[idx])
}

/// Tier immediately above the current one.
///
/// Below the lowest threshold this is the lowest tier.
#[must_use]
pub fn next_title(accuracy: u8) -> NextTitle {
    let next_idx = current_index(accuracy).map_or(0, |idx| idx + 1);
    TITLE_TIERS
        .get(next_idx)
        .map_or(NextTitle::MaxReached, NextTitle::Tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_strictly_ascending() {
        for pair in TITLE_TIERS.windows(2) {
            assert!(pair[0].min_accuracy < pair[1].min_accuracy);
        }
    }

    #[test]
    fn eighty_five_is_eighty_tier_with_ninety_next() {
        let current = current_title(85).unwrap();
        assert_eq!(current.min_accuracy, 80);
        match next_title(85) {
            NextTitle::Tier(tier) => assert_eq!(tier.min_accuracy, 90),
            NextTitle::MaxReached => panic!("expected a next tier"),
        }
    }

    #[test]
    fn below_lowest_threshold_has_no_title() {
        assert_eq!(current_title(59), None);
        assert_eq!(current_title(0), None);
        assert_eq!(next_title(59), NextTitle::Tier(&TITLE_TIERS[0]));
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(current_title(60).unwrap().min_accuracy, 60);
        assert_eq!(current_title(95).unwrap().min_accuracy, 90);
        assert_eq!(current_title(96).unwrap().min_accuracy, 96);
    }

    #[test]
    fn top_tier_reports_max_reached() {
        assert_eq!(current_title(100).unwrap().min_accuracy, 100);
        assert_eq!(next_title(100), NextTitle::MaxReached);
    }

    #[test]
    fn current_title_is_monotonic() {
        let threshold = |a: u8| current_title(a).map_or(0, |t| t.min_accuracy);
        for a in 0..100u8 {
            assert!(threshold(a) <= threshold(a + 1), "at {a}");
        }
    }
}
