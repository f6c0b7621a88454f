//! Maps finger angles to exactly one `GestureLabel` per frame.
//!
//! An extended thumb switches the hand from navigation (cursor follows the
//! index fingertip) into command mode, where index/middle/ring poses trigger
//! discrete actions. Rules are checked top to bottom; the first match wins.

use crate::feature_extractor::FingerAngles;
use crate::types::GestureLabel;

/// Above this the thumb counts as extended (command mode).
pub const THUMB_EXTENDED_DEG: f32 = 170.0;
/// Below this a finger joint counts as bent.
pub const FINGER_BENT_DEG: f32 = 30.0;
/// Above this a finger joint counts as open.
pub const FINGER_EXTENDED_DEG: f32 = 60.0;

pub struct GestureRule {
    pub label: GestureLabel,
    pub matches: fn(&FingerAngles) -> bool,
}

fn thumb_folded(a: &FingerAngles) -> bool {
    // Written as a negation so a NaN thumb angle stays in navigation mode
    !(a.thumb > THUMB_EXTENDED_DEG)
}

fn left_click(a: &FingerAngles) -> bool {
    a.index < FINGER_BENT_DEG && a.middle > FINGER_EXTENDED_DEG
}

fn right_click(a: &FingerAngles) -> bool {
    a.middle < FINGER_BENT_DEG && a.index > FINGER_EXTENDED_DEG
}

fn double_click(a: &FingerAngles) -> bool {
    a.index < FINGER_BENT_DEG && a.middle < FINGER_BENT_DEG
}

fn screenshot(a: &FingerAngles) -> bool {
    a.index > FINGER_EXTENDED_DEG && a.middle > FINGER_EXTENDED_DEG && a.ring > FINGER_EXTENDED_DEG
}

/// Priority-ordered decision table. Every rule after the first only runs
/// with the thumb extended.
pub const RULES: [GestureRule; 5] = [
    GestureRule {
        label: GestureLabel::Move,
        matches: thumb_folded,
    },
    GestureRule {
        label: GestureLabel::LeftClick,
        matches: left_click,
    },
    GestureRule {
        label: GestureLabel::RightClick,
        matches: right_click,
    },
    GestureRule {
        label: GestureLabel::DoubleClick,
        matches: double_click,
    },
    GestureRule {
        label: GestureLabel::Screenshot,
        matches: screenshot,
    },
];

/// Label when the thumb is extended but no command pose matches.
pub const FALLBACK: GestureLabel = GestureLabel::LockedIdle;

pub fn classify(angles: &FingerAngles) -> GestureLabel {
    RULES
        .iter()
        .find(|rule| (rule.matches)(angles))
        .map(|rule| rule.label)
        .unwrap_or(FALLBACK)
}
