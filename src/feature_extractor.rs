use crate::geometry::angle;
use crate::types::{
    Landmark, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, NUM_LANDMARKS,
    RING_MCP, RING_PIP, RING_TIP, THUMB_CMC, THUMB_MCP, THUMB_TIP,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Insufficient landmarks: expected {expected}, got {actual}")]
    InsufficientLandmarks { expected: usize, actual: usize },
}

/// Joint angles (degrees) used by the gesture classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerAngles {
    pub thumb: f32,
    pub index: f32,
    pub middle: f32,
    pub ring: f32,
}

impl FingerAngles {
    pub fn new(thumb: f32, index: f32, middle: f32, ring: f32) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
        }
    }
}

fn check_arity(landmarks: &[Landmark]) -> Result<(), FeatureError> {
    // One hand only: anything but a full set is "no hand"
    if landmarks.len() != NUM_LANDMARKS {
        return Err(FeatureError::InsufficientLandmarks {
            expected: NUM_LANDMARKS,
            actual: landmarks.len(),
        });
    }
    Ok(())
}

/// Computes the thumb, index, middle and ring angles at their middle joints.
pub fn extract_angles(landmarks: &[Landmark]) -> Result<FingerAngles, FeatureError> {
    check_arity(landmarks)?;

    let joint = |proximal: usize, vertex: usize, distal: usize| {
        angle(landmarks[proximal], landmarks[vertex], landmarks[distal])
    };

    Ok(FingerAngles {
        thumb: joint(THUMB_CMC, THUMB_MCP, THUMB_TIP),
        index: joint(INDEX_MCP, INDEX_PIP, INDEX_TIP),
        middle: joint(MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP),
        ring: joint(RING_MCP, RING_PIP, RING_TIP),
    })
}

/// Index fingertip, the point the cursor follows while moving.
pub fn index_fingertip(landmarks: &[Landmark]) -> Result<Landmark, FeatureError> {
    check_arity(landmarks)?;
    Ok(landmarks[INDEX_TIP])
}


#[cfg(test)]
mod tests {
    use super::fixtures::hand;
    use super::*;

    #[test]
    fn short_sets_are_rejected() {
        let landmarks = vec![Landmark::default(); 20];
        assert_eq!(
            extract_angles(&landmarks),
            Err(FeatureError::InsufficientLandmarks {
                expected: 21,
                actual: 20
            })
        );
        assert!(extract_angles(&[]).is_err());
        assert!(index_fingertip(&landmarks).is_err());
    }

    #[test]
    fn extra_hands_are_not_silently_truncated() {
        let landmarks = vec![Landmark::default(); 42];
        assert!(matches!(
            extract_angles(&landmarks),
            Err(FeatureError::InsufficientLandmarks { actual: 42, .. })
        ));
    }

    #[test]
    fn open_hand_is_straight_everywhere() {
        let angles = extract_angles(&hand(true, true, true, true)).unwrap();
        assert!(angles.thumb > 179.0, "thumb {}", angles.thumb);
        assert!(angles.index > 179.0, "index {}", angles.index);
        assert!(angles.middle > 179.0, "middle {}", angles.middle);
        assert!(angles.ring > 179.0, "ring {}", angles.ring);
    }

    #[test]
    fn folded_fingers_read_as_small_angles() {
        let angles = extract_angles(&hand(false, false, true, false)).unwrap();
        assert!(angles.thumb < 10.0, "thumb {}", angles.thumb);
        assert!(angles.index < 1.0, "index {}", angles.index);
        assert!(angles.middle > 179.0, "middle {}", angles.middle);
        assert!(angles.ring < 1.0, "ring {}", angles.ring);
    }

    #[test]
    fn fingertip_is_landmark_eight() {
        let mut landmarks = hand(false, true, true, true);
        landmarks[8] = Landmark::new(0.42, 0.17);
        assert_eq!(index_fingertip(&landmarks).unwrap(), Landmark::new(0.42, 0.17));
    }
}
