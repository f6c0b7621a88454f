use crate::types::Landmark;

/// Rays shorter than this are treated as collapsed.
const MIN_RAY_LENGTH: f32 = 1e-6;

/// Unsigned angle in degrees at vertex `b`, between rays `b→a` and `b→c`.
///
/// Always in [0, 180] for finite input. When `a` or `c` coincides with `b`
/// the angle is undefined and 0° is returned, so a collapsed joint reads as
/// fully bent.
pub fn angle(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let norm_ba = (bax * bax + bay * bay).sqrt();
    let norm_bc = (bcx * bcx + bcy * bcy).sqrt();
    if norm_ba < MIN_RAY_LENGTH || norm_bc < MIN_RAY_LENGTH {
        return 0.0;
    }

    let cos = ((bax * bcx + bay * bcy) / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
