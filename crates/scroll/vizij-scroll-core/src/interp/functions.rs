//! Interpolation helpers:
//! - lerp (scalar blend)
//! - power curves (in/out/inOut)
//! - cubic-bezier timing solved by bisection on x

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn power_in(t: f64, exp: i32) -> f64 {
    t.powi(exp)
}

#[inline]
pub fn power_out(t: f64, exp: i32) -> f64 {
    1.0 - (1.0 - t).powi(exp)
}

#[inline]
pub fn power_in_out(t: f64, exp: i32) -> f64 {
    if t < 0.5 {
        power_in(t * 2.0, exp) / 2.0
    } else {
        1.0 - power_in((1.0 - t) * 2.0, exp) / 2.0
    }
}

#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given a timing curve (x1,y1,x2,y2) with endpoints (0,0) and (1,1),
/// compute the eased y by inverting the x bezier via binary search.
pub fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut mid = t;
    for _ in 0..32 {
        mid = (lo + hi) * 0.5;
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
