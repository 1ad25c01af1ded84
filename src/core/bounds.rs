use crate::types::{CourtSize, Position};

/// Clamps `pos` into `[0, width] x [0, height]`, each axis independently.
///
/// No marker-size inset is applied; centering offsets belong to rendering.
pub fn clamp(pos: Position, court: CourtSize) -> Position {
    Position {
        x: clamp_axis(pos.x, court.width),
        y: clamp_axis(pos.y, court.height),
    }
}

fn clamp_axis(v: f64, max: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, max.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_each_axis_independently() {
        let court = CourtSize::new(100.0, 200.0);
        assert_eq!(clamp(Position::new(-5.0, 250.0), court), Position::new(0.0, 200.0));
        assert_eq!(clamp(Position::new(120.0, 40.0), court), Position::new(100.0, 40.0));
        assert_eq!(clamp(Position::new(30.0, 40.0), court), Position::new(30.0, 40.0));
    }

    #[test]
    fn nan_pins_to_origin() {
        let court = CourtSize::new(10.0, 10.0);
        assert_eq!(clamp(Position::new(f64::NAN, 3.0), court), Position::new(0.0, 3.0));
    }
}
