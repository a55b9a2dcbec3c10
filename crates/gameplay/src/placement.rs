use rand::Rng;

/// Field coordinate of a ball, in meters from the center.
pub type Ball = [f64; 2];

const HALF_WIDTH: f64 = 2.2;
const HALF_HEIGHT: f64 = 1.45;
const CLEARANCE: f64 = 0.4;
const PAIRS: usize = 5;
/// Baskets, robot corners, and the center ball.
const FIXTURES: [Ball; 5] = [
    [-2.22, 0.0],
    [2.22, 0.0],
    [-2.1, -1.35],
    [2.1, 1.35],
    [0.0, 0.0],
];

/// Generate the ball layout for a match.
///
/// The center ball plus five point-mirrored pairs, each ball kept clear
/// of baskets, robot corners, and every other ball. Coordinates are
/// rounded to centimeters.
pub fn ball_placement(rng: &mut impl Rng) -> Vec<Ball> {
    let mut placed = FIXTURES.to_vec();
    let mut balls = vec![[0.0, 0.0]];
    while balls.len() < 1 + PAIRS * 2 {
        let ball = [
            rng.random_range(-HALF_WIDTH..HALF_WIDTH),
            rng.random_range(-HALF_HEIGHT..HALF_HEIGHT),
        ];
        let mirror = [-ball[0], -ball[1]];
        if placed.iter().any(|p| too_close(p, &ball) || too_close(p, &mirror)) {
            continue;
        }
        if too_close(&ball, &mirror) {
            continue;
        }
        placed.push(ball);
        placed.push(mirror);
        balls.push(ball.map(centimeters));
        balls.push(mirror.map(centimeters));
    }
    balls
}

fn too_close(a: &Ball, b: &Ball) -> bool {
    (a[0] - b[0]).hypot(a[1] - b[1]) < CLEARANCE
}

fn centimeters(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    #[test]
    fn placement_is_mirrored() {
        let ref mut rng = SmallRng::seed_from_u64(7);
        let balls = ball_placement(rng);
        assert_eq!(balls.len(), 11);
        assert_eq!(balls[0], [0.0, 0.0]);
        for pair in balls[1..].chunks(2) {
            assert_eq!(pair[0][0], -pair[1][0]);
            assert_eq!(pair[0][1], -pair[1][1]);
        }
    }
    #[test]
    fn placement_stays_on_field() {
        let ref mut rng = SmallRng::seed_from_u64(11);
        for ball in ball_placement(rng) {
            assert!(ball[0].abs() <= HALF_WIDTH);
            assert!(ball[1].abs() <= HALF_HEIGHT);
        }
    }
}
