//! Edge label placement.

const PAD: f64 = 4.0;
const MAX_PASSES: usize = 8;

/// A label plate centred on `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelBox {
    /// Overlap with `other` on each axis, including padding.
    fn overlap(&self, other: &Self) -> (f64, f64) {
        let ox = (self.w / 2.0 + other.w / 2.0 + PAD) - (self.x - other.x).abs();
        let oy = (self.h / 2.0 + other.h / 2.0 + PAD) - (self.y - other.y).abs();
        (ox, oy)
    }
}

/// Push overlapping labels apart.
///
/// Each overlapping pair moves symmetrically along the axis with less
/// overlap. Passes repeat until nothing moves, at most eight times.
/// Returns the number of passes that moved something.
pub fn resolve_collisions(labels: &mut [LabelBox]) -> usize {
    let mut passes = 0;
    for _ in 0..MAX_PASSES {
        let mut moved = false;
        for i in 0..labels.len() {
            let (head, tail) = labels.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                let (ox, oy) = a.overlap(b);
                if ox <= 0.0 || oy <= 0.0 {
                    continue;
                }
                if oy < ox {
                    let shift = oy / 2.0 + 1.0;
                    let dir = if a.y < b.y { -1.0 } else { 1.0 };
                    a.y += dir * shift;
                    b.y -= dir * shift;
                } else {
                    let shift = ox / 2.0 + 1.0;
                    let dir = if a.x < b.x { -1.0 } else { 1.0 };
                    a.x += dir * shift;
                    b.x -= dir * shift;
                }
                moved = true;
            }
        }
        if !moved {
            break;
        }
        passes += 1;
    }
    passes
}
