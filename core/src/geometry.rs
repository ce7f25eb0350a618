/// Axis-aligned screen rectangle in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    /// Strict AABB overlap; rectangles that merely touch edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            width: self.width,
            height: self.height,
        }
    }
}

/// Displacement that moves the center of `from` onto the center of `to`.
/// `from` must be the rect as currently laid out, captured before any new
/// transform is applied; a rect sampled after restyling gives stale targets.
pub fn center_displacement(from: &Rect, to: &Rect) -> (f32, f32) {
    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    (tx - fx, ty - fy)
}
