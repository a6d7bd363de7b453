use macroquad::prelude::*;

/// Camera rectangle in world pixels. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    /// Left edge in world pixels.
    pub x: f32,
    /// Top edge in world pixels.
    pub y: f32,
    /// View width in pixels.
    pub width: f32,
    /// View height in pixels.
    pub height: f32,
}

impl Camera {
    /// A camera of the given view size at the world origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// A camera of the given view size with its top-left corner at `(x, y)`.
    pub fn at(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The view as a world-space rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Centres on `target`, clamped so the view stays inside a `world`-sized map.
    /// A map smaller than the view pins the camera to the origin on that axis.
    pub fn follow(&mut self, target: Vec2, world: Vec2) {
        self.x = clamp_axis(target.x - self.width / 2.0, self.width, world.x);
        self.y = clamp_axis(target.y - self.height / 2.0, self.height, world.y);
    }

    /// World position to camera space.
    #[inline]
    pub fn to_view(&self, world: Vec2) -> Vec2 {
        vec2(world.x - self.x, world.y - self.y)
    }
}

fn clamp_axis(pos: f32, view: f32, world: f32) -> f32 {
    if world <= view {
        0.0
    } else {
        pos.clamp(0.0, world - view)
    }
}
