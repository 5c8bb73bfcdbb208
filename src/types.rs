#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Vector of `length` pointing along `degrees` (0° = +x, 90° = +y in screen space).
    pub fn from_angle_degrees(degrees: f64, length: f64) -> Self {
        let radians = degrees.to_radians();
        Vector2D::new(length * radians.cos(), length * radians.sin())
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }

    pub fn dot(&self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_to(&self, other: Vector2D) -> f64 {
        self.sub(other).length()
    }

    /// Direction of the vector in degrees, normalized to [0, 360).
    pub fn angle_degrees(&self) -> f64 {
        wrap_angle(self.y.atan2(self.x).to_degrees())
    }
}

/// Normalizes an angle in degrees into [0, 360).
pub fn wrap_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Fixed-size rectangle the whole session plays out in, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl PlayArea {
    pub fn new(width: f64, height: f64) -> Self {
        PlayArea { width, height }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half the diagonal: the radius of the circle that circumscribes the rectangle.
    pub fn circumscribed_radius(&self) -> f64 {
        (self.width.powi(2) + self.height.powi(2)).sqrt() / 2.0
    }

    /// Clamps each coordinate independently into the rectangle.
    pub fn clamp(&self, point: Vector2D) -> Vector2D {
        Vector2D::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }

    pub fn contains_with_margin(&self, point: Vector2D, margin: f64) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}
