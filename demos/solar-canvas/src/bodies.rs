/// The body table: the Sun plus the eight planets.
///
/// Sizes and distances are in canvas pixels, speeds in radians per frame.
/// Nothing here is to scale.

pub struct BodyRow {
    pub name: &'static str,
    pub color: &'static str,
    pub radius: f32,
    pub distance: f32,
    pub speed: f32,
}

const fn row(name: &'static str, color: &'static str, radius: f32, distance: f32, speed: f32) -> BodyRow {
    BodyRow { name, color, radius, distance, speed }
}

pub const BODY_COUNT: usize = 9;

pub const BODIES: [BodyRow; BODY_COUNT] = [
    row("Sun", "yellow", 40.0, 0.0, 0.0),
    row("Mercury", "gray", 5.0, 70.0, 0.047),
    row("Venus", "orange", 10.0, 100.0, 0.035),
    row("Earth", "blue", 11.0, 140.0, 0.029),
    row("Mars", "red", 8.0, 180.0, 0.024),
    row("Jupiter", "brown", 25.0, 260.0, 0.013),
    row("Saturn", "khaki", 20.0, 340.0, 0.009),
    row("Uranus", "lightblue", 15.0, 400.0, 0.006),
    row("Neptune", "darkblue", 14.0, 460.0, 0.005),
];
