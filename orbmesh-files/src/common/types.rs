#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct C3Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl C3Vector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        C3Vector { x, y, z }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct C2Vector {
    pub x: f32,
    pub y: f32,
}

impl C2Vector {
    pub fn new(x: f32, y: f32) -> Self {
        C2Vector { x, y }
    }
}

/// Floating point RGBA, every channel in 0..=1. Unlike the 8 bit colors of other formats, the mesh
/// files store colors as plain decimal text.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl CColor {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        CColor { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for CColor {
    fn from(value: [f32; 4]) -> Self {
        CColor {
            r: value[0],
            g: value[1],
            b: value[2],
            a: value[3],
        }
    }
}

impl From<CColor> for [f32; 4] {
    fn from(value: CColor) -> Self {
        value.to_array()
    }
}
