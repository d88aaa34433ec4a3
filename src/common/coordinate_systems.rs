use glam::Vec3;

/// Scenes are authored RH, Up: Z. Orbiter meshes are LH, Up: Y.
/// Swapping Y and Z mirrors the space, so the winding of every triangle flips as well.
#[inline]
pub fn swap_yz(source: Vec3) -> Vec3 {
    Vec3::new(source.x, source.z, source.y)
}

#[inline]
pub fn reverse_winding([a, b, c]: [u32; 3]) -> [u32; 3] {
    [a, c, b]
}

/// The axis convention of one export or import run. Without the swap, coordinates are passed
/// through verbatim in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConvention {
    pub swap_yz: bool,
}

impl AxisConvention {
    pub fn new(swap_yz: bool) -> Self {
        AxisConvention { swap_yz }
    }

    #[inline]
    pub fn scene_to_mesh(&self, source: Vec3) -> Vec3 {
        if self.swap_yz { swap_yz(source) } else { source }
    }

    // the swap is its own inverse
    #[inline]
    pub fn mesh_to_scene(&self, source: Vec3) -> Vec3 {
        self.scene_to_mesh(source)
    }

    #[inline]
    pub fn scene_to_mesh_winding(&self, triangle: [u32; 3]) -> [u32; 3] {
        if self.swap_yz {
            reverse_winding(triangle)
        } else {
            triangle
        }
    }

    #[inline]
    pub fn mesh_to_scene_winding(&self, triangle: [u32; 3]) -> [u32; 3] {
        self.scene_to_mesh_winding(triangle)
    }
}
