use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera over a fixed logical resolution.
///
/// The simulation works in whole pixels with y growing downward and the
/// origin at the top-left, so the projection maps `(0, 0)` to the top-left
/// corner and `(logical_w, logical_h)` to the bottom-right regardless of the
/// physical window size. The surface is stretched to fit; aspect is the
/// window's problem, not the game's.
pub struct Camera2D {
    pub logical: (u32, u32),
}

impl Camera2D {
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            logical: (logical_width, logical_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (w, h) = (self.logical.0 as f32, self.logical.1 as f32);
        // Bottom > top flips the y axis so world y grows downward.
        let proj = Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0);
        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn projection_maps_corners_to_clip_space() {
        let camera = Camera2D::new(1000, 1000);
        let m = Mat4::from_cols_array_2d(&camera.build_uniform().view_proj);

        let top_left = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x - -1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = m * Vec4::new(1000.0, 1000.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - -1.0).abs() < 1e-6);
    }
}
