use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::HEIGHT_SCALE;

/// GPU-side copies of the simulator's height field plus render parameters.
///
/// The wave field is integrated on the CPU; each frame the fresh heights
/// are written into a single storage buffer that the fragment shader
/// samples. No ping-pong is needed since the GPU only ever reads.
pub struct FieldBuffers {
    /// Row-major f32 heights, grid_size * grid_size entries
    pub height_buffer: Buffer,
    /// Uniform buffer for render parameters
    pub params_buffer: Buffer,
    grid_size: u32,
}

/// Render parameters passed to the surface shader (32 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    // Grid info (8 bytes)
    pub grid_size: u32,
    pub _pad0: u32,
    // Shading inputs (8 bytes)
    pub time: f32,
    pub height_scale: f32,
    // Surface dimensions in pixels (8 bytes + 8 padding)
    pub surface_width: f32,
    pub surface_height: f32,
    pub _pad1: [f32; 2],
}

impl FieldBuffers {
    /// Create the height storage buffer and the params uniform buffer.
    pub fn new(device: &Device, grid_size: u32) -> Self {
        let cell_count = (grid_size * grid_size) as usize;
        let buffer_size = (cell_count * std::mem::size_of::<f32>()) as u64;

        let height_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("height-field-buffer"),
            size: buffer_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            height_buffer,
            params_buffer,
            grid_size,
        }
    }

    /// Upload this frame's height field.
    pub fn upload_heights(&self, queue: &Queue, heights: &[f32]) {
        debug_assert_eq!(heights.len(), (self.grid_size * self.grid_size) as usize);
        queue.write_buffer(&self.height_buffer, 0, bytemuck::cast_slice(heights));
    }

    /// Update render parameters for this frame.
    pub fn update_params(&self, queue: &Queue, time: f32, surface_size: (u32, u32)) {
        let params = RenderParams {
            grid_size: self.grid_size,
            _pad0: 0,
            time,
            height_scale: HEIGHT_SCALE,
            surface_width: surface_size.0 as f32,
            surface_height: surface_size.1 as f32,
            _pad1: [0.0, 0.0],
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_params_size() {
        // must match the WGSL uniform block layout
        assert_eq!(std::mem::size_of::<RenderParams>(), 32);
    }
}
