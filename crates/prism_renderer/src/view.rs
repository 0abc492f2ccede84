use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// One slice per view inside the shared uniform buffer. 256 is the largest
/// min_uniform_buffer_offset_alignment found in the wild, so a slice per
/// view keeps dynamic offsets legal everywhere.
pub const VIEW_SLICE_SIZE: u64 = 256;

/// Per-view constants, padded out to exactly one dynamic-offset slice.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ViewConstants {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    _padding: [f32; 44],
}

const _: () = assert!(std::mem::size_of::<ViewConstants>() == VIEW_SLICE_SIZE as usize);

impl ViewConstants {
    pub fn new(view_proj: Mat4, camera_pos: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            _padding: [0.0; 44],
        }
    }
}

/// The uniform buffer holding every view's constants back to back. All
/// slices are written in a single `write_buffer` per frame; draws pick
/// their slice with a dynamic offset.
pub struct ViewSlices {
    pub buffer: wgpu::Buffer,
    count: u32,
}

impl ViewSlices {
    pub fn new(device: &wgpu::Device, count: u32) -> Self {
        let count = count.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Constants"),
            size: VIEW_SLICE_SIZE * count as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, count }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn offset_for(&self, index: u32) -> u32 {
        debug_assert!(index < self.count);
        index * VIEW_SLICE_SIZE as u32
    }

    pub fn write(&self, queue: &wgpu::Queue, views: &[ViewConstants]) {
        debug_assert!(views.len() as u32 <= self.count);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(views));
    }
}

/// A viewport cell in framebuffer pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Lays the views out as a near-square grid over the framebuffer, row by
/// row. A single view gets the whole surface.
pub fn grid_viewport(index: u32, count: u32, width: f32, height: f32) -> ViewportRect {
    let count = count.max(1);
    let cols = (count as f32).sqrt().ceil() as u32;
    let rows = count.div_ceil(cols);
    let cell_w = width / cols as f32;
    let cell_h = height / rows as f32;
    ViewportRect {
        x: (index % cols) as f32 * cell_w,
        y: (index / cols) as f32 * cell_h,
        width: cell_w,
        height: cell_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_constants_fill_one_slice() {
        assert_eq!(std::mem::size_of::<ViewConstants>(), 256);
    }

    #[test]
    fn single_view_covers_the_surface() {
        let rect = grid_viewport(0, 1, 1280.0, 720.0);
        assert_eq!(
            rect,
            ViewportRect {
                x: 0.0,
                y: 0.0,
                width: 1280.0,
                height: 720.0
            }
        );
    }

    #[test]
    fn four_views_form_two_by_two() {
        let rect = grid_viewport(3, 4, 800.0, 600.0);
        assert_eq!(
            rect,
            ViewportRect {
                x: 400.0,
                y: 300.0,
                width: 400.0,
                height: 300.0
            }
        );
    }

    #[test]
    fn three_views_leave_the_last_cell_empty() {
        // 3 views on a 2x2 grid: indices 0..2 fill the first row and half
        // the second.
        let rect = grid_viewport(2, 3, 1000.0, 1000.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 500.0);
        assert_eq!(rect.width, 500.0);
    }
}
