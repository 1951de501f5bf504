//! Packed vertex layout shared by every batch

use bytemuck::{Pod, Zeroable};

/// One batched vertex as uploaded to the GPU
///
/// Slots are stored as floats so the whole vertex is a single attribute
/// stream; `-1.0` means "no texture" or "no color".
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct BatchVertex {
    /// Position in view space
    pub position: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// Index into the batch's texture slot table
    pub texture_slot: f32,
    /// Index into the batch's color slot table
    pub color_slot: f32,
}

/// Bytes per batched vertex
pub const VERTEX_SIZE: usize = std::mem::size_of::<BatchVertex>();

/// Bytes per element index
pub const INDEX_SIZE: usize = std::mem::size_of::<u16>();

/// Vertices addressable by 16-bit element indices
pub const MAX_BATCH_VERTICES: usize = 1 << 16;

/// Slot value meaning "unused"
pub const NO_SLOT: f32 = -1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(VERTEX_SIZE, 28);
        assert_eq!(INDEX_SIZE, 2);

        let vertex = BatchVertex {
            position: [1.0, 2.0, 3.0],
            uv: [0.5, 0.25],
            texture_slot: 0.0,
            color_slot: NO_SLOT,
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&vertex));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.5, 0.25, 0.0, -1.0]);
    }
}
