use bytemuck::{Pod, Zeroable};

/// Per-body data read by the rendering collaborator from a flat f32 buffer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space.
    pub y: f32,
    /// Half the icon size in world units.
    pub half_size: f32,
    /// 0 = system, 1 = planet, 2 = moon.
    pub kind: f32,
    /// Rank among siblings (0 for systems). Picks the icon variant.
    pub sibling_index: f32,
    /// Center of the orbit ring this body travels on.
    pub orbit_x: f32,
    pub orbit_y: f32,
    /// Orbit ring radius (0 for systems).
    pub orbit_radius: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Bodies for one frame, systems first in chart order, each followed by
/// its planets and their moons.
pub struct BodyBuffer {
    pub instances: Vec<BodyInstance>,
}

impl BodyBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: BodyInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Flat float view of the buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for direct reads from WASM memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for BodyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), BodyInstance::STRIDE_BYTES);
        assert_eq!(BodyInstance::FLOATS, 8);
    }

    #[test]
    fn float_view_is_flat() {
        let mut buf = BodyBuffer::new();
        buf.push(BodyInstance {
            x: 1.0,
            y: 2.0,
            kind: 1.0,
            ..Default::default()
        });
        buf.push(BodyInstance::default());
        let floats = buf.as_floats();
        assert_eq!(floats.len(), 16);
        assert_eq!(&floats[..4], &[1.0, 2.0, 0.0, 1.0]);
        assert_eq!(buf.instance_count(), 2);
    }
}
