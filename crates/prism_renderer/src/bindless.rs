use std::num::NonZeroU32;

use prism_assets::TextureData;
use wgpu::{BindGroup, BindGroupLayout, Device, Queue};

use crate::RendererError;
use crate::texture::GpuTexture;

/// Default capacity of the bindless table.
pub const DEFAULT_TABLE_CAPACITY: u32 = 1024;

/// Index into the bindless texture table. Slot 0 is always the 1x1 white
/// fallback, so a zeroed material uniform samples plain white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureSlot(pub u32);

impl TextureSlot {
    pub const WHITE: TextureSlot = TextureSlot(0);
}

/// All scene textures live in one `binding_array` bind group; materials
/// carry slot indices in their uniforms instead of owning texture bindings.
/// The bind group is rebuilt lazily after registrations.
pub struct TextureTable {
    layout: BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<GpuTexture>,
    slots: SlotAllocator,
    bind_group: Option<BindGroup>,
}

impl TextureTable {
    pub fn new(device: &Device, queue: &Queue, capacity: u32) -> Self {
        let capacity = capacity.max(1);
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Table Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: Some(NonZeroU32::new(capacity).unwrap()),
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Table Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: 16,
            ..Default::default()
        });

        let white = GpuTexture::from_image(
            device,
            queue,
            &TextureData::white_pixel(),
            Some("Fallback White"),
        );

        Self {
            layout,
            sampler,
            textures: vec![white],
            slots: SlotAllocator::new(capacity),
            bind_group: None,
        }
    }

    pub fn layout(&self) -> &BindGroupLayout {
        &self.layout
    }

    pub fn len(&self) -> u32 {
        self.textures.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        false // slot 0 is always occupied
    }

    pub fn register(
        &mut self,
        device: &Device,
        queue: &Queue,
        data: &TextureData,
    ) -> Result<TextureSlot, RendererError> {
        let slot = self.slots.allocate().ok_or(RendererError::TableFull {
            capacity: self.slots.capacity(),
        })?;
        self.textures
            .push(GpuTexture::from_image(device, queue, data, None));
        self.bind_group = None;
        log::debug!("registered '{}' in table slot {}", data.name, slot.0);
        Ok(slot)
    }

    /// The table bind group, rebuilt if any texture was registered since
    /// the last call. Requires PARTIALLY_BOUND_BINDING_ARRAY: only the
    /// occupied slots are bound.
    pub fn bind_group(&mut self, device: &Device) -> &BindGroup {
        if self.bind_group.is_none() {
            let views: Vec<&wgpu::TextureView> =
                self.textures.iter().map(|t| &t.view).collect();
            self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Texture Table"),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureViewArray(&views),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            }));
        }
        self.bind_group.as_ref().unwrap()
    }
}

/// Slot bookkeeping kept separate from the GPU objects so capacity rules
/// are testable on their own.
#[derive(Debug)]
pub struct SlotAllocator {
    next: u32,
    capacity: u32,
}

impl SlotAllocator {
    pub fn new(capacity: u32) -> Self {
        // slot 0 is reserved for the white fallback
        Self { next: 1, capacity }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn allocate(&mut self) -> Option<TextureSlot> {
        if self.next >= self.capacity {
            return None;
        }
        let slot = TextureSlot(self.next);
        self.next += 1;
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_zero_is_reserved() {
        let mut alloc = SlotAllocator::new(4);
        assert_eq!(alloc.allocate(), Some(TextureSlot(1)));
        assert_eq!(alloc.allocate(), Some(TextureSlot(2)));
    }

    #[test]
    fn allocator_stops_at_capacity() {
        let mut alloc = SlotAllocator::new(3);
        assert!(alloc.allocate().is_some());
        assert!(alloc.allocate().is_some());
        assert_eq!(alloc.allocate(), None);
    }

    #[test]
    fn white_slot_is_the_first() {
        assert_eq!(TextureSlot::WHITE, TextureSlot(0));
    }
}
