//! Clip region manager
//!
//! A single clip slot: one geometry, one layer and the `active` flag, which is
//! true exactly while the layer is pushed on the device. Replacing the clip
//! pops the old layer and drops the old geometry and layer before the new
//! ones exist.

use crate::device::{self, DrawTag, RenderDevice};
use crate::error::DeviceError;
use crate::geometry;
use crate::path::PainterPath;
use crate::transform::Transform;

pub struct ClipRegion<D: RenderDevice> {
    geometry: Option<D::Geometry>,
    layer: Option<D::Layer>,
    transform: Transform,
    active: bool,
    push_tags: bool,
}

impl<D: RenderDevice> ClipRegion<D> {
    /// Create the clip slot with its initial layer
    pub fn new(device: &mut D, push_tags: bool) -> Result<Self, DeviceError> {
        Ok(Self {
            geometry: None,
            layer: Some(device.create_layer()?),
            transform: Transform::identity(),
            active: false,
            push_tags,
        })
    }

    /// Whether a clip layer is pushed
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replace the clip.
    ///
    /// The clip path is built under `clip_transform`; the device transform is
    /// `post_transform` afterwards. Must run inside a drawing session.
    pub fn set_clip(
        &mut self,
        device: &mut D,
        clip: Option<&PainterPath>,
        clip_transform: Transform,
        post_transform: Transform,
    ) {
        let push_tags = self.push_tags;
        device::tagged(device, push_tags, DrawTag::DrawClipPath, false, |device| {
            if self.active {
                device::tagged(device, push_tags, DrawTag::PopLayer, true, |device| device.pop_layer());
                self.active = false;
            }

            let Some(path) = clip else {
                return;
            };

            device::tagged(device, push_tags, DrawTag::SetTransform, true, |device| {
                device.set_transform(clip_transform)
            });
            self.transform = clip_transform;
            if let Err(error) = self.rebuild(device, path) {
                tracing::error!("Failed to create clip path: {error}");
            }
            device::tagged(device, push_tags, DrawTag::SetTransform, true, |device| {
                device.set_transform(post_transform)
            });
        });
    }

    fn rebuild(&mut self, device: &mut D, path: &PainterPath) -> Result<(), DeviceError> {
        self.geometry = None;
        let geometry = device::tagged(device, self.push_tags, DrawTag::DrawPlainPath, true, |device| {
            geometry::build(device, path, true)
        })?;
        self.layer = None;
        let layer = device.create_layer()?;

        device::tagged(device, self.push_tags, DrawTag::PushLayer, true, |device| {
            device.push_layer(&geometry, &layer)
        });
        self.geometry = Some(geometry);
        self.layer = Some(layer);
        self.active = true;
        Ok(())
    }

    /// Pop the layer for a suspended session, keeping the clip active
    pub fn suspend(&self, device: &mut D) {
        if self.active {
            device.pop_layer();
        }
    }

    /// Push the layer again after [`suspend`](Self::suspend), under the
    /// transform the clip was built with
    pub fn resume(&self, device: &mut D) {
        if !self.active {
            return;
        }
        if let (Some(geometry), Some(layer)) = (&self.geometry, &self.layer) {
            let current = device.transform();
            device.set_transform(self.transform);
            device.push_layer(geometry, layer);
            device.set_transform(current);
        }
    }

    /// Pop an active layer for good
    pub fn release(&mut self, device: &mut D) {
        if self.active {
            device::tagged(device, self.push_tags, DrawTag::PopLayer, false, |device| device.pop_layer());
            self.active = false;
        }
    }
}
