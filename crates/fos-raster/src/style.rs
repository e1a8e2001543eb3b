//! Pens, brushes and the stroke/fill resource cache

use crate::color::Color;
use crate::device::{GradientStop, LineCap, LineJoin, RenderDevice, StrokeProperties};
use crate::path::Point;
use crate::transform::Transform;

/// Line pattern of a pen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    NoPen,
    #[default]
    SolidLine,
    DashLine,
    DotLine,
    DashDotLine,
    DashDotDotLine,
}

impl PenStyle {
    /// Dash lengths in multiples of the line width, empty for solid lines
    pub fn dashes(self) -> &'static [f32] {
        match self {
            PenStyle::NoPen | PenStyle::SolidLine => &[],
            PenStyle::DashLine => &[4.0, 2.0],
            PenStyle::DotLine => &[1.0, 2.0],
            PenStyle::DashDotLine => &[4.0, 2.0, 1.0, 2.0],
            PenStyle::DashDotDotLine => &[4.0, 2.0, 1.0, 2.0, 1.0, 2.0],
        }
    }
}

/// Stroke attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub style: PenStyle,
    pub color: Color,
    /// Width in user units, 0 for a one pixel cosmetic line
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: PenStyle::SolidLine,
            color: Color::BLACK,
            width: 0.0,
            cap: LineCap::Square,
            join: LineJoin::Bevel,
        }
    }
}

impl Pen {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn none() -> Self {
        Self {
            style: PenStyle::NoPen,
            ..Self::default()
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn style(mut self, style: PenStyle) -> Self {
        self.style = style;
        self
    }

    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.style != PenStyle::NoPen
    }

    /// Device line width: a zero width is one pixel whatever the transform
    pub fn normalized_width(&self, transform: &Transform) -> f64 {
        if self.width != 0.0 {
            return self.width;
        }
        if transform.is_identity() {
            return 1.0;
        }
        let (sx, sy) = transform.scale_factors();
        if sx + sy > 0.0 { 2.0 / (sx + sy) } else { 1.0 }
    }

    fn stroke_properties(&self) -> StrokeProperties {
        StrokeProperties {
            cap: self.cap,
            join: self.join,
            ..StrokeProperties::default()
        }
    }
}

/// Gradient geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GradientKind {
    Linear { start: Point, end: Point },
    Radial { center: Point, focal: Point, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn linear(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            kind: GradientKind::Linear {
                start: Point::new(x1, y1),
                end: Point::new(x2, y2),
            },
            stops: Vec::new(),
        }
    }

    pub fn radial(center: Point, radius: f64, focal: Point) -> Self {
        Self {
            kind: GradientKind::Radial { center, focal, radius },
            stops: Vec::new(),
        }
    }

    /// Append a color stop, `position` in [0, 1]
    pub fn stop(mut self, position: f64, color: Color) -> Self {
        self.stops.push(GradientStop { position, color });
        self
    }
}

/// Fill attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Brush {
    #[default]
    None,
    Solid(Color),
    Gradient(Gradient),
}

impl Brush {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Brush::None)
    }
}

/// Kind of the cached fill resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    Solid,
    Gradient,
}

/// Renderer stroke and fill resources for the current pen and brush.
///
/// The solid fill is recolored in place while it stays solid; any change of
/// kind drops the old resource before creating the new one. Creation failures
/// are logged and drawing carries on with whatever is left.
pub struct StyleCache<D: RenderDevice> {
    stroke_brush: D::Brush,
    stroke_style: Option<D::StrokeStyle>,
    line_width: f32,
    fill: Option<D::Brush>,
    fill_kind: FillKind,
}

impl<D: RenderDevice> StyleCache<D> {
    pub fn new(device: &mut D) -> Result<Self, crate::error::DeviceError> {
        let fill = device.create_solid_color_brush(Color::TRANSPARENT)?;
        let stroke_brush = device.create_solid_color_brush(Color::TRANSPARENT)?;
        let stroke_style = device.create_stroke_style(&StrokeProperties::default(), &[])?;
        Ok(Self {
            stroke_brush,
            stroke_style: Some(stroke_style),
            line_width: 1.0,
            fill: Some(fill),
            fill_kind: FillKind::Solid,
        })
    }

    pub fn stroke_brush(&self) -> &D::Brush {
        &self.stroke_brush
    }

    pub fn stroke_style(&self) -> Option<&D::StrokeStyle> {
        self.stroke_style.as_ref()
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn fill(&self) -> Option<&D::Brush> {
        self.fill.as_ref()
    }

    pub fn fill_kind(&self) -> FillKind {
        self.fill_kind
    }

    /// Fill `geometry` with the current fill and stroke it with the current
    /// pen, each only when asked for
    pub fn paint(&self, device: &mut D, geometry: &D::Geometry, fill: bool, stroke: bool) {
        if fill {
            if let Some(brush) = &self.fill {
                device.fill_geometry(geometry, brush);
            }
        }
        if stroke {
            if let Some(style) = &self.stroke_style {
                device.draw_geometry(geometry, &self.stroke_brush, self.line_width, style);
            }
        }
    }

    /// Take over `pen` under `transform`; an invisible pen changes nothing
    pub fn apply_pen(&mut self, device: &mut D, pen: &Pen, transform: &Transform) {
        if !pen.is_visible() {
            return;
        }
        device.set_brush_color(&mut self.stroke_brush, pen.color);
        self.line_width = pen.normalized_width(transform) as f32;

        // Cap and join are fixed at creation
        self.stroke_style = None;
        match device.create_stroke_style(&pen.stroke_properties(), pen.style.dashes()) {
            Ok(style) => self.stroke_style = Some(style),
            Err(error) => tracing::error!("Failed to create stroke style: {error}"),
        }
    }

    /// Take over `brush`; no brush keeps the current fill resource
    pub fn apply_brush(&mut self, device: &mut D, brush: &Brush) {
        match brush {
            Brush::None => {}
            Brush::Solid(color) => {
                if self.fill_kind == FillKind::Solid {
                    if let Some(fill) = self.fill.as_mut() {
                        device.set_brush_color(fill, *color);
                        return;
                    }
                }
                self.fill = None;
                self.fill_kind = FillKind::Solid;
                match device.create_solid_color_brush(*color) {
                    Ok(fill) => self.fill = Some(fill),
                    Err(error) => tracing::error!("Failed to create fill brush: {error}"),
                }
            }
            Brush::Gradient(gradient) => {
                self.fill = None;
                self.fill_kind = FillKind::Gradient;
                let created = match gradient.kind {
                    GradientKind::Linear { start, end } => {
                        device.create_linear_gradient_brush(start, end, &gradient.stops)
                    }
                    GradientKind::Radial { center, focal, radius } => {
                        let offset = Point::new(focal.x - center.x, focal.y - center.y);
                        device.create_radial_gradient_brush(center, offset, radius, &gradient.stops)
                    }
                };
                match created {
                    Ok(fill) => self.fill = Some(fill),
                    Err(error) => tracing::error!("Failed to create gradient brush: {error}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCall, HandleKind, RecordingDevice};

    fn brush_creations(device: &RecordingDevice) -> usize {
        device
            .calls()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DeviceCall::CreateSolidBrush { .. }
                        | DeviceCall::CreateLinearGradient { .. }
                        | DeviceCall::CreateRadialGradient { .. }
                )
            })
            .count()
    }

    #[test]
    fn test_dash_patterns() {
        assert!(PenStyle::SolidLine.dashes().is_empty());
        assert_eq!(PenStyle::DashLine.dashes(), &[4.0, 2.0]);
        assert_eq!(PenStyle::DotLine.dashes(), &[1.0, 2.0]);
        assert_eq!(PenStyle::DashDotLine.dashes(), &[4.0, 2.0, 1.0, 2.0]);
        assert_eq!(PenStyle::DashDotDotLine.dashes(), &[4.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_cosmetic_width() {
        let pen = Pen::default();
        assert_eq!(pen.normalized_width(&Transform::identity()), 1.0);
        assert!((pen.normalized_width(&Transform::scale(4.0, 4.0)) - 0.25).abs() < 1e-12);
        assert_eq!(pen.clone().width(3.0).normalized_width(&Transform::scale(4.0, 4.0)), 3.0);
    }

    #[test]
    fn test_solid_recolor_keeps_identity() {
        let mut device = RecordingDevice::new(4, 4).unwrap();
        let mut cache = StyleCache::new(&mut device).unwrap();
        device.clear_log();

        cache.apply_brush(&mut device, &Brush::Solid(Color::RED));
        cache.apply_brush(&mut device, &Brush::Solid(Color::BLUE));
        assert_eq!(brush_creations(&device), 0);
        let set_colors = device
            .calls()
            .iter()
            .filter(|c| matches!(c, DeviceCall::SetBrushColor { .. }))
            .count();
        assert_eq!(set_colors, 2);
    }

    #[test]
    fn test_kind_changes_recreate() {
        let mut device = RecordingDevice::new(4, 4).unwrap();
        let mut cache = StyleCache::new(&mut device).unwrap();
        device.clear_log();

        let gradient = Gradient::linear(0.0, 0.0, 10.0, 0.0)
            .stop(0.0, Color::RED)
            .stop(1.0, Color::BLUE);
        cache.apply_brush(&mut device, &Brush::Gradient(gradient.clone()));
        assert_eq!(brush_creations(&device), 1);
        assert_eq!(cache.fill_kind(), FillKind::Gradient);

        // Gradient to gradient recreates too
        cache.apply_brush(&mut device, &Brush::Gradient(gradient));
        assert_eq!(brush_creations(&device), 2);

        cache.apply_brush(&mut device, &Brush::Solid(Color::GREEN));
        assert_eq!(brush_creations(&device), 3);
        assert_eq!(cache.fill_kind(), FillKind::Solid);

        // Old resource released before the new one is created
        let calls = device.calls();
        let release = calls
            .iter()
            .rposition(|c| matches!(c, DeviceCall::Release(HandleKind::Brush, _)))
            .unwrap();
        let create = calls
            .iter()
            .rposition(|c| matches!(c, DeviceCall::CreateSolidBrush { .. }))
            .unwrap();
        assert!(release < create);
    }

    #[test]
    fn test_radial_origin_offset() {
        let mut device = RecordingDevice::new(4, 4).unwrap();
        let mut cache = StyleCache::new(&mut device).unwrap();
        let gradient = Gradient::radial(Point::new(10.0, 10.0), 5.0, Point::new(12.0, 7.0)).stop(0.0, Color::RED);
        cache.apply_brush(&mut device, &Brush::Gradient(gradient));
        let offset = device.calls().iter().find_map(|c| match c {
            DeviceCall::CreateRadialGradient { origin_offset, .. } => Some(*origin_offset),
            _ => None,
        });
        assert_eq!(offset, Some(Point::new(2.0, -3.0)));
    }

    #[test]
    fn test_pen_recreates_stroke_style() {
        let mut device = RecordingDevice::new(4, 4).unwrap();
        let mut cache = StyleCache::new(&mut device).unwrap();
        device.clear_log();

        let pen = Pen::new(Color::RED).width(2.0).style(PenStyle::DashLine).cap(LineCap::Round);
        cache.apply_pen(&mut device, &pen, &Transform::identity());
        cache.apply_pen(&mut device, &pen, &Transform::identity());
        let dashes: Vec<_> = device
            .calls()
            .iter()
            .filter_map(|c| match c {
                DeviceCall::CreateStrokeStyle { dashes, properties, .. } => Some((dashes.clone(), properties.cap)),
                _ => None,
            })
            .collect();
        assert_eq!(dashes, vec![(vec![4.0, 2.0], LineCap::Round); 2]);
        assert_eq!(cache.line_width(), 2.0);

        // No pen leaves everything alone
        device.clear_log();
        cache.apply_pen(&mut device, &Pen::none(), &Transform::identity());
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_creation_failure_is_not_fatal() {
        let mut device = RecordingDevice::new(4, 4).unwrap();
        let mut cache = StyleCache::new(&mut device).unwrap();
        device.set_fail_resources(true);
        cache.apply_brush(&mut device, &Brush::Gradient(Gradient::linear(0.0, 0.0, 1.0, 1.0)));
        assert!(cache.fill().is_none());
        cache.apply_pen(&mut device, &Pen::default(), &Transform::identity());
        assert!(cache.stroke_style().is_none());
    }
}
