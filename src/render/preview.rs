use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Vec3};
use crate::foundation::error::{SceneError, SceneResult};
use crate::session::snapshot::FrameSnapshot;
use image::{ImageFormat, Rgba, RgbaImage};
use kurbo::{Circle, Point, Rect, Shape};
use std::path::Path;

const BACKGROUND: Color = Color::from_rgb_u32(0x0F172A);
const ATTRIBUTE_WIDTH_PX: f64 = 2.0;
const CONNECTION_WIDTH_PX: f64 = 1.5;
const MIN_MARKER_RADIUS_PX: f64 = 1.5;

/// Pinhole camera looking down -z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            fov_y_deg: 50.0,
        }
    }
}

impl Camera {
    fn focal_px(&self, canvas: Canvas) -> f64 {
        let half = (self.fov_y_deg.to_radians() / 2.0).tan();
        f64::from(canvas.height) / 2.0 / half
    }

    /// Screen point and pixels-per-unit at `p`, or `None` behind the camera.
    pub fn project(&self, p: Vec3, canvas: Canvas) -> Option<(Point, f64)> {
        let depth = self.position.z - p.z;
        if depth <= 1e-6 {
            return None;
        }
        let ppu = self.focal_px(canvas) / depth;
        let x = f64::from(canvas.width) / 2.0 + (p.x - self.position.x) * ppu;
        let y = f64::from(canvas.height) / 2.0 - (p.y - self.position.y) * ppu;
        Some((Point::new(x, y), ppu))
    }
}

/// Rasterize `snapshot` through the default camera.
pub fn render_preview(snapshot: &FrameSnapshot, canvas: Canvas) -> RgbaImage {
    render_preview_with(snapshot, canvas, &Camera::default())
}

/// Rasterize `snapshot` for a quick look. Orbs are flat shaded discs and lines are plain
/// anti-aliased strokes; the host renderer owns the real look.
pub fn render_preview_with(snapshot: &FrameSnapshot, canvas: Canvas, camera: &Camera) -> RgbaImage {
    let [r, g, b, a] = BACKGROUND.to_rgba8();
    let mut img = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([r, g, b, a]));

    if let Some(glow) = &snapshot.glow
        && let Some((center, _)) = camera.project(glow.position, canvas)
    {
        let radius = 0.35 * f64::from(canvas.width.min(canvas.height));
        fill_radial(&mut img, center, radius, glow.color, glow.intensity.clamp(0.0, 1.0) * 0.5);
    }

    for line in &snapshot.connections {
        stroke_line(
            &mut img,
            camera,
            canvas,
            line.start,
            line.end,
            CONNECTION_WIDTH_PX,
            line.color,
            line.dash,
        );
    }
    if let Some(attr) = &snapshot.attribute {
        stroke_line(
            &mut img,
            camera,
            canvas,
            attr.line.start,
            attr.line.end,
            ATTRIBUTE_WIDTH_PX,
            attr.line.color,
            None,
        );
        if let Some((center, ppu)) = camera.project(attr.line.end, canvas) {
            fill_disc(&mut img, Circle::new(center, attr.dot_radius * ppu), |_| {
                attr.line.color
            });
        }
    }

    let mut nodes: Vec<_> = snapshot.nodes.iter().collect();
    nodes.sort_by(|a, b| a.position.z.total_cmp(&b.position.z));
    for node in nodes {
        let Some((center, ppu)) = camera.project(node.position, canvas) else {
            continue;
        };
        let glow = (node.emissive_intensity * 0.5).clamp(0.0, 1.0);
        fill_disc(&mut img, Circle::new(center, node.scale * ppu), |n| {
            let shade = 1.0 - 0.35 * n * n;
            node.color.scaled(shade).mix(node.emissive, glow)
        });
    }

    if let Some(marker) = &snapshot.marker
        && let Some((center, ppu)) = camera.project(marker.position, canvas)
    {
        let radius = (marker.radius * ppu).max(MIN_MARKER_RADIUS_PX);
        fill_disc(&mut img, Circle::new(center, radius), |_| marker.color);
    }

    img
}

/// Write `img` as PNG, creating parent directories as needed.
pub fn write_png(img: &RgbaImage, path: impl AsRef<Path>) -> SceneResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            SceneError::render(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| SceneError::render(format!("write png '{}': {e}", path.display())))
}

fn pixel_span(bounds: Rect, img: &RgbaImage) -> (u32, u32, u32, u32) {
    let clamp = |v: f64, max: u32| v.floor().clamp(0.0, f64::from(max)) as u32;
    (
        clamp(bounds.x0, img.width()),
        clamp(bounds.y0, img.height()),
        clamp(bounds.x1 + 1.0, img.width()),
        clamp(bounds.y1 + 1.0, img.height()),
    )
}

/// Fill an anti-aliased disc. `shade` receives the normalized distance from the center (0..1).
fn fill_disc(img: &mut RgbaImage, circle: Circle, shade: impl Fn(f64) -> Color) {
    if circle.radius <= 0.0 {
        return;
    }
    let (x0, y0, x1, y1) = pixel_span(circle.bounding_box(), img);
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let d = (p - circle.center).hypot();
            let coverage = (circle.radius - d + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                let c = shade((d / circle.radius).min(1.0));
                blend(img, x, y, c, coverage * c.a);
            }
        }
    }
}

fn fill_radial(img: &mut RgbaImage, center: Point, radius: f64, color: Color, peak: f64) {
    let (x0, y0, x1, y1) = pixel_span(Circle::new(center, radius).bounding_box(), img);
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let n = (p - center).hypot() / radius;
            if n < 1.0 {
                let falloff = (1.0 - n) * (1.0 - n);
                blend(img, x, y, color, peak * falloff);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn stroke_line(
    img: &mut RgbaImage,
    camera: &Camera,
    canvas: Canvas,
    start: Vec3,
    end: Vec3,
    width_px: f64,
    color: Color,
    dash: Option<(f64, f64)>,
) {
    let (Some((a, _)), Some((b, _))) = (camera.project(start, canvas), camera.project(end, canvas))
    else {
        return;
    };
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 <= f64::EPSILON {
        return;
    }
    let world_len = start.distance(end);
    let half = width_px / 2.0;
    let bounds = Rect::from_points(a, b).inflate(half + 1.0, half + 1.0);
    let (x0, y0, x1, y1) = pixel_span(bounds, img);

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
            let d = (p - (a + ab * t)).hypot();
            let coverage = (half - d + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            if let Some((on, off)) = dash
                && on + off > 0.0
                && (t * world_len) % (on + off) >= on
            {
                continue;
            }
            blend(img, x, y, color, coverage * color.a);
        }
    }
}

fn blend(img: &mut RgbaImage, x: u32, y: u32, color: Color, alpha: f64) {
    let alpha = alpha.clamp(0.0, 1.0);
    let px = img.get_pixel_mut(x, y);
    let [r, g, b, _] = color.to_rgba8();
    for (dst, src) in px.0.iter_mut().zip([r, g, b]) {
        let v = f64::from(*dst) * (1.0 - alpha) + f64::from(src) * alpha;
        *dst = v.round().clamp(0.0, 255.0) as u8;
    }
    px.0[3] = 255;
}
