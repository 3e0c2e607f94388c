/// Decorative frame border: nested rounded layers drawn outside-in.
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderLayer {
    pub width: f32,
    pub color: Color,
}

impl BorderLayer {
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Border layers, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyle {
    pub layers: Vec<BorderLayer>,
    pub corner_radius: f32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            layers: vec![
                // walnut
                BorderLayer::new(14.0, Color::from_rgba8(0x3e, 0x27, 0x23, 0xff)),
                // gold accent
                BorderLayer::new(4.0, Color::from_rgba8(0xd4, 0xaf, 0x37, 0xff)),
                // mat
                BorderLayer::new(10.0, Color::from_rgba8(0xf5, 0xf0, 0xe1, 0xff)),
            ],
            corner_radius: 24.0,
        }
    }
}

impl BorderStyle {
    pub fn total_width(&self) -> f32 {
        self.layers.iter().map(|l| l.width).sum()
    }
}

/// Area left for content once the border is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inner {
    pub rect: Rect,
    pub radius: f32,
}

/// Draw `style` into `outer` and return the content area inside it.
/// Returns `None` when the layers leave no room.
pub fn draw_border(target: &mut Pixmap, outer: Rect, style: &BorderStyle) -> Option<Inner> {
    let mut rect = outer;
    let mut radius = style.corner_radius;

    for layer in &style.layers {
        if let Some(path) = rounded_rect(rect, radius) {
            let mut paint = Paint::default();
            paint.set_color(layer.color);
            paint.anti_alias = true;
            target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        rect = inset(rect, layer.width)?;
        radius = (radius - layer.width).max(0.0);
    }

    Some(Inner { rect, radius })
}

/// Shrink `rect` on every side; `None` once less than a pixel is left.
pub fn inset(rect: Rect, by: f32) -> Option<Rect> {
    Rect::from_ltrb(
        rect.left() + by,
        rect.top() + by,
        rect.right() - by,
        rect.bottom() - by,
    )
    .filter(|r| r.width() >= 1.0 && r.height() >= 1.0)
}

pub fn rounded_rect(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(0.0);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (l, t, rt, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.quad_to(rt, t, rt, t + r);
    pb.line_to(rt, b - r);
    pb.quad_to(rt, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.quad_to(l, b, l, b - r);
    pb.line_to(l, t + r);
    pb.quad_to(l, t, l + r, t);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_border_has_three_layers() {
        let style = BorderStyle::default();
        assert_eq!(style.layers.len(), 3);
        assert_eq!(style.total_width(), 28.0);
    }

    #[test]
    fn test_draw_border_returns_inner_area() {
        let mut pixmap = Pixmap::new(200, 200).unwrap();
        let outer = Rect::from_xywh(10.0, 10.0, 180.0, 180.0).unwrap();
        let inner = draw_border(&mut pixmap, outer, &BorderStyle::default()).unwrap();

        assert_eq!(inner.rect, Rect::from_ltrb(38.0, 38.0, 162.0, 162.0).unwrap());
        assert_eq!(inner.radius, 0.0);

        // Outer layer sits on the left edge, mat right before the content
        let walnut = pixmap.pixel(13, 100).unwrap();
        assert_eq!((walnut.red(), walnut.green(), walnut.blue()), (0x3e, 0x27, 0x23));
        let mat = pixmap.pixel(35, 100).unwrap();
        assert_eq!((mat.red(), mat.green(), mat.blue()), (0xf5, 0xf0, 0xe1));
    }

    #[test]
    fn test_border_too_wide_for_area() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let outer = Rect::from_xywh(0.0, 0.0, 40.0, 40.0).unwrap();
        assert!(draw_border(&mut pixmap, outer, &BorderStyle::default()).is_none());
    }

    #[test]
    fn test_inset_rejects_sub_pixel_area() {
        let rect = Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(inset(rect, 4.0).is_some());
        assert!(inset(rect, 4.6).is_none());
    }

    #[test]
    fn test_rounded_rect_without_radius_is_rect() {
        let rect = Rect::from_xywh(0.0, 0.0, 10.0, 5.0).unwrap();
        let path = rounded_rect(rect, 0.0).unwrap();
        assert_eq!(path.bounds(), rect);
    }
}
