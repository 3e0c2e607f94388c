/// Rendering engine — composites the framed picture onto a framebuffer using tiny-skia.
/// Everything drawn here is a pure function of the current image state and pause flag.
use anyhow::Result;
use std::path::Path;
use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, PathBuilder,
    Pixmap, PixmapPaint, Point, Rect, SpreadMode, Stroke, Transform,
};

use crate::error::SlideshowError;
use crate::media::source::ImageState;
use crate::render::border::{self, BorderStyle, Inner};

/// Frames per sweep of the loading pulse
const PULSE_FRAMES: u64 = 30;
const SHADOW_STEPS: u32 = 6;
/// Content areas smaller than this get no picture, placeholder or indicator
const MIN_CONTENT_PX: f32 = 8.0;
const MIN_PAUSE_RADIUS: f32 = 3.0;

/// What one frame shows
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub image: &'a ImageState,
    pub paused: bool,
}

pub struct FrameRenderer {
    framebuffer: Pixmap,
    border: BorderStyle,
    frame: u64,
}

impl FrameRenderer {
    pub fn new(width: u32, height: u32, border: BorderStyle) -> crate::error::Result<Self> {
        let framebuffer =
            Pixmap::new(width, height).ok_or(SlideshowError::Dimensions { width, height })?;
        Ok(Self {
            framebuffer,
            border,
            frame: 0,
        })
    }

    /// Outer bounds of the picture frame (border included)
    pub fn frame_rect(&self) -> Option<Rect> {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let margin = (w.min(h) * 0.06).round();
        Rect::from_ltrb(margin, margin, w - margin, h - margin)
    }

    /// Render a complete frame.
    pub fn render_frame(&mut self, view: &FrameView) -> &[u8] {
        let frame_rect = self.frame_rect();
        let fb = &mut self.framebuffer;

        draw_background(fb);

        if let Some(frame_rect) = frame_rect {
            draw_shadow(fb, frame_rect, self.border.corner_radius);
        }
        let inner = frame_rect
            .and_then(|rect| border::draw_border(fb, rect, &self.border))
            .filter(|inner| {
                inner.rect.width() >= MIN_CONTENT_PX && inner.rect.height() >= MIN_CONTENT_PX
            });

        if let Some(inner) = inner {
            match view.image {
                ImageState::Ready(pixmap) => draw_picture(fb, inner, pixmap),
                ImageState::Loading => draw_loading(fb, inner, self.frame),
                ImageState::Failed(_) => draw_failed(fb, inner),
            }
            if view.paused {
                draw_pause_indicator(fb, inner);
            }
        }

        self.frame += 1;
        self.framebuffer.data()
    }

    pub fn pixels(&self) -> &[u8] {
        self.framebuffer.data()
    }

    pub fn framebuffer(&self) -> &Pixmap {
        &self.framebuffer
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.framebuffer
            .save_png(path)
            .map_err(|e| anyhow::anyhow!("Failed to save PNG: {}", e))
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }
}

fn solid(r: u8, g: u8, b: u8, a: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn draw_background(fb: &mut Pixmap) {
    let (w, h) = (fb.width() as f32, fb.height() as f32);
    let mut paint = solid(0x1a, 0x1f, 0x3a, 0xff);
    if let Some(shader) = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(w, h),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(0x1a, 0x1f, 0x3a, 0xff)),
            GradientStop::new(1.0, Color::from_rgba8(0x4a, 0x2c, 0x6d, 0xff)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        paint.shader = shader;
    }
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) {
        fb.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Stacked translucent rounded rects, offset downward, approximating a blur.
fn draw_shadow(fb: &mut Pixmap, frame: Rect, radius: f32) {
    let paint = solid(0, 0, 0, 0x12);
    let offset = (frame.height() * 0.02).max(2.0);
    for step in 1..=SHADOW_STEPS {
        let spread = step as f32 * 2.0;
        let Some(rect) = Rect::from_ltrb(
            frame.left() - spread,
            frame.top() - spread + offset,
            frame.right() + spread,
            frame.bottom() + spread + offset,
        ) else {
            continue;
        };
        if let Some(path) = border::rounded_rect(rect, radius + spread) {
            fb.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

/// Scale `src_w`x`src_h` to cover `dst`, keeping aspect ratio and centring the overflow.
pub fn cover_transform(src_w: f32, src_h: f32, dst: Rect) -> Transform {
    let scale = (dst.width() / src_w).max(dst.height() / src_h);
    let tx = dst.left() + (dst.width() - src_w * scale) / 2.0;
    let ty = dst.top() + (dst.height() - src_h * scale) / 2.0;
    Transform::from_scale(scale, scale).post_translate(tx, ty)
}

fn draw_picture(fb: &mut Pixmap, inner: Inner, picture: &Pixmap) {
    let Some(clip_path) = border::rounded_rect(inner.rect, inner.radius) else {
        return;
    };
    let Some(mut clip) = Mask::new(fb.width(), fb.height()) else {
        return;
    };
    clip.fill_path(&clip_path, FillRule::Winding, true, Transform::identity());

    let transform = cover_transform(picture.width() as f32, picture.height() as f32, inner.rect);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    fb.draw_pixmap(0, 0, picture.as_ref(), &paint, transform, Some(&clip));
}

fn fill_inner(fb: &mut Pixmap, inner: Inner, paint: &Paint) {
    if let Some(path) = border::rounded_rect(inner.rect, inner.radius) {
        fb.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Neutral panel with a bar sweeping left to right.
fn draw_loading(fb: &mut Pixmap, inner: Inner, frame: u64) {
    fill_inner(fb, inner, &solid(0x2b, 0x2b, 0x2b, 0xff));

    let rect = inner.rect;
    let bar_w = rect.width() * 0.4;
    let bar_h = (rect.height() * 0.04).max(4.0);
    let phase = (frame % PULSE_FRAMES) as f32 / PULSE_FRAMES as f32;
    let x = rect.left() + phase * (rect.width() - bar_w);
    let y = rect.top() + (rect.height() - bar_h) / 2.0;
    if let Some(bar) = Rect::from_xywh(x, y, bar_w, bar_h) {
        fb.fill_rect(bar, &solid(0x9e, 0x9e, 0x9e, 0xff), Transform::identity(), None);
    }
}

/// Dark red panel with a cross.
fn draw_failed(fb: &mut Pixmap, inner: Inner) {
    fill_inner(fb, inner, &solid(0x4a, 0x14, 0x14, 0xff));

    let rect = inner.rect;
    let (cx, cy) = (
        rect.left() + rect.width() / 2.0,
        rect.top() + rect.height() / 2.0,
    );
    let half = rect.width().min(rect.height()) * 0.1;

    let mut pb = PathBuilder::new();
    pb.move_to(cx - half, cy - half);
    pb.line_to(cx + half, cy + half);
    pb.move_to(cx + half, cy - half);
    pb.line_to(cx - half, cy + half);
    if let Some(cross) = pb.finish() {
        let stroke = Stroke {
            width: (half * 0.3).max(2.0),
            ..Stroke::default()
        };
        fb.stroke_path(
            &cross,
            &solid(0xef, 0x9a, 0x9a, 0xff),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

/// Translucent disc with two bars, centred in the picture.
/// Bars are pixel-aligned and at least two pixels wide so small frames stay drawable.
fn draw_pause_indicator(fb: &mut Pixmap, inner: Inner) {
    let rect = inner.rect;
    let (cx, cy) = (
        rect.left() + rect.width() / 2.0,
        rect.top() + rect.height() / 2.0,
    );
    let radius = (rect.width().min(rect.height()) * 0.12).max(MIN_PAUSE_RADIUS);

    if let Some(disc) = PathBuilder::from_circle(cx, cy, radius) {
        fb.fill_path(
            &disc,
            &solid(0, 0, 0, 0x8c),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    let bar_w = (radius * 0.25).round().max(2.0);
    let bar_h = radius.round().max(2.0);
    let gap = (radius * 0.2).round().max(2.0);
    let top = (cy - bar_h / 2.0).round();
    let left = (cx - gap / 2.0).round() - bar_w;
    let bars = [left, left + bar_w + gap];

    let mut white = solid(0xff, 0xff, 0xff, 0xe6);
    white.anti_alias = false;
    for x in bars {
        if let Some(bar) = Rect::from_xywh(x, top, bar_w, bar_h) {
            fb.fill_rect(bar, &white, Transform::identity(), None);
        }
    }
}
