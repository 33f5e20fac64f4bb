// SPDX-License-Identifier: MIT
//
// Viewers — the glue between a data stream, a viewport, and a canvas.
//
// A viewer owns its canvas outright. Data arrives through `update` from
// any thread (the caller serializes access); only the host loop calls
// `draw`. Message delivery is intentionally lossy: one latest-message
// slot, overwritten on every arrival, so the screen always shows the
// newest state and never works through a backlog.
//
// Geometry decoding is a capability, not a closure: a `Decode`
// implementation turns a message into screen-agnostic draw commands,
// which Space2dViewer then projects through its viewport. Undecodable
// data skips that frame's render and keeps the process alive.

use std::time::{Duration, Instant};

use scope_canvas::{Canvas, CanvasError, KeyToken, PixelPoint, Rgb};

use crate::camera::Camera;
use crate::plotters::{AnglePlotter, PlotBounds, ScopePlotter};
use crate::viewport::Viewport;

/// How often a viewer re-queries the terminal shape inside `draw`.
const SHAPE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Scrolling window width for the scope-style viewers.
const SERIES_CAPACITY: usize = 256;

/// World half-length of the axis cross drawn under scan geometry.
const AXIS_EXTENT: f64 = 1.0;

const AXIS_COLOR: Rgb = Rgb::new(90, 90, 90);
const SCAN_COLOR: Rgb = Rgb::GREEN;

// ─── Messages and decoding ───────────────────────────────────────────────────

/// Data from the external message source, in engine terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A single scalar sample.
    Scalar(f64),
    /// An orientation in radians.
    Angle(f64),
    /// A planar range scan in polar form.
    Scan {
        angle_min: f64,
        angle_increment: f64,
        ranges: Vec<f64>,
    },
    /// Loose 2D points in world coordinates.
    Points2(Vec<[f64; 2]>),
    /// A 3D point cloud.
    Cloud(Vec<[f32; 3]>),
}

impl Message {
    /// Short tag for log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Angle(_) => "angle",
            Self::Scan { .. } => "scan",
            Self::Points2(_) => "points2",
            Self::Cloud(_) => "cloud",
        }
    }
}

/// Screen-agnostic geometry produced by a decoder, consumed by
/// [`Space2dViewer`] through its viewport projection.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Points(Vec<[f64; 2]>, Rgb),
    Line([f64; 2], [f64; 2], Rgb),
}

/// Message-to-geometry capability. One implementation per message
/// family.
pub trait Decode: Send {
    /// `None` means the message cannot be decoded by this strategy; the
    /// viewer skips the frame rather than failing.
    fn decode(&self, message: &Message) -> Option<Vec<DrawCommand>>;
}

/// Polar range scans → cartesian points plus an origin axis cross.
pub struct ScanDecoder;

impl Decode for ScanDecoder {
    fn decode(&self, message: &Message) -> Option<Vec<DrawCommand>> {
        let Message::Scan {
            angle_min,
            angle_increment,
            ranges,
        } = message
        else {
            return None;
        };

        let mut points = Vec::with_capacity(ranges.len());
        for (i, &range) in ranges.iter().enumerate() {
            if !range.is_finite() || range <= 0.0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let angle = angle_min + i as f64 * angle_increment;
            points.push([range * angle.cos(), range * angle.sin()]);
        }

        Some(vec![
            DrawCommand::Line([-AXIS_EXTENT, 0.0], [AXIS_EXTENT, 0.0], AXIS_COLOR),
            DrawCommand::Line([0.0, -AXIS_EXTENT], [0.0, AXIS_EXTENT], AXIS_COLOR),
            DrawCommand::Points(points, SCAN_COLOR),
        ])
    }
}

/// Pre-projected 2D points, passed straight through.
pub struct PassthroughDecoder;

impl Decode for PassthroughDecoder {
    fn decode(&self, message: &Message) -> Option<Vec<DrawCommand>> {
        match message {
            Message::Points2(points) => {
                Some(vec![DrawCommand::Points(points.clone(), Rgb::WHITE)])
            }
            _ => None,
        }
    }
}

// ─── Viewer trait ────────────────────────────────────────────────────────────

/// A data viewer: the host loop's only handle on a display.
pub trait Viewer: Send {
    /// Deliver the latest message. Lossy: overwrites any unconsumed
    /// previous message.
    fn update(&mut self, message: Message);

    /// Apply a key token. Unhandled tokens are ignored.
    fn keypress(&mut self, key: KeyToken);

    /// Render one frame. Called by the host loop only.
    ///
    /// # Errors
    ///
    /// Returns an error only when writing the frame to the terminal
    /// fails.
    fn draw(&mut self) -> Result<(), CanvasError>;
}

/// Shape re-query debounce shared by all viewers.
#[derive(Debug)]
struct ShapeDebounce {
    last: Instant,
}

impl ShapeDebounce {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= SHAPE_DEBOUNCE {
            self.last = now;
            true
        } else {
            false
        }
    }
}

// ─── ScopeViewer ─────────────────────────────────────────────────────────────

/// Scrolling autoscaled plot of a scalar stream.
pub struct ScopeViewer {
    canvas: Canvas,
    plotter: ScopePlotter,
    latest: Option<f64>,
    shape: ShapeDebounce,
}

impl ScopeViewer {
    #[must_use]
    pub fn new(canvas: Canvas, title: Option<String>) -> Self {
        let mut plotter = ScopePlotter::new(SERIES_CAPACITY, PlotBounds::full(canvas.pixel_size()));
        if let Some(title) = title {
            plotter = plotter.with_title(title);
        }
        Self {
            canvas,
            plotter,
            latest: None,
            shape: ShapeDebounce::new(),
        }
    }

    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Viewer for ScopeViewer {
    fn update(&mut self, message: Message) {
        match message {
            Message::Scalar(v) => self.latest = Some(v),
            other => log::warn!("scope viewer cannot display {} data", other.kind()),
        }
    }

    fn keypress(&mut self, _key: KeyToken) {}

    fn draw(&mut self) -> Result<(), CanvasError> {
        let now = Instant::now();
        if self.shape.due(now) && self.canvas.update_shape() {
            self.plotter
                .set_bounds(PlotBounds::full(self.canvas.pixel_size()));
        }
        if let Some(v) = self.latest.take() {
            self.plotter.update(v);
        }
        self.canvas.clear();
        self.plotter.plot(&mut self.canvas);
        self.canvas.draw()
    }
}

// ─── DialViewer ──────────────────────────────────────────────────────────────

/// Angle stream as a dial gauge plus a scrolling history plot.
pub struct DialViewer {
    canvas: Canvas,
    dial: AnglePlotter,
    history: ScopePlotter,
    angle: f64,
    latest: Option<f64>,
    shape: ShapeDebounce,
}

impl DialViewer {
    #[must_use]
    pub fn new(canvas: Canvas, title: Option<String>) -> Self {
        let (dial_bounds, history_bounds) = Self::layout(canvas.pixel_size());
        let mut dial = AnglePlotter::new(dial_bounds);
        if let Some(title) = title {
            dial = dial.with_title(title);
        }
        Self {
            canvas,
            dial,
            history: ScopePlotter::new(SERIES_CAPACITY, history_bounds)
                .with_range(-std::f64::consts::PI, std::f64::consts::PI),
            angle: 0.0,
            latest: None,
            shape: ShapeDebounce::new(),
        }
    }

    /// Dial on the left half, history on the right.
    fn layout(pixel_shape: (u32, u32)) -> (PlotBounds, PlotBounds) {
        let full = PlotBounds::full(pixel_shape);
        let split = full.width() / 2;
        (
            PlotBounds {
                right: split,
                ..full
            },
            PlotBounds {
                left: split,
                ..full
            },
        )
    }

    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Viewer for DialViewer {
    fn update(&mut self, message: Message) {
        match message {
            Message::Angle(a) => self.latest = Some(a),
            other => log::warn!("dial viewer cannot display {} data", other.kind()),
        }
    }

    fn keypress(&mut self, _key: KeyToken) {}

    fn draw(&mut self) -> Result<(), CanvasError> {
        let now = Instant::now();
        if self.shape.due(now) && self.canvas.update_shape() {
            let (dial_bounds, history_bounds) = Self::layout(self.canvas.pixel_size());
            self.dial.set_bounds(dial_bounds);
            self.history.set_bounds(history_bounds);
        }
        if let Some(a) = self.latest.take() {
            self.angle = a;
            self.history.update(a);
        }
        self.canvas.clear();
        self.dial.plot(&mut self.canvas, self.angle);
        self.history.plot(&mut self.canvas);
        self.canvas.draw()
    }
}

// ─── Space2dViewer ───────────────────────────────────────────────────────────

/// Pannable, zoomable 2D view over any [`Decode`] strategy.
pub struct Space2dViewer {
    canvas: Canvas,
    viewport: Viewport,
    decoder: Box<dyn Decode>,
    commands: Vec<DrawCommand>,
    latest: Option<Message>,
    shape: ShapeDebounce,
}

impl Space2dViewer {
    #[must_use]
    pub fn new(canvas: Canvas, decoder: Box<dyn Decode>) -> Self {
        Self {
            canvas,
            viewport: Viewport::new(5.0),
            decoder,
            commands: Vec::new(),
            latest: None,
            shape: ShapeDebounce::new(),
        }
    }

    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Viewer for Space2dViewer {
    fn update(&mut self, message: Message) {
        self.latest = Some(message);
    }

    fn keypress(&mut self, key: KeyToken) {
        self.viewport.keypress(key, Instant::now());
    }

    fn draw(&mut self) -> Result<(), CanvasError> {
        let now = Instant::now();
        if self.shape.due(now) {
            self.canvas.update_shape();
        }
        self.viewport.advance(now);

        if let Some(message) = self.latest.take() {
            match self.decoder.decode(&message) {
                Some(commands) => self.commands = commands,
                None => {
                    // Recoverable: keep the previous frame on screen.
                    log::warn!("cannot decode {} data; skipping frame", message.kind());
                    return Ok(());
                }
            }
        }

        self.canvas.clear();
        let shape = self.canvas.pixel_size();
        for command in &self.commands {
            match command {
                DrawCommand::Points(points, color) => {
                    self.canvas.set_color(*color);
                    for &p in points {
                        if let Some(px) = self.viewport.project(p, shape) {
                            self.canvas.point(px, false);
                        }
                    }
                }
                DrawCommand::Line(a, b, color) => {
                    self.canvas.set_color(*color);
                    if let (Some(pa), Some(pb)) = (
                        self.viewport.project(*a, shape),
                        self.viewport.project(*b, shape),
                    ) {
                        self.canvas.line(pa, pb);
                    }
                }
            }
        }
        self.canvas.draw()
    }
}

// ─── Cloud3dViewer ───────────────────────────────────────────────────────────

/// 3D point cloud through the orbit camera, depth-shaded.
pub struct Cloud3dViewer {
    canvas: Canvas,
    camera: Camera,
    cloud: Vec<[f32; 3]>,
    latest: Option<Vec<[f32; 3]>>,
    shape: ShapeDebounce,
}

impl Cloud3dViewer {
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            camera: Camera::new(),
            cloud: Vec::new(),
            latest: None,
            shape: ShapeDebounce::new(),
        }
    }

    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub const fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

impl Viewer for Cloud3dViewer {
    fn update(&mut self, message: Message) {
        match message {
            Message::Cloud(points) => self.latest = Some(points),
            other => log::warn!("cloud viewer cannot display {} data", other.kind()),
        }
    }

    fn keypress(&mut self, key: KeyToken) {
        self.camera.keypress(key, Instant::now());
    }

    fn draw(&mut self) -> Result<(), CanvasError> {
        let now = Instant::now();
        if self.shape.due(now) {
            self.canvas.update_shape();
        }
        self.camera.advance(now);

        if let Some(points) = self.latest.take() {
            self.cloud = points;
        }

        self.canvas.clear();
        let shape = self.canvas.pixel_size();
        let mut pixels: Vec<PixelPoint> = Vec::with_capacity(self.cloud.len());
        let mut colors: Vec<Rgb> = Vec::with_capacity(self.cloud.len());
        for &[x, y, z] in &self.cloud {
            let world = [f64::from(x), f64::from(y), f64::from(z)];
            if let Some((px, color)) = self.camera.project(world, shape) {
                pixels.push(px);
                colors.push(color);
            }
        }
        self.canvas.points(&pixels, Some(&colors), false);
        self.canvas.draw()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
