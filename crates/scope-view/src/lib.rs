// SPDX-License-Identifier: MIT
//
// scope-view: the data-facing half of termscope.
//
// Everything above the framebuffer lives here: eased animation scalars,
// 2D pan/zoom viewports, the 3D camera, scrolling sample series with nice
// axis autoscaling, the plotters that turn series into canvas primitives,
// and the viewers that couple all of it to a data stream and a key map.

pub mod anim;
pub mod camera;
pub mod plotters;
pub mod registry;
pub mod series;
pub mod viewer;
pub mod viewport;

pub use anim::Animated;
pub use camera::Camera;
pub use plotters::{AnglePlotter, PlotBounds, ScopePlotter};
pub use registry::{ViewError, ViewerRegistry};
pub use series::{ScopeSeries, nice_bound};
pub use viewer::{
    Cloud3dViewer, Decode, DialViewer, DrawCommand, Message, PassthroughDecoder, ScanDecoder,
    ScopeViewer, Space2dViewer, Viewer,
};
pub use viewport::Viewport;
