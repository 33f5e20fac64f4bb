// SPDX-License-Identifier: MIT
//
// Viewer registry — type tag to viewer factory, resolved once at startup.

use scope_canvas::Canvas;
use thiserror::Error;

use crate::viewer::{
    Cloud3dViewer, DialViewer, PassthroughDecoder, ScanDecoder, ScopeViewer, Space2dViewer, Viewer,
};

/// Builds a viewer around a freshly constructed canvas.
pub type ViewerFactory = fn(Canvas, Option<String>) -> Box<dyn Viewer>;

/// Startup errors from viewer selection.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The requested type tag has no registered factory.
    #[error("unknown viewer kind '{kind}'; valid kinds are: {known}")]
    UnknownKind { kind: String, known: String },
}

/// Maps type tags to viewer factories.
pub struct ViewerRegistry {
    entries: Vec<(&'static str, ViewerFactory)>,
}

impl ViewerRegistry {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The registry with every built-in viewer.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("scalar", |canvas, title| {
            Box::new(ScopeViewer::new(canvas, title))
        });
        registry.register("angle", |canvas, title| {
            Box::new(DialViewer::new(canvas, title))
        });
        registry.register("scan", |canvas, _| {
            Box::new(Space2dViewer::new(canvas, Box::new(ScanDecoder)))
        });
        registry.register("points2", |canvas, _| {
            Box::new(Space2dViewer::new(canvas, Box::new(PassthroughDecoder)))
        });
        registry.register("cloud", |canvas, _| Box::new(Cloud3dViewer::new(canvas)));
        registry
    }

    /// Register (or override) a factory for a tag.
    pub fn register(&mut self, tag: &'static str, factory: ViewerFactory) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == tag) {
            entry.1 = factory;
        } else {
            self.entries.push((tag, factory));
        }
    }

    /// All registered tags, in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(tag, _)| *tag).collect()
    }

    /// Build the viewer for `kind`, consuming the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::UnknownKind`] (listing the valid tags) when
    /// no factory matches.
    pub fn create(
        &self,
        kind: &str,
        canvas: Canvas,
        title: Option<String>,
    ) -> Result<Box<dyn Viewer>, ViewError> {
        match self.entries.iter().find(|(tag, _)| *tag == kind) {
            Some((_, factory)) => Ok(factory(canvas, title)),
            None => Err(ViewError::UnknownKind {
                kind: kind.to_owned(),
                known: self.kinds().join(", "),
            }),
        }
    }
}

impl Default for ViewerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
