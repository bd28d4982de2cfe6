//! Frontend core abstractions for Stratum.
//!
//! Defines the [`RenderBackend`] trait that abstracts over the 3D rendering
//! toolkit. The viewer only ever creates proxies, configures them and asks
//! them to render; how pixels are produced is the backend's business.
//! A recording [`headless::HeadlessBackend`] is provided for embedding
//! without a display and for tests.

pub mod headless;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Capture ──────────────────────────────────────────────────────

/// Result of capturing a render window: tightly packed RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CaptureResult {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }
}

// ── Errors ───────────────────────────────────────────────────────

/// Errors that can occur in backend operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("{kind} proxy does not support {operation}")]
    Unsupported {
        kind: String,
        operation: &'static str,
    },

    #[error("unknown proxy kind {category}/{kind}")]
    UnknownProxy { category: ProxyCategory, kind: String },

    #[error("backend is not ready")]
    NotReady,

    #[error("backend error: {0}")]
    Backend(String),
}

// ── Container ────────────────────────────────────────────────────

/// The element the view renders into, reduced to what the viewer touches:
/// an identifier and inline style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerElement {
    pub id: String,
    pub style: BTreeMap<String, String>,
}

impl ContainerElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: BTreeMap::new(),
        }
    }

    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_owned(), value.to_owned());
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }
}

// ── Proxies ──────────────────────────────────────────────────────

/// Proxy families understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyCategory {
    Views,
    Sources,
    Representations,
    Widgets,
}

impl fmt::Display for ProxyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Views => "Views",
            Self::Sources => "Sources",
            Self::Representations => "Representations",
            Self::Widgets => "Widgets",
        };
        f.write_str(name)
    }
}

/// Backend-assigned proxy identifier.
pub type ProxyId = u64;

/// Creation options for a proxy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyOptions {
    pub name: Option<String>,
    pub properties: BTreeMap<String, Value>,
}

impl ProxyOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_owned(), value.into());
        self
    }
}

/// Window that owns the GL/GPU surface of a view.
pub trait RenderWindow {
    /// Draw a frame now.
    fn render(&mut self) -> Result<(), FrontendError>;

    /// Ask for continuous frames under `key` until cancelled.
    fn request_animation(&mut self, key: &str);

    /// Stop continuous frames requested under `key`.
    fn cancel_animation(&mut self, key: &str);

    /// Read back the last frame.
    fn capture(&mut self) -> Result<CaptureResult, FrontendError>;
}

/// A configurable object living in the backend.
///
/// Operations a proxy kind does not support report
/// [`FrontendError::Unsupported`].
pub trait Proxy {
    fn id(&self) -> ProxyId;

    fn category(&self) -> ProxyCategory;

    fn kind(&self) -> &str;

    /// Set a named property (color map, visibility, opacity, ...).
    fn set_property(&mut self, key: &str, value: Value) -> Result<(), FrontendError>;

    fn set_container(&mut self, _container: &ContainerElement) -> Result<(), FrontendError> {
        Err(self.unsupported("setContainer"))
    }

    fn set_background(&mut self, _rgb: [f32; 3]) -> Result<(), FrontendError> {
        Err(self.unsupported("setBackground"))
    }

    /// Attach a representation to a view.
    fn add_representation(&mut self, _representation: ProxyId) -> Result<(), FrontendError> {
        Err(self.unsupported("addRepresentation"))
    }

    fn render_window(&mut self) -> Option<&mut dyn RenderWindow> {
        None
    }

    fn render(&mut self) -> Result<(), FrontendError> {
        match self.render_window() {
            Some(window) => window.render(),
            None => Err(self.unsupported("render")),
        }
    }

    #[doc(hidden)]
    fn unsupported(&self, operation: &'static str) -> FrontendError {
        FrontendError::Unsupported {
            kind: self.kind().to_owned(),
            operation,
        }
    }
}

// ── Backend trait ────────────────────────────────────────────────

/// Trait for 3D rendering toolkits driven by the viewer.
pub trait RenderBackend {
    /// Create a proxy of `kind` within `category`.
    fn create_proxy(
        &mut self,
        category: ProxyCategory,
        kind: &str,
        options: ProxyOptions,
    ) -> Result<Box<dyn Proxy>, FrontendError>;
}
