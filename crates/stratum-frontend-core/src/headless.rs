//! Recording backend without a display.
//!
//! Every backend operation is appended to a shared [`CallLog`] so a host (or
//! a test) can observe exactly what the viewer asked the renderer to do.
//! Captures return a frame filled with the view's background color.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    CaptureResult, ContainerElement, FrontendError, Proxy, ProxyCategory, ProxyId, ProxyOptions,
    RenderBackend, RenderWindow,
};

/// Default capture size when the view was created without a `size` option.
const DEFAULT_SIZE: (u32, u32) = (300, 300);

/// One recorded backend operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateProxy {
        id: ProxyId,
        category: ProxyCategory,
        kind: String,
        name: Option<String>,
    },
    SetProperty {
        proxy: ProxyId,
        key: String,
        value: Value,
    },
    SetContainer {
        view: ProxyId,
        container: String,
    },
    SetBackground {
        view: ProxyId,
        rgb: [f32; 3],
    },
    AddRepresentation {
        view: ProxyId,
        representation: ProxyId,
    },
    Render {
        view: ProxyId,
    },
    RequestAnimation {
        view: ProxyId,
        key: String,
    },
    CancelAnimation {
        view: ProxyId,
        key: String,
    },
    Capture {
        view: ProxyId,
    },
}

/// Shared, cloneable log of backend calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl CallLog {
    fn push(&self, call: BackendCall) {
        tracing::trace!(?call, "headless backend");
        self.calls.lock().push(call);
    }

    /// Copy of all calls so far.
    pub fn snapshot(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| matches(call)).count()
    }

    pub fn renders(&self) -> usize {
        self.count(|call| matches!(call, BackendCall::Render { .. }))
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Backend that records instead of drawing.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: ProxyId,
    log: CallLog,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the call log; stays valid after the backend is moved.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_proxy(
        &mut self,
        category: ProxyCategory,
        kind: &str,
        options: ProxyOptions,
    ) -> Result<Box<dyn Proxy>, FrontendError> {
        if kind.is_empty() {
            return Err(FrontendError::UnknownProxy {
                category,
                kind: kind.to_owned(),
            });
        }
        self.next_id += 1;
        let id = self.next_id;
        self.log.push(BackendCall::CreateProxy {
            id,
            category,
            kind: kind.to_owned(),
            name: options.name.clone(),
        });

        let size = options
            .properties
            .get("size")
            .and_then(|size| {
                let width = size.get(0)?.as_u64()?;
                let height = size.get(1)?.as_u64()?;
                Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
            })
            .unwrap_or(DEFAULT_SIZE);

        Ok(Box::new(HeadlessProxy {
            id,
            category,
            kind: kind.to_owned(),
            properties: options.properties,
            background: [0.0; 3],
            size,
            animations: HashSet::new(),
            log: self.log.clone(),
        }))
    }
}

/// Proxy created by [`HeadlessBackend`].
#[derive(Debug)]
pub struct HeadlessProxy {
    id: ProxyId,
    category: ProxyCategory,
    kind: String,
    properties: BTreeMap<String, Value>,
    background: [f32; 3],
    size: (u32, u32),
    animations: HashSet<String>,
    log: CallLog,
}

impl HeadlessProxy {
    fn is_view(&self) -> bool {
        self.category == ProxyCategory::Views
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl Proxy for HeadlessProxy {
    fn id(&self) -> ProxyId {
        self.id
    }

    fn category(&self) -> ProxyCategory {
        self.category
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), FrontendError> {
        self.log.push(BackendCall::SetProperty {
            proxy: self.id,
            key: key.to_owned(),
            value: value.clone(),
        });
        self.properties.insert(key.to_owned(), value);
        Ok(())
    }

    fn set_container(&mut self, container: &ContainerElement) -> Result<(), FrontendError> {
        if !self.is_view() {
            return Err(self.unsupported("setContainer"));
        }
        self.log.push(BackendCall::SetContainer {
            view: self.id,
            container: container.id.clone(),
        });
        Ok(())
    }

    fn set_background(&mut self, rgb: [f32; 3]) -> Result<(), FrontendError> {
        if !self.is_view() {
            return Err(self.unsupported("setBackground"));
        }
        self.background = rgb;
        self.log.push(BackendCall::SetBackground { view: self.id, rgb });
        Ok(())
    }

    fn add_representation(&mut self, representation: ProxyId) -> Result<(), FrontendError> {
        if !self.is_view() {
            return Err(self.unsupported("addRepresentation"));
        }
        self.log.push(BackendCall::AddRepresentation {
            view: self.id,
            representation,
        });
        Ok(())
    }

    fn render_window(&mut self) -> Option<&mut dyn RenderWindow> {
        if self.is_view() {
            Some(self as &mut dyn RenderWindow)
        } else {
            None
        }
    }
}

impl RenderWindow for HeadlessProxy {
    fn render(&mut self) -> Result<(), FrontendError> {
        self.log.push(BackendCall::Render { view: self.id });
        Ok(())
    }

    fn request_animation(&mut self, key: &str) {
        self.animations.insert(key.to_owned());
        self.log.push(BackendCall::RequestAnimation {
            view: self.id,
            key: key.to_owned(),
        });
    }

    fn cancel_animation(&mut self, key: &str) {
        self.animations.remove(key);
        self.log.push(BackendCall::CancelAnimation {
            view: self.id,
            key: key.to_owned(),
        });
    }

    fn capture(&mut self) -> Result<CaptureResult, FrontendError> {
        self.log.push(BackendCall::Capture { view: self.id });
        let (width, height) = self.size;
        let [r, g, b] = self.background.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let pixels = [r, g, b, 255].repeat(width as usize * height as usize);
        Ok(CaptureResult::new(pixels, width, height))
    }
}
