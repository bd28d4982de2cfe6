//! Render scheduling shared by every rendering area.
//!
//! `render_later` only marks the view dirty; [`MainArea::flush`] is the
//! frame boundary and issues at most one backend render however many
//! requests piled up before it.

use super::main::MainArea;
use crate::error::Result;

impl MainArea {
    /// Render immediately and clear any pending request.
    pub fn render(&mut self) -> Result<()> {
        self.render_pending = false;
        self.view.render()?;
        Ok(())
    }

    pub fn render_later(&mut self) {
        self.render_pending = true;
    }

    pub fn is_render_pending(&self) -> bool {
        self.render_pending
    }

    /// Run the pending render, if any. Returns whether a frame was drawn.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.render_pending {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Ask for continuous rendering under `key`.
    pub fn request_animation(&mut self, key: &str) {
        let Some(window) = self.view.render_window() else {
            tracing::warn!(key, "view has no render window, animation ignored");
            return;
        };
        window.request_animation(key);
        self.animations.insert(key.to_owned());
    }

    /// Stop continuous rendering under `key`. Unknown keys are a no-op.
    pub fn cancel_animation(&mut self, key: &str) -> bool {
        if !self.animations.remove(key) {
            tracing::trace!(key, "no animation to cancel");
            return false;
        }
        if let Some(window) = self.view.render_window() {
            window.cancel_animation(key);
        }
        true
    }

    pub fn animations(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(String::as_str)
    }
}
