//! IPC message contract between the viewer and the embedding page.
//!
//! Inbound messages are viewer commands (`stratum_machine::ViewerEvent`)
//! posted verbatim. Outbound messages follow the same
//! `#[serde(tag = "type", content = "data")]` shape.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use stratum_core::UiToggles;
use stratum_frontend_core::CaptureResult;
use stratum_machine::Notification;

use crate::ws_bridge::BridgeError;

/// Messages from the viewer to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewerToUi {
    /// Initial state sync when the page connects.
    Initialize {
        toggles: UiToggles,
        background_color: [f32; 3],
        background_dark: bool,
        layers: Vec<String>,
    },

    ImageAssigned { name: String },

    LabelImageAssigned { name: String },

    BackgroundColorChanged { rgb: [f32; 3] },

    /// Screenshot encoded as PNG.
    ScreenshotTaken {
        png_base64: String,
        width: u32,
        height: u32,
    },

    /// A command was rejected or failed.
    Error { message: String },
}

impl ViewerToUi {
    pub fn from_notification(notification: Notification) -> Result<Self, BridgeError> {
        Ok(match notification {
            Notification::ImageAssigned(name) => Self::ImageAssigned { name },
            Notification::LabelImageAssigned(name) => Self::LabelImageAssigned { name },
            Notification::BackgroundColorChanged(rgb) => Self::BackgroundColorChanged { rgb },
            Notification::ScreenshotTaken(capture) => {
                let (width, height) = capture.size();
                Self::ScreenshotTaken {
                    png_base64: encode_png(capture)?,
                    width,
                    height,
                }
            }
        })
    }
}

fn encode_png(capture: CaptureResult) -> Result<String, BridgeError> {
    let (width, height) = capture.size();
    let frame = image::RgbaImage::from_raw(width, height, capture.into_rgba())
        .ok_or(BridgeError::FrameSize { width, height })?;
    let mut png = Cursor::new(Vec::new());
    frame.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(STANDARD.encode(png.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_serialize_with_type_tag() {
        let msg = ViewerToUi::from_notification(Notification::ImageAssigned("ct".into())).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "IMAGE_ASSIGNED");
        assert_eq!(json["data"]["name"], "ct");
    }

    #[test]
    fn screenshot_is_png_encoded() {
        let capture = CaptureResult::new(vec![255, 0, 0, 255], 1, 1);
        let msg = ViewerToUi::from_notification(Notification::ScreenshotTaken(capture)).unwrap();
        let ViewerToUi::ScreenshotTaken { png_base64, width, height } = msg else {
            panic!("expected a screenshot message");
        };
        assert_eq!((width, height), (1, 1));
        let png = STANDARD.decode(png_base64).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let capture = CaptureResult::new(vec![0; 3], 1, 1);
        let err = ViewerToUi::from_notification(Notification::ScreenshotTaken(capture));
        assert!(matches!(err, Err(BridgeError::FrameSize { width: 1, height: 1 })));
    }
}
