use stratum_core::scene::{DataArray, DataLocation, DatasetKind, DatasetSummary};
use stratum_core::{ComponentType, CoreError, ImageDescriptor, LabelImageDescriptor, LayerType};
use stratum_frontend_core::headless::{BackendCall, CallLog, HeadlessBackend};
use stratum_machine::{
    MachineError, Notification, ViewerEvent, ViewerMachine, ViewerOptions, ViewerState,
};
use tokio::sync::mpsc;

struct Harness {
    viewer: ViewerMachine<HeadlessBackend>,
    notifications: mpsc::UnboundedReceiver<Notification>,
    log: CallLog,
}

impl Harness {
    fn start(options: ViewerOptions) -> Self {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        let (tx, notifications) = mpsc::unbounded_channel();
        let mut viewer = ViewerMachine::new(options, backend, tx);
        viewer.start().expect("viewer should start");
        Self {
            viewer,
            notifications,
            log,
        }
    }

    fn drain_notifications(&mut self) -> Vec<Notification> {
        std::iter::from_fn(|| self.notifications.try_recv().ok()).collect()
    }
}

fn image(name: &str, components: usize, component_type: ComponentType) -> ViewerEvent {
    ViewerEvent::AddImage(ImageDescriptor::new(name, components, component_type))
}

#[test]
fn start_styles_container_and_activates() {
    let harness = Harness::start(ViewerOptions::default());
    let viewer = &harness.viewer;
    assert_eq!(viewer.state(), ViewerState::Active);
    assert_eq!(viewer.container().style("position"), Some("relative"));
    assert_eq!(viewer.container().style("min-width"), Some("450px"));
    assert_eq!(viewer.container().style("overflow"), Some("hidden"));
    assert!(viewer.scene().is_background_dark());
    assert!(viewer.ui_toggles().unwrap().dark_mode);
}

#[test]
fn same_declared_name_yields_unique_layers() {
    let mut harness = Harness::start(ViewerOptions::default());
    for _ in 0..3 {
        harness.viewer.send(image("ct", 1, ComponentType::Int16)).unwrap();
    }
    let assigned: Vec<String> = harness
        .drain_notifications()
        .into_iter()
        .filter_map(|n| match n {
            Notification::ImageAssigned(name) => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(assigned, ["ct", "ct-1", "ct-2"]);

    let layers = harness.viewer.layers().unwrap();
    assert_eq!(layers.layer_names(), ["ct", "ct-1", "ct-2"]);
    assert_eq!(harness.viewer.datasets().images.len(), 3);
    assert!(!harness.viewer.is_loading());
}

#[test]
fn select_layer_routes_to_layers_and_updates_selection() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(image("a", 1, ComponentType::Float32)).unwrap();
    harness.viewer.send(image("b", 1, ComponentType::Float32)).unwrap();
    harness
        .viewer
        .send(ViewerEvent::SelectLayer("a".into()))
        .unwrap();

    let layers = harness.viewer.layers().unwrap();
    assert_eq!(layers.selected_image().as_deref(), Some("a"));
    assert!(layers.actor("a").unwrap().is_selected());
    assert!(!layers.actor("b").unwrap().is_selected());
    let rendering = harness.viewer.rendering().unwrap();
    assert_eq!(rendering.widgets().target(), Some("a"));
}

#[test]
fn selecting_another_layer_clears_previous_actor() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(image("a", 1, ComponentType::Float32)).unwrap();
    harness.viewer.send(image("b", 1, ComponentType::Float32)).unwrap();
    for name in ["a", "b"] {
        harness
            .viewer
            .send(ViewerEvent::SelectLayer(name.into()))
            .unwrap();
    }

    let layers = harness.viewer.layers().unwrap();
    assert_eq!(layers.selected_image().as_deref(), Some("b"));
    assert!(!layers.actor("a").unwrap().is_selected());
    assert!(layers.actor("b").unwrap().is_selected());
}

#[test]
fn label_image_is_announced_and_fused() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness
        .viewer
        .send(ViewerEvent::AddLabelImage(LabelImageDescriptor {
            label_image: ImageDescriptor::new("seg", 1, ComponentType::UInt8),
        }))
        .unwrap();
    let notifications = harness.drain_notifications();
    assert!(matches!(
        notifications.as_slice(),
        [Notification::LabelImageAssigned(name)] if name == "seg"
    ));
    let layers = harness.viewer.layers().unwrap();
    assert_eq!(layers.layer_type("seg"), Some(LayerType::LabelImage));
    assert_eq!(layers.label_image().as_deref(), Some("seg"));
    assert!(harness.log.snapshot().iter().any(|call| matches!(
        call,
        BackendCall::CreateProxy { kind, .. } if kind == "LabelMap"
    )));
}

#[test]
fn events_before_start_are_rejected() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut viewer = ViewerMachine::new(ViewerOptions::default(), HeadlessBackend::new(), tx);
    let err = viewer.send(ViewerEvent::TakeScreenshot).unwrap_err();
    assert!(matches!(
        err,
        MachineError::UnexpectedEvent {
            machine: "viewer",
            state: "idle",
            event: "TAKE_SCREENSHOT",
        }
    ));
}

#[test]
fn events_after_stop_are_rejected() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.stop();
    let err = harness
        .viewer
        .send(ViewerEvent::ToggleDarkMode)
        .unwrap_err();
    assert!(matches!(
        err,
        MachineError::UnexpectedEvent { state: "stopped", .. }
    ));
    assert!(harness.viewer.start().is_err());
}

#[test]
fn unknown_json_command_is_rejected() {
    let mut harness = Harness::start(ViewerOptions::default());
    let err = harness
        .viewer
        .send_json(r#"{"type":"REMOVE_LAYER","data":"ct"}"#)
        .unwrap_err();
    assert!(matches!(err, MachineError::UnknownEvent(_)));

    harness
        .viewer
        .send_json(r#"{"type":"TOGGLE_UI_COLLAPSED"}"#)
        .unwrap();
    assert!(harness.viewer.ui_toggles().unwrap().collapsed);
}

#[test]
fn background_change_is_rendered_once_and_announced() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.log.clear();
    harness
        .viewer
        .send(ViewerEvent::SetBackgroundColor([1.0, 1.0, 0.5]))
        .unwrap();

    assert_eq!(harness.log.renders(), 1);
    assert!(!harness.viewer.scene().is_background_dark());
    let notifications = harness.drain_notifications();
    assert!(matches!(
        notifications.as_slice(),
        [Notification::BackgroundColorChanged(rgb)] if *rgb == [1.0, 1.0, 0.5]
    ));
}

#[test]
fn screenshot_reaches_the_embedder() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(ViewerEvent::TakeScreenshot).unwrap();
    let notifications = harness.drain_notifications();
    let [Notification::ScreenshotTaken(capture)] = notifications.as_slice() else {
        panic!("expected a screenshot, got {notifications:?}");
    };
    assert_eq!(capture.size(), (300, 300));
    assert_eq!(
        harness
            .log
            .count(|call| matches!(call, BackendCall::Capture { .. })),
        1
    );
}

#[test]
fn interpolation_toggle_reaches_representations() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(image("ct", 1, ComponentType::Int16)).unwrap();
    harness.viewer.send(ViewerEvent::ToggleInterpolation).unwrap();

    assert!(!harness.viewer.ui_toggles().unwrap().interpolation_enabled);
    assert!(!harness.viewer.rendering().unwrap().images().interpolation());
    let last_interpolation = harness
        .log
        .snapshot()
        .into_iter()
        .filter_map(|call| match call {
            BackendCall::SetProperty { key, value, .. } if key == "interpolation" => Some(value),
            _ => None,
        })
        .last();
    assert_eq!(last_interpolation, Some(serde_json::Value::Bool(false)));
}

#[test]
fn interpolation_toggle_starts_from_image_options() {
    let mut options = ViewerOptions::default();
    options.rendering.images.interpolation = false;
    let mut harness = Harness::start(options);
    assert!(!harness.viewer.ui_toggles().unwrap().interpolation_enabled);
    assert!(!harness.viewer.rendering().unwrap().images().interpolation());

    harness.viewer.send(ViewerEvent::ToggleInterpolation).unwrap();
    assert!(harness.viewer.ui_toggles().unwrap().interpolation_enabled);
    assert!(harness.viewer.rendering().unwrap().images().interpolation());
}

#[test]
fn style_container_event_is_routed_while_active() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(ViewerEvent::StyleContainer).unwrap();
    assert_eq!(harness.viewer.container().style("position"), Some("relative"));
    assert_eq!(harness.viewer.container().style("min-height"), Some("200px"));
    assert!(harness.drain_notifications().is_empty());
}

#[test]
fn geometry_color_by_comes_from_recorded_arrays() {
    let mut harness = Harness::start(ViewerOptions::default());
    let pressure = DataArray {
        name: "pressure".into(),
        location: DataLocation::Point,
        components: 1,
        range: [0.0, 4.0],
    };
    let inactive = DatasetSummary {
        arrays: vec![pressure.clone()],
        ..DatasetSummary::new("mesh")
    };
    let index = harness.viewer.record_dataset(DatasetKind::Geometry, inactive);
    let err = harness
        .viewer
        .color_by(DatasetKind::Geometry, index)
        .unwrap_err();
    assert!(matches!(
        err,
        MachineError::Scene(CoreError::NoActiveScalars { dataset }) if dataset == "mesh"
    ));

    let active = DatasetSummary {
        arrays: vec![pressure],
        active_point_scalars: Some("pressure".into()),
        ..DatasetSummary::new("mesh")
    };
    harness
        .viewer
        .update_dataset(DatasetKind::Geometry, index, active)
        .unwrap();
    let color_by = harness.viewer.color_by(DatasetKind::Geometry, index).unwrap();
    assert_eq!(color_by.options.len(), 1);
    assert_eq!(
        color_by.default.as_ref().map(|option| option.value.as_str()),
        Some("pointData:pressure")
    );
    assert_eq!(color_by.range, Some([0.0, 4.0]));
    assert_eq!(harness.viewer.datasets().geometries.selected(), Some(index));
}

#[test]
fn color_by_of_missing_dataset_is_an_error() {
    let mut harness = Harness::start(ViewerOptions::default());
    let err = harness
        .viewer
        .color_by(DatasetKind::PointSet, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        MachineError::Scene(CoreError::DatasetIndex { index: 0, len: 0 })
    ));
}

#[test]
fn cropping_toggle_creates_widget() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.send(ViewerEvent::ToggleCroppingPlanes).unwrap();
    assert!(harness.viewer.ui_toggles().unwrap().cropping_enabled);
    assert!(harness.viewer.rendering().unwrap().widgets().cropping_enabled());
}

#[test]
fn visibility_toggle_of_unknown_layer_is_a_noop() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness
        .viewer
        .send(ViewerEvent::ToggleLayerVisibility("missing".into()))
        .unwrap();
    assert!(harness.drain_notifications().is_empty());
}

#[test]
fn cancelling_an_animation_twice_is_harmless() {
    let mut harness = Harness::start(ViewerOptions::default());
    harness.viewer.request_animation("rotate").unwrap();
    harness.viewer.cancel_animation("rotate").unwrap();
    harness.viewer.cancel_animation("rotate").unwrap();
    harness.viewer.cancel_animation("never-requested").unwrap();
    assert_eq!(
        harness
            .log
            .count(|call| matches!(call, BackendCall::CancelAnimation { .. })),
        1
    );
}

#[test]
fn fullscreen_and_dark_mode_toggles() {
    let mut harness = Harness::start(ViewerOptions::default());
    for event in [
        ViewerEvent::ToggleFullscreen,
        ViewerEvent::ToggleDarkMode,
        ViewerEvent::DisableFullscreen,
    ] {
        harness.viewer.send(event).unwrap();
    }
    let toggles = harness.viewer.ui_toggles().unwrap();
    assert!(!toggles.fullscreen);
    assert!(!toggles.dark_mode);
}
