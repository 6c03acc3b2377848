//! Integration tests for the notesd host runtime

use notesd::{HostRuntime, HostRuntimeConfig, HostRuntimeError};
use services_editor_manager::{EditorHandle, EditorManagerConfig};
use services_ui_state::{deserialize_snapshot, Theme, WindowSize};
use std::fs;

fn config(script: &str) -> HostRuntimeConfig {
    HostRuntimeConfig {
        script: Some(script.to_string()),
        editor: EditorManagerConfig::new(true, ""),
        ..HostRuntimeConfig::default()
    }
}

#[test]
fn test_palette_session_restores_focus() {
    let script = r#"
        editor 0 main
        editor 1 side
        frame
        dispatch {"name":"action::ui-context:UPDATE_PALETTE","value":{"type":"core-palette/notes"}}
        focus-out main
        dispatch {"name":"action::ui-context:RESET_PALETTE"}
    "#;
    let mut runtime = HostRuntime::new(config(script)).unwrap();
    runtime.run().unwrap();

    let main = runtime.find_editor("main").unwrap();
    let side = runtime.find_editor("side").unwrap();
    assert!(!main.has_focus());

    runtime.scheduler().run_frame();
    assert!(main.has_focus());
    assert_eq!(main.focus_count(), 2);
    assert_eq!(side.focus_count(), 1);
}

#[test]
fn test_scripted_resize_is_throttled() {
    let script = "resize 900x700\nresize 700x700\nresize 640x480";
    let mut runtime = HostRuntime::new(config(script)).unwrap();
    assert!(runtime.store().state().widescreen);

    runtime.run().unwrap();
    assert!(runtime.store().state().widescreen);
    assert_eq!(runtime.scheduler().pending_frames(), 1);

    runtime.scheduler().run_frame();
    assert!(!runtime.store().state().widescreen);
    assert!(!runtime.document().borrow().has_class("root", "widescreen"));
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui.json");

    let mut first = HostRuntime::new(HostRuntimeConfig {
        snapshot_path: Some(path.clone()),
        ..config(
            r#"
            dispatch {"name":"action::ui-context:TOGGLE_SIDEBAR","value":{"type":"files"}}
            dispatch {"name":"action::ui-context:TOGGLE_THEME"}
            dispatch {"name":"action::ui-context:TOGGLE_NOTE_SIDEBAR"}
            notify info Not persisted
            "#,
        )
    })
    .unwrap();
    first.run().unwrap();

    let saved = deserialize_snapshot(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(saved.sidebar.as_deref(), Some("files"));
    assert_eq!(saved.theme, Some(Theme::Dark));
    assert!(saved.note_sidebar);

    let second = HostRuntime::new(HostRuntimeConfig {
        snapshot_path: Some(path),
        viewport: WindowSize::new(600, 400),
        ..HostRuntimeConfig::default()
    })
    .unwrap();
    let state = second.store().state();
    assert_eq!(state.sidebar.as_deref(), Some("files"));
    assert_eq!(state.theme, Theme::Dark);
    assert!(state.note_sidebar);
    assert!(!state.widescreen);
    assert!(state.notifications.is_empty());
}

#[test]
fn test_corrupt_snapshot_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui.json");
    fs::write(&path, "not json").unwrap();

    let runtime = HostRuntime::new(HostRuntimeConfig {
        snapshot_path: Some(path),
        prefers_dark: true,
        ..HostRuntimeConfig::default()
    })
    .unwrap();

    assert_eq!(runtime.store().state().theme, Theme::Dark);
    assert!(runtime.store().state().sidebar.is_none());
}

#[test]
fn test_missing_snapshot_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.json");

    let mut runtime = HostRuntime::new(HostRuntimeConfig {
        snapshot_path: Some(path.clone()),
        ..config("dispatch {\"name\":\"action::ui-context:TOGGLE_NOTE_SIDEBAR\"}")
    })
    .unwrap();
    runtime.run().unwrap();

    assert!(deserialize_snapshot(&fs::read(&path).unwrap()).unwrap().note_sidebar);
}

#[test]
fn test_snapshot_saved_when_script_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui.json");

    let mut runtime = HostRuntime::new(HostRuntimeConfig {
        snapshot_path: Some(path.clone()),
        ..config(
            r#"
            dispatch {"name":"action::ui-context:TOGGLE_THEME"}
            focus-out ghost
            dispatch {"name":"action::ui-context:TOGGLE_NOTE_SIDEBAR"}
            "#,
        )
    })
    .unwrap();
    let err = runtime.run().unwrap_err();
    assert!(matches!(err, HostRuntimeError::AtLine { line: 3, .. }));

    let saved = deserialize_snapshot(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(saved.theme, Some(Theme::Dark));
    assert!(!saved.note_sidebar);
}

#[test]
fn test_dev_tools_attach_on_idle() {
    let mut runtime = HostRuntime::new(HostRuntimeConfig {
        script: Some("editor 0 main\nidle".to_string()),
        editor: EditorManagerConfig::new(false, "?debug_pm=yes"),
        ..HostRuntimeConfig::default()
    })
    .unwrap();
    runtime.run().unwrap();

    assert_eq!(runtime.output(), vec!["devtools: attached to main".to_string()]);
}

#[test]
fn test_integration_mode_never_attaches_dev_tools() {
    let mut runtime = HostRuntime::new(HostRuntimeConfig {
        script: Some("editor 0 main\nidle".to_string()),
        editor: EditorManagerConfig::new(true, "debug_pm=yes"),
        ..HostRuntimeConfig::default()
    })
    .unwrap();
    runtime.run().unwrap();

    assert!(runtime.output().is_empty());
}

#[test]
fn test_foreign_and_invalid_actions() {
    let mut runtime = HostRuntime::new(config(
        r#"dispatch {"name":"action::editor:SAVE","value":{"anything":1}}"#,
    ))
    .unwrap();
    let before = runtime.store().state();
    runtime.run().unwrap();
    assert!(std::rc::Rc::ptr_eq(&before, &runtime.store().state()));

    let mut runtime = HostRuntime::new(config(
        r#"dispatch {"name":"action::ui-context:UPDATE_THEME","value":{"theme":"sepia"}}"#,
    ))
    .unwrap();
    let err = runtime.run().unwrap_err();
    assert!(matches!(err, HostRuntimeError::AtLine { line: 1, .. }));
}

#[test]
fn test_demo_script_runs() {
    let script = include_str!("../../demos/palette_focus.ui");
    let mut runtime = HostRuntime::new(config(script)).unwrap();
    runtime.run().unwrap();

    let output = runtime.output();
    assert!(output.iter().any(|line| line == "editors: 0=main 1=side"));
    assert!(output.iter().any(|line| line == "editors: 0=main* 1=side*"));
    assert_eq!(
        output.last().map(String::as_str),
        Some("notification: (check-circle) Palette closed [x dismiss]")
    );

    let state = runtime.store().state();
    assert!(!state.widescreen);
    assert_eq!(state.theme, Theme::Dark);
}
