#![cfg(test)]

use std::error::Error as _;
use std::sync::Arc;

use super::common::{context_for, entries, greeter_factories, new_journal};
use crate::config::Properties;
use crate::config::format::ConfigFormat;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manager::PluginManager;

#[test]
fn test_failing_plugin_rolls_back_configured_runtime() {
    let journal = new_journal();
    let properties = Arc::new(
        Properties::parse_str(
            r#"{
                "PluginLoadOrder": "One Two Three Four",
                "Plugin": {
                    "One": "greeter",
                    "Two": "greeter",
                    "Three": "greeter",
                    "Four": "greeter"
                },
                "Three": { "Fail": true }
            }"#,
            ConfigFormat::Json,
        )
        .unwrap(),
    );
    let manager =
        PluginManager::with_factories(context_for(&properties), greeter_factories(&journal));

    let err = manager.load_plugins(&mut Vec::new()).unwrap_err();

    match &err {
        PluginSystemError::PluginFailed { name, .. } => assert_eq!(name, "Three"),
        other => panic!("expected PluginFailed, got {:?}", other),
    }
    assert_eq!(
        err.source().map(|s| s.to_string()).as_deref(),
        Some("Three refused to start")
    );
    assert_eq!(
        entries(&journal),
        vec![
            "init:One:hello:",
            "init:Two:hello:",
            "init:Three:hello:",
            "destroy:Two",
            "destroy:One",
        ]
    );
    // Plugins stay registered after a failed initialization.
    assert_eq!(manager.plugin_names(), vec!["One", "Two", "Three", "Four"]);
    assert!(!manager.is_initialized());

    let report = manager.destroy();
    assert_eq!(report.destroyed, 4);
    assert!(manager.is_destroyed());
}

#[test]
fn test_second_load_adds_only_new_plugins() {
    let journal = new_journal();
    let properties: Arc<Properties> = Arc::new(
        [("Plugin.First", "greeter"), ("InitPlugins", "0")]
            .into_iter()
            .collect(),
    );
    let manager =
        PluginManager::with_factories(context_for(&properties), greeter_factories(&journal));

    manager.load_plugins(&mut Vec::new()).unwrap();
    assert_eq!(manager.plugin_names(), vec!["First"]);

    // Remaining entries already in the registry are reported, not reloaded.
    properties.set_property("Plugin.Second", "greeter");
    let err = manager.load_plugins(&mut Vec::new()).unwrap_err();
    assert_eq!(err.reason(), Some("plugin `First' already loaded"));

    properties.set_property("Plugin.First", "");
    manager.load_plugins(&mut Vec::new()).unwrap();
    assert_eq!(manager.plugin_names(), vec!["First", "Second"]);

    manager.initialize_plugins().unwrap();
    assert_eq!(entries(&journal), vec!["init:First:hello:", "init:Second:hello:"]);
}
