#![cfg(test)]

use std::sync::Arc;

use super::common::{context_for, entries, greeter_factories, new_journal, write_config};
use crate::config::{Configuration, Properties};
use crate::plugin_system::manager::PluginManager;

const TOML_RUNTIME: &str = r#"
PluginLoadOrder = ["Second", "First"]

"Plugin.First" = "greeter one"
"Plugin.Second" = "greeter two --Second.Greeting=howdy"
"Plugin.Third" = "greeter generic"
"Plugin.Third.rust" = "greeter native"
"Plugin.Fourth.java" = "com.example.FourthFactory"
"Plugin.Fourth.py" = "fourth_factory"

[First]
Greeting = "bonjour"
"#;

#[test]
fn test_toml_runtime_loads_in_configured_order() {
    let journal = new_journal();
    let (_file, path) = write_config(".toml", TOML_RUNTIME);
    let properties = Arc::new(Properties::load(&path).expect("load toml"));
    let manager =
        PluginManager::with_factories(context_for(&properties), greeter_factories(&journal));

    let mut cmd_args = vec!["--Third.Greeting=hey".to_string(), "report.csv".to_string()];
    manager.load_plugins(&mut cmd_args).expect("load plugins");

    assert_eq!(manager.plugin_names(), vec!["Second", "First", "Third"]);
    assert_eq!(cmd_args, vec!["report.csv".to_string()]);
    assert_eq!(
        entries(&journal),
        vec![
            "init:Second:howdy:two",
            "init:First:bonjour:one",
            "init:Third:hey:native",
        ]
    );

    let report = manager.destroy();
    assert!(report.is_clean());
    assert_eq!(report.destroyed, 3);
}

#[test]
fn test_yaml_runtime_with_deferred_initialization() {
    let journal = new_journal();
    let (_file, path) = write_config(
        ".yaml",
        "InitPlugins: 0\n\
         PluginLoadOrder: [Alpha, Beta]\n\
         Plugin:\n  Alpha: greeter\n  Beta: greeter b1 b2\n",
    );
    let properties = Arc::new(Properties::load(&path).expect("load yaml"));
    let manager =
        PluginManager::with_factories(context_for(&properties), greeter_factories(&journal));

    manager.load_plugins(&mut Vec::new()).unwrap();
    assert!(!manager.is_initialized());
    assert!(entries(&journal).is_empty());

    // The application can still adjust configuration before initializing.
    properties.set_property("Alpha.Greeting", "ahoy");
    manager.initialize_plugins().unwrap();

    assert_eq!(entries(&journal), vec!["init:Alpha:ahoy:", "init:Beta:hello:b1,b2"]);
}

#[test]
fn test_runtime_overrides_from_command_line() {
    let journal = new_journal();
    let properties = Arc::new(Properties::new());
    let remaining = properties.parse_runtime_command_line_options(vec![
        "--Plugin.Gamma=greeter g".to_string(),
        "--Plugin.Delta=greeter d".to_string(),
        "--PluginLoadOrder=Delta".to_string(),
        "--Gamma.Greeting=salut".to_string(),
        "positional".to_string(),
    ]);
    assert_eq!(remaining, vec!["--Gamma.Greeting=salut", "positional"]);
    assert_eq!(properties.property("PluginLoadOrder").as_deref(), Some("Delta"));

    let manager =
        PluginManager::with_factories(context_for(&properties), greeter_factories(&journal));
    let mut cmd_args = remaining;
    manager.load_plugins(&mut cmd_args).unwrap();

    assert_eq!(cmd_args, vec!["positional"]);
    assert_eq!(entries(&journal), vec!["init:Delta:hello:d", "init:Gamma:salut:g"]);
}
