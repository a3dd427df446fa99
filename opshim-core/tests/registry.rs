use std::sync::Arc;

use opshim_core::{parse_definitions_str, DocumentFormat, Registry, RegistryError};

fn definitions() -> &'static str {
    r#"
version: "1"
commands:
  - name: thing show
    request:
      method: GET
      path: /things/{name}
      url_params:
        - { name: name, arg: name, required: true }
      query_params:
        - { name: api-version, literal: "2024-01-01", required: true }
    response:
      type: object
      fields:
        - { name: id, type: string, read_only: true }
  - name: thing broken
    request:
      method: GET
      path: /things/{name}
      query_params:
        - { name: api-version, literal: "2024-01-01", required: true }
"#
}

fn registry() -> Registry {
    let parsed = parse_definitions_str(definitions(), DocumentFormat::Auto).unwrap();
    Registry::from_document(parsed.document).unwrap()
}

#[test]
fn commands_compile_lazily_and_are_shared() {
    let registry = registry();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["thing broken", "thing show"]);
    assert!(!registry.is_compiled("thing show"));

    let first = registry.get("thing show").unwrap();
    assert!(registry.is_compiled("thing show"));
    let second = registry.get("thing show").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name, "thing show");
}

#[test]
fn invalid_commands_fail_only_when_looked_up() {
    let registry = registry();
    let err = registry.get("thing broken").unwrap_err();
    match err {
        RegistryError::InvalidCommand { name, violations } => {
            assert_eq!(name, "thing broken");
            assert!(violations.iter().any(|v| v.message.contains("`name` has no url parameter")));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The failure is cached like a success would be.
    assert!(registry.is_compiled("thing broken"));
}

#[test]
fn unknown_and_duplicate_commands_are_rejected() {
    let registry = registry();
    assert_eq!(
        registry.get("thing delete").unwrap_err(),
        RegistryError::UnknownCommand("thing delete".into())
    );

    let mut registry = Registry::new();
    let parsed = parse_definitions_str(definitions(), DocumentFormat::Auto).unwrap();
    let def = parsed.document.commands[0].clone();
    registry.register(def.clone()).unwrap();
    assert_eq!(
        registry.register(def).unwrap_err(),
        RegistryError::DuplicateCommand("thing show".into())
    );
}

#[test]
fn concurrent_lookups_share_one_compiled_command() {
    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let r = Arc::clone(&registry);
            std::thread::spawn(move || r.get("thing show").unwrap())
        })
        .collect();
    let commands: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(commands.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn global_registry_installs_once() {
    let installed = opshim_core::registry::install(registry()).unwrap();
    assert!(opshim_core::registry::global().is_some());
    assert_eq!(installed.len(), 2);
    assert_eq!(
        opshim_core::registry::install(Registry::new()).unwrap_err(),
        RegistryError::AlreadyInstalled
    );
}
