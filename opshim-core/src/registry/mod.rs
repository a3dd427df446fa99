//! Command registry.
//!
//! Definitions are stored as parsed; each command is validated and compiled
//! into an immutable [`Command`] the first time it is looked up, then shared
//! as an `Arc` by every later caller.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::error::{RegistryError, Violation};
use crate::schema::ResponseSchema;
use crate::types::{
    CommandDefinition, DefinitionsDocument, ErrorFormat, LroOptions, RequestTemplate,
};
use crate::validate::Validator;

/// A compiled command: everything the engine needs, independent of any
/// particular invocation's arguments.
#[derive(Debug)]
pub struct Command {
    pub name: String,
    pub template: RequestTemplate,
    pub response: Option<ResponseSchema>,
    pub lro: LroOptions,
    pub error_format: ErrorFormat,
    pub no_wait_supported: bool,
}

impl Command {
    pub fn compile(def: &CommandDefinition) -> Result<Self, Vec<Violation>> {
        let mut v = Validator::new();
        v.validate_command("$", def);
        let violations = v.into_violations();
        if !violations.is_empty() {
            return Err(violations);
        }
        let error_format = ErrorFormat::compile(&def.error_format)
            .map_err(|e| vec![Violation::new("$.error_format", e)])?;
        Ok(Self {
            name: def.name.clone(),
            template: def.request.clone(),
            response: def.response.clone(),
            lro: def.lro.clone(),
            error_format,
            no_wait_supported: def.no_wait_supported,
        })
    }
}

struct RegistryEntry {
    definition: CommandDefinition,
    compiled: OnceLock<Result<Arc<Command>, Vec<Violation>>>,
}

#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: DefinitionsDocument) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for def in doc.commands {
            registry.register(def)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, definition: CommandDefinition) -> Result<(), RegistryError> {
        if self.entries.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateCommand(definition.name));
        }
        self.entries.insert(
            definition.name.clone(),
            RegistryEntry {
                definition,
                compiled: OnceLock::new(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Command>, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))?;
        entry
            .compiled
            .get_or_init(|| Command::compile(&entry.definition).map(Arc::new))
            .clone()
            .map_err(|violations| RegistryError::InvalidCommand {
                name: name.to_string(),
                violations,
            })
    }

    pub fn definition(&self, name: &str) -> Option<&CommandDefinition> {
        self.entries.get(name).map(|e| &e.definition)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once `get` has compiled the command.
    pub fn is_compiled(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|e| e.compiled.get().is_some())
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Installs the process-wide registry. Only the first call succeeds.
pub fn install(registry: Registry) -> Result<&'static Registry, RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    GLOBAL.get().ok_or(RegistryError::AlreadyInstalled)
}

pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}
