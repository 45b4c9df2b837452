//! Compile context threaded through pattern builds.

use std::collections::HashSet;

/// Symbol and scope collaborator for one parse unit.
///
/// Patterns read and append symbol information during `build`. Parsing of
/// a unit is strictly sequential, so the context carries no interior
/// synchronization; independent units each get their own context.
#[derive(Debug, Default)]
pub struct Context {
    variables: HashSet<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable in the current scope.
    pub fn declare_variable(&mut self, name: &str) {
        self.variables.insert(name.to_string());
    }

    pub fn is_variable_declared(&self, name: &str) -> bool {
        self.variables.contains(name)
    }
}
