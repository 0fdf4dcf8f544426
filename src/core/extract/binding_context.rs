//! Scoped binding context.
//!
//! Tracks what local names denote (translator functions, translator objects,
//! literal constants, iteration variables) with proper scope handling for
//! nested functions and arrow functions.

use std::collections::HashMap;

/// Manages bindings with scope tracking.
///
/// This struct maintains a stack of scopes. When entering a function or
/// arrow function body, a new scope is pushed. When exiting, it's popped.
///
/// # Example
/// ```ignore
/// const { t } = useTranslation("common");  // scope 1: t -> Translator("common")
/// data.map((t) => {                         // push scope 2: t -> Iteration([...])
///     t;  // finds the iteration variable in scope 2
/// });                                       // pop scope 2
/// ```
#[derive(Debug, Clone)]
pub struct BindingContext<T> {
    /// Stack of binding scopes (innermost last).
    bindings_stack: Vec<HashMap<String, T>>,
}

impl<T> Default for BindingContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BindingContext<T> {
    /// Create a new BindingContext with a single global scope.
    pub fn new() -> Self {
        Self {
            bindings_stack: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.bindings_stack.push(HashMap::new());
    }

    /// Exit the current scope. Keeps at least the global scope.
    pub fn exit_scope(&mut self) {
        if self.bindings_stack.len() > 1 {
            self.bindings_stack.pop();
        }
    }

    /// Insert a binding in the current (innermost) scope.
    pub fn insert_binding(&mut self, name: String, binding: T) {
        if let Some(scope) = self.bindings_stack.last_mut() {
            scope.insert(name, binding);
        }
    }

    /// Look up a binding by name, searching from innermost to outermost scope.
    pub fn get_binding(&self, name: &str) -> Option<&T> {
        self.bindings_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn is_in_current_scope(&self, name: &str) -> bool {
        self.bindings_stack
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }

    pub fn is_global_scope(&self) -> bool {
        self.bindings_stack.len() == 1
    }
}
