//! Symbol scopes for the code generator.
//!
//! A stack of per-block scopes mapping identifier to FOOBAR type name
//! (array types carry the `[]` suffix). Pushed on entering a method or
//! block, popped on exit. This is the only symbol information code
//! generation needs; everything else is delegated to the host C compiler.

use rustc_hash::FxHashMap;

/// Scope stack: global symbols plus a stack of local scopes.
#[derive(Debug, Default)]
pub struct ScopeStack {
    globals: FxHashMap<String, String>,
    locals: Vec<FxHashMap<String, String>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope.
    pub fn push(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    /// Exit the current scope.
    pub fn pop(&mut self) {
        self.locals.pop();
    }

    /// Bind a variable in the current scope (global when no scope is
    /// active).
    pub fn add(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        match self.locals.last_mut() {
            Some(scope) => {
                scope.insert(name.into(), type_name.into());
            },
            None => {
                self.globals.insert(name.into(), type_name.into());
            },
        }
    }

    /// Look up a variable's type, innermost scope first.
    pub fn get(&self, name: &str) -> Option<&str> {
        for scope in self.locals.iter().rev() {
            if let Some(ty) = scope.get(name) {
                return Some(ty);
            }
        }
        self.globals.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.add("x", "integer");
        scopes.push();
        scopes.add("x", "string");
        assert_eq!(scopes.get("x"), Some("string"));
        scopes.pop();
        assert_eq!(scopes.get("x"), Some("integer"));
    }

    #[test]
    fn test_outer_bindings_visible_in_inner_scope() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.add("a", "integer[]");
        scopes.push();
        assert_eq!(scopes.get("a"), Some("integer[]"));
    }

    #[test]
    fn test_popped_bindings_disappear() {
        let mut scopes = ScopeStack::new();
        scopes.push();
        scopes.push();
        scopes.add("tmp", "boolean");
        scopes.pop();
        assert_eq!(scopes.get("tmp"), None);
    }

    #[test]
    fn test_global_fallback() {
        let mut scopes = ScopeStack::new();
        scopes.add("g", "float");
        scopes.push();
        assert_eq!(scopes.get("g"), Some("float"));
    }
}
