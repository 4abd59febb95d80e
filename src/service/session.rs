//! Session fields from the request context.

use std::collections::HashMap;

/// Lowercased request fields carried alongside a command (HTTP headers at the
/// transport boundary).
///
/// The client's cached validator travels here rather than in the command input
/// so the core stays independent of any particular transport's header
/// mechanism:
///
/// ```json
/// {
///   "if-none-match": "edad27c8d6f33eff890be7db0e6049cd"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of fields.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// The client's cached validator token (`if-none-match`), if presented.
    pub fn if_none_match(&self) -> Option<&str> {
        self.get("if-none-match")
    }

    /// Get a session field by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session field exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Get all session fields.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session() {
        let session = Session::new();
        assert_eq!(session.if_none_match(), None);
        assert!(!session.has("anything"));
    }

    #[test]
    fn if_none_match_field() {
        let mut vars = HashMap::new();
        vars.insert(
            "if-none-match".to_string(),
            "edad27c8d6f33eff890be7db0e6049cd".to_string(),
        );
        let session = Session::from_map(vars);

        assert_eq!(
            session.if_none_match(),
            Some("edad27c8d6f33eff890be7db0e6049cd")
        );
        assert!(session.has("if-none-match"));
        assert!(!session.has("authorization"));
    }

    #[test]
    fn set_and_get() {
        let mut session = Session::new();
        session.set("if-none-match", "abc");
        assert_eq!(session.get("if-none-match"), Some("abc"));
        assert_eq!(session.if_none_match(), Some("abc"));
    }
}
