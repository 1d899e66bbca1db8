//! Held-key map
//!
//! Keys are identified by the host's key names ("ArrowUp", "w", " ").
//! The host writes on press/release; entities only read.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

impl InputState {
    pub fn press(&mut self, key: impl Into<String>) {
        self.held.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// True if any of `keys` is held (e.g. arrow key or WASD alias)
    pub fn any_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut input = InputState::default();
        assert!(!input.is_held("w"));
        input.press("w");
        assert!(input.is_held("w"));
        assert!(input.any_held(&["ArrowUp", "w"]));
        input.release("w");
        assert!(!input.any_held(&["ArrowUp", "w"]));
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::default();
        input.press("a");
        input.press("d");
        input.clear();
        assert!(!input.any_held(&["a", "d"]));
    }
}
