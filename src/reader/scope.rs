//! Parent scope stack
//!
//! Tracks the chain of enclosing declarations currently being decoded.
//! Strict push/pop nesting; the stack is seeded with the caller's parent
//! scope and must never be empty while a child asks for its parent.

use crate::error::MalformedModule;
use crate::ir::decl::Parent;

#[derive(Debug, Default)]
pub struct ParentScopeStack {
    entries: Vec<Parent>,
}

impl ParentScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope
    pub fn push(&mut self, parent: Parent) {
        self.entries.push(parent);
    }

    /// Close the innermost scope
    pub fn pop(&mut self) {
        self.entries.pop();
    }

    /// The scope a declaration being decoded right now belongs to
    pub fn parent(&self) -> Result<Parent, MalformedModule> {
        self.entries
            .last()
            .copied()
            .ok_or(MalformedModule::EmptyScopeStack)
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::decl::FileId;
    use crate::symbols::SymbolId;

    #[test]
    fn test_push_pop_nesting() {
        let mut stack = ParentScopeStack::new();
        assert_eq!(stack.parent(), Err(MalformedModule::EmptyScopeStack));

        stack.push(Parent::File(FileId(0)));
        stack.push(Parent::Symbol(SymbolId(3)));
        assert_eq!(stack.parent(), Ok(Parent::Symbol(SymbolId(3))));
        assert_eq!(stack.depth(), 2);

        stack.pop();
        assert_eq!(stack.parent(), Ok(Parent::File(FileId(0))));
        stack.pop();
        assert!(stack.is_empty());
    }
}
