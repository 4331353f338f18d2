//! Per-class type-parameter stacks.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::ids::TypeParamId;

/// Mapping from platform type-variable names to IR type-parameter nodes.
///
/// Platform generic signatures reference type variables by name, and a
/// nested class's signature may name a variable declared on an enclosing
/// class. Each class therefore carries a stack: its own parameters as
/// the innermost segment, the enclosing class's stack as the rest.
/// [`extend`](Self::extend) appends a segment and *shares* the outer
/// stack rather than copying it, so an outer variable resolves to the
/// enclosing class's node by identity.
///
/// Lookup walks segments innermost-first: an inner `T` shadows an outer
/// `T`.
#[derive(Clone, Default)]
pub struct TypeParameterStack {
    head: Option<Arc<Segment>>,
}

struct Segment {
    params: Box<[(SmolStr, TypeParamId)]>,
    outer: Option<Arc<Segment>>,
}

impl TypeParameterStack {
    /// The stack of a top-level class with no parameters in scope.
    pub fn empty() -> Self {
        Self { head: None }
    }

    /// Append one class's own parameters on top of this stack.
    ///
    /// Extending with no parameters returns the stack unchanged (no
    /// empty segments).
    pub fn extend(&self, params: impl IntoIterator<Item = (SmolStr, TypeParamId)>) -> Self {
        let params: Box<[(SmolStr, TypeParamId)]> = params.into_iter().collect();
        if params.is_empty() {
            return self.clone();
        }
        Self {
            head: Some(Arc::new(Segment { params, outer: self.head.clone() })),
        }
    }

    /// Resolve a type-variable name to its node, innermost declaration
    /// first.
    pub fn lookup(&self, name: &str) -> Option<TypeParamId> {
        let mut segment = self.head.as_deref();
        while let Some(current) = segment {
            if let Some((_, id)) = current.params.iter().find(|(n, _)| n == name) {
                return Some(*id);
            }
            segment = current.outer.as_deref();
        }
        None
    }

    /// Whether any parameters are in scope.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Total number of parameters in scope, shadowed ones included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// All (name, node) pairs, innermost segment first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { segment: self.head.as_deref(), index: 0 }
    }
}

/// Iterator over a stack's visible parameters.
pub struct Iter<'a> {
    segment: Option<&'a Segment>,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a SmolStr, TypeParamId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let segment = self.segment?;
            match segment.params.get(self.index) {
                Some((name, id)) => {
                    self.index += 1;
                    return Some((name, *id));
                }
                None => {
                    self.segment = segment.outer.as_deref();
                    self.index = 0;
                }
            }
        }
    }
}

impl fmt::Debug for TypeParameterStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(name, _)| name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> TypeParamId {
        TypeParamId::from_raw(raw)
    }

    fn pair(name: &str, raw: u32) -> (SmolStr, TypeParamId) {
        (SmolStr::new(name), id(raw))
    }

    #[test]
    fn test_empty_stack() {
        let stack = TypeParameterStack::empty();
        assert!(stack.is_empty());
        assert_eq!(stack.lookup("T"), None);
    }

    #[test]
    fn test_own_parameters_resolve() {
        let stack = TypeParameterStack::empty().extend([pair("K", 0), pair("V", 1)]);

        assert_eq!(stack.lookup("K"), Some(id(0)));
        assert_eq!(stack.lookup("V"), Some(id(1)));
        assert_eq!(stack.lookup("T"), None);
    }

    #[test]
    fn test_outer_parameters_visible_through_extension() {
        let outer = TypeParameterStack::empty().extend([pair("T", 0)]);
        let inner = outer.extend([pair("U", 1)]);

        // The outer node, by identity, not a copy.
        assert_eq!(inner.lookup("T"), Some(id(0)));
        assert_eq!(inner.lookup("U"), Some(id(1)));
        // The outer stack is unchanged.
        assert_eq!(outer.lookup("U"), None);
    }

    #[test]
    fn test_inner_shadows_outer() {
        let outer = TypeParameterStack::empty().extend([pair("T", 0)]);
        let inner = outer.extend([pair("T", 1)]);

        assert_eq!(inner.lookup("T"), Some(id(1)));
        assert_eq!(outer.lookup("T"), Some(id(0)));
    }

    #[test]
    fn test_parameterless_extension_is_free() {
        let outer = TypeParameterStack::empty().extend([pair("T", 0)]);
        let inner = outer.extend([]);

        assert_eq!(inner.lookup("T"), Some(id(0)));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_iteration_order_innermost_first() {
        let stack = TypeParameterStack::empty()
            .extend([pair("A", 0)])
            .extend([pair("B", 1), pair("C", 2)]);

        let names: Vec<&str> = stack.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }
}
