//! Symbols and the scope chain
//!
//! A [`ScopeChain`] is a stack of [`Scope`]s addressed by [`ScopeId`]. Each
//! scope points at its enclosing scope by index, so lookups walk outward
//! without any shared ownership. Symbol tables keep declaration order for
//! display.

use rustc_hash::FxHashMap;
use std::fmt;

/// Name of the outermost scope.
pub const GLOBAL_SCOPE_NAME: &str = "<global>";

/// Type symbols present in the global scope before any user declaration.
pub const BUILTIN_TYPES: &[&str] = &["int", "void", "bool"];

/// Index of a scope within its [`ScopeChain`]
pub type ScopeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        TypeSymbol { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSymbol {
    pub name: String,
    pub ty: TypeSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub ty: TypeSymbol,
    pub params: Vec<VarSymbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Type(TypeSymbol),
    Var(VarSymbol),
    Function(FunctionSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(symbol) => &symbol.name,
            Symbol::Var(symbol) => &symbol.name,
            Symbol::Function(symbol) => &symbol.name,
        }
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TypeSymbol(name:'{}')>", self.name)
    }
}

impl fmt::Display for VarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<VarSymbol(name:'{}', type:{})>", self.name, self.ty)
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, ty) = (&self.name, &self.ty);
        write!(f, "<FunctionSymbol(name:'{name}', type:{ty}, params:[")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str("])>")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Type(symbol) => fmt::Display::fmt(symbol, f),
            Symbol::Var(symbol) => fmt::Display::fmt(symbol, f),
            Symbol::Function(symbol) => fmt::Display::fmt(symbol, f),
        }
    }
}

/// One symbol table in the chain
#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub level: usize,
    pub parent: Option<ScopeId>,
    table: FxHashMap<String, Symbol>,
    insertion_order: Vec<String>, // Track order of declarations for display
}

impl Scope {
    pub fn new(name: impl Into<String>, level: usize, parent: Option<ScopeId>) -> Self {
        Scope {
            name: name.into(),
            level,
            parent,
            table: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }

    /// Insert a symbol, replacing any symbol of the same name.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        let name = symbol.name().to_string();
        if !self.table.contains_key(&name) {
            self.insertion_order.push(name.clone());
        }
        self.table.insert(name, symbol)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.table.get_mut(name)
    }

    /// Symbols in declaration order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.insertion_order
            .iter()
            .filter_map(|name| self.table.get(name))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Aligned `name: symbol` table, one symbol per line.
impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.symbols().map(|s| s.name().len()).max().unwrap_or(0);
        for (i, symbol) in self.symbols().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{:<width$}: {}", symbol.name(), symbol)?;
        }
        Ok(())
    }
}

/// Stack of nested scopes
#[derive(Debug, Clone, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain { scopes: Vec::new() }
    }

    /// Open the level-1 global scope seeded with the built-in types.
    pub fn push_global(&mut self) -> ScopeId {
        let id = self.push(GLOBAL_SCOPE_NAME);
        for name in BUILTIN_TYPES {
            self.insert(Symbol::Type(TypeSymbol::new(*name)));
        }
        id
    }

    /// Open a child of the current scope at `level + 1`.
    pub fn push(&mut self, name: impl Into<String>) -> ScopeId {
        let parent = self.current_id();
        let level = self.current().map_or(1, |scope| scope.level + 1);
        self.scopes.push(Scope::new(name, level, parent));
        self.scopes.len() - 1
    }

    /// Discard the current scope and return it.
    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn current_id(&self) -> Option<ScopeId> {
        self.scopes.len().checked_sub(1)
    }

    pub fn current(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id)
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Insert into the current scope. Without an open scope this is a no-op.
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.scopes.last_mut()?.insert(symbol)
    }

    /// Find `name` in the current scope, then (if `deep`) in each enclosing
    /// scope out to the global one.
    pub fn lookup(&self, name: &str, deep: bool) -> Option<&Symbol> {
        let mut id = self.current_id();
        while let Some(scope) = id.and_then(|id| self.scopes.get(id)) {
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            if !deep {
                return None;
            }
            id = scope.parent;
        }
        None
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.lookup(name, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: &str) -> Symbol {
        Symbol::Var(VarSymbol {
            name: name.to_string(),
            ty: TypeSymbol::new(ty),
        })
    }

    #[test]
    fn test_global_scope_is_seeded() {
        let mut chain = ScopeChain::new();
        chain.push_global();

        let global = chain.current().unwrap();
        assert_eq!(global.name, GLOBAL_SCOPE_NAME);
        assert_eq!(global.level, 1);
        assert_eq!(global.parent, None);
        for name in BUILTIN_TYPES {
            assert!(matches!(chain.lookup_local(name), Some(Symbol::Type(_))));
        }
    }

    #[test]
    fn test_deep_and_shallow_lookup() {
        let mut chain = ScopeChain::new();
        chain.push_global();
        chain.insert(var("x", "int"));
        let child = chain.push("main");

        assert_eq!(chain.scope(child).unwrap().level, 2);
        assert_eq!(chain.scope(child).unwrap().parent, Some(0));
        assert!(chain.lookup_local("x").is_none());
        assert_eq!(chain.lookup("x", true), Some(&var("x", "int")));
        assert!(chain.lookup("missing", true).is_none());
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut chain = ScopeChain::new();
        chain.push_global();
        chain.insert(var("x", "int"));
        chain.push("f");
        chain.insert(var("x", "bool"));

        assert_eq!(chain.lookup("x", true), Some(&var("x", "bool")));

        let popped = chain.pop().unwrap();
        assert_eq!(popped.name, "f");
        assert_eq!(chain.lookup("x", true), Some(&var("x", "int")));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut scope = Scope::new("s", 1, None);
        assert!(scope.insert(var("a", "int")).is_none());
        assert_eq!(scope.insert(var("a", "bool")), Some(var("a", "int")));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_insert_without_scope() {
        let mut chain = ScopeChain::new();
        assert!(chain.insert(var("a", "int")).is_none());
        assert!(chain.lookup("a", true).is_none());
    }

    #[test]
    fn test_symbol_rendering() {
        assert_eq!(
            var("x", "int").to_string(),
            "<VarSymbol(name:'x', type:<TypeSymbol(name:'int')>)>"
        );

        let function = FunctionSymbol {
            name: "f".to_string(),
            ty: TypeSymbol::new("void"),
            params: vec![VarSymbol {
                name: "a".to_string(),
                ty: TypeSymbol::new("int"),
            }],
        };
        let expected = concat!(
            "<FunctionSymbol(name:'f', type:<TypeSymbol(name:'void')>, ",
            "params:[<VarSymbol(name:'a', type:<TypeSymbol(name:'int')>)>])>"
        );
        assert_eq!(function.to_string(), expected);
    }

    #[test]
    fn test_scope_rendering_is_aligned() {
        let mut scope = Scope::new("s", 1, None);
        scope.insert(Symbol::Type(TypeSymbol::new("int")));
        scope.insert(var("count", "int"));

        let expected = concat!(
            "int  : <TypeSymbol(name:'int')>\n",
            "count: <VarSymbol(name:'count', type:<TypeSymbol(name:'int')>)>"
        );
        assert_eq!(scope.to_string(), expected);
    }
}
