//! Cross-module symbol resolution.
//!
//! Answers "what does `name` denote in module M?" by following imports,
//! re-exports, star exports and local aliases through the loader. Results
//! are memoized per `(ModuleId, name)`; a visited set breaks cycles. An
//! answer computed while a cycle was cut short is not memoized, since it
//! depends on where the query entered the cycle.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    sync::{Mutex, PoisonError},
};

use swc_ecma_ast::Expr;

use crate::core::{
    ModuleId,
    bindings::{Export, Origin},
    context::ScanContext,
    extract::{
        helpers::{FnLike, unwrap_ts_expr},
        value_analyzer::{Env, ValueAnalyzer},
    },
    loader::{ImportTarget, ParsedModule},
    registry::RecognizerEntry,
};

/// What a module-level name statically denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Literal(String),
    StringArray(Vec<String>),
    /// A recognized export of an i18n package.
    I18nMember(RecognizerEntry),
    /// `import * as x` of an i18n package.
    I18nNamespace { package: String },
    /// `import * as x` of a local module.
    ModuleNamespace(ModuleId),
    /// A top-level function of `module`.
    Function { module: ModuleId, name: String },
    /// Known binding with no static value.
    Value,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Lookup {
    Local,
    Export,
}

type SymbolKey = (ModuleId, String, Lookup);

#[derive(Default)]
pub struct SymbolTable {
    memo: Mutex<HashMap<SymbolKey, Symbol>>,
}

impl SymbolTable {
    fn get(&self, key: &SymbolKey) -> Option<Symbol> {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: SymbolKey, symbol: Symbol) {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, symbol);
    }
}

/// Keys on the current query path.
#[derive(Default)]
struct Visited {
    keys: RefCell<HashSet<SymbolKey>>,
    /// Set once a lookup below the current one hit the cycle guard.
    tainted: Cell<bool>,
}

impl ScanContext {
    /// Resolve a top-level name of `module`.
    pub fn resolve_local(&self, module: &ParsedModule, name: &str) -> Symbol {
        self.resolve_local_guarded(module, name, &Visited::default())
    }

    /// Resolve the export `name` of the module `id`.
    pub fn resolve_export(&self, id: &ModuleId, name: &str) -> Symbol {
        self.resolve_export_guarded(id, name, &Visited::default())
    }

    fn memoized(
        &self,
        key: SymbolKey,
        visited: &Visited,
        compute: impl FnOnce() -> Symbol,
    ) -> Symbol {
        if let Some(symbol) = self.symbols.get(&key) {
            return symbol;
        }
        if !visited.keys.borrow_mut().insert(key.clone()) {
            tracing::trace!(module = %key.0, name = %key.1, "symbol cycle");
            visited.tainted.set(true);
            return Symbol::Unknown;
        }

        let outer_tainted = visited.tainted.replace(false);
        let symbol = compute();
        visited.keys.borrow_mut().remove(&key);
        let tainted = visited.tainted.get();
        visited.tainted.set(outer_tainted || tainted);

        if !tainted {
            self.symbols.insert(key, symbol.clone());
        }
        symbol
    }

    fn resolve_local_guarded(&self, module: &ParsedModule, name: &str, visited: &Visited) -> Symbol {
        let key = (module.id.clone(), name.to_string(), Lookup::Local);
        self.memoized(key, visited, || {
            let Some(origin) = module.table.binding(name) else {
                return Symbol::Unknown;
            };
            match origin {
                Origin::ImportedFrom {
                    target, exported, ..
                } => self.resolve_target_member(target, exported, visited),
                Origin::NamespaceImport { target, .. } => self.namespace_symbol(target),
                Origin::LocalLiteral(value) => Symbol::Literal(value.clone()),
                Origin::LocalExpr(expr) => self.expr_symbol(module, name, expr, visited),
                Origin::LocalFunction(_) => Symbol::Function {
                    module: module.id.clone(),
                    name: name.to_string(),
                },
            }
        })
    }

    fn resolve_export_guarded(&self, id: &ModuleId, name: &str, visited: &Visited) -> Symbol {
        let key = (id.clone(), name.to_string(), Lookup::Export);
        self.memoized(key, visited, || {
            let Some(module) = self.loader.module(id) else {
                return Symbol::Unknown;
            };
            match module.table.export(name) {
                Some(Export::Local(local)) => self.resolve_local_guarded(&module, local, visited),
                Some(Export::Reexport {
                    target, imported, ..
                }) => self.resolve_target_member(target, imported, visited),
                Some(Export::NamespaceReexport { target, .. }) => self.namespace_symbol(target),
                None if name != "default" => module
                    .table
                    .star_exports()
                    .iter()
                    .map(|star| self.resolve_target_member(&star.target, name, visited))
                    .find(|symbol| *symbol != Symbol::Unknown)
                    .unwrap_or(Symbol::Unknown),
                None => Symbol::Unknown,
            }
        })
    }

    fn resolve_target_member(&self, target: &ImportTarget, name: &str, visited: &Visited) -> Symbol {
        match target {
            ImportTarget::External(package) => match self.registry.entry(package, name) {
                Some(entry) => Symbol::I18nMember(entry.clone()),
                None => Symbol::Unknown,
            },
            ImportTarget::Local(id) => self.resolve_export_guarded(id, name, visited),
            ImportTarget::NotFound => Symbol::Unknown,
        }
    }

    fn namespace_symbol(&self, target: &ImportTarget) -> Symbol {
        match target {
            ImportTarget::External(package) if self.registry.contains_package(package) => {
                Symbol::I18nNamespace {
                    package: package.clone(),
                }
            }
            ImportTarget::Local(id) => Symbol::ModuleNamespace(id.clone()),
            _ => Symbol::Unknown,
        }
    }

    /// A declaration whose initializer did not fold within its own file.
    fn expr_symbol(&self, module: &ParsedModule, name: &str, expr: &Expr, visited: &Visited) -> Symbol {
        if FnLike::from_expr(expr).is_some() {
            return Symbol::Function {
                module: module.id.clone(),
                name: name.to_string(),
            };
        }
        // `const useT = useTranslation` aliases the imported binding.
        if let Expr::Ident(alias) = unwrap_ts_expr(expr) {
            return self.resolve_local_guarded(module, alias.sym.as_str(), visited);
        }

        let env = ModuleEnv {
            ctx: self,
            module,
            visited,
        };
        let analyzer = ValueAnalyzer::new(&env);
        if let Some(value) = analyzer.analyze_expr(expr) {
            return Symbol::Literal(value);
        }
        if let Some(values) = analyzer.analyze_string_array(expr) {
            return Symbol::StringArray(values);
        }
        Symbol::Value
    }
}

/// Evaluates names of one module, following imports into other modules.
pub struct ModuleEnv<'c> {
    ctx: &'c ScanContext,
    module: &'c ParsedModule,
    visited: &'c Visited,
}

impl Env for ModuleEnv<'_> {
    fn string(&self, name: &str) -> Option<String> {
        match self.ctx.resolve_local_guarded(self.module, name, self.visited) {
            Symbol::Literal(value) => Some(value),
            _ => None,
        }
    }

    fn string_array(&self, name: &str) -> Option<Vec<String>> {
        match self.ctx.resolve_local_guarded(self.module, name, self.visited) {
            Symbol::StringArray(values) => Some(values),
            _ => None,
        }
    }
}
