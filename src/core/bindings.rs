//! Per-module binding table.
//!
//! Built once per file by a single pass over its top-level items: imports,
//! `const`/`let`/`var` declarations, `function` declarations and exports.
//! Renamed imports keep the *exported* name, so registry lookups never depend
//! on local aliases.

use std::collections::{HashMap, HashSet};

use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, Expr, Function, ImportSpecifier, ModuleDecl, ModuleItem,
    Pat, Stmt, VarDecl,
};

use crate::core::{
    ModuleId,
    extract::{
        helpers::{FnLike, export_name},
        value_analyzer::{Env, ValueAnalyzer},
    },
    loader::ImportTarget,
};

/// Local name given to an anonymous `export default <expr>`.
pub const DEFAULT_EXPORT_LOCAL: &str = "*default*";

const MAX_FOLD_DEPTH: usize = 16;

/// Where a top-level name comes from.
#[derive(Debug, Clone)]
pub enum Origin {
    /// `import { exported as local } from 'package'` (default imports use `default`).
    ImportedFrom {
        package: String,
        target: ImportTarget,
        exported: String,
    },
    /// `import * as local from 'package'`.
    NamespaceImport {
        package: String,
        target: ImportTarget,
    },
    /// A declaration whose initializer folds to a string within this file.
    LocalLiteral(String),
    /// Any other declaration with an initializer.
    LocalExpr(Box<Expr>),
    /// `function name() {}`.
    LocalFunction(Box<Function>),
}

/// What an exported name refers to.
#[derive(Debug, Clone)]
pub enum Export {
    /// A top-level binding of this module.
    Local(String),
    /// `export { imported as name } from 'package'`.
    Reexport {
        package: String,
        target: ImportTarget,
        imported: String,
    },
    /// `export * as name from 'package'`.
    NamespaceReexport {
        package: String,
        target: ImportTarget,
    },
}

#[derive(Debug, Clone)]
pub struct StarExport {
    pub package: String,
    pub target: ImportTarget,
}

#[derive(Debug, Default)]
pub struct BindingTable {
    bindings: HashMap<String, Origin>,
    exports: HashMap<String, Export>,
    star_exports: Vec<StarExport>,
    dependencies: Vec<ModuleId>,
}

impl BindingTable {
    /// Build the table for `module`, resolving import specifiers with `resolve`.
    pub fn build(module: &swc_ecma_ast::Module, resolve: impl Fn(&str) -> ImportTarget) -> Self {
        let mut table = Self::default();
        let mut targets: HashMap<String, ImportTarget> = HashMap::new();
        let mut target_of = |specifier: &str| -> ImportTarget {
            targets
                .entry(specifier.to_string())
                .or_insert_with(|| resolve(specifier))
                .clone()
        };

        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    if import.type_only {
                        continue;
                    }
                    let Some(package) = import.src.value.as_str() else {
                        continue;
                    };
                    let target = target_of(package);
                    table.add_dependency(&target);

                    for specifier in &import.specifiers {
                        let (local, origin) = match specifier {
                            ImportSpecifier::Named(named) if !named.is_type_only => {
                                let exported = named
                                    .imported
                                    .as_ref()
                                    .and_then(export_name)
                                    .unwrap_or_else(|| named.local.sym.to_string());
                                (
                                    named.local.sym.to_string(),
                                    Origin::ImportedFrom {
                                        package: package.to_string(),
                                        target: target.clone(),
                                        exported,
                                    },
                                )
                            }
                            ImportSpecifier::Named(_) => continue,
                            ImportSpecifier::Default(default) => (
                                default.local.sym.to_string(),
                                Origin::ImportedFrom {
                                    package: package.to_string(),
                                    target: target.clone(),
                                    exported: "default".to_string(),
                                },
                            ),
                            ImportSpecifier::Namespace(namespace) => (
                                namespace.local.sym.to_string(),
                                Origin::NamespaceImport {
                                    package: package.to_string(),
                                    target: target.clone(),
                                },
                            ),
                        };
                        table.bindings.insert(local, origin);
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    for name in table.add_decl(&export.decl) {
                        table.exports.insert(name.clone(), Export::Local(name));
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
                    if named.type_only {
                        continue;
                    }
                    let source = named
                        .src
                        .as_ref()
                        .and_then(|src| src.value.as_str())
                        .map(|package| (package.to_string(), target_of(package)));
                    if let Some((_, target)) = &source {
                        table.add_dependency(target);
                    }

                    for specifier in &named.specifiers {
                        match (specifier, &source) {
                            (ExportSpecifier::Named(spec), _) if spec.is_type_only => {}
                            (ExportSpecifier::Named(spec), None) => {
                                let Some(local) = export_name(&spec.orig) else {
                                    continue;
                                };
                                let exported = spec
                                    .exported
                                    .as_ref()
                                    .and_then(export_name)
                                    .unwrap_or_else(|| local.clone());
                                table.exports.insert(exported, Export::Local(local));
                            }
                            (ExportSpecifier::Named(spec), Some((package, target))) => {
                                let Some(imported) = export_name(&spec.orig) else {
                                    continue;
                                };
                                let exported = spec
                                    .exported
                                    .as_ref()
                                    .and_then(export_name)
                                    .unwrap_or_else(|| imported.clone());
                                table.exports.insert(
                                    exported,
                                    Export::Reexport {
                                        package: package.clone(),
                                        target: target.clone(),
                                        imported,
                                    },
                                );
                            }
                            (ExportSpecifier::Namespace(spec), Some((package, target))) => {
                                if let Some(exported) = export_name(&spec.name) {
                                    table.exports.insert(
                                        exported,
                                        Export::NamespaceReexport {
                                            package: package.clone(),
                                            target: target.clone(),
                                        },
                                    );
                                }
                            }
                            _ => {}
                        }
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportAll(all)) => {
                    if all.type_only {
                        continue;
                    }
                    if let Some(package) = all.src.value.as_str() {
                        let target = target_of(package);
                        table.add_dependency(&target);
                        table.star_exports.push(StarExport {
                            package: package.to_string(),
                            target,
                        });
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(default)) => {
                    let local = match &*default.expr {
                        Expr::Ident(ident) => ident.sym.to_string(),
                        expr => {
                            table.bindings.insert(
                                DEFAULT_EXPORT_LOCAL.to_string(),
                                Origin::LocalExpr(Box::new(expr.clone())),
                            );
                            DEFAULT_EXPORT_LOCAL.to_string()
                        }
                    };
                    table
                        .exports
                        .insert("default".to_string(), Export::Local(local));
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default)) => {
                    if let DefaultDecl::Fn(fn_expr) = &default.decl {
                        let local = fn_expr
                            .ident
                            .as_ref()
                            .map(|ident| ident.sym.to_string())
                            .unwrap_or_else(|| DEFAULT_EXPORT_LOCAL.to_string());
                        table.bindings.insert(
                            local.clone(),
                            Origin::LocalFunction(fn_expr.function.clone()),
                        );
                        table
                            .exports
                            .insert("default".to_string(), Export::Local(local));
                    }
                }
                ModuleItem::Stmt(Stmt::Decl(decl)) => {
                    table.add_decl(decl);
                }
                _ => {}
            }
        }

        table.fold_literals();
        table
    }

    /// Record a declaration and return the names it introduces.
    fn add_decl(&mut self, decl: &Decl) -> Vec<String> {
        match decl {
            Decl::Var(var) => self.add_var_decl(var),
            Decl::Fn(fn_decl) => {
                let name = fn_decl.ident.sym.to_string();
                self.bindings.insert(
                    name.clone(),
                    Origin::LocalFunction(fn_decl.function.clone()),
                );
                vec![name]
            }
            Decl::Class(class) => vec![class.ident.sym.to_string()],
            _ => Vec::new(),
        }
    }

    fn add_var_decl(&mut self, var: &VarDecl) -> Vec<String> {
        let mut names = Vec::new();
        for declarator in &var.decls {
            if let Pat::Ident(ident) = &declarator.name
                && let Some(init) = &declarator.init
            {
                let name = ident.id.sym.to_string();
                self.bindings
                    .insert(name.clone(), Origin::LocalExpr(init.clone()));
                names.push(name);
            }
        }
        names
    }

    fn add_dependency(&mut self, target: &ImportTarget) {
        if let ImportTarget::Local(id) = target
            && !self.dependencies.contains(id)
        {
            self.dependencies.push(id.clone());
        }
    }

    /// Turn `LocalExpr` initializers that fold using only this file into `LocalLiteral`.
    fn fold_literals(&mut self) {
        let folded: Vec<(String, String)> = {
            let env = TableEnv {
                table: self,
                depth: std::cell::Cell::new(0),
                visiting: std::cell::RefCell::new(HashSet::new()),
            };
            self.bindings
                .iter()
                .filter_map(|(name, origin)| match origin {
                    Origin::LocalExpr(expr) => {
                        let value = env.fold(name, expr)?;
                        Some((name.clone(), value))
                    }
                    _ => None,
                })
                .collect()
        };

        for (name, value) in folded {
            self.bindings.insert(name, Origin::LocalLiteral(value));
        }
    }

    pub fn binding(&self, name: &str) -> Option<&Origin> {
        self.bindings.get(name)
    }

    pub fn export(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }

    pub fn has_export(&self, name: &str) -> bool {
        self.exports.contains_key(name)
    }

    pub fn star_exports(&self) -> &[StarExport] {
        &self.star_exports
    }

    /// Local modules referenced by imports and re-exports, in source order.
    pub fn local_dependencies(&self) -> &[ModuleId] {
        &self.dependencies
    }

    /// The function bound to a top-level `name`, if it is one.
    pub fn function(&self, name: &str) -> Option<FnLike<'_>> {
        match self.bindings.get(name)? {
            Origin::LocalFunction(function) => Some(FnLike::Function(function)),
            Origin::LocalExpr(expr) => FnLike::from_expr(expr),
            _ => None,
        }
    }
}

/// Evaluates names against the table being built; imports are opaque here.
struct TableEnv<'t> {
    table: &'t BindingTable,
    depth: std::cell::Cell<usize>,
    visiting: std::cell::RefCell<HashSet<String>>,
}

impl TableEnv<'_> {
    fn fold(&self, name: &str, expr: &Expr) -> Option<String> {
        if self.depth.get() >= MAX_FOLD_DEPTH || !self.visiting.borrow_mut().insert(name.to_string())
        {
            return None;
        }
        self.depth.set(self.depth.get() + 1);
        let value = ValueAnalyzer::new(self).analyze_expr(expr);
        self.depth.set(self.depth.get() - 1);
        self.visiting.borrow_mut().remove(name);
        value
    }
}

impl Env for TableEnv<'_> {
    fn string(&self, name: &str) -> Option<String> {
        match self.table.bindings.get(name)? {
            Origin::LocalLiteral(value) => Some(value.clone()),
            Origin::LocalExpr(expr) => self.fold(name, expr),
            _ => None,
        }
    }

    fn string_array(&self, name: &str) -> Option<Vec<String>> {
        match self.table.bindings.get(name)? {
            Origin::LocalExpr(expr) => ValueAnalyzer::new(self).analyze_string_array(expr),
            _ => None,
        }
    }
}
