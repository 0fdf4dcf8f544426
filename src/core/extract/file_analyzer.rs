//! Per-file call-site classifier.
//!
//! Walks one module's AST with a scoped binding context and records every
//! `(namespace, key)` pair it can prove statically. Local names are tracked
//! in [`BindingContext`]; names the file does not bind are answered by the
//! cross-module symbol resolver.
//!
//! Recognized call sites:
//! - `t('KEY')` for any translator (hook result, package `t`, `i18n.t`,
//!   render-prop parameter, HOC-injected prop)
//! - `<Trans i18nKey="KEY" />`
//! - calls of local functions that forward to a translator (key wrappers)
//!   or return one (derived hooks), expanded per call with the call's
//!   argument values
//! - callbacks of `map`/`forEach`/... over literal string arrays, expanded
//!   once per element

use std::{
    cell::Cell,
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use swc_ecma_ast::{
    ArrowExpr, CallExpr, Callee, Class, ClassDecl, DefaultDecl, ExportDefaultDecl, Expr,
    ExprOrSpread, FnDecl, Function, JSXAttrValue, JSXElement, JSXElementChild, JSXElementName,
    JSXExpr, JSXObject, MemberExpr, MemberProp, ObjectLit, ObjectPatProp, Pat, Prop,
    PropOrSpread, ReturnStmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::{
    binding_context::BindingContext,
    expansion::{ArgValue, Expansion},
    helpers::{
        FnLike, extract_binding_names, extract_member_name, extract_prop_name, jsx_attr,
        jsx_attr_expr, unwrap_ts_expr,
    },
    namespace::{eval_namespace, options_namespace, resolve_namespace},
    translator::{DeferredExpr, FunctionRef, ScopeBinding, TranslatorBinding, TranslatorRole},
    value_analyzer::{Env, ITERATOR_METHODS, ValueAnalyzer, combinations, referenced_idents},
};
use crate::core::{KeyOccurrence, context::ScanContext, loader::ParsedModule, symbols::Symbol};

/// Nesting limit for function expansion at call sites.
const MAX_EXPANSION_DEPTH: usize = 6;

/// Nesting limit for lazily evaluated local declarations.
const MAX_EVAL_DEPTH: usize = 32;

/// How the parameters of an analyzed function are bound.
enum ParamBinding {
    /// Component wrapped by `withTranslation()`: the first parameter is props.
    HocProps(Option<String>),
    /// `<Translation>{(t, { i18n }) => ...}</Translation>`.
    RenderProp(Option<String>),
    /// Values of an expanded call, by position.
    Arguments(Vec<ArgValue>),
    /// Callback of an iteration over these values.
    Iteration(Vec<String>),
}

pub struct FileAnalyzer<'a> {
    ctx: &'a ScanContext,
    module: &'a ParsedModule,
    binding_context: BindingContext<ScopeBinding>,
    /// Component name -> namespace of the `withTranslation()` that wraps it.
    hoc_components: HashMap<String, Option<String>>,
    /// `this.props` of the class component being visited, when it is wrapped.
    class_props: Option<TranslatorBinding>,
    expansion_stack: Vec<FunctionRef>,
    capture_returns: bool,
    fn_depth: usize,
    returned: Option<ScopeBinding>,
    /// Set when a depth or cycle limit cut an expansion short.
    truncated: bool,
    occurrences: Vec<KeyOccurrence>,
}

impl<'a> FileAnalyzer<'a> {
    pub fn new(ctx: &'a ScanContext, module: &'a ParsedModule) -> Self {
        Self {
            ctx,
            module,
            binding_context: BindingContext::new(),
            hoc_components: HashMap::new(),
            class_props: None,
            expansion_stack: Vec::new(),
            capture_returns: false,
            fn_depth: 0,
            returned: None,
            truncated: false,
            occurrences: Vec::new(),
        }
    }

    fn nested(
        ctx: &'a ScanContext,
        module: &'a ParsedModule,
        expansion_stack: Vec<FunctionRef>,
    ) -> Self {
        Self {
            expansion_stack,
            capture_returns: true,
            ..Self::new(ctx, module)
        }
    }

    /// Classify every call site of the module.
    pub fn analyze(mut self) -> Vec<KeyOccurrence> {
        let module = self.module;
        self.collect_hoc_components();
        module.module.visit_with(&mut self);
        self.occurrences
    }

    fn collect_hoc_components(&mut self) {
        let mut collector = HocCallCollector::default();
        self.module.module.visit_with(&mut collector);

        for (inner, component) in collector.calls {
            let Callee::Expr(callee) = &inner.callee else {
                continue;
            };
            if let Some(ScopeBinding::Hoc(default_ns)) = self.denote_static(callee) {
                let namespace = self.call_namespace(&inner, default_ns);
                self.hoc_components.insert(component, namespace);
            }
        }
    }

    // ---- name resolution ------------------------------------------------

    /// What `name` denotes here, without evaluating anything.
    ///
    /// Plain values (literals, declarations, iteration variables) are left to
    /// the value analyzer and yield `None`.
    fn resolve_ref(&self, name: &str) -> Option<ScopeBinding> {
        let binding = match self.binding_context.get_binding(name) {
            Some(binding) => binding.clone(),
            None => ScopeBinding::from_symbol(self.module_symbol(name))?,
        };
        match binding {
            ScopeBinding::Shadowed
            | ScopeBinding::Literal(_)
            | ScopeBinding::Iteration(_)
            | ScopeBinding::Expr(_) => None,
            other => Some(other),
        }
    }

    fn module_symbol(&self, name: &str) -> Symbol {
        self.ctx.resolve_local(self.module, name)
    }

    /// Static meaning of an identifier or member chain.
    fn denote_static(&self, expr: &Expr) -> Option<ScopeBinding> {
        match unwrap_ts_expr(expr) {
            Expr::Ident(ident) => self.resolve_ref(ident.sym.as_str()),
            Expr::Member(member) => {
                if let Some(props) = self.this_props(member) {
                    return Some(props);
                }
                let object = self.denote_static(&member.obj)?;
                self.member_of(object, &extract_member_name(&member.prop)?)
            }
            _ => None,
        }
    }

    fn this_props(&self, member: &MemberExpr) -> Option<ScopeBinding> {
        let props = self.class_props.as_ref()?;
        if matches!(&*member.obj, Expr::This(_))
            && extract_member_name(&member.prop).as_deref() == Some("props")
        {
            return Some(ScopeBinding::TranslatorObject(props.clone()));
        }
        None
    }

    fn member_of(&self, object: ScopeBinding, prop: &str) -> Option<ScopeBinding> {
        match object {
            ScopeBinding::TranslatorObject(binding) => match prop {
                "t" => Some(ScopeBinding::Translator(binding)),
                // The instance `t` is not bound to the hook's namespace.
                "i18n" => Some(ScopeBinding::TranslatorObject(TranslatorBinding::new(
                    None,
                    TranslatorRole::ObjectMemberT,
                ))),
                _ => None,
            },
            ScopeBinding::I18nNamespace(package) => self
                .ctx
                .registry
                .entry(&package, prop)
                .map(ScopeBinding::from_entry),
            ScopeBinding::ModuleNamespace(id) => {
                ScopeBinding::from_symbol(self.ctx.resolve_export(&id, prop))
            }
            _ => None,
        }
    }

    // ---- value evaluation -----------------------------------------------

    fn eval_string(&self, expr: &Expr, assignment: &HashMap<String, String>) -> Option<String> {
        let env = ScopeEnv::new(self, assignment);
        ValueAnalyzer::new(&env).analyze_expr(expr)
    }

    fn eval_string_array(&self, expr: &Expr) -> Option<Vec<String>> {
        let assignment = HashMap::new();
        let env = ScopeEnv::new(self, &assignment);
        ValueAnalyzer::new(&env).analyze_string_array(expr)
    }

    fn eval_ns(&self, expr: &Expr, assignment: &HashMap<String, String>) -> Option<String> {
        let env = ScopeEnv::new(self, assignment);
        eval_namespace(expr, &ValueAnalyzer::new(&env))
    }

    fn eval_options_ns(
        &self,
        options: &Expr,
        assignment: &HashMap<String, String>,
    ) -> Option<String> {
        let env = ScopeEnv::new(self, assignment);
        options_namespace(options, &ValueAnalyzer::new(&env))
    }

    /// Namespace from the first argument of a hook or HOC call.
    fn call_namespace(&self, call: &CallExpr, default_ns: Option<String>) -> Option<String> {
        call.args
            .first()
            .filter(|arg| arg.spread.is_none())
            .and_then(|arg| self.eval_ns(&arg.expr, &HashMap::new()))
            .or(default_ns)
    }

    /// Iteration variables reachable from `exprs`, directly or through local
    /// declarations.
    fn iteration_vars(&self, exprs: &[&Expr]) -> Vec<(String, Vec<String>)> {
        let mut pending: Vec<(String, Option<ScopeBinding>)> = exprs
            .iter()
            .flat_map(|expr| self.capture(expr))
            .collect();
        let mut seen = BTreeSet::new();
        let mut vars = Vec::new();

        // Declarations are followed through the bindings they captured, not
        // through whatever their names mean at the use site.
        while let Some((name, binding)) = pending.pop() {
            match binding {
                Some(ScopeBinding::Iteration(values)) => {
                    if seen.insert(name.clone()) {
                        vars.push((name, values));
                    }
                }
                Some(ScopeBinding::Expr(deferred)) => pending.extend(deferred.captured),
                _ => {}
            }
        }
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// The bindings the free names of `expr` have in the current scope.
    fn capture(&self, expr: &Expr) -> Vec<(String, Option<ScopeBinding>)> {
        referenced_idents(expr)
            .into_iter()
            .map(|name| {
                let binding = self.binding_context.get_binding(&name).cloned();
                (name, binding)
            })
            .collect()
    }

    /// Fold a local initializer now, or keep it with the bindings it sees
    /// here for evaluation at each use.
    fn declare_value(&self, init: &Expr) -> ScopeBinding {
        if let Some(value) = self.eval_string(init, &HashMap::new()) {
            return ScopeBinding::Literal(value);
        }
        ScopeBinding::Expr(Box::new(DeferredExpr {
            expr: init.clone(),
            captured: self.capture(init),
        }))
    }

    /// Every assignment of the iteration variables `exprs` depend on; a single
    /// empty assignment when there are none.
    fn assignments(&self, exprs: &[&Expr]) -> Vec<HashMap<String, String>> {
        combinations(&self.iteration_vars(exprs))
    }

    // ---- visiting evaluation --------------------------------------------

    /// Visit `expr` once and return what it denotes.
    fn eval_expr(&mut self, expr: &Expr) -> Option<ScopeBinding> {
        match unwrap_ts_expr(expr) {
            Expr::Call(call) => self.handle_call(call),
            ident @ Expr::Ident(_) => self.denote_static(ident),
            Expr::Member(member) => {
                if let Some(props) = self.this_props(member) {
                    return Some(props);
                }
                let object = self.eval_expr(&member.obj);
                if let MemberProp::Computed(computed) = &member.prop {
                    computed.visit_with(self);
                }
                self.member_of(object?, &extract_member_name(&member.prop)?)
            }
            Expr::Object(obj) => {
                obj.visit_with(self);
                self.object_translator(obj)
            }
            other => {
                other.visit_with(self);
                None
            }
        }
    }

    /// `{ t }` or `{ t: value }` holding a translator is a translator object.
    fn object_translator(&self, obj: &ObjectLit) -> Option<ScopeBinding> {
        obj.props.iter().rev().find_map(|prop| {
            let PropOrSpread::Prop(prop) = prop else {
                return None;
            };
            let value = match &**prop {
                Prop::Shorthand(ident) if ident.sym == "t" => self.resolve_ref("t"),
                Prop::KeyValue(kv) if extract_prop_name(&kv.key).as_deref() == Some("t") => {
                    self.denote_static(&kv.value)
                }
                _ => None,
            };
            match value {
                Some(ScopeBinding::Translator(binding)) => {
                    Some(ScopeBinding::TranslatorObject(binding))
                }
                _ => None,
            }
        })
    }

    fn visit_args(&mut self, args: &[ExprOrSpread]) {
        for arg in args {
            arg.visit_with(self);
        }
    }

    fn handle_call(&mut self, call: &CallExpr) -> Option<ScopeBinding> {
        let Callee::Expr(callee) = &call.callee else {
            call.visit_children_with(self);
            return None;
        };
        if self.try_iteration(call, callee) {
            return None;
        }

        match self.eval_expr(callee) {
            Some(ScopeBinding::Translator(binding)) => {
                self.record_translation_call(call, &binding);
                self.visit_args(&call.args);
                None
            }
            Some(ScopeBinding::Hook(default_ns)) => {
                let namespace = self.call_namespace(call, default_ns);
                self.visit_args(&call.args);
                Some(ScopeBinding::TranslatorObject(TranslatorBinding::new(
                    namespace,
                    TranslatorRole::HookT,
                )))
            }
            Some(ScopeBinding::Hoc(default_ns)) => {
                let namespace = self.call_namespace(call, default_ns);
                self.visit_args(&call.args);
                Some(ScopeBinding::HocApplied(namespace))
            }
            Some(ScopeBinding::HocApplied(namespace)) => {
                for (index, arg) in call.args.iter().enumerate() {
                    match FnLike::from_expr(&arg.expr) {
                        Some(component) if index == 0 => self.analyze_function(
                            component,
                            Some(ParamBinding::HocProps(namespace.clone())),
                        ),
                        _ => arg.visit_with(self),
                    }
                }
                None
            }
            Some(ScopeBinding::Function(function)) => {
                let arguments = self.argument_values(call);
                self.visit_args(&call.args);
                self.expand(&function, arguments)
            }
            _ => {
                self.visit_args(&call.args);
                None
            }
        }
    }

    /// `values.map((v) => ...)` over a literal string array: analyze the
    /// callback with its parameter bound to the values.
    fn try_iteration(&mut self, call: &CallExpr, callee: &Expr) -> bool {
        let Expr::Member(member) = unwrap_ts_expr(callee) else {
            return false;
        };
        let Some(method) = extract_member_name(&member.prop) else {
            return false;
        };
        if !ITERATOR_METHODS.contains(&method.as_str()) {
            return false;
        }
        let Some(callback) = call
            .args
            .first()
            .filter(|arg| arg.spread.is_none())
            .and_then(|arg| FnLike::from_expr(&arg.expr))
        else {
            return false;
        };
        let Some(values) = self.eval_string_array(&member.obj) else {
            return false;
        };

        member.obj.visit_with(self);
        self.analyze_function(callback, Some(ParamBinding::Iteration(values)));
        self.visit_args(&call.args[1..]);
        true
    }

    fn record_translation_call(&mut self, call: &CallExpr, binding: &TranslatorBinding) {
        let Some(key_arg) = call.args.first().filter(|arg| arg.spread.is_none()) else {
            return;
        };
        let options = call
            .args
            .get(1)
            .filter(|arg| arg.spread.is_none())
            .map(|arg| &*arg.expr);

        let mut exprs = vec![&*key_arg.expr];
        exprs.extend(options);

        for assignment in self.assignments(&exprs) {
            let Some(key) = self.eval_string(&key_arg.expr, &assignment) else {
                tracing::trace!(module = %self.module.id, "dynamic translation key");
                continue;
            };
            let call_ns = options.and_then(|options| self.eval_options_ns(options, &assignment));
            let namespace = resolve_namespace(call_ns, None, binding);
            self.occurrences.push(KeyOccurrence::new(namespace, key));
        }
    }

    // ---- expansion ------------------------------------------------------

    fn argument_values(&self, call: &CallExpr) -> Vec<Vec<ArgValue>> {
        let exprs: Vec<&Expr> = call
            .args
            .iter()
            .take_while(|arg| arg.spread.is_none())
            .map(|arg| &*arg.expr)
            .collect();

        self.assignments(&exprs)
            .iter()
            .map(|assignment| {
                exprs
                    .iter()
                    .map(|expr| self.argument_value(expr, assignment))
                    .collect()
            })
            .collect()
    }

    fn argument_value(&self, expr: &Expr, assignment: &HashMap<String, String>) -> ArgValue {
        match self.denote_static(expr) {
            Some(binding) if binding.is_translator_like() => ArgValue::from_binding(binding),
            _ => self
                .eval_string(expr, assignment)
                .map_or(ArgValue::Unknown, ArgValue::Literal),
        }
    }

    /// Analyze `function` once per argument tuple, adopting its occurrences.
    /// Returns the first translator-like value it returns.
    fn expand(
        &mut self,
        function: &FunctionRef,
        arguments: Vec<Vec<ArgValue>>,
    ) -> Option<ScopeBinding> {
        let mut returned = None;
        for args in arguments {
            if let Some(expansion) = self.expand_once(function, args) {
                self.occurrences
                    .extend(expansion.occurrences.iter().cloned());
                if returned.is_none() {
                    returned = expansion.returned.clone();
                }
            }
        }
        returned
    }

    fn expand_once(&mut self, function: &FunctionRef, args: Vec<ArgValue>) -> Option<Arc<Expansion>> {
        if let Some(expansion) = self.ctx.expansions.get(function, &args) {
            return Some(expansion);
        }
        if self.expansion_stack.len() >= MAX_EXPANSION_DEPTH
            || self.expansion_stack.contains(function)
        {
            tracing::trace!(function = %function.name, "expansion limit reached");
            self.truncated = true;
            return None;
        }

        let module = self.ctx.loader.module(&function.module)?;
        let body = module.table.function(&function.name)?;
        let mut stack = self.expansion_stack.clone();
        stack.push(function.clone());

        let mut nested = FileAnalyzer::nested(self.ctx, &module, stack);
        nested.analyze_function(body, Some(ParamBinding::Arguments(args.clone())));
        let truncated = nested.truncated;
        let expansion = Arc::new(Expansion {
            occurrences: nested.occurrences,
            returned: nested.returned,
        });

        // A cut-short expansion depends on the caller's stack; only complete
        // ones are shared.
        if truncated {
            self.truncated = true;
        } else {
            self.ctx
                .expansions
                .insert(function.clone(), args, Arc::clone(&expansion));
        }
        Some(expansion)
    }

    // ---- functions and bindings -----------------------------------------

    fn analyze_function(&mut self, function: FnLike<'_>, params: Option<ParamBinding>) {
        self.binding_context.enter_scope();
        self.fn_depth += 1;
        self.bind_params(&function.params(), params);

        match function {
            FnLike::Arrow(arrow) => match function.expr_body() {
                Some(expr) => {
                    let value = self.eval_expr(expr);
                    self.capture_return(value);
                }
                None => arrow.body.visit_with(self),
            },
            FnLike::Function(function) => {
                if let Some(body) = &function.body {
                    body.visit_with(self);
                }
            }
        }

        self.fn_depth -= 1;
        self.binding_context.exit_scope();
    }

    fn capture_return(&mut self, value: Option<ScopeBinding>) {
        if self.capture_returns && self.fn_depth == 1 && self.returned.is_none() {
            self.returned = value.filter(ScopeBinding::is_translator_like);
        }
    }

    fn bind_params(&mut self, params: &[&Pat], binding: Option<ParamBinding>) {
        match binding {
            None => {
                for pat in params {
                    self.shadow_pattern(pat);
                }
            }
            Some(ParamBinding::HocProps(namespace)) => {
                let props = TranslatorBinding::new(namespace, TranslatorRole::HocProp);
                for (index, pat) in params.iter().enumerate() {
                    let value = (index == 0).then(|| ScopeBinding::TranslatorObject(props.clone()));
                    self.bind_pattern(pat, value, None);
                }
            }
            Some(ParamBinding::RenderProp(namespace)) => {
                let render = TranslatorBinding::new(namespace, TranslatorRole::RenderProp);
                for (index, pat) in params.iter().enumerate() {
                    let value = match index {
                        0 => Some(ScopeBinding::Translator(render.clone())),
                        1 => Some(ScopeBinding::TranslatorObject(render.clone())),
                        _ => None,
                    };
                    self.bind_pattern(pat, value, None);
                }
            }
            Some(ParamBinding::Arguments(values)) => {
                for (index, pat) in params.iter().enumerate() {
                    let value = values.get(index).cloned().unwrap_or(ArgValue::Unknown);
                    self.bind_argument(pat, value);
                }
            }
            Some(ParamBinding::Iteration(values)) => {
                let mut values = Some(values);
                for pat in params {
                    match (pat, values.take()) {
                        (Pat::Ident(ident), Some(values)) => self
                            .binding_context
                            .insert_binding(ident.id.sym.to_string(), ScopeBinding::Iteration(values)),
                        _ => self.shadow_pattern(pat),
                    }
                }
            }
        }
    }

    fn bind_argument(&mut self, pat: &Pat, value: ArgValue) {
        match pat {
            Pat::Assign(assign) if value == ArgValue::Unknown => {
                let default = self
                    .eval_string(&assign.right, &HashMap::new())
                    .map_or(ArgValue::Unknown, ArgValue::Literal);
                self.bind_argument(&assign.left, default);
            }
            Pat::Assign(assign) => self.bind_argument(&assign.left, value),
            _ => self.bind_pattern(pat, value.into_binding(), None),
        }
    }

    /// Bind the names of `pat` to `value`, or to `init` for later evaluation.
    fn bind_pattern(&mut self, pat: &Pat, value: Option<ScopeBinding>, init: Option<&Expr>) {
        match pat {
            Pat::Ident(ident) => {
                let binding = value
                    .or_else(|| init.map(|expr| self.declare_value(expr)))
                    .unwrap_or(ScopeBinding::Shadowed);
                self.binding_context
                    .insert_binding(ident.id.sym.to_string(), binding);
            }
            Pat::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            let member = value
                                .clone()
                                .zip(extract_prop_name(&kv.key))
                                .and_then(|(object, key)| self.member_of(object, &key));
                            self.bind_pattern(&kv.value, member, None);
                        }
                        ObjectPatProp::Assign(assign) => {
                            let member = value
                                .clone()
                                .and_then(|object| self.member_of(object, assign.key.sym.as_str()));
                            self.binding_context.insert_binding(
                                assign.key.sym.to_string(),
                                member.unwrap_or(ScopeBinding::Shadowed),
                            );
                        }
                        ObjectPatProp::Rest(rest) => self.shadow_pattern(&rest.arg),
                    }
                }
            }
            Pat::Array(arr) => {
                for (index, elem) in arr.elems.iter().enumerate() {
                    let Some(elem) = elem else {
                        continue;
                    };
                    // `const [t, i18n] = useTranslation()`
                    let item = match &value {
                        Some(ScopeBinding::TranslatorObject(binding))
                            if binding.role == TranslatorRole::HookT =>
                        {
                            match index {
                                0 => Some(ScopeBinding::Translator(binding.clone())),
                                1 => self.member_of(
                                    ScopeBinding::TranslatorObject(binding.clone()),
                                    "i18n",
                                ),
                                _ => None,
                            }
                        }
                        _ => None,
                    };
                    self.bind_pattern(elem, item, None);
                }
            }
            Pat::Assign(assign) => {
                let init = if value.is_none() {
                    Some(&*assign.right)
                } else {
                    None
                };
                self.bind_pattern(&assign.left, value, init);
            }
            _ => self.shadow_pattern(pat),
        }
    }

    fn shadow_pattern(&mut self, pat: &Pat) {
        for name in extract_binding_names(pat) {
            self.binding_context
                .insert_binding(name, ScopeBinding::Shadowed);
        }
    }

    fn component_params(&self, name: &str) -> Option<ParamBinding> {
        self.hoc_components
            .get(name)
            .map(|namespace| ParamBinding::HocProps(namespace.clone()))
    }

    /// Hide a nested declaration from outer bindings. Top-level names are
    /// answered by the module's binding table.
    fn declare_local(&mut self, name: &str) {
        if !self.binding_context.is_global_scope() {
            self.binding_context
                .insert_binding(name.to_string(), ScopeBinding::Shadowed);
        }
    }

    fn visit_class_with_props(&mut self, class: &Class, namespace: Option<Option<String>>) {
        let props =
            namespace.map(|namespace| TranslatorBinding::new(namespace, TranslatorRole::HocProp));
        let outer = std::mem::replace(&mut self.class_props, props);
        class.visit_with(self);
        self.class_props = outer;
    }

    // ---- JSX ------------------------------------------------------------

    fn denote_jsx_name(&self, name: &JSXElementName) -> Option<ScopeBinding> {
        match name {
            // Lowercase names are intrinsic elements.
            JSXElementName::Ident(ident) if ident.sym.starts_with(|c: char| c.is_lowercase()) => {
                None
            }
            JSXElementName::Ident(ident) => self.resolve_ref(ident.sym.as_str()),
            JSXElementName::JSXMemberExpr(member) => {
                let object = self.denote_jsx_object(&member.obj)?;
                self.member_of(object, member.prop.sym.as_str())
            }
            JSXElementName::JSXNamespacedName(_) => None,
        }
    }

    fn denote_jsx_object(&self, obj: &JSXObject) -> Option<ScopeBinding> {
        match obj {
            JSXObject::Ident(ident) => self.resolve_ref(ident.sym.as_str()),
            JSXObject::JSXMemberExpr(member) => {
                let object = self.denote_jsx_object(&member.obj)?;
                self.member_of(object, member.prop.sym.as_str())
            }
        }
    }

    fn jsx_string(&self, value: &JSXAttrValue, assignment: &HashMap<String, String>) -> Option<String> {
        match value {
            JSXAttrValue::Str(s) => s.value.as_str().map(str::to_string),
            other => self.eval_string(jsx_attr_expr(other)?, assignment),
        }
    }

    fn jsx_namespace(&self, value: &JSXAttrValue, assignment: &HashMap<String, String>) -> Option<String> {
        match value {
            JSXAttrValue::Str(s) => s.value.as_str().map(str::to_string),
            other => self.eval_ns(jsx_attr_expr(other)?, assignment),
        }
    }

    /// `<Trans i18nKey=... ns=... t={t} />`
    fn record_trans(&mut self, node: &JSXElement) {
        let opening = &node.opening;
        let Some(key_value) = jsx_attr(opening, "i18nKey") else {
            return;
        };
        let ns_value = jsx_attr(opening, "ns");
        let binding = jsx_attr(opening, "t")
            .and_then(jsx_attr_expr)
            .and_then(|expr| match self.denote_static(expr) {
                Some(ScopeBinding::Translator(binding)) => Some(binding),
                _ => None,
            })
            .unwrap_or_else(|| TranslatorBinding::new(None, TranslatorRole::TMethod));

        let exprs: Vec<&Expr> = [Some(key_value), ns_value]
            .into_iter()
            .flatten()
            .filter_map(jsx_attr_expr)
            .collect();

        for assignment in self.assignments(&exprs) {
            let Some(key) = self.jsx_string(key_value, &assignment) else {
                continue;
            };
            let jsx_ns = ns_value.and_then(|value| self.jsx_namespace(value, &assignment));
            let namespace = resolve_namespace(None, jsx_ns, &binding);
            self.occurrences.push(KeyOccurrence::new(namespace, key));
        }
    }

    /// `<Translation ns=...>{(t) => ...}</Translation>`
    fn visit_translation(&mut self, node: &JSXElement) {
        let assignment = HashMap::new();
        let namespace =
            jsx_attr(&node.opening, "ns").and_then(|value| self.jsx_namespace(value, &assignment));
        node.opening.visit_with(self);

        for child in &node.children {
            if let JSXElementChild::JSXExprContainer(container) = child
                && let JSXExpr::Expr(expr) = &container.expr
                && let Some(render) = FnLike::from_expr(expr)
            {
                self.analyze_function(render, Some(ParamBinding::RenderProp(namespace.clone())));
            } else {
                child.visit_with(self);
            }
        }
    }
}

impl Visit for FileAnalyzer<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        self.handle_call(node);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Ident(ident) = &node.name
            && let Some(init) = &node.init
            && let Some(function) = FnLike::from_expr(init)
        {
            let name = ident.id.sym.to_string();
            self.declare_local(&name);
            let params = self.component_params(&name);
            self.analyze_function(function, params);
            return;
        }

        let init = node.init.as_deref();
        let value = init.and_then(|init| self.eval_expr(init));
        self.bind_pattern(&node.name, value, init);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        let name = node.ident.sym.to_string();
        self.declare_local(&name);
        let params = self.component_params(&name);
        self.analyze_function(FnLike::Function(&node.function), params);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        let namespace = self.hoc_components.get(node.ident.sym.as_str()).cloned();
        self.declare_local(node.ident.sym.as_str());
        self.visit_class_with_props(&node.class, namespace);
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl) {
        match &node.decl {
            DefaultDecl::Fn(fn_expr) => {
                let params = fn_expr
                    .ident
                    .as_ref()
                    .and_then(|ident| self.component_params(ident.sym.as_str()));
                self.analyze_function(FnLike::Function(&fn_expr.function), params);
            }
            DefaultDecl::Class(class_expr) => {
                let namespace = class_expr
                    .ident
                    .as_ref()
                    .and_then(|ident| self.hoc_components.get(ident.sym.as_str()).cloned());
                self.visit_class_with_props(&class_expr.class, namespace);
            }
            DefaultDecl::TsInterfaceDecl(_) => {}
        }
    }

    fn visit_function(&mut self, node: &Function) {
        self.analyze_function(FnLike::Function(node), None);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.analyze_function(FnLike::Arrow(node), None);
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) {
        if let Some(arg) = &node.arg {
            let value = self.eval_expr(arg);
            self.capture_return(value);
        }
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        match self.denote_jsx_name(&node.opening.name) {
            Some(ScopeBinding::TransComp) => {
                self.record_trans(node);
                node.visit_children_with(self);
            }
            Some(ScopeBinding::TranslationComp) => self.visit_translation(node),
            _ => node.visit_children_with(self),
        }
    }
}

/// Collects `hoc(...)(Component)` calls for the HOC pre-pass.
#[derive(Default)]
struct HocCallCollector {
    calls: Vec<(CallExpr, String)>,
}

impl Visit for HocCallCollector {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Call(inner) = unwrap_ts_expr(callee)
            && let Some(arg) = node.args.first()
            && let Expr::Ident(component) = unwrap_ts_expr(&arg.expr)
        {
            self.calls.push(((*inner).clone(), component.sym.to_string()));
        }
        node.visit_children_with(self);
    }
}

/// Name lookup for the value analyzer inside a file pass: the current
/// iteration assignment, then the scope chain, then module symbols.
struct ScopeEnv<'s, 'a> {
    analyzer: &'s FileAnalyzer<'a>,
    assignment: &'s HashMap<String, String>,
    depth: Cell<usize>,
}

impl<'s, 'a> ScopeEnv<'s, 'a> {
    fn new(analyzer: &'s FileAnalyzer<'a>, assignment: &'s HashMap<String, String>) -> Self {
        Self {
            analyzer,
            assignment,
            depth: Cell::new(0),
        }
    }

    fn nested<T>(&self, eval: impl FnOnce() -> Option<T>) -> Option<T> {
        let depth = self.depth.get();
        if depth >= MAX_EVAL_DEPTH {
            return None;
        }
        self.depth.set(depth + 1);
        let result = eval();
        self.depth.set(depth);
        result
    }
}

impl ScopeEnv<'_, '_> {
    fn string_of(&self, name: &str, binding: Option<&ScopeBinding>) -> Option<String> {
        match binding {
            Some(ScopeBinding::Iteration(_)) => self.assignment.get(name).cloned(),
            Some(ScopeBinding::Literal(value)) => Some(value.clone()),
            Some(ScopeBinding::Expr(deferred)) => self.nested(|| {
                let env = CapturedEnv {
                    scope: self,
                    deferred,
                };
                ValueAnalyzer::new(&env).analyze_expr(&deferred.expr)
            }),
            Some(_) => None,
            None => match self.analyzer.module_symbol(name) {
                Symbol::Literal(value) => Some(value),
                _ => None,
            },
        }
    }

    fn string_array_of(&self, name: &str, binding: Option<&ScopeBinding>) -> Option<Vec<String>> {
        match binding {
            Some(ScopeBinding::Expr(deferred)) => self.nested(|| {
                let env = CapturedEnv {
                    scope: self,
                    deferred,
                };
                ValueAnalyzer::new(&env).analyze_string_array(&deferred.expr)
            }),
            Some(_) => None,
            None => match self.analyzer.module_symbol(name) {
                Symbol::StringArray(values) => Some(values),
                _ => None,
            },
        }
    }
}

impl Env for ScopeEnv<'_, '_> {
    fn string(&self, name: &str) -> Option<String> {
        self.string_of(name, self.analyzer.binding_context.get_binding(name))
    }

    fn string_array(&self, name: &str) -> Option<Vec<String>> {
        self.string_array_of(name, self.analyzer.binding_context.get_binding(name))
    }
}

/// Name lookup inside a deferred declaration: its captured bindings, with
/// iteration variables taken from the current assignment.
struct CapturedEnv<'e, 's, 'a> {
    scope: &'e ScopeEnv<'s, 'a>,
    deferred: &'e DeferredExpr,
}

impl CapturedEnv<'_, '_, '_> {
    fn captured(&self, name: &str) -> Option<Option<&ScopeBinding>> {
        self.deferred
            .captured
            .iter()
            .find(|(captured, _)| captured == name)
            .map(|(_, binding)| binding.as_ref())
    }
}

impl Env for CapturedEnv<'_, '_, '_> {
    fn string(&self, name: &str) -> Option<String> {
        self.scope.string_of(name, self.captured(name)?)
    }

    fn string_array(&self, name: &str) -> Option<Vec<String>> {
        self.scope.string_array_of(name, self.captured(name)?)
    }
}
