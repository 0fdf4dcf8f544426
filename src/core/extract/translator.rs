//! What a local name denotes during a file pass.

use swc_ecma_ast::Expr;

use crate::core::{
    ModuleId,
    registry::{RecognizerEntry, Role},
    symbols::Symbol,
};

/// How a translator binding came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslatorRole {
    /// `t` from a hook call: `const { t } = useTranslation()`.
    HookT,
    /// A package-level `t` function.
    TMethod,
    /// `.t` of an i18n instance: `i18n.t(...)`.
    ObjectMemberT,
    /// First parameter of a `<Translation>` render prop.
    RenderProp,
    /// `t` injected into a component by `withTranslation()`.
    HocProp,
}

/// A name known to invoke translation lookups, with the namespace it carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslatorBinding {
    pub namespace: Option<String>,
    pub role: TranslatorRole,
}

impl TranslatorBinding {
    pub fn new(namespace: Option<String>, role: TranslatorRole) -> Self {
        Self { namespace, role }
    }
}

/// A top-level function that can be expanded at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    pub module: ModuleId,
    pub name: String,
}

/// A local initializer that did not fold where it was declared. `captured`
/// holds the binding each free name had at that point; `None` defers to the
/// module scope.
#[derive(Debug, Clone)]
pub struct DeferredExpr {
    pub expr: Expr,
    pub captured: Vec<(String, Option<ScopeBinding>)>,
}

/// What an expression or local name denotes for the classifier.
#[derive(Debug, Clone)]
pub enum ScopeBinding {
    /// Callable translator: `t`.
    Translator(TranslatorBinding),
    /// Object with a translator at `.t`: a hook result, an i18n instance, HOC props.
    TranslatorObject(TranslatorBinding),
    /// A Hook export, with the member's default namespace.
    Hook(Option<String>),
    /// A HOC export, with the member's default namespace.
    Hoc(Option<String>),
    /// `withTranslation(ns)`, ready to wrap a component.
    HocApplied(Option<String>),
    TransComp,
    TranslationComp,
    /// `import * as x` of an i18n package.
    I18nNamespace(String),
    /// `import * as x` of a local module.
    ModuleNamespace(ModuleId),
    Function(FunctionRef),
    Literal(String),
    /// Parameter of an iteration callback over these values.
    Iteration(Vec<String>),
    /// Local declaration evaluated on demand.
    Expr(Box<DeferredExpr>),
    /// A name that hides any outer binding.
    Shadowed,
}

impl ScopeBinding {
    /// The binding a recognized i18n export produces.
    pub fn from_entry(entry: &RecognizerEntry) -> Self {
        let ns = entry.ns.clone();
        match entry.role {
            Role::Hook => Self::Hook(ns),
            Role::TMethod => Self::Translator(TranslatorBinding::new(ns, TranslatorRole::TMethod)),
            Role::ObjectMemberT => {
                Self::TranslatorObject(TranslatorBinding::new(ns, TranslatorRole::ObjectMemberT))
            }
            Role::TransComp => Self::TransComp,
            Role::TranslationComp => Self::TranslationComp,
            Role::HocWrapper => Self::Hoc(ns),
        }
    }

    pub fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Literal(value) => Some(Self::Literal(value)),
            Symbol::I18nMember(entry) => Some(Self::from_entry(&entry)),
            Symbol::I18nNamespace { package } => Some(Self::I18nNamespace(package)),
            Symbol::ModuleNamespace(id) => Some(Self::ModuleNamespace(id)),
            Symbol::Function { module, name } => Some(Self::Function(FunctionRef { module, name })),
            Symbol::StringArray(_) | Symbol::Value | Symbol::Unknown => None,
        }
    }

    pub fn is_translator_like(&self) -> bool {
        matches!(self, Self::Translator(_) | Self::TranslatorObject(_))
    }
}
