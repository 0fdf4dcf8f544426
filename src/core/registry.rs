//! Recognizer registry.
//!
//! A table of `(package specifier, exported name) → role`. Built-ins are plain
//! data; callers extend it with `extendI18NPackages` descriptors. The registry
//! is assembled once per scan and read-only afterwards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Functional category of a recognized i18n export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// `useTranslation(ns?)` returning `{ t, i18n }` / `[t, i18n]`.
    Hook,
    /// A global `t(key, options?)`.
    TMethod,
    /// `<Trans i18nKey="..." />`.
    TransComp,
    /// `<Translation>{(t) => ...}</Translation>`.
    TranslationComp,
    /// `withTranslation(ns?)(Component)`.
    HocWrapper,
    /// An object whose `.t` member translates, e.g. `i18n.t(key)`.
    ObjectMemberT,
}

/// One member of an i18n package descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nMember {
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
    /// Namespace used when a call of this member names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
}

impl I18nMember {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            ns: None,
        }
    }
}

/// A package specifier and the i18n members it exposes.
///
/// An empty `members` list stands for the preset member set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nPackage {
    pub package_path: String,
    #[serde(default)]
    pub members: Vec<I18nMember>,
}

/// Member names every i18n package is assumed to expose.
pub const PRESET_MEMBERS: &[(&str, Role)] = &[
    ("useTranslation", Role::Hook),
    ("t", Role::TMethod),
    ("Trans", Role::TransComp),
    ("Translation", Role::TranslationComp),
    ("withTranslation", Role::HocWrapper),
    ("i18n", Role::ObjectMemberT),
];

pub const BUILTIN_PACKAGES: &[&str] = &["react-i18next", "i18next"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerEntry {
    pub role: Role,
    pub ns: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecognizerRegistry {
    packages: HashMap<String, HashMap<String, RecognizerEntry>>,
}

fn preset_members() -> impl Iterator<Item = I18nMember> {
    PRESET_MEMBERS
        .iter()
        .map(|(name, role)| I18nMember::new(*name, *role))
}

impl RecognizerRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for package in BUILTIN_PACKAGES {
            registry.insert_members(package, preset_members());
        }
        // `import i18next from 'i18next'` is the instance itself.
        registry.insert_members(
            "i18next",
            std::iter::once(I18nMember::new("default", Role::ObjectMemberT)),
        );
        registry
    }

    /// Built-ins merged with caller descriptors, in order.
    ///
    /// Extension members override built-in members of the same name. Roles a
    /// descriptor does not cover are filled with the preset member name.
    pub fn with_extensions(extensions: &[I18nPackage]) -> Self {
        let mut registry = Self::builtin();
        for package in extensions {
            let mut members = if package.members.is_empty() {
                preset_members().collect()
            } else {
                package.members.clone()
            };

            let mut covered: HashSet<Role> = members.iter().map(|member| member.role).collect();
            for member in preset_members() {
                if covered.insert(member.role) {
                    members.push(member);
                }
            }

            registry.insert_members(&package.package_path, members);
        }
        registry
    }

    fn insert_members(&mut self, package: &str, members: impl IntoIterator<Item = I18nMember>) {
        let entries = self.packages.entry(package.to_string()).or_default();
        for member in members {
            entries.insert(
                member.name,
                RecognizerEntry {
                    role: member.role,
                    ns: member.ns,
                },
            );
        }
    }

    pub fn entry(&self, package: &str, exported: &str) -> Option<&RecognizerEntry> {
        self.packages.get(package)?.get(exported)
    }

    pub fn role_of(&self, package: &str, exported: &str) -> Option<Role> {
        self.entry(package, exported).map(|entry| entry.role)
    }

    pub fn contains_package(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}
