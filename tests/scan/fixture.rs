use anyhow::Result;
use i18n_scan::{I18nPackage, ScanOptions, scan};
use pretty_assertions::assert_eq;

use crate::{Project, expected, fixture_root, scan_fixture};

const DEFAULT_KEYS: &[&str] = &[
    "GLOBAL_T",
    "HOC_COMPONENT",
    "I18N_CODE_CROSS_FILE",
    "I18N_CODE_DYNAMIC_hello",
    "I18N_CODE_DYNAMIC_world",
    "I18N_CODE_FROM_STRING_LITERAL",
    "I18N_CODE_FROM_TEMPLATE_LITERAL",
    "MEMBER_CALL_T",
    "MEMBER_T",
    "NAMESPACE_IMPORT",
    "RENAME_BOTH",
    "RENAME_T",
    "RENAME_USE_TRANSLATION",
    "TRANSLATION_COMPONENT",
    "TRANS_COMPONENT",
    "WRAPPED_USE_TRANSLATION",
];

#[test]
fn test_entry_yields_four_namespaces() -> Result<()> {
    let report = scan_fixture(&["src/index.tsx"], &[])?;

    assert_eq!(
        report.result,
        expected(&[
            ("default", DEFAULT_KEYS),
            ("namespace_1", &["HOOK_WITH_NAMESPACE", "T_WITH_NAMESPACE"]),
            ("namespace_2", &["NAMESPACE_OVERRIDE"]),
            (
                "namespace_3",
                &["NAMESPACE_FROM_VAR", "WRAPPED_USE_TRANSLATION_NS"]
            ),
        ])
    );
    assert_eq!(report.result.namespace_count(), 4);
    assert!(report.parse_failures.is_empty());
    Ok(())
}

#[test]
fn test_unregistered_custom_package_contributes_nothing() -> Result<()> {
    // CustomHookInline imports `@custom/i18n`, which is not registered here.
    let report = scan_fixture(&["src/index.tsx"], &[])?;
    assert!(report.result.get("namespace_4").is_none());
    Ok(())
}

#[test]
fn test_scan_is_idempotent() -> Result<()> {
    let first = scan_fixture(&["src/index.tsx"], &[])?;
    let second = scan_fixture(&["src/index.tsx"], &[])?;
    assert_eq!(first.result, second.result);
    assert_eq!(first.modules_visited, second.modules_visited);
    Ok(())
}

#[test]
fn test_secondary_entries() -> Result<()> {
    let report = scan_fixture(
        &[
            "src/TransNsComp.tsx",
            "src/TranslationNsComp.tsx",
            "src/UseTranslationNsArray.tsx",
            "src/TArray.tsx",
            "src/PostCollectorCrossFile/Component.tsx",
            "src/WrapUseTranslationAlt/Component.tsx",
        ],
        &[],
    )?;

    assert_eq!(
        report.result,
        expected(&[
            (
                "default",
                &["POST_COLLECTOR_KEY", "T_ARRAY", "WRAPPED_USE_TRANSLATION_ALT"]
            ),
            ("namespace_array", &["USE_TRANSLATION_NS_ARRAY"]),
            ("namespace_trans", &["TRANS_COMPONENT_WITH_NS"]),
            ("namespace_translation", &["TRANSLATION_COMPONENT_WITH_NS"]),
        ])
    );
    Ok(())
}

#[test]
fn test_externals_are_never_parsed() -> Result<()> {
    let report = scan_fixture(&["src/index.tsx"], &["./globalT", "@/memberT"])?;

    assert!(!report.result.contains("default", "GLOBAL_T"));
    assert!(!report.result.contains("default", "MEMBER_T"));
    assert!(report.result.contains("default", "HOC_COMPONENT"));

    let full = scan_fixture(&["src/index.tsx"], &[])?;
    assert_eq!(report.modules_visited + 2, full.modules_visited);
    Ok(())
}

#[test]
fn test_parse_failure_is_isolated() -> Result<()> {
    let report = scan_fixture(&["src/broken.tsx", "src/TArray.tsx"], &[])?;

    assert_eq!(report.result, expected(&[("default", &["T_ARRAY"])]));
    assert_eq!(report.parse_failures.len(), 1);
    assert!(report.parse_failures[0].path.ends_with("broken.tsx"));
    Ok(())
}

#[test]
fn test_missing_entry_is_an_error() {
    let err = scan_fixture(&["src/DoesNotExist.tsx"], &[]).unwrap_err();
    assert!(format!("{:#}", err).contains("Entry file not found"));
}

#[test]
fn test_custom_package_with_extension() -> Result<()> {
    let root = fixture_root();
    let report = scan(&ScanOptions {
        entry_paths: vec![root.join("src/custom-i18n/index.tsx")],
        extend_i18n_packages: vec![I18nPackage {
            package_path: "@custom/i18n".to_string(),
            members: vec![],
        }],
        ..Default::default()
    })?;

    assert_eq!(
        report.result,
        expected(&[
            (
                "default",
                &[
                    "HOC_COMPONENT",
                    "I18N_CODE_CROSS_FILE",
                    "I18N_CODE_FROM_STRING_LITERAL",
                    "I18N_CODE_FROM_TEMPLATE_LITERAL",
                    "MEMBER_CALL_T",
                    "NAMESPACE_IMPORT",
                    "RENAME_BOTH",
                    "RENAME_T",
                    "RENAME_USE_TRANSLATION",
                    "TRANSLATION_COMPONENT",
                    "WRAPPED_USE_TRANSLATION",
                ]
            ),
            ("namespace_1", &["HOOK_WITH_NAMESPACE", "T_WITH_NAMESPACE"]),
            ("namespace_2", &["NAMESPACE_OVERRIDE"]),
            (
                "namespace_3",
                &["NAMESPACE_FROM_VAR", "WRAPPED_USE_TRANSLATION_NS"]
            ),
            ("namespace_4", &["CUSTOM_HOOK"]),
        ])
    );
    Ok(())
}

#[test]
fn test_custom_package_without_extension_is_opaque() -> Result<()> {
    let root = fixture_root();
    let report = scan(&ScanOptions {
        entry_paths: vec![root.join("src/custom-i18n/index.tsx")],
        ..Default::default()
    })?;
    assert!(report.result.is_empty());
    Ok(())
}

#[test]
fn test_extension_package_matches_builtin() -> Result<()> {
    let custom_dir = fixture_root().join("src/custom-i18n");

    let custom = Project::new()?;
    custom.copy_dir(&custom_dir, &|source: &str| source.to_string())?;
    let builtin = Project::new()?;
    builtin.copy_dir(&custom_dir, &|source: &str| {
        source.replace("'@custom/i18n'", "'react-i18next'")
    })?;

    let extended = custom.scan_with(
        "index.tsx",
        vec![I18nPackage {
            package_path: "@custom/i18n".to_string(),
            members: vec![],
        }],
    )?;
    assert!(!extended.is_empty());
    assert_eq!(extended, builtin.scan("index.tsx")?);
    Ok(())
}
