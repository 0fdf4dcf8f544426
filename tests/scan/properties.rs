use anyhow::Result;
use i18n_scan::{ScanOptions, scan};
use pretty_assertions::assert_eq;

use crate::{Project, expected};

const COMPONENT: &str = r#"
import { useTranslation } from 'react-i18next'
import { TITLE } from './keys'

const sections = ['intro', 'outro']

export default function Page() {
  const { t } = useTranslation('page')
  return (
    <main>
      <h1>{t(TITLE)}</h1>
      {sections.map((section) => <p>{t(`SECTION_${section}`)}</p>)}
      <small>{t('FOOTER', { ns: 'common' })}</small>
    </main>
  )
}
"#;

const KEYS: &str = "export const TITLE = 'PAGE_TITLE'\n";

#[test]
fn test_renaming_locals_does_not_change_result() -> Result<()> {
    let original = Project::with_files(&[("index.tsx", COMPONENT), ("keys.ts", KEYS)])?;

    let renamed_component = COMPONENT
        .replace("useTranslation }", "useTranslation as useI18n }")
        .replace("= useTranslation(", "= useI18n(")
        .replace("{ t }", "{ t: translate }")
        .replace("{t(", "{translate(")
        .replace("sections", "parts")
        .replace("(section)", "(part)")
        .replace("${section}", "${part}")
        .replace("TITLE", "HEADING");
    let renamed = Project::with_files(&[
        ("index.tsx", &renamed_component),
        ("keys.ts", &KEYS.replace("const TITLE", "const HEADING")),
    ])?;

    let result = original.scan("index.tsx")?;
    assert_eq!(
        result,
        expected(&[
            ("common", &["FOOTER"]),
            ("page", &["PAGE_TITLE", "SECTION_intro", "SECTION_outro"]),
        ])
    );
    assert_eq!(renamed.scan("index.tsx")?, result);
    Ok(())
}

#[test]
fn test_namespace_precedence() -> Result<()> {
    let project = Project::with_files(&[(
        "index.tsx",
        r#"
import { useTranslation, Trans, t as globalT } from 'react-i18next'

export function App() {
  const { t } = useTranslation('hook_ns')
  return (
    <>
      {t('FROM_HOOK')}
      {t('FROM_CALL', { ns: 'call_ns' })}
      {globalT('GLOBAL')}
      <Trans i18nKey="TRANS_DEFAULT" />
      <Trans i18nKey="TRANS_ATTR" ns="attr_ns" />
      <Trans i18nKey="TRANS_BOUND" t={t} />
    </>
  )
}
"#,
    )])?;

    assert_eq!(
        project.scan("index.tsx")?,
        expected(&[
            ("attr_ns", &["TRANS_ATTR"]),
            ("call_ns", &["FROM_CALL"]),
            ("default", &["GLOBAL", "TRANS_DEFAULT"]),
            ("hook_ns", &["FROM_HOOK", "TRANS_BOUND"]),
        ])
    );
    Ok(())
}

#[test]
fn test_array_destructuring_matches_object_destructuring() -> Result<()> {
    let object_form = Project::with_files(&[(
        "index.tsx",
        r#"
import { useTranslation } from 'react-i18next'
export const App = () => {
  const { t, i18n } = useTranslation('ns')
  return <p>{t('KEY')}{i18n.t('INSTANCE')}</p>
}
"#,
    )])?;
    let array_form = Project::with_files(&[(
        "index.tsx",
        r#"
import { useTranslation } from 'react-i18next'
export const App = () => {
  const [t, i18n] = useTranslation('ns')
  return <p>{t('KEY')}{i18n.t('INSTANCE')}</p>
}
"#,
    )])?;

    let result = object_form.scan("index.tsx")?;
    assert_eq!(
        result,
        expected(&[("default", &["INSTANCE"]), ("ns", &["KEY"])])
    );
    assert_eq!(array_form.scan("index.tsx")?, result);
    Ok(())
}

#[test]
fn test_reexports_and_default_exports() -> Result<()> {
    let project = Project::with_files(&[
        (
            "index.tsx",
            r#"
import useLocal, { KEY_A as A, KEY_B } from './lib'

export const App = () => {
  const { t } = useLocal()
  return <>{t(A)}{t(KEY_B)}</>
}
"#,
        ),
        (
            "lib/index.ts",
            r#"
export { default } from './hook'
export * from './keys'
"#,
        ),
        (
            "lib/hook.ts",
            r#"
import { useTranslation } from 'react-i18next'
export default function useLocal() {
  return useTranslation('lib')
}
"#,
        ),
        (
            "lib/keys.ts",
            "export const KEY_A = 'A'\nexport const KEY_B = 'B'\n",
        ),
    ])?;

    assert_eq!(
        project.scan("index.tsx")?,
        expected(&[("lib", &["A", "B"])])
    );
    Ok(())
}

#[test]
fn test_cyclic_imports_terminate() -> Result<()> {
    let project = Project::with_files(&[
        (
            "a.ts",
            "import { t } from 'i18next'\nimport { B } from './b'\nexport const A = 'KEY_A'\nt(B)\n",
        ),
        (
            "b.ts",
            "import { t } from 'i18next'\nimport { A } from './a'\nexport const B = 'KEY_B'\nt(A)\n",
        ),
    ])?;

    assert_eq!(
        project.scan("a.ts")?,
        expected(&[("default", &["KEY_A", "KEY_B"])])
    );
    Ok(())
}

#[test]
fn test_cyclic_barrels_resolve_regardless_of_entry_order() -> Result<()> {
    let barrels = [
        ("a.ts", "export * from './b'\nexport * from './c'\n"),
        ("b.ts", "export * from './a'\n"),
        ("c.ts", "export const KEY = 'K'\n"),
    ];
    let via_a_first = r#"
import { t } from 'i18next'
import { KEY } from './a'
import { KEY as K2 } from './b'
t(KEY)
t(K2 + '_B')
"#;
    let via_b_first = r#"
import { t } from 'i18next'
import { KEY as K2 } from './b'
import { KEY } from './a'
t(K2 + '_B')
t(KEY)
"#;

    for entry in [via_a_first, via_b_first] {
        let mut files = vec![("index.ts", entry)];
        files.extend(barrels);
        let project = Project::with_files(&files)?;
        assert_eq!(
            project.scan("index.ts")?,
            expected(&[("default", &["K", "K_B"])])
        );
    }
    Ok(())
}

#[test]
fn test_local_declarations_are_not_captured_by_callback_params() -> Result<()> {
    let project = Project::with_files(&[(
        "index.tsx",
        r#"
import { useTranslation } from 'react-i18next'
const x = 'X'
export const App = () => {
  const { t } = useTranslation()
  const key = 'A_' + x
  return <>{['p', 'q'].map((x) => t(key))}</>
}
"#,
    )])?;

    assert_eq!(project.scan("index.tsx")?, expected(&[("default", &["A_X"])]));
    Ok(())
}

#[test]
fn test_tsconfig_extends_package_and_array_forms() -> Result<()> {
    let project = Project::with_files(&[
        (
            "node_modules/@acme/tsconfig/base.json",
            r#"{ "compilerOptions": { "baseUrl": "../../..", "paths": { "~/*": ["src/*"] } } }"#,
        ),
        (
            "configs/strict.json",
            r#"{ "compilerOptions": { "strict": true } }"#,
        ),
        (
            "tsconfig.json",
            r#"{ "extends": ["@acme/tsconfig/base.json", "./configs/strict"] }"#,
        ),
        (
            "src/index.tsx",
            "import { t } from 'i18next'\nimport { KEY } from '~/keys'\nt(KEY)\n",
        ),
        ("src/keys.ts", "export const KEY = 'FROM_PACKAGE_BASE'\n"),
    ])?;

    let report = scan(&ScanOptions {
        entry_paths: vec![project.path("src/index.tsx")],
        tsconfig_path: Some(project.path("tsconfig.json")),
        ..Default::default()
    })?;
    assert_eq!(
        report.result,
        expected(&[("default", &["FROM_PACKAGE_BASE"])])
    );
    Ok(())
}

#[test]
fn test_tsconfig_extends_with_comments() -> Result<()> {
    let project = Project::with_files(&[
        (
            "tsconfig.base.json",
            r#"{
  // shared aliases
  "compilerOptions": {
    "baseUrl": ".",
    "paths": { "~/*": ["src/*"], },
  },
}"#,
        ),
        ("tsconfig.json", r#"{ "extends": "./tsconfig.base.json" }"#),
        (
            "src/index.tsx",
            r#"
import { t } from 'i18next'
import { KEY } from '~/keys'
t(KEY)
"#,
        ),
        ("src/keys.ts", "export const KEY = 'ALIASED'\n"),
    ])?;

    let report = scan(&ScanOptions {
        entry_paths: vec![project.path("src/index.tsx")],
        tsconfig_path: Some(project.path("tsconfig.json")),
        ..Default::default()
    })?;
    assert_eq!(report.result, expected(&[("default", &["ALIASED"])]));
    Ok(())
}

#[test]
fn test_unreadable_tsconfig_is_an_error() -> Result<()> {
    let project = Project::with_files(&[("index.ts", "")])?;
    let err = scan(&ScanOptions {
        entry_paths: vec![project.path("index.ts")],
        tsconfig_path: Some(project.path("missing.json")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{:#}", err).contains("tsconfig"));
    Ok(())
}

#[test]
fn test_empty_entries_are_an_error() {
    let err = scan(&ScanOptions::default()).unwrap_err();
    assert!(err.to_string().contains("No entry paths"));
}
