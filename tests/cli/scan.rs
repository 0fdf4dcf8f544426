use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const APP: &str = r#"
import { useTranslation } from 'react-i18next'
import { Header } from '@/components/Header'

export default function App() {
  const { t } = useTranslation('app')
  return (
    <>
      <Header />
      <p>{t('WELCOME')}</p>
    </>
  )
}
"#;

const HEADER: &str = r#"
import { useTranslation } from 'react-i18next'

export const Header = () => {
  const { t } = useTranslation()
  return <h1>{t('TITLE')}{t('SUBTITLE', { ns: 'app' })}</h1>
}
"#;

const TSCONFIG: &str = r#"{
  "compilerOptions": { "baseUrl": ".", "paths": { "@/*": ["src/*"] } }
}"#;

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        ("src/index.tsx", APP),
        ("src/components/Header.tsx", HEADER),
        ("tsconfig.json", TSCONFIG),
    ])
}

#[test]
fn test_scan_json_output() -> Result<()> {
    let test = project()?;

    let output = test
        .scan_command()
        .args(["src/index.tsx", "--tsconfig", "tsconfig.json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output), @r#"
    {
      "app": [
        "SUBTITLE",
        "WELCOME"
      ],
      "default": [
        "TITLE"
      ]
    }
    "#);

    Ok(())
}

#[test]
fn test_scan_text_output() -> Result<()> {
    let test = project()?;

    let output = test
        .scan_command()
        .args(["--tsconfig", "tsconfig.json", "--format", "text"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output), @r"
    app
      SUBTITLE
      WELCOME

    default
      TITLE

      app      2
      default  1

    ✓ 3 keys in 2 namespaces from 2 modules
    ");

    Ok(())
}

#[test]
fn test_scan_uses_config_file() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".i18nscanrc.json",
        r#"{
  "entryPaths": ["src/*.tsx"],
  "tsconfigPath": "tsconfig.json",
  "externals": ["@/components/Header"]
}"#,
    )?;

    let output = test.scan_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(parsed, serde_json::json!({ "app": ["WELCOME"] }));

    Ok(())
}

#[test]
fn test_cli_externals_override_config() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".i18nscanrc.json",
        r#"{ "tsconfigPath": "tsconfig.json", "externals": ["@/components/Header"] }"#,
    )?;

    let output = test
        .scan_command()
        .args(["--external", "lodash"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(
        parsed,
        serde_json::json!({ "app": ["SUBTITLE", "WELCOME"], "default": ["TITLE"] })
    );

    Ok(())
}

#[test]
fn test_extension_packages_from_config() -> Result<()> {
    let test = CliTest::with_files(&[(
        "src/index.tsx",
        r#"
import { useAppTranslation } from '@app/i18n'

export const Page = () => {
  const { t } = useAppTranslation()
  return <p>{t('PAGE')}</p>
}
"#,
    )])?;
    test.write_file(
        ".i18nscanrc.json",
        r#"{
  "extendI18NPackages": [
    {
      "packagePath": "@app/i18n",
      "members": [{ "name": "useAppTranslation", "type": "Hook", "ns": "app" }]
    }
  ]
}"#,
    )?;

    let output = test.scan_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(parsed, serde_json::json!({ "app": ["PAGE"] }));

    Ok(())
}

#[test]
fn test_parse_failures_are_reported() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "src/index.tsx",
            "import './broken'\nimport { t } from 'i18next'\nt('OK')\n",
        ),
        ("src/broken.tsx", "export const = ;\n"),
    ])?;

    let output = test.scan_command().args(["--format", "text"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("✓ 1 key in 1 namespace from 1 module"));
    assert!(out.contains("⚠ 1 file skipped (failed to parse)"));
    assert!(out.contains("broken.tsx"));
    assert!(stderr(&output).contains("broken.tsx"));

    Ok(())
}

#[test]
fn test_missing_entry_fails() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.scan_command().arg("src/missing.tsx").output()?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.starts_with("Error: "), "stderr: {}", err);
    assert!(err.contains("Entry file not found"));
    assert!(stdout(&output).is_empty());

    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let test = CliTest::with_files(&[(".i18nscanrc.json", "{ \"entryPaths\": 1 }")])?;

    let output = test.scan_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to parse config file"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("scan"));
    assert!(out.contains("init"));

    Ok(())
}
