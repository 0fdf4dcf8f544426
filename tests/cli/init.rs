use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output), @"✓ Created .i18nscanrc.json");

    let content = test.read_file(".i18nscanrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["entryPaths"], serde_json::json!(["src/index.tsx"]));
    assert_eq!(parsed["externals"], serde_json::json!([]));
    assert_eq!(parsed["extendI18NPackages"], serde_json::json!([]));
    assert!(content.contains("\n  \"entryPaths\""));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nscanrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    insta::assert_snapshot!(stderr(&output), @"Error: .i18nscanrc.json already exists");
    assert_eq!(test.read_file(".i18nscanrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/index.tsx",
        "import { t } from 'i18next'\nexport const title = t('TITLE')\n",
    )?;

    let output = test.scan_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(parsed, serde_json::json!({ "default": ["TITLE"] }));

    Ok(())
}
