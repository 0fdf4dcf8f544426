use std::{path::Path, sync::Arc};

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Pick the parser syntax from the file extension.
///
/// Plain `.ts` files are parsed without JSX so that `<T>(x: T) => x` and
/// angle-bracket casts are not mistaken for elements.
pub fn syntax_for(file_path: &Path) -> Syntax {
    let tsx = !matches!(
        file_path.extension().and_then(|ext| ext.to_str()),
        Some("ts" | "mts" | "cts")
    );
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

/// Parse source code into a module AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_module_source(
    code: String,
    file_path: &Path,
    source_map: Arc<SourceMap>,
) -> Result<Module> {
    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.to_path_buf()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path.display(), e.kind()))
    })
}
