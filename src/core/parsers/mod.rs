//! Source parsers.
//!
//! - `jsx`: TS/TSX/JS/JSX source parser (uses swc for AST generation)

pub mod jsx;
