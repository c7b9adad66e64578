//! Writes the OpenAPI specification to `openapi.json` in the workspace
//! root, for client generators (e.g. a mobile check-in app).
//!
//! Run with: cargo run --bin gen-openapi -p hadir-server

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let json = hadir_server::api::get_openapi_json();

    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(PathBuf::from);
    let Some(root) = workspace_root else {
        eprintln!("Could not locate the workspace root");
        return ExitCode::FAILURE;
    };

    let output = root.join("openapi.json");
    if let Err(e) = fs::write(&output, &json) {
        eprintln!("Failed to write {}: {e}", output.display());
        return ExitCode::FAILURE;
    }

    println!("OpenAPI specification written to {}", output.display());
    if let Ok(spec) = serde_json::from_str::<serde_json::Value>(&json) {
        let count = |key: &str| {
            spec.get(key)
                .and_then(|v| v.as_object())
                .map_or(0, serde_json::Map::len)
        };
        println!("  paths: {}", count("paths"));
        if let Some(schemas) = spec
            .pointer("/components/schemas")
            .and_then(|s| s.as_object())
        {
            println!("  schemas: {}", schemas.len());
        }
    }
    ExitCode::SUCCESS
}
