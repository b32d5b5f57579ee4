//! Writes the service's OpenAPI document as pretty-printed JSON.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{
    env, fs,
    io::{self, Write},
};

use anyhow::{Context, Result};
use sensor_data_api::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialise OpenAPI spec")?;

    let mut args = env::args().skip(1);
    let output = match (args.next(), args.next()) {
        (Some(flag), Some(path)) if flag == "--output" => Some(path),
        (None, _) => None,
        _ => {
            eprintln!("Usage: generate_openapi [--output <path>]");
            std::process::exit(2);
        }
    };

    match output {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("Failed to write {path}"))?;
            eprintln!("OpenAPI spec written to {path}");
        }
        None => {
            io::stdout()
                .write_all(json.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
