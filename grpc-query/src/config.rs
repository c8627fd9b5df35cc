use anyhow::{Context, Result};
use grpc_query_core::BaseQueryArgs;
use std::{fs, path::Path};

/// Loads the query configuration, then applies the overrides given on the command line.
pub fn load(path: Option<&Path>, host: Option<String>) -> Result<BaseQueryArgs> {
    let mut args = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Could not read config file '{}'", path.display()))?;
            parse(&content)
                .with_context(|| format!("Invalid config file '{}'", path.display()))?
        }
        None => BaseQueryArgs::default(),
    };

    if host.is_some() {
        args.host = host;
    }

    Ok(args)
}

fn parse(content: &str) -> Result<BaseQueryArgs> {
    Ok(serde_json::from_str(content)?)
}
