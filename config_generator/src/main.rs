//! Dumps the default council config together with the network table.
//! Output goes to the path given as the first argument, stdout otherwise.

use std::{env, fs, path::Path};

use anyhow::Context;
use data::{networks, Network};
use library::config::CouncilConfig;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoaderData<'a> {
    config: CouncilConfig,
    networks: &'a [Network],
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = generate_loader_data()?;
    match env::args().nth(1) {
        Some(path) => write_loader_data(&path, &output)?,
        None => println!("{}", output),
    }
    Ok(())
}

fn generate_loader_data() -> anyhow::Result<String> {
    let config = CouncilConfig::default();
    config.validate().context("default config is invalid")?;
    let loader = LoaderData {
        config,
        networks: networks(),
    };
    info!(networks = loader.networks.len(), "generating loader data");
    serde_json::to_string_pretty(&loader).context("failed to serialize loader data")
}

fn write_loader_data<P: AsRef<Path>>(path: P, output: &str) -> anyhow::Result<()> {
    let path = path.as_ref();
    fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = output.len(), "loader data written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_data_shape() {
        let output = generate_loader_data().unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["config"]["feed"]["batchSize"], 20);
        assert_eq!(value["config"]["ballot"]["maxAllocationsPerMember"], 10);
        assert_eq!(value["networks"][0]["id"], 11_155_420);

        let config = CouncilConfig::from_json_str(&value["config"].to_string()).unwrap();
        assert_eq!(config, CouncilConfig::default());
    }
}
