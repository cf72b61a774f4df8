mod cli;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dt_abi as abi;

use cli::{Cli, Command, InputFormat};

fn load_abi(cli: &Cli) -> anyhow::Result<abi::Abi> {
    let path = cli.input.display();
    match cli.format {
        InputFormat::Json => {
            let text = std::fs::read_to_string(&cli.input)
                .with_context(|| format!("failed to read {path}"))?;
            Ok(abi::Abi::from_json(&text)?)
        }
        InputFormat::Bin => {
            let bytes =
                std::fs::read(&cli.input).with_context(|| format!("failed to read {path}"))?;
            let bytes = if cli.hex {
                let text = String::from_utf8(bytes).context("hex input is not text")?;
                hex::decode(text.trim()).context("hex input is malformed")?
            } else {
                bytes
            };
            Ok(abi::Abi::from_bin(&bytes)?)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let abi = load_abi(&cli)?;

    match &cli.command {
        Command::Resolve { type_name } => {
            let graph = abi::resolve_type(&abi, type_name);
            print!("{}", graph.display());
        }
        Command::ToBin => println!("{}", hex::encode(abi.to_bin()?)),
        Command::ToJson => println!("{}", abi.to_json()?),
        Command::Encode { type_name, value } => {
            let value: serde_json::Value =
                serde_json::from_str(value).context("value is not valid JSON")?;
            let bytes = abi::encode_value(&abi, type_name, &value)?;
            println!("{}", hex::encode(bytes));
        }
        Command::Decode { type_name, data } => {
            let bytes = hex::decode(data.trim()).context("data is not valid hex")?;
            let value = abi::decode_value(&abi, type_name, &bytes)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
