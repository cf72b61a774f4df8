use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Bin,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(help = "The ABI document to load")]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value = "json", help = "Encoding of the ABI document")]
    pub format: InputFormat,

    #[arg(long, help = "The binary ABI document is written as hex text")]
    pub hex: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prints the resolved type graph of a type reference
    Resolve { type_name: String },
    /// Prints the binary form of the ABI as hex
    ToBin,
    /// Prints the ABI as JSON
    ToJson,
    /// Encodes a JSON value of the given type, printing hex
    Encode { type_name: String, value: String },
    /// Decodes hex data of the given type, printing JSON
    Decode { type_name: String, data: String },
}
