use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("line {row}: {msg}")]
    SyntaxError { row: usize, text: String, msg: String },

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("Program has {0} instructions, ROM holds 32768")]
    RomOverflow(usize),

    #[error("Unknown symbol: `{0}`")]
    UnknownSymbol(String),

    #[error("Invalid dump config: {0}")]
    DumpConfig(String, #[source] serde_yaml::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}
