use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Translation errors
    #[error("Unknown command: `{0}`")]
    UnknownCommand(String),

    #[error("Missing operand: {0}")]
    MissingOperand(String),

    #[error("Unknown segment: `{0}`")]
    UnknownSegment(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Cannot parse `{0}` as a number")]
    InvalidNumber(String),

    #[error("Unexpected operand: `{0}`")]
    UnexpectedOperand(String),

    #[error("{unit}:{row}: {source}")]
    At {
        unit: String,
        row: usize,
        text: String,
        #[source]
        source: Box<Error>,
    },

    // IO errors
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to read directory: {0}")]
    ReadDir(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("No `.vm` source found in {0}")]
    NoSource(String),
}

impl Error {
    /// Attaches the source location of the offending line.
    pub fn at(self, unit: &str, row: usize, text: &str) -> Error {
        Error::At {
            unit: unit.to_string(),
            row,
            text: text.to_string(),
            source: Box::new(self),
        }
    }

    /// The error without its location.
    pub fn root(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.root(),
            e => e,
        }
    }

    /// Print error with diagnostic information showing unit, row and line content
    pub fn print_diag(&self) {
        match self {
            Error::At {
                unit,
                row,
                text,
                source,
            } => {
                cprintln!("<red,bold>error</>: {}", source.root());
                cprintln!("     <blue>--></> <underline>{}:{}</>", unit, row);
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", row, text);
                cprintln!("      <blue>|</>");
            }
            e => cprintln!("<red,bold>error</>: {}", e),
        }
    }
}
