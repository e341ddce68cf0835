use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error parsing record in \"{file}\": {source}")]
    ParseRecord {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unpaired read in {0}")]
    UnpairedRead(String),

    #[error("No patterns to search for: adapter list is empty and the built-in filters are disabled")]
    EmptyPatternSet,

    #[error("Unsupported error count {0}: possible values are 0, 1, 2")]
    ErrorBudget(u8),

    #[error("Dust window size {0} does not fit the rolling hash: valid sizes are 1 to 9")]
    DustWindow(usize),
}
