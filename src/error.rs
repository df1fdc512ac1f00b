use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SVG parse error: {0}")]
    SvgParse(String),
    #[error("Invalid document structure: {0}")]
    Structure(String),
    #[error("Invalid viewBox {0:?}: expected four integers")]
    InvalidViewBox(String),
    #[error("Invalid number {value:?} in {context}")]
    InvalidNumber { value: String, context: String },
    #[error("Command '{command}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        command: char,
        expected: usize,
        found: usize,
    },
    #[error("Path {0:?} produces no vertices")]
    EmptyPath(String),
    #[error("Invalid scale {0:?}: expected a positive number")]
    InvalidScale(String),
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::SvgParse(e.to_string())
    }
}
