use std::path::PathBuf;

/// Errors while reading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required setting `{key}`")]
    Missing { key: String },

    #[error("setting `{key}` on line {line} is not an integer: {value:?}")]
    Malformed {
        key: String,
        line: usize,
        value: String,
    },

    #[error("setting `{key}` must be positive, got {value}")]
    NonPositive { key: String, value: i64 },
}

/// Errors while writing the geometry artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("design `{0}` has no named selections to export")]
    NoSelections(String),
}

/// Errors while reading a geometry manifest back.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },
}

/// Errors while parsing a solver report file.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report row at line {line}")]
    Malformed { line: usize },

    #[error("report contains no samples")]
    Empty,
}
