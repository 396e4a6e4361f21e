//! Files the workflow reads and writes: the settings file, the exported
//! geometry artifact and the solver's drag report.

pub mod errors;
pub mod export;
pub mod load;
pub mod metadata;
pub mod report;
pub mod settings;

pub use errors::{ExportError, LoadError, ReportError, SettingsError};
pub use export::{export_geometry, GeometryArtifact, FORMAT_ID, FORMAT_VERSION};
pub use load::{load_manifest, parse_manifest};
pub use metadata::{Manifest, SelectionSummary};
pub use report::{DragHistory, Sample};
pub use settings::{parse_setting, Settings};
