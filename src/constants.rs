//! Common constants used throughout the Inochi application.

/// Name of the project configuration file at the root of a project
pub const PROJECT_CONFIG_FILE: &str = "inochi.conf";

/// Name of the core marker file placed in `lib/<package>/`
pub const CORE_MARKER_FILE: &str = "inochi.rb";

/// File extension of templates inside the template directory
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Version assigned to projects that do not declare one
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Default license file consulted for copyright holders
pub const LICENSE_FILE: &str = "LICENSE";
