//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Render error - a value expression or an external tool failed
pub const RENDER_ERROR: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Existing workspace and the operator declined to start over
pub const SHOULD_USE_UPDATE: i32 = 10;

/// The workspace has not been initialized
pub const MISSING_PREREQUISITE: i32 = 11;

/// The chart reference could not be resolved
pub const RESOLUTION_ERROR: i32 = 12;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
