//! Fallback values applied when neither a site nor the `default` section sets a field.

/// Program used to talk to remote sites.
pub const LFTP_PATH: &str = "lftp";
/// Transfer command placed in each `queue` line.
pub const GET_CMD: &str = "mirror";
/// Name of the configuration file looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".pullqrc";
