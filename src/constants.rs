//! Built-in defaults for the updater.
//!
//! Every value here can be overridden through [`crate::config::UpdaterConfig`];
//! these are only what a run uses when no configuration file is present.

use std::time::Duration;

/// Nightly build listing page.
pub const DEFAULT_LISTING_URL: &str = "https://nightly.mtasa.com/";

/// Timeout for the listing request and for each read of the download (30 seconds).
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the dedicated server executable inside the install directory.
#[cfg(windows)]
pub const DEFAULT_SERVER_EXECUTABLE: &str = "MTA Server64.exe";

/// Name of the dedicated server executable inside the install directory.
#[cfg(not(windows))]
pub const DEFAULT_SERVER_EXECUTABLE: &str = "mta-server64";

/// Flag that makes the server print its version and exit.
pub const DEFAULT_VERSION_FLAG: &str = "-v";

/// Working directory for the download and the unpacked installer.
pub const DEFAULT_TEMP_DIR: &str = "tmp";

/// File name of the downloaded installer inside the temp directory.
pub const DEFAULT_DOWNLOAD_FILE: &str = "mtaserver.exe";

/// Archive tool used to unpack the NSIS installer.
pub const DEFAULT_EXTRACT_TOOL: &str = "7z";

/// Arguments passed to the archive tool.
///
/// `{temp}` and `{download}` are replaced with the temp directory and the
/// downloaded installer path. Only the `server` entry is extracted, minus its
/// `mods` subtree, overwriting anything already there.
pub const DEFAULT_EXTRACT_ARGS: &[&str] = &[
    "x",
    "-tnsis",
    "-i!server",
    "-x!*\\mods",
    "-o{temp}",
    "-aoa",
    "{download}",
];

/// Directory inside the temp directory that holds the extracted server files.
pub const DEFAULT_EXTRACTED_SUBDIR: &str = "server";

/// Anchor text of a nightly server build: version in group 1, revision in group 2.
pub const DEFAULT_LATEST_PATTERN: &str = r"mtasa_x64-([\d.]+)-rc-(\d+)-\d+\.exe";

/// Output of `<server> -v`: version in group 1, revision in group 2.
pub const DEFAULT_CURRENT_PATTERN: &str = r"MTA:SA Server v([\d.]+)-release-(\d+)";

/// Config file looked up in the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "updmtaserver.toml";

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "MTASA_UPDATER_CONFIG";

/// Environment variable that hides progress bars when set.
pub const NO_PROGRESS_ENV: &str = "MTASA_NO_PROGRESS";
