//! System-wide constants and defaults.

/// Network attached to functions when neither the function nor the
/// provider names one.
pub const DEFAULT_NETWORK: &str = "func_functions";

/// Gateway used when neither the stack provider nor `--gateway` sets one.
pub const DEFAULT_GATEWAY: &str = "http://localhost:8080";

/// Template id used for flag-mode functions without `--lang`.
pub const DEFAULT_LANGUAGE: &str = "node";

/// Default per-request timeout for gateway calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of concurrent build or push workers.
pub const DEFAULT_PARALLELISM: usize = 1;

/// Directory holding language templates, relative to the working directory.
pub const TEMPLATE_DIR: &str = "template";

/// Directory where staged build contexts are written.
pub const BUILD_DIR: &str = "build";

/// Subdirectory of a staged build context that receives the handler.
pub const FUNCTION_SUBDIR: &str = "function";

/// Gateway path accepting deploy and delete requests.
pub const SYSTEM_FUNCTIONS_PATH: &str = "/system/functions";

/// Environment variable consulted for the gateway URL.
pub const GATEWAY_ENV: &str = "FNSTACK_GATEWAY";

/// Environment variable consulted for the stack file location.
pub const STACK_ENV: &str = "FNSTACK_STACK";

/// Application name used in CLI output.
pub const APP_NAME: &str = "fnstack";

