//! `fnstack version`: Display version information.

/// Prints the package version and, when known, the commit it was built from.
pub fn execute() {
    println!("{}", version_line());
    if let Some(commit) = option_env!("GIT_COMMIT") {
        println!("Git Commit: {commit}");
    }
}

fn version_line() -> String {
    format!("{} {}", fnstack_common::constants::APP_NAME, env!("CARGO_PKG_VERSION"))
}
