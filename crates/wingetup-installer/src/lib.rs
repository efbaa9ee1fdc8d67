mod bootstrap;
mod fetch;
mod host;
mod powershell;
mod privilege;
mod probe;
mod upgrade;

pub use bootstrap::{build_add_appx_command, AppxBootstrapper};
pub use fetch::HttpFetcher;
pub use host::{detect_host_platform, parse_windows_release};
pub use privilege::{build_relaunch_command, SystemPrivilegeGate};
pub use probe::PathToolProbe;
pub use upgrade::{spawn_streaming, ProcessUpgradeRunner};
