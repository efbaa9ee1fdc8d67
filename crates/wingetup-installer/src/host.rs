use std::env;
#[cfg(windows)]
use std::process::Command;

use tracing::debug;
use wingetup_core::HostPlatform;

pub fn detect_host_platform() -> HostPlatform {
    let os = env::consts::OS;
    let release = windows_release();
    debug!(os, release = ?release, "detected host platform");
    HostPlatform::new(os, release.as_deref())
}

#[cfg(windows)]
fn windows_release() -> Option<String> {
    let output = Command::new("cmd").args(["/C", "ver"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_windows_release(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(not(windows))]
fn windows_release() -> Option<String> {
    None
}

/// Maps `ver` output such as `Microsoft Windows [Version 10.0.22631.4317]` to
/// the marketing release. Windows 11 still reports 10.0 and is told apart by
/// its build number.
pub fn parse_windows_release(ver_output: &str) -> Option<String> {
    let start = ver_output.find('[')?;
    let end = start + ver_output[start..].find(']')?;
    let version = ver_output[start + 1..end].split_whitespace().last()?;

    let mut parts = version.split('.');
    let major = parts.next()?.parse::<u32>().ok()?;
    let minor = parts.next().and_then(|part| part.parse::<u32>().ok()).unwrap_or(0);
    let build = parts.next().and_then(|part| part.parse::<u32>().ok()).unwrap_or(0);

    let release = match (major, minor) {
        (10, _) if build >= 22_000 => "11".to_string(),
        (10, _) => "10".to_string(),
        (6, 1) => "7".to_string(),
        (6, 2) => "8".to_string(),
        (6, 3) => "8.1".to_string(),
        _ => major.to_string(),
    };
    Some(release)
}
