use std::env;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info, warn};
use wingetup_core::{BootstrapError, PrivilegeGate};

use crate::powershell::{escape_ps_single_quote, escape_ps_single_quote_path, powershell_command};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPrivilegeGate;

impl PrivilegeGate for SystemPrivilegeGate {
    fn is_elevated(&self) -> bool {
        let elevated = current_process_is_elevated();
        debug!(elevated, "checked process elevation");
        elevated
    }

    fn elevate_and_restart(&self, args: &[OsString]) -> Result<(), BootstrapError> {
        if !cfg!(windows) {
            return Err(BootstrapError::ElevationFailed {
                reason: "elevated relaunch is only available on Windows hosts".to_string(),
            });
        }
        let current_exe = env::current_exe().map_err(|err| BootstrapError::ElevationFailed {
            reason: format!("could not resolve the running executable: {err}"),
        })?;
        relaunch_with_executor(&current_exe, args, |command| command.output())
    }
}

/// PowerShell invocation that asks UAC for an elevated copy of `current_exe`.
/// `Start-Process` fails when the prompt is declined, so a non-zero exit means
/// no elevated copy exists.
pub fn build_relaunch_command(current_exe: &Path, args: &[OsString]) -> Command {
    let mut script = format!(
        "Start-Process -FilePath '{}' -Verb RunAs",
        escape_ps_single_quote_path(current_exe)
    );
    if !args.is_empty() {
        let joined = args
            .iter()
            .map(|arg| quote_windows_arg(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        script.push_str(&format!(" -ArgumentList '{}'", escape_ps_single_quote(&joined)));
    }
    powershell_command(script)
}

pub(crate) fn relaunch_with_executor<Execute>(
    current_exe: &Path,
    args: &[OsString],
    mut execute: Execute,
) -> Result<(), BootstrapError>
where
    Execute: FnMut(&mut Command) -> io::Result<Output>,
{
    let mut command = build_relaunch_command(current_exe, args);
    debug!(command = ?command, "requesting elevated relaunch");
    let output = execute(&mut command).map_err(|err| BootstrapError::ElevationFailed {
        reason: format!("failed to start powershell: {err}"),
    })?;
    if output.status.success() {
        info!(exe = %current_exe.display(), "elevated instance launched");
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else if !stdout.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        format!("status={}", output.status)
    };
    warn!(detail = %detail, "elevation request refused");
    Err(BootstrapError::ElevationFailed {
        reason: format!("administrator privileges were not granted: {detail}"),
    })
}

/// Quotes one argument so `CommandLineToArgvW` reads it back unchanged.
pub(crate) fn quote_windows_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '\n', '\u{b}', '"']) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0_usize;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat('\\').take(backslashes));
                quoted.push(ch);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}

#[cfg(windows)]
fn current_process_is_elevated() -> bool {
    use std::mem::size_of;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    // SAFETY: the token handle is only used after OpenProcessToken succeeds and
    // is closed exactly once; TOKEN_ELEVATION matches the queried class.
    unsafe {
        let mut token: HANDLE = 0;
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            warn!("OpenProcessToken failed; treating process as not elevated");
            return false;
        }

        let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
        let mut returned = 0_u32;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut TOKEN_ELEVATION as *mut _,
            size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        CloseHandle(token);

        if ok == 0 {
            warn!("GetTokenInformation failed; treating process as not elevated");
            return false;
        }
        elevation.TokenIsElevated != 0
    }
}

#[cfg(unix)]
fn current_process_is_elevated() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(any(windows, unix)))]
fn current_process_is_elevated() -> bool {
    false
}
