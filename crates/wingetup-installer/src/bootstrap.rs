use std::io;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info, warn};
use wingetup_core::{Bootstrapper, InstallError, InstallResult};

use crate::powershell::{escape_ps_single_quote_path, powershell_command};

/// Registers an `.msixbundle` for the current machine through `Add-AppxPackage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppxBootstrapper;

impl Bootstrapper for AppxBootstrapper {
    fn install(&self, artifact: &Path) -> Result<InstallResult, InstallError> {
        install_with_executor(artifact, |command| command.output())
    }
}

pub fn build_add_appx_command(artifact: &Path) -> Command {
    let script = format!(
        "Add-AppxPackage -Path '{}' -ForceApplicationShutdown",
        escape_ps_single_quote_path(artifact)
    );
    powershell_command(script)
}

pub(crate) fn install_with_executor<Execute>(
    artifact: &Path,
    mut execute: Execute,
) -> Result<InstallResult, InstallError>
where
    Execute: FnMut(&mut Command) -> io::Result<Output>,
{
    let mut command = build_add_appx_command(artifact);
    debug!(command = ?command, "running package installer");
    let output = execute(&mut command).map_err(|source| InstallError::Spawn {
        program: "powershell".to_string(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let diagnostic = select_diagnostic(&stdout, &stderr);
        warn!(code, diagnostic = %diagnostic, "package installer failed");
        return Err(InstallError::NonZeroExit { code, diagnostic });
    }

    let diagnostic_text = [stdout.trim(), stderr.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    info!(artifact = %artifact.display(), "package installer finished");
    Ok(InstallResult {
        succeeded: true,
        diagnostic_text,
    })
}

fn select_diagnostic(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    "installer produced no output".to_string()
}
