use std::path::Path;
use std::process::Command;

pub(crate) fn powershell_command(script: String) -> Command {
    let mut command = Command::new("powershell");
    command
        .arg("-NoProfile")
        .arg("-ExecutionPolicy")
        .arg("Bypass")
        .arg("-Command")
        .arg(script);
    command
}

pub(crate) fn escape_ps_single_quote(value: &str) -> String {
    value.replace('\'', "''")
}

pub(crate) fn escape_ps_single_quote_path(path: &Path) -> String {
    escape_ps_single_quote(&path.to_string_lossy())
}
