//! Azure CLI command execution.
//!
//! Provides utilities for running `az` commands and capturing their output.
//! Credentials come from the caller's existing `az login` session.

use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Largest stdout accepted from a single command.
const MAX_OUTPUT_LEN: usize = 500_000;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command given as one string and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);
    run_args(&cmds)
}

/// Run a program with pre-split arguments and return its stdout.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails, exits non-zero or produces too much output
pub fn run_args(cmds: &[&str]) -> Result<String, Box<dyn Error>> {
    let (program, args) = cmds.split_first().ok_or("Empty command")?;
    let cmd = cmds.join(" ");
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if output.status.success() {
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_OUTPUT_LEN {
            return Err(format!(
                "Response too large: {} bytes for command: {:?}",
                output.stdout.len(),
                cmds
            )
            .into());
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running {program}: {}", stderr.trim()).into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_strip_az_show() {
        let input = "az storage account show --ids /subscriptions/x/resourceGroups/rg --output json";
        let expected = vec![
            "az",
            "storage",
            "account",
            "show",
            "--ids",
            "/subscriptions/x/resourceGroups/rg",
            "--output",
            "json",
        ];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_quoted_query() {
        let input = "az account show --query 'user.name' --output \"tsv\"";
        let expected = vec!["az", "account", "show", "--query", "user.name", "--output", "tsv"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_quoted_json() {
        let input = r#"az x --set 'rules=[{"a": "b"}]'"#;
        let expected = vec!["az", "x", "--set", r#"rules=[{"a": "b"}]"#];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_run_args_empty() {
        assert!(run_args(&[]).is_err());
    }

    #[test]
    fn test_run_args_missing_program() {
        assert!(run_args(&["aznet-no-such-program-here", "--version"]).is_err());
    }
}
