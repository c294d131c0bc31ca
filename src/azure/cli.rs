//! Azure CLI command execution.

use crate::config::MAX_RESPONSE_BYTES;
use colored::Colorize;
use std::error::Error;
use std::process::Command;

/// Run `az` with the given arguments and return its stdout.
///
/// Arguments are passed as-is, so a Kusto query with quotes and pipes needs
/// no shell escaping.
///
/// # Returns
/// * `Ok(String)` - stdout on success
/// * `Err` - if `az` is missing, exits non-zero, or prints more than
///   [`MAX_RESPONSE_BYTES`]
pub fn run_az(args: &[String]) -> Result<String, Box<dyn Error>> {
    let printable = describe(args);
    log::debug!("run(az {cmd})", cmd = printable.on_blue());

    let output = Command::new("az").args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute az (is the Azure CLI installed?): {}", e)
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run az {cmd}",
            failed = "failed".on_red(),
            cmd = printable.on_blue()
        );
        return Err(format!("ERROR running az: {stderr}").into());
    }

    log::debug!("Success output.stdout.len(): {}", output.stdout.len());
    if output.stdout.len() > MAX_RESPONSE_BYTES {
        return Err(format!(
            "Response too large: {} bytes for az {}",
            output.stdout.len(),
            printable
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;
    Ok(stdout)
}

/// Arguments joined for logging, multi-line values cut to their first line.
fn describe(args: &[String]) -> String {
    args.iter()
        .map(|a| match a.lines().next() {
            Some(first) if a.contains('\n') => format!("'{}…'", first.trim()),
            _ => a.clone(),
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_plain() {
        let args = vec!["account".to_string(), "list".to_string()];
        assert_eq!(describe(&args), "account list");
    }

    #[test]
    fn test_describe_multiline() {
        let args = vec![
            "graph".to_string(),
            "query".to_string(),
            "-q".to_string(),
            "resources \n | where x".to_string(),
        ];
        assert_eq!(describe(&args), "graph query -q 'resources…'");
    }
}
