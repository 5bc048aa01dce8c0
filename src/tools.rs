//! Checked invocation of the external bioinformatics tools.
//!
//! Every pipeline stage delegates its real work to a pre-existing binary
//! (makeblastdb, the blastn family, the MACSE jar, IQ-TREE). A failed
//! invocation must be distinguishable from a tool that ran and found
//! nothing, so exit status and stderr are captured and surfaced as a typed
//! error instead of being dropped.

use std::process::Command;

use thiserror::Error;

/// Errors from running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Runs a command to completion, blocking, and checks its exit status.
///
/// Stdout/stderr are captured rather than inherited; tools in this pipeline
/// communicate through their output files, and stderr only matters on
/// failure.
pub fn run_checked(mut command: Command) -> ToolResult<()> {
    let program = command.get_program().to_string_lossy().into_owned();

    let output = command.output().map_err(|source| ToolError::Launch {
        program: program.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ToolError::Failed {
            program,
            status: output.status,
            stderr,
        });
    }

    Ok(())
}
