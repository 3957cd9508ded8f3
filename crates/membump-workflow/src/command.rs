//! Synchronous invocation of the cluster command-line tools.

use crate::WorkflowError;
use log::debug;
use std::io::{self, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

/// Run a command to completion and return its captured stdout.
pub(crate) fn run_capture(program: &str, args: &[&str]) -> Result<Vec<u8>, WorkflowError> {
    debug!("running command (program={program}, args_len={})", args.len());
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()?;
    if !output.status.success() {
        return Err(command_failed(program, args, output.status, &output.stderr));
    }
    Ok(output.stdout)
}

/// Run a command feeding `input` to its stdin, discarding stdout.
pub(crate) fn run_with_stdin(
    program: &str,
    args: &[&str],
    input: &[u8],
) -> Result<(), WorkflowError> {
    debug!(
        "running command with stdin (program={program}, args_len={}, input_len={})",
        args.len(),
        input.len()
    );
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let stdin = child.stdin.take();
    // The writer gets its own thread so the output pipes drain while stdin
    // is still being fed; a child may emit more than a pipe buffer of
    // output before it consumes any input.
    let (output, fed) = thread::scope(|scope| {
        let writer = scope.spawn(|| feed_stdin(stdin, input));
        let output = child.wait_with_output();
        let fed = match writer.join() {
            Ok(result) => result,
            Err(_) => Err(io::Error::other("stdin writer panicked")),
        };
        (output, fed)
    });
    let output = output?;
    if !output.status.success() {
        return Err(command_failed(program, args, output.status, &output.stderr));
    }
    fed?;
    Ok(())
}

/// Write the payload to the child's stdin, closing it on completion.
fn feed_stdin(stdin: Option<ChildStdin>, input: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input) {
        // A child that exits without draining its input closes the pipe;
        // its exit status carries the real failure.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Build a failure error carrying the command line and its stderr.
fn command_failed(
    program: &str,
    args: &[&str],
    status: ExitStatus,
    stderr: &[u8],
) -> WorkflowError {
    let detail = String::from_utf8_lossy(stderr).trim().to_string();
    let detail = if detail.is_empty() {
        status.to_string()
    } else {
        detail
    };
    WorkflowError::CommandFailed {
        command: render(program, args),
        detail,
    }
}

/// Render a program and its arguments for error messages.
fn render(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
