//! Two-stage external process pipeline.
//!
//! Runs `producer | consumer` synchronously: the producer's stdout feeds the
//! consumer's stdin, both stderr streams are captured, and the call returns
//! only after both processes have exited and every stream has drained.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

/// Exit status and captured diagnostics of one pipeline stage
#[derive(Debug)]
pub struct StageOutcome {
    pub program: String,
    pub status: ExitStatus,
    pub stderr: String,
}

impl StageOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Result of running a producer/consumer pipeline to completion
#[derive(Debug)]
pub struct PipelineOutcome {
    pub producer: StageOutcome,
    pub consumer: StageOutcome,
}

impl PipelineOutcome {
    pub fn success(&self) -> bool {
        self.producer.success() && self.consumer.success()
    }

    /// First stage that terminated unsuccessfully, consumer checked first.
    pub fn failed_stage(&self) -> Option<&StageOutcome> {
        if !self.consumer.success() {
            Some(&self.consumer)
        } else if !self.producer.success() {
            Some(&self.producer)
        } else {
            None
        }
    }
}

/// Spawn `producer | consumer` and wait for both.
///
/// Errors only when a process cannot be spawned or waited on; non-zero exits
/// are reported through the returned [`PipelineOutcome`].
pub fn run_pipeline(mut producer: Command, consumer: Command) -> std::io::Result<PipelineOutcome> {
    let producer_name = program_name(&producer);
    let consumer_name = program_name(&consumer);

    let mut producer_child = producer
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let producer_stdout = match producer_child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            reap(&mut producer_child);
            return Err(std::io::Error::other("producer stdout was not captured"));
        }
    };
    let producer_stderr = drain_stderr(&mut producer_child);

    let consumer_child = spawn_consumer(consumer, Stdio::from(producer_stdout));
    let consumer_child = match consumer_child {
        Ok(child) => child,
        Err(e) => {
            reap(&mut producer_child);
            return Err(e);
        }
    };

    let consumer_output = match consumer_child.wait_with_output() {
        Ok(output) => output,
        Err(e) => {
            reap(&mut producer_child);
            return Err(e);
        }
    };
    let producer_status = producer_child.wait()?;
    let producer_stderr = producer_stderr
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    Ok(PipelineOutcome {
        producer: StageOutcome {
            program: producer_name,
            status: producer_status,
            stderr: producer_stderr,
        },
        consumer: StageOutcome {
            program: consumer_name,
            status: consumer_output.status,
            stderr: String::from_utf8_lossy(&consumer_output.stderr).into_owned(),
        },
    })
}

/// Takes `consumer` by value so its copy of the pipe's read end is dropped
/// once the child holds it; otherwise the producer never sees EPIPE when the
/// consumer exits early.
fn spawn_consumer(mut consumer: Command, stdin: Stdio) -> std::io::Result<Child> {
    consumer
        .stdin(stdin)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
}

fn drain_stderr(child: &mut Child) -> Option<thread::JoinHandle<String>> {
    let mut stderr = child.stderr.take()?;
    Some(thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }))
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}
