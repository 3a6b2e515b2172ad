use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;

/// How a playback process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessExit {
    Completed,
    Killed,
    Failed(String),
}

/// A spawned audio program (player or synthesizer) watched by a background
/// task. Dropping the handle kills the program.
#[derive(Debug)]
pub struct PlaybackProcess {
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
    finished: Arc<AtomicBool>,
}

impl PlaybackProcess {
    /// Spawn `command`, optionally feeding `stdin_data`, and report its exit
    /// through `on_exit` from a background task. Must be called inside a
    /// tokio runtime.
    pub fn spawn<F>(
        mut command: Command,
        stdin_data: Option<Vec<u8>>,
        on_exit: F,
    ) -> std::io::Result<Self>
    where
        F: FnOnce(ProcessExit) + Send + 'static,
    {
        command
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = command.spawn()?;
        let pid = child.id();

        if let (Some(mut stdin), Some(data)) = (child.stdin.take(), stdin_data) {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&data).await {
                    tracing::debug!(error = %e, "Audio program closed its input early");
                }
            });
        }

        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));
        let finished_flag = finished.clone();

        tokio::spawn(async move {
            let exit = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => ProcessExit::Completed,
                    Ok(status) => ProcessExit::Failed(format!("exited with {}", status)),
                    Err(e) => ProcessExit::Failed(e.to_string()),
                },
                _ = kill_rx => {
                    if let Err(e) = child.kill().await {
                        tracing::debug!(error = %e, "Audio program already gone");
                    }
                    ProcessExit::Killed
                }
            };

            finished_flag.store(true, Ordering::SeqCst);
            on_exit(exit);
        });

        Ok(Self {
            pid,
            kill_tx: Some(kill_tx),
            finished,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn kill(mut self) {
        if let Some(kill_tx) = self.kill_tx.take() {
            let _ = kill_tx.send(());
        }
    }

    pub fn suspend(&self) {
        #[cfg(unix)]
        self.signal(nix::sys::signal::Signal::SIGSTOP);
    }

    pub fn resume(&self) {
        #[cfg(unix)]
        self.signal(nix::sys::signal::Signal::SIGCONT);
    }

    #[cfg(unix)]
    fn signal(&self, signal: nix::sys::signal::Signal) {
        use nix::unistd::Pid;

        let Some(pid) = self.pid.and_then(|pid| i32::try_from(pid).ok()) else {
            return;
        };
        if self.is_finished() {
            return;
        }

        if let Err(e) = nix::sys::signal::kill(Pid::from_raw(pid), signal) {
            tracing::warn!(
                pid = pid,
                signal = signal.as_str(),
                error = %e,
                "Could not signal audio program"
            );
        }
    }
}
