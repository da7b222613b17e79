use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use natal::{build_prompt, InterpretationError, Interpreter, NatalChart};
use natal_config::InterpreterSettings;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs an external text-generation command: prompt on stdin, reading on
/// stdout. The process is killed if it outlives the timeout.
pub struct CommandInterpreter {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandInterpreter {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    pub fn from_settings(settings: &InterpreterSettings) -> Self {
        Self::new(
            settings.command.clone(),
            settings.args.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    async fn run(&self, prompt: String) -> Result<std::process::Output, InterpretationError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InterpretationError::Failed(format!("cannot start {}: {e}", self.command)))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| InterpretationError::Failed("stdin not captured".to_string()))?;

        let exchange = async move {
            // A command may exit without reading; its stderr still says why
            if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
            drop(stdin);
            Ok::<_, std::io::Error>(child.wait_with_output().await?)
        };
        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(InterpretationError::Failed(format!("{}: {e}", self.command))),
            Err(_) => Err(InterpretationError::Timeout(self.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl Interpreter for CommandInterpreter {
    fn name(&self) -> &str {
        &self.command
    }

    async fn interpret(&self, chart: &NatalChart) -> Result<String, InterpretationError> {
        let output = self.run(build_prompt(chart)).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match stderr.trim() {
                "" => format!("{} exited with {}", self.command, output.status),
                text => text.to_string(),
            };
            return Err(InterpretationError::from_failure_text(&detail));
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(InterpretationError::EmptyResponse);
        }
        Ok(text)
    }
}
