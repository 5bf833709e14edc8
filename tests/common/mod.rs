use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meeting_digest::llm::{LlmError, LlmProvider, SummaryResult};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn run_digest(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_meeting-digest"));
        cmd.args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("MEETING_DIGEST_GEMINI_API_KEY")
            .env_remove("GEMINI_API_KEY")
            .env_remove("PORT")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("failed to execute meeting-digest binary")
    }

    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.command(args);
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output().expect("failed to execute meeting-digest binary")
    }

    /// Scratch directory for transcript fixtures.
    pub fn scratch(&self) -> &Path {
        self.data.path()
    }

    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}

/// In-process completion capability with a canned reply.
#[allow(dead_code)]
pub struct StubProvider {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubProvider {
    pub fn replying(markdown: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(markdown.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_with(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn summarize(&self, prompt: &str) -> Result<SummaryResult, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(markdown) => Ok(SummaryResult {
                markdown: markdown.clone(),
            }),
            Err(status) => Err(LlmError::Status {
                status: *status,
                body: "upstream says: API key quota exceeded".to_string(),
            }),
        }
    }
}
