use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

/// Variables that would leak the developer's setup into a test run.
const SCRUBBED_ENV: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_EDITOR",
    "GIT_PAGER",
    "EDITOR",
    "VISUAL",
    "PAGER",
    "GIT_ISSUE_NOTES_REF",
    "GIT_ISSUE_DEFAULT_STATUS",
    "GIT_ISSUE_EDITOR",
    "GIT_ISSUE_PAGER",
    "GIT_ISSUE_COLOR",
    "GIT_AUTHOR_NAME",
    "GIT_AUTHOR_EMAIL",
    "GIT_COMMITTER_NAME",
    "GIT_COMMITTER_EMAIL",
    "GIT_CONFIG_GLOBAL",
    "XDG_CONFIG_HOME",
    "COLUMNS",
];

#[derive(Debug)]
pub struct IssueRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl IssueRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// First stdout line, trimmed. Commands that write print the issue hash.
    pub fn first_line(&self) -> String {
        self.stdout.lines().next().unwrap_or("").trim().to_string()
    }
}

/// A scratch git repository with a configured identity.
pub struct RepoWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub repo: PathBuf,
    pub log_dir: PathBuf,
}

impl RepoWorkspace {
    pub fn new() -> Self {
        let ws = Self::without_identity();
        ws.git(&["config", "user.name", "Test User"]);
        ws.git(&["config", "user.email", "test@example.com"]);
        ws
    }

    /// A repository where `user.name` and `user.email` are unset.
    pub fn without_identity() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let repo = root.join("repo");
        let log_dir = root.join("logs");
        fs::create_dir_all(&repo).expect("repo dir");
        fs::create_dir_all(&log_dir).expect("log dir");

        let ws = Self {
            temp_dir,
            root,
            repo,
            log_dir,
        };
        ws.git(&["init", "-q"]);
        ws
    }

    /// Run git in the repository and return trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("GIT_CONFIG_GLOBAL")
            .env("HOME", &self.root)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("LC_ALL", "C")
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.repo.join(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    /// Write an executable shell script outside the repository.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path
    }
}

pub fn run_issue<I, S>(workspace: &RepoWorkspace, args: I, label: &str) -> IssueRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_issue_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_issue_with_env<I, S, E, K, V>(
    workspace: &RepoWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> IssueRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    run_issue_in(workspace, &workspace.repo, args, env_vars, None, label)
}

pub fn run_issue_with_stdin<I, S>(
    workspace: &RepoWorkspace,
    args: I,
    stdin: &str,
    label: &str,
) -> IssueRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_issue_in(
        workspace,
        &workspace.repo,
        args,
        std::iter::empty::<(String, String)>(),
        Some(stdin),
        label,
    )
}

pub fn run_issue_in<I, S, E, K, V>(
    workspace: &RepoWorkspace,
    cwd: &Path,
    args: I,
    env_vars: E,
    stdin: Option<&str>,
    label: &str,
) -> IssueRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("git-issue"));
    cmd.current_dir(cwd);
    for name in SCRUBBED_ENV {
        cmd.env_remove(name);
    }
    cmd.env("NO_COLOR", "1");
    cmd.env("TERM", "dumb");
    cmd.env("RUST_LOG", "git_issue=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.env("GIT_CONFIG_NOSYSTEM", "1");
    cmd.args(args);
    cmd.envs(env_vars);
    if let Some(input) = stdin {
        cmd.write_stdin(input);
    }

    let start = Instant::now();
    let output = cmd.output().expect("run git-issue");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let timestamp = SystemTime::now();
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        timestamp,
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        cwd.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    IssueRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

/// Create an issue with `-m` messages and return its hash.
pub fn create_issue(workspace: &RepoWorkspace, extra: &[&str], label: &str) -> String {
    let mut args = vec!["create"];
    args.extend_from_slice(extra);
    let run = run_issue(workspace, &args, label);
    assert!(run.success(), "create failed: {}", run.stderr);
    let hash = run.first_line();
    assert!(!hash.is_empty(), "create printed no hash");
    hash
}
