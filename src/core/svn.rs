//! ### 执行 SVN 相关操作
//!
//! `SvnService` 是唯一启动 svn 进程的地方：负责并发读取 stdout/stderr、
//! 轮询进程状态、处理取消与超时，并把宿主的 I/O 错误转换成 `AppError`。

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::{Duration, Instant},
};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::parse::{
    blame::{attach_contents, parse_blame_text, parse_blame_xml, BlameLine},
    conflict::{conflicts_from_status, ConflictFiles, ConflictItem},
    diff::{parse_multi_file_diff, DiffDocument},
    info::{parse_info_text, parse_info_xml, InfoEntry},
    list::{parse_list_text, parse_list_xml, ListEntry},
    log::{parse_log_text, parse_log_xml, LogEntry},
    status::{parse_status_text, parse_status_xml, StatusEntry},
    version::{parse_version, SvnVersion},
};

use super::{
    command::{DiffOptions, LogOptions, StatusOptions, SvnCommand},
    config::Settings,
    error::{AppError, AppResult},
    process_tree::{isolate, kill_tree, ProcessGroup},
    result::{ExecutionResult, NoopObserver, OutputLine, OutputObserver, OutputStream, XmlOutput},
    utils::{auto_decode, Revision, RevisionRange},
};

/// 进程退出后等待管道关闭的时间，超过后结束仍持有管道的子孙进程
const EXIT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Runs svn commands. Cheap to clone; holds no per-invocation state.
#[derive(Debug, Clone)]
pub struct SvnService {
    settings: Settings,
}

#[derive(Default)]
struct Collected {
    stdout: Vec<String>,
    stderr: Vec<String>,
}

impl Collected {
    fn push<O: OutputObserver + ?Sized>(&mut self, line: OutputLine, observer: &mut O) {
        observer.on_line(&line);
        match line.stream {
            OutputStream::Stdout => self.stdout.push(line.text),
            OutputStream::Stderr => self.stderr.push(line.text),
        }
    }
}

impl SvnService {
    pub fn new(settings: Settings) -> Self {
        SvnService { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run a command to completion without live output or cancellation.
    pub async fn execute(&self, command: &SvnCommand) -> AppResult<ExecutionResult> {
        self.execute_with(command, &CancellationToken::new(), &mut NoopObserver).await
    }

    /// Run a command, feeding every output line to `observer` as it arrives.
    pub async fn execute_with<O: OutputObserver + ?Sized>(
        &self,
        command: &SvnCommand,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> AppResult<ExecutionResult> {
        let mut args = command.to_args();
        if self.settings.non_interactive && !command.verb().starts_with('-') {
            args.push("--non-interactive".to_string());
        }
        self.execute_raw(args, command.working_dir(), cancel, observer).await
    }

    /// Run with `--xml`. The document is parsed on demand through
    /// [`XmlOutput::document`] and is absent when the output is not XML.
    pub async fn execute_xml<O: OutputObserver + ?Sized>(
        &self,
        command: SvnCommand,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> AppResult<XmlOutput> {
        let command = command.with_xml();
        let result = self.execute_with(&command, cancel, observer).await?;
        Ok(XmlOutput { result })
    }

    /// Run the configured executable with an exact argument vector.
    pub async fn execute_raw<O: OutputObserver + ?Sized>(
        &self,
        args: Vec<String>,
        working_dir: Option<&Path>,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> AppResult<ExecutionResult> {
        let program = self.settings.svn_program();
        let display = format!("{} {}", program, args.join(" "));

        if let Some(dir) = working_dir {
            if !dir.is_dir() {
                return Err(AppError::Validation(format!("Working directory does not exist: {}", dir.display())));
            }
        }
        log::debug!("running `{}` in {:?}", display, working_dir);

        let mut command = Command::new(&program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        isolate(&mut command);

        let mut child = command.spawn().map_err(|e| AppError::launch(&program, e))?;
        let group = ProcessGroup::of(&child);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut readers: Vec<JoinHandle<()>> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(drain(stdout, OutputStream::Stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(drain(stderr, OutputStream::Stderr, tx.clone())));
        }
        drop(tx);

        let mut collected = Collected::default();
        let mut ticker = time::interval(self.settings.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let started = Instant::now();

        let status = loop {
            tokio::select! {
                Some(line) = rx.recv() => collected.push(line, observer),
                _ = ticker.tick() => {
                    if let Some(stop) = self.should_stop(cancel, started, &display) {
                        abort_readers(&readers);
                        kill_tree(&mut child, group).await;
                        return Err(stop);
                    }
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                }
            }
        };

        // 进程已退出，读完管道中剩余的输出；子孙进程可能仍持有管道
        let grace = time::sleep(EXIT_DRAIN_GRACE);
        tokio::pin!(grace);
        loop {
            tokio::select! {
                line = rx.recv() => match line {
                    Some(line) => collected.push(line, observer),
                    None => break,
                },
                _ = ticker.tick() => {
                    if let Some(stop) = self.should_stop(cancel, started, &display) {
                        stop_orphans(group, &readers);
                        return Err(stop);
                    }
                }
                _ = &mut grace => {
                    log::debug!("`{}` exited but its output is still open, killing leftover processes", display);
                    stop_orphans(group, &readers);
                    break;
                }
            }
        }

        let exit_code = status.code().unwrap_or(-1);
        log::debug!("`{}` exited with code {} after {:?}", display, exit_code, started.elapsed());

        Ok(ExecutionResult::new(
            display,
            exit_code,
            collected.stdout.join("\n"),
            collected.stderr.join("\n"),
        ))
    }

    fn should_stop(&self, cancel: &CancellationToken, started: Instant, display: &str) -> Option<AppError> {
        if cancel.is_cancelled() {
            log::info!("cancelling `{}`", display);
            return Some(AppError::OperationCancelled);
        }
        if let Some(limit) = self.settings.timeout() {
            if started.elapsed() >= limit {
                log::warn!("`{}` exceeded {:?}, killing it", display, limit);
                return Some(AppError::Timeout {
                    command: display.to_string(),
                    seconds: limit.as_secs(),
                });
            }
        }
        None
    }

    /// ### svn --version
    /// 任何错误都视为不可用
    pub async fn is_available(&self) -> bool {
        match self.execute(&SvnCommand::version(true)).await {
            Ok(result) => result.success,
            Err(e) => {
                log::debug!("svn is not available: {}", e);
                false
            }
        }
    }

    pub async fn version(&self) -> Option<SvnVersion> {
        match self.execute(&SvnCommand::version(true)).await {
            Ok(result) if result.success => parse_version(&result.stdout),
            Ok(result) => {
                log::debug!("svn --version failed: {}", result.stderr);
                None
            }
            Err(e) => {
                log::debug!("svn --version failed: {}", e);
                None
            }
        }
    }

    /// 先尝试 XML 输出，输出无法解析时退回文本输出；命令本身失败则直接返回错误
    async fn run_structured<T>(
        &self,
        command: SvnCommand,
        cancel: &CancellationToken,
        from_xml: impl Fn(&roxmltree::Document<'_>) -> T,
        from_text: impl Fn(&str) -> T,
    ) -> AppResult<T> {
        let xml = self.execute_xml(command.clone(), cancel, &mut NoopObserver).await?;
        if !xml.result.success {
            return Err(xml.result.into_error());
        }
        if let Some(doc) = xml.document() {
            return Ok(from_xml(&doc));
        }
        log::debug!("no XML from `{}`, using the text parser", xml.result.command());

        let text = self.execute_with(&command, cancel, &mut NoopObserver).await?.into_output()?;
        Ok(from_text(&text))
    }

    /// ### svn status
    pub async fn status(
        &self,
        working_copy: &Path,
        target: Option<&str>,
        opts: &StatusOptions,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<StatusEntry>> {
        let command = SvnCommand::status(target, opts).in_dir(working_copy);
        self.run_structured(command, cancel, parse_status_xml, parse_status_text).await
    }

    /// ### svn log
    pub async fn log(
        &self,
        working_copy: &Path,
        target: Option<&str>,
        opts: &LogOptions,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<LogEntry>> {
        let command = SvnCommand::log(target, opts).in_dir(working_copy);
        self.run_structured(command, cancel, parse_log_xml, parse_log_text).await
    }

    /// ### svn info
    pub async fn info(
        &self,
        working_copy: &Path,
        target: Option<&str>,
        revision: Option<Revision>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<InfoEntry>> {
        let command = SvnCommand::info(target, revision, None).in_dir(working_copy);
        self.run_structured(command, cancel, parse_info_xml, parse_info_text).await
    }

    /// ### svn blame
    pub async fn blame(
        &self,
        working_copy: &Path,
        target: &str,
        revision: Option<RevisionRange>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<BlameLine>> {
        let command = SvnCommand::blame(target, revision, false).in_dir(working_copy);
        let mut lines = self.run_structured(command, cancel, parse_blame_xml, parse_blame_text).await?;

        // XML 中没有行内容，按同一版本取文件内容补上
        if !lines.is_empty() && lines.iter().all(|l| l.content.is_empty()) {
            let at = revision.map(|r| r.end.unwrap_or(r.start));
            let contents = self.cat(working_copy, target, at, cancel).await?;
            attach_contents(&mut lines, &contents);
        }
        Ok(lines)
    }

    /// ### svn list
    pub async fn list(
        &self,
        working_copy: &Path,
        target: Option<&str>,
        revision: Option<Revision>,
        recursive: bool,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ListEntry>> {
        let command = SvnCommand::list(target, revision, recursive, false).in_dir(working_copy);
        self.run_structured(command, cancel, parse_list_xml, parse_list_text).await
    }

    /// ### svn diff
    /// svn diff 只有 `--summarize` 时才有 XML，这里总是解析文本输出。
    /// 大的 diff 放到阻塞线程池里解析，不占用异步调度线程。
    pub async fn diff(
        &self,
        working_copy: &Path,
        target: Option<&str>,
        opts: &DiffOptions,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<DiffDocument>> {
        let command = SvnCommand::diff(target, opts).in_dir(working_copy);
        let text = self.execute_with(&command, cancel, &mut NoopObserver).await?.into_output()?;
        tokio::task::spawn_blocking(move || parse_multi_file_diff(&text))
            .await
            .map_err(|e| AppError::Io(std::io::Error::other(e.to_string())))
    }

    /// ### svn cat
    pub async fn cat(
        &self,
        working_copy: &Path,
        target: &str,
        revision: Option<Revision>,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let command = SvnCommand::cat(target, revision).in_dir(working_copy);
        self.execute_with(&command, cancel, &mut NoopObserver).await?.into_output()
    }

    /// 获取所有冲突文件列表
    pub async fn conflicts(&self, working_copy: &Path, cancel: &CancellationToken) -> AppResult<Vec<ConflictItem>> {
        let entries = self.status(working_copy, None, &StatusOptions::default(), cancel).await?;
        Ok(conflicts_from_status(&entries))
    }

    /// 冲突文件 (mine/base/theirs)，优先使用 svn info 的记录，其次按命名规则在磁盘上查找
    pub async fn conflict_files(
        &self,
        working_copy: &Path,
        path: &str,
        cancel: &CancellationToken,
    ) -> AppResult<ConflictFiles> {
        let entries = self.info(working_copy, Some(path), None, cancel).await?;
        if let Some(files) = entries.first().and_then(|e| e.conflict.clone()) {
            if !files.is_empty() {
                return Ok(files.resolved_against(working_copy));
            }
        }

        let full: PathBuf = working_copy.join(path);
        Ok(ConflictFiles::discover(&full))
    }
}

fn abort_readers(readers: &[JoinHandle<()>]) {
    for reader in readers {
        reader.abort();
    }
}

/// The child is already reaped; whatever is left runs in its group.
fn stop_orphans(group: Option<ProcessGroup>, readers: &[JoinHandle<()>]) {
    if let Some(group) = group {
        group.kill();
    }
    abort_readers(readers);
}

fn trim_newline(buf: &[u8]) -> &[u8] {
    let mut end = buf.len();
    while end > 0 && (buf[end - 1] == b'\n' || buf[end - 1] == b'\r') {
        end -= 1;
    }
    &buf[..end]
}

/// Forward every line of `reader` to `tx` until EOF.
async fn drain<R: AsyncRead + Unpin>(reader: R, stream: OutputStream, tx: UnboundedSender<OutputLine>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = auto_decode(trim_newline(&buf));
                if tx.send(OutputLine { stream, text }).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::debug!("stopped reading {:?}: {}", stream, e);
                break;
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::process_tree::is_alive;
    use std::{os::unix::fs::PermissionsExt, time::Duration};

    fn shell_service() -> SvnService {
        SvnService::new(Settings {
            svn_path: Some(PathBuf::from("/bin/sh")),
            non_interactive: false,
            poll_interval_ms: 10,
            ..Default::default()
        })
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    const FAKE_SVN: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "1.14.2"
    ;;
  status)
    if [ "$2" = "--xml" ]; then
      echo '<?xml version="1.0" encoding="UTF-8"?>'
      echo '<status><target path="."><entry path="a.txt"><wc-status item="modified" props="none" revision="3"/></entry>'
      echo '<entry path="b.txt"><wc-status item="conflicted" props="none" revision="3"/></entry></target></status>'
    else
      echo "M       a.txt"
    fi
    ;;
  log)
    if [ "$2" = "--xml" ]; then
      echo '<log><logentry revision="9">'
    else
      echo "------------------------------------------------------------------------"
      echo "r9 | alice | 2024-03-01 10:00:00 +0000 (Fri, 01 Mar 2024) | 1 line"
      echo ""
      echo "Fix the build"
      echo "------------------------------------------------------------------------"
    fi
    ;;
  diff)
    echo "Index: a.txt"
    echo "==================================================================="
    echo "--- a.txt	(revision 3)"
    echo "+++ a.txt	(working copy)"
    echo "@@ -1,2 +1,2 @@"
    echo " keep"
    echo "-old"
    echo "+new"
    ;;
  commit)
    echo "svn: E155011: File 'a.txt' is out of date" 1>&2
    exit 1
    ;;
  *)
    exit 2
    ;;
esac
"#;

    fn fake_svn(dir: &Path) -> SvnService {
        script_svn(dir, FAKE_SVN)
    }

    fn script_svn(dir: &Path, body: &str) -> SvnService {
        let script = dir.join("fake-svn");
        std::fs::write(&script, body).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        SvnService::new(Settings {
            svn_path: Some(script),
            poll_interval_ms: 10,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_captures_both_streams_and_exit_code() {
        let service = shell_service();
        let result = service
            .execute_raw(
                sh("echo out1; echo err1 1>&2; echo out2; exit 3"),
                None,
                &CancellationToken::new(),
                &mut NoopObserver,
            )
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "out1\nout2");
        assert_eq!(result.stderr, "err1");
        assert!(matches!(result.into_output(), Err(AppError::SvnCommandFailed { exit_code: 3, .. })));
    }

    #[tokio::test]
    async fn test_observer_sees_lines_in_stream_order() {
        let service = shell_service();
        let mut seen = Vec::new();
        let mut observer = |line: &OutputLine| seen.push(line.clone());
        let result = service
            .execute_raw(
                sh("for i in 1 2 3 4 5; do echo line$i; echo warn$i 1>&2; done"),
                None,
                &CancellationToken::new(),
                &mut observer,
            )
            .await
            .unwrap();

        assert!(result.success);
        let stdout: Vec<&str> = seen.iter().filter(|l| l.stream == OutputStream::Stdout).map(|l| l.text.as_str()).collect();
        let stderr: Vec<&str> = seen.iter().filter(|l| l.stream == OutputStream::Stderr).map(|l| l.text.as_str()).collect();
        assert_eq!(stdout, vec!["line1", "line2", "line3", "line4", "line5"]);
        assert_eq!(stderr, vec!["warn1", "warn2", "warn3", "warn4", "warn5"]);
        assert_eq!(result.stdout, stdout.join("\n"));
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams_does_not_deadlock() {
        let service = shell_service();
        let script = "i=0; while [ $i -lt 20000 ]; do echo \"stdout line $i\"; echo \"stderr line $i\" 1>&2; i=$((i+1)); done";
        let result = service
            .execute_raw(sh(script), None, &CancellationToken::new(), &mut NoopObserver)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.lines().count(), 20000);
        assert_eq!(result.stderr.lines().count(), 20000);
    }

    #[tokio::test]
    async fn test_missing_executable_is_a_launch_error() {
        let service = SvnService::new(Settings {
            svn_path: Some(PathBuf::from("/definitely/not/here/svn")),
            ..Default::default()
        });
        let err = service.execute(&SvnCommand::version(true)).await.unwrap_err();
        assert!(err.is_tool_missing());
        assert!(!service.is_available().await);
        assert!(service.version().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_not_a_missing_tool() {
        let service = shell_service();
        let err = service
            .execute_raw(sh("true"), Some(Path::new("/no/such/dir/for/svnkit")), &CancellationToken::new(), &mut NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cancellation_kills_the_whole_tree() {
        let service = shell_service();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut grandchild: Option<u32> = None;
        let mut observer = |line: &OutputLine| {
            if line.stream == OutputStream::Stdout {
                grandchild = line.text.trim().parse().ok();
                trigger.cancel();
            }
        };

        let started = Instant::now();
        let err = service
            .execute_raw(sh("sleep 30 & echo $!; wait"), None, &cancel, &mut observer)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(10));
        let pid = grandchild.expect("grandchild pid was printed");
        // 给内核一点时间回收
        for _ in 0..50 {
            if !is_alive(pid) {
                break;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!is_alive(pid), "descendant {} survived cancellation", pid);
    }

    async fn wait_until_dead(pid: u32) -> bool {
        for _ in 0..50 {
            if !is_alive(pid) {
                return true;
            }
            time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_background_helper_holding_output_does_not_block() {
        let service = shell_service();
        let started = Instant::now();
        let result = service
            .execute_raw(sh("sleep 30 & echo $!; exit 0"), None, &CancellationToken::new(), &mut NoopObserver)
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(result.success);
        let pid: u32 = result.stdout.trim().parse().unwrap();
        assert!(wait_until_dead(pid).await, "leftover helper {} still running", pid);
    }

    #[tokio::test]
    async fn test_cancel_after_exit_kills_orphaned_helper() {
        let service = SvnService::new(Settings {
            svn_path: Some(PathBuf::from("/bin/sh")),
            non_interactive: false,
            poll_interval_ms: 10,
            ..Default::default()
        });
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let helper = std::sync::Arc::new(std::sync::Mutex::new(None::<u32>));
        let seen = helper.clone();
        let mut observer = move |line: &OutputLine| {
            if line.stream == OutputStream::Stdout {
                *seen.lock().unwrap() = line.text.trim().parse().ok();
            }
        };
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = service
            .execute_raw(sh("sleep 30 & echo $!; exit 0"), None, &cancel, &mut observer)
            .await
            .err();

        assert!(started.elapsed() < Duration::from_secs(10));
        // 宽限期内取消得到错误，宽限期先到则正常返回
        assert!(err.as_ref().is_none_or(|e| e.is_cancelled()), "{:?}", err);
        let pid = helper.lock().unwrap().expect("helper pid was printed");
        assert!(wait_until_dead(pid).await, "helper {} survived cancellation", pid);
    }

    #[tokio::test]
    async fn test_failed_xml_run_is_not_repeated_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let body = format!(
            "#!/bin/sh\necho \"$*\" >> '{}'\necho 'svn: E170013: Unable to connect to a repository' 1>&2\nexit 1\n",
            calls.display()
        );
        let service = script_svn(dir.path(), &body);
        let opts = StatusOptions {
            show_updates: true,
            ..Default::default()
        };

        let err = service
            .status(dir.path(), None, &opts, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AppError::SvnCommandFailed { exit_code, stderr, .. } => {
                assert_eq!(exit_code, 1);
                assert!(stderr.contains("E170013"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        let invocations = std::fs::read_to_string(&calls).unwrap();
        assert_eq!(invocations.lines().count(), 1, "{}", invocations);
        assert!(invocations.contains("--xml"));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_never_builds_a_result() {
        let service = shell_service();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = service
            .execute_raw(sh("sleep 5"), None, &cancel, &mut NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OperationCancelled));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct_from_cancellation() {
        let service = SvnService::new(Settings {
            svn_path: Some(PathBuf::from("/bin/sh")),
            non_interactive: false,
            poll_interval_ms: 10,
            timeout_secs: Some(1),
            ..Default::default()
        });
        let err = service
            .execute_raw(sh("sleep 20"), None, &CancellationToken::new(), &mut NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout { seconds: 1, .. }));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn test_typed_operations_against_fake_svn() {
        let dir = tempfile::tempdir().unwrap();
        let service = fake_svn(dir.path());
        let cancel = CancellationToken::new();

        assert!(service.is_available().await);
        let version = service.version().await.unwrap();
        assert_eq!((version.major, version.minor, version.patch), (1, 14, 2));

        let status = service.status(dir.path(), None, &StatusOptions::default(), &cancel).await.unwrap();
        assert_eq!(status.len(), 2);
        assert_eq!(status[0].path, "a.txt");

        let conflicts = service.conflicts(dir.path(), &cancel).await.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].path, "b.txt");

        // XML 损坏时退回文本解析
        let log = service.log(dir.path(), None, &LogOptions::default(), &cancel).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].revision, 9);
        assert_eq!(log[0].author.as_deref(), Some("alice"));
        assert_eq!(log[0].message, "Fix the build");

        let diffs = service.diff(dir.path(), None, &DiffOptions::default(), &cancel).await.unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].addition_count(), 1);
        assert_eq!(diffs[0].deletion_count(), 1);
    }

    #[tokio::test]
    async fn test_nonzero_exit_keeps_stderr_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let service = fake_svn(dir.path());
        let result = service
            .execute(&SvnCommand::commit(&["a.txt"], "msg").in_dir(dir.path()))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "svn: E155011: File 'a.txt' is out of date");
    }
}
