use kv_logger::{kv, Level, LevelFilter, LogfmtEmitter, Logger};
use std::{env, io::stdout, process::Command};

const CHILD_ENV: &str = "KV_LOGGER_FATAL_CHILD";

struct ChildOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_child(test: &str, mode: &str) -> ChildOutput {
    let output = Command::new(env::current_exe().unwrap())
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, mode)
        .output()
        .unwrap();
    ChildOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

fn child_logger(level: Level) -> Logger {
    Logger::from_emitter(LevelFilter::new(LogfmtEmitter::new(stdout()), level))
}

#[test]
fn fatal_logs_error_then_exits() {
    if env::var(CHILD_ENV).as_deref() == Ok("log") {
        child_logger(Level::Debug).fatal("x", &kv!("code" => 7));
    }

    let child = run_child("fatal_logs_error_then_exits", "log");
    assert_eq!(child.code, Some(1));
    assert!(child.stdout.contains("level=error msg=x code=7\n"), "{}", child.stdout);
    assert!(!child.stdout.contains("test result"), "{}", child.stdout);
    assert!(child.stderr.contains("fatal: x\n"), "{}", child.stderr);
}

#[test]
fn fatal_exits_even_when_filtered() {
    if env::var(CHILD_ENV).as_deref() == Ok("filtered") {
        child_logger(Level::Debug)
            .with_level_filter(Level::None)
            .fatal("x", &[]);
    }

    let child = run_child("fatal_exits_even_when_filtered", "filtered");
    assert_eq!(child.code, Some(1));
    assert!(!child.stdout.contains("msg=x"), "{}", child.stdout);
    assert!(child.stderr.contains("fatal: x\n"), "{}", child.stderr);
}
