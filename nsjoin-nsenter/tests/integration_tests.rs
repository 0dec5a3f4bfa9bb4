use nsjoin_nsenter::*;

/// Wrapper that stands in for a privileged `nsenter`: prints the vector it
/// received, writes to stderr and exits with `code`
fn failing_wrapper(code: i32) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("echo \"$0 $*\"; echo 'permission denied' >&2; exit {code}"),
    ]
}

fn compiled_args(config: &Configuration) -> Vec<String> {
    compile(config).unwrap().args().to_vec()
}

#[test]
fn test_mount_namespace_vector() {
    let config = Configuration {
        target: 1,
        mount: true,
        ..Default::default()
    };

    assert_eq!(compiled_args(&config), vec!["--target", "1", "--mount"]);
}

#[test]
fn test_identity_overrides_vector() {
    let config = Configuration {
        target: 42,
        uid: 1000,
        gid: 1000,
        root_directory: "/mnt/root".to_string(),
        ..Default::default()
    };

    assert_eq!(
        compiled_args(&config),
        vec![
            "--target",
            "42",
            "--setgid",
            "1000",
            "--root",
            "/mnt/root",
            "--setuid",
            "1000"
        ]
    );
}

#[test]
fn test_unset_target_rejected() {
    let err = compile(&Configuration::default()).unwrap_err();
    assert_eq!(err.to_string(), "target must be specified");
}

#[test]
fn test_zero_values_omitted() {
    let line = compile(&Configuration::new(1)).unwrap();
    assert_eq!(line.to_vec(), vec!["nsenter", "--target", "1"]);
}

#[test]
fn test_program_and_args_come_last() {
    let line = NsenterExecutor::new()
        .command_line(
            &Configuration::new(1)
                .with_net(true)
                .with_working_directory("/srv"),
            "ls",
            ["-la"],
        )
        .unwrap();

    let all = line.to_vec();
    assert_eq!(all.first().map(String::as_str), Some("nsenter"));
    assert_eq!(&all[all.len() - 2..], ["ls", "-la"]);
    assert_eq!(
        all,
        vec!["nsenter", "--target", "1", "--net", "--wd", "/srv", "ls", "-la"]
    );
}

#[test]
fn test_free_function_rejects_unset_target() {
    let err = execute(&Configuration::default(), "ls", ["-la"]).unwrap_err();

    assert!(err.is_config());
    assert_eq!(
        err.to_string(),
        "Error while building command: target must be specified"
    );
}

#[test]
fn test_config_execute_rejects_unset_target() {
    let err = Configuration::default()
        .with_mount(true)
        .execute("ls", ["-la"])
        .unwrap_err();

    assert!(matches!(err, Error::Setup(ConfigError::MissingTarget)));
}

#[test]
fn test_failure_keeps_captured_output() {
    let executor = NsenterExecutor::new().with_wrapper(failing_wrapper(3));

    let err = executor
        .execute(&Configuration::new(1).with_pid(true), "ps", ["aux"])
        .unwrap_err();

    assert_eq!(err.stdout(), "nsenter --target 1 --pid ps aux\n");
    assert_eq!(err.stderr(), "permission denied\n");
    assert_eq!(err.exit_code(), Some(3));
    assert!(matches!(
        err,
        Error::Run {
            error: RunError::Exit { code: 3, .. },
            ..
        }
    ));
}

#[test]
fn test_killed_by_signal() {
    let executor = NsenterExecutor::new().with_wrapper(["sh", "-c", "echo before; kill -KILL $$"]);

    let err = executor
        .execute(&Configuration::new(1), "true", Vec::<String>::new())
        .unwrap_err();

    assert_eq!(err.stdout(), "before\n");
    assert_eq!(err.exit_code(), None);
    assert_eq!(err.shell_status(), Some(137));
    assert!(err.to_string().ends_with("terminated by signal SIGKILL"));
}

#[test]
fn test_success_returns_both_streams() {
    let executor = NsenterExecutor::new().with_wrapper([
        "sh",
        "-c",
        "echo \"$*\"; echo warning >&2",
    ]);

    let output = executor
        .execute(&Configuration::new(1).with_uts(true), "hostname", Vec::<String>::new())
        .unwrap();

    assert_eq!(output.stdout, "--target 1 --uts hostname\n");
    assert_eq!(output.stderr, "warning\n");
}

#[test]
fn test_concurrent_executions_are_independent() {
    let executor = NsenterExecutor::new().with_program("echo");

    let handles: Vec<_> = (1..=8u32)
        .map(|pid| {
            let executor = executor.clone();
            std::thread::spawn(move || {
                let config = Configuration::new(pid).with_ipc(true);
                executor.execute(&config, "true", Vec::<String>::new())
            })
        })
        .collect();

    for (pid, handle) in (1..=8u32).zip(handles) {
        let output = handle.join().unwrap().unwrap();
        assert_eq!(output.stdout, format!("--target {pid} --ipc true\n"));
    }
}

#[tokio::test]
async fn test_async_execution() {
    let executor = NsenterExecutor::new().with_program("echo");

    let output = executor
        .execute_async(&Configuration::new(1).with_mount(true), "ls", ["-la"])
        .await
        .unwrap();

    assert_eq!(output.stdout, "--target 1 --mount ls -la\n");
}

#[tokio::test]
async fn test_async_failure_keeps_output() {
    let executor = NsenterExecutor::new().with_wrapper(failing_wrapper(1));

    let err = executor
        .execute_async(&Configuration::new(1), "true", Vec::<String>::new())
        .await
        .unwrap_err();

    assert_eq!(err.stdout(), "nsenter --target 1 true\n");
    assert_eq!(err.stderr(), "permission denied\n");
    assert_eq!(err.exit_code(), Some(1));
}

#[tokio::test]
async fn test_async_setup_error() {
    let err = NsenterExecutor::new()
        .execute_async(&Configuration::default(), "ls", ["-la"])
        .await
        .unwrap_err();

    assert!(err.is_config());
}

#[test]
#[ignore] // Requires root and nsenter
fn test_real_nsenter_mount_namespace() {
    let config = Configuration::new(1).with_mount(true);

    let output = config.execute("ls", ["-la", "/"]).unwrap();

    assert!(output.stdout.contains("proc"));
}

#[test]
fn test_basic_usage_flow() {
    // Same configuration as examples/basic_usage.rs, with echo standing in for nsenter
    let config = Configuration {
        target: 1,
        mount: true,
        ..Default::default()
    };

    let output = NsenterExecutor::new()
        .with_program("echo")
        .execute(&config, "ls", ["-la"])
        .unwrap();

    assert_eq!(output.stdout, "--target 1 --mount ls -la\n");
    assert!(output.stderr.is_empty());
}
