//! End-to-end tests against the test process itself.

use getargv::{ErrorKind, Getargv, QueryOptions};
use std::ffi::OsString;

fn own_pid() -> getargv::pid_t {
    std::process::id() as getargv::pid_t
}

fn own_args() -> Vec<OsString> {
    std::env::args_os().collect()
}

#[test]
fn argv_matches_env_args() {
    let argv = getargv::argv_and_argc_of_pid(own_pid()).unwrap();
    assert_eq!(argv.argc(), own_args().len());
    assert_eq!(argv.to_os_strings(), own_args());
}

#[test]
fn skip_drops_program_name() {
    let region = getargv::argv_of_pid(&QueryOptions::new(own_pid()).with_skip(1)).unwrap();
    assert_eq!(region.argc(), own_args().len() - 1);

    let everything = QueryOptions::new(own_pid()).with_skip(own_args().len());
    let region = getargv::argv_of_pid(&everything).unwrap();
    assert!(region.is_empty());
}

#[test]
fn caller_buffer_matches_allocated() {
    let options = QueryOptions::new(own_pid());
    let size = getargv::exact_size(own_pid()).unwrap();
    let mut buf = vec![0u8; size];
    let borrowed = getargv::argv_of_pid_in(&options, &mut buf).unwrap();
    let owned = getargv::argv_of_pid(&options).unwrap();
    assert_eq!(borrowed.as_bytes(), owned.as_bytes());
}

#[test]
fn caller_buffer_too_small() {
    let mut buf = [0u8; 1];
    let err = getargv::argv_of_pid_in(&QueryOptions::new(own_pid()), &mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferTooSmall);
}

#[test]
fn repeated_queries_agree() {
    let getargv = Getargv::system();
    let options = QueryOptions::new(own_pid());
    let first = getargv.argv_of_pid(&options).unwrap();
    let second = getargv.argv_of_pid(&options).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn renders_like_a_shell_line() {
    let region = getargv::argv_of_pid(&QueryOptions::new(own_pid())).unwrap();
    let mut out = Vec::new();
    region.render(&mut out, false).unwrap();
    let expected = own_args()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(String::from_utf8_lossy(&out), expected);

    let mut raw = Vec::new();
    region.render(&mut raw, true).unwrap();
    assert_eq!(raw, region.as_bytes());
}

#[test]
fn nonexistent_process() {
    let pid = getargv::pid_t::MAX;
    assert_eq!(
        getargv::exact_size(pid).unwrap_err().kind(),
        ErrorKind::NoSuchProcess
    );
    assert_eq!(
        getargv::argv_of_pid(&QueryOptions::new(pid))
            .unwrap_err()
            .kind(),
        ErrorKind::NoSuchProcess
    );
    assert_eq!(
        getargv::argv_and_argc_of_pid(pid).unwrap_err().kind(),
        ErrorKind::NoSuchProcess
    );
}

#[test]
fn c_argv_matches_view() {
    let argv = getargv::argv_and_argc_of_pid(own_pid()).unwrap();
    let c_argv = argv.as_c_argv().unwrap();
    assert_eq!(c_argv.argc(), argv.argc());
    for i in 0..argv.argc() {
        let ptr = unsafe { *c_argv.as_ptr().add(i) };
        let arg = unsafe { std::ffi::CStr::from_ptr(ptr) };
        assert_eq!(arg.to_bytes(), argv.get(i).unwrap());
    }
    assert!(unsafe { *c_argv.as_ptr().add(argv.argc()) }.is_null());
}
