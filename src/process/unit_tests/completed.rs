use crate::process::{
    completed::{CompletedProcess, UNSET_RETURNCODE},
    error::SubprocessError,
};

fn completed(returncode: i64) -> CompletedProcess {
    CompletedProcess {
        args: vec!["tool".to_string(), "--flag".to_string()],
        returncode,
        cout: b"out".to_vec(),
        cerr: b"err".to_vec(),
    }
}

#[test]
fn default_is_unset() {
    let result = CompletedProcess::default();
    assert_eq!(result.returncode, UNSET_RETURNCODE);
    assert!(result.args.is_empty());
    assert!(!result.success());
    assert!(!bool::from(&result));
}

#[test]
fn success_only_for_zero() {
    assert!(completed(0).success());
    assert!(bool::from(&completed(0)));
    assert!(!completed(1).success());
    assert!(!completed(-9).success());
}

#[test]
fn check_returncode_keeps_output() {
    assert!(completed(0).check_returncode().is_ok());

    match completed(3).check_returncode() {
        Err(SubprocessError::CalledProcess {
            command,
            returncode,
            cout,
            cerr,
        }) => {
            assert_eq!(command, vec!["tool", "--flag"]);
            assert_eq!(returncode, 3);
            assert_eq!(cout, b"out");
            assert_eq!(cerr, b"err");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn lossy_text() {
    let mut result = completed(0);
    result.cout = vec![b'h', b'i', 0xff];
    assert_eq!(result.cout_lossy(), "hi\u{fffd}");
    assert_eq!(result.cerr_lossy(), "err");
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() {
    let result = completed(7);
    let json = serde_json::to_string(&result).unwrap();
    let back: CompletedProcess = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
