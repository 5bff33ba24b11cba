use crate::process::action::kill::collect_descendants;

#[test]
fn collects_the_whole_subtree() {
    // (pid, parent)
    let table = [
        (10, 1),
        (11, 10),
        (12, 10),
        (13, 11),
        (20, 1),
        (21, 20),
    ];

    let mut descendants = collect_descendants(10, &table);
    descendants.sort_unstable();
    assert_eq!(descendants, vec![11, 12, 13]);
}

#[test]
fn leaf_has_no_descendants() {
    let table = [(10, 1), (11, 10)];
    assert!(collect_descendants(11, &table).is_empty());
}

#[test]
fn cycles_and_idle_process_terminate() {
    // pid 0 parents itself on Windows; reused pids can form loops.
    let table = [(0, 0), (5, 0), (6, 5), (5, 6)];
    let descendants = collect_descendants(5, &table);
    assert_eq!(descendants, vec![6]);
    assert_eq!(collect_descendants(0, &table), vec![5, 6]);
}

#[test]
fn descendants_come_level_by_level() {
    let table = [(11, 10), (13, 11), (12, 10), (14, 13)];
    assert_eq!(collect_descendants(10, &table), vec![11, 12, 13, 14]);
}
