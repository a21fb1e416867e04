//! Batch semantics scenarios: ordering, version gating, conditional apply,
//! conflicts and notification order.

use arbor_tests::prelude::*;

use ErrorCode::*;

mod ordering {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("ordering")
            .step(
                "child_before_parent",
                vec![Op::create("/a/b", ""), Op::create("/a", "")],
                |e| e.aborted(NoParent, 0).codes(&[NoParent, TransactionAborted]).unchanged(),
            )
            .step(
                "parent_then_child",
                vec![Op::create("/a", ""), Op::create("/a/b", "")],
                |e| {
                    e.committed()
                        .created(0, "/a")
                        .created(1, "/a/b")
                        .children("/a", &["b"])
                },
            )
    }

    #[test]
    fn test_operations_see_earlier_operations_only() {
        scenario().run().unwrap();
    }
}

mod version_gating {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("version_gating")
            .seed(vec![Op::create("/n", "v0")])
            .step(
                "stale_set",
                vec![Op::set_data("/n", "v1", 1)],
                |e| e.aborted(BadVersion, 0).codes(&[BadVersion]).unchanged(),
            )
            .step(
                "current_set",
                vec![Op::set_data("/n", "v1", 0)],
                |e| e.committed().data("/n", "v1").version("/n", 1),
            )
            .step(
                "any_version_delete",
                vec![Op::delete("/n", ANY_VERSION)],
                |e| e.committed().absent("/n"),
            )
    }

    #[test]
    fn test_version_mismatch_aborts() {
        scenario().run().unwrap();
    }
}

mod conditional_apply {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("conditional_apply")
            .seed(vec![Op::create("/cfg", "a"), Op::create("/lock", "")])
            .step(
                "guard_fails",
                vec![Op::check("/lock", 3), Op::set_data("/cfg", "b", ANY_VERSION)],
                |e| {
                    e.aborted(BadVersion, 0)
                        .codes(&[BadVersion, TransactionAborted])
                        .data("/cfg", "a")
                        .no_events()
                },
            )
            .step(
                "guard_holds",
                vec![Op::check("/lock", 0), Op::set_data("/cfg", "b", ANY_VERSION)],
                |e| e.committed().codes(&[Ok, Ok]).data("/cfg", "b"),
            )
            .step(
                "guard_on_missing_node",
                vec![Op::check("/gone", ANY_VERSION), Op::create("/x", "")],
                |e| e.aborted(NoNode, 0).absent("/x"),
            )
    }

    #[test]
    fn test_check_gates_the_batch() {
        scenario().run().unwrap();
    }
}

mod nested_lifecycle {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("nested_lifecycle")
            .step(
                "build_and_tear_down",
                vec![
                    Op::create("/multi", ""),
                    Op::create("/multi/a", ""),
                    Op::create("/multi/a/1", ""),
                    Op::delete("/multi/a/1", 0),
                    Op::delete("/multi/a", 0),
                    Op::delete("/multi", 0),
                ],
                |e| {
                    e.committed()
                        .codes(&[Ok, Ok, Ok, Ok, Ok, Ok])
                        .absent("/multi")
                        .children("/", &[])
                },
            )
            .step(
                "delete_parent_first",
                vec![
                    Op::create("/p", ""),
                    Op::create("/p/c", ""),
                    Op::delete("/p", ANY_VERSION),
                ],
                |e| e.aborted(NotEmpty, 2).unchanged(),
            )
    }

    #[test]
    fn test_create_then_delete_in_one_batch() {
        scenario().run().unwrap();
    }
}

mod conflicts {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("conflicts")
            .seed(vec![Op::create("/u", "")])
            .step(
                "sibling_create",
                vec![Op::create("/n", ""), Op::create("/n", "")],
                |e| e.aborted(NodeExists, 1).codes(&[TransactionAborted, NodeExists]).absent("/n"),
            )
            .step(
                "update_after_version_bump",
                vec![Op::set_data("/u", "x", 0), Op::set_data("/u", "y", 0)],
                |e| e.aborted(BadVersion, 1).data("/u", "").version("/u", 0),
            )
            .step(
                "update_after_delete",
                vec![Op::delete("/u", 0), Op::set_data("/u", "y", ANY_VERSION)],
                |e| e.aborted(NoNode, 1).exists("/u"),
            )
            .step(
                "failure_in_the_middle",
                vec![Op::create("/a", ""), Op::delete("/nope", ANY_VERSION), Op::create("/b", "")],
                |e| {
                    e.aborted(NoNode, 1)
                        .codes(&[TransactionAborted, NoNode, TransactionAborted])
                        .unchanged()
                        .no_events()
                },
            )
    }

    #[test]
    fn test_tentative_state_conflicts() {
        scenario().run().unwrap();
    }
}

mod notifications {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("notifications")
            .step(
                "create_pair",
                vec![Op::create("/p", ""), Op::create("/p/q", "")],
                |e| {
                    e.committed().events(&[
                        ("/p", EventKind::NodeCreated),
                        ("/p/q", EventKind::NodeCreated),
                    ])
                },
            )
            .step(
                "mixed",
                vec![
                    Op::set_data("/p/q", "1", ANY_VERSION),
                    Op::check("/p", 0),
                    Op::delete("/p/q", ANY_VERSION),
                ],
                |e| {
                    e.committed().events(&[
                        ("/p/q", EventKind::NodeDataChanged),
                        ("/p/q", EventKind::NodeDeleted),
                    ])
                },
            )
            .step("check_only", vec![Op::check("/p", ANY_VERSION)], |e| {
                e.committed().no_events()
            })
    }

    #[test]
    fn test_events_follow_operation_order() {
        scenario().run().unwrap();
    }
}

mod edge_cases {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("edge_cases")
            .config(ServerConfig::default().with_max_data_len(4))
            .step("empty_batch", vec![], |e| e.committed().codes(&[]).unchanged())
            .step("root_create", vec![Op::create("/", "")], |e| e.aborted(NodeExists, 0))
            .step("root_delete", vec![Op::delete("/", ANY_VERSION)], |e| {
                e.aborted(BadArguments, 0).unchanged()
            })
            .step("relative_path", vec![Op::create("a", "")], |e| {
                e.aborted(BadArguments, 0)
            })
            .step("oversized_data", vec![Op::create("/big", "12345")], |e| {
                e.aborted(BadArguments, 0).absent("/big")
            })
            .step("data_at_limit", vec![Op::create("/fits", "1234")], |e| {
                e.committed().data("/fits", "1234")
            })
    }

    #[test]
    fn test_boundary_conditions() {
        scenario().run().unwrap();
    }
}
