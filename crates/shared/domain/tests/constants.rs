use taskschema_domain::constants::{
    DEFAULT_FILE_MATCH, DEFAULT_SCHEMA_ID, DEFAULT_TASK_TYPES, PROBLEM_MATCHER_SIGIL, TASKS_VERSION,
};

#[test]
fn constants_match_published_strings() {
    assert_eq!(DEFAULT_SCHEMA_ID, "tasks://schemas/tasks");
    assert_eq!(DEFAULT_FILE_MATCH, "tasks.json");
    assert_eq!(DEFAULT_TASK_TYPES, ["shell", "process"]);
    assert_eq!(PROBLEM_MATCHER_SIGIL, '$');
    assert_eq!(TASKS_VERSION, "2.0.0");
}
