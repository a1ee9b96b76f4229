//! The fixed part of the tasks schema.
//!
//! The template is built once and never mutated; assembly deep-copies it and
//! fills the two dynamic slots addressed by [`TASK_TYPE_POINTER`] and
//! [`PROBLEM_MATCHER_POINTER`].

use serde_json::{Value, json};
use std::sync::LazyLock;
use taskschema_domain::constants::TASKS_VERSION;

/// JSON pointer of the task `type` property, receives the task type `enum`.
pub const TASK_TYPE_POINTER: &str = "/properties/tasks/items/properties/type";

/// JSON pointer of the task `problemMatcher` property, receives the `oneOf` alternatives.
pub const PROBLEM_MATCHER_POINTER: &str = "/properties/tasks/items/properties/problemMatcher";

const JSON_SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

static TEMPLATE: LazyLock<Value> = LazyLock::new(build);

/// Returns the shared template. Callers that need to modify it must clone.
#[must_use]
pub fn template() -> &'static Value {
    &TEMPLATE
}

fn build() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "title": "Tasks configuration",
        "type": "object",
        "required": ["version"],
        "properties": {
            "version": {
                "type": "string",
                "enum": [TASKS_VERSION],
                "description": "The configuration's version number."
            },
            "options": options(),
            "windows": platform("Windows specific command configuration."),
            "osx": platform("Mac specific command configuration."),
            "linux": platform("Linux specific command configuration."),
            "tasks": {
                "type": "array",
                "description": "The task configurations. Usually these are enrichments of tasks already defined in the external task runner.",
                "items": task()
            }
        }
    })
}

fn task() -> Value {
    json!({
        "type": "object",
        "required": ["label"],
        "properties": {
            "label": {
                "type": "string",
                "description": "The task's user interface label."
            },
            "type": {
                "type": "string",
                "default": "shell",
                "description": "Defines whether the task is run as a process or as a command inside a shell."
            },
            "command": command(),
            "args": args(),
            "options": options(),
            "windows": platform("Windows specific command configuration."),
            "osx": platform("Mac specific command configuration."),
            "linux": platform("Linux specific command configuration."),
            "isBackground": {
                "type": "boolean",
                "default": false,
                "description": "Whether the executed task is kept alive and is running in the background."
            },
            "dependsOn": {
                "description": "Either a string representing another task or an array of other tasks that this task depends on.",
                "oneOf": [
                    { "type": "string" },
                    { "type": "array", "items": { "type": "string" } }
                ]
            },
            "dependsOrder": {
                "type": "string",
                "enum": ["parallel", "sequence"],
                "default": "parallel",
                "description": "Determines the order of the dependsOn tasks for this task."
            },
            "group": group(),
            "presentation": presentation(),
            "runOptions": {
                "type": "object",
                "description": "The task's run related options.",
                "properties": {
                    "runOn": {
                        "type": "string",
                        "enum": ["default", "folderOpen"],
                        "default": "default",
                        "description": "Configures when the task should be run."
                    },
                    "reevaluateOnRerun": {
                        "type": "boolean",
                        "default": true,
                        "description": "Whether to reevaluate task variables on rerun."
                    }
                }
            },
            "detail": {
                "type": "string",
                "description": "An optional description of a task that shows in the Run Task quick pick as a detail."
            },
            "problemMatcher": {
                "description": "The problem matcher(s) to use. Can either be a string or a problem matcher definition or an array of strings and problem matchers."
            }
        }
    })
}

fn command() -> Value {
    json!({
        "description": "The command to be executed. Can be an external program or a shell command.",
        "oneOf": [
            { "type": "string" },
            {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1
            }
        ]
    })
}

fn args() -> Value {
    json!({
        "type": "array",
        "description": "Arguments passed to the command when this task is invoked.",
        "items": { "type": "string" }
    })
}

fn options() -> Value {
    json!({
        "type": "object",
        "description": "Additional command options",
        "properties": {
            "cwd": {
                "type": "string",
                "description": "The current working directory of the executed program or script. If omitted the workspace root is used."
            },
            "env": {
                "type": "object",
                "additionalProperties": { "type": "string" },
                "description": "The environment of the executed program or shell. If omitted the parent process' environment is used."
            },
            "shell": {
                "type": "object",
                "description": "Configures the shell to be used.",
                "properties": {
                    "executable": {
                        "type": "string",
                        "description": "The shell to be used."
                    },
                    "args": {
                        "type": "array",
                        "description": "The shell arguments.",
                        "items": { "type": "string" }
                    }
                }
            }
        }
    })
}

fn platform(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
        "properties": {
            "command": command(),
            "args": args(),
            "options": options()
        }
    })
}

fn group() -> Value {
    json!({
        "description": "Defines to which execution group this task belongs to.",
        "oneOf": [
            {
                "type": "string",
                "enum": ["build", "test", "none"]
            },
            {
                "type": "object",
                "required": ["kind"],
                "properties": {
                    "kind": {
                        "type": "string",
                        "enum": ["build", "test", "none"],
                        "description": "The task's execution group."
                    },
                    "isDefault": {
                        "type": "boolean",
                        "default": false,
                        "description": "Defines if this task is the default task in the group."
                    }
                }
            }
        ]
    })
}

fn presentation() -> Value {
    json!({
        "type": "object",
        "description": "Configures the panel that is used to present the task's output and reads its input.",
        "properties": {
            "echo": {
                "type": "boolean",
                "default": true,
                "description": "Controls whether the executed command is echoed to the panel."
            },
            "reveal": {
                "type": "string",
                "enum": ["always", "silent", "never"],
                "default": "always",
                "description": "Controls whether the terminal running the task is revealed or not."
            },
            "focus": {
                "type": "boolean",
                "default": false,
                "description": "Controls whether the panel takes focus."
            },
            "panel": {
                "type": "string",
                "enum": ["shared", "dedicated", "new"],
                "default": "shared",
                "description": "Controls if the panel is shared between tasks, dedicated to this task or a new one is created on every run."
            },
            "clear": {
                "type": "boolean",
                "default": false,
                "description": "Controls whether the terminal is cleared before executing the task."
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_points_exist() {
        assert!(template().pointer(TASK_TYPE_POINTER).is_some_and(Value::is_object));
        assert!(template().pointer(PROBLEM_MATCHER_POINTER).is_some_and(Value::is_object));
    }

    #[test]
    fn test_slots_are_unfilled() {
        assert!(template().pointer(&format!("{TASK_TYPE_POINTER}/enum")).is_none());
        assert!(template().pointer(&format!("{PROBLEM_MATCHER_POINTER}/oneOf")).is_none());
    }

    #[test]
    fn test_version_is_pinned() {
        assert_eq!(template().pointer("/properties/version/enum/0"), Some(&json!(TASKS_VERSION)));
        assert_eq!(template()["required"], json!(["version"]));
    }
}
