// crates/test-utils/src/builders.rs

//! Small constructors for common task shapes.

use anyhow::anyhow;
use serde_json::{Value, json};
use taskdag::{CallArgs, TaskSpec};

/// Task that ignores its arguments and returns `value`.
pub fn returns(name: &str, value: Value) -> TaskSpec {
    TaskSpec::new(name, move |_call: CallArgs| Ok(value.clone()))
}

/// Task that always fails with `message`.
pub fn fails(name: &str, message: &str) -> TaskSpec {
    let message = message.to_string();
    TaskSpec::new(name, move |_call: CallArgs| Err(anyhow!("{message}")))
}

/// Task that returns the full argument bundle it was invoked with, as
/// `{"args": [...], "kwargs": {...}}`. Used to assert injection behaviour.
pub fn echoes_call(name: &str) -> TaskSpec {
    TaskSpec::new(name, |call: CallArgs| {
        Ok(json!({
            "args": call.args,
            "kwargs": call.kwargs,
        }))
    })
}
