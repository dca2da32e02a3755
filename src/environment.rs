// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builtins;
use crate::value::Value;

use cel_interpreter::Context;

/// Name under which the input object is visible to queries.
pub const ROOT_BINDING: &str = "o";

/// Evaluation context for one object.
///
/// Exposes the object as `o` and nothing else. Building an environment
/// converts the object once; any number of programs may then run in it.
pub struct Environment {
    context: Context<'static>,
}

impl Environment {
    pub fn new(object: &Value) -> Self {
        let mut context = Context::default();
        builtins::register(&mut context);
        context.add_variable_from_value(ROOT_BINDING, object.to_cel());
        Self { context }
    }

    pub(crate) fn context(&self) -> &Context<'static> {
        &self.context
    }
}
