// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Functions added on top of the engine's standard library.

use crate::Rc;

use cel_interpreter::extractors::This;
use cel_interpreter::{Context, ExecutionError, Value as CelValue};

pub fn register(context: &mut Context<'_>) {
    context.add_function("lowerAscii", lower_ascii);
    context.add_function("upperAscii", upper_ascii);
}

fn lower_ascii(This(this): This<Rc<String>>) -> Result<CelValue, ExecutionError> {
    Ok(CelValue::String(Rc::new(this.to_ascii_lowercase())))
}

fn upper_ascii(This(this): This<Rc<String>>) -> Result<CelValue, ExecutionError> {
    Ok(CelValue::String(Rc::new(this.to_ascii_uppercase())))
}
