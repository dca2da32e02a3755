// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Result};
use labelexpr::*;
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
struct Case {
    note: String,
    query: String,
    error: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Test {
    cases: Vec<Case>,
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {file}");
    let yaml = std::fs::read_to_string(file)?;
    let test: Test = serde_yaml::from_str(&yaml)?;

    for case in &test.cases {
        print!("case {} ", case.note);
        match (Program::compile(&case.query), &case.error) {
            (Ok(program), None) => assert_eq!(program.query(), case.query, "{}", case.note),
            (Ok(_), Some(e)) => bail!("{}: expected error `{e}`, compiled", case.note),
            (Err(actual), Some(expected)) => {
                let actual = actual.to_string();
                if !actual.contains(expected.as_str()) {
                    bail!("Error message\n`{actual}\n`\ndoes not contain `{expected}`");
                }
            }
            (Err(e), None) => bail!("{}: {e}", case.note),
        }
        println!("passed");
    }
    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => panic!("{}", e),
    }
}

#[test_resources("tests/compile/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
fn compilation_ignores_the_object() -> Result<()> {
    // References are resolved at evaluation time, so unknown names compile.
    let program = Program::compile("x.metadata.name")?;
    match program.eval(&Value::new_object()) {
        Err(RuntimeError::UndeclaredReference(name)) => assert_eq!(name, "x"),
        other => bail!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn nesting_limits_are_reported() {
    let deep = format!("{}o{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    match Program::compile(&deep) {
        Err(e) => {
            assert_eq!(e.kind, CompileErrorKind::TooDeep);
            assert!(e.message.contains("brackets nest 33 deep"), "{}", e.message);
        }
        Ok(p) => panic!("compiled {p:?}"),
    }

    let long = vec!["o.a"; MAX_OPERATORS + 1].join(" + ");
    match Program::compile(&long) {
        Err(e) => assert_eq!(e.kind, CompileErrorKind::TooDeep),
        Ok(p) => panic!("compiled {p:?}"),
    }
}
