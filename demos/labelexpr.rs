// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use labelexpr::collectors::{Collectors, CollectorsConfig};
use labelexpr::{Program, Resolver, Value};

fn read_object(file: &str) -> Result<Value> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {file}"))?;
    if file.ends_with(".json") {
        Value::from_json_str(&contents)
    } else if file.ends_with(".yaml") || file.ends_with(".yml") {
        Value::from_yaml_str(&contents)
    } else {
        bail!("Unsupported object file `{file}`. Must be json or yaml.")
    }
}

fn resolve(object: String, queries: &[String], explain: bool) -> Result<()> {
    let object = read_object(&object)?;
    let resolver = Resolver::new();

    if explain {
        for query in queries {
            match resolver.try_resolve(query, &object) {
                Ok(v) => println!("{query} => {v}"),
                Err(e) => println!("{query} => fallback ({} failed): {e}", e.stage()),
            }
        }
        return Ok(());
    }

    let result = resolver.resolve_all(queries, &object);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn collect(
    config: String,
    objects: &[String],
    enabled: Option<String>,
    kubeconfig: Option<String>,
) -> Result<()> {
    let config = CollectorsConfig::from_yaml_file(&config)?;
    let resolver = Resolver::new();

    let mut collectors = Collectors::new();
    if let Some(kubeconfig) = kubeconfig {
        collectors.set_kubeconfig(kubeconfig);
    }
    collectors.set_enabled(enabled.as_deref().unwrap_or_default());

    let query_collectors = collectors.register_config(&config, &resolver);
    collectors.build();

    for file in objects {
        let object = read_object(file)?;
        for qc in &query_collectors {
            qc.observe(&object);
        }
    }

    collectors.write(&mut std::io::stdout().lock())?;
    Ok(())
}

fn check(queries: &[String]) -> Result<()> {
    let mut failed = 0;
    for query in queries {
        match Program::compile(query) {
            Ok(_) => println!("{query} => ok"),
            Err(e) => {
                failed += 1;
                println!("{query} => {e}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} queries failed to compile", queries.len());
    }
    Ok(())
}

#[derive(Subcommand)]
enum Command {
    /// Resolve queries against an object.
    Resolve {
        /// Object file. json or yaml.
        #[arg(long, short, value_name = "object.json|object.yaml")]
        object: String,

        /// Queries to resolve. May be repeated.
        #[arg(required(true), long = "query", short, value_name = "query")]
        queries: Vec<String>,

        /// Explain why queries fell back to their own text.
        #[arg(long, short)]
        explain: bool,
    },

    /// Run configured collectors over objects and print their metrics.
    Collect {
        /// Collectors configuration. yaml.
        #[arg(long, short, value_name = "collectors.yaml")]
        config: String,

        /// Comma separated collector names. All collectors when omitted.
        #[arg(long, short)]
        enabled: Option<String>,

        /// Kubeconfig handed to collectors.
        #[arg(long)]
        kubeconfig: Option<String>,

        /// Object files. json or yaml. May be repeated.
        #[arg(
            required(true),
            long = "object",
            short,
            value_name = "object.json|object.yaml"
        )]
        objects: Vec<String>,
    },

    /// Compile queries without evaluating them.
    Check {
        #[arg(required(true))]
        queries: Vec<String>,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve {
            object,
            queries,
            explain,
        } => resolve(object, &queries, explain),
        Command::Collect {
            config,
            enabled,
            kubeconfig,
            objects,
        } => collect(config, &objects, enabled, kubeconfig),
        Command::Check { queries } => check(&queries),
    }
}
