//! Rule Runner - validate, evaluate and compile rules from the command line
//!
//! Rules are read as JSON expression trees, the form a parser emits.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package rulekit-playground --bin rule-runner -- --help
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::warn;

use common_config::RuleConfig;
use common_error::ExpressionResult;
use rulekit_core::{Node, Scope};
use rulekit_engine::Engine;
use rulekit_features::StatementText;

use rulekit_playground::{
    create_compiler, create_engine, format_node, print_divider, print_header, print_outcome,
    sample_rules, sample_scope,
};

/// Rule Runner CLI.
#[derive(Parser, Debug)]
#[command(name = "rule-runner")]
#[command(about = "Validate, evaluate and compile rule expressions")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a rule and evaluate it against a scope
    Eval {
        /// JSON expression tree
        #[arg(short, long)]
        ast: PathBuf,

        /// JSON scope; the sample scope is used when omitted
        #[arg(short, long)]
        scope: Option<PathBuf>,

        /// Print the validated tree
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile a rule against the SQL schema
    Compile {
        /// JSON expression tree
        #[arg(short, long)]
        ast: PathBuf,
    },

    /// Run the sample rules
    Demo,
}

fn main() -> ExpressionResult<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Eval { ast, scope, verbose } => {
            let engine = create_engine(Arc::new(StatementText))?.with_config(config);
            let scope = load_scope(scope.as_deref())?;
            run_eval(&engine, &scope, &read_rule(&ast)?, verbose)?;
        }
        Commands::Compile { ast } => {
            run_compile(&read_rule(&ast)?, config)?;
        }
        Commands::Demo => {
            let engine = create_engine(Arc::new(StatementText))?.with_config(config);
            run_demo(&engine)?;
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> ExpressionResult<serde_json::Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_rule(path: &Path) -> ExpressionResult<Node> {
    Ok(Node::from_json(read_json(path)?)?)
}

fn load_config(path: Option<&Path>) -> ExpressionResult<RuleConfig> {
    match path {
        Some(path) => Ok(serde_json::from_value(read_json(path)?)?),
        None => Ok(RuleConfig::default()),
    }
}

fn load_scope(path: Option<&Path>) -> ExpressionResult<Scope> {
    match path {
        Some(path) => Scope::from_json(read_json(path)?),
        None => {
            warn!("No scope given, evaluating against the sample scope");
            sample_scope()
        }
    }
}

fn run_eval(engine: &Engine, scope: &Scope, ast: &Node, verbose: bool) -> ExpressionResult<()> {
    let validated = engine.validate(ast)?;
    if verbose {
        println!("{}", format_node(&validated));
    }

    let value = common_runtime::block_on(engine.value_of(scope, &validated))??;
    print_outcome(&ast.to_string(), &validated, &value);
    Ok(())
}

fn run_compile(ast: &Node, config: RuleConfig) -> ExpressionResult<()> {
    let compiler = create_compiler()?.with_config(config.optimizer);
    println!("{}", compiler.compile_to_sql(ast)?);
    Ok(())
}

fn run_demo(engine: &Engine) -> ExpressionResult<()> {
    print_header("Running Sample Rules");
    let scope = sample_scope()?;

    for (name, ast) in sample_rules()? {
        println!("\n{name}:");
        match engine.validate(&ast) {
            Ok(validated) => {
                let value = common_runtime::block_on(engine.value_of(&scope, &validated))??;
                print_outcome(&ast.to_string(), &validated, &value);
            }
            Err(err) => warn!("Sample `{name}` failed to validate: {err}"),
        }
        print_divider();
    }

    print_header("Compiling to SQL");
    let compiler = create_compiler()?;
    let ast = Node::from_json(serde_json::json!({
        "type": "LogicalExpression",
        "operator": "and",
        "operands": [
            { "type": "CallExpression", "callee": { "type": "Identifier", "name": "isCredit" }, "arguments": [] },
            {
                "type": "BinaryExpression",
                "operator": ">",
                "left": { "type": "MemberExpression", "object": { "type": "Identifier", "name": "past" }, "path": ["amount"] },
                "right": { "type": "Literal", "value": 100 }
            }
        ]
    }))?;
    println!("{ast}");
    println!("=> {}", compiler.compile_to_sql(&ast)?);

    println!("\nDemo complete!");
    Ok(())
}
