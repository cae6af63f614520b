//! CLI command definitions and handlers

use crate::config::{CliConfig, OutputFormat};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimizuku_constraints::{ConstraintEngine, ConstructViolations, PropFuncArg, SerializerConfig};
use mimizuku_core::{Binding, Node};
use mimizuku_rules::{EvaluationContext, RuleLibrary, RuleRef, TracingProgressMonitor};
use mimizuku_store::{load_json_file, RdfStore};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mimizuku")]
#[command(about = "SPIN constraint checking for RDF instances")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG and the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the constraint violations of an instance as triples
    Violations {
        /// Graph file (JSON triples); repeatable
        #[arg(short, long)]
        data: Vec<PathBuf>,

        /// Rule library file
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Instance term, e.g. `<http://example.org/alice>`
        #[arg(short, long)]
        instance: String,

        /// Class term, e.g. `<http://example.org/Person>`
        #[arg(short, long)]
        class: String,

        /// Emit spin:violationSource triples
        #[arg(long)]
        include_source: Option<bool>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// List the constraints collected for a class, in evaluation order
    Constraints {
        /// Graph file (JSON triples); repeatable
        #[arg(short, long)]
        data: Vec<PathBuf>,

        /// Rule library file
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Class term
        #[arg(short, long)]
        class: String,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Show system information
    Info,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    /// False when violations were found
    pub success: bool,
    pub message: String,
    /// Rendered output for stdout
    pub output: String,
    pub data: Option<Value>,
}

/// Execute CLI commands
pub struct CommandExecutor {
    config: CliConfig,
}

impl CommandExecutor {
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Violations {
                data,
                rules,
                instance,
                class,
                include_source,
                format,
            } => self.execute_violations(data, rules, &instance, &class, include_source, format),
            Commands::Constraints { data, rules, class, format } => {
                self.execute_constraints(data, rules, &class, format)
            }
            Commands::Info => self.execute_info(),
        }
    }

    fn execute_violations(
        &self,
        data: Vec<PathBuf>,
        rules: Option<PathBuf>,
        instance: &str,
        class: &str,
        include_source: Option<bool>,
        format: Option<OutputFormat>,
    ) -> Result<CommandResult> {
        let store = self.load_store(data)?;
        let library = self.load_library(rules)?;
        let instance = parse_term(instance)?;
        let class = parse_term(class)?;

        let include_source = include_source.or(self.config.include_source).unwrap_or(true);
        let engine = ConstraintEngine::new()
            .with_serializer_config(SerializerConfig { include_source })
            .with_monitor(Arc::new(TracingProgressMonitor::new()));
        let function = ConstructViolations::new(engine);

        let ctx = EvaluationContext::new(&store, &library);
        let slots = PropFuncArg::list([
            Node::variable("subject"),
            Node::variable("predicate"),
            Node::variable("object"),
        ]);
        let rows: Vec<Binding> = function
            .exec(
                &ctx,
                &Binding::new(),
                &PropFuncArg::list([instance.clone(), class.clone()]),
                &slots,
            )
            .context("Constraint check failed")?
            .collect();

        let json_rows: Vec<Value> = rows.iter().map(row_to_json).collect();
        let output = match format.unwrap_or(self.config.output) {
            OutputFormat::Text => rows
                .iter()
                .map(|row| {
                    let term = |var: &str| row.get(var).map(Node::to_string).unwrap_or_default();
                    format!("{} {} {} .", term("subject"), term("predicate"), term("object"))
                })
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => serde_json::to_string(&json_rows)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&json_rows)?,
        };

        info!("{} result rows for {} against {}", rows.len(), instance, class);

        Ok(CommandResult {
            success: rows.is_empty(),
            message: format!("{} violation triples", rows.len()),
            output,
            data: Some(json!({ "rows": json_rows })),
        })
    }

    fn execute_constraints(
        &self,
        data: Vec<PathBuf>,
        rules: Option<PathBuf>,
        class: &str,
        format: Option<OutputFormat>,
    ) -> Result<CommandResult> {
        let store = self.load_store(data)?;
        let library = self.load_library(rules)?;
        let class = parse_term(class)?;

        let ctx = EvaluationContext::new(&store, &library);
        let collected = ConstraintEngine::new().collect_constraints(&ctx, &class);
        let json_rules: Vec<Value> = collected.iter().map(rule_to_json).collect();

        let output = match format.unwrap_or(self.config.output) {
            OutputFormat::Text => {
                let mut output = format!("{} constraints for {}:", collected.len(), class);
                for (i, rule) in collected.iter().enumerate() {
                    output.push_str(&format!("\n  {}. {}", i + 1, rule));
                }
                output
            }
            OutputFormat::Json => serde_json::to_string(&json_rules)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&json_rules)?,
        };

        Ok(CommandResult {
            success: true,
            message: format!("Collected {} constraints", collected.len()),
            output,
            data: Some(json!({ "constraints": json_rules })),
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        let info = json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "repository": env!("CARGO_PKG_REPOSITORY"),
            "property_functions": [mimizuku_core::vocabulary::spin::CONSTRUCT_VIOLATIONS],
        });

        Ok(CommandResult {
            success: true,
            message: "System information".to_string(),
            output: serde_json::to_string_pretty(&info)?,
            data: Some(info),
        })
    }

    fn load_store(&self, data: Vec<PathBuf>) -> Result<RdfStore> {
        let paths = if data.is_empty() { self.config.data.clone() } else { data };
        if paths.is_empty() {
            warn!("No graph files given; checking against an empty graph");
        }

        let mut store = RdfStore::new();
        for path in &paths {
            load_json_file(&mut store, path)
                .with_context(|| format!("Failed to load graph {}", path.display()))?;
        }

        let stats = store.statistics();
        info!("Loaded {} triples in {} graphs", stats.total_triples, stats.graph_count);
        Ok(store)
    }

    fn load_library(&self, rules: Option<PathBuf>) -> Result<RuleLibrary> {
        match rules.or_else(|| self.config.rules.clone()) {
            Some(path) => RuleLibrary::from_json_file(&path)
                .with_context(|| format!("Failed to load rule library {}", path.display())),
            None => {
                warn!("No rule library given; every constraint will be unresolved");
                Ok(RuleLibrary::new())
            }
        }
    }
}

fn parse_term(text: &str) -> Result<Node> {
    text.parse::<Node>().with_context(|| format!("Invalid term: {}", text))
}

fn row_to_json(row: &Binding) -> Value {
    let map: Map<String, Value> = row
        .iter()
        .map(|(var, node)| (var.to_string(), Value::String(node.to_string())))
        .collect();
    Value::Object(map)
}

fn rule_to_json(rule: &RuleRef) -> Value {
    match rule {
        RuleRef::Query(call) => json!({
            "kind": "query",
            "source": call.source.to_string(),
            "comment": call.query.comment,
        }),
        RuleRef::Template(call) => json!({
            "kind": "template",
            "source": call.source.to_string(),
            "template": call.template.to_string(),
            "arguments": call
                .arguments
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect::<Map<String, Value>>(),
        }),
        RuleRef::Unresolved(node) => json!({
            "kind": "unresolved",
            "source": node.to_string(),
        }),
    }
}
