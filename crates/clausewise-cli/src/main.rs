mod config;
mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clausewise_ai::{ScriptedSuggestions, SuggestionBroker};
use clausewise_core::{
    ChangeType, ClauseId, ComparisonMode, Corpora, Resolution, ViewMode, ViewState,
    category_breakdown, missing_categories,
};
use clausewise_store::{ContractStore, SharedContract, load_contract, load_corpora, save_contract};
use serde_json::{Value, json};

use crate::config::ScoreArgs;

#[derive(Parser)]
#[command(name = "clausewise", version, about = "Review contract clauses: risk, suggestions, changes")]
struct Cli {
    /// Contract JSON file.
    #[arg(long, env = "CLAUSEWISE_CONTRACT", default_value = "contract.json", global = true)]
    contract: PathBuf,

    /// Print one JSON document instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    score: ScoreArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Risk counts, score, per-category breakdown, and missing clauses.
    Summary {
        #[arg(long, env = "CLAUSEWISE_CORPORA")]
        corpora: Option<PathBuf>,
    },
    /// All clauses in document order.
    List {
        #[arg(long, default_value = "tree")]
        view: ViewMode,
        #[arg(long)]
        no_highlights: bool,
        #[arg(long)]
        no_track_changes: bool,
    },
    /// One clause.
    Show { id: ClauseId },
    /// Accept a clause's pending suggestion.
    Apply { id: ClauseId },
    /// Accept or reject a clause's pending change.
    Resolve {
        id: ClauseId,
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        accept: bool,
        #[arg(long)]
        reject: bool,
    },
    /// Mark a clause as changed against the last version.
    Flag { id: ClauseId, change_type: ChangeType },
    /// Replace a clause's text.
    Edit { id: ClauseId, content: String },
    /// Compare a clause against a reference corpus.
    Compare {
        id: ClauseId,
        #[arg(long, default_value = "template")]
        mode: ComparisonMode,
        #[arg(long, env = "CLAUSEWISE_CORPORA")]
        corpora: Option<PathBuf>,
    },
    /// Replace a clause's text with its reference text.
    Adopt {
        id: ClauseId,
        #[arg(long, default_value = "template")]
        mode: ComparisonMode,
        #[arg(long, env = "CLAUSEWISE_CORPORA")]
        corpora: Option<PathBuf>,
    },
    /// Request suggestions for clauses from a scripted source.
    Suggest {
        #[arg(required = true)]
        ids: Vec<ClauseId>,
        #[arg(long)]
        script: PathBuf,
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
}

/// What a command prints: the JSON document or the text rendering, never both.
struct Output {
    json: Value,
    text: String,
    /// Suggestion requests that errored. Any makes the process exit non-zero.
    failures: usize,
}

impl Output {
    fn new(json: Value, text: String) -> Self {
        Self {
            json,
            text,
            failures: 0,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    tracing::debug!("clausewise v{}", env!("CARGO_PKG_VERSION"));

    let as_json = cli.json;
    let output = execute(cli).await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        print!("{}", output.text);
    }

    if output.failures > 0 {
        anyhow::bail!("{} suggestion request(s) failed", output.failures);
    }
    Ok(())
}

async fn execute(cli: Cli) -> anyhow::Result<Output> {
    let mut store = open_store(&cli.contract, &cli.score)?;

    let output = match cli.command {
        Command::Summary { corpora } => {
            let corpora = open_corpora(corpora.as_deref())?;
            let summary = store.summary();
            let breakdown = category_breakdown(store.list_clauses());
            let missing = missing_categories(store.list_clauses(), &corpora);
            Output::new(
                json!({
                    "title": store.title(),
                    "summary": summary,
                    "categories": breakdown,
                    "missing": missing,
                }),
                display::summary_card(store.title(), &summary, &breakdown, &missing),
            )
        }
        Command::List {
            view,
            no_highlights,
            no_track_changes,
        } => {
            let mut state = ViewState::default();
            state.set_view_mode(view);
            state.set_show_highlights(!no_highlights);
            state.set_track_changes(!no_track_changes);
            Output::new(
                serde_json::to_value(store.list_clauses())?,
                display::clause_listing(store.list_clauses(), &state),
            )
        }
        Command::Show { id } => {
            let clause = store.get_clause(id)?;
            Output::new(
                serde_json::to_value(clause)?,
                display::clause_card(clause, &ViewState::default()),
            )
        }
        Command::Compare { id, mode, corpora } => {
            let corpora = open_corpora(corpora.as_deref())?;
            let comparison = store.compare(id, mode, &corpora)?;
            Output::new(
                serde_json::to_value(&comparison)?,
                display::comparison_card(store.get_clause(id)?, &comparison),
            )
        }
        Command::Apply { id } => {
            let applied = store.apply_suggestion(id)?;
            let outcome = json!({
                "action": "suggestionApplied",
                "from": applied.previous_risk,
                "to": applied.risk_level,
            });
            let message = format!(
                "clause {id}: suggestion applied, risk {} -> {}",
                applied.previous_risk, applied.risk_level
            );
            commit(&cli.contract, &store, id, outcome, message)?
        }
        Command::Resolve { id, accept, .. } => {
            let resolution = store.resolve_change(id, accept)?;
            let (action, verb) = match resolution {
                Resolution::Applied(_) => ("suggestionApplied", "accepted, suggestion applied"),
                Resolution::Accepted(_) => ("changeAccepted", "accepted"),
                Resolution::Rejected(_) => ("changeRejected", "rejected"),
            };
            let outcome = json!({
                "action": action,
                "changeType": resolution.change_type(),
            });
            commit(&cli.contract, &store, id, outcome, format!("clause {id}: change {verb}"))?
        }
        Command::Flag { id, change_type } => {
            let previous = store.flag_change(id, change_type)?;
            let outcome = json!({
                "action": "changeFlagged",
                "changeType": change_type,
                "replaced": previous,
            });
            let message = match previous {
                Some(previous) => format!("clause {id}: change {previous} -> {change_type}"),
                None => format!("clause {id}: flagged {change_type}"),
            };
            commit(&cli.contract, &store, id, outcome, message)?
        }
        Command::Edit { id, content } => {
            store.edit_clause(id, content)?;
            let outcome = json!({ "action": "edited" });
            commit(&cli.contract, &store, id, outcome, format!("clause {id}: edited"))?
        }
        Command::Adopt { id, mode, corpora } => {
            let corpora = open_corpora(corpora.as_deref())?;
            let comparison = store.adopt_comparison(id, mode, &corpora)?;
            let message = format!(
                "clause {id}: adopted {mode} text (deviation was {})",
                comparison.deviation_score
            );
            let outcome = json!({ "action": "comparisonAdopted", "comparison": comparison });
            commit(&cli.contract, &store, id, outcome, message)?
        }
        Command::Suggest {
            ids,
            script,
            delay_ms,
        } => {
            let source = ScriptedSuggestions::from_file(&script)?
                .with_delay(Duration::from_millis(delay_ms));
            let shared = SharedContract::new(store);
            let broker = SuggestionBroker::new(Arc::new(source), shared.clone());

            let mut deliveries = Vec::with_capacity(ids.len());
            let mut text = String::new();
            let mut failures = 0;
            for (id, outcome) in ids.iter().zip(broker.request_all(&ids).await) {
                match outcome {
                    Ok(delivery) => {
                        deliveries.push(json!({ "clause": id, "delivery": delivery.as_str() }));
                        text.push_str(&format!("clause {id}: {}\n", delivery.as_str()));
                    }
                    Err(e) => {
                        tracing::warn!(clause = id, error = %e, "suggestion request failed");
                        deliveries.push(json!({ "clause": id, "error": e.to_string() }));
                        failures += 1;
                    }
                }
            }

            let guard = shared.lock().await;
            save(&cli.contract, &guard)?;
            let summary = guard.summary();
            text.push_str(&format!("score: {}%\n", summary.score));
            Output {
                json: json!({ "deliveries": deliveries, "summary": summary }),
                text,
                failures,
            }
        }
    };

    Ok(output)
}

fn open_store(path: &Path, score: &ScoreArgs) -> anyhow::Result<ContractStore> {
    let doc = load_contract(path).with_context(|| format!("loading {}", path.display()))?;
    let store = ContractStore::from_document(doc)?.with_policy(score.policy()?)?;
    Ok(store)
}

fn open_corpora(path: Option<&Path>) -> anyhow::Result<Corpora> {
    match path {
        Some(p) => load_corpora(p).with_context(|| format!("loading corpora {}", p.display())),
        None => Ok(Corpora::default()),
    }
}

fn save(path: &Path, store: &ContractStore) -> anyhow::Result<()> {
    save_contract(path, &store.to_document()).with_context(|| format!("saving {}", path.display()))
}

/// Persist a single-clause mutation and report it with the new score.
fn commit(
    path: &Path,
    store: &ContractStore,
    id: ClauseId,
    outcome: Value,
    message: String,
) -> anyhow::Result<Output> {
    save(path, store)?;
    let summary = store.summary();
    Ok(Output::new(
        json!({ "clause": id, "outcome": outcome, "summary": summary }),
        format!("{message}\nscore: {}%\n", summary.score),
    ))
}
