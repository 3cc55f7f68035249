use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use client_core::{
    load_config, ActionEditor, BufferEditor, ConfirmGate, DeleteOutcome, GesturePanel,
    HandlerRegistry, Notifier, RenderedList, Severity, SubmitOutcome, Surfaces, TestRun,
};
use shared::direction;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Manage gesture bindings on a running panel backend")]
struct Args {
    /// Overrides the configured backend URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    /// Shows the gesture bound to a direction sequence.
    Find {
        #[arg(long)]
        directions: String,
    },
    Add {
        #[arg(long)]
        name: String,
        /// Glyphs or compass labels, space separated.
        #[arg(long)]
        directions: String,
        #[command(flatten)]
        action: ActionArgs,
    },
    Edit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        directions: Option<String>,
        #[command(flatten)]
        action: ActionArgs,
    },
    Rename {
        #[arg(long)]
        name: String,
        #[arg(long)]
        to: String,
    },
    Delete {
        #[arg(long)]
        name: String,
    },
    Test {
        #[command(flatten)]
        action: ActionArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ActionArgs {
    #[arg(long, conflicts_with = "action_file")]
    action: Option<String>,
    #[arg(long)]
    action_file: Option<PathBuf>,
}

impl ActionArgs {
    fn read(&self) -> Result<Option<String>> {
        match (&self.action, &self.action_file) {
            (Some(code), _) => Ok(Some(code.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("failed to read action file '{}'", path.display())),
            (None, None) => Ok(None),
        }
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("{message}"),
            Severity::Success => println!("ok: {message}"),
            Severity::Warning => eprintln!("warning: {message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }
}

struct StdinConfirm {
    assume_yes: bool,
}

#[async_trait]
impl ConfirmGate for StdinConfirm {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stdout = tokio::io::stdout();
        if stdout
            .write_all(format!("{message} [y/N] ").as_bytes())
            .await
            .is_err()
        {
            return false;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

fn print_list(rendered: &RenderedList) {
    match rendered {
        RenderedList::Placeholder(text) => println!("{text}"),
        RenderedList::Rows(rows) => {
            let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
            for row in rows {
                let labels: Vec<&str> = row
                    .directions
                    .split_whitespace()
                    .map(direction::to_label)
                    .collect();
                println!(
                    "{:width$}  {}  ({})",
                    row.name,
                    row.directions,
                    labels.join(" ")
                );
            }
        }
    }
}

async fn run(panel: &GesturePanel, editor: &BufferEditor, command: Command) -> Result<()> {
    let form = &panel.form;
    match command {
        Command::List => {
            panel.list.refresh().await?;
            print_list(&panel.list.rendered());
        }
        Command::Find { directions } => {
            panel.list.refresh().await?;
            match panel.list.collection().await.find_by_directions(&directions) {
                Some(gesture) => println!("{}\n{}", gesture.name, gesture.action),
                None => bail!("no gesture is bound to \"{directions}\""),
            }
        }
        Command::Add {
            name,
            directions,
            action,
        } => {
            panel.list.refresh().await?;
            form.begin_create().await;
            form.set_name(&name).await;
            for token in directions.split_whitespace() {
                form.append_direction(token).await;
            }
            editor.set_value(&action.read()?.unwrap_or_default());
            expect_saved(form.submit().await?)?;
        }
        Command::Edit {
            name,
            directions,
            action,
        } => {
            panel.list.refresh().await?;
            if !panel.edit(&name).await {
                bail!("no gesture named \"{name}\"");
            }
            if let Some(directions) = directions {
                form.clear_directions().await;
                for token in directions.split_whitespace() {
                    form.append_direction(token).await;
                }
            }
            if let Some(code) = action.read()? {
                editor.set_value(&code);
            }
            expect_saved(form.submit().await?)?;
        }
        Command::Rename { name, to } => {
            panel.list.refresh().await?;
            if !panel.rename(&name).await {
                bail!("no gesture named \"{name}\"");
            }
            form.set_name(&to).await;
            expect_saved(form.submit().await?)?;
        }
        Command::Delete { name } => {
            if panel.list.delete(&name).await? == DeleteOutcome::Cancelled {
                println!("delete cancelled");
            }
        }
        Command::Test { action } => {
            let code = action
                .read()?
                .ok_or_else(|| anyhow!("pass --action or --action-file"))?;
            editor.set_value(&code);
            match form.test_execute().await? {
                TestRun::Passed(Some(message)) | TestRun::Failed(Some(message)) => {
                    println!("{message}")
                }
                TestRun::Cancelled => println!("test cancelled"),
                _ => {}
            }
        }
    }
    Ok(())
}

fn expect_saved(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Added { .. } | SubmitOutcome::Updated { .. } => Ok(()),
        other => Err(anyhow!("form was not submitted: {other:?}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = load_config();
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    config.validate()?;
    tracing::debug!(server_url = %config.server_url, "using gesture backend");

    let editor = Arc::new(BufferEditor::new());
    let surfaces = Surfaces {
        notifier: Arc::new(ConsoleNotifier),
        confirm: Arc::new(StdinConfirm {
            assume_yes: args.yes,
        }),
        editor: editor.clone(),
    };
    let panel = GesturePanel::over_http(config, surfaces, HandlerRegistry::new());

    run(&panel, &editor, args.command).await
}
