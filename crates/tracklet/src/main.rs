//! tracklet command-line front end.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{ChatArgs, Cli, Command, HabitArgs, PhysiqueArgs};
use log::{debug, info};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracklet::config::{LayeredConfigOptions, TrackletConfig};
use tracklet::protocol::{
    Author, ChatMessage, ChatTurn, DeliveryStatus, EncodeRequest, HabitKind, HabitRecord,
    MeasurementField, MeasurementRecord,
};
use tracklet::{
    BackendOutcome, ChatSession, HabitPanel, MeasurementPanel, Notice, NotificationBus,
    WebhookClient,
};

/// Leaves the interactive chat loop.
const QUIT_COMMAND: &str = "/quit";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracklet::init_logging();

    let cli = Cli::parse();
    info!(
        "starting tracklet (config_layers={}, test_endpoint={}, dry_run={})",
        cli.config.len(),
        cli.test_endpoint,
        cli.dry_run
    );
    let mut config = load_config(&cli)?;
    if cli.test_endpoint {
        config.webhook.use_test = true;
    }
    let client = WebhookClient::from_config(&config).context("failed to create webhook client")?;
    debug!("webhook client ready: {:?}", client);

    let bus = NotificationBus::default();
    let mut notices = bus.subscribe();
    let notifier = Arc::new(bus);

    let succeeded = match cli.command {
        Command::Habit(args) => {
            let mut panel = HabitPanel::new(client.clone(), notifier);
            run_habit(&mut panel, &client, args, cli.dry_run).await?
        }
        Command::Physique(args) => {
            let mut panel = MeasurementPanel::new(client.clone(), notifier);
            run_physique(&mut panel, &client, args, cli.dry_run).await?
        }
        Command::Chat(args) => {
            let mut session = ChatSession::new(client.clone(), notifier, &config.assistant);
            run_chat(&mut session, &client, args, cli.dry_run, &mut notices).await?
        }
    };
    print_notices(&mut notices);
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<TrackletConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let options = cli
        .config
        .iter()
        .fold(LayeredConfigOptions::new(&cwd), |options, path| {
            options.with_runtime_path(path)
        });
    let layered = TrackletConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

async fn run_habit(
    panel: &mut HabitPanel,
    client: &WebhookClient,
    args: HabitArgs,
    dry_run: bool,
) -> anyhow::Result<bool> {
    for kind in args.done() {
        panel.set(kind, true);
    }
    panel.set_note(args.note);
    println!("{}", habit_summary(panel.form()));
    if dry_run {
        println!("{}", client.preview_url(&panel.form().to_request()?)?);
        return Ok(true);
    }
    let outcome = panel.submit().await?;
    print_outcome(&outcome);
    Ok(outcome.succeeded)
}

async fn run_physique(
    panel: &mut MeasurementPanel,
    client: &WebhookClient,
    args: PhysiqueArgs,
    dry_run: bool,
) -> anyhow::Result<bool> {
    for (field, text) in args.fields() {
        panel.set_text(field, text);
    }
    panel.set_note(args.note.clone());
    for line in measurement_lines(panel.form()) {
        println!("{line}");
    }
    if let Some(category) = panel.bmi_category() {
        println!("BMI: {} ({})", panel.bmi_display(), category.label());
    }
    if dry_run {
        println!("{}", client.preview_url(&panel.form().to_request()?)?);
        return Ok(true);
    }
    let outcome = panel.submit().await?;
    print_outcome(&outcome);
    if let Some(text) = panel.assistant_text() {
        println!("\n{text}");
    }
    if let Some(url) = panel.chart_url() {
        println!("\nChart: {url}");
    }
    Ok(outcome.succeeded)
}

async fn run_chat(
    session: &mut ChatSession,
    client: &WebhookClient,
    args: ChatArgs,
    dry_run: bool,
    notices: &mut broadcast::Receiver<Notice>,
) -> anyhow::Result<bool> {
    if let Some(message) = args.message {
        if dry_run {
            let request = ChatMessage::new(message).to_request()?;
            println!("{}", client.preview_url(&request)?);
            return Ok(true);
        }
        let before = session.transcript().len();
        let outcome = session.send(&message).await?;
        print_turns(session, before);
        return Ok(outcome.succeeded);
    }

    print_turns(session, 0);
    chat_lines(session, BufReader::new(tokio::io::stdin()), notices).await
}

/// Send each non-blank input line until `/quit` or end of input.
///
/// Reports whether the last message sent succeeded; a session that sent
/// nothing counts as successful.
async fn chat_lines<R: AsyncBufRead + Unpin>(
    session: &mut ChatSession,
    input: R,
    notices: &mut broadcast::Receiver<Notice>,
) -> anyhow::Result<bool> {
    let mut lines = input.lines();
    let mut last_succeeded = true;
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line == QUIT_COMMAND {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let before = session.transcript().len();
        last_succeeded = session.send(line).await?.succeeded;
        print_turns(session, before);
        print_notices(notices);
    }
    info!(
        "chat session ended (turns={}, last_succeeded={})",
        session.transcript().len(),
        last_succeeded
    );
    Ok(last_succeeded)
}

/// One line naming the habits marked done.
fn habit_summary(record: &HabitRecord) -> String {
    let done: Vec<&str> = HabitKind::ALL
        .into_iter()
        .filter(|kind| record.is_set(*kind))
        .map(HabitKind::label)
        .collect();
    if done.is_empty() {
        "Done: none".to_string()
    } else {
        format!("Done: {}", done.join(", "))
    }
}

/// `Label: value unit` for every measurement that was entered.
fn measurement_lines(record: &MeasurementRecord) -> Vec<String> {
    MeasurementField::ALL
        .into_iter()
        .filter(|field| record.get(*field) != 0.0)
        .map(|field| format!("{}: {} {}", field.label(), record.get(field), field.unit()))
        .collect()
}

fn print_outcome(outcome: &BackendOutcome) {
    let status = outcome
        .status
        .map(|status| status.to_string())
        .unwrap_or_else(|| "no response".to_string());
    println!("{} [{}]", outcome.user_message, status);
}

fn print_turns(session: &ChatSession, from: usize) {
    for turn in session.transcript().iter().skip(from) {
        println!("{}", render_turn(session.assistant_name(), turn));
    }
}

fn render_turn(assistant_name: &str, turn: &ChatTurn) -> String {
    match turn.author {
        Author::Assistant => format!("{assistant_name}> {}", turn.text),
        Author::User => {
            let marker = match turn.delivery {
                Some(DeliveryStatus::Sent) => "sent",
                Some(DeliveryStatus::Failed) => "failed",
                Some(DeliveryStatus::Sending) | None => "sending",
            };
            format!("you> {} [{marker}]", turn.text)
        }
    }
}

/// Print every notice queued so far to stderr.
fn print_notices(notices: &mut broadcast::Receiver<Notice>) {
    loop {
        match notices.try_recv() {
            Ok(notice) => match notice.message {
                Some(message) => eprintln!("[{:?}] {}: {}", notice.level, notice.title, message),
                None => eprintln!("[{:?}] {}", notice.level, notice.title),
            },
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}
