//! Console front-end for the AgriSakha advisory core.
//!
//! Type a question and press Enter. Commands start with `/`; `/help` lists
//! them. The conversation goes to stdout; tracing output goes to stderr.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use agrisakha::advisory::{AdvisoryBackend, HttpBackend};
use agrisakha::voice::{self, CaptureOutcome};
use agrisakha::{
    AdvisoryError, AdvisoryMessage, AgriConfig, Dispatcher, HealthMonitor, ImagePayload, Language,
    MonitorHandle, Query, Transcript, VoiceController,
};

const HELP: &str = "\
Commands:
  /image <path> [question]  attach a plant photo
  /lang                     switch between English and Hindi
  /status                   show connection and voice status
  /retry                    check the backend again now
  /speak                    read the last answer aloud
  /mic                      ask by voice
  /clear                    start a new conversation
  /quit                     exit";

type InputLines = Lines<BufReader<Stdin>>;

struct Session {
    config: AgriConfig,
    backend: Arc<dyn AdvisoryBackend>,
    monitor: MonitorHandle,
    dispatcher: Dispatcher,
    voice: VoiceController,
    language: watch::Sender<Language>,
}

impl Session {
    fn language(&self) -> Language {
        *self.language.borrow()
    }

    fn start_conversation(&mut self) {
        let transcript = Transcript::new();
        let welcome = AdvisoryMessage::welcome(self.language());
        println!("\n{}\n", welcome.text);
        transcript.append(welcome);
        self.dispatcher = Dispatcher::new(
            &self.config,
            Arc::clone(&self.backend),
            self.monitor.clone(),
            transcript,
        );
    }

    fn notice(&self, text: &str) {
        println!("{text}");
        self.dispatcher
            .transcript()
            .append(AdvisoryMessage::notice(text));
    }

    async fn ask(&self, query: Query) {
        if let Err(AdvisoryError::InvalidInput(reason)) =
            query.validate(self.config.dispatch.max_image_bytes)
        {
            let hint = self.language().pick(
                "Please type a question or attach an image file (max 10MB).",
                "कृपया प्रश्न लिखें या इमेज फ़ाइल जोड़ें (अधिकतम 10MB)।",
            );
            println!("{hint} ({reason})");
            return;
        }

        self.dispatcher
            .transcript()
            .append(AdvisoryMessage::user(&query));
        match self.dispatcher.submit(query).await {
            Ok(reply) => {
                self.print_reply(&reply);
                if let Err(e) = self.voice.auto_speak(&reply.text, self.language()) {
                    tracing::debug!(error = %e, "auto-speak skipped");
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    fn print_reply(&self, reply: &AdvisoryMessage) {
        println!("\n🌾 {}", reply.text);
        if let Some(diagnosis) = &reply.diagnosis {
            println!("\n{}", diagnosis.render(self.language()));
        }
        println!();
    }

    async fn attach_image(&self, args: &str) {
        let (path, question) = match args.split_once(char::is_whitespace) {
            Some((path, rest)) => (path, rest.trim()),
            None => (args, ""),
        };
        if path.is_empty() {
            println!("usage: /image <path> [question]");
            return;
        }
        match load_image(Path::new(path)).await {
            Ok(Some(image)) => {
                let query = Query::from_image(image, self.language()).with_text(question);
                self.ask(query).await;
            }
            Ok(None) => println!(
                "{}",
                self.language()
                    .pick("Please select an image file.", "कृपया एक इमेज फ़ाइल चुनें।")
            ),
            Err(e) => println!("{e:#}"),
        }
    }

    fn speak_last(&self) {
        let last = self
            .dispatcher
            .transcript()
            .snapshot()
            .into_iter()
            .rev()
            .find(|m| m.role == agrisakha::Role::Assistant);
        let Some(last) = last else {
            return;
        };
        match self.voice.speak(&last.text, self.language()) {
            Ok(()) => {}
            Err(AdvisoryError::UnsupportedCapability(capability)) => {
                println!("{}", voice::unsupported_message(capability, self.language()));
            }
            Err(e) => println!("{e}"),
        }
    }

    async fn capture(&self, input: &mut InputLines) -> anyhow::Result<()> {
        let language = self.language();
        let pending = match self.voice.start_capture(language).await {
            Ok(pending) => pending,
            Err(AdvisoryError::UnsupportedCapability(capability)) => {
                self.notice(voice::unsupported_message(capability, language));
                return Ok(());
            }
            Err(AdvisoryError::PermissionDenied) => {
                self.notice(voice::permission_denied(language));
                return Ok(());
            }
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        };

        println!(
            "{}",
            language.pick(
                "🎤 Listening... press Enter to stop.",
                "🎤 सुन रहा हूँ... रोकने के लिए Enter दबाएँ।"
            )
        );
        let outcome = pending.finish();
        tokio::pin!(outcome);
        let outcome = tokio::select! {
            outcome = &mut outcome => outcome,
            line = input.next_line() => {
                line.context("reading stdin")?;
                if let Err(e) = self.voice.stop_capture() {
                    tracing::debug!(error = %e, "capture already finished");
                }
                outcome.await
            }
        };

        match outcome {
            CaptureOutcome::Query(text) => {
                println!("> {text}");
                self.ask(Query::from_text(text, language)).await;
            }
            CaptureOutcome::Failed { message, switch_to } => {
                self.notice(&message);
                if let Some(next) = switch_to {
                    self.language.send_replace(next);
                }
            }
            CaptureOutcome::Cancelled => {}
        }
        Ok(())
    }

    fn print_status(&self) {
        let language = self.language();
        let state = self.monitor.current();
        println!("{}", state.banner(language));
        if let Some(endpoint) = state.endpoint() {
            println!("  endpoint: {endpoint}");
        }
        println!("  language: {language}");
        println!("  voice: {}", self.voice.state());
        println!("  messages: {}", self.dispatcher.transcript().len());
    }
}

/// Read an image file. `Ok(None)` if the extension is not an image type.
async fn load_image(path: &Path) -> anyhow::Result<Option<ImagePayload>> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let Some(mime) = ImagePayload::mime_for_filename(&filename) else {
        return Ok(None);
    };
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(ImagePayload::new(data, filename, mime)))
}

/// Print the connectivity banner whenever the state or language changes.
fn spawn_banner(monitor: &MonitorHandle, mut language: watch::Receiver<Language>) {
    let mut connectivity = monitor.watch();
    tokio::spawn(async move {
        let mut last = None;
        loop {
            let banner = connectivity.current().banner(*language.borrow_and_update());
            if last != Some(banner) {
                println!("[{banner}]");
                last = Some(banner);
            }
            tokio::select! {
                changed = connectivity.changed() => if changed.is_none() { break },
                changed = language.changed() => if changed.is_err() { break },
            }
        }
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = AgriConfig::default_config_path();
    let config = AgriConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    tracing::info!(
        endpoints = config.endpoints.urls.len(),
        language = %config.language,
        "agrisakha starting"
    );

    let cancel = CancellationToken::new();
    let monitor = HealthMonitor::new(&config).context("starting health monitor")?;
    let handle = monitor.handle();
    let monitor_task = monitor.spawn(cancel.clone());

    let backend: Arc<dyn AdvisoryBackend> =
        Arc::new(HttpBackend::new(&config).context("building advisory client")?);
    let (language, language_rx) = watch::channel(config.language);
    spawn_banner(&handle, language_rx);

    let mut session = Session {
        dispatcher: Dispatcher::new(&config, Arc::clone(&backend), handle.clone(), Transcript::new()),
        voice: VoiceController::unsupported(config.voice.clone()),
        backend,
        monitor: handle,
        language,
        config,
    };
    session.start_conversation();
    println!("{HELP}\n");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };
        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/lang" => {
                let next = session.language().toggled();
                session.language.send_replace(next);
                println!("language: {next}");
            }
            "/status" => session.print_status(),
            "/retry" => session.monitor.probe_now(),
            "/clear" => session.start_conversation(),
            "/speak" => session.speak_last(),
            "/mic" => session.capture(&mut input).await?,
            "/image" => session.attach_image(args).await,
            _ if command.starts_with('/') => println!("unknown command {command}; try /help"),
            _ => session.ask(Query::from_text(line, session.language())).await,
        }
    }

    session.voice.stop_speaking();
    cancel.cancel();
    if let Err(e) = monitor_task.await {
        tracing::warn!(error = %e, "health monitor task ended abnormally");
    }
    tracing::info!("agrisakha shut down cleanly");
    Ok(())
}
