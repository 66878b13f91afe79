//! Command handlers.
//!
//! Each handler loads what it needs from the store, calls into the
//! application layer and prints the outcome.

use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use jimeng_application::{
    ApplicationError, HistoryStore, KeyValueStore, RunTool, SettingsStore, SubmitGeneration, Tool,
    build_generation_request,
};
use jimeng_domain::generation::resolve_model;
use jimeng_domain::{
    EnvConfig, GenerationForm, GenerationType, HistoryItem, ImageSource, ImageToImageForm,
    Region, Settings, SubmissionState, TextToImageForm, VideoGenerationForm,
};
use jimeng_infrastructure::{ReqwestTransport, SystemClock, load_attachment, render_curl};
use tracing::debug;

use crate::cli::{
    ConfigCommand, GenerateCommand, HistoryCommand, ImageToImageArgs, SubmitArgs,
    TextToImageArgs, VideoArgs,
};

/// Result type of command handlers.
pub type CommandResult = Result<(), Box<dyn Error>>;

fn mask(token: &str) -> String {
    if token.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = token.chars().take(4).collect();
    format!("{visible}****")
}

fn print_config(settings: &Settings) {
    println!("region: {}", settings.region);
    for &region in Region::all() {
        let config = settings.config.get(region);
        let marker = if region == settings.region { "*" } else { " " };
        println!(
            "{marker} {region:<13} {}  token {}",
            config.base_url,
            mask(&config.token)
        );
    }
}

/// Runs a `config` subcommand.
pub fn config<S: KeyValueStore>(store: S, command: ConfigCommand) -> CommandResult {
    let settings_store = SettingsStore::new(store);
    let mut settings = settings_store.load();

    match command {
        ConfigCommand::Show => {}
        ConfigCommand::Region { region } => settings_store.switch_region(&mut settings, region)?,
        ConfigCommand::BaseUrl { url } => settings_store.set_base_url(&mut settings, url)?,
        ConfigCommand::Token { token } => settings_store.set_token(&mut settings, token)?,
    }
    print_config(&settings);
    Ok(())
}

/// Turns `--image` values into image sources, reading local files.
async fn image_sources(values: &[String]) -> Result<Vec<ImageSource>, Box<dyn Error>> {
    let mut sources = Vec::with_capacity(values.len());
    for value in values {
        if value.starts_with("http://") || value.starts_with("https://") {
            sources.push(ImageSource::url(value.clone()));
        } else {
            let attachment = load_attachment(Path::new(value)).await?;
            debug!(file = %attachment.file_name, len = attachment.bytes.len(), "attachment loaded");
            sources.push(ImageSource::file(attachment));
        }
    }
    Ok(sources)
}

/// Builds the form for a generate subcommand.
///
/// Returns the form together with the shared submit options.
pub async fn build_form(
    command: GenerateCommand,
    region: Region,
) -> Result<(GenerationForm, SubmitArgs), Box<dyn Error>> {
    let (mut form, model, submit) = match command {
        GenerateCommand::TextToImage(TextToImageArgs {
            prompt,
            model,
            negative_prompt,
            ratio,
            resolution,
            sample_strength,
            submit,
        }) => {
            let form = GenerationForm::TextToImage(TextToImageForm {
                prompt,
                negative_prompt,
                ratio,
                resolution,
                sample_strength,
                ..TextToImageForm::default()
            });
            (form, model, submit)
        }
        GenerateCommand::ImageToImage(ImageToImageArgs {
            prompt,
            model,
            negative_prompt,
            images,
            ratio,
            resolution,
            sample_strength,
            intelligent_ratio,
            submit,
        }) => {
            let form = GenerationForm::ImageToImage(ImageToImageForm {
                prompt,
                negative_prompt,
                images: image_sources(&images).await?,
                ratio,
                resolution,
                sample_strength,
                intelligent_ratio,
                ..ImageToImageForm::default()
            });
            (form, model, submit)
        }
        GenerateCommand::Video(VideoArgs {
            prompt,
            model,
            ratio,
            resolution,
            duration,
            images,
            submit,
        }) => {
            let form = GenerationForm::Video(VideoGenerationForm {
                prompt,
                ratio,
                resolution,
                duration,
                file_paths: image_sources(&images).await?,
                ..VideoGenerationForm::default()
            });
            (form, model, submit)
        }
    };

    let requested = model.unwrap_or_else(|| form.model().to_string());
    let resolved = resolve_model(form.kind(), region, &requested);
    if resolved != requested {
        debug!(%requested, %resolved, %region, "model not offered in region");
    }
    form.set_model(resolved);
    Ok((form, submit))
}

/// Renders the curl command for a form, without sending anything.
#[must_use]
pub fn preview(config: &EnvConfig, form: &GenerationForm, file_path: Option<&str>) -> String {
    render_curl(&build_generation_request(config, form), file_path)
}

fn print_state(state: &SubmissionState) -> CommandResult {
    if let Some(payload) = state.viewer_payload() {
        println!("{}", serde_json::to_string_pretty(payload)?);
    }
    match state {
        SubmissionState::Success {
            history_id: Some(id),
            ..
        } => {
            eprintln!("saved to history as {id}");
            Ok(())
        }
        SubmissionState::Error { message, .. } => Err(message.clone().into()),
        _ => Ok(()),
    }
}

/// Runs a `generate` subcommand.
pub async fn generate<S>(store: Arc<S>, command: GenerateCommand) -> CommandResult
where
    S: KeyValueStore + 'static,
{
    let settings = SettingsStore::new(Arc::clone(&store)).load();
    let (form, submit) = build_form(command, settings.region).await?;

    if submit.preview {
        println!("{}", preview(settings.active(), &form, submit.file_path.as_deref()));
        return Ok(());
    }

    let history = Arc::new(HistoryStore::new(store, SystemClock::new()));
    let use_case = SubmitGeneration::new(ReqwestTransport::new()?, history);
    let state = use_case
        .execute(settings.active(), &form)
        .await
        .map_err(ApplicationError::from)?;
    print_state(&state)
}

/// Runs a tool.
pub async fn tools<S: KeyValueStore>(store: S, tool: Tool) -> CommandResult {
    let settings = SettingsStore::new(store).load();
    let use_case = RunTool::new(ReqwestTransport::new()?);
    let state = use_case
        .execute(tool, settings.active())
        .await
        .map_err(ApplicationError::from)?;
    print_state(&state)
}

fn summary_line(item: &HistoryItem, now: chrono::DateTime<Utc>) -> String {
    let prompt: String = item.prompt.chars().take(40).collect();
    format!(
        "{:<10} {:<10} {:<16} {:<40} {}",
        item.id,
        item.time_ago(now),
        item.kind.label(),
        prompt,
        item.primary_url().unwrap_or("-")
    )
}

/// Runs a `history` subcommand.
pub fn history<S: KeyValueStore>(store: S, command: HistoryCommand) -> CommandResult {
    let history = HistoryStore::new(store, SystemClock::new());

    match command {
        HistoryCommand::List { kind } => {
            let now = Utc::now();
            let items = history.list();
            let filtered = items
                .iter()
                .filter(|item| kind.is_none_or(|k: GenerationType| item.kind == k));
            for item in filtered {
                println!("{}", summary_line(item, now));
            }
        }
        HistoryCommand::Show { id } => {
            let item = history
                .get(&id)
                .ok_or_else(|| ApplicationError::NotFound(format!("history record {id}")))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        HistoryCommand::Delete { ids } => {
            let ids: HashSet<String> = ids.into_iter().collect();
            let remaining = history.delete_many(&ids);
            eprintln!("{} records left", remaining.len());
        }
        HistoryCommand::Clear => {
            history.clear();
            eprintln!("history cleared");
        }
    }
    Ok(())
}
