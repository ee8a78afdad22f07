//! Command handlers behind the `mediclerk` binary.

use std::io::{self, BufReader, Stdin, Stdout};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, bail, eyre};
use mediclerk_api::auth::{AuthClient, RegistrationForm};
use mediclerk_api::client::{HttpClient, build_client};
use mediclerk_api::error::{ApiError, AuthError, FieldErrors};
use mediclerk_api::records::{RecordClient, RecordService};
use mediclerk_api::session::SessionProvider;
use mediclerk_core::models::payload::SubmissionPayload;
use mediclerk_core::models::record::{ClerkingRecord, RecordId, filter_by_patient};
use mediclerk_export::docx::generate_docx;
use mediclerk_export::render::{export_file_name, render_record, render_template};
use mediclerk_export::styles::DocumentStyles;
use mediclerk_forms::catalog::{display_name, list_specialties};
use mediclerk_forms::engine::FormSession;
use mediclerk_forms::error::{SubmitError, SubmitRejected};
use mediclerk_forms::registry::registry;
use mediclerk_forms::schema::{FieldDefinition, InputKind};
use mediclerk_suggest::augmenter::SuggestionAugmenter;
use mediclerk_suggest::gemini::GeminiSuggester;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Command};
use crate::config::{self, MediclerkConfig};
use crate::prompt::Prompter;
use crate::session_store;
use crate::values::{apply_values, read_values, write_draft};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Specialties => {
            print_specialties();
            Ok(())
        }
        Command::Fields { specialty } => print_fields(&specialty),
        command => App::load(cli.api_url)?.dispatch(command).await,
    }
}

fn print_specialties() {
    for s in list_specialties() {
        println!("{:<28} {:<28} {}", s.id, s.name, s.description);
    }
}

fn print_fields(specialty: &str) -> Result<()> {
    let fields = known_fields(specialty)?;
    println!("{} ({specialty})", display_name(specialty));
    for f in fields {
        let kind = match f.input {
            InputKind::Text => "text".to_string(),
            InputKind::TextArea { rows } => format!("textarea({rows})"),
        };
        let required = if f.is_required() { "required" } else { "" };
        let ai = if f.ai_suggestions { "ai" } else { "" };
        println!("  {:<36} {:<36} {kind:<12} {required:<8} {ai}", f.key, f.label);
    }
    Ok(())
}

fn known_fields(specialty: &str) -> Result<&'static [FieldDefinition]> {
    let schema = registry()
        .require_schema(specialty)
        .wrap_err("run `mediclerk specialties` to list them")?;
    Ok(schema.fields)
}

type Terminal = Prompter<BufReader<Stdin>, Stdout>;

fn terminal() -> Terminal {
    Prompter::new(BufReader::new(io::stdin()), io::stdout())
}

fn api_error(e: ApiError) -> eyre::Report {
    debug!(error = %e, "clerking service call failed");
    match e {
        ApiError::Unauthorized => eyre!("{} Run `mediclerk login`.", e.user_message()),
        other => eyre!(other.user_message()),
    }
}

fn field_report(errors: &FieldErrors) -> eyre::Report {
    let lines: Vec<String> = errors.iter().map(|(k, m)| format!("  {k}: {m}")).collect();
    eyre!("Please fix the following:\n{}", lines.join("\n"))
}

fn auth_error(e: AuthError) -> eyre::Report {
    match e {
        AuthError::Invalid(errors) => field_report(&errors),
        AuthError::LoginFailed(message) => eyre!(message),
        AuthError::Api(e) => api_error(e),
    }
}

fn submit_error(e: SubmitError<ApiError>) -> eyre::Report {
    match e {
        SubmitError::Rejected(SubmitRejected::Invalid(errors)) => field_report(&errors),
        SubmitError::Rejected(other) => eyre!(other),
        SubmitError::Failed(e) => api_error(e),
    }
}

/// Everything a command needs, built once from config and the saved session.
pub struct App {
    config_dir: PathBuf,
    config: MediclerkConfig,
    http: HttpClient,
    sessions: SessionProvider,
}

impl App {
    pub fn load(api_url: Option<String>) -> Result<Self> {
        let config_dir = config::config_dir()?;
        let mut config = config::load_or_default(&config_dir)?;
        if !config::config_path(&config_dir).exists() {
            config::save_config(&config_dir, &config)?;
        }
        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        let http = build_client(config.request_timeout()).map_err(api_error)?;
        let sessions = SessionProvider::new();
        if let Some(session) = session_store::load_session(&config_dir)? {
            debug!(user = %session.user.display_name(), "restored saved session");
            sessions.install(session);
        }

        Ok(Self {
            config_dir,
            config,
            http,
            sessions,
        })
    }

    fn records(&self) -> RecordClient {
        RecordClient::new(
            self.http.clone(),
            self.config.api_base_url.clone(),
            self.sessions.context(),
        )
    }

    fn auth(&self) -> AuthClient {
        AuthClient::new(
            self.http.clone(),
            self.config.api_base_url.clone(),
            self.sessions.clone(),
        )
    }

    pub async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Specialties | Command::Fields { .. } => Ok(()),
            Command::Login { email } => self.login(email).await,
            Command::Register => self.register().await,
            Command::Logout => self.logout(),
            Command::List { search } => self.list(search.as_deref().unwrap_or_default()).await,
            Command::Show { id } => self.show(&id.parse()?).await,
            Command::New { specialty, values } => self.create(&specialty, values.as_deref()).await,
            Command::Edit { id, values } => self.edit(&id.parse()?, values.as_deref()).await,
            Command::Delete { id, yes } => self.delete(&id.parse()?, yes).await,
            Command::Export { id, out, template } => {
                self.export(&id.parse()?, out, template.as_deref()).await
            }
            Command::Suggest {
                specialty,
                field,
                values,
            } => self.suggest(&specialty, &field, values.as_deref()).await,
        }
    }

    async fn login(&self, email: Option<String>) -> Result<()> {
        let mut prompt = terminal();
        let email = match email {
            Some(e) => e,
            None => prompt.ask_required("Email: ")?,
        };
        let password = prompt.ask_required("Password: ")?;

        let session = self
            .auth()
            .login(&email, &password)
            .await
            .map_err(auth_error)?;
        session_store::save_session(&self.config_dir, &session)?;
        println!("Signed in as {}", session.user.display_name());
        Ok(())
    }

    async fn register(&self) -> Result<()> {
        let mut prompt = terminal();
        let form = RegistrationForm {
            first_name: prompt.ask_required("First name: ")?,
            last_name: prompt.ask_required("Last name: ")?,
            email: prompt.ask_required("Email: ")?,
            password: prompt.ask_required("Password (min 8 characters): ")?,
        };
        self.auth().register(&form).await.map_err(auth_error)?;
        println!("Account created. Run `mediclerk login` to sign in.");
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        self.auth().logout();
        session_store::clear_session(&self.config_dir)?;
        println!("Signed out.");
        Ok(())
    }

    async fn list(&self, search: &str) -> Result<()> {
        let records = self.records().list().await.map_err(api_error)?;
        let matching = filter_by_patient(&records, search);
        if matching.is_empty() {
            println!("No clerking notes found.");
            return Ok(());
        }
        for record in matching {
            println!(
                "{:<8} {:<32} {:<28} {}",
                record.id,
                record.patient_name(),
                display_name(&record.specialty),
                record.created_at.strftime("%Y-%m-%d %H:%M"),
            );
        }
        Ok(())
    }

    async fn show(&self, id: &RecordId) -> Result<()> {
        let record = self.records().retrieve(id).await.map_err(api_error)?;
        print!("{}", render_record(&record)?);
        Ok(())
    }

    async fn create(&self, specialty: &str, values: Option<&Path>) -> Result<()> {
        known_fields(specialty)?;
        let mut session = FormSession::new();
        session.select_specialty(specialty);

        let mut prompt = terminal();
        let payload = fill(&mut session, values, &mut prompt)?;
        let records = self.records();
        let records = &records;
        let result = prompt
            .submit_with_retry(&mut session, payload, move |p| async move {
                records.create(&p.specialty, p.form_data).await
            })
            .await;
        let record = self.keep_draft(result, &session, &draft_name(specialty))?;

        info!(record_id = %record.id, "clerking note created");
        println!("Saved clerking note {} for {}", record.id, record.patient_name());
        Ok(())
    }

    async fn edit(&self, id: &RecordId, values: Option<&Path>) -> Result<()> {
        let records = self.records();
        let record = records.retrieve(id).await.map_err(api_error)?;
        let mut session = FormSession::for_record(&record);
        if session.fields().is_empty() {
            bail!(
                "note {id} was clerked under {:?}, which this version cannot edit",
                record.specialty
            );
        }

        let mut prompt = terminal();
        let payload = fill(&mut session, values, &mut prompt)?;
        let records = &records;
        let result = prompt
            .submit_with_retry(&mut session, payload, move |p| async move {
                records.update(id, p.form_data).await
            })
            .await;
        let record = self.keep_draft(result, &session, &format!("note-{id}"))?;

        println!("Updated clerking note {}", record.id);
        Ok(())
    }

    /// When the service did not take the note, save what was typed so it
    /// can be resubmitted with `--values`.
    fn keep_draft(
        &self,
        result: std::result::Result<ClerkingRecord, SubmitError<ApiError>>,
        session: &FormSession,
        name: &str,
    ) -> Result<ClerkingRecord> {
        let e = match result {
            Ok(record) => return Ok(record),
            Err(e @ SubmitError::Failed(_)) => e,
            Err(e) => return Err(submit_error(e)),
        };
        match write_draft(&self.config_dir, name, &session.snapshot()) {
            Ok(path) => eprintln!(
                "Your entries were kept in {0}. Resubmit with --values {0}",
                path.display()
            ),
            Err(err) => warn!(error = %err, "could not save form draft"),
        }
        Err(submit_error(e))
    }

    async fn delete(&self, id: &RecordId, yes: bool) -> Result<()> {
        if !yes && !terminal().confirm(&format!("Delete clerking note {id}?"))? {
            println!("Cancelled.");
            return Ok(());
        }
        self.records().delete(id).await.map_err(api_error)?;
        println!("Deleted clerking note {id}");
        Ok(())
    }

    async fn export(&self, id: &RecordId, out: Option<PathBuf>, template: Option<&Path>) -> Result<()> {
        let record = self.records().retrieve(id).await.map_err(api_error)?;
        let rendered = render(&record, template)?;
        let bytes = generate_docx(&rendered, &DocumentStyles::default())?;

        let out = out.unwrap_or_else(|| PathBuf::from(export_file_name(&record)));
        std::fs::write(&out, &bytes)
            .wrap_err_with(|| format!("failed to write {}", out.display()))?;
        println!("Exported clerking note {id} to {}", out.display());
        Ok(())
    }

    async fn suggest(&self, specialty: &str, field_key: &str, values: Option<&Path>) -> Result<()> {
        let fields = known_fields(specialty)?;
        let field = fields
            .iter()
            .find(|f| f.key == field_key)
            .ok_or_else(|| eyre!("{} has no field {field_key:?}", display_name(specialty)))?;
        if !field.ai_suggestions {
            bail!("{} does not support AI suggestions", field.label);
        }

        let mut session = FormSession::new();
        session.select_specialty(specialty);
        if let Some(path) = values {
            apply_values(&mut session, &read_values(path)?);
        }

        let suggester =
            GeminiSuggester::from_env(self.http.clone(), self.config.suggestion_model.clone())?;
        let augmenter = SuggestionAugmenter::new(suggester);
        augmenter.reset(specialty, fields);

        match augmenter.request_suggestions(field_key, &session.snapshot()).await {
            Some(questions) if !questions.is_empty() => {
                println!("Questions to improve {}:", field.label);
                for (i, q) in questions.iter().enumerate() {
                    println!("  {}. {q}", i + 1);
                }
            }
            _ => println!("No suggestions available."),
        }
        Ok(())
    }
}

/// Fill `session` from a values file, or interactively when none is given.
fn fill(
    session: &mut FormSession,
    values: Option<&Path>,
    prompt: &mut Terminal,
) -> Result<SubmissionPayload> {
    match values {
        Some(path) => {
            apply_values(session, &read_values(path)?);
            session.begin_submit().map_err(|e| match e {
                SubmitRejected::Invalid(errors) => field_report(&errors),
                other => eyre!(other),
            })
        }
        None => prompt.complete_form(session),
    }
}

/// Draft file stem for a new note: the specialty id plus the current time.
fn draft_name(specialty: &str) -> String {
    let stamp = jiff::Timestamp::now().strftime("%Y%m%dT%H%M%S");
    format!("{}-{stamp}", specialty.replace(' ', "-"))
}

fn render(record: &ClerkingRecord, template: Option<&Path>) -> Result<String> {
    let Some(path) = template else {
        return Ok(render_record(record)?);
    };
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read template {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    Ok(render_template(&name, &content, record)?)
}
