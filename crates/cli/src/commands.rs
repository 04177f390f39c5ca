//! Subcommand definitions and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use notesnap_client::{ApiError, ClientConfig, NotesnapApi};
use notesnap_core::capture::PermissionState;
use notesnap_core::emoji::emoji_for_class;
use notesnap_core::note::{format_uploaded_at, newest_first};
use notesnap_core::profile::{LoginRequest, ProfileUpdate, SignupRequest};
use notesnap_core::session::Session;
use notesnap_workflow::{CaptureController, CourseCache, FileCamera, ScanAttempt, UploadError};

/// Collapse transport failures into the short connectivity message.
trait Friendly<T> {
    fn friendly(self) -> anyhow::Result<T>;
}

impl<T> Friendly<T> for Result<T, ApiError> {
    fn friendly(self) -> anyhow::Result<T> {
        self.map_err(|e| anyhow::anyhow!(e.display_message()))
    }
}

#[derive(Parser)]
#[command(name = "notesnap", about = "Snap handwritten notes into class PDFs")]
pub struct Cli {
    /// Account email (or NOTESNAP_EMAIL).
    #[arg(long, global = true, env = "NOTESNAP_EMAIL")]
    pub email: Option<String>,

    /// Account password (or NOTESNAP_PASSWORD).
    #[arg(long, global = true, env = "NOTESNAP_PASSWORD")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account.
    Signup {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Phone number.
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in and show the account profile.
    Login,
    /// Show the profile, or update it when flags are given.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List the classes you belong to.
    Classes,
    /// Search classes by name.
    Search { query: String },
    /// Join a class.
    Join { class_id: String },
    /// List the notes of a class, newest first.
    Notes { class_id: String },
    /// Capture a photo and upload it to a class as a PDF.
    Scan {
        /// Image file standing in for the camera.
        image: PathBuf,
        /// Target class id.
        #[arg(long = "class")]
        class_id: String,
    },
    /// Summarize a converted PDF.
    Summarize { pdf: PathBuf },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let api = Arc::new(NotesnapApi::new(ClientConfig::from_env()));

    match &cli.command {
        Command::Signup { name, phone } => {
            let (email, password) = credentials(&cli)?;
            let profile = api
                .signup(&SignupRequest {
                    email,
                    password,
                    name: name.clone(),
                    phone: phone.clone(),
                })
                .await
                .friendly()?;
            let session = Session::establish(profile);
            println!("Account created for {}", session.email);
            Ok(())
        }

        Command::Login => {
            let session = sign_in(&api, &cli).await?;
            println!("Signed in as {} <{}>", session.name, session.email);
            Ok(())
        }

        Command::Profile { name, phone } => {
            let mut session = sign_in(&api, &cli).await?;
            if name.is_none() && phone.is_none() {
                let profile = api.get_profile(&session.email).await.friendly()?;
                println!("email: {}", profile.email);
                println!("name:  {}", profile.name.unwrap_or_default());
                println!("phone: {}", profile.phone.unwrap_or_default());
            } else {
                api.update_profile(
                    &session.email,
                    &ProfileUpdate {
                        name: name.clone(),
                        phone: phone.clone(),
                    },
                )
                .await
                .friendly()?;
                session.apply_update(name.clone(), phone.clone());
                println!("Profile updated.");
            }
            Ok(())
        }

        Command::Classes => {
            let session = sign_in(&api, &cli).await?;
            let cache = CourseCache::new(api.clone(), session.acting_user_id());
            let classes = cache.classes().await.friendly()?;
            if classes.is_empty() {
                println!("No classes yet. Try `notesnap search`.");
            }
            for class in classes {
                let members = class.users.as_ref().map_or(0, Vec::len);
                println!(
                    "{} {}  [{}]  {} member(s)",
                    emoji_for_class(&class.name),
                    class.name,
                    class.id,
                    members
                );
            }
            Ok(())
        }

        Command::Search { query } => {
            let results = api.search_classes(&query).await.friendly()?;
            if results.is_empty() {
                println!("No classes match \"{query}\".");
            }
            for class in results {
                println!(
                    "{} {}  [{}]",
                    emoji_for_class(&class.name),
                    class.name,
                    class.id
                );
            }
            Ok(())
        }

        Command::Join { class_id } => {
            let session = sign_in(&api, &cli).await?;
            let cache = CourseCache::new(api.clone(), session.acting_user_id());
            cache.join(&class_id).await.friendly()?;
            println!("Joined class {class_id}.");
            Ok(())
        }

        Command::Notes { class_id } => {
            let notes = newest_first(api.list_notes(&class_id).await.friendly()?);
            if notes.is_empty() {
                println!("No notes yet. Upload one with `notesnap scan`.");
            }
            for note in notes {
                let when = note
                    .uploaded_at
                    .as_deref()
                    .map(format_uploaded_at)
                    .unwrap_or_default();
                println!("📄 {}  by {}  {}", note.pdf_url, note.uploaded_by, when);
                if let Some(summary) = note.summary {
                    println!("   {summary}");
                }
            }
            Ok(())
        }

        Command::Scan { image, class_id } => {
            let session = sign_in(&api, &cli).await?;
            scan(api, session, image.clone(), class_id.clone()).await
        }

        Command::Summarize { pdf } => {
            let bytes = std::fs::read(&pdf)
                .with_context(|| format!("cannot read {}", pdf.display()))?;
            let filename = pdf
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "notes.pdf".to_string());
            let summary = api.summarize_pdf(&filename, bytes).await.friendly()?;
            println!("{summary}");
            Ok(())
        }
    }
}

/// Capture -> select course -> upload -> track -> resolve.
async fn scan(
    api: Arc<NotesnapApi>,
    session: Session,
    image: PathBuf,
    class_id: String,
) -> anyhow::Result<()> {
    let mut controller = CaptureController::new(Arc::new(FileCamera::new(image)));
    // Launching us with a file argument is the terminal's permission grant.
    controller.set_permission(PermissionState::Granted);
    let captured = controller.capture().await?;

    let cache = CourseCache::new(api.clone(), session.acting_user_id());
    let Some(course) = cache.find(&class_id).await.friendly()? else {
        bail!("class {class_id} not found among your classes (join it first?)");
    };
    let course_name = course.name.clone();

    let mut attempt = ScanAttempt::new(api, session.acting_user_id());
    attempt.capture(captured);
    attempt.select_course(course)?;

    let mut progress = attempt.progress();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let percent = *progress.borrow_and_update();
            eprint!("\rUploading to {course_name}... {percent:3}%");
            if percent >= 100 {
                break;
            }
        }
    });

    let outcome = attempt.upload().await;
    printer.abort();
    eprintln!();

    let result = match outcome {
        Ok(result) => result,
        Err(UploadError::Api(api)) => bail!(api.display_message()),
        Err(other) => return Err(other.into()),
    };
    println!("✅ Upload Complete");
    println!("Open PDF: {}", result.pdf_url);
    Ok(())
}

/// Sign in with the global credentials, establishing the session.
async fn sign_in(api: &NotesnapApi, cli: &Cli) -> anyhow::Result<Session> {
    let (email, password) = credentials(cli)?;
    let profile = api
        .login(&LoginRequest { email, password })
        .await
        .map_err(|e| anyhow::anyhow!(e.display_message()))?;
    Ok(Session::establish(profile))
}

fn credentials(cli: &Cli) -> anyhow::Result<(String, String)> {
    let email = cli
        .email
        .clone()
        .context("email required (--email or NOTESNAP_EMAIL)")?;
    let password = cli
        .password
        .clone()
        .context("password required (--password or NOTESNAP_PASSWORD)")?;
    Ok((email, password))
}
