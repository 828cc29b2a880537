use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use roleready::app::App;
use roleready::config::Config;
use roleready::preferences::{PreferenceStore, Theme};
use roleready::proxy::{self, Dispatcher, GeminiModelClient};
use roleready::samples;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "roleready")]
#[command(about = "Align a resume with a job description")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the resume against the job description.
    Analyze(InputArgs),
    /// Analyze, then rewrite the resume for the job description.
    Rewrite(InputArgs),
    /// Suggest other job titles that fit the resume.
    FindJobs(InputArgs),
    /// Draft an elevator pitch for the role.
    Pitch(InputArgs),
    /// Draft LinkedIn headlines and an About section.
    Linkedin(InputArgs),
    /// Run the reference backend proxy.
    Serve {
        /// Listen address; overrides ROLEREADY_BIND.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Show or change the stored color theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// List the bundled sample inputs.
    Samples,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Job description text file.
    #[arg(long, value_name = "FILE")]
    job: Option<PathBuf>,
    /// Resume text file.
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,
    /// Use a random bundled sample instead of files.
    #[arg(long, conflicts_with_all = ["job", "resume"])]
    example: bool,
    /// Agree to the Terms of Service (required for analysis).
    #[arg(long)]
    accept_terms: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum ThemeAction {
    Show,
    Light,
    Dark,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roleready=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match run(args.command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Analyze(inputs) => {
            let app = App::new(config);
            load_inputs(&app, &inputs)?;
            let analysis = app.analyze().await?;
            info!(
                "Score {} ({:?}), {} critical keyword gap(s)",
                analysis.score,
                analysis.score_band(),
                analysis.critical_keyword_gaps().count()
            );
            print_json(&analysis)
        }
        Command::Rewrite(inputs) => {
            let app = App::new(config);
            load_inputs(&app, &inputs)?;
            app.analyze().await?;
            println!("{}", app.rewrite().await?);
            Ok(())
        }
        Command::FindJobs(inputs) => {
            let app = App::new(config);
            load_inputs(&app, &inputs)?;
            print_json(&app.find_jobs().await?)
        }
        Command::Pitch(inputs) => {
            let app = App::new(config);
            load_inputs(&app, &inputs)?;
            println!("{}", app.generate_pitch().await?);
            Ok(())
        }
        Command::Linkedin(inputs) => {
            let app = App::new(config);
            load_inputs(&app, &inputs)?;
            print_json(&app.generate_linkedin().await?)
        }
        Command::Serve { bind } => {
            let api_key = config.require_gemini_key()?;
            let model = GeminiModelClient::new(api_key.to_string(), config.gemini_model.clone());
            info!("Model provider: Gemini (model: {})", model.model());

            let addr = bind.unwrap_or(config.bind);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            proxy::serve(listener, Dispatcher::new(Arc::new(model)), &config.proxy_path).await?;
            Ok(())
        }
        Command::Theme { action } => {
            let store = PreferenceStore::new(&config.preferences_path);
            let theme = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => store.theme(),
                ThemeAction::Light => {
                    store.set_theme(Theme::Light)?;
                    Theme::Light
                }
                ThemeAction::Dark => {
                    store.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
                ThemeAction::Toggle => store.toggle_theme()?,
            };
            println!("{}", theme);
            Ok(())
        }
        Command::Samples => {
            for sample in samples::bundled()? {
                println!("{}", sample.name);
            }
            Ok(())
        }
    }
}

fn load_inputs(app: &App, inputs: &InputArgs) -> Result<()> {
    if inputs.example {
        let sample = app.load_sample()?;
        info!("Using bundled sample: {}", sample.name);
        return Ok(());
    }

    if let Some(path) = &inputs.job {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading job description {}", path.display()))?;
        app.set_job_description(text);
    }
    if let Some(path) = &inputs.resume {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading resume {}", path.display()))?;
        app.set_resume(text);
    }
    app.set_terms_accepted(inputs.accept_terms);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, Command, ThemeAction};
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_files() {
        let args = CliArgs::try_parse_from([
            "roleready",
            "analyze",
            "--job",
            "jd.txt",
            "--resume",
            "cv.txt",
            "--accept-terms",
        ])
        .unwrap();
        match args.command {
            Command::Analyze(inputs) => {
                assert_eq!(inputs.job.unwrap().to_str(), Some("jd.txt"));
                assert!(inputs.accept_terms);
                assert!(!inputs.example);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_example_conflicts_with_files() {
        assert!(CliArgs::try_parse_from(["roleready", "pitch", "--example", "--job", "jd.txt"])
            .is_err());
    }

    #[test]
    fn test_parse_theme_toggle() {
        let args = CliArgs::try_parse_from(["roleready", "theme", "toggle"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Theme {
                action: Some(ThemeAction::Toggle)
            }
        ));
    }
}
