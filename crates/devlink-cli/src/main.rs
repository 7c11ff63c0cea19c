//! `devlink`: command-line client for the devlink API.
//!
//! # Usage
//!
//! ```
//! devlink --url http://localhost:5000 login --email ada@example.com --password s3cret
//! export DEVLINK_TOKEN=<token>
//! devlink posts list
//! devlink --config ~/.config/devlink/config.toml profile show
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "devlink", about = "Command-line client for the devlink API")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the devlink server (default: http://localhost:5000).
  #[arg(long, env = "DEVLINK_URL")]
  url: Option<String>,

  /// Token returned by `register` or `login`.
  #[arg(long, env = "DEVLINK_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and print its token.
  Register {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: String,
  },
  /// Log in and print a token.
  Login {
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: String,
  },
  /// Show the account the token belongs to.
  Whoami,
  #[command(subcommand)]
  Profile(ProfileCmd),
  #[command(subcommand)]
  Experience(ExperienceCmd),
  #[command(subcommand)]
  Education(EducationCmd),
  #[command(subcommand)]
  Posts(PostsCmd),
}

#[derive(Subcommand, Debug)]
enum ProfileCmd {
  /// Show your profile, or another user's with `--user`.
  Show {
    #[arg(long)]
    user: Option<Uuid>,
  },
  /// Create or update your profile.
  Set(ProfileArgs),
  /// Delete your account, profile and posts.
  Delete,
}

#[derive(ClapArgs, Debug)]
struct ProfileArgs {
  #[arg(long)]
  status:    String,
  /// Comma-separated list.
  #[arg(long)]
  skills:    String,
  #[arg(long)]
  company:   Option<String>,
  #[arg(long)]
  website:   Option<String>,
  #[arg(long)]
  location:  Option<String>,
  #[arg(long)]
  bio:       Option<String>,
  #[arg(long)]
  github:    Option<String>,
  #[arg(long)]
  youtube:   Option<String>,
  #[arg(long)]
  twitter:   Option<String>,
  #[arg(long)]
  facebook:  Option<String>,
  #[arg(long)]
  linkedin:  Option<String>,
  #[arg(long)]
  instagram: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ExperienceCmd {
  Add {
    #[arg(long)]
    title:       String,
    #[arg(long)]
    company:     String,
    /// YYYY-MM-DD
    #[arg(long)]
    from:        String,
    #[arg(long)]
    to:          Option<String>,
    #[arg(long)]
    current:     bool,
    #[arg(long)]
    location:    Option<String>,
    #[arg(long)]
    description: Option<String>,
  },
  Remove { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum EducationCmd {
  Add {
    #[arg(long)]
    school:         String,
    #[arg(long)]
    degree:         String,
    #[arg(long)]
    field_of_study: String,
    /// YYYY-MM-DD
    #[arg(long)]
    from:           String,
    #[arg(long)]
    to:             Option<String>,
    #[arg(long)]
    current:        bool,
    #[arg(long)]
    description:    Option<String>,
  },
  Remove { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum PostsCmd {
  /// The feed, newest first.
  List,
  Create { text: String },
  Delete { id: Uuid },
  Like { id: Uuid },
  Unlike { id: Uuid },
  Comment { id: Uuid, text: String },
  Uncomment { id: Uuid, comment_id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

/// Flags and environment override the config file, which overrides defaults.
fn resolve(url: Option<String>, token: Option<String>, file: ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url: url
      .or_else(|| (!file.url.is_empty()).then_some(file.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    token:    token.or_else(|| (!file.token.is_empty()).then_some(file.token)),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = resolve(args.url, args.token, file_cfg);
  tracing::debug!(url = %api_config.base_url, "using server");
  let client = ApiClient::new(api_config)?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Register { name, email, password } => {
      println!("{}", client.register(&name, &email, &password).await?);
    }
    Command::Login { email, password } => {
      println!("{}", client.login(&email, &password).await?);
    }
    Command::Whoami => print!("{}", render::user(&client.whoami().await?)),

    Command::Profile(cmd) => match cmd {
      ProfileCmd::Show { user: None } => {
        print!("{}", render::profile_view(&client.my_profile().await?));
      }
      ProfileCmd::Show { user: Some(id) } => {
        print!("{}", render::profile_view(&client.profile_of(id).await?));
      }
      ProfileCmd::Set(a) => {
        let body = json!({
          "status": a.status,
          "skills": a.skills,
          "company": a.company,
          "website": a.website,
          "location": a.location,
          "bio": a.bio,
          "githubusername": a.github,
          "youtube": a.youtube,
          "twitter": a.twitter,
          "facebook": a.facebook,
          "linkedin": a.linkedin,
          "instagram": a.instagram,
        });
        print!("{}", render::profile(&client.upsert_profile(&body).await?));
      }
      ProfileCmd::Delete => {
        client.delete_account().await?;
        println!("account deleted");
      }
    },

    Command::Experience(cmd) => {
      let profile = match cmd {
        ExperienceCmd::Add { title, company, from, to, current, location, description } => {
          let body = json!({
            "title": title,
            "company": company,
            "from": from,
            "to": to,
            "current": current,
            "location": location,
            "description": description,
          });
          client.add_experience(&body).await?
        }
        ExperienceCmd::Remove { id } => client.remove_experience(id).await?,
      };
      print!("{}", render::profile(&profile));
    }

    Command::Education(cmd) => {
      let profile = match cmd {
        EducationCmd::Add { school, degree, field_of_study, from, to, current, description } => {
          let body = json!({
            "school": school,
            "degree": degree,
            "fieldofstudy": field_of_study,
            "from": from,
            "to": to,
            "current": current,
            "description": description,
          });
          client.add_education(&body).await?
        }
        EducationCmd::Remove { id } => client.remove_education(id).await?,
      };
      print!("{}", render::profile(&profile));
    }

    Command::Posts(cmd) => match cmd {
      PostsCmd::List => {
        for p in client.list_posts().await? {
          print!("{}", render::post(&p));
        }
      }
      PostsCmd::Create { text } => print!("{}", render::post(&client.create_post(&text).await?)),
      PostsCmd::Delete { id } => {
        client.delete_post(id).await?;
        println!("post removed");
      }
      PostsCmd::Like { id } => println!("{} like(s)", client.like(id).await?.len()),
      PostsCmd::Unlike { id } => println!("{} like(s)", client.unlike(id).await?.len()),
      PostsCmd::Comment { id, text } => {
        for c in client.comment(id, &text).await? {
          print!("{}", render::comment(&c));
        }
      }
      PostsCmd::Uncomment { id, comment_id } => {
        for c in client.uncomment(id, comment_id).await? {
          print!("{}", render::comment(&c));
        }
      }
    },
  }
  Ok(())
}
