mod config;
mod differ;
mod display;
mod error;
mod grammar;
mod help;
mod i18n;
mod logging;
mod parser;
mod practice;
mod seed;
mod storage;
mod store_manager;
mod suggest;
mod synthesizer;
mod validator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, Write};
use tracing::{debug, info};

use config::Config;
use display::{lifecycle_guide, pad, pad_styled, progress_summary, state_badge};
use help::get_command_help;
use i18n::I18n;
use practice::Practice;
use storage::{ContainerStatus, TutorialStep};
use store_manager::StoreManager;
use suggest::TitleMatcher;

#[derive(Parser)]
#[command(name = "harbor", version)]
#[command(about = "Learn docker commands in a simulated harbor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and simulate one docker command
    Try {
        /// The command, e.g. docker run -d nginx (quote it if it has special characters)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
        /// Check the command against this tutorial step
        #[arg(long, short = 't')]
        tutorial: Option<u32>,
    },
    /// Interactive practice loop
    Shell {
        /// Start on this tutorial step
        #[arg(long, short = 't')]
        tutorial: Option<u32>,
    },
    /// Show usage for a docker verb
    Explain {
        action: String,
    },
    /// List tutorial steps
    Tutorials {
        /// Only steps in this section
        #[arg(long, short = 's')]
        section: Option<String>,
        /// Fuzzy search over titles
        #[arg(long, short = 'q')]
        search: Option<String>,
    },
    /// Show one tutorial step
    Show {
        id: u32,
    },
    /// Show learning progress
    Progress,
    /// Show the container lifecycle guide
    Lifecycle,
    /// Manage simulated containers
    Containers {
        #[command(subcommand)]
        action: ContainerAction,
    },
    /// Maintain the tutorial store
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum ContainerAction {
    /// List containers, newest first
    List,
    /// Create a container in the created state
    Create {
        name: String,
        image: String,
        /// Host:container port mapping, e.g. 8080:80
        #[arg(long, short = 'p')]
        port: Option<String>,
    },
    /// Change a container's state
    State {
        name: String,
        /// created, running, stopped or removing
        state: ContainerStatus,
    },
    /// Remove a container
    Remove {
        name: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Create the data directory and empty tables
    Init,
    /// Drop and recreate every table
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Load the bundled tutorials and sample containers
    Seed,
    /// Show table sizes
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new()?;
    logging::init_logging(&config.logging)?;

    if !config.display.color {
        colored::control::set_override(false);
    }

    let i18n = I18n::new(&config.get_effective_language());
    let store = StoreManager::new_with_config(&config, &i18n)?;
    debug!(data_dir = %store.base_dir().display(), "store opened");

    if config.storage.auto_seed && store.get_all_tutorials()?.is_empty() {
        let report = seed::seed_store(&store, seed::bundled().context(i18n.t("error_seed"))?)?;
        info!(?report, "seeded empty store");
    }

    let practice = Practice::new(&store, &i18n, config.display.show_metaphor);

    match cli.command {
        Commands::Try { command, tutorial } => {
            let input = command.join(" ");
            let step = match tutorial {
                Some(id) => Some(practice.load_tutorial(id)?),
                None => None,
            };
            let attempt = practice.attempt(&input, step.as_ref())?;
            print!("{}", practice.render(&attempt));
        }
        Commands::Shell { tutorial } => {
            practice.run_shell(tutorial)?;
        }
        Commands::Explain { action } => {
            let action = action.to_lowercase();
            println!("{}", get_command_help(&action));
            if let Some(verb) = grammar::Verb::from_name(&action) {
                println!("\n{}", i18n.t("sample_output").yellow());
                println!("{}", synthesizer::synthesize(verb, "nginx", &parser::Flags::default()));
            }
        }
        Commands::Tutorials { section, search } => {
            let tutorials = match &section {
                Some(s) => store.get_tutorials_by_section(s)?,
                None => store.get_all_tutorials()?,
            };
            if tutorials.is_empty() {
                match section {
                    Some(s) => {
                        println!("{}", i18n.t_format("section_not_found", &[&s]).yellow());
                        let sections = store.get_all_sections()?;
                        if !sections.is_empty() {
                            println!("{}", i18n.t_format("available_sections", &[&sections.join(", ")]));
                        }
                    }
                    None => println!("{}", i18n.t("no_tutorials").yellow()),
                }
                return Ok(());
            }

            match search {
                Some(query) => {
                    let matcher = TitleMatcher::new();
                    let items = tutorials.into_iter().map(|t| {
                        let title = t.title.clone();
                        (t, title)
                    });
                    let matches = matcher.match_and_sort(&query, items.collect());
                    if matches.is_empty() {
                        println!("{}", i18n.t_format("no_matches", &[&query]).yellow());
                        return Ok(());
                    }
                    let progress = store.get_user_progress()?;
                    print_tutorial_header(&i18n);
                    for (step, title, m) in matches {
                        let highlighted = matcher.highlight_matches(&title, &m.indices);
                        print_tutorial_row(&step, Some(highlighted), progress.get(&step.id), &i18n);
                    }
                }
                None => {
                    let progress = store.get_user_progress()?;
                    print_tutorial_header(&i18n);
                    for step in &tutorials {
                        print_tutorial_row(step, None, progress.get(&step.id), &i18n);
                    }
                }
            }
        }
        Commands::Show { id } => {
            let step = practice.load_tutorial(id)?;
            print_tutorial(&step, &store, &i18n, config.display.show_metaphor)?;
        }
        Commands::Lifecycle => {
            println!("{}", lifecycle_guide(&i18n));
        }
        Commands::Progress => {
            let total = store.get_all_tutorials()?.len();
            let progress = store.get_user_progress()?;
            let completed = progress.values().filter(|p| p.completed).count();
            let in_progress = progress
                .values()
                .filter(|p| !p.completed && p.attempts > 0)
                .count();

            let percent = store.get_progress_percentage()?;
            println!("{}", progress_summary(completed, total, percent, &i18n));
            if in_progress > 0 {
                println!("{}", i18n.t_format("progress_in_progress", &[&in_progress.to_string()]));
            }
            println!();
            for (section, count) in store.get_section_stats()? {
                let done = store
                    .get_tutorials_by_section(&section)?
                    .iter()
                    .filter(|t| progress.get(&t.id).is_some_and(|p| p.completed))
                    .count();
                println!("  {} {}/{}", pad(&section, 20), done, count);
            }
        }
        Commands::Containers { action } => match action {
            ContainerAction::List => {
                let containers = store.get_all_containers()?;
                if containers.is_empty() {
                    println!("{}", i18n.t("containers_empty").yellow());
                    return Ok(());
                }
                let running = containers.iter().filter(|c| c.is_running()).count();
                let stopped = containers.iter().filter(|c| c.is_stopped()).count();
                println!(
                    "{}",
                    i18n.t_format(
                        "containers_summary",
                        &[&containers.len().to_string(), &running.to_string(), &stopped.to_string()],
                    )
                    .bold()
                );
                for c in containers {
                    println!(
                        "{} {} {} {} {}",
                        pad(&c.container_name, 20).bold(),
                        pad(&c.image, 16),
                        pad(c.port_mapping.as_deref().unwrap_or("-"), 12),
                        c.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                        state_badge(c.state)
                    );
                }
            }
            ContainerAction::Create { name, image, port } => {
                match store.create_container(&name, &image, port.as_deref()) {
                    Ok(_) => println!("{}", i18n.t_format("container_created", &[&name, &image]).green()),
                    Err(error::StoreError::DuplicateContainer(_)) => {
                        println!("{}", i18n.t_format("container_exists", &[&name]).red())
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            ContainerAction::State { name, state } => match store.get_container_by_name(&name)? {
                Some(current) => {
                    store.update_container_state(&name, state)?;
                    println!(
                        "{}",
                        i18n.t_format("container_updated", &[&name, state.as_str(), current.state.as_str()])
                            .green()
                    );
                }
                None => println!("{}", i18n.t_format("container_missing", &[&name]).red()),
            },
            ContainerAction::Remove { name } => {
                if store.remove_container(&name)? {
                    println!("{}", i18n.t_format("container_removed", &[&name]).green());
                } else {
                    println!("{}", i18n.t_format("container_missing", &[&name]).red());
                }
            }
        },
        Commands::Db { action } => match action {
            DbAction::Init => {
                store.init()?;
                println!("{}", i18n.t_format("db_initialized", &[&store.base_dir().display().to_string()]).green());
            }
            DbAction::Reset { yes } => {
                if !yes && !confirm(&i18n)? {
                    println!("{}", i18n.t("reset_cancelled").yellow());
                    return Ok(());
                }
                store.reset()?;
                println!("{}", i18n.t("db_reset").green());
            }
            DbAction::Seed => {
                let report = seed::seed_store(&store, seed::bundled().context(i18n.t("error_seed"))?)?;
                println!(
                    "{}",
                    i18n.t_format(
                        "seed_report",
                        &[
                            &report.tutorials_added.to_string(),
                            &report.tutorials_skipped.to_string(),
                            &report.containers_added.to_string(),
                            &report.containers_skipped.to_string(),
                        ],
                    )
                    .green()
                );
            }
            DbAction::Info => {
                let info = store.info()?;
                println!("{}", i18n.t_format("db_info_path", &[&info.path.display().to_string()]));
                println!(
                    "{}",
                    i18n.t_format("db_info_size", &[&format!("{:.2}", info.size_bytes as f64 / 1024.0)])
                );
                for (table, rows) in &info.tables {
                    println!("  {}", i18n.t_format("db_info_table", &[table, &rows.to_string()]));
                }
            }
        },
    }

    Ok(())
}

fn print_tutorial_header(i18n: &I18n) {
    println!(
        "{} {} {} {} {}",
        pad(&i18n.t("col_id"), 4).bold(),
        pad(&i18n.t("col_section"), 16).bold(),
        pad(&i18n.t("col_step"), 5).bold(),
        pad(&i18n.t("col_title"), 44).bold(),
        i18n.t("col_status").bold()
    );
}

fn print_tutorial_row(
    step: &TutorialStep,
    highlighted: Option<String>,
    progress: Option<&storage::UserProgress>,
    i18n: &I18n,
) {
    let status = match progress {
        Some(p) if p.completed => i18n.t("status_done").green().to_string(),
        Some(p) if p.attempts > 0 => i18n
            .t_format("status_attempts", &[&p.attempts.to_string()])
            .yellow()
            .to_string(),
        _ => String::new(),
    };
    let title = match highlighted {
        Some(h) => pad_styled(&step.title, &h, 44),
        None => pad(&step.title, 44),
    };
    println!(
        "{} {} {} {} {}",
        pad(&step.id.to_string(), 4),
        pad(&step.section, 16),
        pad(&step.step_number.to_string(), 5),
        title,
        status
    );
}

fn print_tutorial(step: &TutorialStep, store: &StoreManager, i18n: &I18n, show_metaphor: bool) -> Result<()> {
    println!("{}", format!("#{} {}", step.id, step.title).bold().cyan());
    println!(
        "{}",
        i18n.t_format("label_section", &[&step.section, &step.step_number.to_string()])
            .dimmed()
    );
    println!();
    println!("{}", step.description.trim());

    if let Some(concept) = &step.docker_concept {
        println!("\n{}: {}", i18n.t("label_concept").yellow().bold(), concept);
    }
    if show_metaphor {
        if let Some(metaphor) = &step.metaphor_explanation {
            println!("{}: {}", i18n.t("label_metaphor").yellow().bold(), metaphor);
        }
    }
    if let Some(tip) = &step.help_text {
        println!("{}: {}", i18n.t("label_tip").yellow().bold(), tip);
    }
    if let Some(expected) = &step.expected_command {
        println!("\n{}: {}", i18n.t("label_expected").green().bold(), expected.bold());
        if let Some(verb) = expected.split_whitespace().nth(1) {
            println!("\n{}", i18n.t("label_reference").bold());
            println!("{}", get_command_help(verb));
        }
    }

    println!();
    if let Some(prev) = store.get_previous_tutorial(step.id)? {
        println!("{}: #{} {}", i18n.t("label_previous").dimmed(), prev.id, prev.title);
    }
    if let Some(next) = store.get_next_tutorial(step.id)? {
        println!("{}: #{} {}", i18n.t("label_next").dimmed(), next.id, next.title);
    }
    Ok(())
}

fn confirm(i18n: &I18n) -> Result<bool> {
    print!("{}", i18n.t("confirm_reset").yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return Ok(false);
    }
    Ok(input.trim().eq_ignore_ascii_case("yes"))
}
