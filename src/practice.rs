use crate::differ::Differ;
use crate::display::command_visual;
use crate::help::get_command_help;
use crate::i18n::I18n;
use crate::parser::{parse_command, parse_command_bytes, CommandResult};
use crate::storage::TutorialStep;
use crate::store_manager::StoreManager;
use crate::validator::validate_against_expected;
use anyhow::{Context, Result};
use colored::*;
use std::io::{self, BufRead, Write};
use std::sync::Once;
use tracing::{debug, info};

/// What a practice attempt meant for the tutorial being worked on.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed { next: Option<TutorialStep> },
    WrongCommand { expected: String },
    Rejected,
    ReadingOnly,
}

#[derive(Debug, Clone)]
pub struct Attempt {
    pub result: CommandResult,
    pub outcome: Option<StepOutcome>,
}

pub struct Practice<'a> {
    store: &'a StoreManager,
    i18n: &'a I18n,
    show_metaphor: bool,
}

impl<'a> Practice<'a> {
    pub fn new(store: &'a StoreManager, i18n: &'a I18n, show_metaphor: bool) -> Self {
        Self {
            store,
            i18n,
            show_metaphor,
        }
    }

    /// Parse `input` and, when a tutorial is active, record the attempt
    /// and check it against the step's practice command.
    pub fn attempt(&self, input: &str, tutorial: Option<&TutorialStep>) -> Result<Attempt> {
        let result = parse_command(input);
        let Some(step) = tutorial else {
            return Ok(Attempt {
                result,
                outcome: None,
            });
        };

        self.store
            .increment_tutorial_attempts(step.id)
            .context(self.i18n.t("error_record_attempt"))?;

        let outcome = match &step.expected_command {
            None => StepOutcome::ReadingOnly,
            Some(expected) if validate_against_expected(input, expected) => {
                self.store.mark_tutorial_complete(step.id)?;
                info!(tutorial = step.id, "tutorial step completed");
                StepOutcome::Completed {
                    next: self.store.get_next_tutorial(step.id)?,
                }
            }
            Some(expected) if result.valid => StepOutcome::WrongCommand {
                expected: expected.clone(),
            },
            Some(_) => StepOutcome::Rejected,
        };
        debug!(tutorial = step.id, ?outcome, "attempt recorded");

        Ok(Attempt {
            result,
            outcome: Some(outcome),
        })
    }

    pub fn render(&self, attempt: &Attempt) -> String {
        let result = &attempt.result;
        let mut out = String::new();

        if result.valid {
            out.push_str(&format!("{}\n", result.message.green().bold()));
        } else {
            out.push_str(&format!("{}\n", result.message.red().bold()));
        }

        if self.show_metaphor {
            if let Some(metaphor) = &result.metaphor_explanation {
                out.push_str(&format!("{}\n", metaphor.cyan()));
            }
        }

        if !result.flags.is_empty() {
            let flags: Vec<String> = result
                .flags
                .entries()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            out.push_str(&format!("{} {}\n", self.i18n.t("flags_label").dimmed(), flags.join(" ")));
        }

        if let Some(visual) = result.action.and_then(|verb| command_visual(verb, &result.target)) {
            out.push_str(&format!("{}\n", visual.blue()));
        }

        if !result.output.is_empty() {
            out.push_str(&format!("{}\n", self.i18n.t("output_label").yellow()));
            out.push_str(&result.output);
            out.push('\n');
        }

        if let Some(hint) = &result.help_hint {
            out.push_str(&format!("{} {}\n", self.i18n.t("hint_label").yellow(), hint));
        }

        match &attempt.outcome {
            Some(StepOutcome::Completed { next }) => {
                out.push_str(&format!("\n{}\n", self.i18n.t("step_complete").green().bold()));
                match next {
                    Some(step) => out.push_str(&format!(
                        "{}\n",
                        self.i18n.t_format("next_step", &[&step.id.to_string(), &step.title])
                    )),
                    None => out.push_str(&format!("{}\n", self.i18n.t("last_step"))),
                }
            }
            Some(StepOutcome::WrongCommand { expected }) => {
                out.push_str(&format!("\n{}\n", self.i18n.t_format("try_expected", &[expected]).yellow()));
                out.push_str(&Differ::diff_commands(expected, &result.command, self.i18n));
            }
            Some(StepOutcome::ReadingOnly) => {
                out.push_str(&format!("\n{}\n", self.i18n.t("no_expected_command").dimmed()));
            }
            Some(StepOutcome::Rejected) | None => {}
        }

        out
    }

    /// Line-oriented practice loop. Stops on `exit`, end of input or Ctrl-C.
    /// A completed step moves the session on to the next one.
    pub fn run_shell(&self, tutorial_id: Option<u32>) -> Result<()> {
        static INIT_CTRL_C: Once = Once::new();
        INIT_CTRL_C.call_once(|| {
            let _ = ctrlc::set_handler(move || {
                println!();
                let _ = io::stdout().flush();
                std::process::exit(130);
            });
        });

        let mut current = match tutorial_id {
            Some(id) => Some(self.load_tutorial(id)?),
            None => None,
        };

        println!("{}", self.i18n.t("shell_banner").cyan());
        let stdin = io::stdin();
        let mut buf = Vec::new();

        loop {
            if let Some(step) = &current {
                println!(
                    "{}",
                    self.i18n
                        .t_format("shell_tutorial", &[&step.id.to_string(), &step.title])
                        .dimmed()
                );
            }
            print!("{} ", "⚓>".blue().bold());
            io::stdout().flush()?;

            buf.clear();
            let read = stdin
                .lock()
                .read_until(b'\n', &mut buf)
                .context(self.i18n.t("error_read_input"))?;
            if read == 0 {
                break;
            }
            let Ok(line) = std::str::from_utf8(&buf) else {
                let attempt = Attempt {
                    result: parse_command_bytes(&buf),
                    outcome: None,
                };
                print!("{}", self.render(&attempt));
                continue;
            };
            let input = line.trim();

            if input.is_empty() {
                continue;
            }
            if input == "exit" || input == "quit" {
                break;
            }
            if let Some(verb) = input.strip_prefix("help") {
                let verb = verb.trim();
                if verb.is_empty() {
                    println!("{}", crate::grammar::supported_verbs());
                } else {
                    println!("{}", get_command_help(verb));
                }
                continue;
            }

            let attempt = self.attempt(input, current.as_ref())?;
            print!("{}", self.render(&attempt));
            if let Some(StepOutcome::Completed { next }) = attempt.outcome {
                current = next;
            }
        }

        println!("{}", self.i18n.t("shell_goodbye"));
        Ok(())
    }

    pub fn load_tutorial(&self, id: u32) -> Result<TutorialStep> {
        self.store
            .get_tutorial_by_id(id)?
            .with_context(|| self.i18n.t_format("error_tutorial_not_found", &[&id.to_string()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{bundled, seed_store};
    use tempfile::TempDir;

    fn seeded() -> (TempDir, StoreManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreManager::open(dir.path()).unwrap();
        seed_store(&store, bundled().unwrap()).unwrap();
        (dir, store)
    }

    fn step_with_command(store: &StoreManager) -> TutorialStep {
        store
            .get_all_tutorials()
            .unwrap()
            .into_iter()
            .find(|t| t.expected_command.is_some())
            .unwrap()
    }

    #[test]
    fn free_practice_records_nothing() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, true);

        let attempt = practice.attempt("docker ps", None).unwrap();
        assert!(attempt.result.valid);
        assert!(attempt.outcome.is_none());
        assert!(store.get_user_progress().unwrap().is_empty());
    }

    #[test]
    fn matching_command_completes_the_step() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, true);
        let step = step_with_command(&store);
        let expected = step.expected_command.clone().unwrap();

        let attempt = practice.attempt(&expected, Some(&step)).unwrap();
        match attempt.outcome {
            Some(StepOutcome::Completed { next }) => {
                assert_eq!(next, store.get_next_tutorial(step.id).unwrap());
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let progress = &store.get_user_progress().unwrap()[&step.id];
        assert!(progress.completed);
        assert!(progress.timestamp.is_some());
    }

    #[test]
    fn wrong_but_valid_command_shows_expected() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, false);
        let step = step_with_command(&store);

        let attempt = practice.attempt("docker images", Some(&step)).unwrap();
        let expected = step.expected_command.clone().unwrap();
        assert_eq!(attempt.outcome, Some(StepOutcome::WrongCommand { expected }));

        let rendered = practice.render(&attempt);
        assert!(rendered.contains("this step expects"));
        assert!(rendered.contains("Expected vs yours:"));

        let progress = &store.get_user_progress().unwrap()[&step.id];
        assert!(!progress.completed);
        assert_eq!(progress.attempts, 1);
    }

    #[test]
    fn rejected_input_still_counts_as_an_attempt() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, true);
        let step = step_with_command(&store);

        let attempt = practice.attempt("ls -la", Some(&step)).unwrap();
        assert_eq!(attempt.outcome, Some(StepOutcome::Rejected));
        assert!(practice.render(&attempt).contains("Hint"));
        assert_eq!(store.get_user_progress().unwrap()[&step.id].attempts, 1);
    }

    #[test]
    fn reading_steps_have_nothing_to_check() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, true);
        let step = store
            .get_all_tutorials()
            .unwrap()
            .into_iter()
            .find(|t| t.expected_command.is_none())
            .unwrap();

        let attempt = practice.attempt("docker ps", Some(&step)).unwrap();
        assert_eq!(attempt.outcome, Some(StepOutcome::ReadingOnly));
    }

    #[test]
    fn metaphor_is_optional_in_rendering() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let attempt = Practice::new(&store, &i18n, true).attempt("docker ps", None).unwrap();
        let metaphor = attempt.result.metaphor_explanation.clone().unwrap();

        assert!(Practice::new(&store, &i18n, true).render(&attempt).contains(&metaphor));
        assert!(!Practice::new(&store, &i18n, false).render(&attempt).contains(&metaphor));
    }

    #[test]
    fn accepted_commands_get_a_harbor_sketch() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let practice = Practice::new(&store, &i18n, true);

        let run = practice.attempt("docker run nginx", None).unwrap();
        let rendered = practice.render(&run);
        assert!(rendered.contains("RUN Action: nginx"));
        assert!(rendered.contains("A new ship is launched into the harbor!"));

        let rejected = practice.attempt("docker sail nginx", None).unwrap();
        assert!(!practice.render(&rejected).contains("Action"));
    }

    #[test]
    fn unknown_tutorial_is_an_error() {
        let (_dir, store) = seeded();
        let i18n = I18n::new("en");
        let err = Practice::new(&store, &i18n, true).load_tutorial(999).unwrap_err();
        assert_eq!(err.to_string(), "Tutorial 999 not found");
    }
}
