use crate::i18n::I18n;
use colored::*;
use similar::{ChangeTag, TextDiff};

/// One word-level change between the expected command and what was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordChange {
    pub tag: ChangeTag,
    pub text: String,
}

pub struct Differ;

impl Differ {
    /// Word diff of two commands. Whitespace runs are collapsed first so a
    /// stray double space doesn't show up as a change.
    pub fn diff_words(expected: &str, typed: &str) -> Vec<WordChange> {
        let expected = normalize(expected);
        let typed = normalize(typed);
        let diff = TextDiff::from_words(&expected, &typed);

        diff.iter_all_changes()
            .filter(|change| !change.value().trim().is_empty())
            .map(|change| WordChange {
                tag: change.tag(),
                text: change.value().to_string(),
            })
            .collect()
    }

    /// Render the word diff as `-missing +extra` tokens, untouched words plain.
    pub fn diff_commands(expected: &str, typed: &str, i18n: &I18n) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", i18n.t("diff_label").yellow().bold()));
        output.push_str(&format!("  {} {}\n", "-".red(), expected.trim().red()));
        output.push_str(&format!("  {} {}\n", "+".green(), typed.trim().green()));

        let tokens: Vec<String> = Self::diff_words(expected, typed)
            .into_iter()
            .map(|change| match change.tag {
                ChangeTag::Delete => format!("{}{}", "-".red(), change.text.red().strikethrough()),
                ChangeTag::Insert => format!("{}{}", "+".green(), change.text.green().bold()),
                ChangeTag::Equal => change.text,
            })
            .collect();
        output.push_str(&format!("  {}\n", tokens.join(" ")));

        output
    }
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}
