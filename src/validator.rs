use crate::parser::parse_command;
use tracing::debug;

/// Does `user_input` do what a tutorial step's `expected` command asks for?
///
/// Both must parse, the verbs must agree, and when the expected command names
/// a target the learner's target must equal it exactly. Flags are ignored.
pub fn validate_against_expected(user_input: &str, expected: &str) -> bool {
    let user = parse_command(user_input);
    let reference = parse_command(expected);

    if !user.valid || !reference.valid {
        return false;
    }

    if user.action != reference.action {
        debug!(user = user.action_name(), expected = reference.action_name(), "verb mismatch");
        return false;
    }

    if !reference.target.is_empty() && user.target != reference.target {
        debug!(user = %user.target, expected = %reference.target, "target mismatch");
        return false;
    }

    true
}
