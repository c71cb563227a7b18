//! Command forwarding, §4.7: unhandled local commands go to the biller as
//! `?command` text, and a configured secret prefix rewrites local/staff
//! chat into a billing-routed form.

/// Whether an unhandled command (a `DefaultCommand` event the local server
/// did not recognize) should be forwarded as `?command`.
pub fn should_forward_command(player_known_to_biller: bool, chat_type_restricted: bool) -> bool {
    player_known_to_biller && !chat_type_restricted
}

pub fn format_command(command_text: &str) -> String {
    format!("?{}", command_text)
}

/// §4.7 "`?chat=` path": rewrites a local/staff chat line with the
/// configured secret prefix, or passes it through unchanged if the prefix
/// is empty (feature disabled) or doesn't match.
pub fn rewrite_staff_chat<'a>(line: &'a str, secret_prefix: &str) -> &'a str {
    if secret_prefix.is_empty() {
        return line;
    }
    line.strip_prefix(secret_prefix).unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_commands_are_never_forwarded() {
        assert!(!should_forward_command(false, false));
    }

    #[test]
    fn restricted_chat_type_blocks_forwarding_even_for_known_players() {
        assert!(!should_forward_command(true, true));
    }

    #[test]
    fn known_unrestricted_player_forwards() {
        assert!(should_forward_command(true, false));
    }

    #[test]
    fn command_text_gets_the_question_mark_prefix() {
        assert_eq!(format_command("setfreq 2"), "?setfreq 2");
    }

    #[test]
    fn staff_chat_rewrite_strips_the_configured_prefix() {
        assert_eq!(rewrite_staff_chat("!!hello staff", "!!"), "hello staff");
        assert_eq!(rewrite_staff_chat("hello staff", ""), "hello staff");
    }
}
