//! Toy text transforms operating on arguments or the replied-to message.

use std::time::Duration;

use ferrite_common::html::Html;
use ferrite_proc_macro::command;
use rand::Rng;

use super::arguments::RestOrReply;
use super::errors::CommandError;
use super::{Category, CommandCtxt};

/// Pause between simulated keystrokes.
const TYPE_DELAY: Duration = Duration::from_millis(120);

fn mock_case(text: &str, rng: &mut impl Rng) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if rng.gen_bool(0.5) {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Maps printable ASCII onto the fullwidth block and spaces onto
/// ideographic spaces.
fn vaporize(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '!'..='~' => char::from_u32(ch as u32 - 0x21 + 0xFF01).unwrap_or(ch),
            ' ' => '\u{3000}',
            other => other,
        })
        .collect()
}

#[command(
    name = "type",
    description = "type the text out keystroke by keystroke",
    usage = "[text or reply]",
    examples = ["hello there"]
)]
pub async fn typewriter(ctxt: CommandCtxt<'_>, text: RestOrReply) -> Result<(), CommandError> {
    let RestOrReply(text) = text;

    for (index, ch) in text.char_indices() {
        let typed = &text[..index + ch.len_utf8()];
        ctxt.reply(format!("{}▒", typed.escaped())).await?;
        tokio::time::sleep(TYPE_DELAY).await;
    }
    ctxt.reply(text.escaped()).await?;
    Ok(())
}

#[command(
    description = "randomly recase the text, mocking-style",
    usage = "[text or reply]",
    examples = ["you cannot be serious"]
)]
pub async fn mock(ctxt: CommandCtxt<'_>, text: RestOrReply) -> Result<(), CommandError> {
    let RestOrReply(text) = text;
    let mocked = mock_case(&text, &mut rand::thread_rng());
    ctxt.reply(mocked.escaped()).await?;
    Ok(())
}

#[command(
    description = "render the text in fullwidth aesthetic letters",
    usage = "[text or reply]",
    examples = ["vibes"]
)]
pub async fn vapor(ctxt: CommandCtxt<'_>, text: RestOrReply) -> Result<(), CommandError> {
    let RestOrReply(text) = text;
    ctxt.reply(vaporize(&text).escaped()).await?;
    Ok(())
}

#[command(description = "reverse the text", usage = "[text or reply]", examples = ["racecar"])]
pub async fn reverse(ctxt: CommandCtxt<'_>, text: RestOrReply) -> Result<(), CommandError> {
    let RestOrReply(text) = text;
    let reversed: String = text.chars().rev().collect();
    ctxt.reply(reversed.escaped()).await?;
    Ok(())
}

crate::declare_module!(
    name: "text",
    category: Category::Fun,
    commands: [typewriter_command, mock_command, vapor_command, reverse_command]
);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::command::{Command, CommandData};
    use crate::testutil::{RecordingApi, group_message, test_ferrite};

    async fn run_with_text(api: &Arc<RecordingApi>, command: &dyn Command, text: &str, args: &str) {
        let ferrite = test_ferrite(api.clone()).await;
        let message = group_message(text);
        let data = CommandData {
            ferrite: &ferrite,
            message: &message,
            calling_prefix: ".",
        };
        command.execute(CommandCtxt::new(&data, args)).await.unwrap();
    }

    #[test]
    fn vapor_maps_ascii_to_fullwidth() {
        assert_eq!(vaporize("Hello"), "Ｈｅｌｌｏ");
        assert_eq!(vaporize("A B"), "Ａ\u{3000}Ｂ");
        // non-ascii passes through untouched
        assert_eq!(vaporize("año"), "ａñｏ");
    }

    #[test]
    fn mock_case_changes_only_case() {
        let original = "Can you believe it?! Absolutely wild.";
        let mut rng = StdRng::seed_from_u64(7);
        let mocked = mock_case(original, &mut rng);

        assert_eq!(mocked.to_lowercase(), original.to_lowercase());
        assert_eq!(
            mocked.matches(|ch: char| !ch.is_alphabetic()).count(),
            original.matches(|ch: char| !ch.is_alphabetic()).count()
        );

        // same seed, same output
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(mock_case(original, &mut rng), mocked);
    }

    #[tokio::test]
    async fn reverse_reverses_characters() {
        let api = Arc::new(RecordingApi::new());
        run_with_text(&api, &reverse_command, ".reverse abc def", "abc def").await;
        assert_eq!(api.renders().pop().unwrap(), "fed cba");
    }

    #[tokio::test(start_paused = true)]
    async fn typewriter_renders_each_keystroke() {
        let api = Arc::new(RecordingApi::new());
        run_with_text(&api, &typewriter_command, ".type hi.", "hi.").await;

        let renders = api.renders();
        assert_eq!(renders, vec![
            "h▒".to_owned(),
            "hi▒".to_owned(),
            "hi.▒".to_owned(),
            "hi.".to_owned(),
        ]);
    }

    #[tokio::test]
    async fn transforms_escape_markup() {
        let api = Arc::new(RecordingApi::new());
        run_with_text(&api, &reverse_command, ".reverse <b>", "<b>").await;
        assert_eq!(api.renders().pop().unwrap(), "&gt;b&lt;");
    }
}
