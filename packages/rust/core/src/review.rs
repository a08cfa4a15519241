//! Critique of a finished part. The output is shown to the operator and
//! never merged into the document.

use scribe_generation::{GenerationClient, GenerationOutcome, TextGenerator};
use tracing::{info, instrument};

use crate::brief::Brief;
use crate::context::tail_chars;
use crate::profile::Profile;

/// Prompt body for reviewing the last `window` characters of `part_content`.
pub fn review_prompt(profile: Profile, brief: &Brief, part_content: &str, window: usize) -> String {
    let excerpt = tail_chars(part_content, window);
    match profile {
        Profile::WebsiteCopy => format!(
            "{}\n\nCOPY WRITTEN SO FAR (latest excerpt):\n{excerpt}\n\n\
             Follow your Senior Copy Editor instructions strictly. Suggest ways to increase \
             persuasion and clarity.",
            profile.brief_block(brief)
        ),
        Profile::Manual => format!(
            "Review the following work-in-progress document. Follow your Senior Editor \
             instructions strictly.\n\nDOCUMENT UNDER REVIEW:\n{excerpt}"
        ),
    }
}

#[instrument(skip_all, fields(%profile, content_len = part_content.len()))]
pub async fn review<G: TextGenerator>(
    client: &GenerationClient<G>,
    profile: Profile,
    brief: &Brief,
    part_content: &str,
    window: usize,
) -> GenerationOutcome {
    info!("reviewing part");
    let prompt = review_prompt(profile, brief, part_content, window);
    client.generate(&prompt, profile.review_persona()).await
}
