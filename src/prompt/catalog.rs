//! Static reference text keyed by content type or content goal.
//!
//! Best practices and content guidelines are two independent catalogs; both
//! end up in the prompt and are never merged. Content types outside the
//! known set get an empty block from both.

use crate::profile::{ContentGoal, ContentType};

const LINKEDIN_BEST_PRACTICES: &str = "\
- Open with a hook in the first two lines; only those show before \"see more\".
- Keep paragraphs to one or two sentences and leave white space between them.
- Write in the first person and share a concrete point of view.
- Use at most three relevant hashtags, placed at the end.
- Avoid external links in the post body; they reduce reach.
- End with a question or clear prompt that invites comments.";

const NEWSLETTER_BEST_PRACTICES: &str = "\
- Lead with the single most valuable insight for the reader.
- Use descriptive subheadings so the issue can be skimmed.
- Keep one main idea per section and support it with an example.
- Write like a note to one reader, not an announcement to a list.
- Close with one clear next step rather than several competing links.";

const MARKETING_BEST_PRACTICES: &str = "\
- Lead with the customer's problem, not the product.
- Translate every feature into a concrete benefit.
- Use specific numbers, outcomes and social proof where available.
- Keep sentences short and scannable; cut filler words.
- Use one primary call to action and repeat it consistently.";

const LINKEDIN_GUIDELINES: &str = "\
- Length: 150 to 300 words (under 3,000 characters).
- Structure: hook, story or insight, takeaway, engagement question.
- Format as plain text; no markdown headings or bold syntax.";

const NEWSLETTER_GUIDELINES: &str = "\
- Length: 500 to 1,000 words.
- Structure: subject line, preview text, opening, two to four sections, sign-off.
- Suggest a subject line under 50 characters at the top.";

const MARKETING_GUIDELINES: &str = "\
- Length: 100 to 400 words unless the idea specifies a format.
- Structure: headline, subheadline, benefit-led body, call to action.
- Offer two headline variations before the body copy.";

const LINKEDIN_TASK: &str = "Write a LinkedIn post based on the content idea above. \
Follow the writing style, best practices and guidelines provided. \
Return only the post text, ready to publish.";

const NEWSLETTER_TASK: &str = "Write a newsletter based on the content idea above. \
Follow the writing style, best practices and guidelines provided. \
Return only the newsletter, starting with the subject line.";

const MARKETING_TASK: &str = "Write marketing copy based on the content idea above. \
Follow the writing style, best practices and guidelines provided. \
Return only the copy, ready to use.";

const GENERAL_TASK: &str = "Write the content based on the content idea above. \
Follow the writing style and instructions provided. \
Return only the finished content.";

const AUDIENCE_BUILDING_GUIDANCE: &str = "This content should grow reach and attract new followers. \
Favour broadly relatable insights, strong hooks and shareable takeaways over product mentions.";

const LEAD_GENERATION_GUIDANCE: &str = "This content should generate leads. \
Surface a specific problem the audience has, show credibility in solving it, \
and give readers a low-friction reason to get in touch or download something.";

const NURTURING_GUIDANCE: &str = "This content should nurture an existing audience. \
Build trust through practical value, behind-the-scenes detail and consistency; avoid hard selling.";

const CONVERSION_GUIDANCE: &str = "This content should convert readers into customers. \
Address objections directly, use proof and outcomes, and make the next step explicit and easy.";

const RETENTION_GUIDANCE: &str = "This content should keep existing customers engaged. \
Reinforce the value they already get, share tips for getting more from it, and make them feel part of a community.";

/// Platform best-practice guidance for a content type. Empty for unknown types.
pub fn best_practices(content_type: &ContentType) -> &'static str {
    match content_type {
        ContentType::Linkedin => LINKEDIN_BEST_PRACTICES,
        ContentType::Newsletter => NEWSLETTER_BEST_PRACTICES,
        ContentType::Marketing => MARKETING_BEST_PRACTICES,
        ContentType::Other(_) => "",
    }
}

/// Length and structure targets for a content type. Empty for unknown types.
pub fn content_guidelines(content_type: &ContentType) -> &'static str {
    match content_type {
        ContentType::Linkedin => LINKEDIN_GUIDELINES,
        ContentType::Newsletter => NEWSLETTER_GUIDELINES,
        ContentType::Marketing => MARKETING_GUIDELINES,
        ContentType::Other(_) => "",
    }
}

/// Final instruction line for a content type.
pub fn task_instruction(content_type: &ContentType) -> &'static str {
    match content_type {
        ContentType::Linkedin => LINKEDIN_TASK,
        ContentType::Newsletter => NEWSLETTER_TASK,
        ContentType::Marketing => MARKETING_TASK,
        ContentType::Other(_) => GENERAL_TASK,
    }
}

/// Guidance paragraph for a recognised goal; `None` for unrecognised goals.
pub fn goal_guidance(goal: &ContentGoal) -> Option<&'static str> {
    match goal {
        ContentGoal::AudienceBuilding => Some(AUDIENCE_BUILDING_GUIDANCE),
        ContentGoal::LeadGeneration => Some(LEAD_GENERATION_GUIDANCE),
        ContentGoal::Nurturing => Some(NURTURING_GUIDANCE),
        ContentGoal::Conversion => Some(CONVERSION_GUIDANCE),
        ContentGoal::Retention => Some(RETENTION_GUIDANCE),
        ContentGoal::Other(_) => None,
    }
}
