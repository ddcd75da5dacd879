//! Prompt templates.
//!
//! Placeholders are written `{name}` and filled by [`render`].

/// Seed page of an event list.
pub const EVENT_LIST_START: &str = "\
You are researching local events between {start_date} and {finish_date}.

Below is a web page listing events, converted to markdown. Extract every event \
that takes place in that window. For each event give its title, a short \
description, when it happens, where it happens, the price if stated, the \
audience age groups, and the link to the event's own page if there is one. \
Use the link exactly as it appears on the page.

Also list any other links on the page that lead to more events, such as \
later pages of the calendar.

Page:
{page}
";

/// An event's own page, used to correct and complete one record.
pub const EVENT_LIST_UPDATE: &str = "\
You are researching local events between {start_date} and {finish_date}.

Here is what is known about one event, as JSON:
{event}

Below is the event's own web page, converted to markdown. Update the event \
using the page. Fix anything the page contradicts and fill in anything that \
is missing. Keep the link unchanged.

Page:
{page}
";

/// A single page that lists events with no per-event pages.
pub const FLAT_EVENTS: &str = "\
Today is {today}. You are researching local events between {start_date} and \
{finish_date}. Dates without a year are in {year}.

Below is the web page {link}, converted to markdown. Extract every event that \
takes place in that window. For each event give its title, a short \
description, when it happens, where it happens, the price if stated, the \
audience age groups, and a link to more details if there is one.

Page:
{page}
";

/// Episode script from the merged dataset.
pub const SCRIPT_WRITER: &str = "\
You write the script for a short daily video bulletin about local events. \
Today is {date}.

Choose the {num_events} most interesting events from the dataset below that \
are happening soon. Prefer a mix of organizations and audiences. Do not repeat \
events featured in the recent scripts unless something about them changed.

Write a friendly opening that greets viewers, one story per event, and a \
closing that says goodbye. Each story is two or three spoken sentences. For \
each story also describe a background image without people or text, and the \
mood of the background music. Copy the title, when, where, link and \
organization from the dataset.

Events (JSON):
{events}

Recent scripts (JSON):
{recent_scripts}
";

/// Background image for one story.
pub const BACKGROUND: &str = "\
A photorealistic background image for a news presenter. No people and no text. \
{background_description}
";

/// Social media post from the script.
pub const SOCIAL_POST: &str = "\
Write a social media post announcing today's local events video. Today is \
{date}. Mention each event briefly with its date and place, in the order of \
the script below. Keep it friendly and under 200 words. Do not use hashtags \
other than #AroundTown.

Script (JSON):
{script}
";

/// Fills `{key}` placeholders in `template`.
///
/// Values are inserted verbatim and never re-scanned, so a value containing
/// braces is safe.
///
/// # Examples
///
/// ```
/// use bulletin_pipeline::prompts::render;
///
/// assert_eq!(render("Hi {name}!", &[("name", "Ada")]), "Hi Ada!");
/// ```
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_with_braces_are_not_rescanned() {
        let out = render("{event} / {page}", &[("event", "{\"page\":1}"), ("page", "P")]);
        assert_eq!(out, "{\"page\":1} / P");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(render("{a} {b}", &[("a", "1")]), "1 {b}");
    }

    #[test]
    fn test_templates_have_expected_placeholders() {
        let out = render(
            EVENT_LIST_START,
            &[
                ("start_date", "10/16/2026"),
                ("finish_date", "11/16/2026"),
                ("page", "PAGE"),
            ],
        );
        assert!(out.contains("between 10/16/2026 and 11/16/2026"));
        assert!(out.ends_with("PAGE\n"));
        assert!(!out.contains('{'));
    }
}
