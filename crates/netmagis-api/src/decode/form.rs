// Edit-form scraping
//
// Reads the values `/mod?action=edit` pre-fills: every named `<input>`
// and the selected `<option>` of every `<select>`.

use indexmap::IndexMap;
use scraper::{ElementRef, Html};

use super::Decoder;
use crate::model::HostForm;

/// Inputs that drive the form rather than carry record data.
const CONTROL_INPUTS: [&str; 3] = ["", "action", "confirm"];

/// Checkbox reported as `"1"`/`"0"` rather than by its `value`.
const SMTP_INPUT: &str = "sendsmtp";

/// Select that falls back to `"0"` when no option is marked selected.
const DHCP_PROFILE_SELECT: &str = "iddhcpprof";

pub(super) fn scrape(decoder: &Decoder, doc: &Html) -> HostForm {
    let mut fields = IndexMap::new();

    for input in doc.select(&decoder.input) {
        let el = input.value();
        let name = el.attr("name").unwrap_or_default();
        if CONTROL_INPUTS.contains(&name) {
            continue;
        }
        let value = if name == SMTP_INPUT {
            if el.attr("checked").is_some() { "1" } else { "0" }
        } else {
            el.attr("value").unwrap_or_default()
        };
        fields.insert(name.to_owned(), value.to_owned());
    }

    for select in doc.select(&decoder.select) {
        let Some(name) = select.value().attr("name") else {
            continue;
        };
        match selected_option(decoder, select) {
            Some(value) => {
                fields.insert(name.to_owned(), value);
            }
            None if name == DHCP_PROFILE_SELECT => {
                fields.insert(name.to_owned(), "0".to_owned());
            }
            None => {}
        }
    }

    HostForm { fields }
}

/// Value of the option carrying `selected`, scoped to this select.
fn selected_option(decoder: &Decoder, select: ElementRef<'_>) -> Option<String> {
    select
        .select(&decoder.option)
        .find(|o| o.value().attr("selected").is_some())
        .map(|o| match o.value().attr("value") {
            Some(v) => v.to_owned(),
            None => o.text().collect::<String>().trim().to_owned(),
        })
}
