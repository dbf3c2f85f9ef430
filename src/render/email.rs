use std::fmt::Write;

use crate::api::EnrichedList;

/// Plain-text rendering of the export, one line per item
pub fn email_body(lists: &[EnrichedList]) -> String {
    let mut body = String::from("Here are my Coles shopping lists:\n\n");

    for list in lists {
        let _ = writeln!(body, "Shopping List: {}", list.list_name);
        for item in &list.items {
            let _ = writeln!(
                body,
                "- {} x {} (ID: {}) - Price: {} AUD",
                item.quantity_display(),
                item.product_name,
                item.product_id,
                item.current_price
            );
        }
        body.push('\n');
    }

    body
}

/// `mailto:` link with a pre-filled subject and body
pub fn mailto_href(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}
