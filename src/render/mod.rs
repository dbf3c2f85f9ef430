mod email;
mod present;

pub use email::{email_body, mailto_href};
pub use present::{BrowserTabPresenter, FilePresenter, Presenter};

use std::fmt::Write;

use crate::api::{EnrichedItem, EnrichedList};

pub const DOCUMENT_TITLE: &str = "Your Coles Shopping Lists";

const FONT_STYLESHEET: &str =
    "https://fonts.googleapis.com/css2?family=Roboto:wght@400;700&display=swap";

const STYLE: &str = r#"
    body { font-family: 'Roboto', sans-serif; margin: 0; padding: 20px; background-color: #f4f6f8; color: #333; }
    h1 { text-align: center; color: #e01b23; margin-bottom: 40px; }
    .list { background-color: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1); margin-bottom: 30px; padding: 20px; }
    .list h2 { color: #e01b23; margin-bottom: 10px; position: relative; padding-bottom: 10px; }
    .list h2::after { content: ''; position: absolute; left: 0; bottom: 0; width: 50px; height: 3px; background-color: #e01b23; border-radius: 2px; }
    .items { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; }
    .item-card { background-color: #f9f9f9; border-radius: 6px; padding: 15px; box-shadow: 0 1px 4px rgba(0, 0, 0, 0.1); display: flex; flex-direction: column; justify-content: space-between; transition: transform 0.2s, box-shadow 0.2s; }
    .item-card:hover { transform: translateY(-5px); background-color: #f0e0e3; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); }
    .item-name a { color: #000; text-decoration: none; font-weight: bold; }
    .item-name a:hover { text-decoration: underline; }
    .item-details { font-size: 14px; margin-bottom: 5px; color: #555; }
    .price { font-size: 16px; font-weight: 600; color: #28a745; margin-top: 10px; }
    .price.unavailable { color: #b00020; }
    .export-buttons { display: flex; justify-content: center; gap: 20px; margin-top: 30px; }
    .export-buttons button, .export-buttons a { padding: 10px 7px; font-size: 14px; border: none; border-radius: 6px; cursor: pointer; text-decoration: none; color: #fff; display: flex; align-items: center; gap: 8px; }
    .export-buttons button:hover, .export-buttons a:hover { transform: translateY(-3px); opacity: 0.9; }
    .print-btn { background-color: #28a745; }
    .email-btn { background-color: #17a2b8; }
    @media print { .export-buttons { display: none; } }
    @media (max-width: 600px) {
        .export-buttons { flex-direction: column; gap: 10px; }
        .items { grid-template-columns: 1fr; }
    }
"#;

/// Settings that shape the rendered document
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix for product links; the product id is appended
    pub product_url_base: String,
    pub email_subject: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            product_url_base: "https://www.coles.com.au/product".to_string(),
            email_subject: "My Coles Shopping Lists".to_string(),
        }
    }
}

/// Escape text for use in HTML content and double- or single-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the standalone export document
pub fn render_document(lists: &[EnrichedList], options: &RenderOptions) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link href="{font}" rel="stylesheet">
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
"#,
        title = DOCUMENT_TITLE,
        font = FONT_STYLESHEET,
        style = STYLE,
    );

    for list in lists {
        render_list(&mut html, list, options);
    }

    let mailto = mailto_href(&options.email_subject, &email_body(lists));
    let _ = write!(
        html,
        r#"<div class="export-buttons">
<button class="print-btn" onclick="window.print()">🖨️ Print / Save as PDF</button>
<a href="{}" class="email-btn">📧 Send via Email</a>
</div>
</body>
</html>
"#,
        escape_html(&mailto)
    );

    html
}

fn render_list(html: &mut String, list: &EnrichedList, options: &RenderOptions) {
    let _ = write!(
        html,
        "<div class=\"list\">\n<h2>{}</h2>\n<div class=\"items\">\n",
        escape_html(&list.list_name)
    );

    for item in &list.items {
        render_item(html, item, options);
    }

    html.push_str("</div>\n</div>\n");
}

fn render_item(html: &mut String, item: &EnrichedItem, options: &RenderOptions) {
    let product_url = format!(
        "{}/{}",
        options.product_url_base.trim_end_matches('/'),
        item.product_id
    );

    let (price_class, price_text) = if item.has_numeric_price() {
        ("price", format!("Price: ${}", item.current_price))
    } else {
        ("price unavailable", format!("Price: {}", item.current_price))
    };

    let _ = write!(
        html,
        r#"<div class="item-card">
<div>
<div class="item-name"><a href="{url}" target="_blank">{name}</a></div>
<div class="item-details">Product ID: {id}</div>
<div class="item-details">Quantity: {quantity}</div>
</div>
<div class="{price_class}">{price}</div>
</div>
"#,
        url = escape_html(&product_url),
        name = escape_html(&item.product_name),
        id = escape_html(&item.product_id),
        quantity = escape_html(&item.quantity_display()),
        price_class = price_class,
        price = escape_html(&price_text),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PRICE_ERROR_MARKER, PRICE_MISSING_MARKER};

    fn item(id: &str, name: &str, price: &str) -> EnrichedItem {
        EnrichedItem {
            product_id: id.to_string(),
            product_name: name.to_string(),
            quantity: 2.0,
            current_price: price.to_string(),
        }
    }

    fn list(name: &str, items: Vec<EnrichedItem>) -> EnrichedList {
        EnrichedList {
            list_id: "L1".to_string(),
            list_name: name.to_string(),
            items,
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn list_name_with_script_is_escaped() {
        let name = r#"<script>alert("x & y")</script>"#;
        let html = render_document(&[list(name, vec![])], &RenderOptions::default());

        assert!(!html.contains("<script>"));
        assert!(!html.contains(name));
        assert!(html.contains(
            "<h2>&lt;script&gt;alert(&quot;x &amp; y&quot;)&lt;/script&gt;</h2>"
        ));
    }

    #[test]
    fn item_fields_are_escaped() {
        let html = render_document(
            &[list("Weekly", vec![item("1\"2", "Fish & <Chips>", "3.50")])],
            &RenderOptions::default(),
        );

        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(html.contains("Product ID: 1&quot;2"));
        assert!(html.contains("href=\"https://www.coles.com.au/product/1&quot;2\""));
    }

    #[test]
    fn cards_show_quantity_link_and_price() {
        let html = render_document(
            &[list("Weekly", vec![item("5551234", "Milk 2L", "3.10")])],
            &RenderOptions::default(),
        );

        assert!(html.contains("<title>Your Coles Shopping Lists</title>"));
        assert!(html.contains("https://www.coles.com.au/product/5551234"));
        assert!(html.contains("Quantity: 2"));
        assert!(html.contains("Price: $3.10"));
        assert!(html.contains("onclick=\"window.print()\""));
        assert!(html.contains("href=\"mailto:?subject=My%20Coles%20Shopping%20Lists&amp;body="));
    }

    #[test]
    fn price_markers_are_not_shown_as_dollars() {
        let html = render_document(
            &[list(
                "Weekly",
                vec![
                    item("1", "Eggs", PRICE_ERROR_MARKER),
                    item("2", "Salt", PRICE_MISSING_MARKER),
                ],
            )],
            &RenderOptions::default(),
        );

        assert!(html.contains("Price: Error fetching price"));
        assert!(html.contains("Price: N/A"));
        assert!(!html.contains("$Error"));
        assert!(!html.contains("$N/A"));
        assert_eq!(html.matches("price unavailable").count(), 2);
    }

    #[test]
    fn custom_product_base_is_used() {
        let options = RenderOptions {
            product_url_base: "http://shop.test/p/".to_string(),
            ..RenderOptions::default()
        };
        let html = render_document(&[list("L", vec![item("9", "Tea", "1")])], &options);

        assert!(html.contains("href=\"http://shop.test/p/9\""));
    }
}
