//! Single-page dashboard served at `/`.
//!
//! - `html.rs`: layout with the menu, argument form and page area
//! - `css.rs`: styling with CSS custom properties
//! - `js.rs`: API calls, widget rendering and inline SVG charts

mod css;
mod html;
mod js;

/// Complete dashboard page with styles and script inlined.
pub fn dashboard_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>stockdash</title>
    <style>
{css}
    </style>
</head>
<body>
{html}
    <script>
{js}
    </script>
</body>
</html>"#,
        css = css::STYLES,
        html = html::TEMPLATE,
        js = js::SCRIPT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_inlines_every_part() {
        let page = dashboard_html();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("id=\"menu\""));
        assert!(page.contains("--bg:"));
        assert!(page.contains("/api/views/"));
    }
}
