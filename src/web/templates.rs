use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::api::User;

const SITE_NAME: &str = "Certificate Desk";
const TIMESTAMP_FORMAT: &str = "%d %b %Y, %H:%M";

const PAGE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .header-bar h1 { margin: 0; font-size: 1.6rem; }
        .header-actions { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
        .header-actions span { color: #475569; font-size: 0.95rem; }
        .nav-link { display: inline-flex; align-items: center; color: #1d4ed8; text-decoration: none; font-weight: 600; background: #e0f2fe; padding: 0.45rem 0.9rem; border-radius: 999px; border: 1px solid #bfdbfe; }
        .nav-link:hover { background: #bfdbfe; border-color: #93c5fd; }
        .logout-form button { padding: 0.45rem 1rem; border-radius: 999px; }
        main { padding: 2rem 1.5rem; max-width: 1040px; margin: 0 auto; box-sizing: border-box; }
        section { margin-bottom: 2.5rem; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .panel h2 { margin-top: 0; }
        label { display: block; margin: 0.75rem 0 0.4rem; font-weight: 600; color: #0f172a; }
        input[type="text"], input[type="email"], input[type="password"] { width: 100%; padding: 0.75rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; box-sizing: border-box; }
        input:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.12); }
        button { padding: 0.7rem 1.1rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; transition: background 0.15s ease; }
        button:hover { background: #1d4ed8; }
        .form-actions { margin-top: 1.25rem; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        table { width: 100%; border-collapse: collapse; margin-top: 1rem; background: #ffffff; }
        th, td { padding: 0.65rem 0.85rem; border: 1px solid #e2e8f0; text-align: left; font-size: 0.92rem; vertical-align: top; }
        th { background: #f1f5f9; }
        .status-badge { display: inline-block; padding: 0.2rem 0.65rem; border-radius: 999px; font-size: 0.8rem; font-weight: 600; background: #e2e8f0; color: #334155; }
        .status-pending { background: #fef3c7; color: #92400e; }
        .status-verified { background: #dcfce7; color: #166534; }
        .status-rejected { background: #fee2e2; color: #991b1b; }
        .action-buttons { display: flex; gap: 0.4rem; flex-wrap: wrap; align-items: center; }
        .inline-form { display: inline; margin: 0; }
        .btn-approve { background: #16a34a; }
        .btn-approve:hover { background: #15803d; }
        .btn-reject { background: #dc2626; }
        .btn-reject:hover { background: #b91c1c; }
        .btn-view { color: #1d4ed8; font-weight: 600; }
        .status-text { font-weight: 600; color: #475569; }
        .empty-state, .muted { color: #64748b; }
        .detail-panel dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.4rem 1rem; }
        .detail-panel dt { font-weight: 600; }
        .detail-panel dd { margin: 0; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            main { padding: 1.5rem 1rem; }
            .header-bar { flex-direction: column; align-items: flex-start; }
            table { font-size: 0.85rem; }
        }
"#;

pub struct NavLink<'a> {
    pub href: &'a str,
    pub label: &'a str,
}

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub page_heading: &'a str,
    pub user: Option<&'a User>,
    pub nav_links: Vec<NavLink<'a>>,
    pub flash_html: Cow<'a, str>,
    pub body_html: Cow<'a, str>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        page_heading,
        user,
        nav_links,
        flash_html,
        body_html,
    } = layout;

    let nav_html = nav_links
        .iter()
        .map(|link| {
            format!(
                r#"<a class="nav-link" href="{href}">{label}</a>"#,
                href = link.href,
                label = escape_html(link.label),
            )
        })
        .collect::<String>();

    let account_html = match user {
        Some(user) => format!(
            r#"<span>Signed in as <strong>{name}</strong> ({role})</span>
                <form class="logout-form" method="post" action="/logout"><button type="submit">Log out</button></form>"#,
            name = escape_html(display_name(user)),
            role = user.role.as_str(),
        ),
        None => String::new(),
    };

    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title} · {site}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>{page_heading}</h1>
            <div class="header-actions">
                {nav_html}
                {account_html}
            </div>
        </div>
    </header>
    <main>
        {flash_html}
{body_html}
        {footer}
    </main>
</body>
</html>"#,
        meta_title = escape_html(meta_title),
        site = SITE_NAME,
        styles = PAGE_BASE_STYLES,
        page_heading = escape_html(page_heading),
    )
}

fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} {site}</footer>"#,
        year = current_year,
        site = SITE_NAME,
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn display_name(user: &User) -> &str {
    if user.name.trim().is_empty() {
        &user.email
    } else {
        &user.name
    }
}

/// Render a backend timestamp; values that do not parse are shown as sent.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return "—".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(TIMESTAMP_FORMAT).to_string();
    }

    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}
