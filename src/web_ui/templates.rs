//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embedded so the binary needs no template directory at runtime
    if let Err(e) = tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("macros.html", MACROS_TEMPLATE),
        ("dialog.html", DIALOG_TEMPLATE),
        ("console.html", CONSOLE_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ]) {
        tracing::error!("Failed to load templates: {:?}", e);
    }

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Dapp Console{% endblock %}</title>
    <style>
        :root {
            --bg: #ffffff;
            --foreground: #0f111a;
            --muted: #636779;
            --border: #e6e7ea;
            --accent: #ff0420;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--foreground);
            line-height: 1.5;
        }
        .container { max-width: 960px; margin: 0 auto; padding: 48px 24px; }
        h1 { font-size: 28px; font-weight: 600; margin-bottom: 32px; }
        .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 16px; }
        .dialog { border: 1px solid var(--border); border-radius: 12px; padding: 24px; }
        .badge { display: inline-block; font-size: 12px; padding: 2px 10px; border-radius: 999px; background: #f1f2f4; }
        .py-6 { padding: 24px 0; }
        .dialog h3 { font-size: 18px; font-weight: 600; margin-bottom: 8px; }
        .muted { font-size: 14px; color: var(--muted); }
        .actions { display: flex; flex-direction: column; gap: 10px; }
        .button {
            display: block; text-align: center; font: inherit; font-size: 14px;
            padding: 10px 16px; border-radius: 8px; border: 1px solid var(--border);
            background: var(--bg); color: var(--foreground); text-decoration: none; cursor: pointer;
        }
        .button.primary { background: var(--foreground); color: var(--bg); border-color: var(--foreground); }
    </style>
</head>
<body>
    <main class="container">
        {% block content %}{% endblock %}
    </main>
</body>
</html>
"##;

const MACROS_TEMPLATE: &str = r##"{% macro render_button(button, primary, login_url) %}
{%- if button.action.kind == "sign_in" -%}
<a class="button{% if primary %} primary{% endif %}" href="{{ login_url | safe }}" data-action="sign-in">{{ button.label }}</a>
{%- elif button.action.kind == "link" -%}
<a class="button{% if primary %} primary{% endif %}" href="{{ button.action.href | safe }}"{% if button.action.external %} target="_blank" rel="noopener noreferrer"{% endif %}>{{ button.label }}</a>
{%- else -%}
<button type="button" class="button{% if primary %} primary{% endif %}" data-action="close">{{ button.label }}</button>
{%- endif -%}
{% endmacro render_button %}

{% macro render_dialog(slug, content, login_url) %}
<div class="dialog" data-dialog="{{ slug }}">
    <span class="badge"><p>{{ content.label }}</p></span>
    <div class="py-6">
        <h3>{{ content.title }}</h3>
        <p class="muted">{{ content.description }}</p>
    </div>
    <div class="actions">
        {{ self::render_button(button=content.primary_button, primary=true, login_url=login_url) }}
        {% if content.secondary_button %}{{ self::render_button(button=content.secondary_button, primary=false, login_url=login_url) }}{% endif %}
    </div>
</div>
{% endmacro render_dialog %}
"##;

const DIALOG_TEMPLATE: &str = r##"{% import "macros.html" as ui %}{{ ui::render_dialog(slug=slug, content=dialog, login_url=login_url) }}"##;

const CONSOLE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% import "macros.html" as ui %}
{% block title %}Console - Dapp Console{% endblock %}
{% block content %}
<h1>Build with the console</h1>
<div class="grid">
{% for entry in dialogs %}
    {{ ui::render_dialog(slug=entry.slug, content=entry.dialog, login_url=login_url) }}
{% endfor %}
</div>
{% endblock %}
"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error - Dapp Console{% endblock %}
{% block content %}
<h1>Something went wrong</h1>
<p class="muted">{{ message }}</p>
{% endblock %}
"##;
