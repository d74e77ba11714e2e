//! Template engine for rendering folder pages.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use minijinja::value::Value;
use minijinja::{context, AutoEscape, Environment, ErrorKind, Output, State};
use serde::Deserialize;

use crate::assets::{AssetPipeline, BASE_STYLESHEET, DEFAULT_THEME, THEMES, THEMES_DIR};
use crate::slug::Page;
use crate::timestamp::format_timestamp;

/// Page layout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Lists with an embedded stylesheet
    #[default]
    Classic,
    /// Tile grid with external theme stylesheets and a theme selector
    Tiles,
}

impl Layout {
    fn template(self) -> &'static str {
        match self {
            Self::Classic => "classic.html",
            Self::Tiles => "tiles.html",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "tiles" => Ok(Self::Tiles),
            other => Err(format!("unknown layout '{other}' (expected 'classic' or 'tiles')")),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::Tiles => f.write_str("tiles"),
        }
    }
}

/// Settings shared by every page of one build.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Collection title, shown in every document title
    pub site_title: String,
    /// Generation time shown in the page header
    pub generated_at: DateTime<Utc>,
    /// Layout variant
    pub layout: Layout,
    /// Stylesheet directory linked by the tiles layout
    pub styles_dir: String,
    /// Stylesheet embedded by the classic layout
    pub stylesheet: String,
}

/// A bookmark as shown on a page.
#[derive(Debug, Clone, serde::Serialize)]
struct BookmarkEntry {
    title: String,
    href: String,
    desc: Option<String>,
    meta: Vec<String>,
}

/// A link to a subfolder page.
#[derive(Debug, Clone, serde::Serialize)]
struct FolderEntry {
    title: String,
    href: String,
}

/// Template engine using minijinja.
///
/// Templates are registered under `.html` names, so every interpolated value
/// is HTML-escaped unless a template marks it `safe`. Only `& < > " '` are
/// escaped; URLs keep their slashes.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in layouts.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_formatter(html_formatter);

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("classic.html".to_string(), CLASSIC_TEMPLATE.to_string())
            .expect("Failed to add classic template");

        env.add_template_owned("tiles.html".to_string(), TILES_TEMPLATE.to_string())
            .expect("Failed to add tiles template");

        Self { env }
    }

    /// Render the page for one folder.
    ///
    /// `parent` is the slug of the parent page, `None` for the root.
    pub fn render_page(
        &self,
        page: &Page<'_>,
        parent: Option<&str>,
        options: &RenderOptions,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(options.layout.template())?;

        let bookmarks: Vec<BookmarkEntry> = page
            .folder
            .bookmarks()
            .map(|bookmark| {
                let mut meta = Vec::new();
                if let Some(added) = format_timestamp(bookmark.added.as_deref()) {
                    meta.push(format!("added {added}"));
                }
                if let Some(modified) = format_timestamp(bookmark.modified.as_deref()) {
                    meta.push(format!("updated {modified}"));
                }
                BookmarkEntry {
                    title: bookmark.title.clone(),
                    href: bookmark.href.clone(),
                    desc: bookmark.desc.clone(),
                    meta,
                }
            })
            .collect();

        let folders: Vec<FolderEntry> = page
            .subpages
            .iter()
            .map(|subpage| FolderEntry {
                title: subpage.folder.title.clone(),
                href: subpage.slug.clone(),
            })
            .collect();

        let styles_dir = options.styles_dir.trim_end_matches('/');

        tmpl.render(context! {
            title => &page.folder.title,
            site_title => &options.site_title,
            generated_at => options.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            parent => parent,
            bookmarks => bookmarks,
            folders => folders,
            stylesheet => &options.stylesheet,
            base_stylesheet => format!("{styles_dir}/{BASE_STYLESHEET}"),
            themes_dir => format!("{styles_dir}/{THEMES_DIR}/"),
            themes => THEMES,
            default_theme => DEFAULT_THEME,
            theme_script => AssetPipeline::theme_script(),
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn html_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), minijinja::Error> {
    match value.as_str() {
        Some(text) if state.auto_escape() == AutoEscape::Html && !value.is_safe() => {
            write_escaped(out, text).map_err(|err| {
                minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output")
                    .with_source(err)
            })
        }
        _ => minijinja::escape_formatter(out, state, value),
    }
}

fn write_escaped(out: &mut Output, text: &str) -> fmt::Result {
    let mut last = 0;
    for (idx, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        out.write_str(&text[last..idx])?;
        out.write_str(entity)?;
        last = idx + 1;
    }
    out.write_str(&text[last..])
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} – {{ site_title }}</title>
  {% block head %}{% endblock %}
</head>
<body>
  <header>
    <div class="badge">Bookmarks</div>
    <div>
      <h1>{{ title }}</h1>
      <div class="updated">Updated {{ generated_at }}</div>
    </div>
    {% if parent %}<a class="parent" href="{{ parent }}">↩ Back</a>{% endif %}
    {% block controls %}{% endblock %}
  </header>
  <main>
    {% block content %}{% endblock %}
  </main>
  {% block scripts %}{% endblock %}
</body>
</html>
"##;

const CLASSIC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block head %}<style>{{ stylesheet | safe }}</style>{% endblock %}

{% block content %}
<section>
  <h2>Bookmarks</h2>
  {% if bookmarks %}
  <ul class="bookmarks">
  {% for bookmark in bookmarks %}
    <li class="bookmark"><a href="{{ bookmark.href }}" target="_blank" rel="noreferrer noopener">{{ bookmark.title }}</a>{% if bookmark.desc %}<div class="desc">{{ bookmark.desc }}</div>{% endif %}{% if bookmark.meta %}<div class="meta">{{ bookmark.meta | join(" · ") }}</div>{% endif %}</li>
  {% endfor %}
  </ul>
  {% else %}
  <p class="muted">No bookmarks.</p>
  {% endif %}
</section>
<section>
  <h2>Folders</h2>
  {% if folders %}
  <ul class="subfolders">
  {% for folder in folders %}
    <li class="folder-link"><a href="{{ folder.href }}">{{ folder.title }}</a></li>
  {% endfor %}
  </ul>
  {% else %}
  <p class="muted">No subfolders.</p>
  {% endif %}
</section>
{% endblock %}"##;

const TILES_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block head %}<link rel="stylesheet" href="{{ base_stylesheet }}">
  <link id="theme-stylesheet" rel="stylesheet" href="{{ themes_dir }}{{ default_theme }}.css" data-themes="{{ themes_dir }}">{% endblock %}

{% block controls %}<label class="theme-picker">Theme
      <select id="theme-select">
      {% for theme in themes %}
        <option value="{{ theme }}"{% if theme == default_theme %} selected{% endif %}>{{ theme }}</option>
      {% endfor %}
      </select>
    </label>{% endblock %}

{% block content %}
<section>
  <h2>Bookmarks</h2>
  {% if bookmarks %}
  <div class="tiles bookmarks">
  {% for bookmark in bookmarks %}
    <a class="tile bookmark" href="{{ bookmark.href }}" target="_blank" rel="noreferrer noopener"><span class="tile-title">{{ bookmark.title }}</span>{% if bookmark.desc %}<span class="desc">{{ bookmark.desc }}</span>{% endif %}{% if bookmark.meta %}<span class="meta">{{ bookmark.meta | join(" · ") }}</span>{% endif %}</a>
  {% endfor %}
  </div>
  {% else %}
  <p class="muted">No bookmarks.</p>
  {% endif %}
</section>
<section>
  <h2>Folders</h2>
  {% if folders %}
  <div class="tiles subfolders">
  {% for folder in folders %}
    <a class="tile folder-link" href="{{ folder.href }}"><span class="tile-title">{{ folder.title }}</span></a>
  {% endfor %}
  </div>
  {% else %}
  <p class="muted">No subfolders.</p>
  {% endif %}
</section>
{% endblock %}

{% block scripts %}<script>{{ theme_script | safe }}</script>{% endblock %}"##;
