//! Stylesheet and script assets for generated pages.

/// Theme stylesheets the tiles layout expects under `<styles_dir>/themes/`.
pub const THEMES: &[&str] = &["midnight", "daylight", "forest", "sunset", "contrast"];

/// Theme applied before the viewer picks one.
pub const DEFAULT_THEME: &str = "midnight";

/// Stylesheet shared by every theme of the tiles layout.
pub const BASE_STYLESHEET: &str = "base.css";

/// Subdirectory of the styles directory holding theme stylesheets.
pub const THEMES_DIR: &str = "themes";

/// `localStorage` key the theme selector writes to.
pub const THEME_STORAGE_KEY: &str = "xbelsite-theme";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Stylesheet embedded in classic layout pages.
    pub fn classic_css(minify: bool) -> String {
        if !minify {
            return CLASSIC_CSS.to_string();
        }
        match Self::minify_css(CLASSIC_CSS) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("Keeping unminified stylesheet: {}", e);
                CLASSIC_CSS.to_string()
            }
        }
    }

    /// Script driving the theme selector of the tiles layout.
    pub fn theme_script() -> String {
        THEME_JS.replace("__STORAGE_KEY__", THEME_STORAGE_KEY)
    }

    /// Stylesheet paths the tiles layout links to, relative to the site root.
    pub fn theme_stylesheets(styles_dir: &str) -> Vec<String> {
        let dir = styles_dir.trim_end_matches('/');
        std::iter::once(format!("{dir}/{BASE_STYLESHEET}"))
            .chain(
                THEMES
                    .iter()
                    .map(|theme| format!("{dir}/{THEMES_DIR}/{theme}.css")),
            )
            .collect()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const CLASSIC_CSS: &str = r#":root {
  --bg: #0b1b2b;
  --panel: #11263a;
  --accent: #f8c102;
  --text: #e8eef4;
  --muted: #94a4b5;
  --link: #7dd1ff;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: "Inter", "Segoe UI", sans-serif;
  background: radial-gradient(120% 120% at 10% 20%, rgba(255, 255, 255, 0.08), transparent),
    radial-gradient(80% 80% at 90% 10%, rgba(255, 255, 255, 0.06), transparent),
    var(--bg);
  color: var(--text);
  min-height: 100vh;
  padding: 24px;
}

header {
  max-width: 960px;
  margin: 0 auto 18px auto;
  display: flex;
  align-items: center;
  gap: 12px;
}

.badge {
  background: var(--accent);
  color: #1b1b1b;
  padding: 6px 12px;
  border-radius: 999px;
  font-weight: 700;
  letter-spacing: 0.02em;
}

h1 {
  margin: 0;
  font-size: 28px;
  letter-spacing: -0.02em;
}

.updated {
  color: var(--muted);
  font-size: 14px;
}

.parent {
  color: var(--link);
  text-decoration: none;
  font-size: 14px;
}

.parent:hover {
  color: var(--accent);
}

main {
  max-width: 960px;
  margin: 0 auto;
  background: linear-gradient(145deg, rgba(255, 255, 255, 0.04), rgba(255, 255, 255, 0.02));
  border: 1px solid rgba(255, 255, 255, 0.05);
  border-radius: 16px;
  padding: 20px;
  box-shadow: 0 24px 60px rgba(0, 0, 0, 0.35);
}

section {
  margin-bottom: 20px;
}

section h2 {
  margin: 0 0 8px 0;
  font-size: 15px;
  letter-spacing: 0.03em;
  color: var(--accent);
  text-transform: uppercase;
}

ul {
  list-style: none;
  padding-left: 16px;
  margin: 0;
}

.subfolders {
  border-left: 2px solid rgba(255, 255, 255, 0.07);
  padding-left: 12px;
}

.folder-link {
  margin: 6px 0;
  font-weight: 600;
}

.bookmark {
  margin: 8px 0;
}

.folder-link a,
.bookmark a {
  color: var(--link);
  text-decoration: none;
  font-weight: 600;
}

.folder-link a:hover,
.bookmark a:hover {
  color: var(--accent);
}

.desc {
  color: var(--muted);
  font-size: 13px;
  margin-top: 2px;
}

.meta {
  color: var(--muted);
  font-size: 12px;
  margin-top: 2px;
}

.muted {
  color: var(--muted);
}

@media (max-width: 640px) {
  body {
    padding: 14px;
  }

  h1 {
    font-size: 22px;
  }

  main {
    padding: 14px;
  }
}
"#;

// Theme names come from the <select> options.
const THEME_JS: &str = r#"(function () {
  var KEY = "__STORAGE_KEY__";
  var link = document.getElementById("theme-stylesheet");
  var select = document.getElementById("theme-select");
  if (!link || !select) {
    return;
  }
  var base = link.getAttribute("data-themes");

  function known(name) {
    return Array.prototype.some.call(select.options, function (option) {
      return option.value === name;
    });
  }

  function apply(name) {
    link.setAttribute("href", base + name + ".css");
    select.value = name;
  }

  var stored = null;
  try {
    stored = window.localStorage.getItem(KEY);
  } catch (err) {
    stored = null;
  }
  if (stored && known(stored)) {
    apply(stored);
  }

  select.addEventListener("change", function () {
    apply(select.value);
    try {
      window.localStorage.setItem(KEY, select.value);
    } catch (err) {
      return;
    }
  });
})();
"#;
