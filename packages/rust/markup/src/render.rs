//! Record → HTML fragment rendering.
//!
//! Each fragment is a self-contained `fair-item` block: header with meta
//! line, description paragraphs, and either an image carousel or a
//! placeholder when no assets were located.

use std::path::Path;

use tracing::{debug, instrument};

use fairsync_shared::{AppConfig, AssetSet, Record};

use crate::description;
use crate::escape::field;

// Indentation of the generated markup, matching the page's own layout.
const ITEM: &str = "                    ";
const ITEM_1: &str = "                        ";
const ITEM_2: &str = "                            ";
const ITEM_3: &str = "                                ";
const ITEM_4: &str = "                                    ";
const ITEM_5: &str = "                                        ";

/// Options controlling fragment rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// URL prefix for image `src` attributes.
    pub media_url: String,
    /// On-disk media folder named in the placeholder's upload hint.
    pub upload_root: String,
    /// Descriptions at least this long (in characters) become two paragraphs.
    pub split_threshold: usize,
    /// HTML-escape record fields instead of inserting them verbatim.
    pub escape_fields: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            media_url: config.media.url.trim_end_matches('/').to_string(),
            upload_root: upload_root(&config.media.root),
            split_threshold: config.render.split_threshold,
            escape_fields: config.render.escape_fields,
        }
    }
}

fn upload_root(root: &Path) -> String {
    let display = root.display().to_string();
    match display.trim_end_matches(['/', '\\']) {
        "" => display,
        trimmed => trimmed.to_string(),
    }
}

/// Render one record and its located assets into a `fair-item` fragment.
///
/// Never fails: empty fields render as empty text and an empty asset set
/// renders the placeholder block.
#[instrument(
    level = "debug",
    skip_all,
    fields(identifier = %record.identifier, assets = assets.len())
)]
pub fn render(record: &Record, assets: &AssetSet, opts: &RenderOptions) -> String {
    let esc = opts.escape_fields;
    let title = field(&record.title, esc);

    let mut html = String::new();
    html.push_str(&format!("{ITEM}<!-- Fair: {title} -->\n"));
    html.push_str(&format!("{ITEM}<div class=\"fair-item\">\n"));

    // Header
    html.push_str(&format!("{ITEM_1}<div class=\"fair-header\">\n"));
    html.push_str(&format!("{ITEM_2}<h3>{title}</h3>\n"));
    html.push_str(&format!("{ITEM_2}<div class=\"fair-meta\">\n"));
    html.push_str(&format!(
        "{ITEM_3}<span class=\"fair-date\"><i class=\"far fa-calendar\"></i> {}</span>\n",
        field(&record.date, esc)
    ));
    html.push_str(&format!(
        "{ITEM_3}<span class=\"fair-location\"><i class=\"fas fa-map-marker-alt\"></i> {}</span>\n",
        field(&record.location, esc)
    ));
    html.push_str(&format!(
        "{ITEM_3}<span class=\"fair-time\"><i class=\"far fa-clock\"></i> {}</span>\n",
        field(&record.time, esc)
    ));
    html.push_str(&format!("{ITEM_2}</div>\n"));
    html.push_str(&format!("{ITEM_1}</div>\n"));

    // Content
    html.push_str(&format!("{ITEM_1}<div class=\"fair-content\">\n"));
    html.push_str(&format!("{ITEM_2}<div class=\"fair-description\">\n"));
    for para in description::paragraphs(&record.description, opts.split_threshold) {
        html.push_str(&format!("{ITEM_3}<p>{}</p>\n", field(&para, esc)));
    }
    html.push_str(&format!("{ITEM_2}</div>\n"));

    if assets.is_empty() {
        debug!("no assets located, rendering placeholder");
        push_placeholder(&mut html, &record.identifier, opts);
    } else {
        push_carousel(&mut html, record, assets, opts);
    }

    html.push_str(&format!("{ITEM_1}</div>\n"));
    html.push_str(&format!("{ITEM}</div>"));
    html
}

fn push_placeholder(html: &mut String, identifier: &str, opts: &RenderOptions) {
    let id = field(identifier, opts.escape_fields);
    let root = field(&opts.upload_root, opts.escape_fields);

    html.push_str(&format!("{ITEM_1}<div class=\"fair-carousel\">\n"));
    html.push_str(&format!("{ITEM_2}<div class=\"carousel-container\">\n"));
    html.push_str(&format!("{ITEM_3}<div class=\"no-images-placeholder\">\n"));
    html.push_str(&format!(
        "{ITEM_4}<i class=\"fas fa-images\" style=\"font-size: 3rem; color: #ccc; margin-bottom: 1rem;\"></i>\n"
    ));
    html.push_str(&format!(
        "{ITEM_4}<p style=\"color: #666; text-align: center;\">Images coming soon!<br>Add photos to: <code>{root}/{id}/</code></p>\n"
    ));
    html.push_str(&format!("{ITEM_3}</div>\n"));
    html.push_str(&format!("{ITEM_2}</div>\n"));
    html.push_str(&format!("{ITEM_1}</div>\n"));
}

fn push_carousel(html: &mut String, record: &Record, assets: &AssetSet, opts: &RenderOptions) {
    let esc = opts.escape_fields;
    let id = field(&record.identifier, esc);
    let title = field(&record.title, esc);

    html.push_str(&format!("{ITEM_1}<div class=\"fair-carousel\">\n"));
    html.push_str(&format!("{ITEM_2}<div class=\"carousel-container\">\n"));

    html.push_str(&format!(
        "{ITEM_3}<div class=\"carousel-track\" data-carousel=\"{id}\">\n"
    ));
    for (i, file) in assets.iter().enumerate() {
        html.push_str(&format!(
            "{ITEM_4}<div class=\"carousel-slide{}\">\n",
            active(i)
        ));
        html.push_str(&format!(
            "{ITEM_5}<img src=\"{}/{id}/{}\" alt=\"{title} - Image {}\" class=\"carousel-image\">\n",
            opts.media_url,
            field(file, esc),
            i + 1
        ));
        html.push_str(&format!("{ITEM_4}</div>\n"));
    }
    html.push_str(&format!("{ITEM_3}</div>\n"));

    // Controls only make sense with something to navigate to.
    if assets.len() > 1 {
        for (direction, icon) in [("prev", "fa-chevron-left"), ("next", "fa-chevron-right")] {
            html.push_str(&format!(
                "{ITEM_3}<button class=\"carousel-btn {direction}\" data-carousel=\"{id}\">\n"
            ));
            html.push_str(&format!("{ITEM_4}<i class=\"fas {icon}\"></i>\n"));
            html.push_str(&format!("{ITEM_3}</button>\n"));
        }

        html.push_str(&format!(
            "{ITEM_3}<div class=\"carousel-dots\" data-carousel=\"{id}\">\n"
        ));
        for i in 0..assets.len() {
            html.push_str(&format!(
                "{ITEM_4}<button class=\"dot{}\" data-slide=\"{i}\"></button>\n",
                active(i)
            ));
        }
        html.push_str(&format!("{ITEM_3}</div>\n"));
    }

    html.push_str(&format!("{ITEM_2}</div>\n"));
    html.push_str(&format!("{ITEM_1}</div>\n"));
}

fn active(index: usize) -> &'static str {
    if index == 0 { " active" } else { "" }
}
