//! HTML rendering for the heatmap view.
//!
//! Rendering is a pure function of `ViewState`: every handler re-renders
//! the whole view fragment from current state and swaps it in via HTMX.
//! The heatmap markup returned by the prediction service is injected
//! verbatim - the service is trusted to produce safe fragments, matching
//! the source behavior (no sanitization).

use crate::models::{Month, Year};
use crate::view::ViewState;

/// OpenStreetMap embed for the default map: Northern Iloilo, Visayan Sea.
const DEFAULT_MAP_EMBED_URL: &str =
    "https://www.openstreetmap.org/export/embed.html?bbox=123.0,11.0,123.5,11.5&layer=mapnik";

/// Render the full heatmap view fragment for the current state.
///
/// The fragment is the swap target for every interaction, so it carries
/// the controls (with current selections), the loading overlay, and
/// whichever result/default-map blocks the state calls for.
#[must_use]
pub fn render_view(state: &ViewState) -> String {
    format!(
        r#"<div id="heatmap-view">
{overlay}
{controls}
{result}
{default_map}
</div>"#,
        overlay = render_overlay(state.loading),
        controls = render_controls(state.selected_year, state.selected_month),
        result = state
            .heatmap_markup
            .as_deref()
            .map(|markup| render_result(state.selected_year, state.selected_month, markup))
            .unwrap_or_default(),
        default_map = if state.default_map_visible {
            render_default_map()
        } else {
            String::new()
        },
    )
}

/// Render the blocking overlay.
///
/// The element is always present so HTMX can toggle it as a request
/// indicator; the `is-loading` class force-shows it when server-side
/// state says a request is in flight (a concurrent viewer sees it too).
fn render_overlay(loading: bool) -> String {
    let class = if loading {
        "loading-overlay is-loading"
    } else {
        "loading-overlay"
    };

    format!(
        r#"  <div id="predict-overlay" class="{class}">
    <div class="squid-spinner"></div>
    <div>Predicting...</div>
  </div>"#
    )
}

/// Render the year/month selectors and the predict button.
fn render_controls(year: Year, month: Month) -> String {
    let year_options: String = Year::ALL
        .iter()
        .map(|y| {
            let selected = if *y == year { " selected" } else { "" };
            format!(r#"        <option value="{y}"{selected}>{y}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let month_options: String = Month::all()
        .map(|m| {
            let selected = if m == month { " selected" } else { "" };
            format!(
                r#"        <option value="{n}"{selected}>{name}</option>"#,
                n = m.as_u8(),
                name = m.name()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"  <div class="controls">
    <div class="select-container">
      <label for="year">Select Year:</label>
      <select id="year" name="year"
              hx-post="/select/year" hx-trigger="change"
              hx-target="#heatmap-view" hx-swap="outerHTML">
{year_options}
      </select>
    </div>
    <div class="select-container">
      <label for="month">Select Month:</label>
      <select id="month" name="month"
              hx-post="/select/month" hx-trigger="change"
              hx-target="#heatmap-view" hx-swap="outerHTML">
{month_options}
      </select>
    </div>
    <button class="predict-btn"
            hx-post="/predict" hx-target="#heatmap-view" hx-swap="outerHTML"
            hx-indicator="#predict-overlay">Predict</button>
  </div>"##
    )
}

/// Render the fetched heatmap block. `markup` is inserted as-is.
fn render_result(year: Year, month: Month, markup: &str) -> String {
    format!(
        r#"  <div class="result">
    <h3>Generated Heatmap for {name} {year}</h3>
    {markup}
  </div>"#,
        name = month.name(),
    )
}

/// Render the default map block: a fixed, non-interactive OSM embed.
fn render_default_map() -> String {
    format!(
        r#"  <div class="result">
    <h3 class="map-header">Default Map (OpenStreetMap in Northern Iloilo, Visayan Sea)</h3>
    <div class="map-container">
      <iframe src="{DEFAULT_MAP_EMBED_URL}" title="Default Map"></iframe>
    </div>
  </div>"#
    )
}
