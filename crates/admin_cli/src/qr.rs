//! Table QR codes.
//!
//! Each table gets a code pointing at the customer app with `?table=<n>`, so
//! scanning it pre-fills the table number.

use qrcode::{EcLevel, QrCode, render::svg, render::unicode};
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("invalid base url: {0}")]
    Parse(String),
    #[error("qr encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Link encoded in the QR code. A blank table yields the bare base URL.
pub fn table_link(base_url: &str, table: &str) -> Result<String, QrError> {
    let mut url = Url::parse(base_url.trim()).map_err(|e| QrError::Parse(e.to_string()))?;
    let table = table.trim();
    if !table.is_empty() {
        url.query_pairs_mut().append_pair("table", table);
    }
    Ok(url.to_string())
}

fn encode(link: &str) -> Result<QrCode, QrError> {
    Ok(QrCode::with_error_correction_level(link, EcLevel::H)?)
}

/// Render for a terminal using half-block characters.
pub fn render_terminal(link: &str) -> Result<String, QrError> {
    let code = encode(link)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Render as a printable SVG document.
pub fn render_svg(link: &str) -> Result<String, QrError> {
    let code = encode(link)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(400, 400)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
